//! Static analysis of translation-hook calls against on-disk i18n resources.
//!
//! The engine finds string literals passed to a translation hook
//! (`useTranslation("common")`) and to the function it binds
//! (`t("greeting")`), and checks them against the JSON files under a
//! `locales/<locale>/<namespace>.json` tree. It backs completion, diagnostics
//! and hover for an editor, served over JSON-RPC by the `i18n-lens` binary.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod invocation;
pub mod resource;
pub mod rpc;
pub mod runtime;
pub mod server;
pub mod syntax;
pub mod util;

pub use config::AnalysisConfig;
pub use context::{AnalysisContext, Document};
pub use error::AnalysisError;
