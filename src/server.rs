use anyhow::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::AnalysisConfig;
use crate::context::{AnalysisContext, Document};
use crate::handlers::{completions_at_position, quick_info_at_position, semantic_diagnostics};
use crate::rpc::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, Response, Transport,
};

#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    pub project_root: String,
    pub config: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct CompletionParams {
    #[serde(flatten)]
    pub document: Document,
    pub offset: usize,
    #[serde(default)]
    pub prior: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DiagnosticsParams {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub prior: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct HoverParams {
    #[serde(flatten)]
    pub document: Document,
    pub offset: usize,
    #[serde(default)]
    pub prior: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ResolvePathParams {
    pub namespace: String,
}

/// Whether the loop keeps reading after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Decode `params`, run `handler` and wrap the outcome in a response.
fn call<P, F>(id: Option<Value>, params: Value, handler: F) -> Response
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Result<Value>,
{
    match serde_json::from_value(params) {
        Ok(p) => match handler(p) {
            Ok(result) => Response::success(id, result),
            Err(e) => Response::error(id, INTERNAL_ERROR, e.to_string()),
        },
        Err(e) => Response::error(id, INVALID_PARAMS, e.to_string()),
    }
}

pub struct Server<R, W> {
    transport: Transport<R, W>,
    context: Option<AnalysisContext>,
}

impl<R: BufRead, W: Write> Server<R, W> {
    pub fn new(transport: Transport<R, W>) -> Self {
        Self {
            transport,
            context: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        tracing::info!("server starting");

        loop {
            let request = match self.transport.read_message() {
                Ok(Some(req)) => req,
                Ok(None) => {
                    tracing::info!("EOF, shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "read error");
                    continue;
                }
            };

            if request.jsonrpc != "2.0" {
                if request.id.is_some() {
                    let response = Response::error(
                        request.id.clone(),
                        INVALID_REQUEST,
                        "invalid jsonrpc version",
                    );
                    let _ = self.transport.send_response(&response);
                }
                continue;
            }

            // Notifications have no id
            if request.id.is_none() {
                continue;
            }

            let (response, flow) = self.dispatch(&request.method, request.params, request.id);
            if let Err(e) = self.transport.send_response(&response) {
                tracing::error!(error = %e, "send error");
            }
            if flow == Flow::Exit {
                tracing::info!("shutdown requested");
                break;
            }
        }

        Ok(())
    }

    pub fn into_transport(self) -> Transport<R, W> {
        self.transport
    }

    fn dispatch(&mut self, method: &str, params: Value, id: Option<Value>) -> (Response, Flow) {
        let response = match method {
            "initialize" => call(id, params, |p: InitializeParams| {
                let context = AnalysisContext::new(Path::new(&p.project_root), p.config);
                let result = json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "valid": context.is_valid_project(),
                    "base_dir": context.base_dir().to_string_lossy(),
                    "hook": context.config().call_expression_id,
                    "binding": context.config().binding_element_id,
                });
                self.context = Some(context);
                Ok(result)
            }),

            "shutdown" => return (Response::success(id, Value::Null), Flow::Exit),

            "completion" | "diagnostics" | "hover" | "namespaces/list"
            | "namespaces/resolvePath" => {
                let Some(context) = &self.context else {
                    return (
                        Response::error(id, INVALID_REQUEST, "server not initialized"),
                        Flow::Continue,
                    );
                };
                Self::analyze(context, method, params, id)
            }

            _ => Response::error(id, METHOD_NOT_FOUND, format!("method not found: {}", method)),
        };

        (response, Flow::Continue)
    }

    fn analyze(context: &AnalysisContext, method: &str, params: Value, id: Option<Value>) -> Response {
        match method {
            "completion" => call(id, params, |p: CompletionParams| {
                let prior = p.prior;
                let info = completions_at_position(context, &p.document, p.offset, || prior)?;
                Ok(serde_json::to_value(info)?)
            }),

            "diagnostics" => call(id, params, |p: DiagnosticsParams| {
                let prior = p.prior;
                let report = semantic_diagnostics(context, &p.document, || prior)?;
                Ok(serde_json::to_value(report)?)
            }),

            "hover" => call(id, params, |p: HoverParams| {
                let prior = p.prior;
                let info = quick_info_at_position(context, &p.document, p.offset, || prior);
                Ok(serde_json::to_value(info)?)
            }),

            "namespaces/list" => call(id, params, |_: Value| {
                Ok(json!({ "namespaces": context.namespaces() }))
            }),

            "namespaces/resolvePath" => call(id, params, |p: ResolvePathParams| {
                let path = context.namespace_path(&p.namespace)?;
                Ok(json!({ "path": path.to_string_lossy() }))
            }),

            _ => Response::error(id, METHOD_NOT_FOUND, format!("method not found: {}", method)),
        }
    }
}
