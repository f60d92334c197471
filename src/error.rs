use std::path::PathBuf;

/// Failures surfaced by the analysis engine.
///
/// Expected absence (no literal under the cursor, an invalid project) is
/// modelled with `Option` by the callers; these variants are the unexpected
/// cases that abort the current request.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("could not load resource file for namespace {namespace:?} at {path:?}")]
    ResourceUnavailable { namespace: String, path: PathBuf },

    #[error("no locale directory found in {base_dir:?} and no primary locale configured")]
    NoLocales { base_dir: PathBuf },

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
