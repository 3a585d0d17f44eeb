// src/eligibility/error.rs
/// Fatal errors raised while building or running the eligibility engine.
///
/// Translation problems never show up here: they degrade to the untranslated
/// text inside the translator wrapper.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("language model unavailable at {path}: {source}")]
    ModelUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid language model file {path} (line {line}): {reason}")]
    InvalidModel {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("entity taxonomy unavailable at {path}: {source}")]
    TaxonomyUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid entity taxonomy {path}: {source}")]
    InvalidTaxonomy {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entity recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    #[error("analysis worker failed: {0}")]
    Worker(String),
}
