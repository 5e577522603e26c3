use thiserror::Error;

/// Failures while resolving or parsing a bundled dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown dataset '{0}' (expected \"Claude.ai usage\" or \"1P API usage\")")]
    UnknownLabel(String),
    #[error("failed to load dataset '{label}' from {resource}: {source:#}")]
    Parse {
        label: String,
        resource: String,
        source: anyhow::Error,
    },
}
