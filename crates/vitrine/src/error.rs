//! Engine errors

use vitrine_net::NetError;

/// Errors surfaced by bootstrap and navigation
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no element matches the content root selector `{0}`")]
    MissingContentRoot(String),

    #[error("content root has no `{0}` attribute")]
    MissingTemplate(String),

    #[error("no page is registered for template `{0}`")]
    UnknownTemplate(String),

    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Net(#[from] NetError),
}
