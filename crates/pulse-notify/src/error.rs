use std::time::Duration;

/// Errors surfaced by a delivery attempt.
///
/// Delivery failures are retryable from the pipeline's point of view:
/// the dispatcher puts the lead back in `new` and a later run tries
/// again. `NotConfigured` is raised before any delivery is attempted.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Http(String),

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("notifier not configured: {0}")]
    NotConfigured(String),
}

impl NotifyError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Timeout(_) => "timeout",
            Self::Rejected { .. } => "rejected",
            Self::NotConfigured(_) => "not_configured",
        }
    }
}
