use pulse_notify::NotifyError;
use pulse_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("delivery failed: {0}")]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts() {
        let err: EngineError = StoreError::NotFound("lead x".into()).into();
        assert!(matches!(err, EngineError::Store(_)));
    }

    #[test]
    fn notify_error_display() {
        let err: EngineError = NotifyError::Http("reset".into()).into();
        assert!(err.to_string().contains("delivery failed"));
    }
}
