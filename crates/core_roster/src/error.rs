use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Debug, Error)]
pub enum RosterError {
    /// The request never completed: network, timeout or file IO failure.
    #[error("transport failure ({context}): {message}")]
    Transport { context: String, message: String },

    /// The remote side answered but signalled failure or sent a malformed payload.
    #[error("{endpoint} failed: {message}")]
    Upstream { endpoint: String, message: String },

    #[error("invalid input: {0}")]
    Validation(String),
}

impl RosterError {
    pub fn transport(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn upstream(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Upstream {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Lookup failures the reconciler is allowed to swallow.
    pub fn is_recoverable_lookup(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Upstream { .. })
    }
}
