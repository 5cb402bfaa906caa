use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    Validation,
    Transport,
    Server,
    Format,
    Config,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally; never reached the network.
    #[error("{0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },
    #[error("unexpected response format: {0}")]
    Format(String),
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ClientErrorKind {
        match self {
            Self::Validation(_) => ClientErrorKind::Validation,
            Self::Transport(_) => ClientErrorKind::Transport,
            Self::Server { .. } => ClientErrorKind::Server,
            Self::Format(_) => ClientErrorKind::Format,
            Self::Config(_) => ClientErrorKind::Config,
        }
    }

    /// Message supplied by the backend in a non-2xx body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
