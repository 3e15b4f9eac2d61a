//! Typed failures surfaced by the library operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PinsError>;

#[derive(Debug, Error)]
pub enum PinsError {
    /// No session/repository handle, or the PDS rejected the access token.
    #[error("not authenticated (run `atpins login --pds ... --did ... --token ...`)")]
    NotAuthenticated,

    /// Network or protocol failure from the repository client.
    #[error("{call} failed: {message}")]
    RemoteCallFailed {
        /// XRPC method that failed
        call: &'static str,
        message: String,
        /// HTTP status when the PDS answered at all
        status: Option<u16>,
    },

    /// A local precondition was violated; nothing was sent to the PDS.
    #[error("{0}")]
    ValidationFailed(String),

    /// A pin record without a recognizable content reference.
    #[error("malformed pin record {uri}: {reason}")]
    MalformedRecord { uri: String, reason: String },
}

impl PinsError {
    pub fn remote(call: &'static str, message: impl std::fmt::Display) -> Self {
        Self::RemoteCallFailed {
            call,
            message: message.to_string(),
            status: None,
        }
    }

    pub fn remote_status(call: &'static str, status: u16, message: impl std::fmt::Display) -> Self {
        Self::RemoteCallFailed {
            call,
            message: message.to_string(),
            status: Some(status),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Transport failures and server-side errors are worth another attempt;
    /// a request the PDS rejected as invalid, or a method it lacks, is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteCallFailed { status, .. } => {
                status.is_none_or(|s| s >= 500 && s != 501)
            }
            _ => false,
        }
    }
}
