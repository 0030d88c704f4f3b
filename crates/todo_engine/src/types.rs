use std::fmt;

use bytes::Bytes;
use todo_core::FetchTarget;

use crate::DecodeError;

/// Body of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Bytes,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Any status other than 200. 4xx and 5xx are not distinguished.
    NonSuccessStatus(u16),
    Timeout,
    Cancelled,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl FailureKind {
    /// Failures raised by the transport rather than by the server's answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FailureKind::Timeout | FailureKind::Cancelled | FailureKind::Network
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::NonSuccessStatus(code) => write!(f, "non 200 response ({code})"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

/// Error that ends a single fetch task and stops further dispatch.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("fetching {target}: {source}")]
    Fetch {
        target: FetchTarget,
        #[source]
        source: FetchError,
    },
    #[error("decoding {target}: {source}")]
    Decode {
        target: FetchTarget,
        #[source]
        source: DecodeError,
    },
}

impl TaskError {
    pub fn target(&self) -> &FetchTarget {
        match self {
            TaskError::Fetch { target, .. } | TaskError::Decode { target, .. } => target,
        }
    }
}
