//! Error types for the media health monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Process-level failures. Only these can stop the monitor.
#[derive(Debug)]
pub enum MonitorError {
    /// HTTP client could not be built
    Http(reqwest::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Http(err) => write!(f, "HTTP error: {}", err),
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Http(err) => Some(err),
            MonitorError::Config(_) => None,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err)
    }
}

/// Failure of a single status check against one target
#[derive(Debug)]
pub enum CheckError {
    /// Connection refused, DNS failure or timeout
    Transport(reqwest::Error),

    /// The service answered with something other than 200
    HttpStatus { status: u16, body: String },

    /// 200 OK, but the body is not the JSON we expect
    MalformedResponse(serde_json::Error),
}

impl CheckError {
    /// Whether the target should still be reported as reachable
    pub fn is_reachable(&self) -> bool {
        matches!(self, CheckError::MalformedResponse(_))
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Transport(err) => write!(f, "transport error: {}", err),
            CheckError::HttpStatus { status, body } => {
                write!(f, "status {}: {}", status, body)
            }
            CheckError::MalformedResponse(err) => write!(f, "malformed status body: {}", err),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Transport(err) => Some(err),
            CheckError::MalformedResponse(err) => Some(err),
            CheckError::HttpStatus { .. } => None,
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        CheckError::Transport(err)
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        CheckError::MalformedResponse(err)
    }
}
