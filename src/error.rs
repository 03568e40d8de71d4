use std::fmt::{Display, Formatter};

use grid_cells::ExtractError;

#[derive(Debug)]
pub enum HarvestError {
    BadRequest(String),
    Upstream(String),
    Extract(String),
    Io(String),
    Serialize(String),
}

impl HarvestError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
            Self::Extract(_) => "extract_error",
            Self::Io(_) => "io_error",
            Self::Serialize(_) => "serialize_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Upstream(message)
            | Self::Extract(message)
            | Self::Io(message)
            | Self::Serialize(message) => message,
        }
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::BadRequest(_) => 2,
            Self::Upstream(_) | Self::Extract(_) | Self::Io(_) | Self::Serialize(_) => 1,
        }
    }
}

impl Display for HarvestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for HarvestError {}

impl From<ureq::Error> for HarvestError {
    fn from(error: ureq::Error) -> Self {
        Self::Upstream(error.to_string())
    }
}

impl From<url::ParseError> for HarvestError {
    fn from(error: url::ParseError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error.to_string())
    }
}

impl From<ExtractError> for HarvestError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::InvalidOption(message) => Self::BadRequest(message),
            other => Self::Extract(other.to_string()),
        }
    }
}
