use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by a handler while building a request or parsing a response.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("hls playlist error: {0}")]
    HlsPlaylistError(String),
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("no streams found")]
    NoStreamsFound,
    #[error("other: {0}")]
    Other(String),
}

/// Failures of the transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("failed to build HTTP client: {reason}")]
    Client { reason: String },
}

impl TransportError {
    pub fn http_status(status: StatusCode, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source } if source.is_timeout())
    }
}

/// Outcome of a failed resolve call.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported url `{url}`")]
    Unsupported { url: String },

    #[error("{handler}: failed to create request: {source}")]
    RequestConstruction {
        handler: &'static str,
        #[source]
        source: ExtractorError,
    },

    #[error("{handler}: transport failure: {source}")]
    Transport {
        handler: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{handler}: failed to parse response{}", .source.as_ref().map(|e| format!(": {e}")).unwrap_or_default())]
    Parse {
        handler: &'static str,
        #[source]
        source: Option<ExtractorError>,
    },

    #[error("{handler}: gave up after {rounds} request rounds")]
    ProtocolExceeded { handler: &'static str, rounds: usize },
}

impl ResolveError {
    pub fn unsupported(url: impl Into<String>) -> Self {
        Self::Unsupported { url: url.into() }
    }

    /// Whether a caller-level retry may succeed. The resolver itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => match source {
                TransportError::Network { .. } => true,
                TransportError::HttpStatus { status, .. } => {
                    status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
                }
                TransportError::InvalidRequest { .. } | TransportError::Client { .. } => false,
            },
            Self::Unsupported { .. }
            | Self::RequestConstruction { .. }
            | Self::Parse { .. }
            | Self::ProtocolExceeded { .. } => false,
        }
    }
}
