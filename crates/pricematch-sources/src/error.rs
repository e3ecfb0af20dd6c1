use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint answered with `"success": false`.
    #[error("{}", .message.as_deref().unwrap_or("request was not successful"))]
    Api { message: Option<String> },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("normalization error for {source_name}: {reason}")]
    Normalization { source_name: String, reason: String },
}

impl SourceError {
    /// The message the server supplied, if this is an unsuccessful envelope
    /// that carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SourceError::Api { message } => message.as_deref(),
            _ => None,
        }
    }

    /// `true` for failures of the transport or the payload, as opposed to the
    /// server deliberately reporting `"success": false`.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, SourceError::Api { .. })
    }
}
