use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuillClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx response from the API. The message comes from the server's
    /// error envelope when one is present.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QuillClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuillClientError::Api { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, QuillClientError::Api { status: 401, .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, QuillClientError::Api { status: 403, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            QuillClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
