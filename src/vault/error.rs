#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}: {1}")]
    HttpStatus(u16, String),

    #[error("Vault response is missing field '{0}'")]
    MissingField(String),

    #[error("Client is not authenticated")]
    NotAuthenticated,

    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error from reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// HTTP status code of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            VaultError::HttpStatus(code, _) => Some(*code),
            _ => None,
        }
    }
}
