#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum MLError {
    #[error("Missing key parameter")]
    MissingKey,

    #[error("Invalid expiry: {message}")]
    InvalidExpiry { message: String },

    #[error("Missing or invalid authorization header")]
    Unauthenticated,

    #[error("Invalid token: {message}")]
    InvalidCredential { message: String },

    #[error("Failed to generate signed URL: {message}")]
    SigningFailure { message: String },

    #[error("{message}")]
    Common { message: String },
}

impl MLError {
    /// Client-caused errors carry enough detail to fix the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MLError::MissingKey
                | MLError::InvalidExpiry { .. }
                | MLError::Unauthenticated
                | MLError::InvalidCredential { .. }
        )
    }
}
