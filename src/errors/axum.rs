use crate::error::MLError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MLErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl MLError {
    pub fn status(&self) -> StatusCode {
        match self {
            MLError::MissingKey | MLError::InvalidExpiry { .. } => StatusCode::BAD_REQUEST,
            MLError::Unauthenticated | MLError::InvalidCredential { .. } => {
                StatusCode::UNAUTHORIZED
            }
            MLError::SigningFailure { .. } | MLError::Common { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> MLErrorBody {
        match self {
            MLError::MissingKey | MLError::Unauthenticated => MLErrorBody {
                error: self.to_string(),
                details: None,
            },
            MLError::InvalidExpiry { message } => MLErrorBody {
                error: "Invalid expiry".into(),
                details: Some(message.clone()),
            },
            MLError::InvalidCredential { .. } => MLErrorBody {
                error: "Invalid token".into(),
                details: None,
            },
            // provider detail stays in the server log
            MLError::SigningFailure { .. } => MLErrorBody {
                error: "Failed to generate signed URL".into(),
                details: None,
            },
            MLError::Common { .. } => MLErrorBody {
                error: "Internal server error".into(),
                details: None,
            },
        }
    }
}

impl IntoResponse for MLError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Malformed request bodies and query strings are client errors, not panics.
pub struct MLRejection {
    message: String,
}

impl From<JsonRejection> for MLRejection {
    fn from(rejection: JsonRejection) -> MLRejection {
        MLRejection {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for MLRejection {
    fn from(rejection: QueryRejection) -> MLRejection {
        MLRejection {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for MLRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(MLErrorBody {
                error: "Invalid request body".into(),
                details: Some(self.message),
            }),
        )
            .into_response()
    }
}
