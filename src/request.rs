use crate::error::MLError;
use crate::signer::trim_object;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sign request as it arrives on the wire, before validation.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MLSignPayload {
    pub key: Option<String>,

    pub filename: Option<String>,

    /// Seconds. The remote worker protocol calls this `expiresIn`.
    #[serde(alias = "expiresIn")]
    pub expiry: Option<i64>,
}

impl MLSignPayload {
    pub fn new(key: impl Into<String>) -> Self {
        MLSignPayload {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn with_expiry(mut self, expiry: i64) -> Self {
        self.expiry = Some(expiry);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MLSignRequest {
    pub key: String,
    pub filename: Option<String>,
    pub expiry: Duration,
}

impl MLSignRequest {
    pub fn try_new(
        payload: &MLSignPayload,
        default_expiry: Duration,
        max_expiry: Duration,
    ) -> Result<Self, MLError> {
        // signed as received, minus leading slashes
        let key = match payload.key.as_deref().map(trim_object) {
            Some(key) if !trim_object(key.trim()).is_empty() => key.to_string(),
            _ => return Err(MLError::MissingKey),
        };

        let expiry = match payload.expiry {
            None => default_expiry,
            Some(seconds) if seconds <= 0 => {
                return Err(MLError::InvalidExpiry {
                    message: format!("expiry must be positive, got {}", seconds),
                })
            }
            Some(seconds) => Duration::from_secs(seconds as u64),
        };
        if expiry > max_expiry {
            return Err(MLError::InvalidExpiry {
                message: format!(
                    "expiry {}s exceeds the maximum of {}s",
                    expiry.as_secs(),
                    max_expiry.as_secs()
                ),
            });
        }

        Ok(MLSignRequest {
            key,
            filename: payload.filename.clone(),
            expiry,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MLSignedUrl {
    pub key: String,
    pub url: String,
    pub expiry: Duration,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MLSignedUrlBody {
    pub url: String,
    pub signed_url: String,
    pub key: String,
    pub expires_in: u64,
    pub issued_at: String,
    pub expires_at: String,
}

impl From<MLSignedUrl> for MLSignedUrlBody {
    fn from(signed: MLSignedUrl) -> MLSignedUrlBody {
        MLSignedUrlBody {
            signed_url: signed.url.clone(),
            url: signed.url,
            key: signed.key,
            expires_in: signed.expiry.as_secs(),
            issued_at: signed.issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            expires_at: signed.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
