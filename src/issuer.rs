use crate::error::MLError;
use crate::identity::{MLIdentityRef, MLSubject};
use crate::request::{MLSignPayload, MLSignRequest, MLSignedUrl};
use crate::signer::MLSignerRef;
use chrono::{SubsecRound, Utc};
use std::time::Duration;

/// Issues time-limited read URLs for objects in one bucket.
///
/// Holds no mutable state: every call validates, optionally authenticates,
/// then makes exactly one call into the signer. Nothing is cached or retried.
pub struct MLIssuer {
    signer: MLSignerRef,
    identity: Option<MLIdentityRef>,

    bucket: String,

    default_expiry: Duration,
    max_expiry: Duration,
}

impl MLIssuer {
    pub fn try_new(
        signer: MLSignerRef,
        identity: Option<MLIdentityRef>,
        bucket: impl Into<String>,
        default_expiry: Duration,
        max_expiry: Duration,
    ) -> Result<Self, MLError> {
        let max_expiry = max_expiry.min(signer.max_expiry());

        if default_expiry.is_zero() || default_expiry > max_expiry {
            return Err(MLError::Common {
                message: format!(
                    "default expiry {}s must be within 1..={}s",
                    default_expiry.as_secs(),
                    max_expiry.as_secs()
                ),
            });
        }

        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(MLError::Common {
                message: "bucket must not be empty".into(),
            });
        }

        Ok(MLIssuer {
            signer,
            identity,
            bucket,
            default_expiry,
            max_expiry,
        })
    }

    pub fn requires_authentication(&self) -> bool {
        self.identity.is_some()
    }

    pub fn max_expiry(&self) -> Duration {
        self.max_expiry
    }

    /// Returns the verified subject, or `None` when the deployment is open.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Option<MLSubject>, MLError> {
        let identity = match &self.identity {
            Some(identity) => identity,
            None => return Ok(None),
        };

        let token = credential.ok_or(MLError::Unauthenticated)?;

        match identity.validate(token).await {
            Ok(subject) => Ok(Some(subject)),
            Err(err) => {
                log::warn!("rejected credential: {:#}", err);

                Err(MLError::InvalidCredential {
                    message: err.to_string(),
                })
            }
        }
    }

    pub async fn issue(
        &self,
        payload: &MLSignPayload,
        credential: Option<&str>,
    ) -> Result<MLSignedUrl, MLError> {
        let request = MLSignRequest::try_new(payload, self.default_expiry, self.max_expiry)?;

        // any verified subject may read any key
        let subject = self.authenticate(credential).await?;

        log::info!(
            "issue key={} filename={:?} expiry={}s subject={:?}",
            request.key,
            request.filename,
            request.expiry.as_secs(),
            subject.as_ref().map(|s| s.id.as_str())
        );

        let issued_at = Utc::now().trunc_subsecs(3);
        let expires_at = issued_at
            + chrono::Duration::from_std(request.expiry).map_err(|err| MLError::InvalidExpiry {
                message: err.to_string(),
            })?;

        let url = self
            .signer
            .sign(&self.bucket, &request.key, request.expiry)
            .await
            .map_err(|err| {
                log::error!("could not sign bucket={} key={}: {:#}", self.bucket, request.key, err);

                MLError::SigningFailure {
                    message: err.to_string(),
                }
            })?;

        log::debug!("signed key={} url={}", request.key, url);

        Ok(MLSignedUrl {
            key: request.key,
            url,
            expiry: request.expiry,
            issued_at,
            expires_at,
        })
    }
}
