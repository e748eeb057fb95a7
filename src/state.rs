use crate::configs::MLConfig;
use crate::error::MLError;
use crate::identity::create_identity_using_factory;
use crate::issuer::MLIssuer;
use crate::signer::create_signer_using_factory;
use std::sync::Arc;

pub type MLStateRef = Arc<MLState>;

/// Built once at startup and shared read-only by every request.
pub struct MLState {
    config: MLConfig,

    issuer: MLIssuer,
}

impl MLState {
    pub fn new(config: MLConfig, issuer: MLIssuer) -> Self {
        MLState { config, issuer }
    }

    pub async fn try_new(config: MLConfig) -> Result<Self, MLError> {
        let signer =
            create_signer_using_factory(&config.signer.kind, &config.signer.options).await?;

        let identity = match config.identity.as_ref() {
            Some(identity) => Some(
                create_identity_using_factory(&identity.kind, identity.options.clone()).await?,
            ),
            None => None,
        };

        let issuer = MLIssuer::try_new(
            signer,
            identity,
            config.bucket.clone(),
            config.expiry.default_duration()?,
            config.expiry.max_duration()?,
        )?;

        log::info!(
            "signer={} bucket={} authentication={} max_expiry={}s",
            config.signer.kind,
            config.bucket,
            issuer.requires_authentication(),
            issuer.max_expiry().as_secs()
        );

        Ok(MLState::new(config, issuer))
    }

    pub fn get_config(&self) -> &MLConfig {
        &self.config
    }

    pub fn get_issuer(&self) -> &MLIssuer {
        &self.issuer
    }
}

#[cfg(test)]
mod tests {
    use crate::configs::MLConfig;
    use crate::identities::fixed::MLFixedIdentityFactory;
    use crate::identity::register_identity_factory;
    use crate::signer::register_signer_factory;
    use crate::signers::mock::MLMockSignerFactory;
    use crate::state::MLState;

    #[tokio::test]
    async fn test_state_from_config() {
        register_signer_factory("mock", Box::new(MLMockSignerFactory::new())).await;
        register_identity_factory("static", Box::new(MLFixedIdentityFactory::new())).await;

        let config = MLConfig::parse(
            r#"
version: 1
listen: 127.0.0.1:3000
bucket: media
signer:
  kind: mock
identity:
  kind: static
  options:
    tokens:
      student-token: student-1
expiry:
  default: 10m
  max: 30d
"#,
        )
        .unwrap();

        let state = MLState::try_new(config).await.unwrap();
        let issuer = state.get_issuer();

        assert!(issuer.requires_authentication());
        assert_eq!(issuer.max_expiry().as_secs(), 7 * 24 * 3600);
        assert_eq!(state.get_config().bucket, "media");
    }

    #[tokio::test]
    async fn test_state_with_unknown_signer() {
        let config = MLConfig::parse(
            r#"
version: 1
listen: 127.0.0.1:3000
bucket: media
signer:
  kind: ftp
"#,
        )
        .unwrap();

        assert!(MLState::try_new(config).await.is_err());
    }
}
