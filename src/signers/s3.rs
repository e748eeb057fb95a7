use crate::signer::{option_or_env, trim_object, MLSigner, MLSignerFactory, MLSignerRef};
use anyhow::Error;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{Client, Config};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub struct MLS3Signer {
    client: Client,
}

impl MLS3Signer {
    pub async fn try_new(options: &HashMap<String, String>) -> Result<Self, Error> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(endpoint) = option_or_env(options, "AWS_ENDPOINT_URL") {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(accesskey), Some(secretkey)) = (
            option_or_env(options, "AWS_ACCESS_KEY_ID"),
            option_or_env(options, "AWS_SECRET_ACCESS_KEY"),
        ) {
            loader = loader.credentials_provider(Credentials::new(
                accesskey,
                secretkey,
                None,
                None,
                "medialink",
            ));
        }
        if let Some(region) = option_or_env(options, "AWS_REGION") {
            let provider = RegionProviderChain::first_try(Region::new(region))
                .or_default_provider()
                .or_else(Region::new("us-east-1"));
            loader = loader.region(provider);
        } else {
            let provider = RegionProviderChain::default_provider().or_else(Region::new("us-east-1"));
            loader = loader.region(provider);
        }

        let config = loader.load().await;

        let force_path_style = option_or_env(options, "AWS_FORCE_PATH_STYLE")
            .map(|v| v.parse::<bool>())
            .transpose()?
            .unwrap_or(false);

        let config = Builder::from(&config)
            .force_path_style(force_path_style)
            .build();

        Ok(MLS3Signer::from_conf(config))
    }

    pub fn from_conf(config: Config) -> Self {
        MLS3Signer {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl MLSigner for MLS3Signer {
    async fn sign(&self, bucket: &str, object: &str, expires: Duration) -> Result<String, Error> {
        let presigned_request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(trim_object(object))
            .presigned(PresigningConfig::expires_in(expires)?)
            .await?;

        Ok(presigned_request.uri().to_string())
    }
}

pub struct MLS3SignerFactory {}

impl MLS3SignerFactory {
    pub fn new() -> Self {
        MLS3SignerFactory {}
    }
}

#[async_trait]
impl MLSignerFactory for MLS3SignerFactory {
    async fn create(&self, options: &HashMap<String, String>) -> Result<MLSignerRef, Error> {
        Ok(Arc::new(MLS3Signer::try_new(options).await?))
    }
}

#[cfg(test)]
mod tests {
    use crate::signer::MLSigner;
    use crate::signers::s3::MLS3Signer;
    use aws_credential_types::Credentials;
    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use aws_sdk_s3::Config;
    use std::time::Duration;

    fn create_signer() -> MLS3Signer {
        let config = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url("https://account.r2.cloudflarestorage.com")
            .credentials_provider(Credentials::new(
                "accesskey",
                "secretkey",
                None,
                None,
                "test",
            ))
            .force_path_style(true)
            .build();

        MLS3Signer::from_conf(config)
    }

    #[tokio::test]
    async fn test_presigned_get_object() {
        let signer = create_signer();

        let url = signer
            .sign("media", "/lessons/42/video.mp4", Duration::from_secs(3600))
            .await
            .unwrap();

        assert!(url.starts_with("https://account.r2.cloudflarestorage.com/media/lessons/42/video.mp4?"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(!url.contains("secretkey"));
    }

    #[tokio::test]
    async fn test_presigned_expiry_over_a_week() {
        let signer = create_signer();

        let res = signer
            .sign("media", "lessons/42/video.mp4", Duration::from_secs(8 * 24 * 3600))
            .await;

        assert!(res.is_err());
    }
}
