use crate::signer::{trim_object, MLSigner, MLSignerFactory, MLSignerRef};
use anyhow::Error;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Hands out unsigned, look-alike URLs for local development.
pub struct MLMockSigner {
    base: Url,
}

impl MLMockSigner {
    pub fn try_new(options: &HashMap<String, String>) -> Result<Self, Error> {
        let base = match options.get("url") {
            Some(url) => Url::parse(url)?,
            None => Url::parse("https://example.com")?,
        };

        Ok(MLMockSigner { base })
    }
}

#[async_trait]
impl MLSigner for MLMockSigner {
    async fn sign(&self, bucket: &str, object: &str, expires: Duration) -> Result<String, Error> {
        let expires_at = Utc::now() + chrono::Duration::from_std(expires)?;

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("could not use {} as a base url", self.base))?
            .pop_if_empty()
            .push(bucket)
            .extend(trim_object(object).split('/'));
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.timestamp_millis().to_string())
            .append_pair("nonce", &Uuid::new_v4().to_string());

        Ok(url.to_string())
    }
}

pub struct MLMockSignerFactory {}

impl MLMockSignerFactory {
    pub fn new() -> Self {
        MLMockSignerFactory {}
    }
}

#[async_trait]
impl MLSignerFactory for MLMockSignerFactory {
    async fn create(&self, options: &HashMap<String, String>) -> Result<MLSignerRef, Error> {
        Ok(Arc::new(MLMockSigner::try_new(options)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::signer::MLSigner;
    use crate::signers::mock::MLMockSigner;
    use std::collections::HashMap;
    use std::time::Duration;
    use url::Url;

    #[tokio::test]
    async fn test_mock_sign() {
        let signer = MLMockSigner::try_new(&HashMap::new()).unwrap();

        let url = signer
            .sign("media", "lessons/42/video.mp4", Duration::from_secs(3600))
            .await
            .unwrap();
        let url = Url::parse(&url).unwrap();

        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/media/lessons/42/video.mp4");
        assert!(url.query_pairs().any(|(k, _)| k == "expires"));
        assert!(url.query_pairs().any(|(k, _)| k == "nonce"));
    }

    #[tokio::test]
    async fn test_mock_sign_twice() {
        let mut options = HashMap::new();
        options.insert("url".to_string(), "http://localhost:9000/".to_string());
        let signer = MLMockSigner::try_new(&options).unwrap();

        let url0 = signer
            .sign("media", "/audio/track1.mp3", Duration::from_secs(60))
            .await
            .unwrap();
        let url1 = signer
            .sign("media", "/audio/track1.mp3", Duration::from_secs(60))
            .await
            .unwrap();

        assert_ne!(url0, url1);
        assert_eq!(
            Url::parse(&url0).unwrap().path(),
            Url::parse(&url1).unwrap().path()
        );
        assert!(url0.starts_with("http://localhost:9000/media/audio/track1.mp3?"));
    }
}
