use anyhow::{anyhow, Error};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type MLSignerRef = Arc<dyn MLSigner>;

static SIGNER_FACTORIES: Lazy<Mutex<HashMap<String, Box<dyn MLSignerFactory>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// SigV4 refuses presigned requests valid for longer than a week.
pub const MAX_PRESIGNED_EXPIRY: Duration = Duration::from_secs(7 * 24 * 3600);

#[async_trait]
pub trait MLSigner: Send + Sync {
    async fn sign(&self, bucket: &str, object: &str, expires: Duration) -> Result<String, Error>;

    fn max_expiry(&self) -> Duration {
        MAX_PRESIGNED_EXPIRY
    }
}

#[async_trait]
pub trait MLSignerFactory: Send + Sync {
    async fn create(&self, options: &HashMap<String, String>) -> Result<MLSignerRef, Error>;
}

pub async fn register_signer_factory(name: &str, factory: Box<dyn MLSignerFactory>) {
    let mut factories = SIGNER_FACTORIES.lock().await;
    factories.insert(name.to_string(), factory);
}

pub async fn create_signer_using_factory(
    name: &str,
    options: &HashMap<String, String>,
) -> Result<MLSignerRef, Error> {
    let factories = SIGNER_FACTORIES.lock().await;
    let factory = factories
        .get(name)
        .ok_or_else(|| anyhow!("could not get signer factory: {}", name))?;
    let signer = factory.create(options).await?;
    Ok(signer)
}

/// Looks up a signer option, falling back to the same-named environment variable.
pub fn option_or_env(options: &HashMap<String, String>, name: &str) -> Option<String> {
    options
        .get(name)
        .cloned()
        .or_else(|| env::var(name).ok())
        .filter(|value| !value.is_empty())
}

pub fn trim_object(object: &str) -> &str {
    object.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use crate::signer::{option_or_env, trim_object};
    use std::collections::HashMap;

    #[test]
    fn test_option_or_env() {
        let mut options = HashMap::new();
        options.insert("MEDIALINK_TEST_OPTION".to_string(), "from-config".to_string());
        options.insert("MEDIALINK_TEST_EMPTY".to_string(), "".to_string());

        assert_eq!(
            option_or_env(&options, "MEDIALINK_TEST_OPTION").as_deref(),
            Some("from-config")
        );
        assert_eq!(option_or_env(&options, "MEDIALINK_TEST_EMPTY"), None);
        assert_eq!(option_or_env(&options, "MEDIALINK_TEST_UNSET_OPTION"), None);
    }

    #[test]
    fn test_trim_object() {
        assert_eq!(trim_object("/lessons/42/video.mp4"), "lessons/42/video.mp4");
        assert_eq!(trim_object("lessons/42/video.mp4"), "lessons/42/video.mp4");
    }
}
