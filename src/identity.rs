use anyhow::{anyhow, Error};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type MLIdentityRef = Arc<dyn MLIdentity>;

#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum MLIdentityError {
    #[error("unauthorized: {message}")]
    UNAUTHORIZED { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MLSubject {
    pub id: String,
}

static IDENTITY_FACTORIES: Lazy<Mutex<HashMap<String, Box<dyn MLIdentityFactory>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[async_trait]
pub trait MLIdentity: Send + Sync {
    async fn validate(&self, token: &str) -> Result<MLSubject, Error>;
}

#[async_trait]
pub trait MLIdentityFactory: Send + Sync {
    async fn create(&self, options: serde_yaml::Value) -> Result<MLIdentityRef, Error>;
}

pub async fn register_identity_factory(name: &str, factory: Box<dyn MLIdentityFactory>) {
    let mut factories = IDENTITY_FACTORIES.lock().await;
    factories.insert(name.to_string(), factory);
}

pub async fn create_identity_using_factory(
    name: &str,
    options: serde_yaml::Value,
) -> Result<MLIdentityRef, Error> {
    let factories = IDENTITY_FACTORIES.lock().await;
    let factory = factories
        .get(name)
        .ok_or_else(|| anyhow!("could not get identity factory: {}", name))?;
    let identity = factory.create(options).await?;
    Ok(identity)
}

static BEARER_AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the token of a bearer authorization header; other schemes count as absent.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization
        .and_then(|authorization| authorization.strip_prefix(BEARER_AUTHORIZATION_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::identity::bearer_token;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
