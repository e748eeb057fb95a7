use crate::commons::url::join_endpoint;
use crate::identity::{MLIdentity, MLIdentityError, MLIdentityFactory, MLIdentityRef, MLSubject};
use anyhow::{anyhow, Error};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MLSupabaseIdentityOptions {
    url: String,
    api_key: String,
    timeout: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MLSupabaseUser {
    id: String,
}

/// Validates access tokens against the Supabase auth server.
pub struct MLSupabaseIdentity {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl MLSupabaseIdentity {
    pub fn try_new(options: serde_yaml::Value) -> Result<Self, Error> {
        let options: MLSupabaseIdentityOptions = serde_yaml::from_value(options)?;

        let endpoint = join_endpoint(&options.url, "auth/v1/user")?;
        let timeout = match options.timeout.as_deref() {
            Some(timeout) => duration_str::parse(timeout)
                .map_err(|err| anyhow!("could not parse timeout: {}", err))?,
            None => Duration::from_secs(10),
        };

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(MLSupabaseIdentity {
            client,
            endpoint,
            api_key: options.api_key,
        })
    }
}

#[async_trait]
impl MLIdentity for MLSupabaseIdentity {
    async fn validate(&self, token: &str) -> Result<MLSubject, Error> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(MLIdentityError::UNAUTHORIZED {
                message: format!("auth server returned {}", status)
            }));
        }

        let user: MLSupabaseUser = response.json().await?;

        Ok(MLSubject { id: user.id })
    }
}

pub struct MLSupabaseIdentityFactory {}

impl MLSupabaseIdentityFactory {
    pub fn new() -> Self {
        MLSupabaseIdentityFactory {}
    }
}

#[async_trait]
impl MLIdentityFactory for MLSupabaseIdentityFactory {
    async fn create(&self, options: serde_yaml::Value) -> Result<MLIdentityRef, Error> {
        Ok(Arc::new(MLSupabaseIdentity::try_new(options)?))
    }
}
