use crate::identity::{MLIdentity, MLIdentityError, MLIdentityFactory, MLIdentityRef, MLSubject};
use anyhow::{anyhow, Error};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MLFixedIdentityOptions {
    #[serde(default)]
    tokens: HashMap<String, String>,
}

/// Accepts a fixed set of tokens, each mapped to a subject id.
pub struct MLFixedIdentity {
    tokens: HashMap<String, String>,
}

impl MLFixedIdentity {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        MLFixedIdentity { tokens }
    }

    pub fn try_new(options: serde_yaml::Value) -> Result<Self, Error> {
        let options: MLFixedIdentityOptions = if options.is_null() {
            MLFixedIdentityOptions::default()
        } else {
            serde_yaml::from_value(options)?
        };

        Ok(MLFixedIdentity::new(options.tokens))
    }
}

#[async_trait]
impl MLIdentity for MLFixedIdentity {
    async fn validate(&self, token: &str) -> Result<MLSubject, Error> {
        match self.tokens.get(token) {
            Some(id) => Ok(MLSubject { id: id.clone() }),
            None => Err(anyhow!(MLIdentityError::UNAUTHORIZED {
                message: "unknown token".into()
            })),
        }
    }
}

pub struct MLFixedIdentityFactory {}

impl MLFixedIdentityFactory {
    pub fn new() -> Self {
        MLFixedIdentityFactory {}
    }
}

#[async_trait]
impl MLIdentityFactory for MLFixedIdentityFactory {
    async fn create(&self, options: serde_yaml::Value) -> Result<MLIdentityRef, Error> {
        Ok(Arc::new(MLFixedIdentity::try_new(options)?))
    }
}
