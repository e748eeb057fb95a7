use crate::error::MLError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::time::Duration;

pub const DEFAULT_EXPIRY: &str = "1h";
pub const DEFAULT_MAX_EXPIRY: &str = "7d";

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MLSignerConfig {
    pub kind: String,

    #[serde(default)]
    pub options: HashMap<String, String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MLIdentityConfig {
    pub kind: String,

    #[serde(default)]
    pub options: serde_yaml::Value,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MLExpiryConfig {
    #[serde(default = "default_expiry")]
    pub default: String,

    #[serde(default = "default_max_expiry")]
    pub max: String,
}

impl Default for MLExpiryConfig {
    fn default() -> Self {
        MLExpiryConfig {
            default: default_expiry(),
            max: default_max_expiry(),
        }
    }
}

impl MLExpiryConfig {
    pub fn default_duration(&self) -> Result<Duration, MLError> {
        parse_duration("expiry.default", &self.default)
    }

    pub fn max_duration(&self) -> Result<Duration, MLError> {
        parse_duration("expiry.max", &self.max)
    }
}

fn default_expiry() -> String {
    DEFAULT_EXPIRY.into()
}

fn default_max_expiry() -> String {
    DEFAULT_MAX_EXPIRY.into()
}

fn parse_duration(name: &str, value: &str) -> Result<Duration, MLError> {
    duration_str::parse(value).map_err(|err| MLError::Common {
        message: format!("could not parse {}={}: {}", name, value, err),
    })
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MLConfig {
    pub version: i32,
    pub listen: String,
    pub bucket: String,

    pub signer: MLSignerConfig,

    pub identity: Option<MLIdentityConfig>,

    #[serde(default)]
    pub expiry: MLExpiryConfig,
}

impl MLConfig {
    pub fn from_file(path: &str) -> Result<Self, MLError> {
        let f = File::open(path)?;
        let config: MLConfig = serde_yaml::from_reader(f)?;

        Ok(config.with_env_overrides())
    }

    pub fn parse(source: &str) -> Result<Self, MLError> {
        let config: MLConfig = serde_yaml::from_str(source)?;

        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(listen) = env::var("MEDIALINK_LISTEN") {
            self.listen = listen;
        }
        if let Ok(bucket) = env::var("MEDIALINK_BUCKET") {
            self.bucket = bucket;
        }

        self
    }
}
