use crate::commons::url::join_endpoint;
use crate::signer::{option_or_env, trim_object, MLSigner, MLSignerFactory, MLSignerRef};
use anyhow::{anyhow, Error};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MLWorkerRequest<'a> {
    bucket: &'a str,
    key: &'a str,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MLWorkerResponse {
    signed_url: Option<String>,
    url: Option<String>,
}

/// Delegates signing to a remote worker that holds the store credentials.
pub struct MLWorkerSigner {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl MLWorkerSigner {
    pub fn try_new(options: &HashMap<String, String>) -> Result<Self, Error> {
        let url = option_or_env(options, "WORKER_URL")
            .ok_or_else(|| anyhow!("WORKER_URL is required for the worker signer"))?;
        let endpoint = join_endpoint(&url, "sign-download")?;

        let timeout = match option_or_env(options, "WORKER_TIMEOUT") {
            Some(timeout) => duration_str::parse(&timeout)
                .map_err(|err| anyhow!("could not parse WORKER_TIMEOUT: {}", err))?,
            None => Duration::from_secs(10),
        };

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(MLWorkerSigner {
            client,
            endpoint,
            token: option_or_env(options, "WORKER_TOKEN"),
        })
    }
}

#[async_trait]
impl MLSigner for MLWorkerSigner {
    async fn sign(&self, bucket: &str, object: &str, expires: Duration) -> Result<String, Error> {
        let mut request = self.client.post(self.endpoint.clone()).json(&MLWorkerRequest {
            bucket,
            key: trim_object(object),
            expires_in: expires.as_secs(),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("worker returned {}: {}", status, text));
        }

        let response: MLWorkerResponse = response.json().await?;

        response
            .signed_url
            .or(response.url)
            .ok_or_else(|| anyhow!("worker response has no signed url"))
    }
}

pub struct MLWorkerSignerFactory {}

impl MLWorkerSignerFactory {
    pub fn new() -> Self {
        MLWorkerSignerFactory {}
    }
}

#[async_trait]
impl MLSignerFactory for MLWorkerSignerFactory {
    async fn create(&self, options: &HashMap<String, String>) -> Result<MLSignerRef, Error> {
        Ok(Arc::new(MLWorkerSigner::try_new(options)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::signer::MLSigner;
    use crate::signers::worker::MLWorkerSigner;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn spawn_worker() -> String {
        async fn sign_download(
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            if headers.get("authorization").and_then(|v| v.to_str().ok())
                != Some("Bearer worker-token")
            {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "denied"})));
            }
            if body["key"] == "missing.mp4" {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "boom"})),
                );
            }

            (
                StatusCode::OK,
                Json(json!({
                    "signedUrl": format!(
                        "https://media.example.com/{}/{}?signed=true&expires={}",
                        body["bucket"].as_str().unwrap(),
                        body["key"].as_str().unwrap(),
                        body["expiresIn"]
                    ),
                    "key": body["key"],
                    "expiresIn": body["expiresIn"],
                })),
            )
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/sign-download", post(sign_download))
            .route("/api/sign-download", post(sign_download));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/", addr)
    }

    fn create_signer(url: String, token: Option<&str>) -> MLWorkerSigner {
        let mut options = HashMap::new();
        options.insert("WORKER_URL".to_string(), url);
        if let Some(token) = token {
            options.insert("WORKER_TOKEN".to_string(), token.to_string());
        }

        MLWorkerSigner::try_new(&options).unwrap()
    }

    #[tokio::test]
    async fn test_worker_sign() {
        let signer = create_signer(spawn_worker().await, Some("worker-token"));

        let url = signer
            .sign("media", "/lessons/42/video.mp4", Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://media.example.com/media/lessons/42/video.mp4?signed=true&expires=600"
        );
    }

    #[tokio::test]
    async fn test_worker_failures() {
        let url = spawn_worker().await;

        let signer = create_signer(url.clone(), None);
        let res = signer
            .sign("media", "lessons/42/video.mp4", Duration::from_secs(600))
            .await;
        assert!(res.is_err());

        let signer = create_signer(url, Some("worker-token"));
        let res = signer
            .sign("media", "missing.mp4", Duration::from_secs(600))
            .await;
        assert!(res.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_worker_base_path() {
        let url = spawn_worker().await;
        let signer = create_signer(format!("{}api", url), Some("worker-token"));

        let url = signer
            .sign("media", "audio/track1.mp3", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(url.ends_with("/media/audio/track1.mp3?signed=true&expires=60"));
    }
}
