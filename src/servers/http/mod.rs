use crate::errors::axum::{MLErrorBody, MLRejection};
use crate::identity::bearer_token;
use crate::media;
use crate::request::{MLSignPayload, MLSignedUrlBody};
use crate::state::{MLState, MLStateRef};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

pub mod server;

#[derive(Debug, Deserialize)]
pub struct MLMediaQuery {
    pub key: Option<String>,
}

pub fn router(state: MLStateRef) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/api/r2-sign", get(sign_query).post(sign_json))
        .route("/api/sign-download", get(sign_query))
        .route("/sign-download", post(sign_json))
        .route("/media-info", get(media_info))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

fn credential(headers: &HeaderMap) -> Option<&str> {
    bearer_token(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    )
}

async fn issue(state: &MLState, headers: &HeaderMap, payload: MLSignPayload) -> Response {
    match state.get_issuer().issue(&payload, credential(headers)).await {
        Ok(signed) => Json(MLSignedUrlBody::from(signed)).into_response(),
        Err(err) => {
            log::info!("could not issue key={:?}: {}", payload.key, err);

            err.into_response()
        }
    }
}

async fn sign_query(
    State(state): State<MLStateRef>,
    headers: HeaderMap,
    query: Result<Query<MLSignPayload>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(payload)) => issue(&state, &headers, payload).await,
        Err(rejection) => MLRejection::from(rejection).into_response(),
    }
}

async fn sign_json(
    State(state): State<MLStateRef>,
    headers: HeaderMap,
    payload: Result<Json<MLSignPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => issue(&state, &headers, payload).await,
        Err(rejection) => MLRejection::from(rejection).into_response(),
    }
}

async fn media_info(
    State(state): State<MLStateRef>,
    headers: HeaderMap,
    query: Result<Query<MLMediaQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return MLRejection::from(rejection).into_response(),
    };

    let info = match media::describe(query.key.as_deref()) {
        Ok(info) => info,
        Err(err) => return err.into_response(),
    };

    match state.get_issuer().authenticate(credential(&headers)).await {
        Ok(_) => Json(info).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health() -> Response {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
    .into_response()
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MLErrorBody {
            error: "Not found".into(),
            details: None,
        }),
    )
        .into_response()
}
