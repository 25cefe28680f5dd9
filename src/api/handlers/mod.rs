use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Json, Response},
};

use crate::api::models::HealthResponse;
use crate::database::StatsStore;
use crate::errors::ApiError;

pub mod players;
pub mod summary;
pub mod tournaments;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatsStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }
}

/// Query string values by name. A repeated key keeps its first value, and a
/// malformed query string is rejected with a JSON error body.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut values = HashMap::new();
        for (key, value) in pairs {
            values.entry(key).or_insert(value);
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(version) => Json(HealthResponse { ok: true, version }).into_response(),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            let body = serde_json::json!({ "ok": false, "error": e.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
