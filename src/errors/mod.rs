use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mongodb::bson;

/// Failures raised while talking to the statistics store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No connection string configured.
    #[error("MONGODB_URI is not set")]
    MissingUri,

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("failed to decode aggregation row: {0}")]
    Decode(#[from] bson::de::Error),
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("id_torneio inválido")]
    InvalidTournamentId,

    #[error("parâmetros de consulta inválidos: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Store(#[from] DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTournamentId | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
