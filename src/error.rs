use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FasterApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session {0} is closed")]
    SessionClosed(u64),

    #[error("Ingredient not found with id: {0}")]
    IngredientNotFound(i64),

    #[error("HTTP body error: {0}")]
    Http(#[from] axum::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FasterApiError>;

impl FasterApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FasterApiError::IngredientNotFound(_) => StatusCode::NOT_FOUND,
            FasterApiError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FasterApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
