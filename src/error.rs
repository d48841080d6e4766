//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error")
            }
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid input")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Return simple HTML error page
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><title>{} - NetClair</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 50px;">
    <h1>{}</h1>
    <p>{}</p>
    <a href="/">Retour à l'accueil</a>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            message
        );

        (status, axum::response::Html(html)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// JSON-facing wrapper for the same failures, used by the API routes
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        let body = match &self.0 {
            AppError::Validation(msg) => msg.clone(),
            _ => message.to_string(),
        };
        (status, Json(serde_json::json!({ "error": body }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
