use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned from request handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(anyhow::Error),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = match self {
            Self::BadRequest(e) | Self::Internal(e) => e,
        };

        if status.is_server_error() {
            log::error!("Request failed: {:#}", err);
        }

        (status, Json(json!({ "error": format!("{:#}", err) }))).into_response()
    }
}

impl AppError {
    pub fn bad_multipart(err: MultipartError) -> Self {
        Self::BadRequest(anyhow::Error::new(err).context("Malformed multipart upload"))
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
