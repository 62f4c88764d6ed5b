use std::borrow::Cow;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use sm_common::ConfigError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();

        error!(code, status = %status, error = %self, "api_error");

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Config(_) => "config_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'_, str> {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => Cow::Borrowed(msg),
            ApiError::Config(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn renders_code_and_message() {
        let response = ApiError::NotFound("job catalog is empty".into()).into_response();

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::NOT_FOUND);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "not_found");
        assert_eq!(json["message"], "job catalog is empty");
    }

    #[tokio::test]
    async fn hides_internal_details() {
        let err = ApiError::from(ConfigError::DuplicateJob("Backend".into()));
        let response = err.into_response();

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "config_error");
        assert_eq!(json["message"], "internal server error");
    }
}
