use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::Value;
use tracing::error;

use crate::{not_found::NotFoundTemplate, ApiError};

const ERROR_CODES: &str = include_str!("error-code.json");

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                let body = NotFoundTemplate
                    .render()
                    .unwrap_or_else(|_| "Not Found".to_string());
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, message).into_response()
            }
            ApiError::ClientError(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(error_code, "{:?}", e);
            to_api_error(error_code)
        })
    }
}

impl<T> IntoApiResponse<T> for askama::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(error_code, "{:?}", e);
            to_api_error(error_code)
        })
    }
}

/// Renders an askama template into an HTML response body.
pub fn render<T: Template>(template: &T) -> ApiResponse<Html<String>> {
    Ok(Html(template.render().into_response("500-012")?))
}

fn to_api_error(error_code: &str) -> ApiError {
    let message = error_message(error_code);

    match error_code.as_bytes().first() {
        Some(&b'4') => ApiError::ClientError(message),
        _ => ApiError::ServerError(message),
    }
}

fn error_message(error_code: &str) -> String {
    serde_json::from_str::<Value>(ERROR_CODES)
        .ok()
        .and_then(|errors| {
            errors
                .get(error_code)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unexpected error".to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_codes_map_to_status_class() {
        // Arrange
        let client: anyhow::Result<()> = Err(anyhow::anyhow!("bad input"));
        let server: anyhow::Result<()> = Err(anyhow::anyhow!("db down"));

        // Act
        let client = client.into_response("400-001");
        let server = server.into_response("500-001");

        // Assert
        assert!(matches!(
            client,
            Err(ApiError::ClientError(message)) if message == "invalid request"
        ));
        assert!(matches!(
            server,
            Err(ApiError::ServerError(message))
                if message == "failed to load posts"
        ));
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(error_message("599-999"), "unexpected error");
    }
}
