//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] docvault_core::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Request body exceeded the transport limit before reaching a service.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use docvault_core::Error as E;
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Core(err) => match err {
                E::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                E::Conflict(_) => StatusCode::CONFLICT,
                E::UnsupportedType(_) => StatusCode::BAD_REQUEST,
                E::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                E::NotFound(_) => StatusCode::NOT_FOUND,
                E::Upload(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Core(err) => err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let kind = self.kind();

        let message = match &self {
            ApiError::Core(docvault_core::Error::Upload(_)) => {
                error!(error = %self, "Remote object store failure");
                "Failed to upload file to remote storage".to_string()
            }
            _ if status.is_server_error() => {
                error!(error = %self, kind, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::Core(err) => client_message(err),
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg) => msg.clone(),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

/// Message shown to the client for a 4xx core error, without the variant prefix.
fn client_message(err: &docvault_core::Error) -> String {
    use docvault_core::Error as E;
    match err {
        E::Validation(msg) | E::Conflict(msg) | E::NotFound(msg) => msg.clone(),
        E::UnsupportedType(msg) => format!("Unsupported file type: {}", msg),
        E::PayloadTooLarge { max, .. } => {
            format!("File too large. Maximum size is {} MB", max / (1024 * 1024))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::Error;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::Conflict("x".into()), StatusCode::CONFLICT),
            (Error::UnsupportedType("x".into()), StatusCode::BAD_REQUEST),
            (
                Error::PayloadTooLarge { size: 2, max: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Upload("x".into()), StatusCode::BAD_GATEWAY),
            (
                Error::Persistence("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_server_error_body_is_generic() {
        let response =
            ApiError::from(Error::Persistence("password=hunter2".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["kind"], "persistence_error");
    }
}
