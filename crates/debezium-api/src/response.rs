use axum::{http::StatusCode, response::IntoResponse, Json};
use debezium_client::{Error as ClientError, ErrorKind};
use serde::Serialize;
use std::error::Error as StdError;

/// Standard API response structure
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub message: String,
    pub code: String,
    pub errors: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            code: "SUCCESS".to_string(),
            errors: vec![],
        }
    }

    /// Create a successful response for a newly created resource
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            code: "CREATED".to_string(),
            errors: vec![],
        }
    }

    /// Create a successful response without data
    pub fn success_no_data(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            data: None,
            message: message.into(),
            code: "SUCCESS".to_string(),
            errors: vec![],
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            code: code.into(),
            errors,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error("BAD_REQUEST", message, vec![])
    }

    /// Map a Connect client failure onto a gateway response.
    ///
    /// Remote 404/409 pass through, other remote 4xx become 400, and remote
    /// 5xx, unreadable bodies and network failures become 502 (504 on
    /// timeout).
    pub fn from_client_error(err: &ClientError) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => "BAD_REQUEST",
            ErrorKind::Api => match err.status() {
                Some(StatusCode::NOT_FOUND) => "NOT_FOUND",
                Some(StatusCode::CONFLICT) => "CONFLICT",
                Some(status) if status.is_client_error() => "BAD_REQUEST",
                _ => "BAD_GATEWAY",
            },
            ErrorKind::Transport if err.is_timeout() => "GATEWAY_TIMEOUT",
            ErrorKind::Transport | ErrorKind::Decode => "BAD_GATEWAY",
            ErrorKind::Configuration => "INTERNAL_ERROR",
        };

        let mut errors = vec![];
        let mut source = StdError::source(err);
        while let Some(cause) = source {
            errors.push(cause.to_string());
            source = cause.source();
        }

        Self::error(code, err.to_string(), errors)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "SUCCESS" => StatusCode::OK,
            "CREATED" => StatusCode::CREATED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            "BAD_GATEWAY" => StatusCode::BAD_GATEWAY,
            "GATEWAY_TIMEOUT" => StatusCode::GATEWAY_TIMEOUT,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}
