use crate::context::CallContext;
use crate::endpoint::{Operation, Target};
use crate::error::{Error, Result};
use crate::models::ErrorResponse;
use crate::transport::{HttpTransport, RawResponse, Request, Transport};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the Kafka Connect REST API as used to manage Debezium
/// connectors.
///
/// Holds no per-call state: clone it or share it behind an `Arc` and call it
/// from as many tasks as needed. Nothing is retried; every failure is
/// returned to the caller.
#[derive(Clone)]
pub struct DebeziumClient {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
}

impl DebeziumClient {
    /// Create a client for the Connect cluster at `base_url`, with `timeout`
    /// bounding every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = HttpTransport::new(base_url, timeout)?;
        let base_url = transport.base_url().to_string();
        Ok(Self {
            transport: Arc::new(transport),
            base_url: Some(base_url),
        })
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: None,
        }
    }

    /// Base URL of the Connect cluster, when built with [`DebeziumClient::new`].
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Send one request for `operation` and check its status against the
    /// operation's success set.
    pub(crate) async fn execute(
        &self,
        ctx: &CallContext,
        operation: Operation,
        target: Target<'_>,
        query: Option<(&str, &str)>,
        body: Option<Bytes>,
    ) -> Result<RawResponse> {
        let mut request = Request::new(operation.method(), operation.path(&target));
        if let Some((key, value)) = query {
            request = request.with_query(key, value);
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }

        debug!(
            operation = %operation,
            method = %request.method,
            path = %request.path(),
            "Executing Connect operation"
        );

        let response = self
            .transport
            .send(ctx, request)
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        debug!(operation = %operation, status = %response.status, "Connect responded");

        if operation.accepts(response.status) {
            Ok(response)
        } else {
            Err(api_error(operation, &response))
        }
    }
}

impl fmt::Debug for DebeziumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebeziumClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

pub(crate) fn validate_connector_name(operation: Operation, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::EmptyConnectorName { operation });
    }
    // URL normalization resolves dot segments, which would address another resource.
    if name == "." || name == ".." {
        return Err(Error::InvalidConnectorName {
            operation,
            name: name.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn encode<T: Serialize + ?Sized>(operation: Operation, body: &T) -> Result<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|source| Error::Encode { operation, source })
}

pub(crate) fn decode<T: DeserializeOwned>(operation: Operation, response: &RawResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|source| Error::Decode {
        operation,
        status: response.status,
        source,
    })
}

/// Turn a non-success response into an API error using its JSON error body.
fn api_error(operation: Operation, response: &RawResponse) -> Error {
    match serde_json::from_slice::<ErrorResponse>(&response.body) {
        Ok(body) => {
            warn!(
                operation = %operation,
                status = %response.status,
                error_code = body.error_code,
                message = %body.message,
                "Connect rejected request"
            );
            Error::Api {
                operation,
                status: response.status,
                error_code: body.error_code,
                message: body.message,
            }
        }
        Err(source) => {
            warn!(
                operation = %operation,
                status = %response.status,
                "Connect returned an unreadable error body"
            );
            Error::ErrorBody {
                operation,
                status: response.status,
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_validate_connector_name() {
        assert!(validate_connector_name(Operation::GetConnector, "pg").is_ok());
        assert!(validate_connector_name(Operation::GetConnector, "").is_err());
        assert!(validate_connector_name(Operation::GetConnector, " \t\n").is_err());
        assert!(matches!(
            validate_connector_name(Operation::GetConnector, ".."),
            Err(Error::InvalidConnectorName { .. })
        ));
        assert!(validate_connector_name(Operation::GetConnector, "...").is_ok());
        assert!(validate_connector_name(Operation::GetConnector, "a.b").is_ok());
    }

    #[test]
    fn test_api_error_uses_message_verbatim() {
        let response = RawResponse::new(
            StatusCode::CONFLICT,
            r#"{"error_code":409,"message":"Connector pg already exists"}"#,
        );
        match api_error(Operation::CreateConnector, &response) {
            Error::Api {
                status,
                error_code,
                message,
                ..
            } => {
                assert_eq!(status, StatusCode::CONFLICT);
                assert_eq!(error_code, 409);
                assert_eq!(message, "Connector pg already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_with_malformed_body() {
        let response = RawResponse::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        let err = api_error(Operation::ListConnectors, &response);
        assert!(matches!(err, Error::ErrorBody { .. }));
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_client_new_strips_trailing_slash() {
        let client = DebeziumClient::new("http://connect:8083/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), Some("http://connect:8083"));
    }
}
