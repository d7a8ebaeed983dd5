use crate::context::CallContext;
use crate::error::{Error, Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use std::time::Duration;

const APPLICATION_JSON: &str = "application/json";

/// One request to the Connect REST API, relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Unencoded path segments; the transport escapes each one.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Bytes>,
}

impl Request {
    pub fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Path and query as they would appear on the wire, for logging.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            path.push('?');
            path.push_str(&query.join("&"));
        }
        path
    }
}

/// Status and body bytes, uninterpreted.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests and returns raw responses. Implementations must be safe to
/// share between concurrent callers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        ctx: &CallContext,
        request: Request,
    ) -> std::result::Result<RawResponse, TransportError>;
}

/// [`Transport`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport for `base_url`. Trailing slashes are ignored and
    /// `timeout` bounds every request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| Error::Configuration(format!("invalid base URL '{}': {}", base_url, e)))?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "base URL '{}' must be an http or https URL",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: parsed,
            http_client,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn url_for(&self, request: &Request) -> Url {
        let mut url = self.base_url.clone();
        // new() rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&request.segments);
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        ctx: &CallContext,
        request: Request,
    ) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url_for(&request);
        tracing::debug!(method = %request.method, url = %url, "Sending Connect request");

        let mut builder = self
            .http_client
            .request(request.method, url)
            .header(ACCEPT, APPLICATION_JSON);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, APPLICATION_JSON).body(body);
        }

        ctx.run(async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, TransportError>(RawResponse { status, body })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        assert_eq!(transport("http://connect:8083/").base_url(), "http://connect:8083");
        assert_eq!(transport("http://connect:8083///").base_url(), "http://connect:8083");
        assert_eq!(
            transport("http://gateway/kafka-connect/").base_url(),
            "http://gateway/kafka-connect"
        );
    }

    #[test]
    fn test_url_building() {
        let t = transport("http://connect:8083/");
        let request = Request::new(
            Method::GET,
            vec!["connectors".to_string(), "pg".to_string(), "status".to_string()],
        );
        assert_eq!(
            t.url_for(&request).as_str(),
            "http://connect:8083/connectors/pg/status"
        );

        let prefixed = transport("http://gateway/kafka-connect");
        assert_eq!(
            prefixed.url_for(&request).as_str(),
            "http://gateway/kafka-connect/connectors/pg/status"
        );
    }

    #[test]
    fn test_segments_are_escaped() {
        let t = transport("http://connect:8083");
        let request = Request::new(
            Method::GET,
            vec!["connectors".to_string(), "a/b c?".to_string()],
        );
        assert_eq!(
            t.url_for(&request).as_str(),
            "http://connect:8083/connectors/a%2Fb%20c%3F"
        );
    }

    #[test]
    fn test_query_string() {
        let t = transport("http://connect:8083");
        let request = Request::new(Method::GET, vec!["connectors".to_string()])
            .with_query("expand", "status");
        assert_eq!(
            t.url_for(&request).as_str(),
            "http://connect:8083/connectors?expand=status"
        );
        assert_eq!(request.path(), "/connectors?expand=status");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpTransport::new("", Duration::from_secs(1)).is_err());
        assert!(HttpTransport::new("localhost:8083", Duration::from_secs(1)).is_err());
        assert!(HttpTransport::new("ftp://connect", Duration::from_secs(1)).is_err());
    }
}
