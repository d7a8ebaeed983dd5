//! Async client for the Kafka Connect REST API, scoped to managing Debezium
//! change-data-capture connectors and their tasks.
//!
//! Every operation takes a [`CallContext`] for per-call deadlines and
//! cancellation, sends exactly one request, and classifies the response
//! against the status codes the Connect API documents for that operation.

mod client;
mod connectors;
mod context;
mod endpoint;
mod error;
mod models;
mod transport;

pub use client::DebeziumClient;
pub use context::CallContext;
pub use endpoint::Operation;
pub use error::{Error, ErrorKind, Result, TransportError};
pub use models::{
    keys, ConnectorConfig, ConnectorInfo, ConnectorList, ConnectorState, ConnectorStatus,
    ConnectorType, CreateConnectorRequest, CreatedConnector, ErrorResponse, RunState, TaskId,
    TaskInfo, TaskState,
};
pub use transport::{HttpTransport, RawResponse, Request, Transport};

pub use reqwest::{Method, StatusCode};
pub use tokio_util::sync::CancellationToken;
