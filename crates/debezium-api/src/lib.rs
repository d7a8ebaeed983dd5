//! HTTP gateway exposing Debezium connector management over a JSON API.

pub mod handlers;
pub mod request_id;
pub mod response;
pub mod server;

pub use response::ApiResponse;
pub use server::ApiServer;
