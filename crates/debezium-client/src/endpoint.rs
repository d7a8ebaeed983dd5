//! Endpoint table for the Kafka Connect REST API.
//!
//! Each [`Operation`] maps to an HTTP method, a path under `/connectors`,
//! and the set of status codes that count as success:
//!
//! | Operation | Method | Path | Success |
//! |---|---|---|---|
//! | `CreateConnector` | POST | `/connectors` | 201 |
//! | `GetConnector` | GET | `/connectors/{name}` | 200 |
//! | `DeleteConnector` | DELETE | `/connectors/{name}` | 200, 204 |
//! | `GetConnectorStatus` | GET | `/connectors/{name}/status` | 200 |
//! | `UpdateConnectorConfig` | PUT | `/connectors/{name}/config` | 200, 201 |
//! | `PauseConnector` | PUT | `/connectors/{name}/pause` | 202, 204 |
//! | `ResumeConnector` | PUT | `/connectors/{name}/resume` | 202, 204 |
//! | `RestartConnector` | POST | `/connectors/{name}/restart` | 200, 202, 204 |
//! | `GetConnectorTasks` | GET | `/connectors/{name}/tasks` | 200 |
//! | `RestartConnectorTask` | POST | `/connectors/{name}/tasks/{task}/restart` | 200, 202, 204 |
//! | `ListConnectors` | GET | `/connectors[?expand=status]` | 200 |

use reqwest::{Method, StatusCode};
use std::fmt;

const CONNECTORS: &str = "connectors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateConnector,
    GetConnector,
    DeleteConnector,
    GetConnectorStatus,
    UpdateConnectorConfig,
    PauseConnector,
    ResumeConnector,
    RestartConnector,
    GetConnectorTasks,
    RestartConnectorTask,
    ListConnectors,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateConnector => "CreateConnector",
            Operation::GetConnector => "GetConnector",
            Operation::DeleteConnector => "DeleteConnector",
            Operation::GetConnectorStatus => "GetConnectorStatus",
            Operation::UpdateConnectorConfig => "UpdateConnectorConfig",
            Operation::PauseConnector => "PauseConnector",
            Operation::ResumeConnector => "ResumeConnector",
            Operation::RestartConnector => "RestartConnector",
            Operation::GetConnectorTasks => "GetConnectorTasks",
            Operation::RestartConnectorTask => "RestartConnectorTask",
            Operation::ListConnectors => "ListConnectors",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::GetConnector
            | Operation::GetConnectorStatus
            | Operation::GetConnectorTasks
            | Operation::ListConnectors => Method::GET,
            Operation::CreateConnector
            | Operation::RestartConnector
            | Operation::RestartConnectorTask => Method::POST,
            Operation::UpdateConnectorConfig
            | Operation::PauseConnector
            | Operation::ResumeConnector => Method::PUT,
            Operation::DeleteConnector => Method::DELETE,
        }
    }

    /// Status codes the Connect API documents as success for this operation.
    pub fn success_statuses(&self) -> &'static [StatusCode] {
        match self {
            Operation::CreateConnector => &[StatusCode::CREATED],
            Operation::GetConnector
            | Operation::GetConnectorStatus
            | Operation::GetConnectorTasks
            | Operation::ListConnectors => &[StatusCode::OK],
            Operation::DeleteConnector => &[StatusCode::OK, StatusCode::NO_CONTENT],
            Operation::UpdateConnectorConfig => &[StatusCode::OK, StatusCode::CREATED],
            Operation::PauseConnector | Operation::ResumeConnector => {
                &[StatusCode::ACCEPTED, StatusCode::NO_CONTENT]
            }
            Operation::RestartConnector | Operation::RestartConnectorTask => {
                &[StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT]
            }
        }
    }

    pub fn accepts(&self, status: StatusCode) -> bool {
        self.success_statuses().contains(&status)
    }

    fn suffix(&self) -> Option<&'static str> {
        match self {
            Operation::GetConnectorStatus => Some("status"),
            Operation::UpdateConnectorConfig => Some("config"),
            Operation::PauseConnector => Some("pause"),
            Operation::ResumeConnector => Some("resume"),
            Operation::RestartConnector | Operation::RestartConnectorTask => Some("restart"),
            Operation::GetConnectorTasks => Some("tasks"),
            _ => None,
        }
    }

    /// Path segments (unencoded) for this operation against `target`.
    pub(crate) fn path(&self, target: &Target<'_>) -> Vec<String> {
        let mut segments = vec![CONNECTORS.to_string()];
        match target {
            Target::Collection => {}
            Target::Connector(name) => segments.push((*name).to_string()),
            Target::Task { connector, task } => {
                segments.push((*connector).to_string());
                segments.push("tasks".to_string());
                segments.push(task.to_string());
            }
        }
        if let Some(suffix) = self.suffix() {
            segments.push(suffix.to_string());
        }
        segments
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an operation addresses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    Collection,
    Connector(&'a str),
    Task { connector: &'a str, task: i32 },
}
