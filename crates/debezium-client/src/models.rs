use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Well-known connector configuration keys.
pub mod keys {
    pub const CONNECTOR_CLASS: &str = "connector.class";
    pub const TASKS_MAX: &str = "tasks.max";
    pub const DATABASE_HOSTNAME: &str = "database.hostname";
    pub const DATABASE_PORT: &str = "database.port";
    pub const DATABASE_USER: &str = "database.user";
    pub const DATABASE_PASSWORD: &str = "database.password";
    pub const DATABASE_DBNAME: &str = "database.dbname";
    pub const DATABASE_SERVER_NAME: &str = "database.server.name";
}

const REDACTED: &str = "********";

/// Connector configuration: the well-known Debezium properties as typed
/// fields plus every other property in `additional`.
///
/// Serializes as one flat string map. A typed field overrides an entry with
/// the same key in `additional`. Numbers and booleans are accepted on input
/// and stored as strings; `null` leaves the property unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub connector_class: Option<String>,
    pub tasks_max: Option<String>,
    pub database_hostname: Option<String>,
    pub database_port: Option<String>,
    pub database_user: Option<String>,
    pub database_password: Option<String>,
    pub database_dbname: Option<String>,
    pub database_server_name: Option<String>,

    /// Properties without a typed field (e.g. `topic.prefix`, `plugin.name`).
    pub additional: BTreeMap<String, String>,
}

impl ConnectorConfig {
    pub fn new(connector_class: impl Into<String>) -> Self {
        Self {
            connector_class: Some(connector_class.into()),
            ..Default::default()
        }
    }

    pub fn with_tasks_max(mut self, tasks_max: u32) -> Self {
        self.tasks_max = Some(tasks_max.to_string());
        self
    }

    /// Set any property; well-known keys land in their typed field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.field_mut(&key) {
            Some(field) => *field = Some(value),
            None => {
                self.additional.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.well_known()
            .into_iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
            .or_else(|| self.additional.get(key).map(String::as_str))
    }

    /// All properties merged into one map.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut merged = self.additional.clone();
        for (key, value) in self.well_known() {
            if let Some(value) = value {
                merged.insert(key.to_string(), value.clone());
            }
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.additional.is_empty() && self.well_known().iter().all(|(_, v)| v.is_none())
    }

    fn well_known(&self) -> [(&'static str, &Option<String>); 8] {
        [
            (keys::CONNECTOR_CLASS, &self.connector_class),
            (keys::TASKS_MAX, &self.tasks_max),
            (keys::DATABASE_HOSTNAME, &self.database_hostname),
            (keys::DATABASE_PORT, &self.database_port),
            (keys::DATABASE_USER, &self.database_user),
            (keys::DATABASE_PASSWORD, &self.database_password),
            (keys::DATABASE_DBNAME, &self.database_dbname),
            (keys::DATABASE_SERVER_NAME, &self.database_server_name),
        ]
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            keys::CONNECTOR_CLASS => Some(&mut self.connector_class),
            keys::TASKS_MAX => Some(&mut self.tasks_max),
            keys::DATABASE_HOSTNAME => Some(&mut self.database_hostname),
            keys::DATABASE_PORT => Some(&mut self.database_port),
            keys::DATABASE_USER => Some(&mut self.database_user),
            keys::DATABASE_PASSWORD => Some(&mut self.database_password),
            keys::DATABASE_DBNAME => Some(&mut self.database_dbname),
            keys::DATABASE_SERVER_NAME => Some(&mut self.database_server_name),
            _ => None,
        }
    }
}

impl Serialize for ConnectorConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConnectorConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut config = ConnectorConfig::default();
        for (key, value) in raw {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(D::Error::custom(format!(
                        "config value for '{}' must be a string, number or boolean",
                        key
                    )))
                }
            };
            config.set(key, value);
        }
        Ok(config)
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut merged = self.to_map();
        for (key, value) in merged.iter_mut() {
            if key.contains("password") {
                *value = REDACTED.to_string();
            }
        }
        f.debug_map().entries(merged.iter()).finish()
    }
}

/// Body of `POST /connectors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectorRequest {
    pub name: String,
    pub config: ConnectorConfig,
}

impl CreateConnectorRequest {
    pub fn new(name: impl Into<String>, config: ConnectorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Source,
    Sink,
    #[serde(other)]
    Unknown,
}

/// Server's canonical representation of a freshly created connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedConnector {
    pub name: String,
    pub config: ConnectorConfig,
    #[serde(default)]
    pub tasks: Vec<TaskId>,
    #[serde(rename = "type", default)]
    pub connector_type: Option<ConnectorType>,
}

/// Connector as returned by `GET /connectors/{name}`. The config is kept
/// free-form since the server adds derived properties (e.g. `name`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub name: String,
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
    #[serde(default)]
    pub tasks: Vec<TaskId>,
    #[serde(rename = "type", default)]
    pub connector_type: Option<ConnectorType>,
}

impl ConnectorInfo {
    /// A config property, if it is a JSON string.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId {
    pub connector: String,
    pub task: i32,
}

/// One entry of `GET /connectors/{name}/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

impl TaskInfo {
    pub fn connector(&self) -> &str {
        &self.id.connector
    }

    pub fn index(&self) -> i32 {
        self.id.task
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    Running,
    Paused,
    Failed,
    Unassigned,
    Restarting,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "RUNNING",
            RunState::Paused => "PAUSED",
            RunState::Failed => "FAILED",
            RunState::Unassigned => "UNASSIGNED",
            RunState::Restarting => "RESTARTING",
            RunState::Stopped => "STOPPED",
            RunState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorState {
    pub state: RunState,
    #[serde(default)]
    pub worker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub id: i32,
    pub state: RunState,
    #[serde(default)]
    pub worker_id: String,
    /// Stack trace reported for a failed task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// Point-in-time status of a connector and its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorStatus {
    pub name: String,
    pub connector: ConnectorState,
    #[serde(default)]
    pub tasks: Vec<TaskState>,
    #[serde(rename = "type", default)]
    pub connector_type: Option<ConnectorType>,
}

impl ConnectorStatus {
    pub fn state(&self) -> RunState {
        self.connector.state
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = &TaskState> {
        self.tasks.iter().filter(|t| t.state == RunState::Failed)
    }
}

/// Error body returned by the Connect REST API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub message: String,
}

/// Result of `GET /connectors`. With status expansion, `names` is derived
/// from the keys of `statuses` (sorted); without it `names` keeps server
/// order and `statuses` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectorList {
    names: Vec<String>,
    statuses: HashMap<String, ConnectorStatus>,
}

impl ConnectorList {
    pub fn from_names(names: Vec<String>) -> Self {
        Self {
            names,
            statuses: HashMap::new(),
        }
    }

    pub fn from_statuses(statuses: HashMap<String, ConnectorStatus>) -> Self {
        let mut names: Vec<String> = statuses.keys().cloned().collect();
        names.sort();
        Self { names, statuses }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn statuses(&self) -> &HashMap<String, ConnectorStatus> {
        &self.statuses
    }

    pub fn status(&self, name: &str) -> Option<&ConnectorStatus> {
        self.statuses.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, HashMap<String, ConnectorStatus>) {
        (self.names, self.statuses)
    }
}
