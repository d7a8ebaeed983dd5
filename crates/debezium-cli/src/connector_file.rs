use anyhow::{anyhow, bail, Context, Result};
use debezium_client::{ConnectorConfig, CreateConnectorRequest};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Connector definition file, YAML or JSON:
///
/// ```yaml
/// name: inventory
/// config:
///   connector.class: io.debezium.connector.postgresql.PostgresConnector
///   tasks.max: 1
/// ```
///
/// Scalar values are converted to strings, as Connect expects.
#[derive(Debug, Deserialize)]
pub struct ConnectorFile {
    pub name: Option<String>,
    pub config: BTreeMap<String, Value>,
}

impl ConnectorFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        // JSON is valid YAML, so one parser covers both formats.
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn connector_config(&self) -> Result<ConnectorConfig> {
        let mut config = ConnectorConfig::default();
        for (key, value) in &self.config {
            config.set(key.clone(), scalar_to_string(key, value)?);
        }
        Ok(config)
    }

    pub fn create_request(&self) -> Result<CreateConnectorRequest> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| anyhow!("connector file must contain a 'name'"))?;
        Ok(CreateConnectorRequest::new(name, self.connector_config()?))
    }
}

fn scalar_to_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => bail!("config value for '{}' must be a string, number or boolean", key),
    }
}
