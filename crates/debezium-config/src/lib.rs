use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides `client.base_url` directly.
pub const BASE_URL_ENV: &str = "DEBEZIUM_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Kafka Connect REST endpoint
    pub base_url: String,

    /// Timeout for a single HTTP request, in seconds
    pub timeout_secs: u64,

    /// Deadline applied to each gateway call, in seconds
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON formatted logs
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig {
                base_url: "http://localhost:8083".to_string(),
                timeout_secs: 30,
                call_timeout_secs: None,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_enabled: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl AppConfig {
    /// Load from defaults, `default.yaml`, `local.yaml` and the process
    /// environment, in increasing precedence.
    pub fn load(config_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::build(config_dir.as_ref(), None, None)
    }

    /// Like [`AppConfig::load`], with `base_url` (when given) taking
    /// precedence over every other source before validation.
    pub fn load_with_base_url(
        config_dir: impl AsRef<Path>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        Self::build(config_dir.as_ref(), None, base_url)
    }

    /// Like [`AppConfig::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        config_dir: impl AsRef<Path>,
        env: Option<HashMap<String, String>>,
    ) -> anyhow::Result<Self> {
        Self::build(config_dir.as_ref(), env, None)
    }

    fn build(
        config_dir: &Path,
        env: Option<HashMap<String, String>>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let base_url_override = base_url.or_else(|| match &env {
            Some(vars) => vars.get(BASE_URL_ENV).cloned(),
            None => std::env::var(BASE_URL_ENV).ok(),
        });

        let s = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::File::with_name(&config_dir.join("default.yaml").to_string_lossy())
                    .required(false),
            )
            // local.yaml holds per-machine overrides and is not checked in
            .add_source(
                config::File::with_name(&config_dir.join("local.yaml").to_string_lossy())
                    .required(false),
            )
            // DEBEZIUM_CLIENT__BASE_URL=http://connect:8083, DEBEZIUM_API__PORT=4000
            .add_source(
                config::Environment::with_prefix("DEBEZIUM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("client.base_url", base_url_override)?
            .build()
            .context("Failed to build configuration")?;

        let config: Self = s
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.client.base_url.trim();
        if base_url.is_empty() {
            bail!("client.base_url cannot be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!(
                "client.base_url '{}' must start with http:// or https://",
                base_url
            );
        }
        if self.client.timeout_secs == 0 {
            bail!("client.timeout_secs must be greater than zero");
        }
        if self.client.call_timeout_secs == Some(0) {
            bail!("client.call_timeout_secs must be greater than zero when set");
        }
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "debezium-config-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = scratch_dir("defaults");
        let config = AppConfig::load_with_env(&dir, Some(HashMap::new())).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.client.timeout(), Duration::from_secs(30));
        assert_eq!(config.client.call_timeout(), None);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_yaml_and_env_layers() {
        let dir = scratch_dir("layers");
        std::fs::write(
            dir.join("default.yaml"),
            "client:\n  base_url: http://connect:8083\n  timeout_secs: 10\napi:\n  port: 9000\n",
        )
        .unwrap();
        std::fs::write(dir.join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        let mut env = HashMap::new();
        env.insert("DEBEZIUM_API__PORT".to_string(), "4000".to_string());
        env.insert("DEBEZIUM_CLIENT__CALL_TIMEOUT_SECS".to_string(), "5".to_string());

        let config = AppConfig::load_with_env(&dir, Some(env)).unwrap();
        assert_eq!(config.client.base_url, "http://connect:8083");
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.client.call_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level, "debug");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_base_url_shortcut_wins() {
        let dir = scratch_dir("shortcut");
        let mut env = HashMap::new();
        env.insert(
            "DEBEZIUM_CLIENT__BASE_URL".to_string(),
            "http://ignored:8083".to_string(),
        );
        env.insert(BASE_URL_ENV.to_string(), "https://connect.internal".to_string());

        let config = AppConfig::load_with_env(&dir, Some(env)).unwrap();
        assert_eq!(config.client.base_url, "https://connect.internal");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_explicit_base_url_replaces_invalid_configured_one() {
        let dir = scratch_dir("explicit");
        std::fs::write(dir.join("default.yaml"), "client:\n  base_url: not-a-url\n").unwrap();

        assert!(AppConfig::build(&dir, Some(HashMap::new()), None).is_err());

        let mut env = HashMap::new();
        env.insert(BASE_URL_ENV.to_string(), "http://ignored:8083".to_string());
        let config =
            AppConfig::build(&dir, Some(env), Some("http://connect:8083".to_string())).unwrap();
        assert_eq!(config.client.base_url, "http://connect:8083");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.client.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config.client.base_url = "connect:8083".to_string();
        assert!(config.validate().is_err());

        config.client.base_url = "http://connect:8083".to_string();
        config.client.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = scratch_dir("file");
        let path = dir.join("app.yaml");

        let mut config = AppConfig::default();
        config.client.base_url = "http://connect:8083".to_string();
        config.to_file(&path).unwrap();

        assert_eq!(AppConfig::from_file(&path).unwrap(), config);
        std::fs::remove_dir_all(dir).ok();
    }
}
