//! Configuration management for Seedling.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration (`seedling.yml`)
//! - Environment variable overrides (`SEEDLING_*`)
//! - Programmatic updates (command-line flags)
//! - Schema validation
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! Environment variables map onto dotted keys by stripping the prefix,
//! lowercasing, and turning `__` into `.`; `SEEDLING_TOOLS__OPENSSL` sets
//! `tools.openssl`.
//!
//! ## Example
//!
//! ```no_run
//! use seedling_core::config::ProvisionConfig;
//!
//! let config = ProvisionConfig::load(None, seedling_core::config::process_env())?;
//! println!("secrets go to {}", config.secrets_dir.display());
//! # Ok::<(), seedling_core::SeedlingError>(())
//! ```

use seedling_types::{LogLevel, SeedlingError, Result};
use seedling_types::config::ToolsConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::util::{load_yaml, slurp};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "seedling.yml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SEEDLING_";

static PROVISION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "secrets_dir": { "type": "string", "minLength": 1 },
            "log_level": {
                "type": "string",
                "enum": ["none", "error", "warn", "info", "debug", "trace"]
            },
            "expiry_warning_days": { "type": ["integer", "string"] },
            "tools": {
                "type": "object",
                "properties": {
                    "ssh_keygen": { "type": "string", "minLength": 1 },
                    "openssl": { "type": "string", "minLength": 1 }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});

/// Map an environment variable name onto a dotted key.
///
/// Returns `None` unless `key` starts with `prefix` and has something after
/// it. `SEEDLING_TOOLS__OPENSSL` becomes `tools.openssl`.
pub fn env_key_path(prefix: &str, key: &str) -> Option<String> {
    let stripped = key.strip_prefix(prefix)?;
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_lowercase().replace("__", "."))
}

/// Whether `schema` declares the leaf setting at `dotted`.
fn schema_declares(schema: &Value, dotted: &str) -> bool {
    let mut node = schema;
    for part in dotted.split('.') {
        match node.get("properties").and_then(|props| props.get(part)) {
            Some(next) => node = next,
            None => return false,
        }
    }
    node.get("properties").is_none()
}

/// Environment of this process, skipping variables whose name or value is
/// not valid UTF-8.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let name = key.to_string_lossy().into_owned();
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                _ => {
                    tracing::debug!("Ignoring environment variable {} that is not valid UTF-8", name);
                    None
                }
            }
        })
        .collect()
}

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

/// Main configuration structure with multi-layer support.
///
/// This is the low-level configuration type. For the typed view used by the
/// provisioner, see `ProvisionConfig`.
#[derive(Clone, Debug)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
    file_path: Option<PathBuf>,
    schema: Option<Value>,
}

impl Config {
    /// Create an empty configuration with no backing file.
    pub fn empty() -> Self {
        Self {
            layers: HashMap::new(),
            file_path: None,
            schema: None,
        }
    }

    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::empty();

        if path.exists() {
            let content = slurp(path)
                .map_err(|e| SeedlingError::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

            let value = load_yaml(&content)
                .map_err(|e| SeedlingError::Config(format!("Failed to parse config {:?}: {}", path, e)))?;

            // An empty YAML document parses as null
            if !value.is_null() {
                config.layers.insert(ConfigLayer::Loaded, value);
            }
        }

        config.file_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Replace the default layer.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.layers.insert(ConfigLayer::Default, defaults);
        self
    }

    /// Populate the environment layer from `vars`, keeping only those that
    /// start with `prefix`.
    pub fn with_env_vars<I, K, V>(mut self, prefix: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env_layer = Value::Object(Default::default());

        for (key, value) in vars {
            let Some(dotted) = env_key_path(prefix, key.as_ref()) else {
                continue;
            };
            Self::set_value_at_path_impl(&mut env_layer, &dotted, Value::String(value.into()))?;
        }

        self.layers.insert(ConfigLayer::Environment, env_layer);
        Ok(self)
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        // Check layers in priority order (highest to lowest)
        let layers = [
            ConfigLayer::Environment,
            ConfigLayer::Set,
            ConfigLayer::Loaded,
            ConfigLayer::Default,
        ];

        for layer in &layers {
            if let Some(layer_data) = self.layers.get(layer) {
                if let Some(value) = crate::util::data::get_path(layer_data, key) {
                    if let Ok(typed_value) = serde_json::from_value(value.clone()) {
                        return Some(typed_value);
                    }
                }
            }
        }

        None
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| SeedlingError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self.layers.entry(ConfigLayer::Set).or_insert(Value::Object(Default::default()));

        Self::set_value_at_path_impl(set_layer, key, value)
    }

    /// Get merged data from all layers.
    pub fn merged_data(&self) -> Value {
        let layers = [
            ConfigLayer::Default,
            ConfigLayer::Loaded,
            ConfigLayer::Set,
            ConfigLayer::Environment,
        ];

        let mut merged = Value::Object(serde_json::Map::new());

        for layer in &layers {
            if let Some(layer_data) = self.layers.get(layer) {
                merged = crate::util::data::deep_merge(merged, layer_data.clone());
            }
        }

        merged
    }

    /// Validate configuration against schema (if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            let instance = self.merged_data();

            let compiled = jsonschema::JSONSchema::compile(schema)
                .map_err(|e| SeedlingError::Config(format!("Invalid schema: {}", e)))?;

            let result = compiled.validate(&instance);
            if let Err(errors) = result {
                let error_msgs: Vec<String> = errors
                    .map(|e| format!("{}", e))
                    .collect();
                return Err(SeedlingError::Config(format!(
                    "Validation failed: {}",
                    error_msgs.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Set validation schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Path of the backing file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    // Helper: Set value at dotted path
    fn set_value_at_path_impl(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        let Some((last, parents)) = parts.split_last() else {
            return Err(SeedlingError::Config("Empty path".to_string()));
        };
        if last.is_empty() {
            return Err(SeedlingError::Config(format!("Invalid config key '{}'", path)));
        }

        // Navigate to parent, creating intermediate objects as needed
        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            current = match current {
                Value::Object(map) => map
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Default::default())),
                _ => unreachable!("intermediate value was just made an object"),
            };
        }

        if !current.is_object() {
            *current = Value::Object(Default::default());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }

        Ok(())
    }
}

/// Typed provisioner settings, resolved from every configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Root directory that holds every secret
    #[serde(default = "default_secrets_dir")]
    pub secrets_dir: PathBuf,

    /// Minimum level for log output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Certificates expiring within this many days are flagged by `check`
    #[serde(default = "default_expiry_warning_days", deserialize_with = "crate::util::data::lenient_u32")]
    pub expiry_warning_days: u32,

    /// External tool locations
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from("secrets")
}

fn default_expiry_warning_days() -> u32 {
    30
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            secrets_dir: default_secrets_dir(),
            log_level: LogLevel::default(),
            expiry_warning_days: default_expiry_warning_days(),
            tools: ToolsConfig::default(),
        }
    }
}

impl ProvisionConfig {
    /// Load settings from `path` (or `seedling.yml` when `None`), applying
    /// `SEEDLING_*` overrides from `env`.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    /// `SEEDLING_*` variables that name no known setting are ignored.
    pub fn load<I, K, V>(path: Option<&Path>, env: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        if let Some(explicit) = path {
            if !explicit.exists() {
                return Err(SeedlingError::Config(format!(
                    "Config file {:?} does not exist",
                    explicit
                )));
            }
        }

        let env = env.into_iter().filter(|(key, _)| {
            let Some(dotted) = env_key_path(ENV_PREFIX, key.as_ref()) else {
                return false;
            };
            let known = schema_declares(&PROVISION_SCHEMA, &dotted);
            if !known {
                tracing::debug!("Ignoring {}: not a Seedling setting", key.as_ref());
            }
            known
        });

        let config = Config::load(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)))?
            .with_env_vars(ENV_PREFIX, env)?;

        Self::from_config(&config)
    }

    /// Resolve a typed view of an already layered configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let config = config.clone().with_schema(PROVISION_SCHEMA.clone());
        config.validate()?;

        let mut resolved: ProvisionConfig = serde_json::from_value(config.merged_data())
            .map_err(|e| SeedlingError::Config(format!("Failed to parse settings: {}", e)))?;

        resolved.secrets_dir = crate::util::fs::expand_path(&resolved.secrets_dir);
        resolved.tools.ssh_keygen = crate::util::fs::expand_path(&resolved.tools.ssh_keygen);
        resolved.tools.openssl = crate::util::fs::expand_path(&resolved.tools.openssl);

        tracing::debug!(
            "Resolved configuration from {:?}: secrets_dir={:?}",
            config.file_path(),
            resolved.secrets_dir
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_config_layers() {
        let mut config = Config::empty()
            .with_defaults(json!({"key": "default_value"}));

        let value: String = config.get("key").unwrap();
        assert_eq!(value, "default_value");

        config.layers.insert(
            ConfigLayer::Loaded,
            json!({"key": "loaded_value"}),
        );
        let value: String = config.get("key").unwrap();
        assert_eq!(value, "loaded_value");

        config.set("key", "set_value").unwrap();
        let value: String = config.get("key").unwrap();
        assert_eq!(value, "set_value");

        let config = config
            .with_env_vars(ENV_PREFIX, vec![("SEEDLING_KEY", "env_value")])
            .unwrap();
        let value: String = config.get("key").unwrap();
        assert_eq!(value, "env_value");
    }

    #[test]
    fn test_env_vars_map_to_nested_keys() {
        let config = Config::empty()
            .with_env_vars(
                ENV_PREFIX,
                vec![
                    ("SEEDLING_TOOLS__OPENSSL", "/opt/openssl"),
                    ("UNRELATED", "ignored"),
                ],
            )
            .unwrap();

        let openssl: String = config.get("tools.openssl").unwrap();
        assert_eq!(openssl, "/opt/openssl");
        assert!(config.get::<String>("unrelated").is_none());
    }

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join(DEFAULT_CONFIG_FILE);

        let config = Config::load(&missing).unwrap();
        let settings = ProvisionConfig::from_config(&config).unwrap();

        assert_eq!(settings, ProvisionConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.yml");

        assert!(ProvisionConfig::load(Some(&missing), no_env()).is_err());
    }

    #[test]
    fn test_file_and_env_layers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seedling.yml");
        fs::write(
            &path,
            "secrets_dir: /srv/secrets\nlog_level: debug\ntools:\n  openssl: /opt/openssl\n",
        )
        .unwrap();

        let settings = ProvisionConfig::load(
            Some(&path),
            vec![("SEEDLING_SECRETS_DIR", "/var/lib/secrets"), ("SEEDLING_EXPIRY_WARNING_DAYS", "7")],
        )
        .unwrap();

        assert_eq!(settings.secrets_dir, PathBuf::from("/var/lib/secrets"));
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.expiry_warning_days, 7);
        assert_eq!(settings.tools.openssl, PathBuf::from("/opt/openssl"));
        assert_eq!(settings.tools.ssh_keygen, PathBuf::from("ssh-keygen"));
    }

    #[test]
    fn test_unrelated_env_vars_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seedling.yml");
        fs::write(&path, "secrets_dir: /srv/secrets\n").unwrap();

        let settings = ProvisionConfig::load(
            Some(&path),
            vec![
                ("SEEDLING_HOME", "/opt/seedling"),
                ("SEEDLING_TOOLS__SCP", "/usr/bin/scp"),
                ("SEEDLING_TOOLS", "everything"),
                ("SEEDLING_", "empty"),
                ("SEEDLING_TOOLS__OPENSSL", "/usr/local/bin/openssl"),
                ("PATH", "/usr/bin"),
            ],
        )
        .unwrap();

        assert_eq!(settings.secrets_dir, PathBuf::from("/srv/secrets"));
        assert_eq!(settings.tools.openssl, PathBuf::from("/usr/local/bin/openssl"));
    }

    #[test]
    fn test_env_key_path() {
        assert_eq!(env_key_path(ENV_PREFIX, "SEEDLING_TOOLS__OPENSSL").as_deref(), Some("tools.openssl"));
        assert_eq!(env_key_path(ENV_PREFIX, "SEEDLING_LOG_LEVEL").as_deref(), Some("log_level"));
        assert_eq!(env_key_path(ENV_PREFIX, "SEEDLING_"), None);
        assert_eq!(env_key_path(ENV_PREFIX, "HOME"), None);
    }

    #[test]
    fn test_schema_declares_leaves_only() {
        assert!(schema_declares(&PROVISION_SCHEMA, "secrets_dir"));
        assert!(schema_declares(&PROVISION_SCHEMA, "tools.ssh_keygen"));
        assert!(!schema_declares(&PROVISION_SCHEMA, "tools"));
        assert!(!schema_declares(&PROVISION_SCHEMA, "home"));
        assert!(!schema_declares(&PROVISION_SCHEMA, "secrets_dir.nested"));
    }

    #[test]
    fn test_process_env_is_utf8() {
        let env = process_env();
        assert!(env.iter().all(|(key, _)| !key.is_empty()));
    }

    #[test]
    fn test_unknown_keys_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seedling.yml");
        fs::write(&path, "secret_dir: typo\n").unwrap();

        let err = ProvisionConfig::load(Some(&path), no_env()).unwrap_err();
        assert!(matches!(err, SeedlingError::Config(_)));
    }
}
