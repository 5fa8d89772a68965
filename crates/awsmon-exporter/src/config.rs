//! Configuration store: built-in defaults deep-merged with an optional YAML
//! override file, looked up by dotted path.

use serde_yaml::{Mapping, Value};
use std::path::Path;

pub struct Config {
    root: Value,
}

impl Config {
    /// Builds the configuration tree. A missing or malformed override file is
    /// logged and ignored so startup always succeeds with the defaults.
    pub fn new(config_file: Option<&Path>) -> Self {
        let mut root = defaults();
        if let Some(path) = config_file {
            match load_file(path) {
                Ok(overrides) => deep_merge(&mut root, overrides),
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Error loading config file, falling back to defaults"
                    );
                }
            }
        }
        Self { root }
    }

    /// Walks the tree by dotted path. Any missing segment yields `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut current = &self.root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// String value, or `None` when the key is missing or explicitly null.
    pub fn get_opt_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_u16(&self, key: &str, default: u16) -> u16 {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(default)
    }
}

fn load_file(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Recursively merges `overlay` into `base`: mappings merge key-wise,
/// anything else from the overlay replaces the base value outright.
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Built-in default tree, seeded from the conventional environment variables
/// where they exist.
fn defaults() -> Value {
    fn env_or(name: &str, fallback: &str) -> Value {
        Value::String(std::env::var(name).unwrap_or_else(|_| fallback.to_string()))
    }
    fn env_opt(name: &str) -> Value {
        std::env::var(name).map(Value::String).unwrap_or(Value::Null)
    }

    let mut aws = Mapping::new();
    aws.insert("region".into(), env_or("AWS_REGION", "us-east-1"));
    aws.insert("access_key_id".into(), env_opt("AWS_ACCESS_KEY_ID"));
    aws.insert(
        "secret_access_key".into(),
        env_opt("AWS_SECRET_ACCESS_KEY"),
    );

    let mut collectors = Mapping::new();
    collectors.insert("ec2".into(), Value::Bool(true));
    collectors.insert("rds".into(), Value::Bool(true));

    let port = std::env::var("EXPORTER_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(9090);

    let mut exporter = Mapping::new();
    exporter.insert("port".into(), Value::Number(u64::from(port).into()));
    exporter.insert("address".into(), env_or("EXPORTER_ADDRESS", "0.0.0.0"));
    exporter.insert(
        "metrics_path".into(),
        env_or("EXPORTER_METRICS_PATH", "/metrics"),
    );
    exporter.insert("collectors".into(), Value::Mapping(collectors));

    let mut root = Mapping::new();
    root.insert("aws".into(), Value::Mapping(aws));
    root.insert("exporter".into(), Value::Mapping(exporter));
    Value::Mapping(root)
}
