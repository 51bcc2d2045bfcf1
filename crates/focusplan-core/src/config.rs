//! TOML-based planner configuration.
//!
//! Stored at `~/.config/focusplan/config.toml` (or `focusplan-dev` when
//! `FOCUSPLAN_ENV=dev`). Keys are addressed by dot path, e.g.
//! `scheduling.buffer_minutes`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::scheduler::SchedulingConfig;

/// Returns `~/.config/focusplan[-dev]/`, creating it if needed.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSPLAN_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("focusplan-dev")
    } else {
        base_dir.join("focusplan")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

impl Config {
    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`. A missing file yields (and persists) the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.scheduling.validate()?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match value_at(&json, key)? {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The result must still be a valid
    /// working day; on error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        set_value_at(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.scheduling.validate()?;
        *self = updated;
        Ok(())
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            collect_leaves(&json, String::new(), &mut out);
        }
        out
    }
}

fn value_at<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    key.split('.').try_fold(root, |current, part| current.get(part))
}

fn set_value_at(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    if key.is_empty() {
        return Err(unknown());
    }

    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    let mut current = root;
    if let Some(parent) = parent {
        for part in parent.split('.') {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
    }
    let obj = current.as_object_mut().ok_or_else(unknown)?;
    let existing = obj.get(leaf).ok_or_else(unknown)?;

    let new_value = match existing {
        Value::Bool(_) => Value::Bool(
            value
                .parse::<bool>()
                .map_err(|e| ConfigError::invalid(key, e.to_string()))?,
        ),
        Value::Number(_) => {
            let n = value
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{value}' as a whole number")))?;
            Value::Number(n.into())
        }
        Value::Object(_) | Value::Array(_) => {
            return Err(ConfigError::invalid(key, "is a section, not a value"));
        }
        _ => Value::String(value.into()),
    };
    obj.insert(leaf.to_string(), new_value);
    Ok(())
}

fn collect_leaves(value: &Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_leaves(v, key, out);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}
