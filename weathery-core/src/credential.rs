//! API key resolution and the persisted key override.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use crate::config::Config;

/// Key-value slot holding the user-supplied API key override.
pub trait CredentialStore: Send + Sync + Debug {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, api_key: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    openweather_api_key: Option<String>,
}

/// Stores the override as `openweather_api_key` in a small TOML file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store next to `config.toml` in the platform config directory.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("credentials.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credential file: {}", self.path.display()))?;

        let stored: StoredCredentials = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse credential file: {}", self.path.display()))?;

        Ok(stored.openweather_api_key)
    }

    fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create credential directory: {}", parent.display())
            })?;
        }

        let stored = StoredCredentials {
            openweather_api_key: Some(api_key.to_string()),
        };
        let toml = toml::to_string_pretty(&stored).context("Failed to serialize credentials")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write credential file: {}", self.path.display()))
    }
}

/// Process-local store, nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_value(api_key: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(api_key.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.value.read().clone())
    }

    fn save(&self, api_key: &str) -> Result<()> {
        *self.value.write() = Some(api_key.to_string());
        Ok(())
    }
}

/// Picks the active API key: configured key, then saved override, then default.
#[derive(Debug)]
pub struct CredentialResolver {
    configured: Option<String>,
    default_key: Option<String>,
    override_key: RwLock<Option<String>>,
    store: Box<dyn CredentialStore>,
}

impl CredentialResolver {
    /// The store is read once here; later changes go through [`persist`](Self::persist).
    pub fn new(
        configured: Option<String>,
        default_key: Option<String>,
        store: Box<dyn CredentialStore>,
    ) -> Self {
        let override_key = match store.load() {
            Ok(value) => non_blank(value),
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved API key, ignoring it");
                None
            }
        };

        Self {
            configured: non_blank(configured),
            default_key: non_blank(default_key),
            override_key: RwLock::new(override_key),
            store,
        }
    }

    pub fn from_config(config: &Config, store: Box<dyn CredentialStore>) -> Self {
        Self::new(config.api_key.clone(), config.default_api_key.clone(), store)
    }

    /// Active key, or an empty string when none is known.
    pub fn resolve(&self) -> String {
        if let Some(key) = &self.configured {
            return key.clone();
        }

        if let Some(key) = self.override_key.read().as_ref() {
            return key.clone();
        }

        self.default_key.clone().unwrap_or_default()
    }

    /// Save a new override. Blank input is ignored.
    pub fn persist(&self, api_key: &str) {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return;
        }

        *self.override_key.write() = Some(trimmed.to_string());

        if let Err(err) = self.store.save(trimmed) {
            tracing::warn!(error = %err, "failed to persist API key override");
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
