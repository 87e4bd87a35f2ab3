use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "alumni_matcher.db";
pub const DEFAULT_SCHEMA_PATH: &str = "sql/schema.sql";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Where the store lives and how the service is reached. Passed explicitly to
/// every component that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub schema_path: PathBuf,
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// On-disk config; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    db_path: Option<PathBuf>,
    schema_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
}

impl Config {
    /// Defaults, overlaid with the config file if there is one. An explicit
    /// path must exist; the platform default is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        debug!("Reading config from {:?}", path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid config: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text).context("Failed to parse config")?;
        Ok(Self::default().merge(file))
    }

    /// `config.json` in the platform config directory
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "alumni-matcher").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Command-line values win over everything else
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        schema_path: Option<PathBuf>,
        bind: Option<SocketAddr>,
    ) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(schema_path) = schema_path {
            self.schema_path = schema_path;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    fn merge(self, file: ConfigFile) -> Self {
        self.with_overrides(file.db_path, file.schema_path, file.bind)
    }
}
