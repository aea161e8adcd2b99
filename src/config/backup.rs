//! Backup producer configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::errors::{require, ConfigError, ConfigResult};
use super::settings::{default_staging_dir, load_json, StoreSettings, ToolSettings};
use crate::backup::{FullBackupPlan, OplogBackupPlan, DEFAULT_INTERVAL_MINUTES};

fn default_interval_in_mins() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}

/// Settings of `backup full`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FullBackupConfig {
    #[serde(default)]
    pub mongo_uri: Option<String>,

    #[serde(default)]
    pub bucket_name: Option<String>,

    #[serde(default)]
    pub env: Option<String>,

    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub tools: ToolSettings,
}

impl FullBackupConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_json(path)
    }

    pub fn plan(&self) -> ConfigResult<FullBackupPlan> {
        require(&[
            ("MONGO_URI", self.mongo_uri.as_deref()),
            ("BUCKET_NAME", self.bucket_name.as_deref()),
            ("ENV", self.env.as_deref()),
            ("APP_NAME", self.app_name.as_deref()),
        ])?;
        self.store.validate()?;
        Ok(FullBackupPlan {
            bucket: self.bucket_name.as_deref().unwrap_or_default().trim().to_string(),
            env: self.env.as_deref().unwrap_or_default().trim().to_string(),
            app_name: self.app_name.as_deref().unwrap_or_default().trim().to_string(),
            staging_dir: self.staging_dir.clone(),
            scheme: self.store.backend.scheme().to_string(),
        })
    }

    pub fn mongo_uri(&self) -> ConfigResult<&str> {
        require(&[("MONGO_URI", self.mongo_uri.as_deref())])?;
        Ok(self.mongo_uri.as_deref().unwrap_or_default())
    }
}

/// Settings of `backup oplog`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OplogBackupConfig {
    #[serde(default)]
    pub mongo_uri: Option<String>,

    #[serde(default)]
    pub oplog_bucket_name: Option<String>,

    #[serde(default)]
    pub env: Option<String>,

    /// Length of the dumped window
    #[serde(default = "default_interval_in_mins")]
    pub interval_in_mins: u32,

    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub tools: ToolSettings,
}

impl OplogBackupConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_json(path)
    }

    pub fn plan(&self) -> ConfigResult<OplogBackupPlan> {
        require(&[
            ("MONGO_URI", self.mongo_uri.as_deref()),
            ("OPLOG_BUCKET_NAME", self.oplog_bucket_name.as_deref()),
            ("ENV", self.env.as_deref()),
        ])?;
        if self.interval_in_mins == 0 {
            return Err(ConfigError::Invalid(
                "INTERVAL_IN_MINS must be a positive integer".to_string(),
            ));
        }
        self.store.validate()?;
        Ok(OplogBackupPlan {
            bucket: self.oplog_bucket_name.as_deref().unwrap_or_default().trim().to_string(),
            env: self.env.as_deref().unwrap_or_default().trim().to_string(),
            interval_minutes: self.interval_in_mins,
            staging_dir: self.staging_dir.clone(),
        })
    }

    pub fn mongo_uri(&self) -> ConfigResult<&str> {
        require(&[("MONGO_URI", self.mongo_uri.as_deref())])?;
        Ok(self.mongo_uri.as_deref().unwrap_or_default())
    }
}
