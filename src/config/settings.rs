//! Settings shared by every command

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::object_store::{GcloudStore, LocalObjectStore, ObjectStore};
use crate::tools::MongoTools;

/// Local directory used for staging when none is configured
pub fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("mongo-pitr")
}

/// Load a JSON config file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Object store implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Google Cloud Storage via the gcloud CLI
    #[default]
    Gcs,
    /// Directory tree on the local filesystem
    Local,
}

impl StoreBackend {
    /// Locator scheme for artifacts in this backend
    pub fn scheme(&self) -> &'static str {
        match self {
            StoreBackend::Gcs => "gs",
            StoreBackend::Local => "local",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcs" | "gs" => Ok(StoreBackend::Gcs),
            "local" => Ok(StoreBackend::Local),
            other => Err(ConfigError::Invalid(format!(
                "unknown storage backend '{}', expected gcs or local",
                other
            ))),
        }
    }
}

/// Object store selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Root directory for the local backend
    #[serde(default)]
    pub local_root: Option<PathBuf>,

    /// gcloud executable for the gcs backend
    #[serde(default = "default_gcloud_bin")]
    pub gcloud_bin: String,
}

fn default_gcloud_bin() -> String {
    "gcloud".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            local_root: None,
            gcloud_bin: default_gcloud_bin(),
        }
    }
}

impl StoreSettings {
    /// Check backend-specific requirements
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == StoreBackend::Local && self.local_root.is_none() {
            return Err(ConfigError::Missing(vec!["LOCAL_STORE_ROOT"]));
        }
        Ok(())
    }

    /// Construct the configured object store
    pub fn build(&self) -> ConfigResult<Box<dyn ObjectStore>> {
        self.validate()?;
        match (self.backend, &self.local_root) {
            (StoreBackend::Local, Some(root)) => Ok(Box::new(LocalObjectStore::new(root.clone()))),
            (StoreBackend::Local, None) => Err(ConfigError::Missing(vec!["LOCAL_STORE_ROOT"])),
            (StoreBackend::Gcs, _) => Ok(Box::new(GcloudStore::with_program(self.gcloud_bin.clone()))),
        }
    }
}

/// External database tool executables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_mongodump_bin")]
    pub mongodump_bin: String,

    #[serde(default = "default_mongorestore_bin")]
    pub mongorestore_bin: String,
}

fn default_mongodump_bin() -> String {
    "mongodump".to_string()
}

fn default_mongorestore_bin() -> String {
    "mongorestore".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mongodump_bin: default_mongodump_bin(),
            mongorestore_bin: default_mongorestore_bin(),
        }
    }
}

impl ToolSettings {
    /// Tools bound to one deployment
    pub fn build(&self, mongo_uri: &str) -> MongoTools {
        MongoTools::new(mongo_uri).with_programs(self.mongodump_bin.clone(), self.mongorestore_bin.clone())
    }
}
