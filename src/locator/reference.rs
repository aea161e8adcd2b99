//! Backup reference resolution

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use super::errors::{LocatorError, LocatorResult};
use crate::timestamp::parse_embedded_timestamp;

/// A resolved full-backup artifact. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReference {
    scheme: String,
    bucket: String,
    object_path: String,
    created_at: DateTime<Utc>,
}

impl BackupReference {
    /// Bucket (authority component of the locator)
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object path inside the bucket, without a leading separator
    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    /// Final path element of the object path
    pub fn object_name(&self) -> &str {
        self.object_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.object_path)
    }

    /// Creation time embedded in the object name, UTC
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for BackupReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.object_path)
    }
}

impl FromStr for BackupReference {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Resolve a `scheme://bucket/path/to/name_YYYYMMDD_HHMMSS.ext` locator.
pub fn resolve(locator: &str) -> LocatorResult<BackupReference> {
    let url = Url::parse(locator.trim()).map_err(|e| LocatorError::invalid(locator, e.to_string()))?;

    let bucket = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| LocatorError::invalid(locator, "missing bucket"))?
        .to_string();

    let object_path = url.path().trim_start_matches('/').to_string();
    let object_name = object_path.rsplit('/').next().unwrap_or_default();
    if object_name.is_empty() {
        return Err(LocatorError::invalid(locator, "missing object name"));
    }

    let created_at = parse_embedded_timestamp(object_name)?;

    Ok(BackupReference {
        scheme: url.scheme().to_string(),
        bucket,
        object_path,
        created_at,
    })
}
