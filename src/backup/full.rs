//! Full backup producer

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use super::errors::{BackupError, BackupResult};
use crate::object_store::ObjectStore;
use crate::observability::Event;
use crate::staging::remove_staged_file;
use crate::timestamp::format_embedded_timestamp;
use crate::tools::{DumpSpec, DumpTool};

/// Parameters of one full backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullBackupPlan {
    pub bucket: String,
    pub env: String,
    pub app_name: String,
    /// Local directory the archive is written to before upload
    pub staging_dir: PathBuf,
    /// Scheme of the returned locator
    pub scheme: String,
}

impl FullBackupPlan {
    /// Object key for an archive file name
    pub fn object_key(&self, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.env.trim_matches('/'),
            self.app_name.trim_matches('/'),
            file_name
        )
    }
}

/// Archive file name for a backup taken at `taken_at`
pub fn full_backup_file_name(taken_at: DateTime<Utc>) -> String {
    format!("mongodb_backup_{}.gz", format_embedded_timestamp(taken_at))
}

/// Dump the whole deployment, upload the archive, remove the local copy.
///
/// Returns the locator of the uploaded archive, suitable as a recovery
/// `FULL_DUMP_URI`.
pub fn run_full_backup(
    dump: &dyn DumpTool,
    store: &dyn ObjectStore,
    plan: &FullBackupPlan,
    taken_at: DateTime<Utc>,
) -> BackupResult<String> {
    let file_name = full_backup_file_name(taken_at);
    let output = plan.staging_dir.join(&file_name);

    let archive = dump.dump(&DumpSpec::FullArchive { output })?;
    let key = plan.object_key(&file_name);

    info!(
        file = %archive.display(),
        destination = %format!("{}://{}/{}", plan.scheme, plan.bucket, key),
        "uploading full backup"
    );
    let uploaded = store.put(&plan.bucket, &key, &archive);
    remove_staged_file(&archive);
    uploaded.map_err(|source| BackupError::Upload {
        key: key.clone(),
        source,
    })?;

    info!(event = %Event::UploadComplete, key = %key, "upload complete");
    Ok(format!("{}://{}/{}", plan.scheme, plan.bucket, key))
}
