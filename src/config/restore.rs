//! Recovery run configuration

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;

use super::errors::{require, ConfigError, ConfigResult};
use super::settings::{default_staging_dir, load_json, StoreSettings, ToolSettings};
use crate::catalog::DEFAULT_GRACE_WINDOW_MINUTES;
use crate::orchestrator::{RecoveryAction, RecoveryError, RecoveryPlan, SegmentSource};
use crate::timestamp::parse_target_time;

fn default_grace_window_minutes() -> u32 {
    DEFAULT_GRACE_WINDOW_MINUTES
}

/// Raw settings of a recovery run
///
/// Values are kept as given and checked by [`RestoreConfig::recovery_plan`],
/// so a bad value is reported with the setting it came from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreConfig {
    /// `FULL_RESTORE` or `OPLOG_REPLAY` (`SEGMENT_REPLAY` accepted)
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub full_dump_uri: Option<String>,

    #[serde(default)]
    pub mongo_uri: Option<String>,

    #[serde(default)]
    pub oplog_bucket_name: Option<String>,

    #[serde(default)]
    pub env: Option<String>,

    /// `YYYY/MM/DD HH:MM`, UTC
    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default = "default_grace_window_minutes")]
    pub grace_window_minutes: u32,

    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub tools: ToolSettings,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            action: None,
            full_dump_uri: None,
            mongo_uri: None,
            oplog_bucket_name: None,
            env: None,
            end_time: None,
            grace_window_minutes: default_grace_window_minutes(),
            staging_dir: default_staging_dir(),
            store: StoreSettings::default(),
            tools: ToolSettings::default(),
        }
    }
}

impl RestoreConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_json(path)
    }

    /// Validate everything and build the plan. Performs no I/O.
    ///
    /// Checks run in a fixed order: the always-required settings, then the
    /// action value, then the settings the action needs, then END_TIME.
    pub fn recovery_plan(&self) -> ConfigResult<RecoveryPlan> {
        require(&[
            ("FULL_DUMP_URI", self.full_dump_uri.as_deref()),
            ("ACTION", self.action.as_deref()),
            ("MONGO_URI", self.mongo_uri.as_deref()),
        ])?;
        self.store.validate()?;

        let action: RecoveryAction = self
            .action
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e: RecoveryError| ConfigError::InvalidAction(e.to_string()))?;

        let locator = self.full_dump_uri.as_deref().unwrap_or_default().trim();
        let grace = TimeDelta::minutes(i64::from(self.grace_window_minutes));

        match action {
            RecoveryAction::FullRestore => Ok(RecoveryPlan::full_restore(locator).with_grace_window(grace)),
            RecoveryAction::OplogReplay => {
                require(&[
                    ("OPLOG_BUCKET_NAME", self.oplog_bucket_name.as_deref()),
                    ("ENV", self.env.as_deref()),
                ])?;
                let target = match self.end_time.as_deref().map(str::trim) {
                    Some(raw) if !raw.is_empty() => Some(parse_target_time(raw)?),
                    _ => None,
                };
                let source = SegmentSource::new(
                    self.oplog_bucket_name.as_deref().unwrap_or_default(),
                    self.env.as_deref().unwrap_or_default(),
                );
                Ok(RecoveryPlan::oplog_replay(locator, source, target).with_grace_window(grace))
            }
        }
    }

    /// Connection string of the target deployment
    pub fn mongo_uri(&self) -> ConfigResult<&str> {
        require(&[("MONGO_URI", self.mongo_uri.as_deref())])?;
        Ok(self.mongo_uri.as_deref().unwrap_or_default())
    }
}
