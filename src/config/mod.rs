//! Configuration
//!
//! Settings are read once at the entry point, either from command-line
//! flags (each with an environment-variable fallback) or from a JSON file,
//! and handed down as explicit structs. Nothing below this module reads the
//! process environment.
//!
//! Each config type validates itself into the plan its subsystem consumes:
//!
//! - [`RestoreConfig::recovery_plan`] → [`crate::orchestrator::RecoveryPlan`]
//! - [`FullBackupConfig::plan`] → [`crate::backup::FullBackupPlan`]
//! - [`OplogBackupConfig::plan`] → [`crate::backup::OplogBackupPlan`]

mod backup;
mod errors;
mod restore;
mod settings;

pub use backup::{FullBackupConfig, OplogBackupConfig};
pub use errors::{ConfigError, ConfigResult};
pub use restore::RestoreConfig;
pub use settings::{default_staging_dir, load_json, StoreBackend, StoreSettings, ToolSettings};
