//! External dump/restore capabilities
//!
//! Taking a dump and applying a dump are delegated to external tools. The
//! recovery core only sees two narrow traits:
//!
//! - [`DumpTool`]: produce a full archive or an oplog range dump
//! - [`RestoreTool`]: restore an archive, or replay an oplog dump up to a cutoff
//!
//! [`MongoTools`] implements both by running `mongodump` / `mongorestore`.
//! Tests substitute in-memory fakes.

mod errors;
mod mongo;
mod policy;

pub use errors::{ToolError, ToolResult};
pub use mongo::{redact_args, MongoTools};
pub use policy::{
    BsonTimestamp, DumpSpec, NamespacePolicy, OplogLimit, OplogRange, RestoreMode,
    EXCLUDED_NAMESPACES,
};

use std::path::{Path, PathBuf};

/// Producer-side capability
pub trait DumpTool: std::fmt::Debug {
    /// Run the dump described by `spec` and return the produced file
    fn dump(&self, spec: &DumpSpec) -> ToolResult<PathBuf>;
}

/// Apply-side capability
pub trait RestoreTool: std::fmt::Debug {
    /// Apply the staged artifact at `source` according to `mode`.
    ///
    /// Blocks until the external tool exits.
    fn restore(&self, source: &Path, mode: &RestoreMode) -> ToolResult<()>;
}
