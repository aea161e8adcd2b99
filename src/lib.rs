//! mongo-pitr - point-in-time recovery for MongoDB
//!
//! Restores a deployment from a full backup archive held in an object
//! store, then replays the oplog segments recorded after it up to a chosen
//! target time. Also produces both artifact kinds.

pub mod backup;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod locator;
pub mod object_store;
pub mod observability;
pub mod orchestrator;
pub mod staging;
pub mod timestamp;
pub mod tools;
