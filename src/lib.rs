//! Tasbeeh - a local-first prayer counter manager
//!
//! Named repetition counters with a completion target and recurrence period,
//! persisted on local disk as a single JSON collection. An in-memory reactive
//! store mirrors the persisted collection and broadcasts change events.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod storage;
pub mod store;

pub use error::{Result, TasbeehError};
