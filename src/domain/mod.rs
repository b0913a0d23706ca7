//! Domain types for tasbeeh
//!
//! This module contains the core record types:
//! - Tasbeeh: a named repetition counter with a target and recurrence period
//! - Period: the informational recurrence tag (daily/weekly/monthly)
//! - TasbeehInput / TasbeehUpdate: creation payload and partial patch

pub mod tasbeeh;

pub use tasbeeh::{ID_PREFIX, Period, Tasbeeh, TasbeehInput, TasbeehUpdate};
