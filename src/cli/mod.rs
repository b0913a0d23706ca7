//! CLI module for tasbeeh - command-line interface and subcommands.
//!
//! The subcommands play the role of the three logical views: the list
//! (`list`), the editor (`add` / `edit`) and the counter (`show` / `count` /
//! `undo` / `reset`).

pub mod commands;

pub use commands::Cli;
