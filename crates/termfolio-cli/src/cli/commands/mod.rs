//! CLI command handlers.

pub mod config;
pub mod run;
pub mod tui;
