//! Command-line interface module.
//!
//! Provides argument parsing, the air hockey menu and subcommand handling.

pub mod args;
pub mod commands;
pub mod menu;
