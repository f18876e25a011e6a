//! Subcommand implementations.

pub mod config;
pub mod providers;
pub mod query;
