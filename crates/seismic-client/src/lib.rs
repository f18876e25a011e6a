//! CLI, parameter handling, config, output rendering
//!
//! This crate provides the `seismic` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod service;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use service::{EventService, FetchParams, QueryDefaults};
