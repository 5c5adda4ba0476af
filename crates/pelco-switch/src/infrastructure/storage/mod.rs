//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate
//!   directory or an explicit path.
//! - Providing sensible defaults when the file does not exist yet.
//! - Rejecting camera lists that cannot back a route table.

pub mod config;
