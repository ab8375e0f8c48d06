pub mod cli;
pub mod collaborators;
pub mod commands;
pub mod config;
mod logging;
pub mod pager;
pub mod prompt;
pub mod validation;

pub use logging::{jsonlog::JsonFileLog, multilog::MultiLogger};

/// Version of the partitioner.
pub const PARTITIONER_VERSION: &str = env!("CARGO_PKG_VERSION");
