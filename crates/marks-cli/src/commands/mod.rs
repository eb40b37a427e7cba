//! CLI command implementations

pub mod bookmark;
pub mod config;
pub mod exchange;
pub mod stats;
pub mod tag;
