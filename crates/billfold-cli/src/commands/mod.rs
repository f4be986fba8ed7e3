//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database initialization and the shared open_db utility
//! - `serve` - Web server command
//! - `status` - Database status command

pub mod core;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use status::*;
