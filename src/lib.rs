//! Vigil - Position monitoring and notification engine for trading accounts

pub mod config;
pub mod error;
pub mod exchange;
pub mod notify;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{MonitorError, Result};
pub use types::*;
