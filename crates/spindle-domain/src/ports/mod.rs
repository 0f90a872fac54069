//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the outer layers. The domain
//! defines the interfaces; infrastructure implements them (filesystem path
//! resolution, format parsers). This keeps the loading algorithm independent
//! of where configuration bytes come from and how they are decoded.

/// Configuration loading ports (path resolution and parsing)
pub mod config;

// Re-export commonly used port traits for convenience
pub use config::{ConfigParser, PathResolver};
