//! create-creator Core Library
//!
//! This crate provides the foundational utilities shared by the scaffolder:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Git user lookup

pub mod config;
pub mod error;
pub mod logging;
pub mod user;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use user::GitUser;
