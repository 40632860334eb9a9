//! # montage-core
//!
//! Core crate for the montage uploader. Contains the storage and listing
//! traits, configuration schemas, the root-kind type, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other montage crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::RootKind;
