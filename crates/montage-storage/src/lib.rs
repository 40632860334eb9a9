//! # montage-storage
//!
//! Storage provider implementations for the montage uploader. Supports the
//! local filesystem, an in-memory key set, and S3-compatible object stores.

pub mod grouping;
pub mod manager;
pub mod providers;

pub use manager::StorageManager;
