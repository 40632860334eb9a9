//! Core traits defined in `montage-core` and implemented by other crates.

pub mod listing;
pub mod storage;

pub use listing::ListingService;
pub use storage::{Listing, StorageObjectMeta, StorageProvider};
