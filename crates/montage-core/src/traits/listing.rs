//! The listing contract consumed by the folder browser.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::storage::Listing;
use crate::types::RootKind;

/// Lists folders one level deep within a root namespace.
///
/// Implementations do not distinguish error causes for the browser: any
/// transport or permission failure comes back as an `Err`.
#[async_trait]
pub trait ListingService: Send + Sync + std::fmt::Debug + 'static {
    /// Immediate child folder paths of `prefix` (empty for the root), in
    /// backend order, without trailing delimiters.
    async fn list_folders(&self, kind: RootKind, prefix: &str) -> AppResult<Vec<String>>;

    /// Immediate child folders and files of `prefix`.
    async fn list_entries(&self, kind: RootKind, prefix: &str) -> AppResult<Listing>;
}
