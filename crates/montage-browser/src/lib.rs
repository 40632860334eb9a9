//! # montage-browser
//!
//! Lazily materialized folder tree over a [`ListingService`], one level
//! per expansion. [`FolderBrowser`] is the state machine; [`BrowserService`]
//! runs it on its own task so callers keep issuing commands while a fetch
//! is outstanding.
//!
//! [`ListingService`]: montage_core::traits::ListingService

pub mod browser;
pub mod node;
pub mod selection;
pub mod service;
pub mod session;
pub mod state;
pub mod tree;

pub use browser::{FetchRequest, FetchTarget, FolderBrowser, ToggleOutcome};
pub use node::FolderNode;
pub use selection::SelectionConsumer;
pub use service::{BrowserCommand, BrowserHandle, BrowserService, BrowserSnapshot};
pub use session::{MontageSelection, SessionContext};
pub use state::{BrowserError, BrowserState};
pub use tree::FolderTree;
