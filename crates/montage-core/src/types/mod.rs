//! Shared value types and path helpers.

pub mod folder_path;
pub mod root_kind;

pub use root_kind::RootKind;
