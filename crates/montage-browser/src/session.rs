//! Session context carrying the user's folder selections.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use montage_core::types::RootKind;

use crate::selection::SelectionConsumer;

/// The folders chosen for a montage: one video folder, one music folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageSelection {
    /// Selected video folder path.
    pub video_folder: Option<String>,
    /// Selected music folder path.
    pub music_folder: Option<String>,
}

impl MontageSelection {
    /// Selected folder for a root kind.
    pub fn folder(&self, kind: RootKind) -> Option<&str> {
        match kind {
            RootKind::Video => self.video_folder.as_deref(),
            RootKind::Music => self.music_folder.as_deref(),
        }
    }

    /// Whether both folders have been chosen.
    pub fn is_complete(&self) -> bool {
        self.video_folder.is_some() && self.music_folder.is_some()
    }
}

/// State for one user session, passed explicitly to browsers.
///
/// Dropping the context (and the consumers made from it) ends the session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session identifier.
    pub session_id: Uuid,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    selection: Arc<RwLock<MontageSelection>>,
}

impl SessionContext {
    /// Start a new session with nothing selected.
    pub fn new() -> Self {
        let ctx = Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            selection: Arc::new(RwLock::new(MontageSelection::default())),
        };
        info!(session_id = %ctx.session_id, "Session started");
        ctx
    }

    /// Current selection.
    pub fn selection(&self) -> MontageSelection {
        self.selection
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Record `path` as the selected folder for `kind`.
    pub fn select(&self, kind: RootKind, path: &str) {
        let mut selection = self
            .selection
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let slot = match kind {
            RootKind::Video => &mut selection.video_folder,
            RootKind::Music => &mut selection.music_folder,
        };
        *slot = Some(path.to_string());
    }

    /// Clear every selection.
    pub fn clear(&self) {
        *self
            .selection
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = MontageSelection::default();
    }

    /// A consumer that records selections for `kind` into this session.
    pub fn consumer(&self, kind: RootKind) -> SessionConsumer {
        SessionConsumer {
            kind,
            session: self.clone(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Selection consumer bound to one session and root kind.
#[derive(Debug, Clone)]
pub struct SessionConsumer {
    kind: RootKind,
    session: SessionContext,
}

impl SelectionConsumer for SessionConsumer {
    fn folder_selected(&self, path: &str) {
        self.session.select(self.kind, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumers_fill_their_slot() {
        let session = SessionContext::new();
        session.consumer(RootKind::Video).folder_selected("trip_2023/day1");
        assert!(!session.selection().is_complete());

        session.consumer(RootKind::Music).folder_selected("ambient");
        let selection = session.selection();
        assert_eq!(selection.folder(RootKind::Video), Some("trip_2023/day1"));
        assert_eq!(selection.folder(RootKind::Music), Some("ambient"));
        assert!(selection.is_complete());
    }

    #[test]
    fn test_latest_selection_wins() {
        let session = SessionContext::new();
        let consumer = session.consumer(RootKind::Video);
        consumer.folder_selected("wedding");
        consumer.folder_selected("trip_2023");
        assert_eq!(session.selection().video_folder.as_deref(), Some("trip_2023"));

        session.clear();
        assert_eq!(session.selection(), MontageSelection::default());
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = SessionContext::new();
        let b = SessionContext::new();
        a.select(RootKind::Music, "jazz");
        assert!(b.selection().music_folder.is_none());
        assert_ne!(a.session_id, b.session_id);
    }
}
