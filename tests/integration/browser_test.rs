//! Browser service end to end over in-memory buckets.

use std::sync::Arc;

use montage_browser::{BrowserCommand, BrowserState, SessionContext};
use montage_core::types::RootKind;

use crate::helpers::{self, CountingListing};

#[tokio::test]
async fn test_browse_and_select_video_folder() {
    let storage = Arc::new(helpers::memory_storage().await);
    let session = SessionContext::new();
    let handle = helpers::spawn_browser(storage, RootKind::Video, &session);

    let snapshot = helpers::wait(&handle, |s| s.state == BrowserState::Ready).await;
    assert_eq!(helpers::root_names(&snapshot), vec!["trip_2023", "wedding"]);

    let snapshot = handle
        .send_and_settle(BrowserCommand::Toggle("trip_2023".into()))
        .await
        .unwrap();
    let trip = snapshot.tree.find("trip_2023").unwrap();
    let children: Vec<_> = trip.children().iter().map(|n| n.path()).collect();
    assert_eq!(children, vec!["trip_2023/day1", "trip_2023/day2"]);

    handle
        .send_and_settle(BrowserCommand::Select("trip_2023/day1".into()))
        .await
        .unwrap();
    assert_eq!(
        session.selection().video_folder.as_deref(),
        Some("trip_2023/day1")
    );
    assert!(session.selection().music_folder.is_none());
}

#[tokio::test]
async fn test_two_browsers_fill_one_selection() {
    let storage = Arc::new(helpers::memory_storage().await);
    let session = SessionContext::new();
    let video = helpers::spawn_browser(storage.clone(), RootKind::Video, &session);
    let music = helpers::spawn_browser(storage, RootKind::Music, &session);

    helpers::wait(&video, |s| s.state == BrowserState::Ready).await;
    let snapshot = helpers::wait(&music, |s| s.state == BrowserState::Ready).await;
    assert_eq!(helpers::root_names(&snapshot), vec!["ambient", "jazz"]);

    video
        .send_and_settle(BrowserCommand::Select("wedding".into()))
        .await
        .unwrap();
    music
        .send_and_settle(BrowserCommand::Activate("jazz".into()))
        .await
        .unwrap();

    let selection = session.selection();
    assert!(selection.is_complete());
    assert_eq!(selection.video_folder.as_deref(), Some("wedding"));
    assert_eq!(selection.music_folder.as_deref(), Some("jazz"));
}

#[tokio::test]
async fn test_failed_expansion_keeps_tree() {
    let storage = helpers::memory_storage().await;
    let listing = Arc::new(CountingListing::new(storage).failing("wedding"));
    let session = SessionContext::new();
    let handle = helpers::spawn_browser(listing.clone(), RootKind::Video, &session);

    let before = helpers::wait(&handle, |s| s.state == BrowserState::Ready).await;

    let after = handle
        .send_and_settle(BrowserCommand::Toggle("wedding".into()))
        .await
        .unwrap();
    assert_eq!(after.tree, before.tree);
    let error = after.error.expect("expansion error");
    assert!(error.to_string().starts_with("Failed to load subfolders for wedding"));
    assert!(matches!(after.state, BrowserState::Error(_)));
}

#[tokio::test]
async fn test_reexpand_uses_loaded_children() {
    let storage = helpers::memory_storage().await;
    let listing = Arc::new(CountingListing::new(storage));
    let session = SessionContext::new();
    let handle = helpers::spawn_browser(listing.clone(), RootKind::Video, &session);
    helpers::wait(&handle, |s| s.state == BrowserState::Ready).await;

    for _ in 0..3 {
        handle
            .send_and_settle(BrowserCommand::Toggle("trip_2023".into()))
            .await
            .unwrap();
    }
    let snapshot = handle.snapshot();
    assert!(snapshot.tree.find("trip_2023").unwrap().is_expanded());
    // Root listing plus a single expansion.
    assert_eq!(listing.calls(), 2);
}

#[tokio::test]
async fn test_switch_root_kind_reloads() {
    let storage = helpers::memory_storage().await;
    let listing = Arc::new(CountingListing::new(storage));
    let session = SessionContext::new();
    let handle = helpers::spawn_browser(listing.clone(), RootKind::Video, &session);
    helpers::wait(&handle, |s| s.state == BrowserState::Ready).await;
    handle
        .send_and_settle(BrowserCommand::Toggle("wedding".into()))
        .await
        .unwrap();

    let snapshot = handle
        .send_and_settle(BrowserCommand::SetRootKind(RootKind::Music))
        .await
        .unwrap();
    assert_eq!(snapshot.kind, RootKind::Music);
    assert_eq!(helpers::root_names(&snapshot), vec!["ambient", "jazz"]);
    assert_eq!(snapshot.tree.len(), 2);

    let snapshot = handle
        .send_and_settle(BrowserCommand::SetRootKind(RootKind::Video))
        .await
        .unwrap();
    assert!(!snapshot.tree.find("wedding").unwrap().is_expanded());
    assert_eq!(listing.calls(), 4);
}

#[tokio::test]
async fn test_root_failure_is_reported() {
    let storage = helpers::memory_storage().await;
    let listing = Arc::new(CountingListing::new(storage).failing(""));
    let session = SessionContext::new();
    let handle = helpers::spawn_browser(listing, RootKind::Music, &session);

    let snapshot = helpers::wait(&handle, |s| matches!(s.state, BrowserState::Error(_))).await;
    assert!(snapshot.tree.is_empty());
    assert_eq!(
        snapshot.error.unwrap().to_string(),
        "Failed to load music folders: bucket unavailable"
    );
}
