//! Storage manager over the local provider.

use montage_core::config::storage::StorageConfig;
use montage_core::traits::ListingService;
use montage_core::types::RootKind;
use montage_storage::StorageManager;

async fn local_manager(dir: &tempfile::TempDir) -> StorageManager {
    let mut config = StorageConfig::default();
    config.local.root_path = dir.path().to_string_lossy().to_string();
    StorageManager::from_config(&config).await.unwrap()
}

#[tokio::test]
async fn test_create_then_list_local_folders() {
    let dir = tempfile::tempdir().unwrap();
    let manager = local_manager(&dir).await;

    let trip = manager
        .create_folder(RootKind::Video, "", "  Trip 2023 ")
        .await
        .unwrap();
    assert_eq!(trip, "trip_2023");
    manager
        .create_folder(RootKind::Video, &trip, "Day1")
        .await
        .unwrap();
    manager
        .create_folder(RootKind::Music, "", "Ambient")
        .await
        .unwrap();

    assert!(dir.path().join("video-uploads/trip_2023/day1").is_dir());
    assert_eq!(
        manager.list_folders(RootKind::Video, "").await.unwrap(),
        vec!["trip_2023"]
    );
    assert_eq!(
        manager.list_folders(RootKind::Video, "trip_2023").await.unwrap(),
        vec!["trip_2023/day1"]
    );
    assert_eq!(
        manager.list_folders(RootKind::Music, "").await.unwrap(),
        vec!["ambient"]
    );
}

#[tokio::test]
async fn test_list_entries_separates_files() {
    let dir = tempfile::tempdir().unwrap();
    let manager = local_manager(&dir).await;
    manager
        .create_folder(RootKind::Video, "", "wedding")
        .await
        .unwrap();
    std::fs::write(dir.path().join("video-uploads/wedding/vows.mp4"), b"0123").unwrap();
    manager
        .create_folder(RootKind::Video, "wedding", "party")
        .await
        .unwrap();

    let listing = manager.list_entries(RootKind::Video, "wedding").await.unwrap();
    assert_eq!(listing.folders, vec!["wedding/party"]);
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].path, "wedding/vows.mp4");
    assert_eq!(listing.files[0].size_bytes, 4);
}

#[tokio::test]
async fn test_invalid_folder_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = local_manager(&dir).await;
    assert!(manager.create_folder(RootKind::Video, "", "   ").await.is_err());
    assert!(manager.create_folder(RootKind::Video, "", "a/b").await.is_err());
}
