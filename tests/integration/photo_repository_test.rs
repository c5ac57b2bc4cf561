// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_db;
use futures::future::join_all;
use photoprint::domain::models::photo::{NewPhoto, Photo, PhotoStatus};
use photoprint::domain::repositories::photo_repository::PhotoRepository;
use photoprint::infrastructure::repositories::photo_repo_impl::PhotoRepositoryImpl;
use serde_json::json;
use std::sync::Arc;

fn new_photo() -> Photo {
    Photo::new(NewPhoto {
        user_id: "u1".to_string(),
        title: "Graduation".to_string(),
        ai_tool: "saudi-look".to_string(),
        original_url: "https://cdn.example.com/grad.jpg".to_string(),
        edited_url: None,
        thumbnail_url: None,
        editing_settings: json!({ "frame": "gold" }),
        price: 45.0,
        print_size: "8x10".to_string(),
        status: PhotoStatus::Uploaded,
    })
}

#[tokio::test]
async fn test_update_on_missing_row_returns_none() {
    let repo = PhotoRepositoryImpl::new(create_test_db().await);

    let updated = repo
        .update_status("missing", &PhotoStatus::Failed)
        .await
        .unwrap();
    assert!(updated.is_none());

    let updated = repo
        .update_edited_version("missing", "https://x/y.jpg", &PhotoStatus::Completed)
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_status_update_keeps_other_columns() {
    let repo = PhotoRepositoryImpl::new(create_test_db().await);
    let photo = repo.create(&new_photo()).await.unwrap();

    repo.update_edited_version(&photo.id, "https://x/edited.jpg", &PhotoStatus::Completed)
        .await
        .unwrap();
    let updated = repo
        .update_status(&photo.id, &PhotoStatus::Other("printing".into()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, PhotoStatus::Other("printing".into()));
    assert_eq!(updated.edited_url.as_deref(), Some("https://x/edited.jpg"));
    assert_eq!(updated.editing_settings, json!({ "frame": "gold" }));
    assert_eq!(updated.title, "Graduation");
    assert!(updated.updated_at >= photo.updated_at);
}

#[tokio::test]
async fn test_concurrent_updates_do_not_drop_edited_url() {
    let repo = Arc::new(PhotoRepositoryImpl::new(create_test_db().await));
    let photo = repo.create(&new_photo()).await.unwrap();

    let edited = {
        let repo = repo.clone();
        let id = photo.id.clone();
        tokio::spawn(async move {
            repo.update_edited_version(&id, "https://x/edited.jpg", &PhotoStatus::Completed)
                .await
        })
    };
    let status_writes = (0..10).map(|_| {
        let repo = repo.clone();
        let id = photo.id.clone();
        tokio::spawn(async move { repo.update_status(&id, &PhotoStatus::Processing).await })
    });

    edited.await.unwrap().unwrap();
    for result in join_all(status_writes).await {
        assert!(result.unwrap().unwrap().is_some());
    }

    let stored = repo.find_by_id(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.edited_url.as_deref(), Some("https://x/edited.jpg"));
}
