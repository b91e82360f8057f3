use tracing::info;

use crate::common::error::AppResult;
use crate::common::upload::UploadedFile;
use crate::infrastructure::storage::{MediaAsset, upload_key};
use crate::state::AppState;

pub struct MediaService;

impl MediaService {
    /// Stores an uploaded file under a fresh `uploads/` key.
    pub async fn store(state: &AppState, file: UploadedFile) -> AppResult<MediaAsset> {
        let key = upload_key(&file.file_name);
        let asset = state
            .storage
            .put_object(&key, file.bytes, &file.content_type)
            .await?;

        info!("Stored {} as {}", file.file_name, asset.key);
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Bytes;

    use super::*;
    use crate::infrastructure::storage::memory::MemoryStore;
    use crate::state::tests::state;

    #[tokio::test]
    async fn stores_under_uploads_with_its_content_type() {
        let store = Arc::new(MemoryStore::default());
        let state = state("http://127.0.0.1:1", store.clone());

        let asset = MediaService::store(
            &state,
            UploadedFile {
                file_name: "v.mp4".into(),
                content_type: "video/mp4".into(),
                bytes: Bytes::from_static(b"\x00\x00\x00\x18ftypmp42"),
            },
        )
        .await
        .unwrap();

        assert!(asset.key.starts_with("uploads/"));
        assert!(asset.key.ends_with("-v.mp4"));
        assert_eq!(asset.url, format!("memory://{}", asset.key));
        let (_, content_type) = store.get(&asset.key).unwrap();
        assert_eq!(content_type, "video/mp4");
    }
}
