use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::common::error::AppResult;

#[cfg(test)]
pub mod memory;
pub mod s3;

/// Stored binary content, addressed by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaAsset {
    pub key: String,
    pub url: String,
    pub content_type: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Writes `body` under `key` and returns a durable URL for it.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<MediaAsset>;
}

fn key_stamp() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = Uuid::new_v4().as_simple().to_string()[..6].to_string();
    format!("{}-{}", millis, suffix)
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `uploads/{millis}-{rand}-{name}`
pub fn upload_key(file_name: &str) -> String {
    format!("uploads/{}-{}", key_stamp(), sanitize_file_name(file_name))
}

/// `audio/{millis}-{rand}.mp3`
pub fn speech_key() -> String {
    format!("audio/{}.mp3", key_stamp())
}
