use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{MediaAsset, MediaStore};
use crate::common::error::AppResult;

/// Keeps objects in a map; URLs are `memory://{key}`.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    order: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn keys(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<MediaAsset> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        self.order.lock().unwrap().push(key.to_string());

        Ok(MediaAsset {
            key: key.to_string(),
            url: format!("memory://{}", key),
            content_type: content_type.to_string(),
        })
    }
}
