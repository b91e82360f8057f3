use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use tracing::{error, info};

use super::{MediaAsset, MediaStore};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::StorageSettings;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    public_base: String,
}

impl StorageService {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            "static",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &settings.endpoint {
            // S3-compatible stores (MinIO, R2) need path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        let public_base = public_base(settings);

        info!("✅ S3 storage ready (bucket {})", settings.bucket);

        Self {
            client,
            bucket: settings.bucket.clone(),
            public_base,
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}

fn public_base(settings: &StorageSettings) -> String {
    if let Some(url) = &settings.public_url {
        return url.trim_end_matches('/').to_string();
    }
    match &settings.endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            settings.bucket, settings.region
        ),
    }
}

#[async_trait]
impl MediaStore for StorageService {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<MediaAsset> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("S3 upload of {} failed: {}", key, DisplayErrorContext(&e));
                AppError::Storage(format!("Failed to upload {}: {}", key, e))
            })?;

        let url = self.object_url(key);
        info!("✅ Uploaded {} bytes to {}", size, url);

        Ok(MediaAsset {
            key: key.to_string(),
            url,
            content_type: content_type.to_string(),
        })
    }
}
