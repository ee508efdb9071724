use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::{error::DisplayErrorContext, primitives::ByteStream};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// StorageError
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {reason}")]
    Upload { key: String, reason: String },
    #[error("delete of '{key}' failed: {reason}")]
    Delete { key: String, reason: String },
}

// 1. StorageService Contract
/// StorageService
///
/// Abstract contract for the object storage holding uploaded images. The real client
/// (`S3StorageClient`) and the recording mock (`MockStorageService`) are interchangeable
/// behind `StorageState`.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket if it is missing. Only called in `Env::Local`.
    async fn ensure_bucket_exists(&self);

    /// Stores `bytes` under `key` and returns the object's public URL.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Base every public URL starts with, ending in `/`.
    fn public_base(&self) -> String;

    fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_base(), sanitize_key(key))
    }

    /// Maps a public URL produced by this store back to its object key. URLs pointing
    /// anywhere else yield `None`.
    fn key_from_url(&self, url: &str) -> Option<String> {
        let key = url.strip_prefix(&self.public_base())?;
        let key = key.split(['?', '#']).next().unwrap_or_default();
        let key = sanitize_key(key);
        (!key.is_empty()).then_some(key)
    }
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// `aws-sdk-s3` client with path-style addressing, which MinIO and most S3-compatible
/// gateways require.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_url: String,
}

impl S3StorageClient {
    pub fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        // CreateBucket fails harmlessly when the bucket already exists.
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!("create_bucket skipped: {}", DisplayErrorContext(&e));
        }
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(self.public_url(&key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }

    fn public_base(&self) -> String {
        format!("{}/{}/", self.public_url, self.bucket_name)
    }
}

/// sanitize_key
///
/// Removes empty, `.` and `..` segments so a key can never climb out of its prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory `StorageService` that records every call so tests can assert whether the
/// network would have been touched. Uploads and deletes can be made to fail separately.
#[derive(Default)]
pub struct MockStorageService {
    pub fail_uploads: bool,
    pub fail_deletes: bool,
    uploads: Mutex<Vec<MockUpload>>,
    deletions: Mutex<Vec<String>>,
}

/// A recorded `put_object` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockUpload {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

const MOCK_PUBLIC_BASE: &str = "http://localhost:9000/mock-bucket/";

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            fail_uploads: true,
            fail_deletes: true,
            ..Self::default()
        }
    }

    /// Uploads succeed, deletes fail.
    pub fn new_failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<MockUpload> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }

    /// Keys passed to `delete_object`, including attempts that were made to fail.
    pub fn deletions(&self) -> Vec<String> {
        self.deletions.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        if self.fail_uploads {
            return Err(StorageError::Upload {
                key,
                reason: "Mock Storage Error: Simulation requested".to_string(),
            });
        }
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(MockUpload {
                key: key.clone(),
                content_type: content_type.to_string(),
                size: bytes.len(),
            });
        }
        Ok(self.public_url(&key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if let Ok(mut deletions) = self.deletions.lock() {
            deletions.push(key.to_string());
        }
        if self.fail_deletes {
            return Err(StorageError::Delete {
                key: key.to_string(),
                reason: "Mock Storage Error: Simulation requested".to_string(),
            });
        }
        Ok(())
    }

    fn public_base(&self) -> String {
        MOCK_PUBLIC_BASE.to_string()
    }
}

/// StorageState
///
/// Shared handle to the storage layer held in `AppState`.
pub type StorageState = Arc<dyn StorageService>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_key_strips_traversal() {
        assert_eq!(sanitize_key("../../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize_key("wisata//./a.png"), "wisata/a.png");
    }

    #[test]
    fn key_from_url_only_accepts_own_urls() {
        let mock = MockStorageService::new();
        assert_eq!(
            mock.key_from_url("http://localhost:9000/mock-bucket/wisata/a.png?v=2"),
            Some("wisata/a.png".to_string())
        );
        assert_eq!(mock.key_from_url("https://cdn.example.com/wisata/a.png"), None);
        assert_eq!(mock.key_from_url(MOCK_PUBLIC_BASE), None);
    }

    #[test]
    fn s3_public_url_is_path_style() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "key",
            "secret",
            "geopark",
            "http://localhost:9000/",
        );
        assert_eq!(
            client.public_url("event/x.jpg"),
            "http://localhost:9000/geopark/event/x.jpg"
        );
    }
}
