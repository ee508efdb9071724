use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    storage::StorageService,
};

lazy_static! {
    /// MIME types accepted for content images.
    pub static ref IMAGE_MIME: Regex = Regex::new(r"^image/(jpeg|jpg|png|webp|gif)$").unwrap();
}

/// IncomingFile
///
/// One file part pulled out of a multipart body.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// ImageRules
///
/// Validation and placement rules for one upload call: accepted MIME pattern, maximum
/// size in bytes and the key prefix uploads are stored under.
#[derive(Debug, Clone)]
pub struct ImageRules {
    pub allowed_mime: Regex,
    pub max_bytes: usize,
    pub prefix: String,
}

impl ImageRules {
    /// Standard image rules for a content type's prefix (e.g. `wisata`).
    pub fn images(prefix: &str, max_bytes: usize) -> Self {
        Self {
            allowed_mime: IMAGE_MIME.clone(),
            max_bytes,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// validate
    ///
    /// Checks one file against the rules. Runs for every file before any storage call
    /// is made, so a batch with one bad file uploads nothing.
    pub fn validate(&self, file: &IncomingFile) -> ApiResult<()> {
        if !self.allowed_mime.is_match(&file.content_type) {
            return Err(ApiError::validation(format!(
                "{}: unsupported file type '{}'",
                file.file_name, file.content_type
            )));
        }
        if file.bytes.is_empty() {
            return Err(ApiError::validation(format!("{}: file is empty", file.file_name)));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(ApiError::validation(format!(
                "{}: file exceeds the {} byte limit",
                file.file_name, self.max_bytes
            )));
        }
        Ok(())
    }

    fn object_key(&self, file: &IncomingFile) -> String {
        format!("{}/{}.{}", self.prefix, Uuid::new_v4(), extension_for(file))
    }
}

fn extension_for(file: &IncomingFile) -> String {
    match file.content_type.as_str() {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/png" => "png".to_string(),
        "image/webp" => "webp".to_string(),
        "image/gif" => "gif".to_string(),
        _ => std::path::Path::new(&file.file_name)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_lowercase)
            .unwrap_or_else(|| "bin".to_string()),
    }
}

/// upload_images
///
/// Validates every file, then uploads them one by one under generated unique keys and
/// returns their public URLs in input order. If an upload fails midway the files already
/// stored by this call are removed again (best-effort) before the error is returned.
pub async fn upload_images(
    storage: &dyn StorageService,
    files: Vec<IncomingFile>,
    rules: &ImageRules,
) -> ApiResult<Vec<String>> {
    for file in &files {
        rules.validate(file)?;
    }

    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let key = rules.object_key(&file);
        match storage.put_object(&key, file.bytes, &file.content_type).await {
            Ok(url) => {
                tracing::debug!(key = %key, "image uploaded");
                urls.push(url);
            }
            Err(e) => {
                delete_images(storage, &urls).await;
                return Err(e.into());
            }
        }
    }
    Ok(urls)
}

/// delete_images
///
/// Best-effort removal by public URL. Failures are logged and swallowed; URLs that do
/// not belong to this store are skipped.
pub async fn delete_images(storage: &dyn StorageService, urls: &[String]) {
    for url in urls {
        let Some(key) = storage.key_from_url(url) else {
            tracing::debug!(url = %url, "skipping foreign image url");
            continue;
        };
        if let Err(e) = storage.delete_object(&key).await {
            tracing::warn!(url = %url, error = %e, "failed to delete stored image");
        }
    }
}

/// Images present in `old` but no longer in `new`.
pub fn replaced_images(old: &[String], new: &[String]) -> Vec<String> {
    old.iter().filter(|url| !new.contains(url)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStorageService;

    fn file(content_type: &str, size: usize) -> IncomingFile {
        IncomingFile {
            field: "gambar".to_string(),
            file_name: "kawah.png".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![7u8; size],
        }
    }

    #[tokio::test]
    async fn rejects_bad_mime_before_touching_storage() {
        let storage = MockStorageService::new();
        let rules = ImageRules::images("wisata", 1024);

        let result = upload_images(
            &storage,
            vec![file("image/png", 10), file("application/pdf", 10)],
            &rules,
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(storage.uploads().is_empty());
    }

    #[tokio::test]
    async fn rejects_oversized_and_empty_files() {
        let rules = ImageRules::images("wisata", 8);
        assert!(rules.validate(&file("image/png", 9)).is_err());
        assert!(rules.validate(&file("image/png", 0)).is_err());
        assert!(rules.validate(&file("image/png", 8)).is_ok());
    }

    #[tokio::test]
    async fn uploads_under_prefix_with_unique_keys() {
        let storage = MockStorageService::new();
        let rules = ImageRules::images("/event/", 1024);

        let urls = upload_images(
            &storage,
            vec![file("image/jpeg", 4), file("image/webp", 4)],
            &rules,
        )
        .await
        .unwrap();

        let uploads = storage.uploads();
        assert_eq!(urls.len(), 2);
        assert_ne!(uploads[0].key, uploads[1].key);
        assert!(uploads[0].key.starts_with("event/") && uploads[0].key.ends_with(".jpg"));
        assert!(uploads[1].key.ends_with(".webp"));
        assert_eq!(storage.key_from_url(&urls[0]), Some(uploads[0].key.clone()));
    }

    #[tokio::test]
    async fn delete_images_swallows_failures() {
        let storage = MockStorageService::new_failing_deletes();
        let urls = vec![
            storage.public_url("artikel/a.png"),
            "https://elsewhere.example/b.png".to_string(),
        ];

        delete_images(&storage, &urls).await;

        assert_eq!(storage.deletions(), vec!["artikel/a.png".to_string()]);
    }

    #[test]
    fn replaced_images_keeps_only_dropped_urls() {
        let old = vec!["a".to_string(), "b".to_string()];
        let new = vec!["b".to_string(), "c".to_string()];
        assert_eq!(replaced_images(&old, &new), vec!["a".to_string()]);
    }
}
