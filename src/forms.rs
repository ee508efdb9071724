use axum::extract::Multipart;
use std::{collections::HashMap, str::FromStr};

use crate::{
    error::{ApiError, ApiResult},
    images::IncomingFile,
};

/// MultipartForm
///
/// A fully-read multipart body: text fields by name plus every file part. Content
/// handlers read the body once into this, then build their typed input from it.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<IncomingFile>,
}

impl MultipartForm {
    /// read
    ///
    /// Drains `multipart`. Parts with a file name are files; everything else is text.
    /// A repeated text field keeps its last value.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::validation(format!("Failed to read multipart data: {}", e))
        })? {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read file '{}': {}", file_name, e))
                })?;
                // Browsers send an empty part for an untouched file input.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.push(IncomingFile {
                    field: name,
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read field '{}': {}", name, e))
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &str) -> ApiResult<String> {
        self.text(name)
            .ok_or_else(|| ApiError::validation(format!("{} is required", name)))
    }

    /// Parses an optional field, reporting a 400 naming the field on malformed input.
    pub fn parse<T: FromStr>(&self, name: &str) -> ApiResult<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| ApiError::validation(format!("{} has an invalid format", name))),
        }
    }

    pub fn parse_required<T: FromStr>(&self, name: &str) -> ApiResult<T> {
        self.parse(name)?
            .ok_or_else(|| ApiError::validation(format!("{} is required", name)))
    }

    /// Removes and returns the file parts submitted under `field`.
    pub fn take_files(&mut self, field: &str) -> Vec<IncomingFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == field);
        self.files = rest;
        taken
    }

    #[cfg(test)]
    pub(crate) fn from_parts(fields: &[(&str, &str)], files: Vec<IncomingFile>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        let form = MultipartForm::from_parts(&[("nama", "   "), ("lokasi", " Gunung Sewu ")], vec![]);
        assert_eq!(form.text("nama"), None);
        assert_eq!(form.text("lokasi").as_deref(), Some("Gunung Sewu"));
        assert!(matches!(form.required("nama"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn parse_reports_the_field_name() {
        let form = MultipartForm::from_parts(&[("hargaTiket", "sepuluh")], vec![]);
        match form.parse::<i64>("hargaTiket") {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("hargaTiket")),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        assert_eq!(form.parse::<i64>("harga").unwrap(), None);
    }

    #[test]
    fn take_files_filters_by_field() {
        let file = |field: &str| IncomingFile {
            field: field.to_string(),
            file_name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1],
        };
        let mut form = MultipartForm::from_parts(&[], vec![file("gambar"), file("lain"), file("gambar")]);
        assert_eq!(form.take_files("gambar").len(), 2);
        assert_eq!(form.take_files("gambar").len(), 0);
        assert_eq!(form.take_files("lain").len(), 1);
    }
}
