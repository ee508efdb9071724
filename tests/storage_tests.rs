use geopark_portal::storage::{MockStorageService, S3StorageClient, StorageService, sanitize_key};

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let mock = MockStorageService::new();
        let url = mock
            .put_object("wisata/goa.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert!(url.ends_with("wisata/goa.png"));
        let uploads = mock.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].content_type, "image/png");
        assert_eq!(uploads[0].size, 3);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockStorageService::new_failing();
        assert!(mock.put_object("wisata/goa.png", vec![1], "image/png").await.is_err());
        assert!(mock.delete_object("wisata/goa.png").await.is_err());
        assert!(mock.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_mock_sanitization() {
        let mock = MockStorageService::new();
        let url = mock
            .put_object("../../etc/passwd", vec![1], "image/png")
            .await
            .unwrap();

        assert!(!url.contains(".."));
        assert_eq!(mock.uploads()[0].key, "etc/passwd");
    }

    #[test]
    fn test_key_round_trips_through_public_url() {
        let mock = MockStorageService::new();
        let url = mock.public_url("event/poster.webp");
        assert_eq!(mock.key_from_url(&url), Some("event/poster.webp".to_string()));
        assert_eq!(mock.key_from_url("https://other-host.example/event/poster.webp"), None);
    }

    #[test]
    fn test_sanitize_key_drops_empty_segments() {
        assert_eq!(sanitize_key("/artikel//./sampul.png"), "artikel/sampul.png");
    }
}

#[cfg(test)]
mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_client_creation() {
        let _client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
            "http://localhost:9000",
        );
        // Construction is offline and must not panic
    }

    #[tokio::test]
    async fn test_s3_public_urls_map_back_to_keys() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
            "https://cdn.geopark.id/",
        );

        let url = client.public_url("wisata/a.png");
        assert_eq!(url, "https://cdn.geopark.id/testbucket/wisata/a.png");
        assert_eq!(client.key_from_url(&url), Some("wisata/a.png".to_string()));
        assert_eq!(client.key_from_url("https://cdn.geopark.id/otherbucket/a.png"), None);
    }
}
