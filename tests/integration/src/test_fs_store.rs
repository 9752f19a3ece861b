//! Serving files from a data directory.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use signgate_core::FsObjectStore;
    use signgate_core::store::compute_etag;

    use crate::{TestGateway, http_client};

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("audio")).expect("create audio dir");
        std::fs::write(dir.path().join("audio/intro.mp3"), b"ID3-intro").expect("write file");
        std::fs::write(dir.path().join("secret.mp3"), b"ID3-secret").expect("write file");
        dir
    }

    #[tokio::test]
    async fn test_should_serve_file_from_data_dir() {
        let dir = data_dir();
        let gateway = TestGateway::start(Arc::new(FsObjectStore::new(dir.path())))
            .await
            .expect("start gateway");

        let resp = http_client()
            .get(gateway.signed_url("/audio/intro.mp3", 300))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["etag"], compute_etag(b"ID3-intro").as_str());
        assert_eq!(resp.headers()["content-length"], "9");
        assert_eq!(resp.bytes().await.unwrap().as_ref(), b"ID3-intro");
    }

    #[tokio::test]
    async fn test_should_stream_large_file_intact() {
        let dir = data_dir();
        let data: Vec<u8> = (0..300_000_u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(dir.path().join("audio/long.mp3"), &data).expect("write file");
        let gateway = TestGateway::start(Arc::new(FsObjectStore::new(dir.path())))
            .await
            .expect("start gateway");

        let resp = http_client()
            .get(gateway.signed_url("/audio/long.mp3", 300))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.bytes().await.unwrap().as_ref(), data.as_slice());
    }

    #[tokio::test]
    async fn test_should_not_escape_data_dir() {
        let dir = data_dir();
        let gateway = TestGateway::start(Arc::new(FsObjectStore::new(dir.path().join("audio"))))
            .await
            .expect("start gateway");

        let resp = http_client()
            .get(gateway.signed_url("/..%2Fsecret.mp3", 300))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
