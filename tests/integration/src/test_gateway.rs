//! Request pipeline integration tests against an in-memory store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use reqwest::StatusCode;
    use signgate_auth::epoch_seconds;
    use signgate_core::InMemoryObjectStore;

    use crate::{TestGateway, http_client};

    async fn gateway() -> (TestGateway, Arc<InMemoryObjectStore>) {
        let store = Arc::new(InMemoryObjectStore::new());
        store.put("audio/test.mp3", Bytes::from_static(b"ID3\x04\x00audio"), None);
        store.put("audio/test.wav", Bytes::from_static(b"RIFF"), None);
        let gateway = TestGateway::start(Arc::clone(&store))
            .await
            .expect("start gateway");
        (gateway, store)
    }

    #[tokio::test]
    async fn test_should_stream_object_for_signed_url() {
        let (gateway, store) = gateway().await;
        let resp = http_client()
            .get(gateway.signed_url("/audio/test.mp3", 300))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "audio/mp3");
        assert_eq!(
            headers["cache-control"],
            "public, max-age=31536000, immutable"
        );
        assert!(headers.contains_key("etag"));
        assert!(headers.contains_key("last-modified"));
        assert_eq!(headers["content-length"], "10");

        let body = resp.bytes().await.expect("body");
        assert_eq!(body.as_ref(), b"ID3\x04\x00audio");
        assert_eq!(store.len(), 2);
        gateway.stop().await;
    }

    #[tokio::test]
    async fn test_should_return_401_without_signature() {
        let (gateway, _store) = gateway().await;
        let url = format!(
            "{}?exp={}",
            gateway.url("/audio/test.mp3"),
            epoch_seconds() + 300
        );
        let resp = http_client().get(url).send().await.expect("request");

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.text().await.unwrap(), "Missing signature");
    }

    #[tokio::test]
    async fn test_should_return_400_without_expiration() {
        let (gateway, _store) = gateway().await;
        let url = format!("{}?sig=abc", gateway.url("/audio/test.mp3"));
        let resp = http_client().get(url).send().await.expect("request");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.text().await.unwrap(), "Missing expiration parameter");
    }

    #[tokio::test]
    async fn test_should_return_403_for_forged_signature() {
        let (gateway, _store) = gateway().await;
        let url = format!(
            "{}?sig=invalid-signature&exp={}",
            gateway.url("/audio/test.mp3"),
            epoch_seconds() + 300
        );
        let resp = http_client().get(url).send().await.expect("request");

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "Invalid signature");
    }

    #[tokio::test]
    async fn test_should_return_403_for_expired_link() {
        let (gateway, _store) = gateway().await;
        let url = gateway.signed_url_at("/audio/test.mp3", epoch_seconds() - 10);
        let resp = http_client().get(url).send().await.expect("request");

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "Invalid signature");
    }

    #[tokio::test]
    async fn test_should_return_400_for_non_mp3() {
        let (gateway, _store) = gateway().await;
        let resp = http_client()
            .get(gateway.signed_url("/audio/test.wav", 300))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.text().await.unwrap(), "Only MP3 files are allowed");
    }

    #[tokio::test]
    async fn test_should_return_404_for_missing_object() {
        let (gateway, _store) = gateway().await;
        let resp = http_client()
            .get(gateway.signed_url("/audio/missing.mp3", 300))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.text().await.unwrap(), "File not found");
    }

    #[tokio::test]
    async fn test_should_return_405_for_post() {
        let (gateway, _store) = gateway().await;
        let resp = http_client()
            .post(gateway.signed_url("/audio/test.mp3", 300))
            .body("payload")
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.text().await.unwrap(), "Method not allowed");
    }

    #[tokio::test]
    async fn test_should_render_errors_as_plain_text() {
        let (gateway, _store) = gateway().await;
        let resp = http_client()
            .get(gateway.url("/audio/test.mp3"))
            .send()
            .await
            .expect("request");

        assert_eq!(
            resp.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_should_serve_concurrent_requests() {
        let (gateway, _store) = gateway().await;
        let client = http_client();
        let url = gateway.signed_url("/audio/test.mp3", 300);

        let requests = (0..16).map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move { client.get(url).send().await.map(|r| r.status()) })
        });
        for handle in requests {
            let status = handle.await.expect("join").expect("request");
            assert_eq!(status, StatusCode::OK);
        }
    }
}
