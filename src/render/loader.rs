//! Fetches the raw bytes of the image to draw on.

use tracing::debug;

use super::RenderError;

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads a local path, or downloads `http(s)://` URIs.
pub async fn load_image_bytes(source: &str) -> Result<Vec<u8>, RenderError> {
    if !is_remote(source) {
        let bytes = tokio::fs::read(source).await?;
        debug!(path = %source, bytes = bytes.len(), "Image read from disk");
        return Ok(bytes);
    }

    debug!(url = %source, "Fetching remote image");
    let client = reqwest::Client::new();
    let response = client.get(source).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    debug!(url = %source, bytes = bytes.len(), "Remote image fetched");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/a.png"));
        assert!(is_remote("HTTP://example.com/a.png"));
        assert!(!is_remote("/tmp/a.png"));
        assert!(!is_remote("scans/http.png"));
    }

    #[tokio::test]
    async fn test_remote_fetch() {
        let server = StubServer::start("200 OK", "image/png", b"png-bytes".to_vec()).await;
        let url = format!("{}/scans/page.png", server.url);

        let bytes = load_image_bytes(&url).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert!(server.requests()[0].head.starts_with("GET /scans/page.png "));
    }

    #[tokio::test]
    async fn test_remote_error_status_is_fetch_error() {
        let server = StubServer::start("404 Not Found", "text/plain", b"gone".to_vec()).await;

        let err = load_image_bytes(&format!("{}/missing.png", server.url))
            .await
            .unwrap_err();
        match err {
            RenderError::Fetch(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_local_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        std::fs::write(&path, b"abc").unwrap();

        let bytes = load_image_bytes(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"abc");

        let missing = dir.path().join("missing.png");
        let err = load_image_bytes(missing.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
