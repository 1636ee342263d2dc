use reqwest::header::USER_AGENT;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::error::CueError;

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Reads a URL, `-` (stdin) or a file path into a string.
pub async fn load_source(source: &str) -> Result<String, CueError> {
    if is_url(source) {
        return fetch_text(source).await;
    }
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| CueError::io("read stdin", e))?;
        return Ok(text);
    }
    debug!("Reading {}", source);
    tokio::fs::read_to_string(source)
        .await
        .map_err(|e| CueError::io("read input file", e))
}

pub async fn fetch_text(url: &str) -> Result<String, CueError> {
    info!("Fetching {}", url);
    let client = reqwest::Client::new();
    let body = client
        .get(url)
        .header(USER_AGENT, "cuemark/0.1")
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|e| CueError::fetch(url, e))?
        .text()
        .await
        .map_err(|e| CueError::fetch(url, e))?;
    debug!("Fetched {} bytes", body.len());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_urls() {
        assert!(is_url("https://example.com/api/timedtext?v=1"));
        assert!(is_url("http://localhost/x.xml"));
        assert!(!is_url("captions/talk.xml"));
        assert!(!is_url("-"));
    }

    #[tokio::test]
    async fn reads_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cues.xml");
        std::fs::write(&path, "<transcript/>").expect("write");
        let text = load_source(path.to_str().expect("utf-8 path")).await.expect("load");
        assert_eq!(text, "<transcript/>");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = load_source("/definitely/not/here.xml").await.unwrap_err();
        assert!(matches!(err, CueError::Io { .. }));
    }
}
