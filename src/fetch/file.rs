use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::PageFetcher;
use crate::error::FetchError;

/// Reads markup from disk. Accepts plain paths and `file://` URLs, so a
/// config can point its list URLs at saved copies of the support page.
pub struct FileFetcher;

impl FileFetcher {
    fn path_for(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

#[async_trait]
impl PageFetcher for FileFetcher {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, url: &str, _ready_selector: &str) -> Result<String, FetchError> {
        let path = Self::path_for(url);
        debug!(path = %path.display(), "reading saved page");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::File { path, source })
    }
}
