//! Page fetching.
//!
//! The vendor page renders its tables client side, so the production
//! fetcher drives a real browser. [`FileFetcher`] reads saved pages for
//! offline runs and tests.

mod file;
mod webdriver;

pub use file::FileFetcher;
pub use webdriver::WebDriverFetcher;

use async_trait::async_trait;

use crate::error::FetchError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return the rendered markup of `url` once `ready_selector` is present.
    async fn fetch(&self, url: &str, ready_selector: &str) -> Result<String, FetchError>;
}
