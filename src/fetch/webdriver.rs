use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info, warn};

use super::PageFetcher;
use crate::config::Config;
use crate::error::FetchError;

/// Chrome driven through a running chromedriver. One browser session per
/// fetch; the session is closed whether or not the page loaded.
pub struct WebDriverFetcher {
    endpoint: String,
    headless: bool,
    timeout: Duration,
}

impl WebDriverFetcher {
    pub fn new(endpoint: impl Into<String>, headless: bool, timeout: Duration) -> Self {
        WebDriverFetcher {
            endpoint: endpoint.into(),
            headless,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.webdriver_url, config.headless, config.page_timeout)
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut args = vec!["--disable-gpu"];
        if self.headless {
            args.insert(0, "--headless");
        }

        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": args,
                "excludeSwitches": ["enable-logging"],
            }),
        );
        caps
    }

    async fn connect(&self) -> Result<Client, FetchError> {
        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.endpoint)
            .await
            .map_err(|e| FetchError::Session {
                endpoint: self.endpoint.clone(),
                message: e.to_string(),
            })
    }

    async fn render(&self, client: &Client, url: &str, ready_selector: &str) -> Result<String, FetchError> {
        client.goto(url).await.map_err(|e| FetchError::Navigate {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        client
            .wait()
            .at_most(self.timeout)
            .for_element(Locator::Css(ready_selector))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => FetchError::Timeout {
                    url: url.to_string(),
                    selector: ready_selector.to_string(),
                },
                other => FetchError::Navigate {
                    url: url.to_string(),
                    message: other.to_string(),
                },
            })?;

        client.source().await.map_err(|e| FetchError::Source {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    fn name(&self) -> &'static str {
        "webdriver"
    }

    async fn fetch(&self, url: &str, ready_selector: &str) -> Result<String, FetchError> {
        info!(url, "opening listing page");
        let client = self.connect().await?;

        let result = self.render(&client, url, ready_selector).await;

        if let Err(e) = client.close().await {
            warn!(error = %e, "failed to close browser session");
        }

        if let Ok(html) = &result {
            debug!(url, bytes = html.len(), "page rendered");
        }
        result
    }
}
