//! Notification delivery.
//!
//! Business logic only sees [`Notifier`]; whether messages are pushed to
//! LINE or echoed to the terminal is picked once from config.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{Config, NotifierKind};
use crate::error::{ConfigError, NotifyError};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Build the notifier selected by `config.notifier`.
pub fn from_config(config: &Config) -> Result<Box<dyn Notifier>, ConfigError> {
    match config.notifier {
        NotifierKind::Line => {
            let token = config
                .notify_token
                .clone()
                .ok_or(ConfigError::Missing("notify_token"))?;
            Ok(Box::new(LineNotifier::new(config.notify_endpoint.clone(), token)))
        }
        NotifierKind::Console => Ok(Box::new(ConsoleNotifier::stdout())),
    }
}

/// Form-encoded POST with a bearer token, as LINE Notify expects.
pub struct LineNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl LineNotifier {
    pub fn new(endpoint: String, token: String) -> Self {
        LineNotifier {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status { status: status.as_u16() });
        }

        debug!(chars = message.chars().count(), "notification sent");
        Ok(())
    }
}

/// Writes one line per message. Used for dry runs and when no push
/// channel is configured.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        ConsoleNotifier { out: Mutex::new(out) }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        // a poisoned lock only means another writer panicked mid-line
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{message}")?;
        out.flush()?;
        Ok(())
    }
}
