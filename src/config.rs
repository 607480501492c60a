use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::record::RecordKind;

pub const DEFAULT_CONFIG_FILE: &str = "driverwatch.toml";
pub const DEFAULT_NOTIFY_ENDPOINT: &str = "https://notify-api.line.me/api/notify";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Line,
    Console,
}

/// A monitored listing: where to scrape it and where its snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub list_url: String,
    pub info_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub drivers: Target,
    pub bios: Option<Target>,
    pub notify_token: Option<String>,
    pub os_filter: String,
    pub notifier: NotifierKind,
    pub notify_endpoint: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub page_timeout: Duration,
}

/// On-disk shape. The camelCase aliases keep older `configs.json` files
/// working unchanged.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(alias = "driverListURL")]
    driver_list_url: Option<String>,
    #[serde(alias = "driversInfoPath")]
    drivers_info_path: Option<PathBuf>,
    #[serde(alias = "biosListURL")]
    bios_list_url: Option<String>,
    #[serde(alias = "biosInfoPath")]
    bios_info_path: Option<PathBuf>,
    #[serde(alias = "lineNotifyToken")]
    notify_token: Option<String>,
    #[serde(default, alias = "osFilter")]
    os_filter: String,
    #[serde(default)]
    notifier: NotifierKind,
    notify_endpoint: Option<String>,
    webdriver_url: Option<String>,
    headless: Option<bool>,
    page_timeout: Option<String>,
}

impl Config {
    /// Load from `path`, or from the first default location that exists:
    /// `./driverwatch.toml`, then `<config dir>/driverwatch/config.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_path()?,
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text, &path)
    }

    /// Parse config text. Files ending in `.json` are read as JSON,
    /// everything else as TOML.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let raw: RawConfig = if is_json {
            serde_json::from_str(text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(text).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        raw.validate()
    }

    pub fn target(&self, kind: RecordKind) -> Option<&Target> {
        match kind {
            RecordKind::Driver => Some(&self.drivers),
            RecordKind::Firmware => self.bios.as_ref(),
        }
    }

    /// Listings this config can monitor, drivers first.
    pub fn kinds(&self) -> Vec<RecordKind> {
        RecordKind::ALL
            .into_iter()
            .filter(|kind| self.target(*kind).is_some())
            .collect()
    }

    /// Listings a run should cover: `only` when given, which must be
    /// configured, otherwise every configured one.
    pub fn select_kinds(&self, only: Option<RecordKind>) -> Result<Vec<RecordKind>, ConfigError> {
        match only {
            Some(RecordKind::Firmware) if self.bios.is_none() => {
                Err(ConfigError::Missing("bios_list_url"))
            }
            Some(kind) => Ok(vec![kind]),
            None => Ok(self.kinds()),
        }
    }

    /// Switch notifiers after loading (the `--console` flag). Console
    /// output needs no token, LINE does.
    pub fn with_notifier(mut self, notifier: NotifierKind) -> Result<Self, ConfigError> {
        self.notifier = notifier;
        check_token(self.notifier, self.notify_token.as_deref())?;
        Ok(self)
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let drivers = Target {
            list_url: required(self.driver_list_url, "driver_list_url")?,
            info_path: self
                .drivers_info_path
                .ok_or(ConfigError::Missing("drivers_info_path"))?,
        };

        let bios = match (self.bios_list_url, self.bios_info_path) {
            (Some(list_url), Some(info_path)) if !list_url.trim().is_empty() => {
                Some(Target { list_url, info_path })
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("bios_info_path")),
            (_, Some(_)) => return Err(ConfigError::Missing("bios_list_url")),
        };

        let notify_token = self.notify_token.filter(|t| !t.trim().is_empty());
        check_token(self.notifier, notify_token.as_deref())?;

        let page_timeout = match self.page_timeout {
            Some(text) => humantime::parse_duration(&text).map_err(|e| ConfigError::Invalid {
                key: "page_timeout",
                message: e.to_string(),
            })?,
            None => DEFAULT_PAGE_TIMEOUT,
        };

        Ok(Config {
            drivers,
            bios,
            notify_token,
            os_filter: self.os_filter,
            notifier: self.notifier,
            notify_endpoint: self
                .notify_endpoint
                .unwrap_or_else(|| DEFAULT_NOTIFY_ENDPOINT.to_string()),
            webdriver_url: self
                .webdriver_url
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            headless: self.headless.unwrap_or(true),
            page_timeout,
        })
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn check_token(notifier: NotifierKind, token: Option<&str>) -> Result<(), ConfigError> {
    if notifier == NotifierKind::Line && token.is_none() {
        return Err(ConfigError::Missing("notify_token"));
    }
    Ok(())
}

fn default_path() -> Result<PathBuf, ConfigError> {
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Ok(local);
    }

    let mut looked = vec![local.display().to_string()];
    if let Some(dirs) = directories::ProjectDirs::from("", "", "driverwatch") {
        let candidate = dirs.config_dir().join("config.toml");
        if candidate.exists() {
            return Ok(candidate);
        }
        looked.push(candidate.display().to_string());
    }

    Err(ConfigError::NotFound(looked.join(", ")))
}
