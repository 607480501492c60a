//! Detection cycles.
//!
//! One cycle per listing, in order: fetch the page, extract records, compare
//! with the stored snapshot, persist when the detector trusts the result,
//! then deliver the change events. The first error ends the whole run.

use tracing::{error, info, warn};

use crate::config::{Config, Target};
use crate::error::{ConfigError, Error, ExtractError, Result};
use crate::extract;
use crate::fetch::PageFetcher;
use crate::notify::Notifier;
use crate::record::{DriverRecord, FirmwareRecord, Record, RecordKind};
use crate::store::diff::{self, ChangeEvent, PersistDecision};
use crate::store;

/// Outcome of one listing's cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub kind: RecordKind,
    pub records: usize,
    pub events: Vec<ChangeEvent>,
    pub decision: PersistDecision,
}

pub struct Monitor {
    config: Config,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
}

impl Monitor {
    pub fn new(config: Config, fetcher: Box<dyn PageFetcher>, notifier: Box<dyn Notifier>) -> Self {
        Monitor { config, fetcher, notifier }
    }

    /// Run one cycle for each of `kinds`, stopping at the first failure.
    pub async fn run(&self, kinds: &[RecordKind]) -> Result<Vec<CycleReport>> {
        let mut reports = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let report = self.run_kind(kind).await?;
            info!(
                kind = %report.kind,
                records = report.records,
                events = report.events.len(),
                decision = ?report.decision,
                "cycle complete"
            );
            reports.push(report);
        }
        Ok(reports)
    }

    pub async fn run_kind(&self, kind: RecordKind) -> Result<CycleReport> {
        let target = self.config.target(kind).ok_or(ConfigError::Missing(match kind {
            RecordKind::Driver => "driver_list_url",
            RecordKind::Firmware => "bios_list_url",
        }))?;

        match kind {
            RecordKind::Driver => {
                let os_filter = self.config.os_filter.as_str();
                self.cycle::<DriverRecord>(target, |markup| extract::extract_drivers(markup, os_filter))
                    .await
            }
            RecordKind::Firmware => {
                self.cycle::<FirmwareRecord>(target, extract::extract_firmware)
                    .await
            }
        }
    }

    /// Report a fatal error through the notifier. Delivery failures are
    /// only logged; the caller exits either way.
    pub async fn report_failure(&self, err: &Error) {
        error!(error = %err, "run failed");
        if let Err(notify_err) = self.notifier.send(&err.to_string()).await {
            error!(error = %notify_err, "could not deliver failure notification");
        }
    }

    async fn cycle<R: Record>(
        &self,
        target: &Target,
        parse: impl Fn(&str) -> std::result::Result<Vec<R>, ExtractError>,
    ) -> Result<CycleReport> {
        let kind = R::KIND;
        let layout = extract::layout(kind);

        info!(%kind, fetcher = self.fetcher.name(), url = %target.list_url, "downloading listing");
        let markup = self.fetcher.fetch(&target.list_url, layout.container).await?;

        let current = parse(&markup)?;
        info!(%kind, rows = current.len(), "listing scraped");

        let previous = store::load::<R>(&target.info_path);
        let detection = diff::detect(&current, previous.as_deref(), &target.list_url);

        if detection.decision == PersistDecision::Overwrite {
            store::save(&target.info_path, &current)?;
        }

        self.deliver(kind, &detection.events).await;

        Ok(CycleReport {
            kind,
            records: current.len(),
            events: detection.events,
            decision: detection.decision,
        })
    }

    async fn deliver(&self, kind: RecordKind, events: &[ChangeEvent]) {
        for event in events {
            let message = event.render(kind);
            if event.is_advisory() {
                println!("{message}");
                continue;
            }
            if let Err(e) = self.notifier.send(&message).await {
                warn!(%kind, error = %e, text = %message, "notification failed");
            }
        }
    }
}
