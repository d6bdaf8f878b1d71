//! Run report aggregation and persistence.

use std::sync::Arc;

use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::Serialize;
use tracing::info;
use uihealth_protocols::{PageVerdict, RunReport};

use crate::error::StoreError;
use crate::store::ArtifactStore;

/// Source of the report timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Date partition of a run, `dt=YYYYMMDD`, in the local calendar.
pub fn partition_key(asof: &DateTime<Utc>) -> String {
    asof.with_timezone(&Local).format("dt=%Y%m%d").to_string()
}

/// Folds per-page verdicts into a [`RunReport`].
pub struct ReportAggregator {
    base: String,
    clock: Arc<dyn Clock>,
}

impl ReportAggregator {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_clock(base, Arc::new(SystemClock))
    }

    pub fn with_clock(base: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            base: base.into(),
            clock,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build the report. `asof` is read from the clock at this point.
    pub fn finalize<T: PageVerdict>(&self, results: Vec<T>) -> RunReport<T> {
        RunReport::new(self.base.clone(), self.clock.now(), results)
    }
}

/// Persists reports under `dt=YYYYMMDD/<file_name>`.
pub struct ReportWriter {
    store: Arc<dyn ArtifactStore>,
    file_name: String,
    keep_history: bool,
}

impl ReportWriter {
    pub fn new(store: Arc<dyn ArtifactStore>, file_name: impl Into<String>) -> Self {
        Self {
            store,
            file_name: file_name.into(),
            keep_history: false,
        }
    }

    /// Write `<stem>_<HHMMSS>.<ext>` instead of overwriting the day's report.
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    /// Store key for a report produced at `asof`.
    pub fn key_for(&self, asof: &DateTime<Utc>) -> String {
        let partition = partition_key(asof);
        if !self.keep_history {
            return format!("{}/{}", partition, self.file_name);
        }

        let time = asof.with_timezone(&Local).format("%H%M%S");
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) => format!("{}/{}_{}.{}", partition, stem, time, ext),
            None => format!("{}/{}_{}", partition, self.file_name, time),
        }
    }

    /// Serialize as pretty JSON and store it. Returns the report location.
    pub async fn write<T: Serialize + Sync>(&self, report: &RunReport<T>) -> Result<String, StoreError> {
        let key = self.key_for(&report.asof);
        let body = serde_json::to_vec_pretty(report)?;
        let location = self.store.put(&key, &body).await?;
        info!("Report written to {}", location);
        Ok(location)
    }
}
