//! API-key usage cache.
//!
//! The service attaches usage fields to many responses. [`UsageCache`] folds
//! every observed field into one [`UsageSnapshot`], so a dedicated `getUsage`
//! call is only needed while some field has never been seen.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use randorg_proto::{KeyStatus, UsageReport, parse_timestamp};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Last known usage of the API key.
///
/// Fields are only ever overwritten with newer values, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Key status.
    pub status: Option<KeyStatus>,
    /// When the key was created.
    pub creation_time: Option<DateTime<Utc>>,
    /// Estimated remaining random bits.
    pub bits_left: Option<i64>,
    /// Estimated remaining requests.
    pub requests_left: Option<i64>,
    /// Bits used since creation.
    pub total_bits: Option<i64>,
    /// Requests made since creation.
    pub total_requests: Option<i64>,
}

impl UsageSnapshot {
    /// Returns true once all six fields have been observed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.status.is_some()
            && self.creation_time.is_some()
            && self.bits_left.is_some()
            && self.requests_left.is_some()
            && self.total_bits.is_some()
            && self.total_requests.is_some()
    }

    /// Overwrites every field present in `report`. Returns the number of
    /// fields applied.
    pub fn apply(&mut self, report: &UsageReport) -> usize {
        let mut applied = 0;

        if let Some(status) = report.status {
            self.status = Some(status);
            applied += 1;
        }
        if let Some(raw) = report.creation_time.as_deref() {
            match parse_timestamp(raw) {
                Ok(ts) => {
                    self.creation_time = Some(ts);
                    applied += 1;
                }
                Err(e) => warn!(error = %e, "ignoring unparseable creationTime"),
            }
        }
        for (slot, value) in [
            (&mut self.bits_left, report.bits_left),
            (&mut self.requests_left, report.requests_left),
            (&mut self.total_bits, report.total_bits),
            (&mut self.total_requests, report.total_requests),
        ] {
            if let Some(value) = value {
                *slot = Some(value);
                applied += 1;
            }
        }

        applied
    }
}

/// Client-owned usage cache, safe to share between concurrent calls.
#[derive(Debug, Default)]
pub struct UsageCache {
    snapshot: Mutex<Option<UsageSnapshot>>,
}

impl UsageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the usage fields of one result. The snapshot is created on the
    /// first report that carries any field.
    pub fn merge(&self, report: &UsageReport) {
        if report.is_empty() {
            return;
        }

        let mut guard = self.snapshot.lock();
        let snapshot = guard.get_or_insert_with(UsageSnapshot::default);
        let applied = snapshot.apply(report);
        trace!(applied, complete = snapshot.is_complete(), "merged usage fields");
    }

    /// Returns the snapshot only if it is complete.
    #[must_use]
    pub fn snapshot(&self) -> Option<UsageSnapshot> {
        self.snapshot
            .lock()
            .as_ref()
            .filter(|s| s.is_complete())
            .cloned()
    }

    /// Returns whatever is held, complete or not.
    #[must_use]
    pub fn current(&self) -> Option<UsageSnapshot> {
        self.snapshot.lock().clone()
    }

    /// Returns true if the held snapshot is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.snapshot.lock().as_ref().is_some_and(UsageSnapshot::is_complete)
    }
}
