//! Shared state store: bounded time-series and alert buffers behind one lock
//!
//! The pipeline worker appends under the lock; pollers take snapshots under
//! the same lock, so a reader never observes a buffer mid-append or
//! mid-eviction. The raw buffers never leave this module.

use crate::detector::VerdictKind;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Maximum retained time-series records
pub const DATA_CAP: usize = 600;

/// Maximum retained alerts
pub const ALERT_CAP: usize = 120;

/// Records returned per snapshot
pub const SNAPSHOT_DATA_LEN: usize = 180;

/// Alerts returned per snapshot
pub const SNAPSHOT_ALERT_LEN: usize = 30;

/// One published pipeline tick: the reading plus its verdict summary
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub timestamp: f64,
    pub kw: f64,
    pub anomaly: bool,
    #[serde(rename = "type")]
    pub kind: VerdictKind,
    /// Running total, monotonically non-decreasing over the process lifetime
    pub avoided_emissions_total: f64,
}

/// Alert severity, derived from the verdict classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// One anomaly alert
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub timestamp: f64,
    pub message: String,
    pub avoided_emissions: f64,
    pub severity: Severity,
}

/// Read-side view: the most recent records and alerts
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub data: Vec<Record>,
    pub alerts: Vec<Alert>,
}

/// Bounded deque that drops from the front once over capacity
#[derive(Debug)]
struct BoundedBuffer<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T: Clone> BoundedBuffer<T> {
    fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(cap),
            cap,
        }
    }

    fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }

    /// Clone of the most recent `n` items, oldest first
    fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug)]
struct Buffers {
    data: BoundedBuffer<Record>,
    alerts: BoundedBuffer<Alert>,
}

/// Thread-safe store shared between the pipeline worker and pollers
#[derive(Debug)]
pub struct StateStore {
    buffers: Mutex<Buffers>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            buffers: Mutex::new(Buffers {
                data: BoundedBuffer::new(DATA_CAP),
                alerts: BoundedBuffer::new(ALERT_CAP),
            }),
        }
    }

    /// Append one time-series record, evicting the oldest beyond the cap
    pub fn push_record(&self, record: Record) {
        let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        buffers.data.push(record);
    }

    /// Append one alert, evicting the oldest beyond the cap
    pub fn push_alert(&self, alert: Alert) {
        let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        buffers.alerts.push(alert);
    }

    /// Consistent view of the last 180 records and last 30 alerts
    pub fn snapshot(&self) -> Snapshot {
        let buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        Snapshot {
            data: buffers.data.tail(SNAPSHOT_DATA_LEN),
            alerts: buffers.alerts.tail(SNAPSHOT_ALERT_LEN),
        }
    }

    /// Current buffer occupancy (records, alerts)
    pub fn len(&self) -> (usize, usize) {
        let buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        (buffers.data.len(), buffers.alerts.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == (0, 0)
    }
}
