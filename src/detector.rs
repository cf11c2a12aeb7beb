//! Streaming anomaly detection using rolling z-scores and an EWMA trend
//!
//! Each reading is scored two ways: a z-score against the mean and sample
//! standard deviation of a bounded rolling window, and an absolute deviation
//! from an exponential moving average. Either signal crossing its threshold
//! marks the reading anomalous. Classification into suspicious/attack is
//! rate-limited so a sustained attack surfaces as one high-severity alert
//! followed by a stream of suspicious ones, rather than an alert storm.

use crate::config::DetectorConfig;
use serde::Serialize;
use std::collections::VecDeque;

/// Absolute EWMA deviation (kW) at which a reading is anomalous.
/// Fixed constant, deliberately not scaled with `z_threshold`.
pub const DEVIATION_ANOMALY_KW: f64 = 2.0;

/// Absolute EWMA deviation (kW) at which a fresh anomaly is an attack.
pub const DEVIATION_ATTACK_KW: f64 = 3.5;

/// Multiplier on `z_threshold` above which a fresh anomaly is an attack.
const ATTACK_Z_MULTIPLIER: f64 = 1.5;

/// Classification of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictKind {
    Normal,
    Suspicious,
    Attack,
}

impl VerdictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictKind::Normal => "normal",
            VerdictKind::Suspicious => "suspicious",
            VerdictKind::Attack => "attack",
        }
    }
}

/// Per-reading detector output
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// Whether either anomaly trigger fired
    pub anomaly: bool,
    /// Severity classification (meaningful only when `anomaly` is true)
    #[serde(rename = "type")]
    pub kind: VerdictKind,
    /// Standard deviations from the rolling-window mean
    pub z: f64,
    /// EWMA value after folding in this reading
    pub ewma: f64,
    /// Reading minus EWMA, in kW
    pub deviation_kw: f64,
}

/// Rolling-statistics anomaly detector
///
/// Owns its window and EWMA state exclusively; callers share it behind a
/// lock when the pipeline and tuning requests run concurrently.
#[derive(Debug)]
pub struct GreenGuardDetector {
    /// Last `capacity` readings, oldest first
    window: VecDeque<f64>,
    capacity: usize,
    z_threshold: f64,
    ewma_alpha: f64,
    /// Unset until the first reading is observed
    ewma: Option<f64>,
    rate_limit_sec: f64,
    last_alert_ts: f64,
}

impl GreenGuardDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.z_window),
            capacity: config.z_window,
            z_threshold: config.z_threshold,
            ewma_alpha: config.ewma_alpha,
            ewma: None,
            rate_limit_sec: config.rate_limit_sec,
            // The first anomaly ever seen is always a fresh alert.
            last_alert_ts: f64::NEG_INFINITY,
        }
    }

    /// Mean and sample standard deviation of the current window
    ///
    /// An empty window yields (0, 1) and a near-zero variance yields sigma=1,
    /// so the z-score never divides by zero on cold start or constant input.
    fn mean_std(&self) -> (f64, f64) {
        let n = self.window.len();
        if n == 0 {
            return (0.0, 1.0);
        }
        let mu = self.window.iter().sum::<f64>() / n as f64;
        let var = self.window.iter().map(|x| (x - mu).powi(2)).sum::<f64>()
            / (n.saturating_sub(1)).max(1) as f64;
        let sigma = if var > 1e-12 { var.sqrt() } else { 1.0 };
        (mu, sigma)
    }

    fn ewma_update(&mut self, x: f64) -> f64 {
        let next = match self.ewma {
            None => x,
            Some(prev) => self.ewma_alpha * x + (1.0 - self.ewma_alpha) * prev,
        };
        self.ewma = Some(next);
        next
    }

    /// Score one reading and classify it
    ///
    /// Mutates the rolling window, the EWMA, and (for fresh alerts) the
    /// rate-limit timestamp. `ts` is the reading's wall-clock time in
    /// seconds; it only drives rate limiting.
    pub fn check(&mut self, x: f64, ts: f64) -> Verdict {
        self.window.push_back(x);
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }

        let (mu, sigma) = self.mean_std();
        let z = (x - mu) / sigma;
        let ewma = self.ewma_update(x);
        let deviation = x - ewma;

        let anomaly = z.abs() >= self.z_threshold || deviation.abs() > DEVIATION_ANOMALY_KW;

        let kind = if anomaly {
            if ts - self.last_alert_ts >= self.rate_limit_sec {
                // Fresh alert: claim the rate-limit slot and classify by severity.
                self.last_alert_ts = ts;
                if z.abs() >= self.z_threshold * ATTACK_Z_MULTIPLIER
                    || deviation.abs() > DEVIATION_ATTACK_KW
                {
                    VerdictKind::Attack
                } else {
                    VerdictKind::Suspicious
                }
            } else {
                // Within the rate-limit window repeated alerts are downgraded,
                // not suppressed: every anomalous tick still surfaces.
                VerdictKind::Suspicious
            }
        } else {
            VerdictKind::Normal
        };

        Verdict {
            anomaly,
            kind,
            z,
            ewma,
            deviation_kw: deviation,
        }
    }

    /// Operator guidance for a verdict classification
    pub fn recommend_action(kind: VerdictKind) -> &'static str {
        match kind {
            VerdictKind::Attack => "Isolate node → safe mode → rotate keys",
            VerdictKind::Suspicious => "Rate-limit, verify signatures, increase sampling",
            VerdictKind::Normal => "Monitor",
        }
    }

    /// Partial best-effort tuning update; each argument is independently
    /// optional. No range validation here (see `config::DetectorConfig`).
    pub fn set_params(&mut self, z_threshold: Option<f64>, ewma_alpha: Option<f64>) {
        if let Some(t) = z_threshold {
            self.z_threshold = t;
        }
        if let Some(a) = ewma_alpha {
            self.ewma_alpha = a;
        }
    }

    /// Clear the window, EWMA, and rate-limit state
    pub fn reset(&mut self) {
        self.window.clear();
        self.ewma = None;
        self.last_alert_ts = f64::NEG_INFINITY;
    }

    pub fn z_threshold(&self) -> f64 {
        self.z_threshold
    }

    pub fn ewma_alpha(&self) -> f64 {
        self.ewma_alpha
    }

    /// Current window contents, oldest first (for tests and introspection)
    pub fn window(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }
}
