//! Streaming pipeline: generator → detector → shared buffers
//!
//! A single background worker thread owns the generator and drives one tick
//! per interval: drain one staged injection, produce a reading, score it,
//! derive avoided-emissions figures for anomalies, and publish the record
//! and any alert to the shared store. A shared stop flag is observed at the
//! top of each iteration and the worker is joined on shutdown.

use crate::detector::{GreenGuardDetector, VerdictKind};
use crate::injection::InjectionQueue;
use crate::simulator::SignalGenerator;
use crate::store::{Alert, Record, Severity, StateStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Hours of avoided excess draw credited per anomalous tick (10 seconds)
const AVOIDED_DRAW_HOURS: f64 = 10.0 / 3600.0;

/// kg CO2e per avoided kWh
const EMISSION_FACTOR: f64 = 0.7;

/// The streaming pipeline, wired up from explicitly constructed parts
pub struct Pipeline {
    generator: SignalGenerator,
    detector: Arc<Mutex<GreenGuardDetector>>,
    store: Arc<StateStore>,
    injections: Arc<InjectionQueue>,
    avoided_emissions_total: f64,
}

impl Pipeline {
    pub fn new(
        generator: SignalGenerator,
        detector: Arc<Mutex<GreenGuardDetector>>,
        store: Arc<StateStore>,
        injections: Arc<InjectionQueue>,
    ) -> Self {
        Self {
            generator,
            detector,
            store,
            injections,
            avoided_emissions_total: 0.0,
        }
    }

    /// Running avoided-emissions total; never decreases
    pub fn avoided_emissions_total(&self) -> f64 {
        self.avoided_emissions_total
    }

    /// Run one tick: injection → reading → verdict → publish
    pub fn tick(&mut self) {
        let injected = self.injections.pop();
        let reading = self.generator.step(injected);

        let verdict = {
            let mut detector = self.detector.lock().unwrap_or_else(|e| e.into_inner());
            detector.check(reading.kw, reading.timestamp)
        };

        tracing::trace!(
            kw = reading.kw,
            z = verdict.z,
            ewma = verdict.ewma,
            anomaly = verdict.anomaly,
            "pipeline tick"
        );

        if verdict.anomaly {
            let avoided_kwh = verdict.deviation_kw.abs().max(0.0) * AVOIDED_DRAW_HOURS;
            let avoided_emissions = avoided_kwh * EMISSION_FACTOR;
            self.avoided_emissions_total += avoided_emissions;

            let action = GreenGuardDetector::recommend_action(verdict.kind);
            let severity = if verdict.kind == VerdictKind::Attack {
                Severity::Critical
            } else {
                Severity::Warning
            };
            let message = format!(
                "{} Δ≈{:.2} kW — Action: {}",
                verdict.kind.as_str().to_uppercase(),
                verdict.deviation_kw,
                action
            );
            tracing::warn!(severity = ?severity, %message, "anomaly detected");

            self.store.push_alert(Alert {
                timestamp: reading.timestamp,
                message,
                avoided_emissions,
                severity,
            });
        }

        self.store.push_record(Record {
            timestamp: reading.timestamp,
            kw: reading.kw,
            anomaly: verdict.anomaly,
            kind: verdict.kind,
            avoided_emissions_total: self.avoided_emissions_total,
        });
    }

    /// Spawn the worker thread; ticks until the handle raises the stop flag
    pub fn spawn(self) -> PipelineHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || self.run(stop_flag));
        PipelineHandle {
            stop,
            handle: Some(handle),
        }
    }

    fn run(mut self, stop: Arc<AtomicBool>) {
        let interval = Duration::from_secs_f64(self.generator.interval_sec());
        while !stop.load(Ordering::SeqCst) {
            self.tick();
            thread::sleep(interval);
        }
        tracing::debug!(
            ticks = self.generator.steps(),
            avoided_total = self.avoided_emissions_total,
            "pipeline worker stopped"
        );
    }
}

/// Handle to the running worker: raise the stop flag and join
pub struct PipelineHandle {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Signal the worker and wait for it to observe the flag and exit.
    /// Latency is bounded by one sleep interval.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
