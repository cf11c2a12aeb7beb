//! Demo injection queue: staged kW overrides consumed one per tick
//!
//! Request-side callers push values concurrently with the worker draining
//! them, so the queue is a lock-free crossbeam `SegQueue` shared via `Arc`.

use crossbeam::queue::SegQueue;
use rand::Rng;

/// Spike band for staged demo bursts, in kW
const DEMO_SPIKE_KW: std::ops::Range<f64> = 6.5..8.0;

/// Dip band for staged demo bursts, in kW
const DEMO_DIP_KW: std::ops::Range<f64> = 0.0..0.4;

/// Values staged per demo burst
const DEMO_BURST_LEN: usize = 6;

/// FIFO queue of kW override values
#[derive(Debug, Default)]
pub struct InjectionQueue {
    values: SegQueue<f64>,
}

impl InjectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one override value
    pub fn push(&self, kw: f64) {
        self.values.push(kw);
    }

    /// Dequeue the oldest override, if any
    pub fn pop(&self) -> Option<f64> {
        self.values.pop()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stage a burst of alternating spikes and dips guaranteed to trip the
    /// detector: one spike and one dip are drawn, then repeated alternately
    /// for six ticks.
    pub fn stage_demo_burst<R: Rng>(&self, rng: &mut R) {
        let burst = [rng.gen_range(DEMO_SPIKE_KW), rng.gen_range(DEMO_DIP_KW)];
        for i in 0..DEMO_BURST_LEN {
            self.push(burst[i % 2]);
        }
    }
}
