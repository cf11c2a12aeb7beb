//! Synthetic power-consumption feed with seasonal drift and injected attacks

use crate::config::GeneratorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Amplitude of the slow seasonal sinusoid, in kW
const SEASON_AMPLITUDE_KW: f64 = 0.8;

/// Period divisor for the seasonal sinusoid (one radian per 60 ticks)
const SEASON_PERIOD_TICKS: f64 = 60.0;

/// One synthetic reading off the feed
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reading {
    /// Wall-clock seconds since the Unix epoch
    pub timestamp: f64,
    /// Instantaneous draw in kilowatts, never negative
    pub kw: f64,
}

/// Synthetic kilowatt signal generator
///
/// Produces `base_kw` plus a seasonal sinusoid plus uniform noise, with a
/// small per-tick probability of a spike or dip that mimics an attack.
/// Injected override values bypass the model entirely.
#[derive(Debug)]
pub struct SignalGenerator {
    config: GeneratorConfig,
    step_i: u64,
    rng: StdRng,
}

impl SignalGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            step_i: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic RNG for tests
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            step_i: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn season(&self) -> f64 {
        SEASON_AMPLITUDE_KW * (self.step_i as f64 / SEASON_PERIOD_TICKS).sin()
    }

    /// Produce the next reading
    ///
    /// When `injected_kw` is provided the value is used as-is (the caller
    /// has already chosen it); the seasonal/noise/attack model is skipped
    /// for that tick. The final value is clamped to >= 0 on every path.
    pub fn step(&mut self, injected_kw: Option<f64>) -> Reading {
        self.step_i += 1;
        let timestamp = unix_now_secs();

        let kw = match injected_kw {
            Some(injected) => injected,
            None => {
                let mut kw = self.config.base_kw + self.season();
                if self.config.noise > 0.0 {
                    kw += self.rng.gen_range(-self.config.noise..=self.config.noise);
                }
                if self.rng.gen::<f64>() < self.config.attack_rate {
                    if self.rng.gen::<f64>() < 0.5 {
                        kw += self.config.attack_magnitude;
                    } else {
                        kw = (kw - self.config.attack_magnitude).max(0.0);
                    }
                }
                kw
            }
        };

        Reading {
            timestamp,
            kw: kw.max(0.0),
        }
    }

    pub fn interval_sec(&self) -> f64 {
        self.config.interval_sec
    }

    /// Ticks produced so far
    pub fn steps(&self) -> u64 {
        self.step_i
    }
}

fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config(base_kw: f64) -> GeneratorConfig {
        GeneratorConfig {
            base_kw,
            noise: 0.0,
            attack_rate: 0.0,
            attack_magnitude: 3.2,
            interval_sec: 1.0,
        }
    }

    #[test]
    fn test_deterministic_seasonal_curve() {
        let mut gen = SignalGenerator::with_seed(quiet_config(5.0), 7);
        for i in 1..=200u64 {
            let reading = gen.step(None);
            let expected = 5.0 + 0.8 * (i as f64 / 60.0).sin();
            assert!(
                (reading.kw - expected).abs() < 1e-12,
                "tick {}: got {}, expected {}",
                i,
                reading.kw,
                expected
            );
        }
    }

    #[test]
    fn test_injection_bypasses_model() {
        let mut gen = SignalGenerator::with_seed(
            GeneratorConfig {
                noise: 5.0,
                attack_rate: 1.0,
                ..GeneratorConfig::default()
            },
            42,
        );
        let reading = gen.step(Some(7.25));
        assert_eq!(reading.kw, 7.25);
    }

    #[test]
    fn test_injection_still_clamped() {
        let mut gen = SignalGenerator::with_seed(quiet_config(3.4), 0);
        let reading = gen.step(Some(-2.0));
        assert_eq!(reading.kw, 0.0);
    }

    #[test]
    fn test_kw_never_negative_under_heavy_attacks() {
        let config = GeneratorConfig {
            base_kw: 0.5,
            noise: 0.5,
            attack_rate: 1.0,
            attack_magnitude: 10.0,
            interval_sec: 1.0,
        };
        let mut gen = SignalGenerator::with_seed(config, 1234);
        for _ in 0..1000 {
            assert!(gen.step(None).kw >= 0.0);
        }
    }

    #[test]
    fn test_step_counter_advances() {
        let mut gen = SignalGenerator::with_seed(quiet_config(3.4), 0);
        assert_eq!(gen.steps(), 0);
        gen.step(None);
        gen.step(Some(1.0));
        assert_eq!(gen.steps(), 2);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut gen = SignalGenerator::with_seed(quiet_config(3.4), 0);
        let a = gen.step(None).timestamp;
        let b = gen.step(None).timestamp;
        assert!(b >= a);
        assert!(a > 0.0);
    }
}
