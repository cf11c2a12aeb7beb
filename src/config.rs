//! Construction-time configuration for the detector and the signal generator
//!
//! The core algorithms accept whatever floats they are handed (a bad
//! `ewma_alpha` degrades detection quality rather than failing). Validation
//! happens once at the boundary, before anything is constructed, via
//! [`DetectorConfig::validate`] and [`GeneratorConfig::validate`].

use thiserror::Error;

/// Errors for configuration validation at the process boundary
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("z_window must be at least 1, got {0}")]
    ZeroWindow(usize),

    #[error("z_threshold must be positive, got {0}")]
    NonPositiveThreshold(f64),

    #[error("ewma_alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("rate_limit_sec must be non-negative, got {0}")]
    NegativeRateLimit(f64),

    #[error("noise must be non-negative, got {0}")]
    NegativeNoise(f64),

    #[error("attack_rate must be in [0, 1], got {0}")]
    InvalidAttackRate(f64),

    #[error("interval_sec must be positive, got {0}")]
    NonPositiveInterval(f64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunables for [`crate::detector::GreenGuardDetector`]
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Rolling window capacity for the z-score baseline
    pub z_window: usize,
    /// Z-score magnitude at which a reading becomes anomalous
    pub z_threshold: f64,
    /// EWMA decay factor (weight of the newest observation)
    pub ewma_alpha: f64,
    /// Minimum seconds between two fresh (non-downgraded) alerts
    pub rate_limit_sec: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            z_window: 30,
            z_threshold: 2.5,
            ewma_alpha: 0.1,
            rate_limit_sec: 4.0,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.z_window == 0 {
            return Err(ConfigError::ZeroWindow(self.z_window));
        }
        if self.z_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(self.z_threshold));
        }
        if self.ewma_alpha <= 0.0 || self.ewma_alpha > 1.0 {
            return Err(ConfigError::InvalidAlpha(self.ewma_alpha));
        }
        if self.rate_limit_sec < 0.0 {
            return Err(ConfigError::NegativeRateLimit(self.rate_limit_sec));
        }
        Ok(())
    }
}

/// Tunables for [`crate::simulator::SignalGenerator`]
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    /// Baseline draw in kilowatts
    pub base_kw: f64,
    /// Half-width of the uniform noise band in kW
    pub noise: f64,
    /// Per-tick probability of an injected attack perturbation
    pub attack_rate: f64,
    /// Size of the attack perturbation in kW
    pub attack_magnitude: f64,
    /// Seconds between pipeline ticks
    pub interval_sec: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_kw: 3.4,
            noise: 0.30,
            attack_rate: 0.03,
            attack_magnitude: 3.2,
            interval_sec: 1.0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.noise < 0.0 {
            return Err(ConfigError::NegativeNoise(self.noise));
        }
        if !(0.0..=1.0).contains(&self.attack_rate) {
            return Err(ConfigError::InvalidAttackRate(self.attack_rate));
        }
        if self.interval_sec <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(self.interval_sec));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_defaults_are_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_generator_defaults_are_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let cfg = DetectorConfig {
            z_window: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroWindow(0))));
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        for alpha in [0.0, -0.1, 1.5] {
            let cfg = DetectorConfig {
                ewma_alpha: alpha,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "alpha {} should be rejected", alpha);
        }
        let cfg = DetectorConfig {
            ewma_alpha: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_attack_rate_bounds() {
        let cfg = GeneratorConfig {
            attack_rate: 1.1,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = GeneratorConfig {
            attack_rate: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_non_positive_interval_rejected() {
        let cfg = GeneratorConfig {
            interval_sec: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveInterval(_))
        ));
    }
}
