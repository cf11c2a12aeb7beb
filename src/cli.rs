//! CLI argument parsing for the GreenGuard demo runner

use crate::config::{DetectorConfig, GeneratorConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "greenguard")]
#[command(version)]
#[command(about = "Streaming anomaly detection over a simulated power feed", long_about = None)]
pub struct Cli {
    /// Baseline power draw in kW
    #[arg(long = "base-kw", value_name = "KW", default_value = "3.4")]
    pub base_kw: f64,

    /// Uniform noise half-width in kW
    #[arg(long = "noise", value_name = "KW", default_value = "0.30")]
    pub noise: f64,

    /// Per-tick probability of an injected attack perturbation
    #[arg(long = "attack-rate", value_name = "PROB", default_value = "0.03")]
    pub attack_rate: f64,

    /// Attack perturbation magnitude in kW
    #[arg(long = "attack-magnitude", value_name = "KW", default_value = "3.2")]
    pub attack_magnitude: f64,

    /// Seconds between pipeline ticks
    #[arg(long = "interval", value_name = "SEC", default_value = "1.0")]
    pub interval_sec: f64,

    /// Rolling window size for the z-score baseline
    #[arg(long = "z-window", value_name = "SIZE", default_value = "30")]
    pub z_window: usize,

    /// Z-score threshold for anomaly detection
    #[arg(long = "z-threshold", value_name = "SIGMA", default_value = "2.5")]
    pub z_threshold: f64,

    /// EWMA decay factor
    #[arg(long = "ewma-alpha", value_name = "ALPHA", default_value = "0.1")]
    pub ewma_alpha: f64,

    /// Minimum seconds between fresh high-severity alerts
    #[arg(long = "rate-limit", value_name = "SEC", default_value = "4.0")]
    pub rate_limit_sec: f64,

    /// Stop after this many seconds (run forever if omitted)
    #[arg(long = "duration", value_name = "SEC")]
    pub duration_sec: Option<f64>,

    /// Seconds between snapshot prints to stdout
    #[arg(long = "snapshot-every", value_name = "SEC", default_value = "5.0")]
    pub snapshot_every_sec: f64,

    /// Stage a demo burst of alternating spikes and dips at startup
    #[arg(long = "demo")]
    pub demo: bool,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            z_window: self.z_window,
            z_threshold: self.z_threshold,
            ewma_alpha: self.ewma_alpha,
            rate_limit_sec: self.rate_limit_sec,
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            base_kw: self.base_kw,
            noise: self.noise,
            attack_rate: self.attack_rate,
            attack_magnitude: self.attack_magnitude,
            interval_sec: self.interval_sec,
        }
    }
}
