//! GreenGuard - streaming anomaly detection over a simulated power feed
//!
//! This library provides the core functionality for the GreenGuard demo:
//! a synthetic kilowatt signal generator, a rolling z-score/EWMA anomaly
//! detector with rate-limited alert classification, and a thread-safe
//! bounded store that a background pipeline publishes into.

pub mod cli;
pub mod config;
pub mod detector;
pub mod injection;
pub mod pipeline;
pub mod simulator;
pub mod store;
