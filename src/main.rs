use anyhow::Result;
use clap::Parser;
use greenguard::cli::Cli;
use greenguard::detector::GreenGuardDetector;
use greenguard::injection::InjectionQueue;
use greenguard::pipeline::Pipeline;
use greenguard::simulator::SignalGenerator;
use greenguard::store::StateStore;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let detector_config = cli.detector_config();
    let generator_config = cli.generator_config();
    detector_config.validate()?;
    generator_config.validate()?;

    let detector = Arc::new(Mutex::new(GreenGuardDetector::new(detector_config)));
    let generator = SignalGenerator::new(generator_config);
    let store = Arc::new(StateStore::new());
    let injections = Arc::new(InjectionQueue::new());

    if cli.demo {
        injections.stage_demo_burst(&mut rand::thread_rng());
        tracing::info!("staged demo burst of {} injections", injections.len());
    }

    let pipeline = Pipeline::new(
        generator,
        Arc::clone(&detector),
        Arc::clone(&store),
        Arc::clone(&injections),
    );
    let handle = pipeline.spawn();
    tracing::info!(
        interval_sec = generator_config.interval_sec,
        "pipeline worker started"
    );

    let started = Instant::now();
    let snapshot_every = Duration::from_secs_f64(cli.snapshot_every_sec.max(0.1));
    loop {
        std::thread::sleep(snapshot_every);

        let snapshot = store.snapshot();
        println!("{}", serde_json::to_string(&snapshot)?);

        if let Some(duration) = cli.duration_sec {
            if started.elapsed().as_secs_f64() >= duration {
                break;
            }
        }
    }

    handle.shutdown();
    Ok(())
}
