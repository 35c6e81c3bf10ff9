//! starspew - a deterministic timed-particle engine
//!
//! Headless demo binary: drives the configured emitters over a scripted,
//! seekable timeline and records what happened.

mod config;
mod runner;

use anyhow::Result;
use config::EffectsConfig;
use runner::RunnerOptions;
use std::{env, path::PathBuf};
use tracing::info;

struct CliOptions {
    config_path: Option<PathBuf>,
    events_path: Option<PathBuf>,
    run_ms: Option<f64>,
    seed: Option<u64>,
    no_seek: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config_path: None,
            events_path: None,
            run_ms: None,
            seed: None,
            no_seek: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config_path = Some(PathBuf::from(path));
                    }
                }
                "--events" => {
                    if let Some(path) = args.next() {
                        opts.events_path = Some(PathBuf::from(path));
                    }
                }
                "--run-ms" => {
                    if let Some(value) = args.next() {
                        opts.run_ms = value.parse().ok();
                    }
                }
                "--seed" => {
                    if let Some(value) = args.next() {
                        opts.seed = value.parse().ok();
                    }
                }
                "--no-seek" => opts.no_seek = true,
                other => {
                    tracing::warn!("Unknown argument: {other}");
                }
            }
        }

        opts
    }
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via
    // RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting starspew v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut config = match &cli.config_path {
        Some(path) => EffectsConfig::load_from_path(path),
        None => EffectsConfig::load(),
    };
    if let Some(run_ms) = cli.run_ms {
        config.run_ms = run_ms.max(0.0);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_seek {
        config.seek = None;
    }

    let report = runner::run(RunnerOptions {
        config,
        events_path: cli.events_path,
    })?;

    for summary in &report.summaries {
        info!(
            effect = %summary.effect,
            spawned = summary.spawned,
            live_at_end = summary.live_at_end,
            "effect summary"
        );
    }
    println!(
        "frames={} seeks={} decay_frames={} final_quads={}",
        report.frames, report.seeks, report.decay_frames, report.final_quads
    );
    Ok(())
}
