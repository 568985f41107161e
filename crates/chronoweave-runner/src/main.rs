//! Command-line runner for the Chronoweave timeline engine.
//!
//! Loads configuration and an event set, reports structural problems,
//! simulates the configured year span and prints the resulting trace as
//! JSON on stdout. Diagnostics go to the tracing subscriber.
//!
//! # Usage
//!
//! ```text
//! chronoweave-runner [EVENTS.json]
//! ```
//!
//! Without an argument the built-in seed timeline is used. The config file
//! is `chronoweave-config.yaml` in the working directory unless
//! `CHRONOWEAVE_CONFIG` names another path; a missing file means defaults.
//!
//! # Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Load events
//! 4. Validate and check for paradoxes
//! 5. Simulate and scan the trace for anomalies
//! 6. Print the trace

use std::path::{Path, PathBuf};

use anyhow::Context;
use chronoweave_core::{
    ChronoweaveConfig, detect_paradoxes, scan_trace, simulate, starting_events, validate_events,
};
use chronoweave_types::Event;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "CHRONOWEAVE_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
const DEFAULT_CONFIG_PATH: &str = "chronoweave-config.yaml";

fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        half_life_years = config.timeline.decay_half_life_years,
        base_year = config.timeline.base_year,
        year_span = config.timeline.year_span,
        "Configuration loaded"
    );

    // 3. Load events.
    let events = match std::env::args_os().nth(1) {
        Some(path) => load_events(Path::new(&path))?,
        None => {
            info!("No event file given, using the seed timeline");
            starting_events()
        }
    };
    info!(events = events.len(), "Events loaded");

    // 4. Validate.
    let issues = validate_events(&events, &config.validation);
    for issue in &issues {
        warn!(%issue, "Validation issue");
    }
    for paradox in detect_paradoxes(&events) {
        warn!(%paradox, "Paradox detected");
    }

    // 5. Simulate.
    let timeline = &config.timeline;
    let trace = simulate(
        &config.metrics.initial_vector(),
        &events,
        timeline.base_year,
        timeline.end_year(),
        timeline.decay_half_life_years,
    )
    .context("simulation failed")?;

    for (year, anomalies) in scan_trace(&trace, &config.anomaly) {
        for anomaly in anomalies {
            warn!(year, %anomaly, "Anomaly");
        }
    }

    // 6. Print.
    let json = serde_json::to_string_pretty(&trace).context("failed to serialize trace")?;
    println!("{json}");

    info!(
        years = trace.len(),
        issues = issues.len(),
        "chronoweave-runner finished"
    );
    Ok(())
}

/// Load configuration from [`CONFIG_ENV`] or [`DEFAULT_CONFIG_PATH`].
///
/// A missing default file yields defaults with env overrides applied; a
/// missing file named explicitly is an error.
fn load_config() -> anyhow::Result<ChronoweaveConfig> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    if explicit.is_some() || path.exists() {
        ChronoweaveConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    } else {
        let mut config = ChronoweaveConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Read a JSON array of events.
fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse events in {}", path.display()))
}
