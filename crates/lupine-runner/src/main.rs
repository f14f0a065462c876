//! Transcript runner for the Lupine agent.
//!
//! Replays a JSON transcript of game-server lifecycle calls through one
//! [`GameSession`] and prints every decision as a JSON line on stdout. Logs
//! go to stderr.
//!
//! ```text
//! transcript.json --> GameSession --> decisions (JSON lines)
//! ```

mod config;
mod error;

use std::io::Write;

use anyhow::Context;
use lupine_core::{GameSession, LoggingConfig, ProtocolCodec, SessionConfig, Transcript, replay};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RunnerConfig;

/// Application entry point.
///
/// Loads configuration, initializes logging, replays the transcript and
/// writes the decisions.
///
/// # Errors
///
/// Returns an error if configuration, the transcript, or any replayed
/// lifecycle call fails.
fn main() -> anyhow::Result<()> {
    let runner = RunnerConfig::from_env()?;
    let session_config = match &runner.session_config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading session config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    init_logging(&session_config.logging, runner.log_json);

    info!(
        transcript = %runner.transcript.display(),
        seed_override = ?session_config.seed,
        "lupine-runner starting"
    );

    let raw = std::fs::read_to_string(&runner.transcript)
        .with_context(|| format!("reading transcript {}", runner.transcript.display()))?;
    let transcript = Transcript::from_json(&raw)?;

    let codec = ProtocolCodec::new();
    let mut session = GameSession::new(session_config);
    let records = replay(&mut session, &codec, &transcript)?;

    let mut out = std::io::stdout().lock();
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(decisions = records.len(), "lupine-runner finished");
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig, json_override: Option<bool>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if json_override.unwrap_or(logging.json) {
        builder.json().init();
    } else {
        builder.init();
    }
}
