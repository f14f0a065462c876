//! Configuration types for the transcript runner.
//!
//! All configuration is loaded from environment variables. Session policy
//! and logging live in the optional YAML file named by `LUPINE_CONFIG`.

use std::path::PathBuf;

use crate::error::RunnerError;

/// Complete runner configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// JSON transcript to replay.
    pub transcript: PathBuf,
    /// Session YAML configuration, if any.
    pub session_config: Option<PathBuf>,
    /// Overrides `logging.json` from the session configuration.
    pub log_json: Option<bool>,
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `LUPINE_TRANSCRIPT` -- path of the JSON transcript
    ///
    /// Optional variables:
    /// - `LUPINE_CONFIG` -- path of the session YAML configuration
    /// - `LUPINE_LOG_JSON` -- `true` for JSON log lines
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transcript = lookup("LUPINE_TRANSCRIPT")
            .map(PathBuf::from)
            .ok_or_else(|| {
                RunnerError::Config("missing required env var LUPINE_TRANSCRIPT".to_owned())
            })?;

        let session_config = lookup("LUPINE_CONFIG").map(PathBuf::from);

        let log_json = lookup("LUPINE_LOG_JSON")
            .map(|raw| {
                raw.parse::<bool>()
                    .map_err(|e| RunnerError::Config(format!("invalid LUPINE_LOG_JSON: {e}")))
            })
            .transpose()?;

        Ok(Self {
            transcript,
            session_config,
            log_json,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn transcript_is_required() {
        let result = RunnerConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(RunnerError::Config(_))));
    }

    #[test]
    fn optional_variables_default_to_none() {
        let config = RunnerConfig::from_lookup(lookup(&[("LUPINE_TRANSCRIPT", "game.json")])).unwrap();
        assert_eq!(config.transcript, PathBuf::from("game.json"));
        assert_eq!(config.session_config, None);
        assert_eq!(config.log_json, None);
    }

    #[test]
    fn log_json_must_be_a_bool() {
        let ok = RunnerConfig::from_lookup(lookup(&[
            ("LUPINE_TRANSCRIPT", "game.json"),
            ("LUPINE_CONFIG", "lupine.yaml"),
            ("LUPINE_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(ok.session_config, Some(PathBuf::from("lupine.yaml")));
        assert_eq!(ok.log_json, Some(true));

        let bad = RunnerConfig::from_lookup(lookup(&[
            ("LUPINE_TRANSCRIPT", "game.json"),
            ("LUPINE_LOG_JSON", "yes"),
        ]));
        assert!(matches!(bad, Err(RunnerError::Config(_))));
    }
}
