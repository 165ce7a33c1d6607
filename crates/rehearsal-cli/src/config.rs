//! TOML configuration for the `rehearsal` CLI.
//!
//! ```toml
//! [classifier]
//! report_time_only_overlaps = true
//!
//! [slots]
//! step_minutes = 15
//! durations = [30, 45, 60]
//! ```
//!
//! Every key is optional; missing keys keep the engine defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rehearsal_engine::availability::{DEFAULT_DURATIONS, DEFAULT_STEP_MINUTES};
use rehearsal_engine::{ClassifyOptions, SlotOptions};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub classifier: ClassifyOptions,
    pub slots: SlotConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotConfig {
    pub step_minutes: u32,
    /// Used when a `slots` input does not list its own durations.
    pub durations: Vec<u32>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        SlotConfig {
            step_minutes: DEFAULT_STEP_MINUTES,
            durations: DEFAULT_DURATIONS.to_vec(),
        }
    }
}

impl SlotConfig {
    pub fn options(&self) -> SlotOptions {
        SlotOptions {
            step_minutes: self.step_minutes,
        }
    }
}

/// Load the configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<CliConfig> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.classifier.report_time_only_overlaps);
        assert_eq!(config.slots.step_minutes, 15);
        assert_eq!(config.slots.durations, vec![30, 45, 60]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            "[classifier]\nreport_time_only_overlaps = false\n\n[slots]\ndurations = [60]\n",
        )
        .unwrap();
        assert!(!config.classifier.report_time_only_overlaps);
        assert_eq!(config.slots.step_minutes, 15);
        assert_eq!(config.slots.durations, vec![60]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("[slots]\nstride = 5\n").is_err());
    }

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), CliConfig::default());
    }
}
