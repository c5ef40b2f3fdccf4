//! Configuration management for practime.
//!
//! Settings live in `config.json` in the platform data directory (see
//! [`DataStorage`]). Only the list of tracked page patterns is configurable;
//! the idle threshold and check period are fixed in
//! [`crate::libs::tracker`].
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use practime::libs::config::Config;
//!
//! // Load existing configuration or fall back to defaults
//! let config = Config::read()?;
//! let matcher = config.matcher()?;
//! assert!(matcher.is_trackable("https://leetcode.com/problems/two-sum/"));
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::url_matcher::{UrlMatcher, DEFAULT_PATTERNS};
use crate::{msg_error_anyhow, msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name in the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Which pages count as practice time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackingConfig {
    /// Regular expressions matched against the full tab URL. A URL is
    /// trackable if any of them matches.
    pub patterns: Vec<String>,
}

impl Default for TrackingConfig {
    /// LeetCode and GeeksforGeeks problem pages.
    fn default() -> Self {
        TrackingConfig {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Root configuration object.
///
/// Sections are optional so that a missing section falls back to its
/// defaults and is omitted from the saved file.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingConfig>,
}

impl Config {
    /// Reads `config.json`, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes `config.json`. Returns `false` if there was nothing to remove.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// The effective tracking section.
    pub fn tracking(&self) -> TrackingConfig {
        self.tracking.clone().unwrap_or_default()
    }

    /// Compiles the configured patterns.
    ///
    /// # Errors
    ///
    /// Fails when any pattern is not a valid regular expression.
    pub fn matcher(&self) -> Result<UrlMatcher> {
        let tracking = self.tracking();
        if tracking.patterns.is_empty() {
            msg_warning!(Message::NoPatternsConfigured);
        }
        UrlMatcher::new(&tracking.patterns).map_err(|err| msg_error_anyhow!(Message::InvalidPatterns(err.to_string())))
    }

    /// Interactive setup of the tracked patterns.
    ///
    /// Current values are offered as the default answer, so pressing enter
    /// keeps them.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let current = config.tracking();

        msg_print!(Message::ConfigModuleTracking);
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTrackedPatterns.to_string())
            .default(current.patterns.join(", "))
            .validate_with(|input: &String| -> Result<(), String> {
                split_patterns(input)
                    .iter()
                    .try_for_each(|p| Regex::new(p).map(|_| ()).map_err(|e| Message::InvalidPattern(p.clone(), e.to_string()).to_string()))
            })
            .interact_text()?;

        config.tracking = Some(TrackingConfig {
            patterns: split_patterns(&answer),
        });
        Ok(config)
    }
}

fn split_patterns(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_patterns_trims_and_drops_empty_entries() {
        assert_eq!(
            split_patterns(r" leetcode\.com/problems/ ,, codeforces\.com/problemset/ "),
            vec![r"leetcode\.com/problems/".to_string(), r"codeforces\.com/problemset/".to_string()]
        );
    }
}
