use crate::format::{NumberFormat, DEFAULT_PRECISION};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::mode::{AngleMode, CalculatorMode};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub history_limit: usize,
    /// Fractional digits kept in results.
    pub precision: usize,
    /// Digit group separator; empty disables grouping.
    pub group_separator: String,
    pub angle_mode: AngleMode,
    pub start_mode: CalculatorMode,
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            precision: DEFAULT_PRECISION,
            group_separator: ",".to_string(),
            angle_mode: AngleMode::Deg,
            start_mode: CalculatorMode::Standard,
            dark_mode: false,
        }
    }
}

impl Config {
    /// Read the config file if there is one. Nothing is written back.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(path) => path,
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid calculator config")?;
        config.validate()?;
        Ok(config)
    }

    /// The separator is stripped from display text before parsing, so it must
    /// not be a character that can appear inside a number.
    fn validate(&self) -> Result<()> {
        let mut chars = self.group_separator.chars();
        let (first, rest) = (chars.next(), chars.next());
        if rest.is_some() {
            bail!(
                "group_separator must be a single character, got {:?}",
                self.group_separator
            );
        }
        if let Some(sep) = first {
            if sep.is_ascii_digit() || matches!(sep, '.' | '-' | '+' | 'e' | 'E') {
                bail!("group_separator {:?} clashes with number syntax", sep);
            }
        }
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var("HOME").ok()?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("calcsuite")
                .join("config.toml"),
        )
    }

    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::new(self.precision, self.group_separator.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml("precision = 4\nangle_mode = \"rad\"\n").unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.angle_mode, AngleMode::Rad);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.start_mode, CalculatorMode::Standard);
    }

    #[test]
    fn test_number_format_from_config() {
        let config = Config::from_toml("group_separator = \"\"\nstart_mode = \"scientific\"").unwrap();
        assert_eq!(config.number_format(), NumberFormat::new(8, None));
        assert_eq!(config.start_mode, CalculatorMode::Scientific);
        assert_eq!(Config::default().number_format(), NumberFormat::default());
    }

    #[test]
    fn test_bad_config() {
        assert!(Config::from_toml("angle_mode = \"gradians\"").is_err());
        assert!(Config::from_toml("precision = \"high\"").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Some(PathBuf::from("/nonexistent/calcsuite.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_separator_must_not_clash_with_numbers() {
        for sep in [".", "-", "+", "0", "7", "e", ",,"] {
            let content = format!("group_separator = {:?}", sep);
            assert!(Config::from_toml(&content).is_err(), "accepted {:?}", sep);
        }
        for sep in ["", " ", "'", "_"] {
            let content = format!("group_separator = {:?}", sep);
            assert!(Config::from_toml(&content).is_ok(), "rejected {:?}", sep);
        }
    }
}
