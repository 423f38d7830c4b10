//! Configuration file support

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How the diff is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// `@@` hunks with surrounding context
    #[default]
    Unified,
    /// Two aligned columns
    SideBySide,
    /// One `=`/`-`/`+` line per aligned step
    Inline,
    /// Tuple-encoded hunks as JSON
    Json,
}

/// What the inputs are split into before diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    #[default]
    Line,
    Word,
    Char,
    Grapheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: Format,
    /// Lines of context around unified hunks
    pub context: usize,
    pub unit: Unit,
    /// Column width for side-by-side output
    pub width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Unified,
            context: 3,
            unit: Unit::Line,
            width: 40,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/seqdiff/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seqdiff").join("config.toml"))
    }

    /// Load the config at `path`, or the default location when `path` is
    /// `None`. A missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_config() {
        let config = Config::parse(
            r#"
            format = "side-by-side"
            context = 1
            unit = "word"
            "#,
        )
        .unwrap();

        assert_eq!(config.format, Format::SideBySide);
        assert_eq!(config.context, 1);
        assert_eq!(config.unit, Unit::Word);
        assert_eq!(config.width, 40);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Config::parse(r#"format = "html""#).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let path = Path::new("/definitely/not/here/seqdiff.toml");
        assert!(Config::load(Some(path)).is_err());
    }
}
