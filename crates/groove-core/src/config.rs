//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `groove-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and a loader that reads the file. Every field has a
//! default, so an empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `groove-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartyConfig {
    /// Run-level settings (name, seed, timing).
    #[serde(default)]
    pub party: PartySection,

    /// Dance floor geometry.
    #[serde(default)]
    pub floor: FloorSection,

    /// Crowd composition and creation-time multipliers.
    #[serde(default)]
    pub crowd: CrowdSection,

    /// Social dynamics tunables.
    #[serde(default)]
    pub social: SocialSection,

    /// Simulated music settings.
    #[serde(default)]
    pub music: MusicSection,
}

impl PartyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartySection {
    /// Human-readable run name.
    #[serde(default = "default_party_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick (~60 Hz by default).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = run until interrupted).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for PartySection {
    fn default() -> Self {
        Self {
            name: default_party_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Dance floor geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FloorSection {
    /// Floor width in floor units.
    #[serde(default = "default_floor_width")]
    pub width: f32,

    /// Floor height in floor units.
    #[serde(default = "default_floor_height")]
    pub height: f32,
}

impl Default for FloorSection {
    fn default() -> Self {
        Self {
            width: default_floor_width(),
            height: default_floor_height(),
        }
    }
}

/// Crowd composition settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrowdSection {
    /// Number of dancers spawned at startup.
    #[serde(default = "default_initial_dancers")]
    pub initial_dancers: usize,

    /// Number of celebrities spawned at startup.
    #[serde(default)]
    pub celebrities: usize,

    /// Creation-time multiplier on drawn creativity (0.5 = neutral).
    #[serde(default = "default_trait_multiplier")]
    pub default_creativity: f32,

    /// Creation-time multiplier on drawn sociability (0.5 = neutral).
    #[serde(default = "default_trait_multiplier")]
    pub default_sociability: f32,

    /// Spawn positions stay this far from the floor edge.
    #[serde(default = "default_spawn_margin")]
    pub spawn_margin: f32,
}

impl Default for CrowdSection {
    fn default() -> Self {
        Self {
            initial_dancers: default_initial_dancers(),
            celebrities: 0,
            default_creativity: default_trait_multiplier(),
            default_sociability: default_trait_multiplier(),
            spawn_margin: default_spawn_margin(),
        }
    }
}

/// Social dynamics tunables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialSection {
    /// Multiplier on the group formation probability.
    #[serde(default = "default_group_formation_factor")]
    pub group_formation_factor: f32,
}

impl Default for SocialSection {
    fn default() -> Self {
        Self {
            group_formation_factor: default_group_formation_factor(),
        }
    }
}

/// Simulated music settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MusicSection {
    /// Base tempo of the simulated beat source, in BPM.
    #[serde(default = "default_tempo")]
    pub tempo: f32,
}

impl Default for MusicSection {
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
        }
    }
}

fn default_party_name() -> String {
    String::from("Groove Floor")
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    16
}

fn default_floor_width() -> f32 {
    1024.0
}

fn default_floor_height() -> f32 {
    768.0
}

const fn default_initial_dancers() -> usize {
    30
}

fn default_trait_multiplier() -> f32 {
    0.5
}

fn default_spawn_margin() -> f32 {
    50.0
}

fn default_group_formation_factor() -> f32 {
    0.1
}

fn default_tempo() -> f32 {
    120.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PartyConfig::parse("{}");
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.party.name, "Groove Floor");
            assert_eq!(config.party.seed, 42);
            assert_eq!(config.party.tick_interval_ms, 16);
            assert_eq!(config.crowd.initial_dancers, 30);
            assert!((config.floor.width - 1024.0).abs() < f32::EPSILON);
            assert!((config.social.group_formation_factor - 0.1).abs() < f32::EPSILON);
            assert!((config.music.tempo - 120.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn partial_document_overrides_some_fields() {
        let yaml = r"
party:
  seed: 7
crowd:
  initial_dancers: 12
  celebrities: 1
social:
  group_formation_factor: 0.25
";
        let config = PartyConfig::parse(yaml);
        assert!(config.is_ok());
        if let Ok(config) = config {
            assert_eq!(config.party.seed, 7);
            assert_eq!(config.party.name, "Groove Floor");
            assert_eq!(config.crowd.initial_dancers, 12);
            assert_eq!(config.crowd.celebrities, 1);
            assert!((config.social.group_formation_factor - 0.25).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = PartyConfig::parse(": not yaml :");
        assert!(config.is_err());
    }
}
