//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `chronoweave-config.yaml` at the
//! project root. The engine does not own these values: callers read them and
//! pass them into engine operations as parameters. Every section and field
//! has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use chronoweave_types::{CORE_METRICS, METRIC_BASELINE, METRIC_MAX, METRIC_MIN, MetricVector};

/// Environment variable overriding `timeline.decay_half_life_years`.
pub const HALF_LIFE_ENV: &str = "CHRONOWEAVE_DECAY_HALF_LIFE";

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

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChronoweaveConfig {
    /// Timeline and decay settings.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Tracked metrics and their starting value.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Anomaly thresholds.
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Constraints checked by the validation pass.
    #[serde(default)]
    pub validation: ValidationConstraints,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChronoweaveConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// [`HALF_LIFE_ENV`] overrides the decay half-life when set to a valid
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are unusable.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if the values are unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_with(yaml, |key| std::env::var(key).ok())
    }

    /// Parse configuration from a YAML string, applying overrides from
    /// `lookup` before validating.
    ///
    /// A valid override can repair an unusable file value.
    ///
    /// # Errors
    ///
    /// Same as [`ChronoweaveConfig::parse`].
    pub fn parse_with(
        yaml: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::deserialize_yaml(yaml)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if the values are unusable.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        let config = Self::deserialize_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn deserialize_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(HALF_LIFE_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => {
                    self.timeline.decay_half_life_years = value;
                }
                _ => warn!(key = HALF_LIFE_ENV, value = %raw, "Ignoring invalid override"),
            }
        }
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let half_life = self.timeline.decay_half_life_years;
        if !half_life.is_finite() || half_life <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!("timeline.decay_half_life_years must be positive, got {half_life}"),
            });
        }
        if self.timeline.year_span == 0 {
            return Err(ConfigError::Invalid {
                reason: "timeline.year_span must be at least 1".to_owned(),
            });
        }
        if self.anomaly.critical_low >= self.anomaly.critical_high {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "anomaly.critical_low ({}) must be below anomaly.critical_high ({})",
                    self.anomaly.critical_low, self.anomaly.critical_high
                ),
            });
        }
        if self.validation.min_impact_value > self.validation.max_impact_value {
            return Err(ConfigError::Invalid {
                reason: "validation.min_impact_value must not exceed max_impact_value".to_owned(),
            });
        }
        Ok(())
    }
}

/// Timeline settings shared by the engine and the presentation layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineConfig {
    /// Years for a downstream effect to lose half its magnitude.
    #[serde(default = "default_half_life")]
    pub decay_half_life_years: f64,

    /// First year shown and simulated by default.
    #[serde(default = "default_base_year")]
    pub base_year: i32,

    /// Number of years in the default range starting at `base_year`.
    #[serde(default = "default_year_span")]
    pub year_span: u32,

    /// Horizontal scale used by the presentation layer only.
    #[serde(default = "default_pixels_per_year")]
    pub pixels_per_year: u32,
}

impl TimelineConfig {
    /// Last year of the default range (`base_year + year_span - 1`).
    pub fn end_year(&self) -> i32 {
        let span = i32::try_from(self.year_span.saturating_sub(1)).unwrap_or(i32::MAX);
        self.base_year.saturating_add(span)
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            decay_half_life_years: default_half_life(),
            base_year: default_base_year(),
            year_span: default_year_span(),
            pixels_per_year: default_pixels_per_year(),
        }
    }
}

/// Tracked metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsConfig {
    /// Metric names present in the starting vector.
    #[serde(default = "default_tracked")]
    pub tracked: Vec<String>,

    /// Starting value of every tracked metric.
    #[serde(default = "default_baseline")]
    pub baseline: f64,
}

impl MetricsConfig {
    /// The starting vector: every tracked metric at the baseline.
    pub fn initial_vector(&self) -> MetricVector {
        MetricVector::baseline(self.tracked.iter().cloned(), self.baseline)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            tracked: default_tracked(),
            baseline: default_baseline(),
        }
    }
}

/// Thresholds for the anomaly detector. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnomalyConfig {
    /// Values at or below this are critically low.
    #[serde(default = "default_critical_low")]
    pub critical_low: f64,

    /// Values at or above this are critically high.
    #[serde(default = "default_critical_high")]
    pub critical_high: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            critical_low: default_critical_low(),
            critical_high: default_critical_high(),
        }
    }
}

/// Constraints checked by [`validate_events`](crate::validation::validate_events).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationConstraints {
    /// Whether BCE (negative) years are accepted.
    #[serde(default = "default_true")]
    pub allow_negative_years: bool,

    /// Lower bound of a metric's range.
    #[serde(default = "default_min_impact")]
    pub min_impact_value: f64,

    /// Upper bound of a metric's range.
    #[serde(default = "default_max_impact")]
    pub max_impact_value: f64,

    /// Maximum number of events, if capped.
    #[serde(default)]
    pub max_events: Option<usize>,

    /// Whether duplicate event ids are reported.
    #[serde(default = "default_true")]
    pub unique_ids: bool,
}

impl Default for ValidationConstraints {
    fn default() -> Self {
        Self {
            allow_negative_years: true,
            min_impact_value: default_min_impact(),
            max_impact_value: default_max_impact(),
            max_events: None,
            unique_ids: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_half_life() -> f64 {
    20.0
}

const fn default_base_year() -> i32 {
    1800
}

const fn default_year_span() -> u32 {
    50
}

const fn default_pixels_per_year() -> u32 {
    4
}

fn default_tracked() -> Vec<String> {
    CORE_METRICS.iter().map(|&name| name.to_owned()).collect()
}

const fn default_baseline() -> f64 {
    METRIC_BASELINE
}

const fn default_critical_low() -> f64 {
    10.0
}

const fn default_critical_high() -> f64 {
    190.0
}

const fn default_min_impact() -> f64 {
    METRIC_MIN
}

const fn default_max_impact() -> f64 {
    METRIC_MAX
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ChronoweaveConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.timeline.decay_half_life_years - 20.0).abs() < 1e-12);
        assert_eq!(config.timeline.base_year, 1800);
        assert_eq!(config.timeline.year_span, 50);
        assert_eq!(config.timeline.end_year(), 1849);
        assert_eq!(config.metrics.tracked.len(), 5);
        assert!((config.anomaly.critical_low - 10.0).abs() < 1e-12);
        assert!(config.validation.allow_negative_years);
        assert!(config.validation.unique_ids);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
timeline:
  decay_half_life_years: 12.5
  base_year: -500
  year_span: 100
  pixels_per_year: 8

metrics:
  tracked: [economy, culture]
  baseline: 50

anomaly:
  critical_low: 5
  critical_high: 195

validation:
  allow_negative_years: false
  max_events: 10
  unique_ids: false

logging:
  level: "debug"
"#;
        let config = ChronoweaveConfig::parse_without_env(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert!((config.timeline.decay_half_life_years - 12.5).abs() < 1e-12);
        assert_eq!(config.timeline.base_year, -500);
        assert_eq!(config.timeline.end_year(), -401);
        assert_eq!(config.metrics.tracked, vec!["economy", "culture"]);
        assert!((config.metrics.initial_vector().value_or_zero("culture") - 50.0).abs() < 1e-12);
        assert!((config.anomaly.critical_high - 195.0).abs() < 1e-12);
        assert!(!config.validation.allow_negative_years);
        assert_eq!(config.validation.max_events, Some(10));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ChronoweaveConfig::parse_without_env("timeline:\n  base_year: 1700\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.timeline.base_year, 1700);
        // Everything else uses defaults
        assert_eq!(config.timeline.year_span, 50);
        assert_eq!(config.metrics.tracked.len(), 5);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(ChronoweaveConfig::parse_without_env("").is_ok());
    }

    #[test]
    fn non_positive_half_life_is_invalid() {
        let config =
            ChronoweaveConfig::parse_without_env("timeline:\n  decay_half_life_years: 0\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn inverted_thresholds_are_invalid() {
        let yaml = "anomaly:\n  critical_low: 150\n  critical_high: 50\n";
        assert!(matches!(
            ChronoweaveConfig::parse_without_env(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let config = ChronoweaveConfig::parse_without_env("timeline: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn half_life_override_applies_when_valid() {
        let mut config = ChronoweaveConfig::default();
        config.apply_overrides(|key| (key == HALF_LIFE_ENV).then(|| "7.5".to_owned()));
        assert!((config.timeline.decay_half_life_years - 7.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_override_is_ignored() {
        let mut config = ChronoweaveConfig::default();
        config.apply_overrides(|_| Some("-3".to_owned()));
        assert!((config.timeline.decay_half_life_years - 20.0).abs() < 1e-12);
        config.apply_overrides(|_| Some("soon".to_owned()));
        assert!((config.timeline.decay_half_life_years - 20.0).abs() < 1e-12);
    }

    #[test]
    fn override_is_applied_before_validation() {
        let yaml = "timeline:\n  decay_half_life_years: 0\n";
        assert!(ChronoweaveConfig::parse_without_env(yaml).is_err());

        let repaired = ChronoweaveConfig::parse_with(yaml, |key| {
            (key == HALF_LIFE_ENV).then(|| "5".to_owned())
        });
        assert!(
            repaired.is_ok_and(|config| (config.timeline.decay_half_life_years - 5.0).abs() < 1e-12)
        );

        // Without a usable override the file value is still rejected.
        let rejected = ChronoweaveConfig::parse_with(yaml, |_| Some("never".to_owned()));
        assert!(matches!(rejected, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("chronoweave-config.yaml");
        if path.exists() {
            let config = ChronoweaveConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
