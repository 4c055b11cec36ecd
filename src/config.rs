//! Simulation settings: compensation anchors, interview length bounds and search limits.
//!
//! Settings are loaded once (file, then `HIRESIM_*` environment overrides), validated,
//! and passed by reference to every component that needs them.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix for environment overrides, e.g. `HIRESIM_MAX_CANDIDATES_TO_CONSIDER=250`.
pub const ENV_PREFIX: &str = "HIRESIM_";

/// Environment variable naming an optional settings file for the CLI.
pub const CONFIG_PATH_ENV: &str = "HIRESIM_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub min_compensation: f64,
    pub max_compensation: f64,
    pub p25_compensation: f64,
    pub median_compensation: f64,
    pub p75_compensation: f64,
    pub p90_compensation: f64,

    /// Shortest observation window in hours; shorter durations are clamped up.
    pub min_interview_length: f64,
    /// Longest observation window in hours; longer durations are clamped down.
    pub max_interview_length: f64,
    /// Hard cap on candidates drawn by a single search.
    pub max_candidates_to_consider: usize,
    pub default_self_assessment_time: f64,
    pub default_interview_length: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_compensation: 95_000.0,
            max_compensation: 600_000.0,
            p25_compensation: 192_000.0,
            median_compensation: 254_000.0,
            p75_compensation: 348_000.0,
            p90_compensation: 455_000.0,
            min_interview_length: 0.25,
            max_interview_length: 2.0,
            max_candidates_to_consider: 1000,
            default_self_assessment_time: 1.0,
            default_interview_length: 1.0,
        }
    }
}

impl Settings {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.yaml`/`.yml` or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    /// Defaults plus overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_process_env()
    }

    /// These settings with `HIRESIM_*` process-environment overrides applied, validated.
    pub fn with_process_env(mut self) -> Result<Self, ConfigError> {
        self.apply_env_overrides(|key| std::env::var(key).ok())?;
        self.validate()?;
        Ok(self)
    }

    /// Overwrite fields from `HIRESIM_<FIELD>` values returned by `lookup`.
    /// The caller is expected to call [`Settings::validate`] afterwards.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_field(&lookup, "MIN_COMPENSATION", &mut self.min_compensation)?;
        override_field(&lookup, "MAX_COMPENSATION", &mut self.max_compensation)?;
        override_field(&lookup, "P25_COMPENSATION", &mut self.p25_compensation)?;
        override_field(&lookup, "MEDIAN_COMPENSATION", &mut self.median_compensation)?;
        override_field(&lookup, "P75_COMPENSATION", &mut self.p75_compensation)?;
        override_field(&lookup, "P90_COMPENSATION", &mut self.p90_compensation)?;
        override_field(&lookup, "MIN_INTERVIEW_LENGTH", &mut self.min_interview_length)?;
        override_field(&lookup, "MAX_INTERVIEW_LENGTH", &mut self.max_interview_length)?;
        override_field(
            &lookup,
            "MAX_CANDIDATES_TO_CONSIDER",
            &mut self.max_candidates_to_consider,
        )?;
        override_field(
            &lookup,
            "DEFAULT_SELF_ASSESSMENT_TIME",
            &mut self.default_self_assessment_time,
        )?;
        override_field(&lookup, "DEFAULT_INTERVIEW_LENGTH", &mut self.default_interview_length)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_interview_length.is_finite() && self.min_interview_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_interview_length must be positive, got {}",
                self.min_interview_length
            )));
        }
        if !self.max_interview_length.is_finite()
            || self.max_interview_length < self.min_interview_length
        {
            return Err(ConfigError::Invalid(format!(
                "max_interview_length ({}) must be >= min_interview_length ({})",
                self.max_interview_length, self.min_interview_length
            )));
        }
        for (name, value) in [
            ("default_self_assessment_time", self.default_self_assessment_time),
            ("default_interview_length", self.default_interview_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.max_candidates_to_consider == 0 {
            return Err(ConfigError::Invalid(
                "max_candidates_to_consider must be at least 1".to_string(),
            ));
        }

        let anchors = self.compensation_anchors();
        if anchors.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::Invalid(
                "compensation anchors must be finite".to_string(),
            ));
        }
        if anchors.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ConfigError::Invalid(format!(
                "compensation anchors must be non-decreasing (min, p25, median, p75, p90, max), got {anchors:?}"
            )));
        }
        Ok(())
    }

    /// Anchors in curve order: min, p25, median, p75, p90, max.
    pub fn compensation_anchors(&self) -> [f64; 6] {
        [
            self.min_compensation,
            self.p25_compensation,
            self.median_compensation,
            self.p75_compensation,
            self.p90_compensation,
            self.max_compensation,
        ]
    }

    /// Clamp an observation duration into `[min_interview_length, max_interview_length]`.
    ///
    /// Never panics, even for settings that would fail [`Settings::validate`]: inverted
    /// bounds are reordered and a NaN bound is ignored. NaN durations map to the lower bound.
    pub fn clamp_duration(&self, duration: f64) -> f64 {
        let lower = self.min_interview_length.min(self.max_interview_length);
        let upper = self.min_interview_length.max(self.max_interview_length);
        if duration.is_nan() {
            return lower;
        }
        duration.max(lower).min(upper)
    }
}

fn override_field<T, F>(lookup: &F, name: &str, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}{name}");
    let Some(raw) = lookup(&key) else {
        return Ok(());
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            *slot = value;
            Ok(())
        }
        Err(_) => Err(ConfigError::InvalidOverride { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().expect("defaults should validate");
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let settings = Settings::from_yaml_str("max_candidates_to_consider: 25\n")
            .expect("partial yaml should load");
        assert_eq!(settings.max_candidates_to_consider, 25);
        assert_eq!(settings.min_interview_length, 0.25);
        assert_eq!(settings.p90_compensation, 455_000.0);
    }

    #[test]
    fn env_overrides_replace_fields() {
        let vars: HashMap<String, String> = [
            ("HIRESIM_MAX_INTERVIEW_LENGTH", "3.5"),
            ("HIRESIM_MAX_CANDIDATES_TO_CONSIDER", " 40 "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_env_overrides(|key| vars.get(key).cloned())
            .expect("overrides should parse");
        assert_eq!(settings.max_interview_length, 3.5);
        assert_eq!(settings.max_candidates_to_consider, 40);
    }

    #[test]
    fn clamp_duration_tolerates_unvalidated_bounds() {
        let inverted = Settings {
            min_interview_length: 2.0,
            max_interview_length: 1.0,
            ..Settings::default()
        };
        assert_eq!(inverted.clamp_duration(5.0), 2.0);
        assert_eq!(inverted.clamp_duration(0.1), 1.0);
        assert_eq!(inverted.clamp_duration(1.5), 1.5);
        assert_eq!(inverted.clamp_duration(f64::NAN), 1.0);

        let nan_upper = Settings {
            max_interview_length: f64::NAN,
            ..Settings::default()
        };
        assert_eq!(nan_upper.clamp_duration(0.1), 0.25);
        assert_eq!(nan_upper.clamp_duration(1.0), 0.25);
    }

    #[test]
    fn unparseable_override_is_reported_with_its_key() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env_overrides(|key| {
                (key == "HIRESIM_MIN_INTERVIEW_LENGTH").then(|| "quick".to_string())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride { ref key, ref value }
                if key == "HIRESIM_MIN_INTERVIEW_LENGTH" && value == "quick"
        ));
    }

    #[test]
    fn inverted_interview_bounds_are_rejected() {
        let settings = Settings {
            min_interview_length: 2.0,
            max_interview_length: 1.0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn decreasing_compensation_anchors_are_rejected() {
        let settings = Settings {
            p75_compensation: 500_000.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn clamp_duration_bounds_input() {
        let settings = Settings::default();
        assert_eq!(settings.clamp_duration(0.0), 0.25);
        assert_eq!(settings.clamp_duration(10.0), 2.0);
        assert_eq!(settings.clamp_duration(1.25), 1.25);
        assert_eq!(settings.clamp_duration(f64::NAN), 0.25);
    }
}
