//! Estimator configuration management.
//!
//! The estimation algorithm is driven by a handful of tunable constants.
//! They default to the values the filter was originally calibrated with and
//! can be overridden from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["undertone.yml", "undertone.yaml"];

/// Tunable constants for the filter estimator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Target for the summed hue-shifted mean color; the shift search stops
    /// once the rotated mean reaches this value.
    pub min_avg_red: f64,

    /// Upper bound for the hue-shift search, in whole degrees. Past it the
    /// target is treated as reached rather than searched further.
    pub max_hue_shift: u32,

    /// Divisor for the histogram significance threshold
    /// (`threshold = pixels / threshold_ratio`).
    pub threshold_ratio: f64,

    /// Extra gain applied to the blue component of the red channel mix.
    pub blue_mix_multiplier: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_avg_red: 60.0,
            max_hue_shift: 120,
            threshold_ratio: 2000.0,
            blue_mix_multiplier: 1.2,
        }
    }
}

impl EstimatorConfig {
    /// Clamp nonsensical values back to their defaults, returning a warning
    /// for each field that had to be corrected.
    pub fn sanitize(&mut self) -> Vec<String> {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        if !self.min_avg_red.is_finite() || self.min_avg_red <= 0.0 {
            warnings.push(format!(
                "min_avg_red {} is not a positive number, using default {}",
                self.min_avg_red, defaults.min_avg_red
            ));
            self.min_avg_red = defaults.min_avg_red;
        }
        if self.max_hue_shift == 0 || self.max_hue_shift > 360 {
            warnings.push(format!(
                "max_hue_shift {} is outside 1-360, using default {}",
                self.max_hue_shift, defaults.max_hue_shift
            ));
            self.max_hue_shift = defaults.max_hue_shift;
        }
        if !self.threshold_ratio.is_finite() || self.threshold_ratio <= 0.0 {
            warnings.push(format!(
                "threshold_ratio {} is not a positive number, using default {}",
                self.threshold_ratio, defaults.threshold_ratio
            ));
            self.threshold_ratio = defaults.threshold_ratio;
        }
        if !self.blue_mix_multiplier.is_finite() || self.blue_mix_multiplier <= 0.0 {
            warnings.push(format!(
                "blue_mix_multiplier {} is not a positive number, using default {}",
                self.blue_mix_multiplier, defaults.blue_mix_multiplier
            ));
            self.blue_mix_multiplier = defaults.blue_mix_multiplier;
        }

        warnings
    }
}

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct EstimatorConfigHandle {
    pub config: EstimatorConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// With no forced path, searches the current directory for the canonical
/// file names and falls back to defaults when nothing is found. A file that
/// exists but fails to parse surfaces as a warning, never as a hard error.
pub fn load_config(forced_path: Option<&Path>) -> EstimatorConfigHandle {
    let candidate = match forced_path {
        Some(path) => Some(path.to_path_buf()),
        None => CONFIG_FILENAMES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    };

    let Some(path) = candidate else {
        return EstimatorConfigHandle {
            config: EstimatorConfig::default(),
            source: None,
            warnings: Vec::new(),
        };
    };

    let mut warnings = Vec::new();
    let mut config = match fs::read_to_string(&path) {
        Ok(contents) => match serde_yaml::from_str::<EstimatorConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warnings.push(format!(
                    "Failed to parse config {}: {}, using defaults",
                    path.display(),
                    e
                ));
                EstimatorConfig::default()
            }
        },
        Err(e) => {
            warnings.push(format!(
                "Failed to read config {}: {}, using defaults",
                path.display(),
                e
            ));
            EstimatorConfig::default()
        }
    };

    warnings.extend(config.sanitize());

    EstimatorConfigHandle {
        config,
        source: Some(path),
        warnings,
    }
}
