//! Lane detector configuration

use std::f64::consts::PI;
use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LaneError;

/// Environment prefix for overrides, e.g. `LANE_ROAD_HORIZON=300`
pub const ENV_PREFIX: &str = "LANE";

/// Lane detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Pixel row separating sky from road
    pub road_horizon: u32,

    /// Minimum Hough accumulator votes for a line
    pub vote_threshold: u32,

    /// Minimum line angle from horizontal (radians)
    pub angle_threshold: f64,

    /// Bounded Hough segments (true) or full polar lines (false)
    pub use_bounded_segments: bool,

    /// Shortest segment the bounded transform reports (pixels)
    pub min_segment_length: u32,

    /// Largest gap bridged between collinear edge points (pixels)
    pub max_segment_gap: u32,

    /// Candidates shorter than this are discarded before selection (pixels)
    pub min_candidate_length: f64,

    /// Side of the square smoothing kernel, odd
    pub blur_kernel_size: u32,

    /// Peak suppression radius for the full-line transform (accumulator cells)
    pub suppression_radius: u32,

    /// Seed for the bounded transform's edge point ordering
    pub sampling_seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            road_horizon: 0,
            vote_threshold: 50,
            angle_threshold: 0.3,
            use_bounded_segments: true,
            min_segment_length: 50,
            max_segment_gap: 50,
            min_candidate_length: 60.0,
            blur_kernel_size: 7,
            suppression_radius: 1,
            sampling_seed: 0x1A4E,
        }
    }
}

impl DetectorConfig {
    /// Bounded-segment config for a camera with the given horizon row
    pub fn new(road_horizon: u32) -> Self {
        Self {
            road_horizon,
            ..Default::default()
        }
    }

    /// Full-line config for a camera with the given horizon row
    pub fn full_line(road_horizon: u32) -> Self {
        Self {
            road_horizon,
            use_bounded_segments: false,
            ..Default::default()
        }
    }

    /// Load from a config file with `LANE_*` environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LaneError> {
        let path = path.as_ref();
        debug!("Loading detector config from {}", path.display());

        let config: DetectorConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse inline TOML; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, LaneError> {
        let config: DetectorConfig = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the detector cannot run with
    pub fn validate(&self) -> Result<(), LaneError> {
        if self.vote_threshold == 0 {
            return Err(LaneError::Config("vote_threshold must be positive".into()));
        }
        if !(0.0..=PI).contains(&self.angle_threshold) {
            return Err(LaneError::Config(format!(
                "angle_threshold {} outside [0, pi]",
                self.angle_threshold
            )));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(LaneError::Config(format!(
                "blur_kernel_size {} must be odd",
                self.blur_kernel_size
            )));
        }
        if self.min_segment_length == 0 {
            return Err(LaneError::Config("min_segment_length must be positive".into()));
        }
        if !self.min_candidate_length.is_finite() || self.min_candidate_length < 0.0 {
            return Err(LaneError::Config(format!(
                "min_candidate_length {} must be a non-negative length",
                self.min_candidate_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let config = DetectorConfig::default();
        assert_eq!(config.vote_threshold, 50);
        assert!((config.angle_threshold - 0.3).abs() < f64::EPSILON);
        assert!(config.use_bounded_segments);
        assert_eq!(config.min_segment_length, 50);
        assert_eq!(config.max_segment_gap, 50);
        assert_eq!(config.min_candidate_length, 60.0);
        assert_eq!(config.blur_kernel_size, 7);
        assert_eq!(config.suppression_radius, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_line_preset() {
        let config = DetectorConfig::full_line(240);
        assert_eq!(config.road_horizon, 240);
        assert!(!config.use_bounded_segments);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_votes = DetectorConfig {
            vote_threshold: 0,
            ..Default::default()
        };
        assert!(zero_votes.validate().is_err());

        let even_kernel = DetectorConfig {
            blur_kernel_size: 6,
            ..Default::default()
        };
        assert!(even_kernel.validate().is_err());

        let steep = DetectorConfig {
            angle_threshold: 4.0,
            ..Default::default()
        };
        assert!(steep.validate().is_err());

        let nan_length = DetectorConfig {
            min_candidate_length: f64::NAN,
            ..Default::default()
        };
        assert!(nan_length.validate().is_err());
    }

    #[test]
    fn test_from_toml_keeps_unset_defaults() {
        let config = DetectorConfig::from_toml_str(
            "road_horizon = 320\nuse_bounded_segments = false\nangle_threshold = 0.5\n",
        )
        .unwrap();

        assert_eq!(config.road_horizon, 320);
        assert!(!config.use_bounded_segments);
        assert!((config.angle_threshold - 0.5).abs() < 1e-12);
        assert_eq!(config.vote_threshold, 50);
    }

    #[test]
    fn test_from_toml_validates() {
        let err = DetectorConfig::from_toml_str("vote_threshold = 0\n").unwrap_err();
        assert!(matches!(err, LaneError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lane-detect-config-{}.toml", std::process::id()));
        std::fs::write(&path, "road_horizon = 200\nvote_threshold = 35\n").unwrap();

        let config = DetectorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.road_horizon, 200);
        assert_eq!(config.vote_threshold, 35);
        assert_eq!(config.max_segment_gap, 50);
    }

    #[test]
    fn test_env_overrides_file() {
        let path = std::env::temp_dir().join(format!("lane-detect-env-{}.toml", std::process::id()));
        std::fs::write(&path, "suppression_radius = 5
angle_threshold = 0.4
").unwrap();

        // Tests share the process environment: only touch fields no other loading test checks
        std::env::set_var("LANE_SUPPRESSION_RADIUS", "3");
        std::env::set_var("LANE_ANGLE_THRESHOLD", "0.6");
        let config = DetectorConfig::load(&path);
        std::env::remove_var("LANE_SUPPRESSION_RADIUS");
        std::env::remove_var("LANE_ANGLE_THRESHOLD");
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.suppression_radius, 3);
        assert!((config.angle_threshold - 0.6).abs() < 1e-12);
        assert_eq!(config.vote_threshold, 50);
    }
}
