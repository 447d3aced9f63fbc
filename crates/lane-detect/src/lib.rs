//! Lane Bound Detection
//!
//! Finds the left and right lane boundary lines nearest the vehicle's centerline
//! in a single road-camera frame:
//! - Region of interest below the road horizon
//! - Median-adaptive Canny edge extraction
//! - Hough line candidates (bounded segments or full lines)
//! - Length/angle filtering and nearest-bound selection per side
//! - Extrapolation of each bound from the horizon to the frame bottom
//!
//! Detection is a pure function of (frame, configuration); [`FramePipeline`]
//! runs it over many frames concurrently.

pub mod bounds;
pub mod config;
pub mod detector;
pub mod edges;
pub mod lines;
pub mod pipeline;
pub mod roi;
pub mod scaler;
pub mod segment;

pub use bounds::{select_bounds, BoundSelection, FilterStats};
pub use self::config::DetectorConfig;
pub use detector::{detect, LaneBounds, LaneDetector};
pub use edges::{EdgeExtractor, EdgeMap};
pub use lines::{BoundedSegmentExtractor, FullLineExtractor, LineExtractor};
pub use pipeline::{FrameDetection, FramePipeline};
pub use segment::LineSegment;

use road_frame::FrameError;
use thiserror::Error;

/// Lane detection error types
#[derive(Error, Debug)]
pub enum LaneError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Detection worker failed: {0}")]
    Worker(String),
}

impl From<::config::ConfigError> for LaneError {
    fn from(err: ::config::ConfigError) -> Self {
        LaneError::Config(err.to_string())
    }
}
