//! Per-frame lane bound detection

use road_frame::VideoFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bounds::{select_bounds, FilterStats};
use crate::lines::{extractor_for, LineExtractor};
use crate::scaler::scale_bound;
use crate::{roi, DetectorConfig, EdgeExtractor, LaneError, LineSegment};

/// Left and right lane bounds for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneBounds {
    /// Nearest line crossing the base row right of center
    pub left: Option<LineSegment>,
    /// Nearest line crossing the base row left of center
    pub right: Option<LineSegment>,
}

impl LaneBounds {
    /// No bound on either side
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Where the two bounds meet, if both exist and are not parallel
    pub fn vanishing_point(&self) -> Option<(f64, f64)> {
        self.left?.intersection(&self.right?)
    }
}

/// Lane detector: immutable configuration plus the stage implementations it selects
pub struct LaneDetector {
    config: DetectorConfig,
    edges: EdgeExtractor,
    lines: Box<dyn LineExtractor>,
}

impl LaneDetector {
    /// Create a detector, rejecting unusable configuration
    pub fn new(config: DetectorConfig) -> Result<Self, LaneError> {
        config.validate()?;

        let lines = extractor_for(&config);
        info!(
            "Creating lane detector: horizon={}, votes={}, angle={:.3}rad, mode={}",
            config.road_horizon,
            config.vote_threshold,
            config.angle_threshold,
            lines.name()
        );

        Ok(Self {
            edges: EdgeExtractor::new(config.blur_kernel_size),
            lines,
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the lane bounds in a frame
    pub fn detect(&self, frame: &VideoFrame) -> Result<LaneBounds, LaneError> {
        self.detect_with_stats(frame).map(|(bounds, _)| bounds)
    }

    /// Detect, also returning how the candidates were filtered
    pub fn detect_with_stats(&self, frame: &VideoFrame) -> Result<(LaneBounds, FilterStats), LaneError> {
        frame.validate()?;

        let roi = roi::select(frame, self.config.road_horizon);
        if roi.is_empty() {
            debug!(
                "frame {}: horizon row {} leaves no road region in {} rows",
                frame.sequence, roi.top, frame.height
            );
            return Ok((LaneBounds::none(), FilterStats::default()));
        }

        let edge_map = self.edges.extract(&roi.frame);
        let local = self.lines.extract_candidates(&edge_map);
        let candidates = roi::to_frame_coordinates(local, roi.top);

        let selection = select_bounds(candidates, frame.width, &self.config);
        let stats = selection.stats;
        debug!(?stats, "frame {}: candidate filtering", frame.sequence);

        let bounds = LaneBounds {
            left: scale_bound(selection.left_bound(), self.config.road_horizon, frame.height),
            right: scale_bound(selection.right_bound(), self.config.road_horizon, frame.height),
        };

        debug!(
            left = bounds.left.is_some(),
            right = bounds.right.is_some(),
            "frame {}: lane bounds",
            frame.sequence
        );

        Ok((bounds, stats))
    }
}

/// One-shot detection with a throwaway detector
pub fn detect(frame: &VideoFrame, config: &DetectorConfig) -> Result<LaneBounds, LaneError> {
    LaneDetector::new(config.clone())?.detect(frame)
}
