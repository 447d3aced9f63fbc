//! Standard Hough transform producing full-length lines

use imageproc::hough::{detect_lines, LineDetectionOptions, PolarLine};
use tracing::trace;

use super::LineExtractor;
use crate::{DetectorConfig, EdgeMap, LineSegment};

/// Half-length of the synthetic segment drawn through each polar line's foot point
const HALF_SPAN: f64 = 1000.0;

/// Full-line extraction: every accumulator peak becomes a 2000 pixel segment
#[derive(Debug, Clone)]
pub struct FullLineExtractor {
    vote_threshold: u32,
    suppression_radius: u32,
}

impl FullLineExtractor {
    pub fn new(vote_threshold: u32, suppression_radius: u32) -> Self {
        Self {
            vote_threshold,
            suppression_radius,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.vote_threshold, config.suppression_radius)
    }
}

/// Segment through the foot point `(rho cos t, rho sin t)` extending `HALF_SPAN`
/// each way along the line. Endpoints are truncated toward zero.
pub fn polar_to_segment(rho: f64, theta: f64) -> LineSegment {
    let (sin, cos) = theta.sin_cos();
    let (x0, y0) = (rho * cos, rho * sin);
    LineSegment::new(
        (x0 - HALF_SPAN * sin).trunc(),
        (y0 + HALF_SPAN * cos).trunc(),
        (x0 + HALF_SPAN * sin).trunc(),
        (y0 - HALF_SPAN * cos).trunc(),
    )
}

impl From<PolarLine> for LineSegment {
    fn from(line: PolarLine) -> Self {
        polar_to_segment(f64::from(line.r), f64::from(line.angle_in_degrees).to_radians())
    }
}

impl LineExtractor for FullLineExtractor {
    fn extract_candidates(&self, edges: &EdgeMap) -> Vec<LineSegment> {
        if edges.width() == 0 || edges.height() == 0 {
            return Vec::new();
        }

        let options = LineDetectionOptions {
            vote_threshold: self.vote_threshold,
            suppression_radius: self.suppression_radius,
        };
        let lines = detect_lines(edges.as_image(), options);
        trace!("{} polar lines", lines.len());

        lines.into_iter().map(LineSegment::from).collect()
    }

    fn name(&self) -> &'static str {
        "full-line"
    }
}
