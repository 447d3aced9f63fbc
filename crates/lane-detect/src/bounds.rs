//! Candidate filtering and nearest-bound selection

use serde::{Deserialize, Serialize};

use crate::{DetectorConfig, LineSegment};

/// Per-frame counts of why candidates were dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub candidates: usize,
    pub too_short: usize,
    pub too_flat: usize,
    /// Horizontal lines never reach the base row
    pub no_base_crossing: usize,
    /// Base crossing exactly on the centerline
    pub centered: usize,
    pub accepted: usize,
}

/// Running result of the selection fold
#[derive(Debug, Clone, Default)]
pub struct BoundSelection {
    /// Closest candidate with negative distance, with that distance
    pub left: Option<(LineSegment, f64)>,
    /// Closest candidate with positive distance, with that distance
    pub right: Option<(LineSegment, f64)>,
    pub stats: FilterStats,
}

impl BoundSelection {
    pub fn left_bound(&self) -> Option<LineSegment> {
        self.left.map(|(seg, _)| seg)
    }

    pub fn right_bound(&self) -> Option<LineSegment> {
        self.right.map(|(seg, _)| seg)
    }

    /// Keep `seg` if it is strictly nearer the center than the current bound on its side
    fn offer(mut self, seg: LineSegment, dist: f64) -> Self {
        if dist < 0.0 {
            if self.left.map_or(true, |(_, best)| dist > best) {
                self.left = Some((seg, dist));
            }
        } else if dist > 0.0 {
            if self.right.map_or(true, |(_, best)| dist < best) {
                self.right = Some((seg, dist));
            }
        } else {
            self.stats.centered += 1;
        }
        self
    }
}

/// Signed offset of the line's base crossing from the vertical centerline.
///
/// Negative when the line crosses `y = 0` right of center. `None` for
/// horizontal lines.
pub fn base_distance(seg: &LineSegment, frame_width: u32) -> Option<f64> {
    seg.base_crossing()
        .map(|cross| f64::from(frame_width) * 0.5 - cross)
}

/// Filter candidates and pick the nearest line on each side of center.
///
/// Candidates must already be in frame coordinates. Ties keep the first
/// candidate seen.
pub fn select_bounds<I>(candidates: I, frame_width: u32, config: &DetectorConfig) -> BoundSelection
where
    I: IntoIterator<Item = LineSegment>,
{
    candidates
        .into_iter()
        .fold(BoundSelection::default(), |mut acc, seg| {
            acc.stats.candidates += 1;

            if seg.length() < config.min_candidate_length {
                acc.stats.too_short += 1;
                return acc;
            }
            if seg.angle() < config.angle_threshold {
                acc.stats.too_flat += 1;
                return acc;
            }
            let Some(dist) = base_distance(&seg, frame_width) else {
                acc.stats.no_base_crossing += 1;
                return acc;
            };

            acc.stats.accepted += 1;
            acc.offer(seg, dist)
        })
}
