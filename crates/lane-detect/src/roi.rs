//! Road region of interest

use road_frame::VideoFrame;

use crate::LineSegment;

/// Lower part of a frame searched for lane lines
#[derive(Debug, Clone)]
pub struct Roi {
    /// Frame row where the region starts
    pub top: u32,
    /// Rows `[top, height)` of the source frame
    pub frame: VideoFrame,
}

impl Roi {
    pub fn is_empty(&self) -> bool {
        self.frame.height == 0 || self.frame.width == 0
    }
}

/// First ROI row: the horizon, but never above the middle row
pub fn roi_top(frame_height: u32, road_horizon: u32) -> u32 {
    road_horizon.max(frame_height / 2)
}

/// Cut the road region out of a frame
pub fn select(frame: &VideoFrame, road_horizon: u32) -> Roi {
    let top = roi_top(frame.height, road_horizon);
    Roi {
        top,
        frame: frame.rows_from(top),
    }
}

/// Move ROI-local candidates into full-frame coordinates
pub fn to_frame_coordinates(candidates: Vec<LineSegment>, roi_top: u32) -> Vec<LineSegment> {
    let dy = f64::from(roi_top);
    candidates
        .into_iter()
        .map(|seg| seg.translated(0.0, dy))
        .collect()
}
