//! Extrapolation of bounds to the road region's full height

use crate::LineSegment;

/// Re-parametrize the infinite line through `seg` so its endpoints sit on
/// `y = road_horizon` and `y = frame_height`.
///
/// The endpoint that was higher in the frame (smaller y) moves to the horizon.
/// When `y1 == y2` the second endpoint goes to the horizon. Horizontal lines
/// never reach either row and yield `None`.
pub fn scale_to_road(seg: &LineSegment, road_horizon: u32, frame_height: u32) -> Option<LineSegment> {
    let horizon = f64::from(road_horizon);
    let bottom = f64::from(frame_height);
    let LineSegment { x1, y1, x2, y2 } = *seg;

    if seg.is_vertical() {
        return Some(if y1 < y2 {
            LineSegment::new(x1, horizon, x2, bottom)
        } else {
            LineSegment::new(x1, bottom, x2, horizon)
        });
    }

    let m = (y2 - y1) / (x2 - x1);
    if m == 0.0 {
        return None;
    }

    Some(if y1 < y2 {
        LineSegment::new((horizon - y1) / m + x1, horizon, (bottom - y2) / m + x2, bottom)
    } else {
        LineSegment::new((bottom - y1) / m + x1, bottom, (horizon - y2) / m + x2, horizon)
    })
}

/// `scale_to_road` lifted over an optional bound
pub fn scale_bound(bound: Option<LineSegment>, road_horizon: u32, frame_height: u32) -> Option<LineSegment> {
    bound.and_then(|seg| scale_to_road(&seg, road_horizon, frame_height))
}
