//! Line candidate extraction from edge maps
//!
//! Two interchangeable strategies share the [`LineExtractor`] seam:
//! - [`BoundedSegmentExtractor`]: progressive probabilistic Hough, segments end
//!   where the supporting edge pixels end
//! - [`FullLineExtractor`]: standard Hough, each polar line becomes a long
//!   synthetic segment through its foot point
//!
//! Output coordinates are local to the edge map.

mod bounded;
mod full;

pub use bounded::BoundedSegmentExtractor;
pub use full::{polar_to_segment, FullLineExtractor};

use crate::{DetectorConfig, EdgeMap, LineSegment};

/// Hough angle resolution: one bin per degree over `[0, pi)`
pub(crate) const ANGLE_BINS: usize = 180;

/// Produces raw line candidates from an edge map
pub trait LineExtractor: Send + Sync {
    /// Candidate segments in edge-map coordinates; empty when nothing is found
    fn extract_candidates(&self, edges: &EdgeMap) -> Vec<LineSegment>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Strategy selected by `use_bounded_segments`
pub fn extractor_for(config: &DetectorConfig) -> Box<dyn LineExtractor> {
    if config.use_bounded_segments {
        Box::new(BoundedSegmentExtractor::from_config(config))
    } else {
        Box::new(FullLineExtractor::from_config(config))
    }
}
