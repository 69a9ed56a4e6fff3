//! Multi-modal route domain types and the segmentation engine.

mod access;
mod mode;
mod path;
mod segmenter;

pub use access::{AccessLink, access_links};
pub use mode::{ModeThresholds, TransportMode};
pub use path::{Geometry, Price, RawPath, Segment, SegmentedPath};
pub use segmenter::Segmenter;
