pub mod common;
pub mod error;
#[cfg(feature = "ros")]
pub mod ros;
pub mod vis;

pub use crate::common::types::{PathSource, Point2D, Pose2D};
pub use crate::error::VisError;
pub use crate::vis::config::{CircleConstant, CrossTrackFormula, VisConfig};
pub use crate::vis::marker::{Color, Marker, MarkerAction, MarkerBatch, MarkerKind};
pub use crate::vis::primitives::{
    circle_marker, ct_error_markers, point_marker, publish_circle, publish_ct_error_line,
    publish_point, publish_unfilled_circle, unfilled_circle_markers,
};
pub use crate::vis::sink::{LogSink, MarkerSink, RecordingSink};
pub use crate::vis::VisContext;
