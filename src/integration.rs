//! Integration module for connecting video and detection collaborators with
//! the tracker.
//!
//! This module provides the seams to the external collaborators: frame
//! acquisition, per-frame subject detection, rendered output, interactive
//! pause/quit control, and the pipeline that runs the per-frame loop over
//! all of them.

mod control;
mod detector;
mod options;
mod pipeline;
mod source;

pub use control::{CancelToken, Control, ControlSource, NoControl};
pub use detector::CentroidSource;
pub use options::RunOptions;
pub use pipeline::{PipelineError, RunSummary, StopReason, TrackerPipeline};
pub use source::{BoxError, Frame, FrameSink, FrameSource};
