//! Zone-occupancy tracking and motion statistics for fixed-camera
//! behavioral video.
//!
//! The crate tracks a single moving subject, classifies its per-frame
//! position against user-defined rectangular zones, and accumulates travel
//! distance, per-zone dwell time and per-zone entry counts. Detection,
//! video decoding and rendering are external collaborators plugged in
//! through the [`integration`] traits; the core is the
//! [`MotionTracker`] state machine and the [`StatsRecorder`] persistence
//! layer.
//!
//! # Example
//!
//! ```ignore
//! use mazetrack_rs::{
//!     ArtifactPaths, RecorderConfig, StatsRecorder, TrackerPipeline, ZoneSet,
//! };
//!
//! let zones = ZoneSet::from_definitions_file("maze_trial.json")?;
//! let recorder = StatsRecorder::new(
//!     RecorderConfig { log_stats: true, ..RecorderConfig::default() },
//!     &ArtifactPaths::for_video("maze_trial.avi".as_ref(), "logs".as_ref()),
//!     30.0,
//!     height,
//! )?;
//! let summary = TrackerPipeline::new(source, detector, zones, recorder).run()?;
//! println!("distance: {:.1}", summary.state.cumulative_distance);
//! ```

pub mod integration;
pub mod recorder;
pub mod tracker;

pub use integration::{
    CancelToken, CentroidSource, Control, ControlSource, Frame, FrameSink, FrameSource,
    PipelineError, RunOptions, RunSummary, StopReason, TrackerPipeline,
};
pub use recorder::{ArtifactPaths, FrameRecord, RecorderConfig, RecorderError, StatsRecorder, StatsSnapshot};
pub use tracker::{
    CENTER_LABEL, FrameUpdate, MotionTracker, Rect, TrackState, TrackerConfig, Zone, ZoneSet,
    ZoneSetError,
};
