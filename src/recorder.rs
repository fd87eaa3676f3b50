//! Persistence of tracker state: stats snapshots and tabular logs.
//!
//! Every artifact is independently gated by its own enable flag; none of
//! them overlap in responsibility. These are best-effort observational
//! outputs, opened and written by a single process with no cross-process
//! coordination.

mod artifacts;
mod sink;
mod snapshot;

pub use artifacts::ArtifactPaths;
pub use sink::{FrameRecord, RecorderConfig, RecorderError, StatsRecorder};
pub use snapshot::StatsSnapshot;
