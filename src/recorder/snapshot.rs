//! Serializable statistics snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tracker::TrackState;

/// Full statistics snapshot for a run, as persisted to the stats artifact.
///
/// Dwell counters are converted from frames to seconds here; everything else
/// is carried over from [`TrackState`] as-is. A snapshot deserialized from
/// the artifact compares equal to one recomputed from the same state, so the
/// persisted file can always be cross-checked against memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Total Euclidean distance traveled, in coordinate units
    pub traveled_distance: f64,
    /// Seconds spent in each defined zone
    pub time_in_regions: BTreeMap<String, f64>,
    /// Qualifying entries into each defined zone
    pub entries: BTreeMap<String, u64>,
}

impl StatsSnapshot {
    /// Compute a snapshot from the current counters.
    ///
    /// `frame_rate` is the caller-supplied frames-per-second of the video,
    /// used to convert dwell frames to seconds.
    pub fn from_state(state: &TrackState, frame_rate: f32) -> Self {
        let frame_seconds = 1.0 / f64::from(frame_rate);
        Self {
            traveled_distance: state.cumulative_distance,
            time_in_regions: state
                .dwell_frames
                .iter()
                .map(|(label, frames)| (label.clone(), *frames as f64 * frame_seconds))
                .collect(),
            entries: state.entry_count.clone(),
        }
    }
}
