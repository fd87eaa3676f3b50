//! Per-frame motion state machine: distance, dwell, and entry accounting.

use std::collections::BTreeMap;

use nalgebra::Point2;

use crate::tracker::zone::{CENTER_LABEL, ZoneSet};

/// Configuration for the motion tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum speed, in coordinate units per frame, for a center-to-zone
    /// transition to count as an entry. Suppresses phantom entries caused by
    /// detection jitter at a zone boundary.
    pub entry_speed_floor: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            entry_speed_floor: 1.0,
        }
    }
}

/// Motion counters threaded frame-to-frame through the tracking loop.
///
/// All counters are monotonically non-decreasing. The per-zone maps are
/// pre-seeded with a zero for every defined zone so that persisted snapshots
/// always carry the full label set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Position of the last frame that had a detection, if any
    pub previous_position: Option<Point2<f32>>,
    /// Zone label of the last frame that had a detection
    pub previous_zone: String,
    /// Total Euclidean distance traveled, in coordinate units
    pub cumulative_distance: f64,
    /// Frames spent inside each defined zone
    pub dwell_frames: BTreeMap<String, u64>,
    /// Qualifying entries into each defined zone
    pub entry_count: BTreeMap<String, u64>,
    /// Frames with a detection classified as center
    pub center_frames: u64,
    /// Frames with any detection at all
    pub detected_frames: u64,
}

impl TrackState {
    /// Create the initial state for a run: zero counters, center zone.
    pub fn new(zones: &ZoneSet) -> Self {
        let zeros: BTreeMap<String, u64> =
            zones.labels().map(|label| (label.to_string(), 0)).collect();
        Self {
            previous_position: None,
            previous_zone: CENTER_LABEL.to_string(),
            cumulative_distance: 0.0,
            dwell_frames: zeros.clone(),
            entry_count: zeros,
            center_frames: 0,
            detected_frames: 0,
        }
    }

    /// Total frames counted into per-zone dwell counters.
    pub fn zone_frames(&self) -> u64 {
        self.dwell_frames.values().sum()
    }
}

/// Outcome of a single [`MotionTracker::update`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// True exactly when this frame incremented an entry counter
    pub entered: bool,
    /// Distance from the previous position, `None` when the frame had no
    /// detection
    pub speed: Option<f32>,
}

/// The core tracking state machine.
///
/// Runs over the alphabet of zone labels plus the implicit center; the
/// initial state is center with zero counters, and there is no terminal
/// state. Exactly one `update` is expected per processed frame.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    state: TrackState,
    config: TrackerConfig,
}

impl MotionTracker {
    pub fn new(zones: &ZoneSet, config: TrackerConfig) -> Self {
        Self {
            state: TrackState::new(zones),
            config,
        }
    }

    pub fn with_default_config(zones: &ZoneSet) -> Self {
        Self::new(zones, TrackerConfig::default())
    }

    /// Current counters.
    pub fn state(&self) -> &TrackState {
        &self.state
    }

    /// Consume the tracker and return the final counters.
    pub fn into_state(self) -> TrackState {
        self.state
    }

    /// Advance the state machine by one frame.
    ///
    /// `zone` is the classification of `position` against the run's zone
    /// set. A frame without a detection is transparent: no counter moves and
    /// `previous_zone`/`previous_position` carry forward unchanged, so a
    /// detection gap neither advances nor reverts the hysteresis state.
    ///
    /// An entry is counted only on a center-to-zone transition faster than
    /// the configured speed floor; passing through the center is required
    /// before a re-entry can count again.
    pub fn update(&mut self, position: Option<Point2<f32>>, zone: &str) -> FrameUpdate {
        let Some(position) = position else {
            return FrameUpdate {
                entered: false,
                speed: None,
            };
        };

        // First valid frame measures from the origin, like a reading that
        // starts at an unset (0, 0) previous position.
        let previous = self.state.previous_position.unwrap_or(Point2::origin());
        let speed = nalgebra::distance(&previous, &position);

        self.state.cumulative_distance += f64::from(speed);
        self.state.detected_frames += 1;

        if zone == CENTER_LABEL {
            self.state.center_frames += 1;
        } else {
            *self.state.dwell_frames.entry(zone.to_string()).or_insert(0) += 1;
        }

        let entered = self.state.previous_zone == CENTER_LABEL
            && zone != CENTER_LABEL
            && speed > self.config.entry_speed_floor;
        if entered {
            *self.state.entry_count.entry(zone.to_string()).or_insert(0) += 1;
        }

        self.state.previous_zone = zone.to_string();
        self.state.previous_position = Some(position);

        FrameUpdate {
            entered,
            speed: Some(speed),
        }
    }
}
