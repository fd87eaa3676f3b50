mod motion;
mod rect;
mod zone;

pub use motion::{FrameUpdate, MotionTracker, TrackState, TrackerConfig};
pub use rect::Rect;
pub use zone::{CENTER_LABEL, Zone, ZoneSet, ZoneSetError};
