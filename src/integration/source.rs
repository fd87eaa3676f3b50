//! Frame acquisition and rendered-output seams.

use crate::tracker::TrackState;

/// Boxed collaborator error, used at the seams where the pipeline cannot
/// know the concrete error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single decoded video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw pixel data (format is an agreement between source and detector)
    pub data: Vec<u8>,
}

/// Trait for frame-sequential video acquisition.
///
/// Acquisition may block; the pipeline consumes frames strictly one at a
/// time.
pub trait FrameSource {
    /// Error type for acquisition failures.
    type Error;

    /// Read the next frame.
    ///
    /// `Ok(None)` signals a clean end of stream. An error on the very first
    /// read is fatal; an error after a successful read is treated as end of
    /// stream by the pipeline, matching the behavior of containers that
    /// report exhaustion as a read failure.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;

    /// Frame height in pixels, known before the first read; sizes the
    /// recorder's y-coordinate flip.
    fn height(&self) -> u32;
}

/// Trait for the optional rendered-output video.
///
/// Implementations burn overlays (zone rectangles, counters, entry
/// highlights) into the frame and encode it; the pipeline only hands over
/// what to draw.
pub trait FrameSink {
    /// Write one output frame.
    ///
    /// `entered` is true exactly when this frame counted a zone entry, for
    /// event-driven highlighting.
    fn write(&mut self, frame: &Frame, state: &TrackState, entered: bool) -> Result<(), BoxError>;
}
