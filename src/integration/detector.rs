//! Trait for per-frame subject detection backends.

use nalgebra::Point2;

use crate::integration::source::Frame;

/// Trait for per-frame subject detection backends.
///
/// Implement this trait to connect any detection front end (background
/// subtraction, contour extraction, a neural detector, ...) to the tracking
/// pipeline. The tracker only ever sees the resulting candidate centroid.
///
/// # Example
///
/// ```ignore
/// use mazetrack_rs::{CentroidSource, Frame};
/// use nalgebra::Point2;
///
/// struct MyDetector {
///     // Your image-processing state here
/// }
///
/// impl CentroidSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Option<Point2<f32>>, Self::Error> {
///         // Run detection and return the subject's centroid
///         Ok(None)
///     }
/// }
/// ```
pub trait CentroidSource {
    /// Error type for detection failures.
    type Error;

    /// Produce the subject's candidate position for one frame.
    ///
    /// # Returns
    /// `Ok(Some(point))` for a detection, `Ok(None)` when the subject was
    /// not found this frame (a recoverable per-frame condition, never an
    /// error), or `Err` for a detector failure.
    fn detect(&mut self, frame: &Frame) -> Result<Option<Point2<f32>>, Self::Error>;
}
