//! TrackerPipeline: the frame-sequential tracking loop.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::integration::control::{CancelToken, Control, ControlSource};
use crate::integration::detector::CentroidSource;
use crate::integration::source::{BoxError, FrameSink, FrameSource};
use crate::recorder::{FrameRecord, RecorderError, StatsRecorder};
use crate::tracker::{MotionTracker, TrackState, TrackerConfig, ZoneSet};

/// Error type for a tracking run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The frame source failed before producing a single frame.
    #[error("frame source failed: {0}")]
    Source(#[source] BoxError),
    /// The detector failed outright (distinct from "no detection").
    #[error("detector failed: {0}")]
    Detector(#[source] BoxError),
    /// The rendered-output sink failed.
    #[error("rendered output failed: {0}")]
    Sink(#[source] BoxError),
    /// An artifact write failed.
    #[error(transparent)]
    Recorder(#[from] RecorderError),
}

/// How a run came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frame source was exhausted
    EndOfStream,
    /// The cancellation token was observed
    Cancelled,
    /// The control source requested a quit
    Quit,
}

/// Final report of a tracking run.
#[derive(Debug)]
pub struct RunSummary {
    /// Frames read from the source
    pub frames_read: u64,
    /// Why the loop stopped
    pub stop_reason: StopReason,
    /// Final counters
    pub state: TrackState,
}

/// The tracking loop: frame source, detector, classifier, state machine and
/// recorder wired together.
///
/// Single-threaded and frame-sequential; the tracker state is owned
/// exclusively by the loop. The only suspension points are blocking frame
/// acquisition and the interactive pause, during which no state mutates.
pub struct TrackerPipeline<S: FrameSource, D: CentroidSource> {
    source: S,
    detector: D,
    zones: ZoneSet,
    tracker: MotionTracker,
    recorder: StatsRecorder,
    sink: Option<Box<dyn FrameSink>>,
    control: Box<dyn ControlSource>,
    cancel: CancelToken,
}

impl<S, D> TrackerPipeline<S, D>
where
    S: FrameSource,
    S::Error: Into<BoxError>,
    D: CentroidSource,
    D::Error: Into<BoxError>,
{
    /// Create a pipeline with the default tracker configuration.
    pub fn new(source: S, detector: D, zones: ZoneSet, recorder: StatsRecorder) -> Self {
        Self::with_tracker_config(source, detector, zones, recorder, TrackerConfig::default())
    }

    pub fn with_tracker_config(
        source: S,
        detector: D,
        zones: ZoneSet,
        recorder: StatsRecorder,
        config: TrackerConfig,
    ) -> Self {
        let tracker = MotionTracker::new(&zones, config);
        Self {
            source,
            detector,
            zones,
            tracker,
            recorder,
            sink: None,
            control: Box::new(crate::integration::control::NoControl),
            cancel: CancelToken::new(),
        }
    }

    /// Attach a rendered-output sink (`--save-video`).
    pub fn with_sink(mut self, sink: Box<dyn FrameSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attach an interactive pause/quit source.
    pub fn with_control(mut self, control: Box<dyn ControlSource>) -> Self {
        self.control = control;
        self
    }

    /// A cancellation handle for this pipeline. Clone it out before calling
    /// [`run`](Self::run); cancelling from a signal handler or another
    /// thread stops the loop at the next frame boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current counters.
    pub fn state(&self) -> &TrackState {
        self.tracker.state()
    }

    /// Run the loop until the stream ends, a quit is requested, or the
    /// cancellation token fires.
    ///
    /// On every exit path, graceful or fatal, the recorder is released
    /// before returning, so artifacts written up to that point survive.
    /// Fatal collaborator failures surface as [`PipelineError`]; the caller
    /// decides the process exit status.
    pub fn run(mut self) -> Result<RunSummary, PipelineError> {
        info!(zones = self.zones.len(), "tracking started");

        let outcome = self.run_loop();
        let finished = self.recorder.finish();
        match outcome {
            Ok((stop_reason, frames_read)) => {
                finished?;
                Ok(RunSummary {
                    frames_read,
                    stop_reason,
                    state: self.tracker.into_state(),
                })
            }
            Err(error) => {
                if let Err(finish_error) = finished {
                    warn!(%finish_error, "failed to release artifacts after fatal error");
                }
                Err(error)
            }
        }
    }

    fn run_loop(&mut self) -> Result<(StopReason, u64), PipelineError> {
        let mut frames_read: u64 = 0;

        let stop_reason = loop {
            if self.cancel.is_cancelled() {
                info!(frames_read, "cancellation observed, stopping");
                break StopReason::Cancelled;
            }

            match self.control.poll() {
                Control::Continue => {}
                Control::Quit => {
                    info!(frames_read, "quit requested");
                    break StopReason::Quit;
                }
                Control::TogglePause => match self.wait_while_paused() {
                    PauseOutcome::Resumed => {}
                    PauseOutcome::Quit => break StopReason::Quit,
                    PauseOutcome::Cancelled => break StopReason::Cancelled,
                },
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!(frames_read, "end of stream");
                    break StopReason::EndOfStream;
                }
                Err(e) if frames_read == 0 => {
                    // Failing to read even one frame means the source never
                    // worked; that is fatal, not exhaustion.
                    return Err(PipelineError::Source(e.into()));
                }
                Err(e) => {
                    let error: BoxError = e.into();
                    warn!(frames_read, %error, "read failed mid-stream, treating as end of stream");
                    break StopReason::EndOfStream;
                }
            };

            let frame_index = frames_read;
            frames_read += 1;

            let position = self
                .detector
                .detect(&frame)
                .map_err(|e| PipelineError::Detector(e.into()))?;
            let zone = self.zones.classify(position).to_string();
            let update = self.tracker.update(position, &zone);

            if update.entered {
                debug!(frame_index, zone = %zone, "zone entry");
            }

            self.recorder.record(
                self.tracker.state(),
                &FrameRecord {
                    frame_index,
                    position,
                    zone: &zone,
                    speed: update.speed,
                },
            )?;

            if let Some(sink) = self.sink.as_mut() {
                sink.write(&frame, self.tracker.state(), update.entered)
                    .map_err(PipelineError::Sink)?;
            }
        };

        Ok((stop_reason, frames_read))
    }

    /// Hold frame consumption until the pause is toggled off. No tracker
    /// state mutates while paused; quit and cancellation are still honored.
    fn wait_while_paused(&mut self) -> PauseOutcome {
        debug!("paused");
        loop {
            if self.cancel.is_cancelled() {
                return PauseOutcome::Cancelled;
            }
            match self.control.poll() {
                Control::TogglePause => {
                    debug!("resumed");
                    return PauseOutcome::Resumed;
                }
                Control::Quit => return PauseOutcome::Quit,
                Control::Continue => {}
            }
        }
    }
}

enum PauseOutcome {
    Resumed,
    Quit,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::source::Frame;
    use crate::tracker::Rect;
    use nalgebra::Point2;

    /// Replays a scripted sequence of detections; the frames themselves are
    /// empty since the mock detector ignores pixel data.
    struct ScriptedRun {
        positions: Vec<Option<(f32, f32)>>,
        cursor: usize,
    }

    struct ScriptSource {
        remaining: usize,
        fail_at: Option<usize>,
        read: usize,
    }

    impl FrameSource for ScriptSource {
        type Error = std::io::Error;

        fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
            if self.fail_at == Some(self.read) {
                return Err(std::io::Error::other("decoder hiccup"));
            }
            if self.read == self.remaining {
                return Ok(None);
            }
            self.read += 1;
            Ok(Some(Frame {
                width: 100,
                height: 100,
                data: Vec::new(),
            }))
        }

        fn height(&self) -> u32 {
            100
        }
    }

    impl CentroidSource for ScriptedRun {
        type Error = std::convert::Infallible;

        fn detect(&mut self, _frame: &Frame) -> Result<Option<Point2<f32>>, Self::Error> {
            let pos = self.positions.get(self.cursor).copied().flatten();
            self.cursor += 1;
            Ok(pos.map(|(x, y)| Point2::new(x, y)))
        }
    }

    fn pipeline_for(
        positions: Vec<Option<(f32, f32)>>,
        fail_at: Option<usize>,
    ) -> TrackerPipeline<ScriptSource, ScriptedRun> {
        let source = ScriptSource {
            remaining: positions.len(),
            fail_at,
            read: 0,
        };
        let detector = ScriptedRun {
            positions,
            cursor: 0,
        };
        let zones = ZoneSet::from_rects([Rect::new(0.0, 0.0, 10.0, 10.0)]);
        TrackerPipeline::new(source, detector, zones, StatsRecorder::disabled())
    }

    #[test]
    fn test_scenario_entries_and_dwell() {
        // center -> A (entry), A -> A, A -> center, center -> A (entry).
        let pipeline = pipeline_for(
            vec![
                Some((5.0, 5.0)),
                Some((5.0, 5.0)),
                Some((50.0, 50.0)),
                Some((5.0, 5.0)),
            ],
            None,
        );

        let summary = pipeline.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::EndOfStream);
        assert_eq!(summary.frames_read, 4);
        assert_eq!(summary.state.entry_count["Area 0"], 2);
        assert_eq!(summary.state.dwell_frames["Area 0"], 3);
    }

    #[test]
    fn test_detection_gap_does_not_change_counters() {
        let with_gap = pipeline_for(
            vec![Some((5.0, 5.0)), None, Some((50.0, 50.0)), Some((5.0, 5.0))],
            None,
        )
        .run()
        .unwrap();
        let without_gap = pipeline_for(
            vec![Some((5.0, 5.0)), Some((50.0, 50.0)), Some((5.0, 5.0))],
            None,
        )
        .run()
        .unwrap();

        assert_eq!(with_gap.state.entry_count, without_gap.state.entry_count);
        assert_eq!(with_gap.state.dwell_frames, without_gap.state.dwell_frames);
        assert_eq!(
            with_gap.state.cumulative_distance,
            without_gap.state.cumulative_distance
        );
    }

    #[test]
    fn test_first_read_failure_is_fatal() {
        let result = pipeline_for(vec![Some((5.0, 5.0))], Some(0)).run();
        assert!(matches!(result, Err(PipelineError::Source(_))));
    }

    #[test]
    fn test_mid_stream_read_failure_is_end_of_stream() {
        let summary = pipeline_for(
            vec![Some((5.0, 5.0)), Some((5.0, 5.0)), Some((5.0, 5.0))],
            Some(2),
        )
        .run()
        .unwrap();

        assert_eq!(summary.stop_reason, StopReason::EndOfStream);
        assert_eq!(summary.frames_read, 2);
    }

    #[test]
    fn test_cancellation_stops_before_first_frame() {
        let pipeline = pipeline_for(vec![Some((5.0, 5.0)); 100], None);
        let token = pipeline.cancel_token();
        token.cancel();

        let summary = pipeline.run().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
        assert_eq!(summary.frames_read, 0);
        assert_eq!(summary.state.detected_frames, 0);
    }

    #[test]
    fn test_quit_control_stops_gracefully() {
        struct QuitAfter {
            polls: usize,
        }
        impl ControlSource for QuitAfter {
            fn poll(&mut self) -> Control {
                if self.polls == 0 {
                    Control::Quit
                } else {
                    self.polls -= 1;
                    Control::Continue
                }
            }
        }

        let summary = pipeline_for(vec![Some((5.0, 5.0)); 10], None)
            .with_control(Box::new(QuitAfter { polls: 3 }))
            .run()
            .unwrap();

        assert_eq!(summary.stop_reason, StopReason::Quit);
        assert_eq!(summary.frames_read, 3);
    }

    #[test]
    fn test_pause_consumes_no_frames() {
        // Pause on the second poll, stay paused for a few polls, resume,
        // then run to the end of the stream.
        struct PauseScript {
            script: Vec<Control>,
            cursor: usize,
        }
        impl ControlSource for PauseScript {
            fn poll(&mut self) -> Control {
                let control = self
                    .script
                    .get(self.cursor)
                    .copied()
                    .unwrap_or(Control::Continue);
                self.cursor += 1;
                control
            }
        }

        let summary = pipeline_for(vec![Some((5.0, 5.0)); 4], None)
            .with_control(Box::new(PauseScript {
                script: vec![
                    Control::Continue,
                    Control::TogglePause,
                    Control::Continue,
                    Control::Continue,
                    Control::TogglePause,
                ],
                cursor: 0,
            }))
            .run()
            .unwrap();

        // All four frames still get processed exactly once.
        assert_eq!(summary.frames_read, 4);
        assert_eq!(summary.state.detected_frames, 4);
    }
}
