//! Artifact sinks: atomic stats snapshot rewrite and append-only CSV logs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use nalgebra::Point2;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::recorder::artifacts::ArtifactPaths;
use crate::recorder::snapshot::StatsSnapshot;
use crate::tracker::{CENTER_LABEL, TrackState};

/// Per-artifact enable flags and recording thresholds.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Rewrite the full stats snapshot every frame
    pub log_stats: bool,
    /// Append zone/position rows for frames inside a defined zone
    pub log_position: bool,
    /// Append time/speed rows for frames clear of the origin
    pub log_speed: bool,
    /// Both coordinates must exceed this for a speed-log row. Readings that
    /// hug the origin are background-subtraction noise, not the subject.
    pub min_valid_coord: f32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            log_stats: false,
            log_position: false,
            log_speed: false,
            min_valid_coord: 50.0,
        }
    }
}

/// Error type for artifact persistence failures.
///
/// Write failures are never swallowed: a failing artifact terminates the
/// run rather than silently accepting partial state.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to replace stats snapshot {}: {source}", path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
    #[error("failed to serialize stats snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything the recorder needs to know about one processed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRecord<'a> {
    /// Zero-based index of the frame within the stream
    pub frame_index: u64,
    /// Candidate position, `None` when the frame had no detection
    pub position: Option<Point2<f32>>,
    /// Zone classification of the position
    pub zone: &'a str,
    /// Distance from the previous position, `None` without a detection
    pub speed: Option<f32>,
}

/// Serializes tracker state to the enabled output artifacts.
///
/// The stats artifact is a full-file rewrite per frame with latest-state
/// semantics: written to a temp file and atomically renamed into place, so
/// an external viewer never observes a truncated snapshot. The position and
/// speed logs are plain append-only CSV.
pub struct StatsRecorder {
    config: RecorderConfig,
    frame_rate: f32,
    frame_height: f32,
    stats_path: PathBuf,
    position_path: PathBuf,
    speed_path: PathBuf,
    position_log: Option<File>,
    speed_log: Option<File>,
}

impl StatsRecorder {
    /// Open the enabled artifacts, writing CSV headers up front.
    ///
    /// `frame_rate` converts frames to seconds; `frame_height` flips logged
    /// y-coordinates into a bottom-left-origin system for plotting.
    pub fn new(
        config: RecorderConfig,
        paths: &ArtifactPaths,
        frame_rate: f32,
        frame_height: u32,
    ) -> Result<Self, RecorderError> {
        if config.log_stats {
            ensure_parent(&paths.stats)?;
            // Truncate any stale snapshot from a previous run.
            File::create(&paths.stats).map_err(io_err(&paths.stats))?;
        }

        let position_log = if config.log_position {
            ensure_parent(&paths.position)?;
            let mut file = File::create(&paths.position).map_err(io_err(&paths.position))?;
            writeln!(file, "region,x,y").map_err(io_err(&paths.position))?;
            Some(file)
        } else {
            None
        };

        let speed_log = if config.log_speed {
            ensure_parent(&paths.speed)?;
            let mut file = File::create(&paths.speed).map_err(io_err(&paths.speed))?;
            writeln!(file, "time,speed").map_err(io_err(&paths.speed))?;
            Some(file)
        } else {
            None
        };

        Ok(Self {
            config,
            frame_rate,
            frame_height: frame_height as f32,
            stats_path: paths.stats.clone(),
            position_path: paths.position.clone(),
            speed_path: paths.speed.clone(),
            position_log,
            speed_log,
        })
    }

    /// A recorder with every artifact disabled.
    pub fn disabled() -> Self {
        Self {
            config: RecorderConfig::default(),
            frame_rate: 1.0,
            frame_height: 0.0,
            stats_path: PathBuf::new(),
            position_path: PathBuf::new(),
            speed_path: PathBuf::new(),
            position_log: None,
            speed_log: None,
        }
    }

    /// Persist whatever the enabled artifacts call for on this frame.
    pub fn record(&mut self, state: &TrackState, record: &FrameRecord) -> Result<(), RecorderError> {
        if self.config.log_stats {
            self.write_snapshot(&StatsSnapshot::from_state(state, self.frame_rate))?;
        }

        if let (Some(file), Some(position)) = (self.position_log.as_mut(), record.position) {
            if record.zone != CENTER_LABEL {
                // Bottom-left-origin y for downstream plotting.
                writeln!(
                    file,
                    "{},{},{}",
                    record.zone,
                    position.x,
                    self.frame_height - position.y
                )
                .map_err(io_err(&self.position_path))?;
            }
        }

        if let (Some(file), Some(position), Some(speed)) =
            (self.speed_log.as_mut(), record.position, record.speed)
        {
            let floor = self.config.min_valid_coord;
            if position.x > floor && position.y > floor {
                let timestamp = record.frame_index as f64 / f64::from(self.frame_rate);
                writeln!(file, "{timestamp:.3},{speed:.3}").map_err(io_err(&self.speed_path))?;
            }
        }

        Ok(())
    }

    /// Flush and close all open artifacts.
    pub fn finish(&mut self) -> Result<(), RecorderError> {
        if let Some(mut file) = self.position_log.take() {
            file.flush().map_err(io_err(&self.position_path))?;
        }
        if let Some(mut file) = self.speed_log.take() {
            file.flush().map_err(io_err(&self.speed_path))?;
        }
        debug!("recording artifacts closed");
        Ok(())
    }

    /// Path of the stats artifact.
    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    fn write_snapshot(&self, snapshot: &StatsSnapshot) -> Result<(), RecorderError> {
        let dir = self.stats_path.parent().unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(io_err(&self.stats_path))?;
        serde_json::to_writer_pretty(&tmp, snapshot)?;
        tmp.persist(&self.stats_path)
            .map_err(|source| RecorderError::Replace {
                path: self.stats_path.clone(),
                source,
            })?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<(), RecorderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err(path))?;
        }
    }
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> RecorderError + '_ {
    move |source| RecorderError::Io {
        path: path.to_path_buf(),
        source,
    }
}
