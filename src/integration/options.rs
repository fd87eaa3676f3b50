//! Command surface for an embedding binary.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::recorder::{ArtifactPaths, RecorderConfig};

/// Run options for a tracking session.
///
/// This is the crate's command surface: an embedding binary can parse it
/// straight from the command line, or construct it programmatically.
#[derive(Parser, Debug, Clone)]
#[command(name = "mazetrack", about = "Tracks a single subject through user-defined zones.")]
pub struct RunOptions {
    /// Path to the video file to be processed
    pub video: PathBuf,

    /// Frame rate of the video file to be processed
    #[arg(value_parser = parse_frame_rate)]
    pub frame_rate: f32,

    /// Select regions of interest interactively instead of loading the
    /// companion definitions file
    #[arg(long)]
    pub draw_rois: bool,

    /// Draw both principal axes of the detection
    #[arg(long)]
    pub draw_axis: bool,

    /// Create a video file with the analysis result
    #[arg(long)]
    pub save_video: bool,

    /// Draw a colored mask over the detection
    #[arg(long)]
    pub color_mask: bool,

    /// Log the position of the center of mass to file
    #[arg(long)]
    pub log_position: bool,

    /// Log the statistics of the subject's movement
    #[arg(long)]
    pub log_stats: bool,

    /// Log the speed of the center of mass to file
    #[arg(long)]
    pub log_speed: bool,
}

fn parse_frame_rate(value: &str) -> Result<f32, String> {
    let rate: f32 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("frame rate must be positive, got {rate}"))
    }
}

impl RunOptions {
    /// Directory the logging artifacts land in.
    pub fn logs_dir(&self) -> &Path {
        Path::new("logs")
    }

    /// Output artifact paths derived from the video's base name.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::for_video(&self.video, self.logs_dir())
    }

    /// Companion zone-definitions file: the video path with a `.json`
    /// extension. Consulted when `--draw-rois` is not given; in that mode
    /// its absence is fatal.
    pub fn zone_definitions_path(&self) -> PathBuf {
        self.video.with_extension("json")
    }

    /// Recorder gating derived from the logging flags.
    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            log_stats: self.log_stats,
            log_position: self.log_position,
            log_speed: self.log_speed,
            ..RecorderConfig::default()
        }
    }

    /// Whether any logging artifact is enabled.
    pub fn any_logging_enabled(&self) -> bool {
        self.log_stats || self.log_position || self.log_speed
    }
}
