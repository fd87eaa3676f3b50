//! Output artifact locations derived from the input video's base name.

use std::path::{Path, PathBuf};

/// Paths of all output artifacts for one run.
///
/// Names are deterministic: the video's base name plus a fixed suffix per
/// artifact kind, so `maze_trial_3.avi` yields `maze_trial_3_stats.json`,
/// `maze_trial_3_pos.csv`, `maze_trial_3_speed.csv` and
/// `maze_trial_3_result.avi`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    /// Full-snapshot stats file, rewritten every frame
    pub stats: PathBuf,
    /// Append-only position log
    pub position: PathBuf,
    /// Append-only speed log
    pub speed: PathBuf,
    /// Rendered output video with overlays burned in
    pub result_video: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact paths for `video`, placing them under `dir`.
    pub fn for_video(video: &Path, dir: &Path) -> Self {
        let base = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        Self {
            stats: dir.join(format!("{base}_stats.json")),
            position: dir.join(format!("{base}_pos.csv")),
            speed: dir.join(format!("{base}_speed.csv")),
            result_video: dir.join(format!("{base}_result.avi")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_derive_from_base_name() {
        let paths = ArtifactPaths::for_video(Path::new("videos/maze_trial_3.avi"), Path::new("logs"));
        assert_eq!(paths.stats, Path::new("logs/maze_trial_3_stats.json"));
        assert_eq!(paths.position, Path::new("logs/maze_trial_3_pos.csv"));
        assert_eq!(paths.speed, Path::new("logs/maze_trial_3_speed.csv"));
        assert_eq!(paths.result_video, Path::new("logs/maze_trial_3_result.avi"));
    }

    #[test]
    fn test_pathless_video_falls_back() {
        let paths = ArtifactPaths::for_video(Path::new(""), Path::new("."));
        assert_eq!(paths.stats, Path::new("./video_stats.json"));
    }
}
