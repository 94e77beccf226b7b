use std::path::PathBuf;

/// Number of slots in a watermark.
pub const WATERMARK_LENGTH: usize = 32;

/// Side length of the square block sampled per grid.
pub const GRID_DIMENSION: usize = 3;

/// Number of cells sampled per grid.
pub const GRID_CELLS: usize = GRID_DIMENSION * GRID_DIMENSION;

/// Bytes per pixel in an rgb24 frame.
pub const BYTES_PER_PIXEL: usize = 3;

/// Codes are reduced modulo this value (6 bits).
pub const CODE_MODULUS: u32 = 64;

/// A sample is trusted only when its variance is strictly below this.
pub const CONFIDENCE_THRESHOLD: f64 = 3.0;

/// Frame edge a grid is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Starts at row 0 and walks downward.
    Top,
    /// Starts at the last row and walks upward.
    Bottom,
}

/// Where the two sampling grids sit inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub position_anchor: Anchor,
    pub payload_anchor: Anchor,
}

impl GridLayout {
    /// Layout written by the embedding player: slot index at the top, value at the bottom.
    pub const STANDARD: GridLayout = GridLayout {
        position_anchor: Anchor::Top,
        payload_anchor: Anchor::Bottom,
    };
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

pub const FFMPEG_ENV: &str = "WMDECODE_FFMPEG";
pub const FFPROBE_ENV: &str = "WMDECODE_FFPROBE";

/// Runtime settings for a decode run, assembled from CLI arguments and the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub quiet: bool,
}

impl Settings {
    pub fn new(ffmpeg: Option<PathBuf>, ffprobe: Option<PathBuf>, quiet: bool) -> Self {
        Self {
            ffmpeg_path: ffmpeg.or_else(|| env_path(FFMPEG_ENV)),
            ffprobe_path: ffprobe.or_else(|| env_path(FFPROBE_ENV)),
            quiet,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(None, None, false)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cells() {
        assert_eq!(GRID_CELLS, 9);
    }

    #[test]
    fn test_explicit_paths_win() {
        let settings = Settings::new(Some(PathBuf::from("/opt/ffmpeg")), Some(PathBuf::from("/opt/ffprobe")), true);
        assert_eq!(settings.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(settings.ffprobe_path, Some(PathBuf::from("/opt/ffprobe")));
        assert!(settings.quiet);
    }

    #[test]
    fn test_standard_layout() {
        let layout = GridLayout::default();
        assert_eq!(layout.position_anchor, Anchor::Top);
        assert_eq!(layout.payload_anchor, Anchor::Bottom);
    }
}
