use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "webm"];

/// What the user picked in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSelection {
    pub video: PathBuf,
    pub output: PathBuf,
}

pub fn is_video_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Video files directly inside `dir`, sorted by name.
pub fn list_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut videos: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_video_file(path))
        .collect();
    videos.sort();
    Ok(videos)
}

/// Default output next to the video: `clip.mp4` -> `clip.txt`.
pub fn default_output(video: &Path) -> PathBuf {
    video.with_extension("txt")
}

/// Ask for a video in `dir` and an output path. `None` when there is nothing to pick.
pub fn run_menu(dir: &Path) -> Result<Option<MenuSelection>> {
    // 1. Scan for video files
    let videos = list_videos(dir)?;
    if videos.is_empty() {
        eprintln!("No video files found in {}", dir.display());
        return Ok(None);
    }

    // 2. Select video
    let names: Vec<String> = videos
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select the video to decode")
        .default(0)
        .items(&names)
        .interact()?;
    let video = videos[selection].clone();

    // 3. Output path
    let output: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Write the message to")
        .default(default_output(&video).to_string_lossy().to_string())
        .interact_text()?;

    Ok(Some(MenuSelection {
        video,
        output: PathBuf::from(output),
    }))
}
