use std::path::Path;
use std::process::Command;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::core::error::{ExtractError, Result};
use crate::decoder::frame_data::Resolution;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Resolution of the first video stream in ffprobe's JSON report.
pub fn parse_probe_output(json: &str) -> Result<Option<Resolution>> {
    let output: ProbeOutput =
        serde_json::from_str(json).map_err(|e| ExtractError::Probe(format!("unreadable ffprobe output: {}", e)))?;

    let Some(streams) = output.streams else {
        return Ok(None);
    };

    let resolution = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|s| Resolution::new(s.width?, s.height?));
    Ok(resolution)
}

/// Run ffprobe on a file and report the resolution of its first video stream.
pub fn probe_resolution(ffprobe: &Path, video: &Path) -> Result<Option<Resolution>> {
    debug!("Probing {} with {}", video.display(), ffprobe.display());

    let output = Command::new(ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
        .arg(video)
        .output()
        .map_err(|e| ExtractError::Probe(format!("failed to run {}: {}", ffprobe.display(), e)))?;

    if !output.status.success() {
        // ffprobe still prints an empty report for unreadable files
        warn!("ffprobe exited with {}", output.status);
    }

    let resolution = parse_probe_output(&String::from_utf8_lossy(&output.stdout))?;
    match resolution {
        Some(r) => info!("Video stream: {}x{}", r.width(), r.height()),
        None => info!("No video stream in {}", video.display()),
    }
    Ok(resolution)
}
