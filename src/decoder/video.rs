use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::ChildStdout;
use std::thread::{self, JoinHandle};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info, warn};

use super::frame_data::{FrameSource, ReaderFrameSource, Resolution};
use super::probe::probe_resolution;
use crate::config::Settings;
use crate::core::error::Result;
use crate::core::extractor::VideoSource;

/// A video file decoded by an external ffmpeg process.
pub struct FfmpegVideo {
    path: PathBuf,
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
}

impl FfmpegVideo {
    pub fn new(path: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            path: path.into(),
            ffmpeg: settings.ffmpeg_path.clone(),
            ffprobe: settings.ffprobe_path.clone(),
        }
    }

    fn ffprobe_path(&self) -> PathBuf {
        self.ffprobe
            .clone()
            .unwrap_or_else(ffmpeg_sidecar::ffprobe::ffprobe_path)
    }
}

impl VideoSource for FfmpegVideo {
    type Frames = FfmpegFrames;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn probe(&self) -> Result<Option<Resolution>> {
        probe_resolution(&self.ffprobe_path(), &self.path)
    }

    fn open_frames(&self, resolution: Resolution) -> Result<FfmpegFrames> {
        let mut command = match &self.ffmpeg {
            Some(bin) => FfmpegCommand::new_with_path(bin),
            None => FfmpegCommand::new(),
        };

        command.hide_banner();
        command.input(&self.path);
        // raw rgb24, top row first, one frame after another
        command.args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24"]);
        command.output("-");

        info!("Starting ffmpeg decoder for {}", self.path.display());
        let mut child = command.spawn()?;

        let stdout = child.take_stdout().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "ffmpeg stdout not available")
        })?;

        // ffmpeg stalls once its stderr pipe fills, so keep draining it
        let stderr_handle = child.take_stderr().map(|stderr| {
            thread::spawn(move || {
                let reader = BufReader::new(stderr);
                for line in reader.lines().map_while(|l| l.ok()) {
                    if is_error_line(&line) {
                        warn!("[ffmpeg] {}", line);
                    } else {
                        debug!("[ffmpeg] {}", line);
                    }
                }
            })
        });

        Ok(FfmpegFrames {
            child,
            frames: ReaderFrameSource::new(stdout, resolution),
            stderr_handle,
        })
    }
}

/// ffmpeg reports failures as "Error ..." or "... error ...", in any case.
pub fn is_error_line(line: &str) -> bool {
    line.to_ascii_lowercase().contains("error")
}

/// Frames streamed from a running ffmpeg child. Dropping it stops the child.
pub struct FfmpegFrames {
    child: FfmpegChild,
    frames: ReaderFrameSource<ChildStdout>,
    stderr_handle: Option<JoinHandle<()>>,
}

impl FrameSource for FfmpegFrames {
    fn read_frame_into(&mut self, buffer: &mut Vec<u8>) -> std::io::Result<bool> {
        self.frames.read_frame_into(buffer)
    }
}

impl Drop for FfmpegFrames {
    fn drop(&mut self) {
        // the watermark may be complete long before the video ends
        let _ = self.child.kill();
        match self.child.wait() {
            Ok(status) => debug!("ffmpeg exited with {}", status),
            Err(e) => warn!("Failed to reap ffmpeg: {}", e),
        }
        if let Some(handle) = self.stderr_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_error_line() {
        assert!(is_error_line("Error opening input file clip.mp4."));
        assert!(is_error_line("[h264 @ 0x55] decode_slice_header ERROR"));
        assert!(is_error_line("Conversion failed! error while decoding"));
        assert!(!is_error_line("Stream mapping:"));
        assert!(!is_error_line("frame=  120 fps= 60 q=-0.0 size=N/A"));
    }
}
