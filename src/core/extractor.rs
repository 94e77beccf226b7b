use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::error::{ExtractError, Result};
use crate::core::message::decode_message;
use crate::core::sampler::{compute_grid, Grid};
use crate::core::voter::vote;
use crate::core::watermark::{SlotUpdate, Watermark};
use crate::decoder::frame_data::{FrameSource, Resolution};

/// Something that can report its resolution and then stream its frames.
pub trait VideoSource {
    type Frames: FrameSource;

    /// Human-readable name used in error messages.
    fn describe(&self) -> String;

    /// Resolution of the first video stream, or `None` if there is none.
    fn probe(&self) -> Result<Option<Resolution>>;

    fn open_frames(&self, resolution: Resolution) -> Result<Self::Frames>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub frames_read: u64,
    pub frames_abstained: u64,
    pub slots_filled: u64,
    pub slots_overwritten: u64,
    pub votes_dropped: u64,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub message: Vec<u8>,
    pub watermark: Watermark,
    pub stats: ExtractionStats,
}

/// Drives sampling frame by frame until the watermark is complete or the frames run out.
#[derive(Default)]
pub struct Extractor {
    running: Option<Arc<AtomicBool>>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop reading frames once `running` turns false.
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(true, |r| r.load(Ordering::SeqCst))
    }

    /// Probe, sample and decode. `on_progress` sees the watermark initially and after every accepted vote.
    pub fn run<V: VideoSource>(&self, video: &V, mut on_progress: impl FnMut(&Watermark)) -> Result<Extraction> {
        // 1. Probe
        let resolution = video
            .probe()?
            .ok_or_else(|| ExtractError::InvalidSource(video.describe()))?;

        // 2. Sample
        let grid = compute_grid(resolution);
        let (watermark, stats) = {
            let mut frames = video.open_frames(resolution)?;
            self.accumulate(&mut frames, &grid, resolution.frame_len(), &mut on_progress)?
        };

        info!(
            "Read {} frames ({} abstained), {} slots filled, {} overwritten, {} votes dropped",
            stats.frames_read, stats.frames_abstained, stats.slots_filled, stats.slots_overwritten, stats.votes_dropped
        );

        // 3. Decode
        if !watermark.is_complete() {
            return Err(ExtractError::Incomplete {
                filled: watermark.filled(),
                total: watermark.capacity(),
            });
        }
        let message = decode_message(&watermark)?;
        info!("Decoded {} byte message", message.len());

        Ok(Extraction { message, watermark, stats })
    }

    /// Fill a fresh watermark from `frames`. Never reads past the frame that completes it.
    pub fn accumulate<S: FrameSource + ?Sized>(
        &self,
        frames: &mut S,
        grid: &Grid,
        frame_len: usize,
        on_progress: &mut impl FnMut(&Watermark),
    ) -> Result<(Watermark, ExtractionStats)> {
        let mut watermark = Watermark::new();
        let mut stats = ExtractionStats::default();
        let mut buffer = Vec::with_capacity(frame_len);

        on_progress(&watermark);

        while !watermark.is_complete() {
            if !self.is_running() {
                warn!("Extraction interrupted after {} frames", stats.frames_read);
                break;
            }
            if !frames.read_frame_into(&mut buffer)? {
                debug!("Frame stream ended after {} frames", stats.frames_read);
                break;
            }
            stats.frames_read += 1;

            let Some(v) = vote(&buffer, grid) else {
                stats.frames_abstained += 1;
                continue;
            };

            match watermark.apply(v) {
                SlotUpdate::Filled => {
                    stats.slots_filled += 1;
                    debug!("Frame {}: slot {} = {}", stats.frames_read, v.position, v.payload);
                }
                SlotUpdate::Unchanged => {}
                SlotUpdate::Overwritten { previous } => {
                    stats.slots_overwritten += 1;
                    debug!(
                        "Frame {}: slot {} changed {} -> {}",
                        stats.frames_read, v.position, previous, v.payload
                    );
                }
                SlotUpdate::Dropped => {
                    stats.votes_dropped += 1;
                    debug!("Frame {}: dropped vote for slot {}", stats.frames_read, v.position);
                    continue;
                }
            }
            on_progress(&watermark);
        }

        Ok((watermark, stats))
    }
}
