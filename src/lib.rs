pub mod config;
pub mod core;
pub mod decoder;
pub mod logging;
pub mod renderer;
pub mod ui;

pub use crate::core::error::{ExtractError, Result};
pub use crate::core::extractor::{Extraction, ExtractionStats, Extractor, VideoSource};
pub use crate::core::watermark::Watermark;
pub use crate::decoder::frame_data::{FrameSource, Resolution};
