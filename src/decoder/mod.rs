pub mod frame_data;
pub mod probe;
pub mod video;

pub use frame_data::{FrameSource, ReaderFrameSource, Resolution};
pub use video::FfmpegVideo;
