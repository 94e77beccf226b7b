pub mod alphabet;
pub mod embedder;
pub mod error;
pub mod extractor;
pub mod message;
pub mod sampler;
pub mod voter;
pub mod watermark;
