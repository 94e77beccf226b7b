pub mod display;
pub mod progress;

pub use display::DisplayManager;
pub use progress::{render_progress, render_success};
