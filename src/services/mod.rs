pub mod playback;
pub mod providers;

pub use playback::PlaybackService;
