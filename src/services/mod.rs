pub mod audio_fallback;
pub mod carousel;
pub mod run_log;
pub mod video;

pub use audio_fallback::{AudioFallbackResolver, AUDIO_FILENAME};
pub use carousel::CarouselResolver;
pub use run_log::RunLog;
pub use video::VideoDownloader;
