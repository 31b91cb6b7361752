pub mod fetcher;
pub mod ytdlp;

pub use fetcher::MediaFetcher;
pub use ytdlp::{MediaExtractor, MediaMetadata};
