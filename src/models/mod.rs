pub mod post;

pub use post::{fallback_carousel_title, CarouselResult, DownloadOutcome, OutcomeStatus, PostKind};
