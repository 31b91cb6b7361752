pub mod batch;

pub use batch::{App, BatchReport, OutputLayout};
