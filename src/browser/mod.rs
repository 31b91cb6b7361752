pub mod headless;
pub mod session;

pub use headless::launch_headless_browser;
pub use session::PageSession;
