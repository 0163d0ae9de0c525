pub mod feed;
pub mod session;
pub mod settings;

pub use feed::{FeedEvent, SessionFeed};
pub use session::GallerySession;
pub use settings::Settings;
