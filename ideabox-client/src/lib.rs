mod discussion;
pub use discussion::Discussion;

mod error;
pub use error::{Error, Redirect};

mod remote;
pub use remote::HttpBackend;

mod reply;
pub use reply::{ReplyBox, ReplyState};

mod session;
pub use session::{MemorySession, Session, SessionStore};

mod store;
pub use store::{own_comment, Backend, CommentStore};

mod thread;
pub use thread::{OrphanPolicy, Thread, ThreadConfig, ThreadNode, DEFAULT_MAX_INDENT};

/// How comment timestamps are shown to users
pub const TIME_FORMAT: &str = "%d %b %Y, %I:%M %p";

pub mod api {
    pub use ideabox_api::*;
}
