mod app;
pub use app::{App, AppMsg};

mod comment_item;
pub use comment_item::CommentItem;

mod error_view;
pub use error_view::ErrorView;

mod login;
pub use login::Login;

mod post_box;
pub use post_box::PostBox;
