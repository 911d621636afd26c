mod auth;
pub use auth::{AuthToken, Me};

mod comment;
pub use comment::{Comment, CommentId, IdeaId, NewComment};

mod error;
pub use error::Error;

pub type Time = chrono::DateTime<chrono::Utc>;

pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}
