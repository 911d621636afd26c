use async_trait::async_trait;

use crate::{
    api::{Comment, CommentId, IdeaId, Me, NewComment},
    Error,
};

/// The comment endpoints of the ideas API.
///
/// Implementations only classify failures, they never redirect anywhere.
// futures are not Send on wasm
#[async_trait(?Send)]
pub trait Backend {
    async fn fetch_comments(&self, idea: &IdeaId) -> Result<Vec<Comment>, Error>;
    async fn post_comment(&self, idea: &IdeaId, comment: &NewComment) -> Result<Comment, Error>;
    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error>;
    async fn whoami(&self) -> Result<Me, Error>;
}

/// The comment `id` among `comments`, if `username` may delete it
pub fn own_comment<'a>(
    comments: &'a [Comment],
    id: &CommentId,
    username: Option<&str>,
) -> Option<&'a Comment> {
    comments
        .iter()
        .find(|c| c.id == *id && c.is_authored_by(username))
}

/// Comments of one idea, as of the last successful fetch
pub struct CommentStore<B> {
    backend: B,
    idea: IdeaId,
    snapshot: Vec<Comment>,
}

impl<B: Backend> CommentStore<B> {
    pub fn new(backend: B, idea: IdeaId) -> CommentStore<B> {
        CommentStore {
            backend,
            idea,
            snapshot: Vec::new(),
        }
    }

    pub fn idea(&self) -> &IdeaId {
        &self.idea
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> &[Comment] {
        &self.snapshot
    }

    /// Replace the snapshot with a fresh read; on failure the previous
    /// snapshot is kept untouched
    pub async fn fetch(&mut self) -> Result<&[Comment], Error> {
        let comments = self.backend.fetch_comments(&self.idea).await?;
        tracing::debug!(idea = %self.idea, num_comments = comments.len(), "fetched comments");
        self.snapshot = comments;
        Ok(&self.snapshot)
    }

    /// Post a comment then re-read the whole thread.
    ///
    /// Blank text is refused before any network call, returning `Ok(None)`.
    pub async fn post(
        &mut self,
        parent: Option<CommentId>,
        text: &str,
    ) -> Result<Option<Comment>, Error> {
        let new = NewComment::new(parent, String::from(text));
        if new.is_blank() {
            tracing::debug!(idea = %self.idea, "not posting blank comment");
            return Ok(None);
        }
        let created = self.backend.post_comment(&self.idea, &new).await?;
        self.fetch().await?;
        Ok(Some(created))
    }

    /// Delete a comment once `confirm` agreed, then re-read the whole thread.
    ///
    /// Returns whether the deletion was actually requested.
    pub async fn delete<F>(&mut self, id: &CommentId, confirm: F) -> Result<bool, Error>
    where
        F: FnOnce(&CommentId) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }
        self.backend.delete_comment(id).await?;
        self.fetch().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn comment(id: &str, username: &str) -> Comment {
        Comment {
            id: CommentId::from(id),
            comment: String::from("text"),
            parent_id: None,
            username: String::from(username),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn own_comment_needs_a_known_author() {
        let comments = [comment("1", "ann"), comment("2", "bob")];
        let one = CommentId::from("1");
        assert_eq!(own_comment(&comments, &one, Some("ann")), Some(&comments[0]));
        assert_eq!(own_comment(&comments, &one, Some("bob")), None);
        assert_eq!(own_comment(&comments, &one, None), None);
        assert_eq!(own_comment(&comments, &CommentId::from("3"), Some("ann")), None);
    }
}
