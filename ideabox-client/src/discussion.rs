use crate::{
    api::{Comment, CommentId, IdeaId},
    own_comment, Backend, CommentStore, Error, ReplyBox, Thread, ThreadConfig,
};

/// Everything a screen needs to show and drive the comments of one idea
pub struct Discussion<B> {
    store: CommentStore<B>,
    reply: ReplyBox,
    username: Option<String>,
    config: ThreadConfig,
}

impl<B: Backend> Discussion<B> {
    pub fn new(backend: B, idea: IdeaId, config: ThreadConfig) -> Discussion<B> {
        Discussion {
            store: CommentStore::new(backend, idea),
            reply: ReplyBox::new(),
            username: None,
            config,
        }
    }

    pub fn with_username(mut self, username: String) -> Discussion<B> {
        self.username = Some(username);
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Ask the backend who we are, so that own comments become deletable
    pub async fn identify(&mut self) -> Result<&str, Error> {
        let me = self.store.backend().whoami().await?;
        Ok(self.username.insert(me.username).as_str())
    }

    pub fn comments(&self) -> &[Comment] {
        self.store.snapshot()
    }

    pub fn reply(&self) -> &ReplyBox {
        &self.reply
    }

    pub fn thread(&self) -> Thread {
        Thread::build(self.store.snapshot(), &self.config)
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        comment.is_authored_by(self.username())
    }

    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.store.fetch().await?;
        Ok(())
    }

    pub async fn post_root(&mut self, text: &str) -> Result<Option<Comment>, Error> {
        self.store.post(None, text).await
    }

    pub fn open_reply(&mut self, id: CommentId) {
        self.reply.open(id)
    }

    pub fn cancel_reply(&mut self) {
        self.reply.cancel()
    }

    pub fn set_reply_text(&mut self, text: String) {
        self.reply.set_text(text)
    }

    /// Post the reply being written. Blank text is a silent no-op that keeps
    /// the reply box open.
    pub async fn submit_reply(&mut self) -> Result<Option<Comment>, Error> {
        let new = match self.reply.pending() {
            Some(new) => new,
            None => return Ok(None),
        };
        let target = new.parent_id.clone();
        let created = self.store.post(new.parent_id, &new.comment).await?;
        if created.is_some() {
            if let Some(target) = target {
                self.reply.submitted(&target);
            }
        }
        Ok(created)
    }

    /// Delete one of our own comments, once `confirm` agreed
    pub async fn delete<F>(&mut self, id: &CommentId, confirm: F) -> Result<bool, Error>
    where
        F: FnOnce(&CommentId) -> bool,
    {
        if own_comment(self.store.snapshot(), id, self.username()).is_none() {
            tracing::warn!(%id, "refusing to delete a comment we did not author");
            return Ok(false);
        }
        self.store.delete(id, confirm).await
    }
}
