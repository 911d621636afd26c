use crate::api::{CommentId, NewComment};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ReplyState {
    #[default]
    Idle,
    Replying(CommentId),
}

/// The single reply input of a thread.
///
/// At most one comment of the whole thread accepts a reply at any time;
/// opening the box on another comment moves it there and drops the text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReplyBox {
    state: ReplyState,
    text: String,
}

impl ReplyBox {
    pub fn new() -> ReplyBox {
        ReplyBox::default()
    }

    pub fn state(&self) -> &ReplyState {
        &self.state
    }

    pub fn target(&self) -> Option<&CommentId> {
        match &self.state {
            ReplyState::Idle => None,
            ReplyState::Replying(id) => Some(id),
        }
    }

    pub fn is_replying_to(&self, id: &CommentId) -> bool {
        self.target() == Some(id)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn open(&mut self, id: CommentId) {
        self.text.clear();
        self.state = ReplyState::Replying(id);
    }

    pub fn cancel(&mut self) {
        self.text.clear();
        self.state = ReplyState::Idle;
    }

    pub fn set_text(&mut self, text: String) {
        match self.state {
            ReplyState::Idle => tracing::debug!("ignoring reply text typed with no open reply box"),
            ReplyState::Replying(_) => self.text = text,
        }
    }

    /// The comment to post for the current reply, blank text included: the
    /// caller's post operation is the one rejecting blank text
    pub fn submission(&self) -> Option<NewComment> {
        self.target()
            .map(|id| NewComment::new(Some(id.clone()), self.text.clone()))
    }

    /// The reply worth sending: `submission` minus blank text, which leaves
    /// the box open with nothing sent
    pub fn pending(&self) -> Option<NewComment> {
        self.submission().filter(|new| !new.is_blank())
    }

    /// Close the box after the reply to `id` was created, unless it has been
    /// moved to another comment while the request was in flight
    pub fn submitted(&mut self, id: &CommentId) {
        if self.is_replying_to(id) {
            self.cancel();
        }
    }
}
