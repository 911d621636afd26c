use std::sync::Arc;

use async_trait::async_trait;
use ideabox_client::{
    api::{self, AuthToken, Comment, CommentId, IdeaId, Me, NewComment},
    Backend, Error, SessionStore,
};
use tokio::sync::Mutex;

use crate::MockServer;

/// `Backend` calling straight into a shared `MockServer`, with the same
/// session handling as the HTTP backend
#[derive(Clone)]
pub struct MockBackend {
    server: Arc<Mutex<MockServer>>,
    session: Arc<dyn SessionStore>,
}

impl MockBackend {
    pub fn new(server: Arc<Mutex<MockServer>>, session: Arc<dyn SessionStore>) -> MockBackend {
        MockBackend { server, session }
    }

    fn token(&self) -> Result<AuthToken, Error> {
        self.session.load().map(|s| s.token).ok_or(Error::Unauthorized)
    }

    fn answer<T>(&self, res: Result<T, api::Error>) -> Result<T, Error> {
        res.map_err(|e| {
            if e == api::Error::Unauthorized {
                self.session.clear();
            }
            Error::from(e)
        })
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn fetch_comments(&self, idea: &IdeaId) -> Result<Vec<Comment>, Error> {
        let tok = self.token()?;
        let res = self.server.lock().await.fetch_comments(&tok, idea);
        self.answer(res)
    }

    async fn post_comment(&self, idea: &IdeaId, comment: &NewComment) -> Result<Comment, Error> {
        let tok = self.token()?;
        let res = self.server.lock().await.post_comment(
            &tok,
            idea,
            comment.clone(),
            chrono::Utc::now(),
        );
        self.answer(res)
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let tok = self.token()?;
        let res = self.server.lock().await.delete_comment(&tok, id);
        self.answer(res)
    }

    async fn whoami(&self) -> Result<Me, Error> {
        let tok = self.token()?;
        let res = self.server.lock().await.whoami(&tok);
        self.answer(res)
    }
}

#[cfg(test)]
mod tests {
    use ideabox_client::{
        Discussion, MemorySession, OrphanPolicy, Redirect, Session, ThreadConfig,
    };

    use super::*;

    fn setup(user: &str) -> (Arc<Mutex<MockServer>>, MemorySession, MockBackend) {
        let mut server = MockServer::new();
        let token = server.create_session(user);
        let server = Arc::new(Mutex::new(server));
        let session = MemorySession::new(Session {
            token,
            username: None,
        });
        let backend = MockBackend::new(server.clone(), Arc::new(session.clone()));
        (server, session, backend)
    }

    #[tokio::test]
    async fn hello_lands_in_the_root_set() {
        let (_server, _session, backend) = setup("ann");
        let mut d = Discussion::new(backend, IdeaId::from("7"), ThreadConfig::default());
        d.refresh().await.unwrap();
        assert!(d.thread().is_empty());
        d.post_root("hello").await.unwrap();
        let thread = d.thread();
        assert_eq!(thread.roots().len(), 1);
        assert_eq!(thread.roots()[0].comment.comment, "hello");
        assert_eq!(thread.roots()[0].comment.username, "ann");
    }

    #[tokio::test]
    async fn unauthorized_clears_the_session() {
        let (server, session, backend) = setup("ann");
        let token = session.load().unwrap().token;
        server.lock().await.revoke(&token).unwrap();

        let mut d = Discussion::new(backend, IdeaId::from("7"), ThreadConfig::default());
        let err = d.refresh().await.unwrap_err();
        assert_eq!(err, Error::Unauthorized);
        assert_eq!(err.redirect(), Redirect::Login);
        assert_eq!(session.load(), None);

        // nothing reaches the server anymore
        assert_eq!(d.post_root("hello").await, Err(Error::Unauthorized));
        assert_eq!(server.lock().await.test_num_comments(&IdeaId::from("7")), 0);
    }

    #[tokio::test]
    async fn deleted_parent_leaves_orphans() {
        let (server, session, backend) = setup("ann");
        let bob = server.lock().await.create_session("bob");
        let bob_backend = MockBackend::new(
            server.clone(),
            Arc::new(MemorySession::new(Session {
                token: bob,
                username: None,
            })),
        );

        let mut ann = Discussion::new(backend, IdeaId::from("7"), ThreadConfig::default());
        ann.identify().await.unwrap();
        let root = ann.post_root("root").await.unwrap().unwrap();

        let mut bob = Discussion::new(
            bob_backend,
            IdeaId::from("7"),
            ThreadConfig {
                orphans: OrphanPolicy::PromoteToRoot,
                ..ThreadConfig::default()
            },
        );
        bob.refresh().await.unwrap();
        bob.open_reply(root.id.clone());
        bob.set_reply_text(String::from("reply"));
        bob.submit_reply().await.unwrap().unwrap();
        assert!(!bob.can_delete(&root));

        ann.refresh().await.unwrap();
        assert!(ann.delete(&root.id, |_| true).await.unwrap());
        assert!(session.load().is_some());
        assert!(ann.thread().is_empty());
        assert_eq!(ann.thread().orphans().len(), 1);

        bob.refresh().await.unwrap();
        let thread = bob.thread();
        assert_eq!(thread.roots().len(), 1);
        assert_eq!(thread.roots()[0].comment.comment, "reply");
    }

    #[tokio::test]
    async fn backend_errors_go_to_the_error_page() {
        let (_server, _session, backend) = setup("ann");
        let err = backend
            .post_comment(
                &IdeaId::from("7"),
                &NewComment::new(Some(CommentId::from("nope")), String::from("hi")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.redirect(), Redirect::ErrorPage);
    }
}
