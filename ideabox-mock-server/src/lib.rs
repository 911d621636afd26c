use std::collections::{BTreeMap, HashMap};

use ideabox_client::api::{
    AuthToken, Comment, CommentId, Error, IdeaId, Me, NewComment, Time,
};

mod backend;
pub use backend::MockBackend;

/// Initial contents of a `MockServer`, as written by `generate-test-data`
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Seed {
    pub users: Vec<String>,
    pub ideas: BTreeMap<IdeaId, Vec<Comment>>,
}

/// In-memory stand-in for the ideas API, authoritative for its comments
pub struct MockServer {
    sessions: HashMap<AuthToken, String>,
    ideas: BTreeMap<IdeaId, Vec<Comment>>,
    next_id: u64,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            sessions: HashMap::new(),
            ideas: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn from_seed(seed: Seed) -> (MockServer, Vec<(String, AuthToken)>) {
        let mut server = MockServer::new();
        for (idea, comments) in seed.ideas {
            server.seed(idea, comments);
        }
        let tokens = seed
            .users
            .into_iter()
            .map(|u| {
                let tok = server.create_session(&u);
                (u, tok)
            })
            .collect();
        (server, tokens)
    }

    /// Sessions are issued by an external auth service in production; here
    /// any user name gets one
    pub fn create_session(&mut self, username: &str) -> AuthToken {
        let tok = AuthToken(uuid::Uuid::new_v4().to_string());
        self.sessions.insert(tok.clone(), String::from(username));
        tok
    }

    pub fn revoke(&mut self, tok: &AuthToken) -> Result<(), Error> {
        self.sessions
            .remove(tok)
            .map(|_| ())
            .ok_or(Error::Unauthorized)
    }

    /// Append comments to an idea as-is, dangling parents included
    pub fn seed(&mut self, idea: IdeaId, comments: Vec<Comment>) {
        for c in comments.iter() {
            // The last id cannot be followed, later posts just never reach it
            if let Some(next) = c.id.0.parse::<u64>().ok().and_then(|id| id.checked_add(1)) {
                self.next_id = self.next_id.max(next);
            }
        }
        self.ideas.entry(idea).or_default().extend(comments);
    }

    /// Return the current number of comments on `idea`
    pub fn test_num_comments(&self, idea: &IdeaId) -> usize {
        self.ideas.get(idea).map(|c| c.len()).unwrap_or(0)
    }

    fn resolve(&self, tok: &AuthToken) -> Result<&str, Error> {
        self.sessions
            .get(tok)
            .map(|u| u as &str)
            .ok_or(Error::Unauthorized)
    }

    pub fn whoami(&self, tok: &AuthToken) -> Result<Me, Error> {
        Ok(Me {
            username: String::from(self.resolve(tok)?),
        })
    }

    pub fn fetch_comments(&self, tok: &AuthToken, idea: &IdeaId) -> Result<Vec<Comment>, Error> {
        self.resolve(tok)?;
        Ok(self.ideas.get(idea).cloned().unwrap_or_default())
    }

    pub fn post_comment(
        &mut self,
        tok: &AuthToken,
        idea: &IdeaId,
        new: NewComment,
        now: Time,
    ) -> Result<Comment, Error> {
        let username = String::from(self.resolve(tok)?);
        new.validate()?;
        let comments = self.ideas.entry(idea.clone()).or_default();
        if let Some(parent) = &new.parent_id {
            if !comments.iter().any(|c| c.id == *parent) {
                return Err(Error::UnknownParent(parent.clone()));
            }
        }
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| Error::Unknown(String::from("no comment id left")))?;
        let created = Comment {
            id: CommentId(id.to_string()),
            comment: new.comment,
            parent_id: new.parent_id,
            username,
            created_at: now,
        };
        comments.push(created.clone());
        tracing::debug!(%idea, id = %created.id, "created comment");
        Ok(created)
    }

    /// Only the author may delete a comment. Replies to it are left in place.
    pub fn delete_comment(&mut self, tok: &AuthToken, id: &CommentId) -> Result<(), Error> {
        let username = String::from(self.resolve(tok)?);
        for comments in self.ideas.values_mut() {
            if let Some(pos) = comments.iter().position(|c| c.id == *id) {
                if comments[pos].username != username {
                    return Err(Error::PermissionDenied);
                }
                comments.remove(pos);
                tracing::debug!(%id, "deleted comment");
                return Ok(());
            }
        }
        Err(Error::NotFound)
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}
