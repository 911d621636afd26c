use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    api::{self, AuthToken, Comment, CommentId, IdeaId, Me, NewComment},
    Backend, Error, SessionStore,
};

/// `Backend` talking to the ideas API over HTTP.
///
/// Every request carries the stored bearer token. Without a token no request
/// is sent at all, and a 401 answer wipes the stored session, so that after
/// one unauthorized answer nothing more reaches the network until the user
/// logs in again.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    host: String,
    session: Arc<dyn SessionStore>,
}

impl HttpBackend {
    pub fn new(host: String, session: Arc<dyn SessionStore>) -> HttpBackend {
        HttpBackend {
            client: reqwest::Client::new(),
            host: String::from(host.trim_end_matches('/')),
            session,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `host` followed by `segments`, each percent-encoded as a single path
    /// segment so that ids cannot reach another endpoint
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, Error> {
        let mut url = reqwest::Url::parse(&self.host)
            .map_err(|e| Error::Api(format!("invalid host {:?}: {e}", self.host)))?;
        url.path_segments_mut()
            .map_err(|()| Error::Api(format!("host {:?} cannot have a path", self.host)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn token(&self) -> Result<AuthToken, Error> {
        match self.session.load() {
            Some(s) => Ok(s.token),
            None => {
                tracing::debug!("no session, refusing to send request");
                Err(Error::Unauthorized)
            }
        }
    }

    async fn send(
        &self,
        what: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let token = self.token()?;
        let resp = req.bearer_auth(&token.0).send().await.map_err(|e| {
            tracing::warn!(?e, what, "request failed");
            Error::Api(format!("{what}: {e}"))
        })?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(what, "server answered unauthorized, clearing session");
                self.session.clear();
                Err(Error::Unauthorized)
            }
            status if status.is_success() => Ok(resp),
            status => {
                let body = resp.bytes().await.ok();
                let msg = body
                    .and_then(|b| api::Error::parse(&b).ok())
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| status.to_string());
                tracing::warn!(what, %status, %msg, "server answered with an error");
                Err(Error::Api(format!("{what}: {msg}")))
            }
        }
    }

    async fn parse<R>(what: &str, resp: reqwest::Response) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        resp.json()
            .await
            .map_err(|e| Error::Api(format!("parsing {what} answer: {e}")))
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn fetch_comments(&self, idea: &IdeaId) -> Result<Vec<Comment>, Error> {
        let req = self.client.get(self.url(&["ideas", &idea.0, "comments"])?);
        let resp = self.send("fetching comments", req).await?;
        Self::parse("fetch comments", resp).await
    }

    async fn post_comment(&self, idea: &IdeaId, comment: &NewComment) -> Result<Comment, Error> {
        let req = self
            .client
            .post(self.url(&["ideas", &idea.0, "comments"])?)
            .json(comment);
        let resp = self.send("posting comment", req).await?;
        Self::parse("post comment", resp).await
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let req = self.client.delete(self.url(&["comments", &id.0])?);
        self.send("deleting comment", req).await?;
        Ok(())
    }

    async fn whoami(&self) -> Result<Me, Error> {
        let req = self.client.get(self.url(&["me"])?);
        let resp = self.send("fetching current user", req).await?;
        Self::parse("whoami", resp).await
    }
}
