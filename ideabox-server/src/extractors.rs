use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};
use ideabox_api::AuthToken;

use crate::Error;

/// Bearer token of the request, not yet checked against the open sessions
pub struct Bearer(pub AuthToken);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for Bearer {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Bearer, Error> {
        match req.headers.get(http::header::AUTHORIZATION) {
            None => Err(Error::unauthorized()),
            Some(auth) => {
                let auth = auth.to_str().map_err(|_| Error::unauthorized())?;
                let mut auth = auth.split(' ');
                if !auth
                    .next()
                    .ok_or(Error::unauthorized())?
                    .eq_ignore_ascii_case("bearer")
                {
                    return Err(Error::unauthorized());
                }
                let token = auth.next().ok_or(Error::unauthorized())?;
                if token.is_empty() || auth.next().is_some() {
                    return Err(Error::unauthorized());
                }
                Ok(Bearer(AuthToken(String::from(token))))
            }
        }
    }
}
