use crate::api;

/// Where the screen hosting a discussion must send the user after a failure
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Redirect {
    Login,
    ErrorPage,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Session is missing, invalid or expired
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success answer, or a network failure
    #[error("API Error: {0}")]
    Api(String),
}

impl Error {
    pub fn redirect(&self) -> Redirect {
        match self {
            Error::Unauthorized => Redirect::Login,
            Error::Api(_) => Redirect::ErrorPage,
        }
    }
}

impl From<api::Error> for Error {
    fn from(e: api::Error) -> Error {
        match e {
            api::Error::Unauthorized => Error::Unauthorized,
            e => Error::Api(e.to_string()),
        }
    }
}
