use ideabox_api::Error as ApiError;

/// Failure answered to the client, with the status code of the wire error
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] pub ApiError);

impl Error {
    pub fn unauthorized() -> Error {
        Error(ApiError::Unauthorized)
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let Error(err) = self;
        match err.status_code().is_server_error() {
            true => tracing::error!("returning internal error to client: {err}"),
            false => tracing::info!("returning error to client: {err}"),
        }
        (err.status_code(), err.contents()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http, response::IntoResponse};

    use super::*;

    #[tokio::test]
    async fn responses_carry_the_wire_error() {
        let resp = Error::from(ApiError::Unknown(String::from("boom"))).into_response();
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(
            ApiError::parse(&body).unwrap(),
            ApiError::Unknown(String::from("boom"))
        );

        let resp = Error::unauthorized().into_response();
        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
    }
}
