use axum::{
    extract::{Path, State},
    Json,
};
use ideabox_api::{Comment, CommentId, IdeaId, Me, NewComment};

use crate::{extractors::*, Error, Shared};

pub async fn whoami(Bearer(tok): Bearer, State(server): State<Shared>) -> Result<Json<Me>, Error> {
    Ok(Json(server.lock().await.whoami(&tok)?))
}

pub async fn fetch_comments(
    Bearer(tok): Bearer,
    State(server): State<Shared>,
    Path(idea): Path<String>,
) -> Result<Json<Vec<Comment>>, Error> {
    Ok(Json(
        server
            .lock()
            .await
            .fetch_comments(&tok, &IdeaId(idea))?,
    ))
}

pub async fn post_comment(
    Bearer(tok): Bearer,
    State(server): State<Shared>,
    Path(idea): Path<String>,
    Json(new): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    Ok(Json(server.lock().await.post_comment(
        &tok,
        &IdeaId(idea),
        new,
        chrono::Utc::now(),
    )?))
}

pub async fn delete_comment(
    Bearer(tok): Bearer,
    State(server): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    server
        .lock()
        .await
        .delete_comment(&tok, &CommentId(id))?;
    Ok(Json(serde_json::json!({ "message": "comment deleted" })))
}
