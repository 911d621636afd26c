use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    routing::{delete, get},
    Router,
};
use ideabox_mock_server::{MockServer, Seed};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod error;
mod extractors;
mod handlers;


pub use error::Error;

pub type Shared = Arc<Mutex<MockServer>>;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(short, long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// JSON seed file, as written by generate-test-data
    #[structopt(long)]
    seed: Option<PathBuf>,

    /// Open a session for this user name (can be repeated)
    #[structopt(long = "user")]
    users: Vec<String>,
}

pub fn app(server: Shared) -> Router {
    Router::new()
        .route("/me", get(handlers::whoami))
        .route(
            "/ideas/:idea/comments",
            get(handlers::fetch_comments).post(handlers::post_comment),
        )
        .route("/comments/:id", delete(handlers::delete_comment))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

fn load_seed(path: &Path) -> anyhow::Result<Seed> {
    let data = std::fs::read(path).with_context(|| format!("reading seed file {:?}", path))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing seed file {:?}", path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    let mut seed = match &opt.seed {
        Some(path) => load_seed(path)?,
        None => Seed::default(),
    };
    seed.users.extend(opt.users);
    let (server, tokens) = MockServer::from_seed(seed);
    for (user, tok) in tokens {
        tracing::info!(%user, token = %tok.0, "opened session");
    }

    let app = app(Arc::new(Mutex::new(server)));

    tracing::info!("listening on {}", opt.listen);
    axum::Server::bind(&opt.listen)
        .serve(app.into_make_service())
        .await
        .context("serving axum webserver")
}
