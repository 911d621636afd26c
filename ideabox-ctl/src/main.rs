use std::{io::Write, sync::Arc};

use anyhow::Context;
use ideabox_client::{
    api::{AuthToken, CommentId, IdeaId},
    Discussion, HttpBackend, MemorySession, OrphanPolicy, Redirect, Session, ThreadConfig,
};

mod render;

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long, env = "IDEABOX_HOST")]
    host: String,

    /// Indentation level past which replies are no longer shifted right
    #[structopt(long, default_value = "4")]
    max_indent: usize,

    /// Also show comments whose parent is gone, as extra root comments
    #[structopt(long)]
    show_orphans: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Show the comment thread of an idea
    Show { idea: String },

    /// Post a new root comment
    Post { idea: String, text: String },

    /// Reply to a comment
    Reply {
        idea: String,
        comment: String,
        text: String,
    },

    /// Delete one of your own comments
    Delete {
        idea: String,
        comment: String,

        /// Do not ask for confirmation
        #[structopt(long)]
        yes: bool,
    },
}

fn session(token: Option<String>, username: Option<String>) -> anyhow::Result<Session> {
    let tok = token.context("retrieving IDEABOX_TOKEN environment variable")?;
    anyhow::ensure!(!tok.trim().is_empty(), "IDEABOX_TOKEN is empty");
    Ok(Session {
        token: AuthToken(tok),
        username: username.filter(|u| !u.trim().is_empty()),
    })
}

fn confirm(id: &CommentId) -> bool {
    print!("Are you sure you want to delete comment #{id}? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn explain(e: ideabox_client::Error) -> anyhow::Error {
    match e.redirect() {
        Redirect::Login => anyhow::anyhow!("session expired or invalid, log in again"),
        Redirect::ErrorPage => anyhow::Error::new(e),
    }
}

async fn run(opt: Opt, session: Session) -> Result<(), ideabox_client::Error> {
    let known_user = session.username.clone();
    let backend = HttpBackend::new(opt.host, Arc::new(MemorySession::new(session)));
    let config = ThreadConfig {
        max_indent: opt.max_indent,
        orphans: match opt.show_orphans {
            true => OrphanPolicy::PromoteToRoot,
            false => OrphanPolicy::Hide,
        },
    };

    let idea = match &opt.cmd {
        Command::Show { idea }
        | Command::Post { idea, .. }
        | Command::Reply { idea, .. }
        | Command::Delete { idea, .. } => IdeaId::from(idea as &str),
    };
    let mut d = Discussion::new(backend, idea, config);
    match known_user {
        Some(user) => d = d.with_username(user),
        None => {
            d.identify().await?;
        }
    }
    d.refresh().await?;

    match opt.cmd {
        Command::Show { .. } => {}
        Command::Post { text, .. } => {
            if d.post_root(&text).await?.is_none() {
                tracing::info!("nothing to post, comment is blank");
            }
        }
        Command::Reply { comment, text, .. } => {
            d.open_reply(CommentId(comment));
            d.set_reply_text(text);
            if d.submit_reply().await?.is_none() {
                tracing::info!("nothing to post, reply is blank");
            }
        }
        Command::Delete { comment, yes, .. } => {
            let id = CommentId(comment);
            let deleted = match yes {
                true => d.delete(&id, |_| true).await?,
                false => d.delete(&id, confirm).await?,
            };
            if !deleted {
                println!("Comment #{id} was not deleted");
            }
        }
    }

    print!("{}", render::render(&d.thread(), d.username()));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let session = session(
        std::env::var("IDEABOX_TOKEN").ok(),
        std::env::var("IDEABOX_USER").ok(),
    )?;
    run(opt, session).await.map_err(explain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_reported_as_such() {
        let err = session(None, None).unwrap_err();
        assert!(format!("{err:#}").contains("IDEABOX_TOKEN"));
        let err = session(Some(String::from("  ")), None).unwrap_err();
        assert_eq!(err.to_string(), "IDEABOX_TOKEN is empty");
    }

    #[test]
    fn token_and_user_make_the_session() {
        let s = session(Some(String::from("tok")), Some(String::from("ann"))).unwrap();
        assert_eq!(s.token, AuthToken(String::from("tok")));
        assert_eq!(s.username.as_deref(), Some("ann"));
        let s = session(Some(String::from("tok")), Some(String::new())).unwrap();
        assert_eq!(s.username, None);
    }
}
