use anyhow::Context;
use chrono::{Duration, TimeZone};
use ideabox_api::{Comment, CommentId, IdeaId};
use ideabox_mock_server::Seed;
use rand::{seq::SliceRandom, Rng};

const NUM_USERS: usize = 4;
const NUM_IDEAS: usize = 5;
const MAX_COMMENTS_PER_IDEA: usize = 40;
const COMMENT_WORD_COUNT: usize = 20;

/// Odds that a new comment replies to an earlier one instead of being a root
const REPLY_PROBABILITY: f64 = 0.6;

/// Odds that a comment gets "deleted", leaving its replies dangling
const DELETE_PROBABILITY: f64 = 0.05;

fn gen_username() -> String {
    lipsum::lipsum_words(1)
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase()
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let mut users = Vec::new();
    while users.len() < NUM_USERS {
        let u = gen_username();
        if !u.is_empty() && !users.contains(&u) {
            users.push(u);
        }
    }

    let mut next_id = 1u64;
    let mut seed = Seed {
        users: users.clone(),
        ..Seed::default()
    };
    for idea in 1..=NUM_IDEAS {
        let mut date = chrono::Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .context("building base date")?;
        let mut ids = Vec::<CommentId>::new();
        let mut comments = Vec::new();
        for _ in 0..rng.gen_range(0..=MAX_COMMENTS_PER_IDEA) {
            let id = CommentId(next_id.to_string());
            next_id += 1;
            date = date + Duration::minutes(rng.gen_range(1..600));
            let parent_id = match rng.gen_bool(REPLY_PROBABILITY) {
                true => ids.choose(&mut rng).cloned(),
                false => None,
            };
            ids.push(id.clone());
            if rng.gen_bool(DELETE_PROBABILITY) {
                continue;
            }
            comments.push(Comment {
                id,
                comment: lipsum::lipsum_words(rng.gen_range(1..=COMMENT_WORD_COUNT)),
                parent_id,
                username: users.choose(&mut rng).cloned().unwrap_or_default(),
                created_at: date,
            });
        }
        seed.ideas.insert(IdeaId(idea.to_string()), comments);
    }

    let out = serde_json::to_string_pretty(&seed).context("serializing seed")?;
    println!("{out}");
    Ok(())
}
