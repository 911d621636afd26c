use std::fmt;

use crate::{Error, Time};

/// Backends hand out identifiers either as JSON strings or as integers
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Signed(i) => i.to_string(),
            RawId::Unsigned(u) => u.to_string(),
        }
    }
}

macro_rules! backend_id {
    ($name:ident) => {
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <RawId as serde::Deserialize>::deserialize(deserializer)
                    .map(|raw| $name(raw.into_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> $name {
                $name(String::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

backend_id!(CommentId);
backend_id!(IdeaId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub comment: String,

    /// None for root comments
    #[serde(default)]
    pub parent_id: Option<CommentId>,

    /// Author, the only user allowed to delete this comment
    pub username: String,
    pub created_at: Time,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether `username` may delete this comment; nobody may while the
    /// current user is unknown
    pub fn is_authored_by(&self, username: Option<&str>) -> bool {
        username == Some(&self.username as &str)
    }
}

/// Body of `POST /ideas/{idea}/comments`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub comment: String,

    #[serde(default, rename = "parentId")]
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn new(parent_id: Option<CommentId>, comment: String) -> NewComment {
        NewComment { comment, parent_id }
    }

    pub fn is_blank(&self) -> bool {
        self.comment.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.comment)?;
        if self.is_blank() {
            return Err(Error::EmptyComment);
        }
        Ok(())
    }
}
