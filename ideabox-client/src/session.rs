use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::AuthToken;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub token: AuthToken,

    /// Known once `GET /me` answered, used to offer deletion of own comments
    pub username: Option<String>,
}

/// Where the bearer credential lives between requests
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: Session);
    fn clear(&self);
}

#[derive(Clone, Debug, Default)]
pub struct MemorySession(Arc<Mutex<Option<Session>>>);

impl MemorySession {
    pub fn new(session: Session) -> MemorySession {
        MemorySession(Arc::new(Mutex::new(Some(session))))
    }
}

impl SessionStore for MemorySession {
    fn load(&self) -> Option<Session> {
        self.0.lock().clone()
    }

    fn save(&self, session: Session) {
        *self.0.lock() = Some(session);
    }

    fn clear(&self) {
        *self.0.lock() = None;
    }
}
