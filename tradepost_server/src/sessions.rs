//! In-memory session and cart storage.
//!
//! Sessions live in a mutex-guarded map keyed by a random token carried in the [`SESSION_COOKIE`] cookie. Each
//! session holds the logged-in user id and the shopping cart. The cart is deliberately decoupled from the durable
//! store: checkout takes the snapshots as an explicit argument and the cart is only cleared after the engine
//! transaction commits.
//!
//! Expired sessions are treated as absent everywhere and physically removed whenever a new session starts.
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use log::*;
use thiserror::Error;
use tradepost_engine::db_types::{ProductSnapshot, UserId};

pub const SESSION_COOKIE: &str = "tpo_session";

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("No cart is available for this session")]
    NoSession,
    #[error("Item is already in the cart")]
    Duplicate,
    #[error("No cart entry at index {0}")]
    BadIndex(usize),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub cart: Vec<ProductSnapshot>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned lock only means another request panicked; the map itself is still usable.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn new_token() -> String {
        format!("{:032x}", rand::random::<u128>())
    }

    fn live<'a>(sessions: &'a HashMap<String, Session>, token: &str) -> Option<&'a Session> {
        sessions.get(token).filter(|s| s.expires_at > Utc::now())
    }

    fn live_mut<'a>(sessions: &'a mut HashMap<String, Session>, token: &str) -> Option<&'a mut Session> {
        sessions.get_mut(token).filter(|s| s.expires_at > Utc::now())
    }

    /// Opens a fresh session with an empty cart and returns its token. Expired sessions are purged here, so the
    /// map stays bounded by the number of active users.
    pub fn start_session(&self, user_id: UserId) -> String {
        let token = Self::new_token();
        let session = Session { user_id, cart: Vec::new(), expires_at: Utc::now() + self.ttl };
        let mut sessions = self.lock();
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token.clone(), session);
        debug!("📇️ Session opened. {} active sessions", sessions.len());
        token
    }

    /// Drops the session. Returns false if it did not exist.
    pub fn end_session(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn user_id(&self, token: &str) -> Option<UserId> {
        let sessions = self.lock();
        Self::live(&sessions, token).map(|s| s.user_id.clone())
    }

    pub fn cart(&self, token: &str) -> Option<Vec<ProductSnapshot>> {
        let sessions = self.lock();
        Self::live(&sessions, token).map(|s| s.cart.clone())
    }

    /// Adds a snapshot to the session's cart. Two snapshots are duplicates iff every field matches.
    pub fn add_to_cart(&self, token: &str, snapshot: ProductSnapshot) -> Result<(), CartError> {
        let mut sessions = self.lock();
        let session = Self::live_mut(&mut sessions, token).ok_or(CartError::NoSession)?;
        if session.cart.contains(&snapshot) {
            return Err(CartError::Duplicate);
        }
        session.cart.push(snapshot);
        Ok(())
    }

    /// Removes and returns the cart entry at `index`.
    pub fn remove_from_cart(&self, token: &str, index: usize) -> Result<ProductSnapshot, CartError> {
        let mut sessions = self.lock();
        let session = Self::live_mut(&mut sessions, token).ok_or(CartError::NoSession)?;
        if index >= session.cart.len() {
            return Err(CartError::BadIndex(index));
        }
        Ok(session.cart.remove(index))
    }

    /// Empties the cart. Returns false if the session did not exist.
    pub fn clear_cart(&self, token: &str) -> bool {
        let mut sessions = self.lock();
        match Self::live_mut(&mut sessions, token) {
            Some(s) => {
                s.cart.clear();
                true
            },
            None => false,
        }
    }
}
