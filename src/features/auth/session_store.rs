//! Server-side session store.
//!
//! The cookie only ever carries an opaque UUID v7; identity lives here. Expired entries
//! are dropped when looked up and by the periodic purge task. Every ended session is
//! announced on a broadcast channel carrying the user id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::features::auth::model::SessionUser;

const ENDED_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: Uuid,
    name: String,
    email: String,
    expires_at: Instant,
}

impl SessionRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn to_user(&self, session_id: Uuid) -> SessionUser {
        SessionUser {
            session_id,
            user_id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionRecord>>,
    ttl: Duration,
    ended: broadcast::Sender<Uuid>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let (ended, _) = broadcast::channel(ENDED_CHANNEL_CAPACITY);
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            ended,
        }
    }

    /// User ids of sessions that were destroyed or expired
    pub fn subscribe_ended(&self) -> broadcast::Receiver<Uuid> {
        self.ended.subscribe()
    }

    fn announce_end(&self, user_id: Uuid) {
        // Sending only fails when nobody is subscribed
        let _ = self.ended.send(user_id);
    }

    pub async fn has_live_session(&self, user_id: Uuid) -> bool {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .any(|record| record.user_id == user_id && !record.is_expired(now))
    }

    pub async fn create(&self, user_id: Uuid, name: &str, email: &str) -> SessionUser {
        let session_id = Uuid::now_v7();
        let record = SessionRecord {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        let user = record.to_user(session_id);

        self.sessions.write().await.insert(session_id, record);
        tracing::info!("Session started: user_id={}", user_id);

        user
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SessionUser> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&session_id) {
                Some(record) if !record.is_expired(now) => return Some(record.to_user(session_id)),
                Some(_) => {}
                None => return None,
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&session_id)
            .is_some_and(|record| record.is_expired(now))
        {
            if let Some(record) = sessions.remove(&session_id) {
                tracing::debug!("Expired session dropped on lookup");
                self.announce_end(record.user_id);
            }
        }
        None
    }

    pub async fn destroy(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id);
        if let Some(record) = &removed {
            tracing::info!("Session ended: user_id={}", record.user_id);
            self.announce_end(record.user_id);
        }
        removed.is_some()
    }

    /// Refresh the cached display identity after an account edit
    pub async fn update_identity(&self, session_id: Uuid, name: &str, email: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session_id) {
            Some(record) => {
                record.name = name.to_string();
                record.email = email.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(id, _)| *id)
            .collect();
        for session_id in &expired {
            if let Some(record) = sessions.remove(session_id) {
                self.announce_end(record.user_id);
            }
        }
        expired.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn spawn_purge_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    tracing::info!(
                        "Purged {} expired sessions, {} active",
                        purged,
                        store.active_count().await
                    );
                }
            }
        })
    }
}
