use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::playback::sequencer::PlaybackHandle;
use crate::state::session::{SessionId, SessionState};

/// Handle to a session with its playback task, if any
pub struct SessionHandle {
    pub session: Arc<RwLock<SessionState>>,
    pub playback: Option<PlaybackHandle>,
}

/// Server state partitioned by session
/// Uses DashMap for concurrent access without global locks
pub struct ServerState {
    sessions: DashMap<SessionId, SessionHandle>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a session in lobby mode
    pub fn create_session(&self, starting_credits: u32) -> (SessionId, Arc<RwLock<SessionState>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(RwLock::new(SessionState::new(id, starting_credits)));
        self.sessions.insert(id, SessionHandle {
            session: session.clone(),
            playback: None,
        });
        (id, session)
    }

    pub fn get_session(&self, id: &SessionId) -> Option<Arc<RwLock<SessionState>>> {
        self.sessions.get(id).map(|entry| entry.session.clone())
    }

    pub fn session_exists(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Track a new playback task. A previous task is cancelled first.
    pub fn set_playback(&self, id: &SessionId, handle: PlaybackHandle) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                if let Some(previous) = entry.playback.replace(handle) {
                    previous.cancel();
                }
                true
            }
            None => {
                handle.cancel();
                false
            }
        }
    }

    /// Cancel the playback for `match_id`, if that is the one still tracked
    pub fn cancel_playback(&self, id: &SessionId, match_id: u64) -> bool {
        let Some(mut entry) = self.sessions.get_mut(id) else {
            return false;
        };
        match entry.playback.take() {
            Some(handle) if handle.match_id == match_id => {
                handle.cancel();
                true
            }
            other => {
                entry.playback = other;
                false
            }
        }
    }

    /// Remove a session and stop its playback
    pub fn remove_session(&self, id: &SessionId) -> Option<Arc<RwLock<SessionState>>> {
        self.sessions.remove(id).map(|(_, handle)| {
            if let Some(playback) = handle.playback {
                playback.cancel();
            }
            handle.session
        })
    }

    /// Remove sessions idle for longer than `timeout_secs`
    /// Returns list of removed session IDs
    pub async fn cleanup_idle(&self, timeout_secs: u64) -> Vec<SessionId> {
        let cutoff = Utc::now() - ChronoDuration::seconds(timeout_secs as i64);

        let candidates: Vec<(SessionId, Arc<RwLock<SessionState>>)> = self.sessions
            .iter()
            .map(|entry| (*entry.key(), entry.session.clone()))
            .collect();

        let mut removed = Vec::new();
        for (id, session) in candidates {
            let idle = session.read().await.last_active < cutoff;
            if idle && self.remove_session(&id).is_some() {
                removed.push(id);
            }
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
