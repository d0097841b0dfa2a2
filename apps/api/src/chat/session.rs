//! Chat sessions: append-only transcripts and the per-user session registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::ChatVariant;
use crate::llm_client::prompts::SYSTEM_INSTRUCTION;
use crate::models::chat::ChatTurn;

/// Ordered log of chat turns. Turns can only be appended.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
    seeded: bool,
}

impl Transcript {
    /// Agent transcripts start with the system instruction as a user turn.
    pub fn new(variant: ChatVariant) -> Self {
        match variant {
            ChatVariant::Agent => Self {
                turns: vec![ChatTurn::user(SYSTEM_INSTRUCTION)],
                seeded: true,
            },
            ChatVariant::Simple => Self {
                turns: Vec::new(),
                seeded: false,
            },
        }
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Every turn, seed included: what the completion service receives.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Turns shown to the user: the seed instruction is hidden.
    pub fn visible_turns(&self) -> &[ChatTurn] {
        if self.seeded {
            &self.turns[1..]
        } else {
            &self.turns
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// One user's interactive chat session.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub variant: ChatVariant,
    last_active: Instant,
    transcript: Transcript,
}

impl Session {
    pub fn new(variant: ChatVariant) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            variant,
            last_active: Instant::now(),
            transcript: Transcript::new(variant),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.last_active = Instant::now();
        self.transcript.push(turn);
    }

    /// Discards the transcript and starts over from the initial seed.
    pub fn reset(&mut self) {
        self.last_active = Instant::now();
        self.transcript = Transcript::new(self.variant);
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

/// A session behind its own lock. Holding the lock for the whole of an
/// action keeps requests for one session strictly sequential.
pub type SharedSession = Arc<Mutex<Session>>;

/// Registry of live sessions keyed by id. Sessions never see each other;
/// the map only routes a request to its owner's session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    variant: ChatVariant,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(variant: ChatVariant, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            variant,
            idle_timeout,
        }
    }

    /// Starts a new session, pruning idle ones first.
    pub async fn create(&self) -> (Uuid, SharedSession) {
        self.prune_idle().await;

        let session = Session::new(self.variant);
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, shared.clone());
        info!("Chat session {id} started");
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Ends a session. Returns false when the id was unknown.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Chat session {id} ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for longer than the timeout. A session whose handle
    /// is held outside the map belongs to an in-flight request (possibly still
    /// waiting for the lock) and is kept.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(s) => s.idle_for() < self.idle_timeout,
                Err(_) => true,
            }
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {pruned} idle chat sessions");
        }
        pruned
    }
}
