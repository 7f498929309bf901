//! Process-wide session registry.
//!
//! The registry lock is held only to create or look up a session. Each
//! session sits behind its own lock, so turn processing in one session
//! never blocks creation of, or play in, another.

use crate::{
    config::GameConfig,
    engine::SimEngine,
    error::{SimError, SimResult},
    rng::Seed,
    types::SessionId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type SessionHandle = Arc<Mutex<SimEngine>>;

pub struct SessionRegistry {
    config: GameConfig,
    inner: Mutex<RegistryInner>,
}

struct RegistryInner {
    sessions: HashMap<SessionId, SessionHandle>,
    next_id: SessionId,
}

impl SessionRegistry {
    /// Every session created through this registry uses `config`.
    pub fn new(config: GameConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            inner: Mutex::new(RegistryInner {
                sessions: HashMap::new(),
                next_id: 1,
            }),
        })
    }

    /// Start a new game. The level is generated before the registry lock
    /// is taken.
    pub fn create(&self, seed: impl Into<Seed>) -> SimResult<(SessionId, SessionHandle)> {
        let engine = SimEngine::new(seed, self.config.clone())?;
        let handle = Arc::new(Mutex::new(engine));

        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.sessions.insert(id, Arc::clone(&handle));
        log::info!("session {id} registered ({} live)", inner.sessions.len());
        Ok((id, handle))
    }

    pub fn get(&self, id: SessionId) -> SimResult<SessionHandle> {
        self.lock()
            .sessions
            .get(&id)
            .cloned()
            .ok_or(SimError::SessionNotFound { id })
    }

    /// Feed one line to a session and collect its output.
    pub fn input(&self, id: SessionId, line: &str) -> SimResult<Vec<String>> {
        let handle = self.get(id)?;
        let mut engine = handle.lock().unwrap_or_else(PoisonError::into_inner);
        engine.input(line)
    }

    pub fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        let removed = self.lock().sessions.remove(&id);
        if removed.is_some() {
            log::info!("session {id} closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic mid-insert cannot leave the map half-written, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
