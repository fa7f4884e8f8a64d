//! View state store
//!
//! Single point of truth for the collections the presentational layer
//! renders from. Each collection is replaced atomically as a whole;
//! readers take owned snapshots and never observe a partial update.
//! Consumers subscribe to a revision counter instead of importing shared
//! mutable state.

use crate::model::{Agent, Event, Task};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// Owned, consistent copy of the store contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// All agents in the current workspace scope
    pub agents: Vec<Agent>,
    /// All tasks in the current workspace scope
    pub tasks: Vec<Task>,
    /// Most-recent window of activity events
    pub events: Vec<Event>,
}

/// Token identifying one workspace scope generation
///
/// Every store write carries the token it was issued under. Once a newer
/// scope is begun, writes holding older tokens are dropped, so in-flight
/// fetch results that resolve after a workspace switch (or after teardown)
/// cannot overwrite the new scope's data.
#[derive(Debug, Clone)]
pub struct ScopeToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ScopeToken {
    /// Whether this token still belongs to the active scope
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }
}

struct Inner {
    snapshot: RwLock<Snapshot>,
    generation: Arc<AtomicU64>,
    revision_tx: watch::Sender<u64>,
}

/// Shared handle to the view state store
///
/// Cheap to clone; all clones point at the same state.
#[derive(Clone)]
pub struct ViewStore {
    inner: Arc<Inner>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                snapshot: RwLock::new(Snapshot::default()),
                generation: Arc::new(AtomicU64::new(0)),
                revision_tx,
            }),
        }
    }

    /// Take an owned snapshot of all collections
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.read().await.clone()
    }

    /// Subscribe to store revisions
    ///
    /// The receiver's value increments on every completed replace; derived
    /// views should be recomputed from a fresh snapshot when it changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision_tx.subscribe()
    }

    /// Current revision number
    pub fn revision(&self) -> u64 {
        *self.inner.revision_tx.borrow()
    }

    /// Begin a new workspace scope, invalidating all previously issued
    /// tokens
    pub fn begin_scope(&self) -> ScopeToken {
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        ScopeToken {
            generation,
            current: Arc::clone(&self.inner.generation),
        }
    }

    /// Replace the agents collection; returns false if the token is stale
    pub async fn replace_agents(&self, token: &ScopeToken, agents: Vec<Agent>) -> bool {
        if !token.is_current() {
            debug!(generation = token.generation, "Ignoring stale agents write");
            return false;
        }
        {
            let mut snapshot = self.inner.snapshot.write().await;
            snapshot.agents = agents;
        }
        self.bump();
        true
    }

    /// Replace the tasks collection; returns false if the token is stale
    pub async fn replace_tasks(&self, token: &ScopeToken, tasks: Vec<Task>) -> bool {
        if !token.is_current() {
            debug!(generation = token.generation, "Ignoring stale tasks write");
            return false;
        }
        {
            let mut snapshot = self.inner.snapshot.write().await;
            snapshot.tasks = tasks;
        }
        self.bump();
        true
    }

    /// Replace the events collection; returns false if the token is stale
    pub async fn replace_events(&self, token: &ScopeToken, events: Vec<Event>) -> bool {
        if !token.is_current() {
            debug!(generation = token.generation, "Ignoring stale events write");
            return false;
        }
        {
            let mut snapshot = self.inner.snapshot.write().await;
            snapshot.events = events;
        }
        self.bump();
        true
    }

    fn bump(&self) {
        self.inner.revision_tx.send_modify(|revision| *revision += 1);
    }
}
