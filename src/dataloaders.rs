//! DataLoader utilities for batch loading
//!
//! Implements the DataLoader pattern for preventing N+1 backend calls.
//! See: https://github.com/graphql/dataloader
//!
//! A loader lives for exactly one GraphQL request. Lookups issued while a
//! round is collecting are merged into a single [`BatchLoader::load_batch`]
//! call; answers are memoized until the loader is dropped. A later lookup for
//! an unseen key opens a new round, so nested selections still batch per
//! level.

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use crate::{Result, ServiceError};

/// Batch loader trait for loading multiple items at once
#[async_trait]
pub trait BatchLoader<K, V>: Send + Sync
where
    K: Send + Sync + Clone + Eq + Hash,
    V: Send + Sync + Clone,
{
    /// Load batch of items by keys
    ///
    /// Called once per round with every distinct key collected in it. Keys
    /// missing from the returned map resolve to `None`; an `Err` fails every
    /// lookup waiting on the round.
    async fn load_batch(&self, keys: &[K]) -> Result<HashMap<K, V>>;
}

type Reply<V> = oneshot::Sender<Result<Option<V>>>;

struct LoaderState<K, V> {
    /// Answers from finished rounds, including confirmed absences
    resolved: HashMap<K, Option<V>>,
    /// Lookups waiting on the collecting or the in-flight round
    waiting: HashMap<K, Vec<Reply<V>>>,
    /// Keys registered since the last dispatch
    collecting: Vec<K>,
}

impl<K, V> Default for LoaderState<K, V> {
    fn default() -> Self {
        Self {
            resolved: HashMap::new(),
            waiting: HashMap::new(),
            collecting: Vec::new(),
        }
    }
}

/// DataLoader with caching and batching
///
/// Cloning yields another handle onto the same rounds and cache.
pub struct DataLoader<K, V, L>
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    loader: Arc<L>,
    state: Arc<Mutex<LoaderState<K, V>>>,
    delay: Duration,
}

impl<K, V, L> DataLoader<K, V, L>
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1);

    /// Create new DataLoader with a batch loader
    pub fn new(loader: L) -> Self {
        Self::from_arc(Arc::new(loader))
    }

    pub fn from_arc(loader: Arc<L>) -> Self {
        Self {
            loader,
            state: Arc::new(Mutex::new(LoaderState::default())),
            delay: Self::DEFAULT_DELAY,
        }
    }

    /// How long a round keeps collecting keys before it is dispatched
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Load a single item by key
    ///
    /// Answers from the request cache when the key was already resolved,
    /// otherwise joins the round that will fetch it.
    pub async fn load(&self, key: K) -> Result<Option<V>> {
        let receiver = {
            let mut state = self.state.lock().await;
            if let Some(value) = state.resolved.get(&key) {
                return Ok(value.clone());
            }
            self.register(&mut state, key)
        };

        receiver
            .await
            .map_err(|_| ServiceError::unavailable("batch round was abandoned before completing"))?
    }

    /// Load multiple items by keys
    ///
    /// All unresolved keys join the same round. Keys with no backing item are
    /// left out of the returned map.
    pub async fn load_many(&self, keys: Vec<K>) -> Result<HashMap<K, V>> {
        let mut result = HashMap::new();
        let mut pending = Vec::new();

        {
            let mut state = self.state.lock().await;
            for key in keys {
                match state.resolved.get(&key) {
                    Some(Some(value)) => {
                        result.insert(key, value.clone());
                    }
                    Some(None) => {}
                    None => {
                        let receiver = self.register(&mut state, key.clone());
                        pending.push((key, receiver));
                    }
                }
            }
        }

        for (key, receiver) in pending {
            let value = receiver.await.map_err(|_| {
                ServiceError::unavailable("batch round was abandoned before completing")
            })??;
            if let Some(value) = value {
                result.insert(key, value);
            }
        }

        Ok(result)
    }

    /// Prime the cache with a value
    ///
    /// Useful for seeding the cache with data you already have, such as the
    /// entity returned by a mutation.
    pub async fn prime(&self, key: K, value: V) {
        let mut state = self.state.lock().await;
        state.resolved.insert(key, Some(value));
    }

    /// Drop any cached answer for `key`; the next lookup refetches it
    pub async fn forget(&self, key: &K) {
        let mut state = self.state.lock().await;
        state.resolved.remove(key);
    }

    fn register(
        &self,
        state: &mut LoaderState<K, V>,
        key: K,
    ) -> oneshot::Receiver<Result<Option<V>>> {
        let (sender, receiver) = oneshot::channel();

        // Already collecting or in flight: wait on that round.
        if let Some(replies) = state.waiting.get_mut(&key) {
            replies.push(sender);
            return receiver;
        }

        state.waiting.insert(key.clone(), vec![sender]);
        state.collecting.push(key);
        if state.collecting.len() == 1 {
            self.schedule_dispatch();
        }
        receiver
    }

    fn schedule_dispatch(&self) {
        let loader = self.loader.clone();
        let state = Arc::downgrade(&self.state);
        let delay = self.delay;
        tokio::spawn(dispatch(loader, state, delay));
    }
}

/// Runs one round. Holds the loader state weakly so an abandoned request
/// frees its cache even while a backend call is outstanding.
async fn dispatch<K, V, L>(loader: Arc<L>, state: Weak<Mutex<LoaderState<K, V>>>, delay: Duration)
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    tokio::time::sleep(delay).await;

    let keys = match state.upgrade() {
        Some(state) => std::mem::take(&mut state.lock().await.collecting),
        None => return,
    };
    if keys.is_empty() {
        return;
    }

    tracing::debug!(keys = keys.len(), "dispatching batch round");
    // A panicking backend must still answer every waiter of the round.
    let batch = keys.clone();
    let outcome = tokio::spawn(async move { loader.load_batch(&batch).await })
        .await
        .unwrap_or_else(|err| {
            Err(ServiceError::unavailable(format!(
                "batch round did not complete: {}",
                err
            )))
        });
    if let Err(err) = &outcome {
        tracing::warn!(keys = keys.len(), error = %err, "batch round failed");
    }

    let Some(state) = state.upgrade() else {
        tracing::debug!("request finished before batch round returned");
        return;
    };
    let mut state = state.lock().await;
    for key in keys {
        let replies = state.waiting.remove(&key).unwrap_or_default();
        match &outcome {
            Ok(found) => {
                let value = found.get(&key).cloned();
                for reply in replies {
                    let _ = reply.send(Ok(value.clone()));
                }
                state.resolved.insert(key, value);
            }
            Err(err) => {
                for reply in replies {
                    let _ = reply.send(Err(err.clone()));
                }
            }
        }
    }
}

impl<K, V, L> Clone for DataLoader<K, V, L>
where
    K: Send + Sync + Clone + Eq + Hash + 'static,
    V: Send + Sync + Clone + 'static,
    L: BatchLoader<K, V> + 'static,
{
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            state: self.state.clone(),
            delay: self.delay,
        }
    }
}
