//! Keyed query cache with fetch de-duplication and mutation-driven
//! invalidation.
//!
//! Each key owns one slot. A fresh slot answers reads immediately; a missing
//! or stale slot starts exactly one request, and every caller arriving while
//! that request runs joins it and observes the same value or the same error.
//! A read arriving after a running request was invalidated queues one newer
//! request behind it, so a key never has two requests in flight.
//! Writers never touch cached values: [`QueryCache::mutate`] runs the remote
//! write and, on success, marks the dependent keys stale.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

enum Slot<V, E> {
    Ready {
        value: V,
        stale: bool,
    },
    Fetching {
        flight: Flight<V, E>,
        /// Distinguishes this request from any later one for the same key.
        generation: u64,
        /// Value held before the request started; restored (stale) on failure.
        previous: Option<V>,
        /// Invalidated while in flight: the result is stored stale.
        invalidated: bool,
    },
}

struct CacheState<K, V, E> {
    slots: HashMap<K, Slot<V, E>>,
    generation: u64,
}

impl<K: Eq + Hash, V: Clone, E> CacheState<K, V, E> {
    /// Store the outcome of request `generation`, unless a newer request for
    /// the same key has superseded it.
    fn settle(&mut self, key: K, generation: u64, result: &Result<V, E>) {
        match self.slots.remove(&key) {
            Some(Slot::Fetching {
                generation: current,
                previous,
                invalidated,
                ..
            }) if current == generation => {
                let slot = match result {
                    Ok(value) => Some(Slot::Ready {
                        value: value.clone(),
                        stale: invalidated,
                    }),
                    Err(_) => previous.map(|value| Slot::Ready { value, stale: true }),
                };
                if let Some(slot) = slot {
                    self.slots.insert(key, slot);
                }
            }
            Some(other) => {
                self.slots.insert(key, other);
            }
            None => {}
        }
    }
}

/// Observable state of one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Fresh,
    Stale,
    Fetching,
}

/// Session-scoped query cache.
///
/// Thread-safe via an interior `tokio::sync::Mutex` that is never held across
/// a request; designed to be owned by one long-lived client object.
pub struct QueryCache<K, V, E> {
    state: Arc<Mutex<CacheState<K, V, E>>>,
}

impl<K, V, E> Default for QueryCache<K, V, E> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                slots: HashMap::new(),
                generation: 0,
            })),
        }
    }
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`, requesting it through `fetcher` only when needed.
    ///
    /// `fetcher` is invoked at most once per call and only when no fresh
    /// value and no live request exist for the key.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let flight = {
            let mut state = self.state.lock().await;
            match state.slots.get(&key) {
                Some(Slot::Ready {
                    value,
                    stale: false,
                }) => {
                    tracing::trace!(?key, "Query cache hit");
                    return Ok(value.clone());
                }
                Some(Slot::Fetching {
                    flight,
                    invalidated: false,
                    ..
                }) => {
                    tracing::trace!(?key, "Joining in-flight query");
                    flight.clone()
                }
                _ => {
                    let (previous, prior) = match state.slots.remove(&key) {
                        Some(Slot::Ready { value, .. }) => (Some(value), None),
                        Some(Slot::Fetching {
                            flight, previous, ..
                        }) => (previous, Some(flight)),
                        None => (None, None),
                    };
                    state.generation += 1;
                    let generation = state.generation;

                    tracing::debug!(?key, generation, queued = prior.is_some(), "Starting query");
                    let request = fetcher();
                    // An invalidated request still running is awaited first:
                    // at most one request per key is ever in flight.
                    let request = async move {
                        if let Some(prior) = prior {
                            let _ = prior.await;
                        }
                        request.await
                    };
                    let flight = Self::launch(
                        Arc::downgrade(&self.state),
                        key.clone(),
                        generation,
                        request,
                    );
                    state.slots.insert(
                        key,
                        Slot::Fetching {
                            flight: flight.clone(),
                            generation,
                            previous,
                            invalidated: false,
                        },
                    );
                    flight
                }
            }
        };

        flight.await
    }

    /// Wrap `request` so that whichever caller drives it to completion also
    /// records the outcome in the cache.
    fn launch<Fut>(
        state: Weak<Mutex<CacheState<K, V, E>>>,
        key: K,
        generation: u64,
        request: Fut,
    ) -> Flight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        async move {
            let result = request.await;
            if let Some(state) = state.upgrade() {
                let mut guard = state.lock().await;
                guard.settle(key, generation, &result);
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Mark `key` stale so the next [`fetch`](Self::fetch) re-requests it.
    ///
    /// Idempotent; unknown keys are ignored.
    pub async fn invalidate(&self, key: &K) {
        let mut state = self.state.lock().await;
        match state.slots.get_mut(key) {
            Some(Slot::Ready { stale, .. }) => *stale = true,
            Some(Slot::Fetching { invalidated, .. }) => *invalidated = true,
            None => return,
        }
        tracing::debug!(?key, "Invalidated query");
    }

    pub async fn invalidate_all(&self, keys: &[K]) {
        for key in keys {
            self.invalidate(key).await;
        }
    }

    /// Run a remote write; on success invalidate every key in `invalidates`.
    ///
    /// On failure the cache is left untouched and the error is returned
    /// as-is. Concurrent mutations are not coalesced.
    pub async fn mutate<T, Er, Fut>(&self, operation: Fut, invalidates: &[K]) -> Result<T, Er>
    where
        Fut: Future<Output = Result<T, Er>>,
    {
        let output = operation.await?;
        self.invalidate_all(invalidates).await;
        Ok(output)
    }

    /// Last known value for `key`, fresh or not, without requesting anything.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let state = self.state.lock().await;
        match state.slots.get(key)? {
            Slot::Ready { value, .. } => Some(value.clone()),
            Slot::Fetching { previous, .. } => previous.clone(),
        }
    }

    pub async fn status(&self, key: &K) -> Option<EntryStatus> {
        let state = self.state.lock().await;
        state.slots.get(key).map(|slot| match slot {
            Slot::Ready { stale: false, .. } => EntryStatus::Fresh,
            Slot::Ready { stale: true, .. } => EntryStatus::Stale,
            Slot::Fetching { .. } => EntryStatus::Fetching,
        })
    }
}
