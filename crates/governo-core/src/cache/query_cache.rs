use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use governo_shared::constants::{QUERY_KEY_ADMIN, QUERY_KEY_PUBLIC};

/// Identity under which a query result is cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Cow<'static, str>);

impl QueryKey {
    pub const PUBLIC_ITEMS: QueryKey = QueryKey(Cow::Borrowed(QUERY_KEY_PUBLIC));
    pub const ADMIN_ITEMS: QueryKey = QueryKey(Cow::Borrowed(QUERY_KEY_ADMIN));

    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a key as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never requested, or invalidated
    Idle,
    Pending,
    Success,
    /// Successful but older than the stale time; next fetch refetches
    Stale,
    Error,
}

type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

type StalePolicy<T> = Box<dyn Fn(&T) -> Duration + Send + Sync>;

enum Slot<T, E> {
    InFlight {
        generation: u64,
        future: SharedFetch<T, E>,
        previous: Option<T>,
    },
    Ready {
        generation: u64,
        value: T,
        fetched_at: Instant,
        stale_after: Duration,
    },
    Failed {
        generation: u64,
        error: E,
    },
}

impl<T, E> Slot<T, E> {
    fn generation(&self) -> u64 {
        match self {
            Slot::InFlight { generation, .. }
            | Slot::Ready { generation, .. }
            | Slot::Failed { generation, .. } => *generation,
        }
    }
}

/// Keyed async memoization with request coalescing.
///
/// At most one fetch runs per key; concurrent callers await the same shared
/// future. Successful values are served until `stale_time` elapses, or the
/// duration the stale policy picks for that value. Failures are recorded for
/// `status` but never served: the next call fetches again.
///
/// Invalidation drops the slot. A fetch that was in flight when its key was
/// invalidated still resolves for its waiters but is not written back. A
/// fetch that panics drops its slot before the panic reaches the waiters.
pub struct QueryCache<T, E> {
    slots: DashMap<QueryKey, Slot<T, E>>,
    stale_time: Duration,
    stale_policy: Option<StalePolicy<T>>,
    generation: AtomicU64,
}

impl<T, E> QueryCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(stale_time: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            stale_time,
            stale_policy: None,
            generation: AtomicU64::new(0),
        }
    }

    /// Pick the stale time per value instead of using `stale_time` for all.
    pub fn with_stale_policy(mut self, policy: impl Fn(&T) -> Duration + Send + Sync + 'static) -> Self {
        self.stale_policy = Some(Box::new(policy));
        self
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Serve `key` from cache, join its in-flight fetch, or start `fetcher`.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (generation, future) = match self.slots.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let joined = match occupied.get() {
                    Slot::Ready { value, fetched_at, stale_after, .. } if fetched_at.elapsed() < *stale_after => {
                        debug!("Query {} served from cache", key);
                        return Ok(value.clone());
                    }
                    Slot::InFlight { generation, future, .. } => {
                        debug!("Query {} joined in-flight fetch", key);
                        Some((*generation, future.clone()))
                    }
                    _ => None,
                };

                match joined {
                    Some(joined) => joined,
                    None => {
                        let previous = match occupied.get() {
                            Slot::Ready { value, .. } => Some(value.clone()),
                            _ => None,
                        };
                        let (generation, future) = self.start(key, fetcher);
                        occupied.insert(Slot::InFlight {
                            generation,
                            future: future.clone(),
                            previous,
                        });
                        (generation, future)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let (generation, future) = self.start(key, fetcher);
                vacant.insert(Slot::InFlight {
                    generation,
                    future: future.clone(),
                    previous: None,
                });
                (generation, future)
            }
        };

        let result = match AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                // A panicked Shared stays poisoned; the next call must start over
                self.slots.remove_if(key, |_, slot| slot.generation() == generation);
                warn!("Query {} fetch panicked (generation {})", key, generation);
                resume_unwind(panic);
            }
        };
        self.settle(key, generation, &result);
        result
    }

    /// Drop `key` and fetch it again.
    pub async fn refetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.invalidate(key);
        self.fetch(key, fetcher).await
    }

    /// Last successful value, stale or not, without fetching.
    pub fn peek(&self, key: &QueryKey) -> Option<T> {
        let slot = self.slots.get(key)?;
        match slot.value() {
            Slot::Ready { value, .. } => Some(value.clone()),
            Slot::InFlight { previous, .. } => previous.clone(),
            Slot::Failed { .. } => None,
        }
    }

    /// Error recorded by the last failed fetch of `key`, if that is its state.
    pub fn last_error(&self, key: &QueryKey) -> Option<E> {
        match self.slots.get(key)?.value() {
            Slot::Failed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.slots.get(key).as_deref() {
            None => QueryStatus::Idle,
            Some(Slot::InFlight { .. }) => QueryStatus::Pending,
            Some(Slot::Ready { fetched_at, stale_after, .. }) if fetched_at.elapsed() < *stale_after => {
                QueryStatus::Success
            }
            Some(Slot::Ready { .. }) => QueryStatus::Stale,
            Some(Slot::Failed { .. }) => QueryStatus::Error,
        }
    }

    /// Returns true if the key had an entry.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.slots.remove(key).is_some();
        if removed {
            debug!("Query {} invalidated", key);
        }
        removed
    }

    pub fn invalidate_all(&self) {
        self.slots.clear();
        debug!("All queries invalidated");
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn start<F, Fut>(&self, key: &QueryKey, fetcher: F) -> (u64, SharedFetch<T, E>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Query {} fetching (generation {})", key, generation);
        (generation, fetcher().boxed().shared())
    }

    fn stale_after(&self, value: &T) -> Duration {
        self.stale_policy
            .as_ref()
            .map_or(self.stale_time, |policy| policy(value))
    }

    fn settle(&self, key: &QueryKey, generation: u64, result: &Result<T, E>) {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return;
        };
        // Superseded, or already settled by another waiter
        if slot.generation() != generation || !matches!(*slot, Slot::InFlight { .. }) {
            return;
        }

        *slot = match result {
            Ok(value) => Slot::Ready {
                generation,
                value: value.clone(),
                fetched_at: Instant::now(),
                stale_after: self.stale_after(value),
            },
            Err(error) => Slot::Failed {
                generation,
                error: error.clone(),
            },
        };
    }
}
