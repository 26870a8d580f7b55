//! Synteny feature adapter.

mod cache;
mod options;

pub use self::options::Options;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use futures::{
    FutureExt, StreamExt, TryStreamExt,
    future::{AbortRegistration, Abortable, BoxFuture, Shared},
    stream::{self, BoxStream},
};
use synteny_core::{AssemblyNames, Feature, Region};
use synteny_json::field::Mapping;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::debug;

use self::cache::{Cache, Key};
use crate::{Builder, Error, Source};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<[Feature]>, Error>>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
    waiters: usize,
}

#[derive(Default)]
struct State {
    cache: Cache,
    in_flight: HashMap<Key, InFlight>,
    next_id: u64,
}

struct Inner<S> {
    source: S,
    field_mapping: Mapping,
    assembly_names: AssemblyNames,
    cache_timeout: Duration,
    client_side_filter: bool,
    state: Arc<Mutex<State>>,
}

/// A synteny feature adapter.
///
/// An adapter fetches alignment responses from a [`Source`], parses them into features, and
/// caches the results. Concurrent requests that map to the same cache key share a single
/// fetch.
pub struct Adapter<S> {
    inner: Arc<Inner<S>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Adapter<crate::Client> {
    /// Returns a builder to create an adapter.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_http::Adapter;
    /// let builder = Adapter::builder();
    /// ```
    pub fn builder() -> Builder {
        Builder::default()
    }
}

impl<S> Adapter<S>
where
    S: Source,
{
    pub(crate) fn new(
        source: S,
        field_mapping: Mapping,
        assembly_names: AssemblyNames,
        cache_timeout: Duration,
        client_side_filter: bool,
        refresh: Option<(Handle, Duration)>,
    ) -> Self {
        let state = Arc::new(Mutex::new(State::default()));

        let refresh_task = refresh
            .map(|(handle, period)| spawn_refresh_task(&handle, Arc::clone(&state), period));

        Self {
            inner: Arc::new(Inner {
                source,
                field_mapping,
                assembly_names,
                cache_timeout,
                client_side_filter,
                state,
            }),
            refresh_task: Mutex::new(refresh_task),
        }
    }

    /// Returns a stream over the features in the given region.
    ///
    /// Nothing is fetched until the stream is first polled. The stream then yields every
    /// feature and ends, or it yields a single error and ends. Dropping the stream ends this
    /// caller's wait, and a fetch that no caller waits on is dropped.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use futures::TryStreamExt;
    /// use synteny_core::Region;
    /// use synteny_http::{Adapter, Options};
    ///
    /// let adapter = Adapter::builder()
    ///     .set_url("https://example.com/alignments")
    ///     .set_assembly_names(vec![String::from("grape"), String::from("peach")])
    ///     .build()?;
    ///
    /// let region = Region::new("chr1", 1000, 2000)?.with_assembly_name("grape");
    /// let features: Vec<_> = adapter.features(&region, Options::default()).try_collect().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn features(
        &self,
        region: &Region,
        options: Options,
    ) -> BoxStream<'static, Result<Feature, Error>> {
        let inner = Arc::clone(&self.inner);
        let region = region.clone();

        stream::once(async move { inner.query(&region, options).await })
            .map_ok(|features| stream::iter(features.into_iter().map(Ok::<_, Error>)))
            .try_flatten()
            .boxed()
    }

    /// Removes the cached features for the given region.
    ///
    /// When filtering locally, this removes the full dataset of the region's assembly.
    pub fn release(&self, region: &Region) {
        let key = Key::new(region, self.inner.client_side_filter);

        if self.inner.lock_state().cache.remove(&key) {
            debug!(%key, "released cached features");
        }
    }

    /// Clears the cache and stops periodic clearing.
    pub fn release_all(&self) {
        self.inner.lock_state().cache.clear();
        self.stop_refresh_task();
        debug!("released all cached features");
    }

    /// Returns the reference sequence names with data.
    ///
    /// An endpoint does not advertise its reference sequences, so this is always empty.
    pub fn ref_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns whether there may be data for the given reference sequence.
    ///
    /// An endpoint does not advertise its reference sequences, so this is always `true`.
    pub fn has_data_for_ref_name(&self, _ref_name: &str) -> bool {
        true
    }
}

impl<S> Adapter<S> {
    fn stop_refresh_task(&self) {
        let mut refresh_task = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = refresh_task.take() {
            handle.abort();
        }
    }
}

impl<S> Drop for Adapter<S> {
    fn drop(&mut self) {
        self.stop_refresh_task();
    }
}

impl<S> Inner<S>
where
    S: Source,
{
    fn lock_state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    async fn query(&self, region: &Region, options: Options) -> Result<Vec<Feature>, Error> {
        let key = Key::new(region, self.client_side_filter);

        let (fetch, _waiter, abort_registration) = {
            let mut state = self.lock_state();

            if let Some(features) = state.cache.get(&key, Instant::now(), self.cache_timeout) {
                debug!(%key, "cache hit");
                return Ok(self.filter(&features, region));
            }

            match state.in_flight.get_mut(&key) {
                Some(in_flight) => {
                    debug!(%key, "joining in-flight fetch");

                    in_flight.waiters += 1;
                    let waiter = Waiter::new(&self.state, key, in_flight.id);

                    (in_flight.fetch.clone(), waiter, options.abort_registration)
                }
                None => {
                    let id = state.next_id;
                    state.next_id += 1;

                    let fetch = self
                        .fetch(key.clone(), id, region, options.abort_registration)
                        .shared();

                    state.in_flight.insert(
                        key.clone(),
                        InFlight {
                            id,
                            fetch: fetch.clone(),
                            waiters: 1,
                        },
                    );

                    (fetch, Waiter::new(&self.state, key, id), None)
                }
            }
        };

        let features = match abort_registration {
            Some(registration) => Abortable::new(fetch, registration)
                .await
                .unwrap_or(Err(Error::Aborted))?,
            None => fetch.await?,
        };

        Ok(self.filter(&features, region))
    }

    fn fetch(
        &self,
        key: Key,
        id: u64,
        region: &Region,
        abort_registration: Option<AbortRegistration>,
    ) -> BoxFuture<'static, Result<Arc<[Feature]>, Error>> {
        let state = Arc::downgrade(&self.state);
        let request = self.source.fetch(region);
        let field_mapping = self.field_mapping.clone();
        let assembly_names = self.assembly_names.clone();
        let assembly_name = region.assembly_name().map(String::from);
        let cache_timeout = self.cache_timeout;

        async move {
            let _registration = Registration {
                state: state.clone(),
                key: key.clone(),
                id,
            };

            debug!(%key, "fetching features");

            let body = match abort_registration {
                Some(registration) => Abortable::new(request, registration)
                    .await
                    .unwrap_or(Err(Error::Aborted))?,
                None => request.await?,
            };

            let features: Arc<[Feature]> = synteny_json::parse(
                &body,
                &field_mapping,
                &assembly_names,
                assembly_name.as_deref(),
            )
            .into();

            debug!(%key, count = features.len(), "fetched features");

            if !cache_timeout.is_zero() {
                if let Some(state) = state.upgrade() {
                    lock(&state)
                        .cache
                        .insert(key, Arc::clone(&features), Instant::now());
                }
            }

            Ok(features)
        }
        .boxed()
    }

    fn filter(&self, features: &[Feature], region: &Region) -> Vec<Feature> {
        if self.client_side_filter {
            features
                .iter()
                .filter(|feature| feature.region().overlaps(region))
                .cloned()
                .collect()
        } else {
            features.to_vec()
        }
    }
}

/// Removes an in-flight entry when the fetch backing it ends, however it ends.
struct Registration {
    state: Weak<Mutex<State>>,
    key: Key,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };

        let _entry = {
            let mut state = lock(&state);

            if state
                .in_flight
                .get(&self.key)
                .is_some_and(|in_flight| in_flight.id == self.id)
            {
                state.in_flight.remove(&self.key)
            } else {
                None
            }
        };
    }
}

/// A caller waiting on an in-flight fetch.
///
/// When the last waiter goes away before the fetch ends, the entry is removed, which drops
/// the fetch.
struct Waiter {
    state: Weak<Mutex<State>>,
    key: Key,
    id: u64,
}

impl Waiter {
    fn new(state: &Arc<Mutex<State>>, key: Key, id: u64) -> Self {
        Self {
            state: Arc::downgrade(state),
            key,
            id,
        }
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };

        // The entry must outlive the guard: dropping the last handle to a fetch drops its
        // registration, which locks the state again.
        let entry = {
            let mut state = lock(&state);

            let is_last = match state.in_flight.get_mut(&self.key) {
                Some(in_flight) if in_flight.id == self.id => {
                    in_flight.waiters -= 1;
                    in_flight.waiters == 0
                }
                _ => false,
            };

            if is_last {
                state.in_flight.remove(&self.key)
            } else {
                None
            }
        };

        if entry.is_some() {
            debug!(key = %self.key, "abandoned in-flight fetch");
        }
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_refresh_task(
    handle: &Handle,
    state: Arc<Mutex<State>>,
    period: Duration,
) -> JoinHandle<()> {
    let state = Arc::downgrade(&state);

    handle.spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);

        loop {
            interval.tick().await;

            let Some(state) = state.upgrade() else {
                break;
            };

            let n = {
                let mut state = lock(&state);
                let n = state.cache.len();
                state.cache.clear();
                n
            };

            debug!(entries = n, "cleared feature cache");
        }
    })
}
