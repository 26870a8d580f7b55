use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use synteny_core::{Feature, Region};
use tokio::time::Instant;

const GLOBAL_PREFIX: &str = "global";
const DEFAULT_ASSEMBLY_NAME: &str = "default";

/// A cache key.
///
/// When filtering locally, the full dataset of an assembly is stored under a single key.
/// Otherwise, each region has its own key.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Key {
    Global {
        assembly_name: String,
    },
    Region {
        assembly_name: String,
        name: String,
        start: u64,
        end: u64,
    },
}

impl Key {
    pub(crate) fn new(region: &Region, client_side_filter: bool) -> Self {
        let assembly_name = region
            .assembly_name()
            .unwrap_or(DEFAULT_ASSEMBLY_NAME)
            .into();

        if client_side_filter {
            Self::Global { assembly_name }
        } else {
            Self::Region {
                assembly_name,
                name: region.name().into(),
                start: region.start(),
                end: region.end(),
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global { assembly_name } => write!(f, "{GLOBAL_PREFIX}:{assembly_name}"),
            Self::Region {
                assembly_name,
                name,
                start,
                end,
            } => write!(f, "{assembly_name}:{name}:{start}-{end}"),
        }
    }
}

struct Entry {
    features: Arc<[Feature]>,
    created_at: Instant,
}

/// Fetched features by key, with their creation times.
#[derive(Default)]
pub(crate) struct Cache {
    entries: HashMap<Key, Entry>,
}

impl Cache {
    /// Returns the features under the given key if they are younger than the timeout.
    ///
    /// A stale entry is evicted. A zero timeout never hits.
    pub(crate) fn get(
        &mut self,
        key: &Key,
        now: Instant,
        timeout: Duration,
    ) -> Option<Arc<[Feature]>> {
        let entry = self.entries.get(key)?;

        if now.saturating_duration_since(entry.created_at) < timeout {
            Some(Arc::clone(&entry.features))
        } else {
            self.entries.remove(key);
            None
        }
    }

    pub(crate) fn insert(&mut self, key: Key, features: Arc<[Feature]>, created_at: Instant) {
        self.entries.insert(
            key,
            Entry {
                features,
                created_at,
            },
        );
    }

    pub(crate) fn remove(&mut self, key: &Key) -> bool {
        self.entries.remove(key).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
