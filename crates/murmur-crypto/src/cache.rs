//! Caller-owned key caches.
//!
//! Deriving a pairwise key costs an X25519 operation and opening a room key
//! costs one more plus an AES-GCM decrypt. Conversations and rooms reuse the
//! same keys for every message, so collaborators may keep them here.
//!
//! The cache never derives anything itself while holding its lock:
//! [`KeyCache::get_or_try_insert_with`] reads under a shared lock, derives
//! outside it, and inserts only if no other caller got there first. Readers of
//! an entry never observe it being replaced by a concurrent re-derivation.
//! Entries are only removed by [`KeyCache::invalidate`], [`KeyCache::clear`],
//! or FIFO eviction at capacity.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::config::KeyCacheConfig;
use crate::ecdh::{derive_pairwise_key, PairwiseKey};
use crate::error::CryptoResult;
use crate::group::{open_room_key, RoomKey, RoomKeyGrant};
use crate::keys::{Keypair, PrivateKey, PublicKey};

struct Entries<K, V> {
    map: HashMap<K, Arc<V>>,
    order: VecDeque<K>,
}

/// Bounded, thread-safe key cache with FIFO eviction.
pub struct KeyCache<K, V> {
    capacity: usize,
    entries: RwLock<Entries<K, V>>,
}

impl<K, V> KeyCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache with the given configuration.
    pub fn new(config: &KeyCacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Look up a cached key.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().map.get(key).cloned()
    }

    /// Return the cached value, or derive and cache it.
    ///
    /// If two callers race, both derive, the first insert wins, and both
    /// receive the winning value.
    pub fn get_or_try_insert_with<F>(&self, key: K, derive: F) -> CryptoResult<Arc<V>>
    where
        F: FnOnce() -> CryptoResult<V>,
    {
        if let Some(existing) = self.get(&key) {
            return Ok(existing);
        }

        let value = Arc::new(derive()?);
        if self.capacity == 0 {
            return Ok(value);
        }

        let mut entries = self.entries.write();
        if let Some(existing) = entries.map.get(&key) {
            return Ok(Arc::clone(existing));
        }

        while entries.order.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.map.remove(&oldest);
                }
                None => break,
            }
        }

        entries.order.push_back(key.clone());
        entries.map.insert(key, Arc::clone(&value));
        Ok(value)
    }

    /// Drop a cached key after the underlying key material changed.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut entries = self.entries.write();
        let removed = entries.map.remove(key).is_some();
        if removed {
            entries.order.retain(|k| k != key);
        }
        removed
    }

    /// Drop every cached key.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.map.clear();
        entries.order.clear();
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.read().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pairwise keys keyed by (local public key, remote public key).
pub type PairwiseKeyCache = KeyCache<(PublicKey, PublicKey), PairwiseKey>;

/// Opened room keys keyed by room id.
pub type RoomKeyCache = KeyCache<String, RoomKey>;

impl PairwiseKeyCache {
    /// Cached [`derive_pairwise_key`].
    ///
    /// Takes the local [`Keypair`] so a hit costs only a map lookup.
    pub fn pairwise_key(
        &self,
        local: &Keypair,
        remote_public: &PublicKey,
    ) -> CryptoResult<Arc<PairwiseKey>> {
        let pair = (local.public.clone(), remote_public.clone());
        if let Some(hit) = self.get(&pair) {
            return Ok(hit);
        }

        trace!(
            subsystem = "crypto",
            op = "pairwise_key",
            remote = %remote_public.to_address(),
            "Deriving pairwise key"
        );
        self.get_or_try_insert_with(pair, || derive_pairwise_key(&local.private, remote_public))
    }
}

impl RoomKeyCache {
    /// Cached [`open_room_key`].
    ///
    /// Invalidate the room when the caller's grant changes.
    pub fn room_key(
        &self,
        room_id: &str,
        grant: &RoomKeyGrant,
        recipient_private: &PrivateKey,
    ) -> CryptoResult<Arc<RoomKey>> {
        self.get_or_try_insert_with(room_id.to_string(), || {
            open_room_key(grant, recipient_private)
        })
    }
}
