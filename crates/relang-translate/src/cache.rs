//! Caller-owned cache of translator outcomes.
//!
//! Building a translator is the only costly operation of the engine, so
//! callers that translate many records keep a [`TranslatorCache`] keyed by
//! the (old, new) language versions. Entries remember the fingerprints of
//! the descriptors they were built from; a request with different
//! descriptor content under the same versions rebuilds the entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use relang_model::{Fingerprint, LanguageDescriptor, VersionKey};

use crate::factory::{build_translator, Feasibility};

type PairKey = (VersionKey, VersionKey);

#[derive(Debug)]
struct CacheEntry {
    old_fingerprint: Fingerprint,
    new_fingerprint: Fingerprint,
    outcome: Arc<Feasibility>,
}

impl CacheEntry {
    fn matches(&self, old: &LanguageDescriptor, new: &LanguageDescriptor) -> bool {
        &self.old_fingerprint == old.fingerprint() && &self.new_fingerprint == new.fingerprint()
    }
}

/// Translator outcomes keyed by (old version, new version).
#[derive(Debug, Default)]
pub struct TranslatorCache {
    entries: RwLock<HashMap<PairKey, CacheEntry>>,
}

impl TranslatorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached outcome for a version pair, if any.
    pub fn get(&self, old: &VersionKey, new: &VersionKey) -> Option<Arc<Feasibility>> {
        self.entries
            .read()
            .get(&(old.clone(), new.clone()))
            .map(|entry| Arc::clone(&entry.outcome))
    }

    /// The outcome for `old -> new`, building and caching it on first use.
    ///
    /// Unsupported outcomes are cached too.
    pub fn get_or_build(
        &self,
        old: &Arc<LanguageDescriptor>,
        new: &Arc<LanguageDescriptor>,
    ) -> Arc<Feasibility> {
        let key = (old.version_key(), new.version_key());

        if let Some(entry) = self.entries.read().get(&key) {
            if entry.matches(old, new) {
                return Arc::clone(&entry.outcome);
            }
            log::warn!(
                "descriptor content for {} -> {} changed (old {}, new {}); rebuilding",
                key.0,
                key.1,
                old.fingerprint().short(),
                new.fingerprint().short()
            );
        }

        let outcome = Arc::new(build_translator(Arc::clone(old), Arc::clone(new)));

        let mut entries = self.entries.write();
        // Another caller may have built the same pair while we were building.
        if let Some(existing) = entries.get(&key) {
            if existing.matches(old, new) {
                return Arc::clone(&existing.outcome);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                old_fingerprint: old.fingerprint().clone(),
                new_fingerprint: new.fingerprint().clone(),
                outcome: Arc::clone(&outcome),
            },
        );
        outcome
    }

    /// Drop the entry for a version pair. Returns whether one existed.
    pub fn invalidate(&self, old: &VersionKey, new: &VersionKey) -> bool {
        self.entries
            .write()
            .remove(&(old.clone(), new.clone()))
            .is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
