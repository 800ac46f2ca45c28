use std::collections::HashMap;

use astrarium_core::{Category, GenerationContext, ObjectId};

use crate::compat::retain_universe;
use crate::error::PersistError;
use crate::format::{decode_records, encode_records, DISCOVERIES_KEY, LIFETIME_KEY};
use crate::kv::KeyValueStore;
use crate::record::DiscoveryRecord;
use crate::session::{load_context, save_context};

/// Single source of truth for "was this object ever discovered" in the
/// current universe, plus an append-only log across all universes.
///
/// Writes go through to the optional backing store. Backing failures are
/// logged and never surface; the in-memory state stays authoritative for the
/// session.
pub struct DiscoveryStore {
    records: HashMap<ObjectId, DiscoveryRecord>,
    lifetime: Vec<DiscoveryRecord>,
    backing: Option<Box<dyn KeyValueStore>>,
}

impl std::fmt::Debug for DiscoveryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryStore")
            .field("records", &self.records.len())
            .field("lifetime", &self.lifetime.len())
            .field("backed", &self.backing.is_some())
            .finish()
    }
}

impl Default for DiscoveryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DiscoveryStore {
    /// Store without durable backing.
    pub fn in_memory() -> Self {
        Self {
            records: HashMap::new(),
            lifetime: Vec::new(),
            backing: None,
        }
    }

    /// Store writing through to `backing`. Nothing is loaded; see `load`.
    pub fn with_backing(backing: Box<dyn KeyValueStore>) -> Self {
        Self {
            backing: Some(backing),
            ..Self::in_memory()
        }
    }

    pub fn is_backed(&self) -> bool {
        self.backing.is_some()
    }

    /// Replace in-memory state with what the backing holds for
    /// `universe_seed`. Absent data means first run; malformed data is
    /// ignored. Returns warnings describing anything ignored.
    pub fn load(&mut self, universe_seed: u32) -> Vec<String> {
        let mut warnings = Vec::new();
        self.records.clear();
        self.lifetime.clear();
        let Some(backing) = self.backing.as_deref() else {
            return warnings;
        };

        match read_records(backing, DISCOVERIES_KEY) {
            Ok(records) => {
                let (kept, mut dropped) = retain_universe(records, universe_seed);
                warnings.append(&mut dropped);
                self.records = kept.into_iter().map(|r| (r.id.clone(), r)).collect();
            }
            Err(e) => warnings.push(format!("Ignoring stored discoveries: {e}")),
        }
        match read_records(backing, LIFETIME_KEY) {
            Ok(records) => self.lifetime = records,
            Err(e) => warnings.push(format!("Ignoring stored lifetime log: {e}")),
        }

        for warning in &warnings {
            log::warn!("{warning}");
        }
        log::info!(
            "Restored {} discoveries ({} lifetime) for universe {}",
            self.records.len(),
            self.lifetime.len(),
            universe_seed
        );
        warnings
    }

    /// Whether `id` has been discovered. Unknown identities are simply
    /// undiscovered.
    pub fn has(&self, id: &ObjectId) -> bool {
        self.records.get(id).is_some_and(|r| r.discovered)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&DiscoveryRecord> {
        self.records.get(id)
    }

    /// Record a discovery. The first record for an identity wins; later puts
    /// for the same identity are ignored. Returns whether it was inserted.
    pub fn put(&mut self, record: DiscoveryRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.lifetime.push(record.clone());
        self.records.insert(record.id.clone(), record);
        self.persist_records();
        true
    }

    /// Every current-universe record, oldest first.
    pub fn all_records(&self) -> Vec<&DiscoveryRecord> {
        let mut all: Vec<&DiscoveryRecord> = self.records.values().collect();
        all.sort_by(|a, b| {
            a.timestamp_ms
                .cmp(&b.timestamp_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        all
    }

    /// Current-universe records of one category, oldest first.
    pub fn records_for(&self, category: Category) -> Vec<&DiscoveryRecord> {
        self.all_records()
            .into_iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Every discovery in every universe, in discovery order.
    pub fn lifetime_records(&self) -> &[DiscoveryRecord] {
        &self.lifetime
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget current-universe discoveries. The lifetime log is kept.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist_records();
    }

    /// Stored generation context, or `fallback` when absent or unreadable.
    pub fn load_context(&self, fallback: GenerationContext) -> GenerationContext {
        let Some(backing) = self.backing.as_deref() else {
            return fallback;
        };
        let (context, warnings) = load_context(backing, fallback);
        for warning in warnings {
            log::warn!("{warning}");
        }
        context
    }

    /// Persist the generation context. Failures are logged.
    pub fn save_context(&mut self, context: &GenerationContext) {
        if let Some(backing) = self.backing.as_deref_mut() {
            if let Err(e) = save_context(backing, context) {
                log::warn!("Failed to persist universe seed: {e}");
            }
        }
    }

    /// Write both record lists to the backing store.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        let Some(backing) = self.backing.as_deref_mut() else {
            return Ok(());
        };
        let mut current: Vec<DiscoveryRecord> = self.records.values().cloned().collect();
        current.sort_by(|a, b| a.id.cmp(&b.id));
        backing.set(DISCOVERIES_KEY, &encode_records(&current)?)?;
        backing.set(LIFETIME_KEY, &encode_records(&self.lifetime)?)
    }

    fn persist_records(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("Discovery state not persisted, keeping in-memory copy: {e}");
        }
    }
}

fn read_records(
    backing: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<DiscoveryRecord>, PersistError> {
    match backing.get(key)? {
        None => Ok(Vec::new()),
        Some(text) => decode_records(key, &text),
    }
}
