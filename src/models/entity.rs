//! Normalized entity container used for all collections.
//!
//! `EntityState<T>` is the `{by_id, all_ids}` pair backing every store in
//! the crate: a map from id to record plus an ordered id list. The two are
//! kept in lockstep - each id appears in `all_ids` exactly once and always
//! resolves in `by_id`.
//!
//! Records are held behind `Arc` so a cloned state is a cheap snapshot:
//! replacing one record copies the map and that one record, never the
//! siblings. Callers holding an older state keep a consistent view, and
//! change detection reduces to pointer comparison on individual records.

use std::collections::HashMap;
use std::sync::Arc;

/// Key extraction for records stored in an [`EntityState`].
pub trait Identified {
    /// The unique, stable id of this record.
    fn id(&self) -> &str;
}

/// Normalized `{by_id, all_ids}` container.
#[derive(Debug)]
pub struct EntityState<T> {
    by_id: HashMap<String, Arc<T>>,
    all_ids: Vec<String>,
}

impl<T> Clone for EntityState<T> {
    fn clone(&self) -> Self {
        Self {
            by_id: self.by_id.clone(),
            all_ids: self.all_ids.clone(),
        }
    }
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            all_ids: Vec::new(),
        }
    }
}

impl<T: Identified> EntityState<T> {
    /// Create an empty state.
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            all_ids: Vec::new(),
        }
    }

    /// Build the normalized form from a list, preserving input order in
    /// `all_ids`. A duplicate id keeps its first occurrence.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut state = Self::new();
        for item in items {
            let id = item.id().to_string();
            if state.by_id.contains_key(&id) {
                tracing::warn!(id = %id, "duplicate id in entity list; keeping first");
                continue;
            }
            state.all_ids.push(id.clone());
            state.by_id.insert(id, Arc::new(item));
        }
        state
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(Arc::as_ref)
    }

    /// Look up a record by id, sharing ownership.
    pub fn get_arc(&self, id: &str) -> Option<Arc<T>> {
        self.by_id.get(id).cloned()
    }

    /// Whether a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.all_ids
    }

    /// Records in `all_ids` order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.all_ids
            .iter()
            .filter_map(|id| self.by_id.get(id).map(Arc::as_ref))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    /// Whether the state holds no records.
    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    /// Insert a new record at the front of `all_ids` (creation order is
    /// newest-first). An existing record with the same id is replaced in
    /// place instead, keeping its position.
    pub fn insert_front(&mut self, item: T) {
        let id = item.id().to_string();
        if self.by_id.contains_key(&id) {
            self.by_id.insert(id, Arc::new(item));
            return;
        }
        self.all_ids.insert(0, id.clone());
        self.by_id.insert(id, Arc::new(item));
    }

    /// Replace an existing record in place. Returns `false` (and stores
    /// nothing) when no record with that id exists.
    pub fn replace(&mut self, item: T) -> bool {
        let id = item.id();
        if !self.by_id.contains_key(id) {
            return false;
        }
        self.by_id.insert(id.to_string(), Arc::new(item));
        true
    }

    /// Copy-on-write replacement: a new state with exactly one record
    /// swapped, every other record shared with `self`. Returns `None` when
    /// no record with the item's id exists.
    pub fn with_replaced(&self, item: T) -> Option<Self> {
        if !self.by_id.contains_key(item.id()) {
            return None;
        }
        let mut next = self.clone();
        next.by_id.insert(item.id().to_string(), Arc::new(item));
        Some(next)
    }

    /// Check the normalization invariant: `all_ids` has no duplicates and
    /// matches the key set of `by_id` exactly.
    pub fn is_normalized(&self) -> bool {
        if self.all_ids.len() != self.by_id.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        self.all_ids
            .iter()
            .all(|id| seen.insert(id.as_str()) && self.by_id.contains_key(id))
    }
}
