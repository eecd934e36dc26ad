//! Local copy of a backend list, owned by a single controller.

use crate::types::{Identified, RecordId};

/// Ordered records mirrored from the backend. Authoritative only until the
/// next successful fetch or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCache<T> {
    items: Vec<T>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> ListCache<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Returns whether a record with `id` was present.
    pub fn remove_by_id(&mut self, id: RecordId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Swap in `item` where its id already sits. Unknown ids are ignored.
    pub fn replace_by_id(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }
}
