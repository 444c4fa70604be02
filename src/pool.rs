use log::warn;
use slotmap::{Key, SlotMap};

struct Entry<T> {
    refs: i32,
    value: T,
}

/// Deferred-reclamation registry of reference-counted values.
///
/// `release()` never deletes synchronously: it only drops the count and
/// marks the pool dirty. Entries whose count reached zero stay readable
/// until the host calls `flush()` at the end of the frame, so raw borrows
/// taken earlier in the same frame cannot dangle. Handles are versioned
/// slotmap keys: a handle to a swept entry reads as `None` and can never
/// alias a later insertion.
pub struct Pool<K: Key, T> {
    entries: SlotMap<K, Entry<T>>,
    dirty: bool,
}

impl<K: Key, T> Pool<K, T> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            dirty: false,
        }
    }

    /// Registers `value` with a reference count of 1.
    pub fn insert(&mut self, value: T) -> K {
        self.entries.insert(Entry {
            refs: 1,
            value,
        })
    }

    pub fn get(&self, k: K) -> Option<&T> {
        self.entries.get(k).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, k: K) -> Option<&mut T> {
        self.entries.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains(&self, k: K) -> bool {
        self.entries.contains_key(k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retain(&mut self, k: K) {
        match self.entries.get_mut(k) {
            Some(e) => {
                debug_assert!(e.refs > 0, "retain of entry {:?} pending sweep", k);
                e.refs += 1;
            }
            None => warn!("retain of dead entry {:?}", k),
        }
    }

    /// Drops one reference. The entry is swept by the next `flush()` once
    /// its count is zero; until then it stays readable.
    pub fn release(&mut self, k: K) {
        match self.entries.get_mut(k) {
            Some(e) => {
                debug_assert!(e.refs > 0, "release of entry {:?} past zero", k);
                e.refs -= 1;
                self.dirty = true;
            }
            None => warn!("release of dead entry {:?}", k),
        }
    }

    /// Sweeps every unreferenced entry. Returns the number of entries
    /// deleted; a flush with nothing released since the last one is a no-op.
    pub fn flush(&mut self) -> usize {
        if !self.dirty {
            return 0;
        }
        self.dirty = false;
        let before = self.entries.len();
        self.entries.retain(|_, e| e.refs > 0);
        before - self.entries.len()
    }
}

impl<K: Key, T> Default for Pool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
