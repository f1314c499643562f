//! An open-addressed, linear-probed hash table with tombstone deletion.
//!
//! Shared by the compiler (string interning while compiling) and the VM
//! (string interning at runtime, plus the globals map), so it lives in the
//! crate both depend on rather than in either one alone.

use crate::object::ObjHandle;
use crate::value::Value;

const MAX_LOAD: f64 = 0.75;
const INITIAL_CAPACITY: usize = 8;

#[derive(Clone, Copy)]
struct Entry {
    key: Option<ObjHandle>,
    value: Value,
}

/// `entries[i].key == None && entries[i].value == Nil` marks a truly empty
/// bucket; `key == None && value != Nil` marks a tombstone left by a delete.
pub struct Table {
    count: usize,
    entries: Vec<Entry>,
}

impl Default for Table {
    fn default() -> Self {
        Table {
            count: 0,
            entries: Vec::new(),
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, key: ObjHandle) -> Option<Value> {
        if self.entries.is_empty() {
            return None;
        }
        let index = find_entry(&self.entries, key);
        let entry = &self.entries[index];
        entry.key.is_some().then_some(entry.value)
    }

    /// Insert or overwrite `key`'s value. Returns `true` if this was a new
    /// key (as opposed to overwriting an existing live entry).
    pub fn set(&mut self, key: ObjHandle, value: Value) -> bool {
        if self.count + 1 > grow_threshold(self.entries.len()) {
            self.grow();
        }

        let index = find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        let was_new_key = entry.key.is_none();
        if was_new_key && matches!(entry.value, Value::Nil) {
            self.count += 1;
        }
        entry.key = Some(key);
        entry.value = value;
        was_new_key
    }

    /// Remove `key`, leaving a tombstone (`key=None, value=Bool(true)`) so
    /// later probes over this slot keep finding entries placed after it.
    pub fn delete(&mut self, key: ObjHandle) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let index = find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        if entry.key.is_none() {
            return false;
        }
        entry.key = None;
        entry.value = Value::Bool(true);
        true
    }

    /// Probe for the handle of an already-interned string with identical
    /// bytes, used only by interning to decide whether a new allocation is
    /// needed. The one place equality is checked structurally rather than
    /// by pointer identity.
    pub fn find_string(&self, bytes: &str, hash: u32) -> Option<ObjHandle> {
        if self.entries.is_empty() {
            return None;
        }
        let capacity = self.entries.len();
        let mut index = (hash as usize) & (capacity - 1);
        loop {
            let entry = &self.entries[index];
            match entry.key {
                Some(key) => {
                    if let Some(s) = key.as_string() {
                        if s.hash() == hash && s.as_str() == bytes {
                            return Some(key);
                        }
                    }
                }
                None => {
                    if matches!(entry.value, Value::Nil) {
                        return None;
                    }
                }
            }
            index = (index + 1) & (capacity - 1);
        }
    }

    fn grow(&mut self) {
        let new_capacity = (self.entries.len() * 2).max(INITIAL_CAPACITY);
        tracing::debug!(from = self.entries.len(), to = new_capacity, "growing table");
        let mut new_entries = vec![
            Entry {
                key: None,
                value: Value::Nil,
            };
            new_capacity
        ];
        self.count = 0;
        for entry in &self.entries {
            if let Some(key) = entry.key {
                let index = find_entry(&new_entries, key);
                new_entries[index] = Entry {
                    key: Some(key),
                    value: entry.value,
                };
                self.count += 1;
            }
        }
        self.entries = new_entries;
    }
}

fn grow_threshold(capacity: usize) -> f64 {
    capacity as f64 * MAX_LOAD
}

/// Probe `entries` for `key`'s bucket: its live entry if present, otherwise
/// the first tombstone seen (so a subsequent insert reuses it), otherwise
/// the first empty bucket. Keys are compared by pointer identity, valid
/// because every key a `Table` ever holds is interned.
fn find_entry(entries: &[Entry], key: ObjHandle) -> usize {
    let capacity = entries.len();
    let mut index = (key.hash_key() as usize) & (capacity - 1);
    let mut tombstone: Option<usize> = None;
    loop {
        let entry = &entries[index];
        match entry.key {
            Some(candidate) if candidate == key => return index,
            Some(_) => {}
            None => {
                if matches!(entry.value, Value::Nil) {
                    return tombstone.unwrap_or(index);
                } else if tombstone.is_none() {
                    tombstone = Some(index);
                }
            }
        }
        index = (index + 1) & (capacity - 1);
    }
}

/// Intern `bytes`: return the existing handle if an identical string is
/// already known, otherwise allocate, record, and prepend to `objects`.
pub fn intern_string(bytes: &str, strings: &mut Table, objects: &mut Option<ObjHandle>) -> ObjHandle {
    let hash = crate::object::fnv1a_hash(bytes.as_bytes());
    if let Some(existing) = strings.find_string(bytes, hash) {
        return existing;
    }
    let obj = crate::object::new_obj_string(bytes);
    let handle = ObjHandle::alloc(crate::object::ObjKind::String(obj), *objects);
    strings.set(handle, Value::Nil);
    *objects = Some(handle);
    handle
}
