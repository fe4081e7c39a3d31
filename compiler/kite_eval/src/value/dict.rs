//! Dictionary storage.

use rustc_hash::FxHashMap;

use super::{HashKey, Teardown, Value};
use crate::errors::EvalError;

/// One dictionary entry: the original key value and the mapped value.
#[derive(Clone, Debug)]
pub struct DictEntry {
    pub key: Value,
    pub value: Value,
}

/// Mapping from `HashKey` to the original key and its value.
///
/// Iteration order is unspecified.
#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: FxHashMap<HashKey, DictEntry>,
}

impl Dict {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the entry for `key`. Fails if `key` is unhashable.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), EvalError> {
        let hash = key.hash_key()?;
        self.entries.insert(hash, DictEntry { key, value });
        Ok(())
    }

    /// Look up by precomputed key.
    pub fn get(&self, key: &HashKey) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Look up by key value. Fails if `key` is unhashable.
    pub fn lookup(&self, key: &Value) -> Result<Option<&Value>, EvalError> {
        let hash = key.hash_key()?;
        Ok(self.get(&hash))
    }

    /// Look up a string key (attribute-style access).
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        // Building the key cannot fail for a string.
        Value::string(key)
            .hash_key()
            .ok()
            .and_then(|hash| self.get(&hash))
    }

    /// All entries.
    pub fn iter(&self) -> impl Iterator<Item = &DictEntry> {
        self.entries.values()
    }

    /// Entry for a precomputed key.
    pub fn entry(&self, key: &HashKey) -> Option<&DictEntry> {
        self.entries.get(key)
    }
}

impl Teardown for Dict {
    fn take_children(&mut self, out: &mut Vec<Value>) {
        for (_, entry) in self.entries.drain() {
            out.push(entry.key);
            out.push(entry.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut dict = Dict::new();
        dict.insert(Value::string("a"), Value::int(1)).ok();
        dict.insert(Value::int(2), Value::int(3)).ok();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get_str("a"), Some(&Value::int(1)));
        assert!(matches!(dict.lookup(&Value::int(2)), Ok(Some(v)) if *v == Value::int(3)));
    }

    #[test]
    fn replace_keeps_single_entry() {
        let mut dict = Dict::new();
        dict.insert(Value::int(1), Value::int(1)).ok();
        dict.insert(Value::int(1), Value::int(2)).ok();
        assert_eq!(dict.len(), 1);
        assert!(matches!(dict.lookup(&Value::int(1)), Ok(Some(v)) if *v == Value::int(2)));
    }

    #[test]
    fn same_digest_different_type_are_distinct() {
        let mut dict = Dict::new();
        dict.insert(Value::int(1), Value::string("int")).ok();
        dict.insert(Value::Bool(true), Value::string("bool")).ok();
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn unhashable_key_is_rejected() {
        let mut dict = Dict::new();
        let err = dict.insert(Value::list(vec![]), Value::Null);
        assert!(err.is_err());
        assert!(dict.lookup(&Value::list(vec![])).is_err());
    }
}
