//! Dictionary keys.
//!
//! A `HashKey` is the pair (type tag, 64-bit digest). Only integers, strings,
//! booleans and null produce one; every container and object type is
//! unhashable.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::{TypeTag, Value};
use crate::errors::{unhashable, EvalError};

/// Key under which a dictionary stores an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: TypeTag,
    digest: u64,
}

impl HashKey {
    /// The type tag of the original key.
    pub fn tag(self) -> TypeTag {
        self.tag
    }

    /// The 64-bit digest.
    pub fn digest(self) -> u64 {
        self.digest
    }
}

impl Value {
    /// Derive the dictionary key for this value.
    ///
    /// Integers hash by value, strings by content digest, booleans by
    /// identity (0/1), null to a fixed zero.
    pub fn hash_key(&self) -> Result<HashKey, EvalError> {
        let digest = match self {
            Value::Int(n) => u64::from_ne_bytes(n.to_ne_bytes()),
            Value::Str(s) => {
                let mut hasher = FxHasher::default();
                s.as_str().hash(&mut hasher);
                hasher.finish()
            }
            Value::Bool(b) => u64::from(*b),
            Value::Null => 0,
            _ => return Err(unhashable(self.type_name())),
        };
        Ok(HashKey {
            tag: self.tag(),
            digest,
        })
    }

    /// Whether `hash_key` succeeds for this value.
    pub fn is_hashable(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Str(_) | Value::Bool(_) | Value::Null
        )
    }
}
