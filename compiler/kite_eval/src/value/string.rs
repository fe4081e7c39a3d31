//! String payload with a precomputed code-point length.
//!
//! Kite indexes strings by code point, so the length is computed once at
//! construction instead of on every `len()` or negative-index normalization.

use std::fmt;
use std::ops::Deref;

/// Immutable string contents.
#[derive(Clone, PartialEq, Eq)]
pub struct StrValue {
    text: String,
    char_len: usize,
}

impl StrValue {
    /// Wrap text, counting its code points.
    pub fn new(text: String) -> Self {
        let char_len = text.chars().count();
        StrValue { text, char_len }
    }

    /// The text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of code points.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Code point at `index`, if in range.
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.char_len {
            return None;
        }
        if self.text.len() == self.char_len {
            // ASCII fast path
            return self.text.as_bytes().get(index).map(|b| char::from(*b));
        }
        self.text.chars().nth(index)
    }
}

impl Deref for StrValue {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for StrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_code_points_not_bytes() {
        let s = StrValue::new("héllo".to_string());
        assert_eq!(s.char_len(), 5);
        assert_eq!(s.len(), 6);
        assert_eq!(s.char_at(1), Some('é'));
        assert_eq!(s.char_at(5), None);
    }

    #[test]
    fn ascii_fast_path() {
        let s = StrValue::new("abc".to_string());
        assert_eq!(s.char_at(2), Some('c'));
    }
}
