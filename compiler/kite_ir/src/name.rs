//! Identifier names.
//!
//! Provides a cheap-to-clone, hashable identifier shared between the tree
//! and the runtime namespaces that key on it.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// Identifier in a Kite program.
///
/// Cloning is a reference-count bump; equality and hashing are by content,
/// so two `Name`s built from the same text are interchangeable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(Rc<str>);

impl Name {
    /// Create a name from its text.
    #[inline]
    pub fn new(text: &str) -> Self {
        Name(Rc::from(text))
    }

    /// The identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Name(Rc::from(text))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
