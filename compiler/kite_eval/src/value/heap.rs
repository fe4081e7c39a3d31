//! Reference-counted handles for heap values.
//!
//! All shared runtime data goes through these two wrappers so construction
//! stays behind `Value` factory methods and identity checks have one home:
//! - `Heap<T>`: immutable sharing (strings, functions, errors)
//! - `Shared<T>`: shared with interior mutability (lists, dictionaries, scopes)
//!
//! Both are single-threaded (`Rc`); an evaluation session never crosses threads.
//!
//! Freeing a container never recurses into its elements: the last handle
//! detaches the children onto a work list and frees them one at a time, so a
//! list nested a million levels deep drops in constant stack.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::Value;

/// Immutable shared heap value.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    /// Allocate a new heap value.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this is the only handle to the allocation.
    #[inline]
    pub(crate) fn is_unique(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// Payload of a `Shared` cell that owns runtime values.
pub trait Teardown {
    /// Move every value this payload owns into `out`.
    fn take_children(&mut self, _out: &mut Vec<Value>) {}
}

impl Teardown for Vec<Value> {
    fn take_children(&mut self, out: &mut Vec<Value>) {
        out.append(self);
    }
}

/// Shared heap value with interior mutability.
///
/// Cloning the handle aliases the same cell: a list appended through one
/// handle is observed through every other.
#[repr(transparent)]
pub struct Shared<T: Teardown>(Rc<RefCell<T>>);

impl<T: Teardown> Shared<T> {
    /// Allocate a new shared cell.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the cell, used as an identity key by cycle guards.
    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Move the children out if this is the last handle.
    pub(crate) fn detach_children(&self, out: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.take_children(out);
        }
    }
}

impl<T: Teardown> Drop for Shared<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        release(pending);
    }
}

/// Free `pending` one value at a time.
///
/// A value's children are detached before the value itself drops, so each
/// drop only ever frees an empty container.
pub(crate) fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match &value {
            Value::List(items) => items.detach_children(&mut pending),
            Value::Dict(dict) => dict.detach_children(&mut pending),
            Value::Instance(instance) => instance.detach_members(&mut pending),
            Value::Function(func) if func.is_unique() => func.env().detach_bindings(&mut pending),
            _ => {}
        }
    }
}

impl<T: Teardown> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: Teardown> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_clone_shares_allocation() {
        let a = Heap::new(String::from("x"));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Heap::new(String::from("x"))));
    }

    #[test]
    fn shared_clone_aliases_mutation() {
        let a = Shared::new(vec![Value::int(1), Value::int(2)]);
        let b = a.clone();
        a.borrow_mut().push(Value::int(3));
        assert_eq!(b.borrow().len(), 3);
        assert_eq!(a.addr(), b.addr());
    }

    #[test]
    fn dropping_one_handle_keeps_children() {
        let a = Shared::new(vec![Value::list(vec![Value::int(1)])]);
        let b = a.clone();
        drop(a);
        assert_eq!(b.borrow()[0], Value::list(vec![Value::int(1)]));
    }

    #[test]
    fn heap_displays_its_payload() {
        assert_eq!(Heap::new(42).to_string(), "42");
    }
}
