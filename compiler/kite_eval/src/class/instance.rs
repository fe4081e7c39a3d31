//! Class instances.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use kite_ir::Name;

use super::Class;
use crate::errors::{
    const_reassignment, no_such_attribute, uninitialized_member, EvalError, EvalResult,
};
use crate::value::{release, Value};

/// Construction state of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceState {
    /// `__init__` is running; constant members are writable.
    Constructing,
    /// Construction finished; constant members are frozen.
    Ready,
}

/// Instance data.
pub struct InstanceValue {
    class: Class,
    /// `None` marks a declared member that still awaits a value.
    members: RefCell<FxHashMap<Name, Option<Value>>>,
    constants: FxHashSet<Name>,
    state: Cell<InstanceState>,
}

impl Drop for InstanceValue {
    fn drop(&mut self) {
        let members = self.members.get_mut().drain().filter_map(|(_, value)| value);
        release(members.collect());
    }
}

/// Shared handle to an instance.
#[derive(Clone)]
pub struct Instance(Rc<InstanceValue>);

impl Instance {
    /// Allocate an instance in the `Constructing` state with members copied
    /// from the class chain.
    pub fn new(class: Class) -> Instance {
        let (members, constants) = class.flatten_members();
        Instance(Rc::new(InstanceValue {
            class,
            members: RefCell::new(members),
            constants,
            state: Cell::new(InstanceState::Constructing),
        }))
    }

    pub fn class(&self) -> &Class {
        &self.0.class
    }

    pub fn state(&self) -> InstanceState {
        self.0.state.get()
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Move the member values into `out` if this is the last handle.
    pub(crate) fn detach_members(&self, out: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        if let Ok(mut members) = self.0.members.try_borrow_mut() {
            out.extend(members.drain().filter_map(|(_, value)| value));
        }
    }

    /// Move to `Ready` and reject the instance if a member is still pending.
    pub fn finish_construction(&self) -> Result<(), EvalError> {
        self.0.state.set(InstanceState::Ready);
        let members = self.0.members.borrow();
        let mut pending: Vec<&str> = members
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.as_str())
            .collect();
        pending.sort_unstable();
        match pending.first() {
            Some(member) => Err(uninitialized_member(self.0.class.name(), member)),
            None => Ok(()),
        }
    }

    /// Read an instance member. A pending member reads as `null`.
    pub fn member(&self, name: &str) -> Option<Value> {
        self.0
            .members
            .borrow()
            .get(name)
            .map(|value| value.clone().unwrap_or(Value::Null))
    }

    /// Attribute read: instance members, instance methods, class members,
    /// class methods.
    pub fn get_attribute(&self, name: &str) -> EvalResult {
        if let Some(value) = self.member(name) {
            return Ok(value);
        }
        let class = &self.0.class;
        if let Some((function, owner)) = class.find_instance_method(name) {
            return Ok(Value::bound_method(
                Value::Instance(self.clone()),
                function,
                owner,
            ));
        }
        if let Some(value) = class.class_member(name) {
            return Ok(value);
        }
        if let Some((function, owner)) = class.find_class_method(name) {
            return Ok(Value::bound_method(
                Value::Class(class.clone()),
                function,
                owner,
            ));
        }
        Err(no_such_attribute(class.name(), name))
    }

    /// Attribute write.
    ///
    /// Declared instance members are writable; constant ones only while
    /// constructing. A name that is only a class member writes the shared
    /// class slot.
    pub fn set_attribute(&self, name: &str, value: Value) -> Result<(), EvalError> {
        {
            let mut members = self.0.members.borrow_mut();
            if let Some(slot) = members.get_mut(name) {
                if self.0.constants.contains(name) && self.state() == InstanceState::Ready {
                    return Err(const_reassignment(name));
                }
                *slot = Some(value);
                return Ok(());
            }
        }
        if self.0.class.find_class_member_owner(name).is_some() {
            return self.0.class.set_class_member(name, value);
        }
        Err(no_such_attribute(self.0.class.name(), name))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.0.class.name())
    }
}
