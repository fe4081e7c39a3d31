//! For-in iteration protocol.
//!
//! Lists are walked live by index, so appending inside the loop body extends
//! the iteration. Strings yield one-character strings. Dictionaries are
//! snapshotted as `(key, value)` pairs when the loop starts.

use super::{Interpreter, ITER_METHOD};
use crate::errors::{not_iterable, type_mismatch, EvalResult};
use crate::value::{Shared, Value};

/// One iteration step.
#[derive(Clone, Debug, PartialEq)]
pub enum IterStep {
    Single(Value),
    Pair(Value, Value),
}

impl IterStep {
    /// The values to bind against the loop targets.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            IterStep::Single(value) => vec![value],
            IterStep::Pair(first, second) => vec![first, second],
        }
    }
}

/// Iterator over an iterable value.
pub enum ValueIter {
    List {
        items: Shared<Vec<Value>>,
        index: usize,
    },
    Chars(std::vec::IntoIter<char>),
    Entries(std::vec::IntoIter<(Value, Value)>),
}

impl Iterator for ValueIter {
    type Item = IterStep;

    fn next(&mut self) -> Option<IterStep> {
        match self {
            ValueIter::List { items, index } => {
                let item = items.borrow().get(*index).cloned()?;
                *index += 1;
                Some(IterStep::Single(item))
            }
            ValueIter::Chars(chars) => chars
                .next()
                .map(|c| IterStep::Single(Value::string(c.to_string()))),
            ValueIter::Entries(entries) => entries
                .next()
                .map(|(key, value)| IterStep::Pair(key, value)),
        }
    }
}

impl ValueIter {
    /// Iterator over a builtin iterable, or `None` for any other value.
    pub fn over(subject: &Value) -> Option<ValueIter> {
        match subject {
            Value::List(items) => Some(ValueIter::List {
                items: items.clone(),
                index: 0,
            }),
            Value::Str(s) => Some(ValueIter::Chars(
                s.as_str().chars().collect::<Vec<_>>().into_iter(),
            )),
            Value::Dict(dict) => {
                let entries = dict
                    .borrow()
                    .iter()
                    .map(|entry| (entry.key.clone(), entry.value.clone()))
                    .collect::<Vec<_>>();
                Some(ValueIter::Entries(entries.into_iter()))
            }
            _ => None,
        }
    }
}

impl Interpreter {
    /// Obtain an iterator from `subject`.
    ///
    /// An instance is iterable when its class chain defines `__iter__()`,
    /// which must return a list, dictionary or string.
    pub(crate) fn iterate(&mut self, subject: &Value) -> EvalResult<ValueIter> {
        if let Some(iter) = ValueIter::over(subject) {
            return Ok(iter);
        }
        let Value::Instance(instance) = subject else {
            return Err(not_iterable(subject.type_name()));
        };
        if instance.class().find_instance_method(ITER_METHOD).is_none() {
            return Err(not_iterable(instance.class().name()));
        }

        let hook = instance.get_attribute(ITER_METHOD)?;
        let produced = self.call_value(&hook, Vec::new())?;
        ValueIter::over(&produced).ok_or_else(|| {
            type_mismatch(
                ITER_METHOD,
                "list, dictionary or string",
                produced.type_name(),
            )
        })
    }
}
