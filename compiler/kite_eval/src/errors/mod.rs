//! Error types for evaluation.
//!
//! Every runtime failure is an `EvalError`: a typed `EvalErrorKind`, the
//! rendered message, and (once it has crossed a statement boundary) a
//! snapshot of the call stack where it first happened.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the data for each failure so callers can match on
//! the kind instead of parsing strings. Factory functions (e.g.
//! `undefined_name()`) are the public API; they populate both `kind` and
//! `message`. `EvalErrorKind::category()` gives the label printed in front of
//! the message (`TypeError`, `KeyError`, ...).

use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// How many arguments a callable accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgCount {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl ArgCount {
    /// Whether `got` arguments satisfy this count.
    pub fn accepts(self, got: usize) -> bool {
        match self {
            ArgCount::Exact(n) => got == n,
            ArgCount::Range(min, max) => (min..=max).contains(&got),
            ArgCount::AtLeast(min) => got >= min,
        }
    }
}

impl fmt::Display for ArgCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match *self {
            ArgCount::Exact(n) => write!(f, "exactly {n} {}", plural(n)),
            ArgCount::Range(min, max) => write!(f, "between {min} and {max} arguments"),
            ArgCount::AtLeast(n) => write!(f, "at least {n} {}", plural(n)),
        }
    }
}

/// Typed error category for structured diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Type/Operator
    BinaryTypeMismatch {
        op: &'static str,
        left: String,
        right: String,
    },
    UnaryTypeMismatch {
        op: &'static str,
        operand: String,
    },
    TypeMismatch {
        context: String,
        expected: String,
        got: String,
    },
    DivisionByZero,

    // Function
    ArityMismatch {
        name: String,
        expected: ArgCount,
        got: usize,
    },
    NotCallable {
        type_name: String,
    },
    RecursionLimit {
        depth: usize,
    },

    // Names and bindings
    UndefinedName {
        name: String,
    },
    ConstReassignment {
        name: String,
    },
    Redeclaration {
        name: String,
    },

    // Access
    UndefinedAttribute {
        type_name: String,
        attribute: String,
    },
    SuperAssignment,
    IndexOutOfRange {
        type_name: String,
        index: i64,
    },
    KeyNotFound {
        key: String,
    },
    Unhashable {
        type_name: String,
    },

    // Iteration
    NotIterable {
        type_name: String,
    },
    UnpackMismatch {
        expected: usize,
        got: usize,
    },

    // Classes
    UninitializedMember {
        class_name: String,
        member: String,
    },

    // Strings
    Format {
        message: String,
    },

    // Modules
    ModuleNotFound {
        path: String,
    },
    Io {
        path: String,
        message: String,
    },
    Parse {
        path: String,
        message: String,
    },

    /// Internal invariant violation; user input must never reach this.
    Unreachable {
        message: String,
    },

    /// Catch-all for errors that have no structured kind.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// Category label printed in front of the message.
    pub fn category(&self) -> &'static str {
        match self {
            Self::BinaryTypeMismatch { .. }
            | Self::UnaryTypeMismatch { .. }
            | Self::TypeMismatch { .. } => "TypeError",
            Self::DivisionByZero => "ZeroDivisionError",
            Self::ArityMismatch { .. } => "ArityError",
            Self::NotCallable { .. } => "NotCallableError",
            Self::RecursionLimit { .. } => "RecursionError",
            Self::UndefinedName { .. } => "NameError",
            Self::ConstReassignment { .. } => "ConstReassignmentError",
            Self::Redeclaration { .. } => "RedeclarationError",
            Self::UndefinedAttribute { .. } | Self::SuperAssignment => "AttributeError",
            Self::IndexOutOfRange { .. } => "IndexError",
            Self::KeyNotFound { .. } => "KeyError",
            Self::Unhashable { .. } => "UnhashableTypeError",
            Self::NotIterable { .. } => "NotIterableError",
            Self::UnpackMismatch { .. } => "UnpackError",
            Self::UninitializedMember { .. } => "UninitializedMemberError",
            Self::Format { .. } => "FormatError",
            Self::ModuleNotFound { .. } => "ModuleNotFoundError",
            Self::Io { .. } => "IOError",
            Self::Parse { .. } => "SyntaxError",
            Self::Unreachable { .. } => "Unreachable",
            Self::Custom { .. } => "Error",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryTypeMismatch { op, left, right } => {
                write!(f, "unsupported operand types for {op}: '{left}' and '{right}'")
            }
            Self::UnaryTypeMismatch { op, operand } => {
                write!(f, "bad operand type for unary {op}: '{operand}'")
            }
            Self::TypeMismatch {
                context,
                expected,
                got,
            } => write!(f, "{context} expects {expected}, got '{got}'"),
            Self::DivisionByZero => write!(f, "integer division or modulo by zero"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(f, "{name}() takes {expected} ({got} given)"),
            Self::NotCallable { type_name } => write!(f, "'{type_name}' object is not callable"),
            Self::RecursionLimit { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }
            Self::UndefinedName { name } => write!(f, "name '{name}' is not defined"),
            Self::ConstReassignment { name } => write!(f, "cannot assign to constant '{name}'"),
            Self::Redeclaration { name } => {
                write!(f, "'{name}' is already declared in this scope")
            }
            Self::UndefinedAttribute {
                type_name,
                attribute,
            } => write!(f, "'{type_name}' has no attribute '{attribute}'"),
            Self::SuperAssignment => write!(f, "super does not support set attribute"),
            Self::IndexOutOfRange { type_name, index } => {
                write!(f, "{type_name} index {index} out of range")
            }
            Self::KeyNotFound { key } => write!(f, "key not found: {key}"),
            Self::Unhashable { type_name } => write!(f, "unhashable type: '{type_name}'"),
            Self::NotIterable { type_name } => write!(f, "'{type_name}' object is not iterable"),
            Self::UnpackMismatch { expected, got } => {
                write!(f, "cannot unpack {got} values into {expected} targets")
            }
            Self::UninitializedMember { class_name, member } => {
                write!(f, "{class_name} does not initialize attribute '{member}'")
            }
            Self::Format { message }
            | Self::Unreachable { message }
            | Self::Custom { message } => write!(f, "{message}"),
            Self::ModuleNotFound { path } => write!(f, "no module found at '{path}'"),
            Self::Io { path, message } => write!(f, "cannot read '{path}': {message}"),
            Self::Parse { path, message } => write!(f, "cannot parse '{path}': {message}"),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// File the frame's code lives in.
    pub file: Rc<Path>,
    /// Line of the statement executing in this frame (0 when unknown).
    pub line: u32,
    /// Function or method name (`<module>` for top-level code).
    pub function: String,
}

/// Immutable snapshot of the call stack at the first fault.
///
/// Frames are ordered outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    /// Create a backtrace from a list of frames (outermost first).
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    /// Get the backtrace frames.
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    /// Check if the backtrace is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames in the backtrace.
    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            writeln!(
                f,
                "  File \"{}\", line {}, in {}",
                frame.file.display(),
                frame.line,
                frame.function
            )?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable error message (`kind.to_string()` for factory errors).
    pub message: String,
    /// Call stack at the first fault. Set once, never overwritten while unwinding.
    pub backtrace: Option<EvalBacktrace>,
}

/// Result of evaluation.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

impl EvalError {
    /// Create an error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            backtrace: None,
        }
    }

    /// Create an error from a structured kind.
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            backtrace: None,
        }
    }

    /// Category label (`TypeError`, `KeyError`, ...).
    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    /// Attach a backtrace unless one is already present (first fault wins).
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }
}

impl PartialEq for EvalError {
    /// Errors compare by kind; the backtrace is diagnostic metadata.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Operator Errors

/// Unsupported operand pair for a binary operator.
#[cold]
pub fn binary_type_mismatch(op: &'static str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Unsupported operand for a unary operator.
#[cold]
pub fn unary_type_mismatch(op: &'static str, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnaryTypeMismatch {
        op,
        operand: operand.to_string(),
    })
}

/// A value of the wrong type reached `context`.
#[cold]
pub fn type_mismatch(context: &str, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        context: context.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Integer division or modulo by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Shift by a negative count.
#[cold]
pub fn negative_shift_count() -> EvalError {
    EvalError {
        kind: EvalErrorKind::TypeMismatch {
            context: "shift".to_string(),
            expected: "a non-negative count".to_string(),
            got: "negative integer".to_string(),
        },
        message: "negative shift count".to_string(),
        backtrace: None,
    }
}

// Function Errors

/// Wrong number of arguments for a callable.
#[cold]
pub fn wrong_arg_count(name: &str, expected: ArgCount, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// Value is not callable.
#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Call depth limit exceeded.
#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

// Name Errors

/// Identifier not bound in any scope and not a builtin.
#[cold]
pub fn undefined_name(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedName {
        name: name.to_string(),
    })
}

/// Assignment to a constant binding or member.
#[cold]
pub fn const_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstReassignment {
        name: name.to_string(),
    })
}

/// Name declared twice in one scope or namespace.
#[cold]
pub fn redeclaration(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Redeclaration {
        name: name.to_string(),
    })
}

// Access Errors

/// Unknown member or method on a value.
#[cold]
pub fn no_such_attribute(type_name: &str, attribute: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedAttribute {
        type_name: type_name.to_string(),
        attribute: attribute.to_string(),
    })
}

/// Write to an attribute that can only be read (module exports).
#[cold]
pub fn read_only_attribute(type_name: &str, attribute: &str) -> EvalError {
    EvalError {
        kind: EvalErrorKind::UndefinedAttribute {
            type_name: type_name.to_string(),
            attribute: attribute.to_string(),
        },
        message: format!("'{type_name}' attribute '{attribute}' is read-only"),
        backtrace: None,
    }
}

/// Assignment through `super`.
#[cold]
pub fn super_assignment() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SuperAssignment)
}

/// Index outside the sequence.
#[cold]
pub fn index_out_of_range(type_name: &str, index: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange {
        type_name: type_name.to_string(),
        index,
    })
}

/// `pop()` on an empty list.
#[cold]
pub fn pop_from_empty_list() -> EvalError {
    EvalError {
        kind: EvalErrorKind::IndexOutOfRange {
            type_name: "list".to_string(),
            index: 0,
        },
        message: "pop from empty list".to_string(),
        backtrace: None,
    }
}

/// `pop(i)` with `i` outside the list.
#[cold]
pub fn pop_index_out_of_range(index: i64) -> EvalError {
    EvalError {
        kind: EvalErrorKind::IndexOutOfRange {
            type_name: "list".to_string(),
            index,
        },
        message: "pop index out of range".to_string(),
        backtrace: None,
    }
}

/// Missing dictionary key (named by its printable form).
#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

/// Value cannot be used as a dictionary key.
#[cold]
pub fn unhashable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unhashable {
        type_name: type_name.to_string(),
    })
}

// Iteration Errors

/// `for` over a value with no iterator.
#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

/// Loop target count differs from the step's arity.
#[cold]
pub fn unpack_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnpackMismatch { expected, got })
}

// Class Errors

/// Instance left a pending member unset after construction.
#[cold]
pub fn uninitialized_member(class_name: &str, member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UninitializedMember {
        class_name: class_name.to_string(),
        member: member.to_string(),
    })
}

// String Errors

/// Malformed format string or missing replacement argument.
#[cold]
pub fn format_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Format {
        message: message.into(),
    })
}

// Module Errors

/// Import target does not exist.
#[cold]
pub fn module_not_found(path: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuleNotFound {
        path: path.to_string(),
    })
}

/// Internal invariant violation.
#[cold]
pub fn unreachable(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unreachable {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests;
