//! Call stack tracking and traceback rendering.
//!
//! This module provides:
//! - `CallStack` / `CallFrame`: live frames (file, current line, function)
//! - `SourceMap`: source text by path, for quoting lines in tracebacks
//! - `render_traceback`: the printed form of an error with its backtrace
//!
//! The interpreter pushes a frame per function call and per module body, and
//! updates the frame's line before each statement. The first error of a run
//! snapshots the stack into an `EvalBacktrace`; later errors raised while
//! unwinding keep that snapshot.

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// Function name recorded for top-level module code.
pub const MODULE_FRAME_NAME: &str = "<module>";

/// A single frame in the live call stack.
#[derive(Clone, Debug)]
pub struct CallFrame {
    pub file: Rc<Path>,
    /// Line of the statement currently executing (0 before the first one).
    pub line: u32,
    pub function: Rc<str>,
}

impl CallFrame {
    pub fn new(file: Rc<Path>, function: impl Into<Rc<str>>) -> Self {
        CallFrame {
            file,
            line: 0,
            function: function.into(),
        }
    }

    /// Frame for the top-level code of `file`.
    pub fn module(file: Rc<Path>) -> Self {
        Self::new(file, MODULE_FRAME_NAME)
    }
}

/// Live call stack for one interpreter session.
///
/// The depth check is integrated into `push()`.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// Create an empty stack. `None` disables the depth limit.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent frame.
    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[inline]
    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Record the line of the statement about to execute.
    #[inline]
    pub fn set_line(&mut self, line: u32) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line = line;
        }
    }

    /// File of the innermost frame.
    pub fn current_file(&self) -> Option<Rc<Path>> {
        self.frames.last().map(|frame| Rc::clone(&frame.file))
    }

    /// Snapshot the stack, outermost frame first.
    pub fn capture(&self) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .map(|frame| BacktraceFrame {
                file: Rc::clone(&frame.file),
                line: frame.line,
                function: frame.function.to_string(),
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a snapshot of this stack to `err` unless it already has one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Source text by file path.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    sources: FxHashMap<PathBuf, Rc<str>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: Rc<str>) {
        self.sources.insert(path.into(), source);
    }

    pub fn get(&self, path: &Path) -> Option<&Rc<str>> {
        self.sources.get(path)
    }

    /// Line `line` (1-based) of `path`, without surrounding whitespace.
    pub fn line(&self, path: &Path, line: u32) -> Option<&str> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.sources
            .get(path)?
            .lines()
            .nth(index)
            .map(str::trim)
    }
}

/// Render an error the way a script run reports it.
///
/// ```text
/// Traceback (most recent call last):
///   File "main.kite", line 4, in <module>
///     f()
///   File "main.kite", line 2, in f
///     return 1 / 0
/// ZeroDivisionError: integer division or modulo by zero
/// ```
pub fn render_traceback(err: &EvalError, sources: &SourceMap) -> String {
    let mut out = String::new();
    if let Some(backtrace) = err.backtrace.as_ref().filter(|bt| !bt.is_empty()) {
        out.push_str("Traceback (most recent call last):\n");
        for frame in backtrace.frames() {
            let _ = writeln!(
                out,
                "  File \"{}\", line {}, in {}",
                frame.file.display(),
                frame.line,
                frame.function
            );
            if let Some(text) = sources.line(&frame.file, frame.line) {
                if !text.is_empty() {
                    let _ = writeln!(out, "    {text}");
                }
            }
        }
    }
    let _ = write!(out, "{err}");
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
