use super::*;
use crate::errors::{division_by_zero, EvalErrorKind};
use pretty_assertions::assert_eq;

fn file(name: &str) -> Rc<Path> {
    Rc::from(Path::new(name))
}

#[test]
fn push_respects_max_depth() {
    let mut stack = CallStack::new(Some(2));
    assert!(stack.push(CallFrame::module(file("main.kite"))).is_ok());
    assert!(stack.push(CallFrame::new(file("main.kite"), "f")).is_ok());
    let err = stack.push(CallFrame::new(file("main.kite"), "f"));
    assert_eq!(
        err.map_err(|e| e.kind),
        Err(EvalErrorKind::RecursionLimit { depth: 2 })
    );
    assert_eq!(stack.depth(), 2);
}

#[test]
fn unlimited_stack() {
    let mut stack = CallStack::default();
    for _ in 0..5000 {
        assert!(stack.push(CallFrame::new(file("a.kite"), "f")).is_ok());
    }
    assert_eq!(stack.depth(), 5000);
}

#[test]
fn set_line_updates_innermost_frame() {
    let mut stack = CallStack::new(None);
    stack.push(CallFrame::module(file("main.kite"))).unwrap();
    stack.set_line(7);
    stack.push(CallFrame::new(file("lib.kite"), "g")).unwrap();
    stack.set_line(2);

    let bt = stack.capture();
    let lines: Vec<(u32, &str)> = bt
        .frames()
        .iter()
        .map(|f| (f.line, f.function.as_str()))
        .collect();
    assert_eq!(lines, vec![(7, "<module>"), (2, "g")]);

    stack.pop();
    assert_eq!(stack.current_frame().map(|f| f.line), Some(7));
    assert_eq!(stack.current_file(), Some(file("main.kite")));
}

#[test]
fn attach_keeps_first_snapshot() {
    let mut stack = CallStack::new(None);
    stack.push(CallFrame::module(file("main.kite"))).unwrap();
    stack.set_line(3);
    let err = stack.attach_backtrace(division_by_zero());

    stack.set_line(9);
    let err = stack.attach_backtrace(err);
    let lines: Vec<u32> = err
        .backtrace
        .map(|bt| bt.frames().iter().map(|f| f.line).collect())
        .unwrap_or_default();
    assert_eq!(lines, vec![3]);
}

#[test]
fn empty_stack_attaches_nothing() {
    let stack = CallStack::new(None);
    assert!(stack.attach_backtrace(division_by_zero()).backtrace.is_none());
}

#[test]
fn source_map_lines_are_one_based() {
    let mut sources = SourceMap::new();
    sources.insert("main.kite", Rc::from("var a = 1\n  f(a)\n"));
    assert_eq!(sources.line(Path::new("main.kite"), 1), Some("var a = 1"));
    assert_eq!(sources.line(Path::new("main.kite"), 2), Some("f(a)"));
    assert_eq!(sources.line(Path::new("main.kite"), 0), None);
    assert_eq!(sources.line(Path::new("main.kite"), 3), None);
    assert_eq!(sources.line(Path::new("other.kite"), 1), None);
}

#[test]
fn traceback_quotes_known_source_lines() {
    let mut stack = CallStack::new(None);
    stack.push(CallFrame::module(file("main.kite"))).unwrap();
    stack.set_line(3);
    stack.push(CallFrame::new(file("main.kite"), "f")).unwrap();
    stack.set_line(2);
    let err = stack.attach_backtrace(division_by_zero());

    let mut sources = SourceMap::new();
    sources.insert(
        "main.kite",
        Rc::from("fn f() {\n    return 1 / 0\n}\nf()\n"),
    );
    // line 3 of the module is "}" and line 2 of f is the return
    assert_eq!(
        render_traceback(&err, &sources),
        "Traceback (most recent call last):\n  File \"main.kite\", line 3, in <module>\n    }\n  File \"main.kite\", line 2, in f\n    return 1 / 0\nZeroDivisionError: integer division or modulo by zero"
    );
}

#[test]
fn traceback_without_frames_is_just_the_error() {
    let err = division_by_zero();
    assert_eq!(
        render_traceback(&err, &SourceMap::new()),
        "ZeroDivisionError: integer division or modulo by zero"
    );
}
