use super::*;
use crate::print_handler::buffer_handler;
use crate::test_helpers::{numbered, TestSession, MAIN_FILE};
use kite_ir::ast::build::*;
use kite_ir::BinaryOp;
use pretty_assertions::assert_eq;

#[test]
fn default_builder_limits_recursion() {
    let interp = InterpreterBuilder::new().build();
    assert_eq!(
        interp.call_stack.max_depth(),
        Some(DEFAULT_MAX_RECURSION_DEPTH)
    );
    assert!(interp.root_class().is_root());
    assert_eq!(interp.call_depth(), 0);
}

#[test]
fn print_goes_to_configured_handler() {
    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new()
        .print_handler(handler.clone())
        .build();
    let env = interp.new_module_environment(MAIN_FILE);
    let program = program(vec![expr(call(
        ident("print"),
        vec![string("a"), int(1), list(vec![string("b")])],
    ))]);

    let value = interp.evaluate(&program, &env);
    assert_eq!(value, Value::Null);
    assert_eq!(handler.output(), "a 1 [\"b\"]\n");
}

#[test]
fn evaluate_returns_error_value() {
    let mut interp = InterpreterBuilder::new().print_handler(buffer_handler()).build();
    let env = interp.new_module_environment(MAIN_FILE);
    let value = interp.evaluate(&program(vec![expr(ident("missing"))]), &env);
    assert!(crate::is_error_value(&value));
    assert_eq!(value.to_string(), "NameError: name 'missing' is not defined");
}

#[test]
fn bindings_persist_across_runs_in_one_environment() {
    let mut session = TestSession::new();
    session.run(vec![var("a", int(2))]).unwrap();
    let value = session
        .run(vec![expr(binary(ident("a"), BinaryOp::Mul, int(21)))])
        .unwrap();
    assert_eq!(value, Value::int(42));
}

#[test]
fn unregistered_environment_runs_as_script() {
    let mut interp = InterpreterBuilder::new().print_handler(buffer_handler()).build();
    let env = Environment::new();
    let err = interp
        .try_evaluate(
            &program(numbered(vec![expr(binary(int(1), BinaryOp::Div, int(0)))])),
            &env,
        )
        .unwrap_err();
    let trace = interp.exception_trace().unwrap();
    assert_eq!(trace.frames()[0].file.to_str(), Some(SCRIPT_FILE_NAME));
    assert_eq!(err.category(), "ZeroDivisionError");
}

#[test]
fn module_environment_is_registered_once() {
    let mut interp = Interpreter::new();
    let first = interp.new_module_environment("lib.kite");
    let second = interp.new_module_environment("lib.kite");
    assert!(first.ptr_eq(&second));
    assert!(interp.module(std::path::Path::new("lib.kite")).is_some());
}

#[test]
fn exception_trace_is_cleared_by_successful_run() {
    let mut session = TestSession::new();
    assert!(session.run(vec![expr(ident("nope"))]).is_err());
    assert!(session.interp.exception_trace().is_some());
    session.run(vec![expr(int(1))]).unwrap();
    assert!(session.interp.exception_trace().is_none());
}

#[test]
fn top_level_return_ends_program() {
    let mut session = TestSession::new();
    let value = session
        .run(vec![
            ret(int(7)),
            expr(call(ident("print"), vec![string("unreached")])),
        ])
        .unwrap();
    assert_eq!(value, Value::int(7));
    assert_eq!(session.output(), "");
}

#[test]
fn stray_break_is_unreachable() {
    let mut session = TestSession::new();
    let err = session.run(vec![brk()]).unwrap_err();
    assert_eq!(err.category(), "Unreachable");
}

#[test]
fn call_stack_is_empty_after_failure() {
    let mut session = TestSession::new();
    let err = session
        .run(vec![
            function("f", &[], vec![expr(ident("missing"))]),
            expr(call(ident("f"), vec![])),
        ])
        .unwrap_err();
    assert_eq!(err.category(), "NameError");
    assert_eq!(session.interp.call_depth(), 0);
}

#[test]
fn recursion_limit_is_an_error() {
    let mut session =
        TestSession::from_builder(InterpreterBuilder::new().max_recursion_depth(Some(50)));
    let err = session
        .run(vec![
            function("f", &["n"], vec![ret(call(ident("f"), vec![ident("n")]))]),
            expr(call(ident("f"), vec![int(0)])),
        ])
        .unwrap_err();
    assert_eq!(err.category(), "RecursionError");
    assert_eq!(session.interp.call_depth(), 0);
}

#[test]
fn deep_recursion_within_limit_succeeds() {
    // f(n) = n == 0 ? 0 : 1 + f(n - 1)
    let body = vec![
        if_else(
            binary(ident("n"), BinaryOp::Eq, int(0)),
            vec![ret(int(0))],
            None,
        ),
        ret(binary(
            int(1),
            BinaryOp::Add,
            call(ident("f"), vec![binary(ident("n"), BinaryOp::Sub, int(1))]),
        )),
    ];
    let mut session = TestSession::new();
    let value = session
        .run(vec![
            function("f", &["n"], body),
            expr(call(ident("f"), vec![int(900)])),
        ])
        .unwrap();
    assert_eq!(value, Value::int(900));
}

#[test]
fn register_source_feeds_tracebacks() {
    let mut session = TestSession::new();
    session
        .interp
        .register_source(MAIN_FILE, "var a = 1\na = a / 0\n");
    let err = session
        .run(numbered(vec![
            var("a", int(1)),
            assign(ident("a"), binary(ident("a"), BinaryOp::Div, int(0))),
        ]))
        .unwrap_err();
    assert_eq!(
        session.interp.format_error(&err),
        "Traceback (most recent call last):\n  File \"main.kite\", line 2, in <module>\n    a = a / 0\nZeroDivisionError: integer division or modulo by zero"
    );
}
