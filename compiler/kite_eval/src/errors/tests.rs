use super::*;
use pretty_assertions::assert_eq;

#[test]
fn factory_sets_kind_and_message() {
    let err = undefined_name("zed");
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedName {
            name: "zed".to_string()
        }
    );
    assert_eq!(err.message, "name 'zed' is not defined");
    assert_eq!(err.to_string(), "NameError: name 'zed' is not defined");
}

#[test]
fn binary_mismatch_names_both_operands() {
    let err = binary_type_mismatch("+", "integer", "string");
    assert_eq!(err.category(), "TypeError");
    assert_eq!(
        err.message,
        "unsupported operand types for +: 'integer' and 'string'"
    );
}

#[test]
fn arity_messages() {
    assert_eq!(
        wrong_arg_count("__init__", ArgCount::Exact(2), 1).message,
        "__init__() takes exactly 2 arguments (1 given)"
    );
    assert_eq!(
        wrong_arg_count("find", ArgCount::Range(1, 3), 0).message,
        "find() takes between 1 and 3 arguments (0 given)"
    );
    assert_eq!(
        wrong_arg_count("len", ArgCount::Exact(1), 2).message,
        "len() takes exactly 1 argument (2 given)"
    );
}

#[test]
fn arg_count_accepts() {
    assert!(ArgCount::Exact(2).accepts(2));
    assert!(!ArgCount::Exact(2).accepts(3));
    assert!(ArgCount::Range(1, 3).accepts(1));
    assert!(ArgCount::Range(1, 3).accepts(3));
    assert!(!ArgCount::Range(1, 3).accepts(0));
    assert!(ArgCount::AtLeast(0).accepts(10));
}

#[test]
fn first_backtrace_wins() {
    let file: Rc<Path> = Rc::from(Path::new("main.kite"));
    let first = EvalBacktrace::new(vec![BacktraceFrame {
        file: Rc::clone(&file),
        line: 3,
        function: "<module>".to_string(),
    }]);
    let second = EvalBacktrace::new(vec![BacktraceFrame {
        file,
        line: 9,
        function: "<module>".to_string(),
    }]);

    let err = key_not_found("'a'")
        .with_backtrace(first.clone())
        .with_backtrace(second);
    assert_eq!(err.backtrace, Some(first));
}

#[test]
fn categories_cover_taxonomy() {
    assert_eq!(super_assignment().category(), "AttributeError");
    assert_eq!(unhashable("list").category(), "UnhashableTypeError");
    assert_eq!(unpack_mismatch(2, 1).category(), "UnpackError");
    assert_eq!(not_iterable("integer").category(), "NotIterableError");
    assert_eq!(not_callable("integer").category(), "NotCallableError");
    assert_eq!(module_not_found("x.kite").category(), "ModuleNotFoundError");
    assert_eq!(
        uninitialized_member("Foo", "a").category(),
        "UninitializedMemberError"
    );
    assert_eq!(unreachable("break").category(), "Unreachable");
    assert_eq!(redeclaration("a").category(), "RedeclarationError");
    assert_eq!(const_reassignment("a").category(), "ConstReassignmentError");
    assert_eq!(index_out_of_range("list", 3).category(), "IndexError");
}

#[test]
fn backtrace_display_lists_frames_outermost_first() {
    let file: Rc<Path> = Rc::from(Path::new("main.kite"));
    let bt = EvalBacktrace::new(vec![
        BacktraceFrame {
            file: Rc::clone(&file),
            line: 4,
            function: "<module>".to_string(),
        },
        BacktraceFrame {
            file,
            line: 2,
            function: "f".to_string(),
        },
    ]);
    assert_eq!(
        bt.to_string(),
        "  File \"main.kite\", line 4, in <module>\n  File \"main.kite\", line 2, in f\n"
    );
}
