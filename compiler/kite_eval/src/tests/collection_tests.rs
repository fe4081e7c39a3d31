//! Lists, strings and dictionaries: indexing, methods, equality and printing.

use crate::test_helpers::{eval_err, eval_ok, TestSession};
use crate::value::Value;
use kite_ir::ast::build::*;
use kite_ir::{BinaryOp, UnaryOp};
use pretty_assertions::assert_eq;

fn nums() -> kite_ir::Expr {
    list(vec![int(1), int(2), int(3)])
}

#[test]
fn negative_indices_normalize_for_lists_and_strings() {
    assert_eq!(eval_ok(vec![expr(index(nums(), int(-1)))]), Value::int(3));
    assert_eq!(eval_ok(vec![expr(index(nums(), int(0)))]), Value::int(1));
    assert_eq!(
        eval_ok(vec![expr(index(string("abc"), int(-1)))]),
        Value::string("c")
    );
    assert_eq!(
        eval_ok(vec![expr(index(string("héllo"), int(1)))]),
        Value::string("é")
    );
}

#[test]
fn out_of_range_on_either_side() {
    for i in [3, -4] {
        let err = eval_err(vec![expr(index(nums(), int(i)))]);
        assert_eq!(err.category(), "IndexError");
        let err = eval_err(vec![expr(index(string("abc"), int(i)))]);
        assert_eq!(err.category(), "IndexError");
    }
    let err = eval_err(vec![expr(index(nums(), int(3)))]);
    assert_eq!(err.to_string(), "IndexError: list index 3 out of range");
}

#[test]
fn index_must_be_an_integer() {
    let err = eval_err(vec![expr(index(nums(), string("0")))]);
    assert_eq!(
        err.to_string(),
        "TypeError: list index expects integer, got 'string'"
    );
    let err = eval_err(vec![expr(index(int(5), int(0)))]);
    assert_eq!(err.category(), "TypeError");
}

#[test]
fn dictionary_subscript() {
    let value = eval_ok(vec![
        var("d", dict(vec![(string("a"), int(1)), (int(2), string("two"))])),
        expr(list(vec![
            index(ident("d"), string("a")),
            index(ident("d"), int(2)),
        ])),
    ]);
    assert_eq!(value, Value::list(vec![Value::int(1), Value::string("two")]));
}

#[test]
fn missing_key_names_the_key() {
    let err = eval_err(vec![expr(index(dict(vec![]), string("zed")))]);
    assert_eq!(err.to_string(), "KeyError: key not found: \"zed\"");
    let err = eval_err(vec![expr(index(dict(vec![]), int(4)))]);
    assert_eq!(err.to_string(), "KeyError: key not found: 4");
}

#[test]
fn unhashable_keys() {
    let err = eval_err(vec![expr(dict(vec![(list(vec![]), int(1))]))]);
    assert_eq!(err.to_string(), "UnhashableTypeError: unhashable type: 'list'");
    let err = eval_err(vec![expr(index(dict(vec![]), dict(vec![])))]);
    assert_eq!(err.category(), "UnhashableTypeError");
}

#[test]
fn booleans_and_integers_are_distinct_keys() {
    let value = eval_ok(vec![
        var("d", dict(vec![(int(1), string("int")), (boolean(true), string("bool"))])),
        expr(call(ident("len"), vec![ident("d")])),
    ]);
    assert_eq!(value, Value::int(2));
}

#[test]
fn dictionary_attribute_access() {
    let value = eval_ok(vec![
        var("d", dict(vec![(string("name"), string("kite"))])),
        var("before", attr(ident("d"), "name")),
        assign(attr(ident("d"), "name"), string("hawk")),
        assign(attr(ident("d"), "extra"), int(1)),
        expr(list(vec![
            ident("before"),
            index(ident("d"), string("name")),
            index(ident("d"), string("extra")),
        ])),
    ]);
    assert_eq!(
        value,
        Value::list(vec![
            Value::string("kite"),
            Value::string("hawk"),
            Value::int(1)
        ])
    );
    let err = eval_err(vec![expr(attr(dict(vec![]), "missing"))]);
    assert_eq!(err.category(), "KeyError");
}

#[test]
fn item_assignment() {
    let value = eval_ok(vec![
        var("l", nums()),
        assign(index(ident("l"), int(-1)), int(9)),
        var("d", dict(vec![])),
        assign(index(ident("d"), string("k")), ident("l")),
        expr(index(index(ident("d"), string("k")), int(2))),
    ]);
    assert_eq!(value, Value::int(9));

    let err = eval_err(vec![
        var("l", nums()),
        assign(index(ident("l"), int(3)), int(0)),
    ]);
    assert_eq!(err.category(), "IndexError");

    let err = eval_err(vec![
        var("s", string("abc")),
        assign(index(ident("s"), int(0)), string("z")),
    ]);
    assert_eq!(err.category(), "TypeError");
}

#[test]
fn lists_are_shared_by_reference() {
    let value = eval_ok(vec![
        var("a", nums()),
        var("b", ident("a")),
        expr(method_call(ident("b"), "append", vec![int(4)])),
        expr(call(ident("len"), vec![ident("a")])),
    ]);
    assert_eq!(value, Value::int(4));
}

#[test]
fn format_round_trips() {
    let cases = vec![
        (method_call(string("a {}"), "format", vec![int(1)]), "a 1"),
        (method_call(string("a {{}}"), "format", vec![]), "a {}"),
        (
            method_call(string("{1}-{0}"), "format", vec![string("x"), string("y")]),
            "y-x",
        ),
    ];
    for (call_expr, expected) in cases {
        assert_eq!(eval_ok(vec![expr(call_expr)]), Value::string(expected));
    }
}

#[test]
fn unmatched_braces_name_the_brace() {
    let err = eval_err(vec![expr(method_call(string("a {"), "format", vec![]))]);
    assert_eq!(
        err.to_string(),
        "FormatError: Single '{' encountered in format string"
    );
    let err = eval_err(vec![expr(method_call(string("a }"), "format", vec![]))]);
    assert_eq!(
        err.to_string(),
        "FormatError: Single '}' encountered in format string"
    );
}

#[test]
fn string_methods_through_the_interpreter() {
    let value = eval_ok(vec![
        var("parts", method_call(string("a,b,c"), "split", vec![string(",")])),
        expr(list(vec![
            method_call(string("-"), "join", vec![ident("parts")]),
            method_call(string("  pad "), "strip", vec![]),
            method_call(string("banana"), "find", vec![string("na"), int(-3)]),
            method_call(string("Hello"), "upper", vec![]),
        ])),
    ]);
    assert_eq!(
        value,
        Value::list(vec![
            Value::string("a-b-c"),
            Value::string("pad"),
            Value::int(4),
            Value::string("HELLO"),
        ])
    );
}

#[test]
fn list_methods_through_the_interpreter() {
    let value = eval_ok(vec![
        var("l", nums()),
        expr(method_call(ident("l"), "insert", vec![int(0), int(0)])),
        expr(method_call(ident("l"), "extend", vec![list(vec![int(4)])])),
        var("last", method_call(ident("l"), "pop", vec![])),
        var("first", method_call(ident("l"), "pop", vec![int(-4)])),
        expr(method_call(ident("l"), "reverse", vec![])),
        expr(list(vec![ident("l"), ident("last"), ident("first")])),
    ]);
    assert_eq!(value.display_value(), "[[3, 2, 1], 4, 0]");
}

#[test]
fn method_values_are_first_class() {
    let value = eval_ok(vec![
        var("up", attr(string("kite"), "upper")),
        expr(call(ident("up"), vec![])),
    ]);
    assert_eq!(value, Value::string("KITE"));
}

#[test]
fn unknown_methods() {
    let err = eval_err(vec![expr(attr(string("s"), "nope"))]);
    assert_eq!(err.to_string(), "AttributeError: 'string' has no attribute 'nope'");
    let err = eval_err(vec![expr(attr(int(1), "foo"))]);
    assert_eq!(err.category(), "AttributeError");
}

#[test]
fn method_arity() {
    let err = eval_err(vec![expr(method_call(string("s"), "find", vec![]))]);
    assert_eq!(
        err.to_string(),
        "ArityError: find() takes between 1 and 3 arguments (0 given)"
    );
}

#[test]
fn cyclic_lists_compare_and_print() {
    let mut session = TestSession::new();
    let value = session
        .run(vec![
            var("a", list(vec![int(1)])),
            expr(method_call(ident("a"), "append", vec![ident("a")])),
            var("b", list(vec![int(1)])),
            expr(method_call(ident("b"), "append", vec![ident("b")])),
            expr(call(ident("print"), vec![ident("a")])),
            expr(binary(ident("a"), BinaryOp::Eq, ident("b"))),
        ])
        .unwrap();
    assert_eq!(value, Value::Bool(true));
    assert_eq!(session.output(), "[1, [...]]\n");
}

#[test]
fn cyclic_dictionary_prints_placeholder() {
    let mut session = TestSession::new();
    session
        .run(vec![
            var("d", dict(vec![])),
            assign(index(ident("d"), string("self")), ident("d")),
            expr(call(ident("print"), vec![ident("d")])),
        ])
        .unwrap();
    assert_eq!(session.output(), "{\"self\": {...}}\n");
}

#[test]
fn container_truthiness() {
    let value = eval_ok(vec![expr(list(vec![
        unary(UnaryOp::Not, list(vec![])),
        unary(UnaryOp::Not, dict(vec![])),
        unary(UnaryOp::Not, nums()),
    ]))]);
    assert_eq!(
        value,
        Value::list(vec![Value::Bool(true), Value::Bool(true), Value::Bool(false)])
    );
}

/// `var name = []; var i = 0; while (i < depth) { name = [name]; i = i + 1 }`
fn nest(name: &str, depth: i64) -> Vec<kite_ir::Stmt> {
    vec![
        var(name, list(vec![])),
        var("i", int(0)),
        while_loop(
            binary(ident("i"), BinaryOp::Lt, int(depth)),
            vec![
                assign(ident(name), list(vec![ident(name)])),
                assign(ident("i"), binary(ident("i"), BinaryOp::Add, int(1))),
            ],
        ),
    ]
}

#[test]
fn deeply_nested_list_frees_with_its_session() {
    let mut statements = nest("x", 20_000);
    statements.push(expr(binary(ident("x"), BinaryOp::Eq, ident("x"))));
    let mut session = TestSession::new();
    assert_eq!(session.run(statements).unwrap(), Value::Bool(true));
    drop(session);
}

#[test]
fn distinct_deep_lists_are_structurally_equal() {
    let mut inner = nest("b", 20_000);
    inner.push(expr(binary(ident("a"), BinaryOp::Eq, ident("b"))));
    let mut statements = nest("a", 20_000);
    statements.push(block(inner));
    assert_eq!(eval_ok(statements), Value::Bool(true));
}

#[test]
fn long_instance_chain_frees() {
    let node = class("Node")
        .member("next", None)
        .method(
            "__init__",
            &["n"],
            vec![assign(attr(ident("self"), "next"), ident("n"))],
        )
        .stmt();
    let value = eval_ok(vec![
        node,
        var("head", null()),
        var("i", int(0)),
        while_loop(
            binary(ident("i"), BinaryOp::Lt, int(20_000)),
            vec![
                assign(ident("head"), call(ident("Node"), vec![ident("head")])),
                assign(ident("i"), binary(ident("i"), BinaryOp::Add, int(1))),
            ],
        ),
        expr(ident("i")),
    ]);
    assert_eq!(value, Value::int(20_000));
}

mod index_normalization {
    use crate::test_helpers::run;
    use crate::value::Value;
    use kite_ir::ast::build::*;
    use proptest::prelude::*;

    const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

    /// `[0, 1, .., len - 1][index]` and `"ab..."[index]` through the interpreter.
    fn subscripts(len: usize, index: i64) -> (Result<Value, String>, Result<Value, String>) {
        let items = (0..len).map(|i| int(i64::try_from(i).unwrap_or(0))).collect();
        let from_list = run(vec![expr(kite_ir::ast::build::index(list(items), int(index)))])
            .map_err(|err| err.category().to_string());
        let from_string = run(vec![expr(kite_ir::ast::build::index(
            string(&LETTERS[..len]),
            int(index),
        ))])
        .map_err(|err| err.category().to_string());
        (from_list, from_string)
    }

    fn position(len: usize) -> impl Strategy<Value = i64> {
        let len = i64::try_from(len).unwrap_or(0);
        -len..len
    }

    proptest! {
        #[test]
        fn negative_indices_count_from_the_end(
            (len, index) in (1usize..=26).prop_flat_map(|len| (Just(len), position(len))),
        ) {
            let n = i64::try_from(len).unwrap_or(0);
            let resolved = usize::try_from((index + n) % n).unwrap_or(0);
            let (from_list, from_string) = subscripts(len, index);
            prop_assert_eq!(from_list, Ok(Value::int(i64::try_from(resolved).unwrap_or(0))));
            let letter = &LETTERS[resolved..=resolved];
            prop_assert_eq!(from_string, Ok(Value::string(letter)));
        }

        #[test]
        fn out_of_range_on_either_side_fails_alike(
            len in 0usize..=26,
            past in 0i64..1_000,
            below in any::<bool>(),
        ) {
            let n = i64::try_from(len).unwrap_or(0);
            let index = if below { -n - 1 - past } else { n + past };
            let (from_list, from_string) = subscripts(len, index);
            prop_assert_eq!(from_list, Err("IndexError".to_string()));
            prop_assert_eq!(from_string, Err("IndexError".to_string()));
        }
    }
}
