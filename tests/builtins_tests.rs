//! Built-in value helper tests: `eq, ne, lt, lte, gt, gte, and, or, not,
//! lookup` (SPEC_FULL.md §4.4).

use hbs_engine::interpreter::Value;
use hbs_engine::parse;
use rstest::rstest;

fn eval(source: &str, root: Value) -> String {
    let program = parse(source).unwrap();
    hbs_engine::Interpreter::new().evaluate(&program, root).unwrap()
}

#[rstest]
#[case("{{#if (eq 1 1)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (eq 1 2)}}y{{else}}n{{/if}}", "n")]
#[case(r#"{{#if (eq "a" "a")}}y{{else}}n{{/if}}"#, "y")]
#[case("{{#if (ne 1 2)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (ne 1 1)}}y{{else}}n{{/if}}", "n")]
fn eq_ne(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval(source, Value::Null), expected);
}

#[rstest]
#[case("{{#if (lt 1 2)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (lt 2 1)}}y{{else}}n{{/if}}", "n")]
#[case("{{#if (lte 2 2)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (gt 3 2)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (gte 2 2)}}y{{else}}n{{/if}}", "y")]
fn numeric_comparisons(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval(source, Value::Null), expected);
}

#[test]
fn non_numeric_comparison_is_false_not_error() {
    let root = Value::map(vec![("obj".into(), Value::map(vec![]))]);
    assert_eq!(eval("{{#if (gt obj 1)}}y{{else}}n{{/if}}", root), "n");
}

#[test]
fn numeric_string_coercion_for_comparisons() {
    let root = Value::map(vec![("n".into(), Value::string("5"))]);
    assert_eq!(eval("{{#if (gt n 3)}}y{{else}}n{{/if}}", root), "y");
}

#[rstest]
#[case("{{#if (and true true)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (and true false)}}y{{else}}n{{/if}}", "n")]
#[case("{{#if (or false true)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (or false false)}}y{{else}}n{{/if}}", "n")]
#[case("{{#if (not false)}}y{{else}}n{{/if}}", "y")]
#[case("{{#if (not true)}}y{{else}}n{{/if}}", "n")]
fn logical_helpers(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval(source, Value::Null), expected);
}

#[test]
fn lookup_fetches_by_dynamic_key() {
    let root = Value::map(vec![
        ("obj".into(), Value::map(vec![("k".into(), Value::string("v"))])),
        ("key".into(), Value::string("k")),
    ]);
    assert_eq!(eval("{{lookup obj key}}", root), "v");
}

#[test]
fn lookup_missing_key_yields_empty_not_error() {
    let root = Value::map(vec![
        ("obj".into(), Value::map(vec![])),
        ("key".into(), Value::string("nope")),
    ]);
    assert_eq!(eval("[{{lookup obj key}}]", root), "[]");
}

#[test]
fn lookup_indexes_arrays_with_numeric_key() {
    let root = Value::map(vec![(
        "xs".into(),
        Value::array(vec![Value::string("a"), Value::string("b")]),
    )]);
    assert_eq!(eval("{{lookup xs 1}}", root), "b");
}
