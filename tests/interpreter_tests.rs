//! Interpreter tests (spec §4.3) covering the ten concrete scenarios and
//! the negative properties listed in spec §8.

use hbs_engine::interpreter::Value;
use hbs_engine::{parse, render};
use rstest::rstest;

fn eval(source: &str, root: Value) -> String {
    let program = parse(source).expect("should parse");
    hbs_engine::Interpreter::new()
        .evaluate(&program, root)
        .expect("should render")
}

#[test]
fn plain_text_round_trips() {
    assert_eq!(render("plain text", Value::Null).unwrap(), "plain text");
}

#[test]
fn scenario_greeting() {
    let root = Value::map(vec![("name".into(), Value::string("World"))]);
    assert_eq!(eval("Hello {{name}}!", root), "Hello World!");
}

#[test]
fn scenario_nested_property_path() {
    let root = Value::map(vec![(
        "user".into(),
        Value::map(vec![(
            "profile".into(),
            Value::map(vec![("name".into(), Value::string("Alice"))]),
        )]),
    )]);
    assert_eq!(eval("{{user.profile.name}}", root), "Alice");
}

#[test]
fn scenario_if_else_with_empty_array_is_falsy() {
    let root = Value::map(vec![("xs".into(), Value::array(vec![]))]);
    assert_eq!(
        eval("{{#if xs}}yes{{else}}no{{/if}}", root),
        "no"
    );
}

#[test]
fn scenario_each_over_array_with_index() {
    let root = Value::map(vec![(
        "xs".into(),
        Value::array(vec![Value::string("a"), Value::string("b")]),
    )]);
    assert_eq!(
        eval("{{#each xs}}{{@index}}:{{this}} {{/each}}", root),
        "0:a 1:b "
    );
}

#[test]
fn scenario_with_pushes_context_frame() {
    let root = Value::map(vec![(
        "u".into(),
        Value::map(vec![("name".into(), Value::string("Eve"))]),
    )]);
    assert_eq!(eval("{{#with u}}{{name}}{{/with}}", root), "Eve");
}

#[rstest]
#[case(7.0, "big")]
#[case(3.0, "small")]
fn scenario_subexpression_in_if(#[case] n: f64, #[case] expected: &str) {
    let root = Value::map(vec![("n".into(), Value::Number(n))]);
    assert_eq!(
        eval("{{#if (gt n 5)}}big{{else}}small{{/if}}", root),
        expected
    );
}

#[test]
fn scenario_parent_path_inside_each() {
    let root = Value::map(vec![
        ("name".into(), Value::string("Alan")),
        ("xs".into(), Value::array(vec![Value::Number(1.0)])),
    ]);
    assert_eq!(eval("{{#each xs}}{{../name}}{{/each}}", root), "Alan");
}

#[test]
fn scenario_root_data_variable() {
    let root = Value::map(vec![("foo".into(), Value::string("hello"))]);
    assert_eq!(eval("{{@root.foo}}", root), "hello");
}

#[test]
fn unless_is_symmetric_with_if() {
    let root = Value::map(vec![("flag".into(), Value::Bool(false))]);
    assert_eq!(eval("{{#unless flag}}shown{{/unless}}", root), "shown");
}

#[test]
fn zero_is_truthy_for_if() {
    let root = Value::map(vec![("n".into(), Value::Number(0.0))]);
    assert_eq!(eval("{{#if n}}yes{{else}}no{{/if}}", root), "yes");
}

#[test]
fn empty_object_is_truthy_for_if() {
    let root = Value::map(vec![("obj".into(), Value::map(vec![]))]);
    assert_eq!(eval("{{#if obj}}yes{{else}}no{{/if}}", root), "yes");
}

#[test]
fn each_over_empty_array_invokes_inverse() {
    let root = Value::map(vec![("xs".into(), Value::array(vec![]))]);
    assert_eq!(eval("{{#each xs}}x{{else}}empty{{/each}}", root), "empty");
}

#[test]
fn each_over_map_exposes_key_and_first_last() {
    let root = Value::map(vec![(
        "m".into(),
        Value::map(vec![
            ("a".into(), Value::Number(1.0)),
            ("b".into(), Value::Number(2.0)),
        ]),
    )]);
    assert_eq!(
        eval(
            "{{#each m}}{{@key}}={{this}}{{#if @first}}(first){{/if}}{{#if @last}}(last){{/if}} {{/each}}",
            root
        ),
        "a=1(first) b=2(last) "
    );
}

#[test]
fn missing_property_resolves_to_empty_string_not_error() {
    let root = Value::map(vec![]);
    assert_eq!(eval("[{{nope.deep.missing}}]", root), "[]");
}

#[test]
fn missing_helper_error_matches_expected_shape() {
    let program = parse("{{helperThatDoesNotExist foo}}").unwrap();
    let err = hbs_engine::Interpreter::new()
        .evaluate(&program, Value::map(vec![("foo".into(), Value::Number(1.0))]))
        .expect_err("should fail to render");
    let msg = format!("{err}");
    assert!(msg.contains("Missing helper"), "got: {msg}");
    assert!(msg.contains("helperThatDoesNotExist"), "got: {msg}");
}

#[rstest]
#[case("{{#if}}{{/if}}")]
#[case("{{#if a b}}{{/if}}")]
fn if_arity_violation_is_a_render_error(#[case] source: &str) {
    let program = parse(source).unwrap();
    let err = hbs_engine::Interpreter::new()
        .evaluate(&program, Value::map(vec![
            ("a".into(), Value::Bool(true)),
            ("b".into(), Value::Bool(true)),
        ]))
        .expect_err("should fail to render");
    assert!(
        format!("{err}").contains("#if requires exactly one argument"),
        "got: {err}"
    );
}

#[test]
fn unknown_helper_in_subexpression_matches_unknown_helper_regex() {
    let program = parse("{{#if (bogusHelper 1)}}x{{/if}}").unwrap();
    let err = hbs_engine::Interpreter::new()
        .evaluate(&program, Value::Null)
        .expect_err("should fail");
    assert!(format!("{err}").to_lowercase().contains("unknown helper"));
}

#[test]
fn ambiguous_mustache_prefers_helper_over_same_named_property() {
    // "eq" is a built-in helper name; a bare `{{eq}}` with no dots/slashes
    // resolves to the helper (spec §4.3.3 point 4), which with no args
    // compares undefined to undefined and is truthy.
    let root = Value::map(vec![("eq".into(), Value::string("shadowed"))]);
    assert_eq!(eval("{{#if eq}}helper-won{{else}}prop-won{{/if}}", root), "helper-won");
}

#[test]
fn path_scoped_this_bypasses_helper_lookup() {
    let root = Value::map(vec![("eq".into(), Value::string("prop-value"))]);
    assert_eq!(eval("{{this.eq}}", root), "prop-value");
}

#[test]
fn caller_supplied_helper_overrides_builtin() {
    use std::rc::Rc;
    let mut options = hbs_engine::interpreter::RuntimeOptions::default();
    options.helpers.insert(
        "eq".to_string(),
        Rc::new(|_call: &mut hbs_engine::helpers::HelperCall| {
            Ok(Value::string("overridden"))
        }),
    );
    let program = parse("{{eq 1 1}}").unwrap();
    let out = hbs_engine::evaluate(&program, Value::Null, &options).unwrap();
    assert_eq!(out, "overridden");
}

#[test]
fn lambda_values_are_called_bound_to_owning_context() {
    use std::rc::Rc;
    let root = Value::map(vec![(
        "greeting".into(),
        Value::Fn(Rc::new(|this: &Value| {
            let name = this.get_own("name");
            Value::string(format!("Hi {}", hbs_engine::interpreter::value::stringify(&name, this)))
        })),
    ), ("name".into(), Value::string("Sam"))]);
    assert_eq!(eval("{{greeting}}", root), "Hi Sam");
}

#[test]
fn interpreter_is_reusable_across_evaluations_without_state_leak() {
    let interpreter = hbs_engine::Interpreter::new();
    let program = parse("{{#each xs}}{{@index}}{{/each}}").unwrap();
    let a = interpreter
        .evaluate(&program, Value::map(vec![("xs".into(), Value::array(vec![Value::Number(1.0)]))]))
        .unwrap();
    let b = interpreter
        .evaluate(
            &program,
            Value::map(vec![(
                "xs".into(),
                Value::array(vec![Value::Number(1.0), Value::Number(2.0)]),
            )]),
        )
        .unwrap();
    assert_eq!(a, "0");
    assert_eq!(b, "01");
}
