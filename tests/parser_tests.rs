//! Parser tests (spec §4.2).

use hbs_engine::ast::{Expression, Statement};
use hbs_engine::{parse as parse_source, tokenize, ParseError};
use rstest::rstest;

fn parse(source: &str) -> hbs_engine::ast::Program {
    let tokens = tokenize(source).expect("should lex");
    hbs_engine::parser::parse(tokens).expect("should parse")
}

fn parse_err(source: &str) -> ParseError {
    let tokens = tokenize(source).expect("should lex");
    hbs_engine::parser::parse(tokens).expect_err("should fail to parse")
}

#[test]
fn content_and_mustache_statements() {
    let program = parse("Hello {{name}}!");
    assert_eq!(program.body.len(), 3);
    assert!(matches!(program.body[0], Statement::Content(_)));
    assert!(matches!(program.body[1], Statement::Mustache(_)));
    assert!(matches!(program.body[2], Statement::Content(_)));
}

#[rstest]
#[case("{{a.b.c}}", vec!["a", "b", "c"], 0)]
#[case("{{this.x}}", vec!["x"], 0)]
#[case("{{./x}}", vec!["x"], 0)]
#[case("{{../x}}", vec!["x"], 1)]
#[case("{{../../x}}", vec!["x"], 2)]
#[case("{{x}}", vec!["x"], 0)]
fn path_normalization(#[case] source: &str, #[case] parts: Vec<&str>, #[case] depth: usize) {
    let program = parse(source);
    let Statement::Mustache(m) = &program.body[0] else {
        panic!("expected a single Mustache statement");
    };
    assert_eq!(m.path.parts, parts);
    assert_eq!(m.path.depth, depth);
}

#[test]
fn data_path_sets_data_flag() {
    let program = parse("{{@index}}");
    let Statement::Mustache(m) = &program.body[0] else {
        panic!("expected Mustache");
    };
    assert!(m.path.data);
    assert_eq!(m.path.parts, vec!["index"]);
}

#[test]
fn triple_stash_is_unescaped() {
    let program = parse("{{{raw}}}");
    let Statement::Mustache(m) = &program.body[0] else {
        panic!("expected Mustache");
    };
    assert!(!m.escaped);
}

#[test]
fn hash_pairs_parse_in_order() {
    let program = parse(r#"{{f a=1 b="two"}}"#);
    let Statement::Mustache(m) = &program.body[0] else {
        panic!("expected Mustache");
    };
    assert_eq!(m.hash.len(), 2);
    let pairs: Vec<&str> = m.hash.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(pairs, vec!["a", "b"]);
}

#[test]
fn sub_expression_param() {
    let program = parse("{{#if (gt n 5)}}big{{/if}}");
    let Statement::Block(b) = &program.body[0] else {
        panic!("expected Block");
    };
    assert_eq!(b.params.len(), 1);
    assert!(matches!(b.params[0], Expression::Sub(_)));
}

#[test]
fn block_with_else() {
    let program = parse("{{#if x}}yes{{else}}no{{/if}}");
    let Statement::Block(b) = &program.body[0] else {
        panic!("expected Block");
    };
    assert!(b.inverse.is_some());
}

#[test]
fn chained_else_if_closes_with_outer_tag() {
    let program = parse("{{#if a}}A{{else if b}}B{{else}}C{{/if}}");
    let Statement::Block(outer) = &program.body[0] else {
        panic!("expected Block");
    };
    let inverse = outer.inverse.as_ref().expect("outer has an inverse");
    assert_eq!(inverse.body.len(), 1);
    let Statement::Block(chained) = &inverse.body[0] else {
        panic!("expected a synthesized chained block");
    };
    assert_eq!(chained.path.original, "if");
    assert!(chained.inverse.is_some());
}

#[test]
fn inverse_section_swaps_branches() {
    let program = parse("{{^xs}}empty{{/xs}}");
    let Statement::Block(b) = &program.body[0] else {
        panic!("expected Block");
    };
    assert!(b.inverse.is_some());
    assert_eq!(b.program.body.len(), 0);
}

#[test]
fn standalone_block_lines_are_trimmed() {
    let program = parse("before\n{{#if x}}\ninner\n{{/if}}\nafter");
    // the newline-only lines around the block markers are trimmed away,
    // leaving just "before\n", "inner\n", "after"
    let Statement::Content(before) = &program.body[0] else {
        panic!("expected leading Content");
    };
    assert_eq!(before.value, "before\n");
    let Statement::Block(b) = &program.body[1] else {
        panic!("expected Block");
    };
    let Statement::Content(inner) = &b.program.body[0] else {
        panic!("expected inner Content");
    };
    assert_eq!(inner.value, "inner\n");
    let Statement::Content(after) = &program.body[2] else {
        panic!("expected trailing Content");
    };
    assert_eq!(after.value, "after");
}

#[test]
fn unexpected_closing_tag_mismatch() {
    let err = parse_err("{{#if x}}yes{{/each}}");
    assert!(
        format!("{err}").to_lowercase().contains("closing tag mismatch"),
        "got: {err}"
    );
    assert!(format!("{err}").contains("if"));
    assert!(format!("{err}").contains("each"));
}

#[test]
fn unclosed_block_mentions_name_and_opening_line() {
    let err = parse_err("{{#if test}}content");
    let msg = format!("{err}").to_lowercase();
    assert!(msg.contains("unclosed block"), "got: {msg}");
    assert!(msg.contains("if"));
    assert!(msg.contains("line 1"));
}

#[test]
fn stray_else_is_an_error() {
    let err = parse_err("{{else}}");
    assert_eq!(err.kind, hbs_engine::parser::ParseErrorKind::StrayElse);
}

#[test]
fn stray_close_is_an_error() {
    let err = parse_err("{{/foo}}");
    assert_eq!(err.kind, hbs_engine::parser::ParseErrorKind::StrayClose);
}

#[test]
fn trailing_separator_is_an_error() {
    let err = parse_err("{{a.}}");
    assert_eq!(err.kind, hbs_engine::parser::ParseErrorKind::TrailingSeparator);
}

#[test]
fn top_level_entry_point_matches_lex_then_parse() {
    let via_helper = parse("Hello {{name}}!");
    let via_api = parse_source("Hello {{name}}!").unwrap();
    assert_eq!(via_helper, via_api);
}
