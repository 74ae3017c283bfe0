//! Tokenizer tests (spec §4.1).

use hbs_engine::lexer::{tokenize, Token, TokenKind};
use rstest::rstest;

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[rstest]
#[case("plain text", vec![TokenKind::Content, TokenKind::Eof])]
#[case("{{name}}", vec![TokenKind::Open, TokenKind::Id, TokenKind::Close, TokenKind::Eof])]
#[case("{{{name}}}", vec![TokenKind::OpenUnescaped, TokenKind::Id, TokenKind::CloseUnescaped, TokenKind::Eof])]
#[case("{{#if x}}{{/if}}", vec![
    TokenKind::OpenBlock, TokenKind::Id, TokenKind::Id, TokenKind::Close,
    TokenKind::OpenEndBlock, TokenKind::Id, TokenKind::Close, TokenKind::Eof,
])]
fn tokenizes_expected_kinds(#[case] input: &str, #[case] expected: Vec<TokenKind>) {
    let tokens = tokenize(input).expect("should lex");
    assert_eq!(kinds(&tokens), expected);
}

#[test]
fn content_then_eof_has_no_gap() {
    let tokens = tokenize("hello").unwrap();
    assert_eq!(tokens[0].literal, "hello");
    assert_eq!(tokens[0].location.start.index, 0);
    assert_eq!(tokens[0].location.end.index, 5);
}

#[test]
fn escaped_delimiter_stays_content() {
    let tokens = tokenize(r"\{{not a mustache}}").unwrap();
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        t if t.kind == TokenKind::Content => {
            assert_eq!(t.literal, "{{not a mustache}}");
        }
        other => panic!("expected Content, got {other:?}"),
    }
}

#[test]
fn double_backslash_escape_then_active_delimiter() {
    // `\\{{` → literal backslash, then `{{` is an active opener.
    let tokens = tokenize(r"\\{{x}}").unwrap();
    assert_eq!(kinds(&tokens), vec![
        TokenKind::Content, TokenKind::Open, TokenKind::Id, TokenKind::Close, TokenKind::Eof,
    ]);
    assert_eq!(tokens[0].literal, "\\");
}

#[test]
fn dashed_comment_can_contain_close_braces() {
    let tokens = tokenize("{{!-- a }} b --}}").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].literal, " a }} b ");
}

#[test]
fn plain_comment_stops_at_first_close() {
    let tokens = tokenize("{{! hi }}").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].literal, " hi ");
}

#[test]
fn unterminated_string_reports_opening_position() {
    let err = tokenize(r#"{{ "abc }}"#).unwrap_err();
    assert_eq!(err.at.line, 1);
    assert_eq!(err.at.column, 3);
}

#[test]
fn unterminated_comment_reports_opening_position() {
    let err = tokenize("{{! never closes").unwrap_err();
    assert_eq!(err.at.index, 0);
}

#[test]
fn path_dot_between_identifiers_is_separator() {
    let tokens = tokenize("{{a.b}}").unwrap();
    assert_eq!(kinds(&tokens), vec![
        TokenKind::Open, TokenKind::Id, TokenKind::Sep, TokenKind::Id, TokenKind::Close, TokenKind::Eof,
    ]);
}

#[test]
fn lone_dot_is_an_identifier_not_a_separator() {
    let tokens = tokenize("{{.}}").unwrap();
    assert_eq!(kinds(&tokens), vec![TokenKind::Open, TokenKind::Id, TokenKind::Close, TokenKind::Eof]);
    assert_eq!(tokens[1].literal, ".");
}

#[test]
fn tab_advances_column_by_four() {
    let tokens = tokenize("\t{{x}}").unwrap();
    // the OPEN token starts right after the tab
    assert_eq!(tokens[0].location.start.column, 4);
}

#[test]
fn data_token_requires_identifier() {
    let tokens = tokenize("{{@index}}").unwrap();
    assert_eq!(kinds(&tokens), vec![
        TokenKind::Open, TokenKind::Data, TokenKind::Id, TokenKind::Close, TokenKind::Eof,
    ]);
}

#[test]
fn hash_equals_is_its_own_token() {
    let tokens = tokenize("{{f a=1}}").unwrap();
    assert_eq!(kinds(&tokens), vec![
        TokenKind::Open, TokenKind::Id, TokenKind::Id, TokenKind::Equals, TokenKind::Number,
        TokenKind::Close, TokenKind::Eof,
    ]);
}

#[test]
fn token_literals_concatenate_back_to_source_outside_comments() {
    let input = "Hello {{name}}, you have {{{count}}} items.";
    let tokens = tokenize(input).unwrap();
    let rebuilt: String = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.literal.as_str())
        .collect();
    assert_eq!(rebuilt, input);
}
