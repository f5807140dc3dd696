//! Tests for tokenization and identifier classification

use blueprint_parser::{tokenize, TokenKind};

fn significant(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| (t.kind, t.text(source).to_string()))
        .collect()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    significant(source).into_iter().map(|(k, _)| k).collect()
}

// ============================================================================
// Lossless Token Stream
// ============================================================================

#[test]
fn test_tokens_cover_source() {
    let source = "// c\ncc_binary {\n  srcs: [\"a.cc\", ], /* x */ cflags = FLAGS + [\"-O2\"]\n}\n";
    let tokens = tokenize(source);

    let mut offset = 0;
    for token in &tokens {
        assert_eq!(token.span.start, offset);
        offset = token.span.end;
    }
    assert_eq!(offset, source.len());

    let rebuilt: String = tokens.iter().map(|t| t.text(source)).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_eof_always_last() {
    for source in ["", "   ", "x = 1", "@@@"] {
        let tokens = tokenize(source);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Eof);
        assert!(last.span.is_empty());
        assert_eq!(last.span.start, source.len());
    }
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

// ============================================================================
// Literals and Operators
// ============================================================================

#[test]
fn test_operators() {
    assert_eq!(
        kinds("x += [1] + [2]"),
        vec![
            TokenKind::VariableName,
            TokenKind::PlusEquals,
            TokenKind::ArrayStart,
            TokenKind::Number,
            TokenKind::ArrayEnd,
            TokenKind::Plus,
            TokenKind::ArrayStart,
            TokenKind::Number,
            TokenKind::ArrayEnd,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers_and_bools() {
    let tokens = significant("t { a = -12, b = true, c = false, d = 0 }");
    let literals: Vec<_> = tokens
        .iter()
        .filter(|(k, _)| matches!(k, TokenKind::Number | TokenKind::Bool))
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(literals, ["-12", "true", "false", "0"]);
}

#[test]
fn test_strings() {
    let tokens = significant(r#"x = "a \"quoted\" word" + `raw "text"`"#);
    assert_eq!(tokens[2], (TokenKind::String, r#""a \"quoted\" word""#.to_string()));
    assert_eq!(tokens[4], (TokenKind::String, r#"`raw "text"`"#.to_string()));
}

#[test]
fn test_comments_are_trivia() {
    let tokens = tokenize("/* block\n comment */ x = 1 // tail");
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[tokens.len() - 2].kind, TokenKind::Comment);
    assert_eq!(kinds("/* a */ // b"), vec![TokenKind::Eof]);
}

#[test]
fn test_unterminated_block_comment_runs_to_end() {
    let tokens = tokenize("x = 1 /* open");
    assert_eq!(tokens[tokens.len() - 2].kind, TokenKind::Comment);
    assert_eq!(tokens[tokens.len() - 2].span.end, 13);
}

#[test]
fn test_unknown_characters_are_single_error_tokens() {
    let tokens = significant("x = 1 @# y");
    let errors: Vec<_> = tokens
        .iter()
        .filter(|(k, _)| *k == TokenKind::Error)
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(errors, ["@", "#"]);
}

#[test]
fn test_non_ascii_error_is_one_character() {
    let tokens = significant("x = é");
    assert_eq!(tokens[2], (TokenKind::Error, "é".to_string()));
}

// ============================================================================
// Identifier Classification
// ============================================================================

#[test]
fn test_module_type_before_brace() {
    assert_eq!(kinds("android_app\n{\n}")[0], TokenKind::BlueprintTypeName);
    assert_eq!(kinds("t { x = foo {} }")[0], TokenKind::BlueprintTypeName);
}

#[test]
fn test_variable_name_at_file_scope() {
    assert_eq!(kinds("FOO = 1")[0], TokenKind::VariableName);
    assert_eq!(kinds("FOO += 1")[0], TokenKind::VariableName);
}

#[test]
fn test_field_name_in_object() {
    let k = kinds("t { name = \"a\", nested: { inner = 1 } }");
    assert_eq!(k[2], TokenKind::FieldName);
    assert_eq!(k[6], TokenKind::FieldName);
    assert_eq!(k[9], TokenKind::FieldName);
}

#[test]
fn test_value_reference_after_operator() {
    let k = kinds("A = B + C\nt { x = D }");
    assert_eq!(k[2], TokenKind::VariableValueRef);
    assert_eq!(k[4], TokenKind::VariableValueRef);
    assert_eq!(k[9], TokenKind::VariableValueRef);
}

#[test]
fn test_variable_name_in_array() {
    let k = kinds("x = [A, \"b\", \":c\"]");
    assert_eq!(k[3], TokenKind::VariableName);
    assert_eq!(k[5], TokenKind::String);
    assert_eq!(k[7], TokenKind::Link);
}
