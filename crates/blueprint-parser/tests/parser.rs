//! Tests for the grammar and tree shape of well-formed input

use blueprint_parser::ast::{AssignOp, AstNode, File, ValueKind};
use blueprint_parser::{parse, NodeKind, SyntaxNode, TokenKind};

fn kinds_of(node: SyntaxNode<'_>) -> Vec<NodeKind> {
    node.child_nodes().map(|n| n.kind()).collect()
}

fn parse_clean(source: &str) -> blueprint_parser::Parse {
    let parse = parse(source);
    assert!(parse.errors().is_empty(), "unexpected errors: {:?}", parse.errors());
    assert_eq!(parse.tree().text(), source);
    parse
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_module_with_one_pair() {
    let parse = parse_clean("cc_library {\n name = \"foo\",\n}");
    let file = File::cast(parse.syntax()).unwrap();

    let modules: Vec<_> = file.blueprints().collect();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].type_name(), Some("cc_library"));

    let pairs: Vec<_> = modules[0].pairs().collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].name(), Some("name"));
    assert_eq!(pairs[0].value().and_then(|v| v.as_string()).as_deref(), Some("foo"));
}

#[test]
fn test_module_shape() {
    let parse = parse_clean("t { a = 1 }");
    let module = parse.syntax().first_child_of(NodeKind::Blueprint).unwrap();
    assert_eq!(kinds_of(module), [NodeKind::BlueprintType, NodeKind::Members]);

    let pair = module
        .first_child_of(NodeKind::Members)
        .and_then(|m| m.first_child_of(NodeKind::Pair))
        .unwrap();
    assert_eq!(kinds_of(pair), [NodeKind::FieldName, NodeKind::Value]);
    assert!(pair.first_token_of(TokenKind::Equals).is_some());
}

#[test]
fn test_empty_module() {
    let parse = parse_clean("filegroup {}");
    let module = parse.syntax().first_child_of(NodeKind::Blueprint).unwrap();
    assert!(module.first_child_of(NodeKind::Members).is_none());
}

#[test]
fn test_colon_pairs() {
    let parse = parse_clean("java_library {\n    name: \"core\",\n    installable: true,\n}\n");
    let file = File::cast(parse.syntax()).unwrap();
    let module = file.blueprints().next().unwrap();
    assert_eq!(module.module_name().as_deref(), Some("core"));
    assert_eq!(module.pair("installable").and_then(|p| p.value()).and_then(|v| v.as_bool()), Some(true));
}

#[test]
fn test_nested_objects() {
    let source = "cc_defaults {\n    arch: {\n        arm: { cflags: [\"-DARM\"] },\n        x86: { enabled: false },\n    },\n}\n";
    let parse = parse_clean(source);
    let file = File::cast(parse.syntax()).unwrap();
    let arch = file.blueprints().next().unwrap().pair("arch").unwrap();

    let Some(ValueKind::Object(object)) = arch.value().and_then(|v| v.kind()) else {
        panic!("expected object value");
    };
    let names: Vec<_> = object.pairs().filter_map(|p| p.name()).collect();
    assert_eq!(names, ["arm", "x86"]);
}

#[test]
fn test_several_modules_and_comments() {
    let source = "// first\nfoo { }\n\n/* second */\nbar {\n    // inside\n    x = 1,\n}\n";
    let parse = parse_clean(source);
    assert_eq!(
        kinds_of(parse.syntax()),
        [NodeKind::Blueprint, NodeKind::Blueprint]
    );
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_string_concatenation() {
    let parse = parse_clean("FOO = \"a\" + \"b\"");
    let file = File::cast(parse.syntax()).unwrap();
    let variable = file.variables().next().unwrap();

    assert_eq!(variable.name(), Some("FOO"));
    assert_eq!(variable.operator(), Some(AssignOp::Assign));

    let Some(ValueKind::String(expr)) = variable.value().and_then(|v| v.kind()) else {
        panic!("expected string expression");
    };
    assert_eq!(expr.parts().count(), 2);
    assert_eq!(expr.syntax().significant_tokens().map(|t| t.kind()).collect::<Vec<_>>(), [
        TokenKind::String,
        TokenKind::Plus,
        TokenKind::String,
    ]);
    assert_eq!(expr.value(), "ab");
}

#[test]
fn test_append_operator() {
    let parse = parse_clean("FLAGS = [\"-a\"]\nFLAGS += [\"-b\"]\n");
    let file = File::cast(parse.syntax()).unwrap();
    let ops: Vec<_> = file.variables().filter_map(|v| v.operator()).collect();
    assert_eq!(ops, [AssignOp::Assign, AssignOp::Append]);
}

#[test]
fn test_trailing_separator_in_array() {
    let parse = parse_clean("x = [1, 2, 3,]");
    let file = File::cast(parse.syntax()).unwrap();
    let Some(ValueKind::Array(expr)) = file.variables().next().and_then(|v| v.value()).and_then(|v| v.kind()) else {
        panic!("expected array expression");
    };

    assert_eq!(expr.arrays().count(), 1);
    let elements: Vec<_> = expr.elements().collect();
    assert_eq!(elements.len(), 3);
    assert!(elements.iter().all(|e| e.kind() == Some(TokenKind::Number)));
}

#[test]
fn test_array_concatenation() {
    let parse = parse_clean("x = [\"a\"] + [] + [\"b\", \"c\"]");
    let file = File::cast(parse.syntax()).unwrap();
    let Some(ValueKind::Array(expr)) = file.variables().next().and_then(|v| v.value()).and_then(|v| v.kind()) else {
        panic!("expected array expression");
    };
    assert_eq!(expr.arrays().count(), 3);
    let literals: Vec<_> = expr.elements().filter_map(|e| e.literal()).collect();
    assert_eq!(literals, ["a", "b", "c"]);
}

#[test]
fn test_variable_reference_chain() {
    let parse = parse_clean("ALL = A + B + [\"x\"]");
    let file = File::cast(parse.syntax()).unwrap();
    let Some(ValueKind::VariableRef(first)) = file.variables().next().and_then(|v| v.value()).and_then(|v| v.kind()) else {
        panic!("expected reference");
    };
    assert_eq!(first.name(), Some("A"));

    let Some(ValueKind::VariableRef(second)) = first.tail().and_then(|v| v.kind()) else {
        panic!("expected nested reference");
    };
    assert_eq!(second.name(), Some("B"));
    assert!(matches!(second.tail().and_then(|v| v.kind()), Some(ValueKind::Array(_))));
}

#[test]
fn test_value_has_exactly_one_alternative() {
    let parse = parse_clean("t { a = \"s\", b = [1], c = {}, d = true, e = 5, f = V }");
    for value in parse.syntax().descendants().filter(|n| n.kind() == NodeKind::Value) {
        let alternatives = value.child_nodes().count()
            + value
                .significant_tokens()
                .filter(|t| matches!(t.kind(), TokenKind::Bool | TokenKind::Number))
                .count();
        assert_eq!(alternatives, 1, "{:?}", value);
    }
}

// ============================================================================
// File Level
// ============================================================================

#[test]
fn test_empty_and_trivia_only_files() {
    for source in ["", "\n\n", "// only a comment\n", "/* x */   "] {
        let parse = parse_clean(source);
        assert!(kinds_of(parse.syntax()).is_empty());
    }
}

#[test]
fn test_items_in_source_order() {
    let parse = parse_clean("A = 1\nm { }\nB = 2\n");
    let file = File::cast(parse.syntax()).unwrap();
    let kinds: Vec<_> = file.items().map(|i| i.syntax().kind()).collect();
    assert_eq!(kinds, [NodeKind::Variable, NodeKind::Blueprint, NodeKind::Variable]);
}

#[test]
fn test_real_world_module() {
    let source = r#"
// Copyright notice
soong_namespace {
}

cc_library_shared {
    name: "libexample",
    srcs: [
        "src/a.cpp",
        "src/b.cpp",
    ],
    shared_libs: ["liblog", "libutils"],
    static_libs: [":libstatic"],
    cflags: COMMON_CFLAGS + ["-Wno-unused"],
    vendor_available: true,
    version: 3,
    target: {
        android: {
            srcs: ["android.cpp"],
        },
    },
}
"#;
    let parse = parse_clean(source);
    let file = File::cast(parse.syntax()).unwrap();
    let module = file.blueprint_named("libexample").unwrap();
    assert_eq!(module.type_name(), Some("cc_library_shared"));
    assert_eq!(module.pairs().count(), 8);
    let version = module.pair("version").and_then(|p| p.value()).and_then(|v| v.as_number());
    assert_eq!(version, Some(3));
}
