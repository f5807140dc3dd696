//! Tests for tree traversal

use blueprint_parser::ast::{
    walk, walk_children, AstNode, Blueprint, ErrorNode, Node, Pair, Visitor,
};
use blueprint_parser::{parse, NodeKind, SyntaxToken};

// ============================================================================
// Collectors
// ============================================================================

#[derive(Default)]
struct FieldPaths(Vec<String>);

impl<'t> Visitor<'t> for FieldPaths {
    fn visit_pair(&mut self, pair: Pair<'t>) {
        let mut path = pair.field_path();
        path.extend(pair.name());
        self.0.push(path.join("."));
        walk_children(self, pair.syntax());
    }
}

#[derive(Default)]
struct SourceText(String);

impl<'t> Visitor<'t> for SourceText {
    fn visit_token(&mut self, token: SyntaxToken<'t>) {
        self.0.push_str(token.text());
    }
}

#[derive(Default)]
struct Recovered(Vec<String>);

impl<'t> Visitor<'t> for Recovered {
    fn visit_error(&mut self, error: ErrorNode<'t>) {
        let skipped: Vec<_> = error.skipped().map(|t| t.text()).collect();
        self.0.push(skipped.join(" "));
    }
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn test_nested_pairs_with_paths() {
    let parse = parse(
        r#"
cc_library {
    name: "libfoo",
    target: {
        android: { cflags: ["-DANDROID"] },
        host: { enabled: false },
    },
}
"#,
    );

    let mut paths = FieldPaths::default();
    walk(&mut paths, parse.syntax());
    assert_eq!(
        paths.0,
        [
            "cc_library.name",
            "cc_library.target",
            "cc_library.target.android",
            "cc_library.target.android.cflags",
            "cc_library.target.host",
            "cc_library.target.host.enabled",
        ]
    );
}

#[test]
fn test_tokens_reproduce_source() {
    let source = "// header\nA = \"x\" + \"y\"\nm { srcs: [A, ], } // tail\n";
    let parse = parse(source);
    let mut text = SourceText::default();
    walk(&mut text, parse.syntax());
    assert_eq!(text.0, source);
}

#[test]
fn test_tokens_reproduce_broken_source() {
    let source = "m { a = = 1, b: [1 2 }\nx +";
    let parse = parse(source);
    assert!(!parse.errors().is_empty());
    let mut text = SourceText::default();
    walk(&mut text, parse.syntax());
    assert_eq!(text.0, source);
}

#[test]
fn test_visit_error_sees_recovered_tokens() {
    let parse = parse("m { a: [1 2 3] }");
    let mut recovered = Recovered::default();
    walk(&mut recovered, parse.syntax());
    assert_eq!(recovered.0, ["2 3"]);
}

#[test]
fn test_catch_all_sees_every_kind() {
    struct Kinds(Vec<NodeKind>);

    impl<'t> Visitor<'t> for Kinds {
        fn visit_node(&mut self, node: Node<'t>) {
            if !self.0.contains(&node.kind()) {
                self.0.push(node.kind());
            }
            walk_children(self, node.syntax());
        }
    }

    let parse = parse("V = \"a\"\nm { o: { s: \"x\" + \"y\" }, r: V + [\"z\"] }");
    let mut kinds = Kinds(Vec::new());
    walk(&mut kinds, parse.syntax());
    for kind in [
        NodeKind::File,
        NodeKind::Variable,
        NodeKind::Blueprint,
        NodeKind::BlueprintType,
        NodeKind::Members,
        NodeKind::Pair,
        NodeKind::FieldName,
        NodeKind::Object,
        NodeKind::Value,
        NodeKind::StringExpr,
        NodeKind::VariableRefExpr,
        NodeKind::ArrayExpr,
        NodeKind::Array,
        NodeKind::Elements,
        NodeKind::ArrayElement,
    ] {
        assert!(kinds.0.contains(&kind), "{kind} not visited");
    }
    assert!(!kinds.0.contains(&NodeKind::Error));
}

#[test]
fn test_specific_override_takes_precedence() {
    struct Modules {
        modules: usize,
        others: usize,
    }

    impl<'t> Visitor<'t> for Modules {
        fn visit_node(&mut self, node: Node<'t>) {
            self.others += 1;
            walk_children(self, node.syntax());
        }

        fn visit_blueprint(&mut self, _blueprint: Blueprint<'t>) {
            self.modules += 1;
        }
    }

    let parse = parse("a {}\nb {}\nX = 1\n");
    let mut visitor = Modules { modules: 0, others: 0 };
    walk(&mut visitor, parse.syntax());
    assert_eq!(visitor.modules, 2);
    // File, Variable, Value
    assert_eq!(visitor.others, 3);
}
