//! Visitor pattern for traversing the syntax tree
//!
//! Every node kind has its own `visit_*` method. Each one defaults to
//! [`Visitor::visit_node`], the catch-all, which in turn walks the children.
//! Implementors override only the kinds they care about and call
//! [`walk_children`] to keep descending.
//!
//! # Example
//!
//! ```rust
//! use blueprint_parser::ast::{Blueprint, Visitor, walk};
//! use blueprint_parser::parse;
//!
//! struct ModuleTypes(Vec<String>);
//!
//! impl<'t> Visitor<'t> for ModuleTypes {
//!     fn visit_blueprint(&mut self, blueprint: Blueprint<'t>) {
//!         self.0.extend(blueprint.type_name().map(str::to_string));
//!     }
//! }
//!
//! let parse = parse("cc_library { name = \"a\" }\njava_library {}");
//! let mut types = ModuleTypes(Vec::new());
//! walk(&mut types, parse.syntax());
//! assert_eq!(types.0, ["cc_library", "java_library"]);
//! ```

use super::*;
use crate::syntax::SyntaxElement;

/// A syntax node tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'t> {
    File(File<'t>),
    Blueprint(Blueprint<'t>),
    BlueprintType(BlueprintType<'t>),
    Variable(Variable<'t>),
    Members(Members<'t>),
    Pair(Pair<'t>),
    FieldName(FieldName<'t>),
    Object(Object<'t>),
    Value(Value<'t>),
    StringExpr(StringExpr<'t>),
    ArrayExpr(ArrayExpr<'t>),
    Array(Array<'t>),
    Elements(Elements<'t>),
    ArrayElement(ArrayElement<'t>),
    VariableRefExpr(VariableRefExpr<'t>),
    Error(ErrorNode<'t>),
}

impl<'t> Node<'t> {
    pub fn new(node: SyntaxNode<'t>) -> Self {
        match node.kind() {
            NodeKind::File => Node::File(File(node)),
            NodeKind::Blueprint => Node::Blueprint(Blueprint(node)),
            NodeKind::BlueprintType => Node::BlueprintType(BlueprintType(node)),
            NodeKind::Variable => Node::Variable(Variable(node)),
            NodeKind::Members => Node::Members(Members(node)),
            NodeKind::Pair => Node::Pair(Pair(node)),
            NodeKind::FieldName => Node::FieldName(FieldName(node)),
            NodeKind::Object => Node::Object(Object(node)),
            NodeKind::Value => Node::Value(Value(node)),
            NodeKind::StringExpr => Node::StringExpr(StringExpr(node)),
            NodeKind::ArrayExpr => Node::ArrayExpr(ArrayExpr(node)),
            NodeKind::Array => Node::Array(Array(node)),
            NodeKind::Elements => Node::Elements(Elements(node)),
            NodeKind::ArrayElement => Node::ArrayElement(ArrayElement(node)),
            NodeKind::VariableRefExpr => Node::VariableRefExpr(VariableRefExpr(node)),
            NodeKind::Error => Node::Error(ErrorNode(node)),
        }
    }

    pub fn syntax(&self) -> SyntaxNode<'t> {
        match self {
            Node::File(n) => n.syntax(),
            Node::Blueprint(n) => n.syntax(),
            Node::BlueprintType(n) => n.syntax(),
            Node::Variable(n) => n.syntax(),
            Node::Members(n) => n.syntax(),
            Node::Pair(n) => n.syntax(),
            Node::FieldName(n) => n.syntax(),
            Node::Object(n) => n.syntax(),
            Node::Value(n) => n.syntax(),
            Node::StringExpr(n) => n.syntax(),
            Node::ArrayExpr(n) => n.syntax(),
            Node::Array(n) => n.syntax(),
            Node::Elements(n) => n.syntax(),
            Node::ArrayElement(n) => n.syntax(),
            Node::VariableRefExpr(n) => n.syntax(),
            Node::Error(n) => n.syntax(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.syntax().kind()
    }
}

impl<'t> From<SyntaxNode<'t>> for Node<'t> {
    fn from(node: SyntaxNode<'t>) -> Self {
        Node::new(node)
    }
}

/// Syntax tree visitor trait
pub trait Visitor<'t>: Sized {
    /// Catch-all for every kind without its own override.
    fn visit_node(&mut self, node: Node<'t>) {
        walk_children(self, node.syntax());
    }

    /// Called for every token, trivia included, reached by the walk.
    fn visit_token(&mut self, _token: SyntaxToken<'t>) {}

    fn visit_file(&mut self, file: File<'t>) {
        self.visit_node(Node::File(file));
    }

    fn visit_blueprint(&mut self, blueprint: Blueprint<'t>) {
        self.visit_node(Node::Blueprint(blueprint));
    }

    fn visit_blueprint_type(&mut self, ty: BlueprintType<'t>) {
        self.visit_node(Node::BlueprintType(ty));
    }

    fn visit_variable(&mut self, variable: Variable<'t>) {
        self.visit_node(Node::Variable(variable));
    }

    fn visit_members(&mut self, members: Members<'t>) {
        self.visit_node(Node::Members(members));
    }

    fn visit_pair(&mut self, pair: Pair<'t>) {
        self.visit_node(Node::Pair(pair));
    }

    fn visit_field_name(&mut self, name: FieldName<'t>) {
        self.visit_node(Node::FieldName(name));
    }

    fn visit_object(&mut self, object: Object<'t>) {
        self.visit_node(Node::Object(object));
    }

    fn visit_value(&mut self, value: Value<'t>) {
        self.visit_node(Node::Value(value));
    }

    fn visit_string_expr(&mut self, expr: StringExpr<'t>) {
        self.visit_node(Node::StringExpr(expr));
    }

    fn visit_array_expr(&mut self, expr: ArrayExpr<'t>) {
        self.visit_node(Node::ArrayExpr(expr));
    }

    fn visit_array(&mut self, array: Array<'t>) {
        self.visit_node(Node::Array(array));
    }

    fn visit_elements(&mut self, elements: Elements<'t>) {
        self.visit_node(Node::Elements(elements));
    }

    fn visit_array_element(&mut self, element: ArrayElement<'t>) {
        self.visit_node(Node::ArrayElement(element));
    }

    fn visit_variable_ref_expr(&mut self, expr: VariableRefExpr<'t>) {
        self.visit_node(Node::VariableRefExpr(expr));
    }

    fn visit_error(&mut self, error: ErrorNode<'t>) {
        self.visit_node(Node::Error(error));
    }
}

/// Walk the tree rooted at `root`.
pub fn walk<'t, V: Visitor<'t>>(visitor: &mut V, root: SyntaxNode<'t>) {
    walk_node(visitor, Node::new(root));
}

/// Dispatch one node to its `visit_*` method.
pub fn walk_node<'t, V: Visitor<'t>>(visitor: &mut V, node: Node<'t>) {
    match node {
        Node::File(n) => visitor.visit_file(n),
        Node::Blueprint(n) => visitor.visit_blueprint(n),
        Node::BlueprintType(n) => visitor.visit_blueprint_type(n),
        Node::Variable(n) => visitor.visit_variable(n),
        Node::Members(n) => visitor.visit_members(n),
        Node::Pair(n) => visitor.visit_pair(n),
        Node::FieldName(n) => visitor.visit_field_name(n),
        Node::Object(n) => visitor.visit_object(n),
        Node::Value(n) => visitor.visit_value(n),
        Node::StringExpr(n) => visitor.visit_string_expr(n),
        Node::ArrayExpr(n) => visitor.visit_array_expr(n),
        Node::Array(n) => visitor.visit_array(n),
        Node::Elements(n) => visitor.visit_elements(n),
        Node::ArrayElement(n) => visitor.visit_array_element(n),
        Node::VariableRefExpr(n) => visitor.visit_variable_ref_expr(n),
        Node::Error(n) => visitor.visit_error(n),
    }
}

/// Visit every child of `node` in source order.
pub fn walk_children<'t, V: Visitor<'t>>(visitor: &mut V, node: SyntaxNode<'t>) {
    for child in node.children() {
        match child {
            SyntaxElement::Node(n) => walk_node(visitor, Node::new(n)),
            SyntaxElement::Token(t) => visitor.visit_token(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct KindCounter {
        nodes: Vec<NodeKind>,
        tokens: usize,
    }

    impl<'t> Visitor<'t> for KindCounter {
        fn visit_node(&mut self, node: Node<'t>) {
            self.nodes.push(node.kind());
            walk_children(self, node.syntax());
        }

        fn visit_token(&mut self, _token: SyntaxToken<'t>) {
            self.tokens += 1;
        }
    }

    #[test]
    fn test_default_walk_reaches_every_element() {
        let parse = parse("m { a = [1] }");
        let mut counter = KindCounter::default();
        walk(&mut counter, parse.syntax());
        assert_eq!(counter.tokens, parse.tree().tokens().len());
        assert_eq!(
            counter.nodes,
            [
                NodeKind::File,
                NodeKind::Blueprint,
                NodeKind::BlueprintType,
                NodeKind::Members,
                NodeKind::Pair,
                NodeKind::FieldName,
                NodeKind::Value,
                NodeKind::ArrayExpr,
                NodeKind::Array,
                NodeKind::Elements,
                NodeKind::ArrayElement,
            ]
        );
    }

    #[test]
    fn test_override_stops_descent() {
        struct Pairs(usize);

        impl<'t> Visitor<'t> for Pairs {
            fn visit_pair(&mut self, _pair: Pair<'t>) {
                self.0 += 1;
            }
        }

        let parse = parse("m { a = { b = 1 }, c = 2 }");
        let mut pairs = Pairs(0);
        walk(&mut pairs, parse.syntax());
        // `b` sits inside `a` and is never reached
        assert_eq!(pairs.0, 2);
    }
}
