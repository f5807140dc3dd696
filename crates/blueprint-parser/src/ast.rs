//! Typed view over the concrete syntax tree
//!
//! Each non-terminal has a thin wrapper around a [`SyntaxNode`] with
//! accessors for its children. Wrappers never own data and never fail on
//! malformed trees: a missing child is simply `None`.

pub mod visitor;

use crate::lexer::unquote;
use crate::resolve::{Resolver, VariableRef};
use crate::syntax::{NodeKind, SyntaxNode, SyntaxToken};
use crate::token::{Span, TokenKind};
use serde::Serialize;
use std::fmt;

pub use visitor::{walk, walk_children, walk_node, Node, Visitor};

/// A typed wrapper over one node kind.
pub trait AstNode<'t>: Copy {
    fn can_cast(kind: NodeKind) -> bool;

    fn cast(node: SyntaxNode<'t>) -> Option<Self>;

    fn syntax(&self) -> SyntaxNode<'t>;

    fn span(&self) -> Span {
        self.syntax().span()
    }

    /// Source text of the node, inner trivia included.
    fn text(&self) -> &'t str {
        self.syntax().text()
    }
}

macro_rules! ast_node {
    ($($(#[$meta:meta])* $name:ident => $kind:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $name<'t>(SyntaxNode<'t>);

        impl<'t> AstNode<'t> for $name<'t> {
            fn can_cast(kind: NodeKind) -> bool {
                kind == NodeKind::$kind
            }

            fn cast(node: SyntaxNode<'t>) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            fn syntax(&self) -> SyntaxNode<'t> {
                self.0
            }
        }

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }
    )*};
}

ast_node! {
    /// A whole module file.
    File => File,
    /// A module definition, `type { ... }`.
    Blueprint => Blueprint,
    BlueprintType => BlueprintType,
    /// A file-level `name = value` or `name += value`.
    Variable => Variable,
    Members => Members,
    /// A `field = value` entry.
    Pair => Pair,
    FieldName => FieldName,
    Object => Object,
    Value => Value,
    StringExpr => StringExpr,
    ArrayExpr => ArrayExpr,
    Array => Array,
    Elements => Elements,
    ArrayElement => ArrayElement,
    VariableRefExpr => VariableRefExpr,
    /// Input skipped during error recovery.
    ErrorNode => Error,
}

fn child<'t, N: AstNode<'t>>(node: SyntaxNode<'t>) -> Option<N> {
    node.child_nodes().find_map(N::cast)
}

fn children<'t, N: AstNode<'t> + 't>(node: SyntaxNode<'t>) -> impl Iterator<Item = N> + 't {
    node.child_nodes().filter_map(N::cast)
}

fn token<'t>(node: SyntaxNode<'t>, kind: TokenKind) -> Option<SyntaxToken<'t>> {
    node.first_token_of(kind)
}

// ============================================================================
// File level
// ============================================================================

/// A top-level definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'t> {
    Blueprint(Blueprint<'t>),
    Variable(Variable<'t>),
}

impl<'t> Item<'t> {
    pub fn syntax(&self) -> SyntaxNode<'t> {
        match self {
            Item::Blueprint(b) => b.syntax(),
            Item::Variable(v) => v.syntax(),
        }
    }
}

impl<'t> File<'t> {
    /// Modules and variables in source order. Recovered junk is skipped.
    pub fn items(&self) -> impl Iterator<Item = Item<'t>> + 't {
        self.0.child_nodes().filter_map(|n| match n.kind() {
            NodeKind::Blueprint => Blueprint::cast(n).map(Item::Blueprint),
            NodeKind::Variable => Variable::cast(n).map(Item::Variable),
            _ => None,
        })
    }

    pub fn blueprints(&self) -> impl Iterator<Item = Blueprint<'t>> + 't {
        children(self.0)
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable<'t>> + 't {
        children(self.0)
    }

    /// The first module whose `name` pair equals `name`.
    pub fn blueprint_named(&self, name: &str) -> Option<Blueprint<'t>> {
        self.blueprints()
            .find(|b| b.module_name().as_deref() == Some(name))
    }
}

impl<'t> Blueprint<'t> {
    pub fn blueprint_type(&self) -> Option<BlueprintType<'t>> {
        child(self.0)
    }

    /// The module type, e.g. `cc_library`.
    pub fn type_name(&self) -> Option<&'t str> {
        self.blueprint_type().and_then(|t| t.name())
    }

    pub fn members(&self) -> Option<Members<'t>> {
        child(self.0)
    }

    /// Pairs of the module body; empty for `type {}`.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<'t>> + 't {
        self.members().into_iter().flat_map(|m| m.pairs())
    }

    /// The body pair for `field`, if present.
    pub fn pair(&self, field: &str) -> Option<Pair<'t>> {
        self.pairs().find(|p| p.name() == Some(field))
    }

    /// The module's `name` property when it is a plain string.
    pub fn module_name(&self) -> Option<String> {
        match self.pair("name")?.value()?.kind()? {
            ValueKind::String(s) => Some(s.value()),
            _ => None,
        }
    }
}

impl<'t> BlueprintType<'t> {
    pub fn name_token(&self) -> Option<SyntaxToken<'t>> {
        token(self.0, TokenKind::BlueprintTypeName)
    }

    pub fn name(&self) -> Option<&'t str> {
        self.name_token().map(|t| t.text())
    }
}

/// Assignment operator of a variable definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignOp {
    /// `=`: replaces any earlier definition
    Assign,
    /// `+=`: extends the earlier definition
    Append,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignOp::Assign => f.write_str("="),
            AssignOp::Append => f.write_str("+="),
        }
    }
}

impl<'t> Variable<'t> {
    pub fn name_token(&self) -> Option<SyntaxToken<'t>> {
        token(self.0, TokenKind::VariableName)
    }

    pub fn name(&self) -> Option<&'t str> {
        self.name_token().map(|t| t.text())
    }

    pub fn operator(&self) -> Option<AssignOp> {
        self.0.significant_tokens().find_map(|t| match t.kind() {
            TokenKind::Equals => Some(AssignOp::Assign),
            TokenKind::PlusEquals => Some(AssignOp::Append),
            _ => None,
        })
    }

    pub fn value(&self) -> Option<Value<'t>> {
        child(self.0)
    }
}

// ============================================================================
// Object bodies
// ============================================================================

impl<'t> Members<'t> {
    pub fn pairs(&self) -> impl Iterator<Item = Pair<'t>> + 't {
        children(self.0)
    }
}

impl<'t> Object<'t> {
    pub fn members(&self) -> Option<Members<'t>> {
        child(self.0)
    }

    pub fn pairs(&self) -> impl Iterator<Item = Pair<'t>> + 't {
        self.members().into_iter().flat_map(|m| m.pairs())
    }
}

impl<'t> Pair<'t> {
    pub fn field_name(&self) -> Option<FieldName<'t>> {
        child(self.0)
    }

    pub fn name(&self) -> Option<&'t str> {
        self.field_name().map(|f| f.name())
    }

    pub fn value(&self) -> Option<Value<'t>> {
        child(self.0)
    }

    /// Module type followed by the names of the enclosing pairs, outermost
    /// first. For `srcs` in `cc_library { arch = { arm = { srcs = [] } } }`
    /// this is `["cc_library", "arch", "arm"]`. Empty when the pair is not
    /// inside a module.
    pub fn field_path(&self) -> Vec<&'t str> {
        let mut path = Vec::new();
        for node in self.0.ancestors() {
            if let Some(blueprint) = Blueprint::cast(node) {
                path.extend(blueprint.type_name());
                path.reverse();
                return path;
            }
            if let Some(name) = Pair::cast(node).and_then(|p| p.name()) {
                path.push(name);
            }
        }
        Vec::new()
    }
}

impl<'t> FieldName<'t> {
    pub fn token(&self) -> Option<SyntaxToken<'t>> {
        token(self.0, TokenKind::FieldName)
    }

    pub fn name(&self) -> &'t str {
        self.token().map(|t| t.text()).unwrap_or_default()
    }

    pub fn pair(&self) -> Option<Pair<'t>> {
        self.0.parent().and_then(Pair::cast)
    }

    /// True for a property written directly in a module body, as opposed
    /// to one nested inside an object value.
    pub fn is_blueprint_field(&self) -> bool {
        self.field_blueprint().is_some()
    }

    /// The module whose body declares this field directly.
    pub fn field_blueprint(&self) -> Option<Blueprint<'t>> {
        let members = self.0.ancestors().find(|n| n.kind() == NodeKind::Members)?;
        members.parent().and_then(Blueprint::cast)
    }
}

// ============================================================================
// Values
// ============================================================================

/// The populated alternative of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind<'t> {
    String(StringExpr<'t>),
    Array(ArrayExpr<'t>),
    Object(Object<'t>),
    Bool(SyntaxToken<'t>),
    Number(SyntaxToken<'t>),
    VariableRef(VariableRefExpr<'t>),
}

impl<'t> Value<'t> {
    /// The one populated alternative, or `None` for a value lost to recovery.
    pub fn kind(&self) -> Option<ValueKind<'t>> {
        for element in self.0.children() {
            if let Some(node) = element.as_node() {
                let kind = match node.kind() {
                    NodeKind::StringExpr => StringExpr::cast(node).map(ValueKind::String),
                    NodeKind::ArrayExpr => ArrayExpr::cast(node).map(ValueKind::Array),
                    NodeKind::Object => Object::cast(node).map(ValueKind::Object),
                    NodeKind::VariableRefExpr => {
                        VariableRefExpr::cast(node).map(ValueKind::VariableRef)
                    }
                    _ => None,
                };
                if kind.is_some() {
                    return kind;
                }
            } else if let Some(token) = element.as_token() {
                match token.kind() {
                    TokenKind::Bool => return Some(ValueKind::Bool(token)),
                    TokenKind::Number => return Some(ValueKind::Number(token)),
                    _ => {}
                }
            }
        }
        None
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind()? {
            ValueKind::Bool(t) => Some(t.text() == "true"),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self.kind()? {
            ValueKind::Number(t) => t.text().parse().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self.kind()? {
            ValueKind::String(s) => Some(s.value()),
            _ => None,
        }
    }
}

impl<'t> StringExpr<'t> {
    /// The `String` tokens joined by `+`.
    pub fn parts(&self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        self.0.child_tokens().filter(|t| t.kind() == TokenKind::String)
    }

    /// Literal text of the concatenation, quotes removed and escapes applied.
    pub fn value(&self) -> String {
        self.parts().map(|t| unquote(t.text())).collect()
    }
}

impl<'t> ArrayExpr<'t> {
    pub fn arrays(&self) -> impl Iterator<Item = Array<'t>> + 't {
        children(self.0)
    }

    /// Elements of every concatenated array, in order.
    pub fn elements(&self) -> impl Iterator<Item = ArrayElement<'t>> + 't {
        self.arrays().flat_map(|a| a.elements())
    }
}

impl<'t> Array<'t> {
    pub fn elements(&self) -> impl Iterator<Item = ArrayElement<'t>> + 't {
        child::<Elements<'t>>(self.0)
            .into_iter()
            .flat_map(|e| e.elements())
    }
}

impl<'t> Elements<'t> {
    pub fn elements(&self) -> impl Iterator<Item = ArrayElement<'t>> + 't {
        children(self.0)
    }
}

impl<'t> ArrayElement<'t> {
    pub fn token(&self) -> Option<SyntaxToken<'t>> {
        self.0.significant_tokens().next()
    }

    /// `String`, `Bool`, `Number`, `VariableName` or `Link`.
    pub fn kind(&self) -> Option<TokenKind> {
        self.token().map(|t| t.kind())
    }

    /// The element's literal text: strings and links are unquoted, other
    /// tokens are returned as written.
    pub fn literal(&self) -> Option<String> {
        let token = self.token()?;
        Some(match token.kind() {
            TokenKind::String | TokenKind::Link => unquote(token.text()),
            _ => token.text().to_string(),
        })
    }

    /// Module name a link points to, without the leading `:`.
    pub fn link_target(&self) -> Option<String> {
        let token = self.token().filter(|t| t.kind() == TokenKind::Link)?;
        let text = unquote(token.text());
        Some(text.trim_start_matches(':').to_string())
    }
}

impl<'t> VariableRefExpr<'t> {
    pub fn name_token(&self) -> Option<SyntaxToken<'t>> {
        token(self.0, TokenKind::VariableValueRef)
    }

    pub fn name(&self) -> Option<&'t str> {
        self.name_token().map(|t| t.text())
    }

    /// The value after `+`, if any.
    pub fn tail(&self) -> Option<Value<'t>> {
        child(self.0)
    }

    /// Look the referenced variable up in `resolver`, as visible at this
    /// reference.
    pub fn resolve(&self, resolver: &dyn Resolver) -> Option<VariableRef> {
        resolver.resolve_variable(self.name()?, self.span().start)
    }
}

impl<'t> ErrorNode<'t> {
    /// Significant tokens that were skipped.
    pub fn skipped(&self) -> impl Iterator<Item = SyntaxToken<'t>> + 't {
        self.0
            .descendant_tokens()
            .filter(|t| !t.kind().is_trivia())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn file(parse: &crate::Parse) -> File<'_> {
        File::cast(parse.syntax()).unwrap()
    }

    #[test]
    fn test_cast_checks_kind() {
        let parse = parse("x = 1");
        let root = parse.syntax();
        assert!(File::cast(root).is_some());
        assert!(Blueprint::cast(root).is_none());
    }

    #[test]
    fn test_value_kinds() {
        let parse = parse("a = true\nb = 7\nc = {}\nd = a\n");
        let kinds: Vec<_> = file(&parse)
            .variables()
            .map(|v| match v.value().and_then(|v| v.kind()) {
                Some(ValueKind::Bool(_)) => "bool",
                Some(ValueKind::Number(_)) => "number",
                Some(ValueKind::Object(_)) => "object",
                Some(ValueKind::VariableRef(_)) => "ref",
                Some(ValueKind::String(_)) => "string",
                Some(ValueKind::Array(_)) => "array",
                None => "none",
            })
            .collect();
        assert_eq!(kinds, ["bool", "number", "object", "ref"]);
    }

    #[test]
    fn test_field_path_through_nested_objects() {
        let parse = parse("cc_library { arch = { arm = { srcs = [] } } }");
        let srcs = parse
            .syntax()
            .descendants()
            .filter_map(Pair::cast)
            .find(|p| p.name() == Some("srcs"))
            .unwrap();
        assert_eq!(srcs.field_path(), ["cc_library", "arch", "arm"]);
    }

    #[test]
    fn test_link_target() {
        let parse = parse("java_library { libs: [\":core\"] }");
        let element = parse
            .syntax()
            .descendants()
            .find_map(ArrayElement::cast)
            .unwrap();
        assert_eq!(element.kind(), Some(TokenKind::Link));
        assert_eq!(element.literal().as_deref(), Some(":core"));
        assert_eq!(element.link_target().as_deref(), Some("core"));
    }
}
