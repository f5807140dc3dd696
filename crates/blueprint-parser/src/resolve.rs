//! Name resolution hooks
//!
//! The tree model never searches beyond the file it was parsed from. Looking
//! up a module or a variable goes through a [`Resolver`] supplied by the
//! caller; [`FileScope`] is the single-file implementation.

use crate::ast::{AssignOp, AstNode, File};
use crate::token::Span;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A module definition found by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRef {
    /// Module type, e.g. `cc_library`
    pub type_name: String,
    /// Value of the module's `name` property
    pub name: String,
    /// Span of the whole definition
    pub span: Span,
}

/// A variable definition found by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableRef {
    pub name: String,
    pub operator: AssignOp,
    /// Span of the whole definition
    pub span: Span,
    /// Span of the assigned value
    pub value_span: Option<Span>,
}

/// Lookup service for names that a tree refers to.
pub trait Resolver {
    /// Find the module named `name`.
    fn resolve_module(&self, name: &str) -> Option<ModuleRef>;

    /// Find the definition of `name` visible at byte offset `at`.
    fn resolve_variable(&self, name: &str, at: usize) -> Option<VariableRef>;
}

/// Names defined in a single file.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    modules: FxHashMap<String, ModuleRef>,
    /// Definitions per name, in source order
    variables: FxHashMap<String, Vec<VariableRef>>,
}

impl FileScope {
    /// Collect every named module and variable definition in `file`.
    pub fn new(file: File<'_>) -> Self {
        let mut scope = Self::default();

        for blueprint in file.blueprints() {
            let (Some(type_name), Some(name)) = (blueprint.type_name(), blueprint.module_name())
            else {
                continue;
            };
            // First definition wins; duplicates are a build error, not ours
            scope.modules.entry(name.clone()).or_insert(ModuleRef {
                type_name: type_name.to_string(),
                name,
                span: blueprint.span(),
            });
        }

        for variable in file.variables() {
            let (Some(name), Some(operator)) = (variable.name(), variable.operator()) else {
                continue;
            };
            scope
                .variables
                .entry(name.to_string())
                .or_default()
                .push(VariableRef {
                    name: name.to_string(),
                    operator,
                    span: variable.span(),
                    value_span: variable.value().map(|v| v.span()),
                });
        }

        tracing::trace!(
            modules = scope.modules.len(),
            variables = scope.variables.len(),
            "built file scope"
        );
        scope
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleRef> {
        self.modules.values()
    }

    /// The definitions that make up the value of `name` at offset `at`: the
    /// last `=` that ends before `at` followed by every later `+=` that also
    /// ends before `at`. A definition is not visible inside its own value.
    pub fn definitions(&self, name: &str, at: usize) -> &[VariableRef] {
        let Some(defs) = self.variables.get(name) else {
            return &[];
        };
        let visible = defs.partition_point(|d| d.span.end <= at);
        let defs = &defs[..visible];
        let base = defs
            .iter()
            .rposition(|d| d.operator == AssignOp::Assign)
            .unwrap_or(0);
        &defs[base..]
    }
}

impl Resolver for FileScope {
    fn resolve_module(&self, name: &str) -> Option<ModuleRef> {
        self.modules.get(name).cloned()
    }

    fn resolve_variable(&self, name: &str, at: usize) -> Option<VariableRef> {
        self.definitions(name, at).last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, VariableRefExpr};
    use crate::parser::parse;

    const SOURCE: &str = r#"
FLAGS = ["-Wall"]
FLAGS += ["-Werror"]
cc_library {
    name = "libfoo",
    cflags = FLAGS,
}
FLAGS = []
"#;

    #[test]
    fn test_module_lookup() {
        let parse = parse(SOURCE);
        let scope = FileScope::new(File::cast(parse.syntax()).unwrap());
        let module = scope.resolve_module("libfoo").unwrap();
        assert_eq!(module.type_name, "cc_library");
        assert!(scope.resolve_module("libbar").is_none());
    }

    #[test]
    fn test_variable_visible_at_reference() {
        let parse = parse(SOURCE);
        let scope = FileScope::new(File::cast(parse.syntax()).unwrap());
        let reference = parse
            .syntax()
            .descendants()
            .find_map(VariableRefExpr::cast)
            .unwrap();

        let found = reference.resolve(&scope).unwrap();
        assert_eq!(found.operator, AssignOp::Append);

        let chain = scope.definitions("FLAGS", reference.span().start);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].operator, AssignOp::Assign);

        // After the later `=`, only that definition is visible
        let end = scope.definitions("FLAGS", SOURCE.len());
        assert_eq!(end.len(), 1);
    }

    #[test]
    fn test_reference_in_own_value_sees_earlier_definition() {
        let source = "A = \"x\"\nA += A";
        let parse = parse(source);
        let scope = FileScope::new(File::cast(parse.syntax()).unwrap());
        let reference = parse
            .syntax()
            .descendants()
            .find_map(VariableRefExpr::cast)
            .unwrap();
        assert_eq!(reference.span().start, 13);

        let found = reference.resolve(&scope).unwrap();
        assert_eq!(found.operator, AssignOp::Assign);
        assert_eq!(found.span.start, 0);
        assert_eq!(found.span.end, 7);

        // Once the `+=` line is complete, both definitions apply
        assert_eq!(scope.definitions("A", source.len()).len(), 2);
    }
}
