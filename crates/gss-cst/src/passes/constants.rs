// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Constant definitions and their inlining.
//!
//! [`CollectConstantDefinitions`] gathers every [`Definition`] in the tree.
//! [`ReplaceConstantReferences`] then replaces each [`ConstantReference`]
//! with a copy of the definition's values, expanding references inside
//! definitions as well, and removes the definitions.

use std::collections::HashMap;

use gss_core::{ErrorManager, GssDiagnostic, SourceLocation};
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{ConstantReference, CssTree, Declaration, Definition, NodeKind, Value};
use crate::visitor::{
    MutatingVisitController, MutatingVisitor, MutationControl, VisitControl, VisitController,
    VisitResult, Visitor,
};

pub const UNDEFINED_CONSTANT_ERROR: &str = "undefined constant";
pub const CYCLIC_CONSTANT_ERROR: &str = "constant definition refers to itself";
pub const EXPANSION_TOO_LARGE_ERROR: &str = "constant expands to too many values";

/// Limit on nested expansion; anything deeper is treated as a cycle.
const MAX_EXPANSION_DEPTH: usize = 32;

/// Limit on the values one constant may expand to, nested values included.
const MAX_EXPANDED_VALUES: usize = 10_000;

// ============================================================================
// Collection
// ============================================================================

/// Every definition in a tree, by name. When a name is defined more than
/// once the last definition wins.
#[derive(Debug, Clone, Default)]
pub struct ConstantDefinitions {
    definitions: HashMap<String, Vec<Definition>>,
}

impl ConstantDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, definition: Definition) {
        self.definitions
            .entry(definition.name.text.clone())
            .or_default()
            .push(definition);
    }

    /// The definition in effect for `name`.
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name).and_then(|all| all.last())
    }

    /// Every definition of `name`, in document order.
    pub fn all(&self, name: &str) -> &[Definition] {
        self.definitions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Defined names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Gathers definitions without changing the tree.
#[derive(Debug, Default)]
pub struct CollectConstantDefinitions {
    definitions: ConstantDefinitions,
}

impl CollectConstantDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the definitions of `tree`.
    pub fn collect(tree: &CssTree) -> ConstantDefinitions {
        let mut collector = CollectConstantDefinitions::new();
        VisitController::new(tree).start_visit(&mut collector);
        collector.definitions
    }

    pub fn definitions(&self) -> &ConstantDefinitions {
        &self.definitions
    }

    pub fn into_definitions(self) -> ConstantDefinitions {
        self.definitions
    }
}

impl CssCompilerPass for CollectConstantDefinitions {
    fn run_pass(&mut self, tree: &mut CssTree) {
        VisitController::new(tree).start_visit(self);
        debug!(constants = self.definitions.len(), "collected constant definitions");
    }
}

impl Visitor for CollectConstantDefinitions {
    fn enter_definition(&mut self, node: &Definition, _ctl: &mut VisitControl) -> VisitResult {
        self.definitions.add(node.clone());
        VisitResult::SkipChildren
    }

    fn enter_declaration(&mut self, _node: &Declaration, _ctl: &mut VisitControl) -> VisitResult {
        VisitResult::SkipChildren
    }
}

// ============================================================================
// Replacement
// ============================================================================

enum ExpandError {
    Undefined(String),
    Cyclic(String),
    TooLarge(String),
}

/// Inlines constant references and removes definitions.
///
/// A reference to an undefined constant is an error; the declaration that
/// holds it is removed, or the reference alone when it is not part of a
/// declaration.
pub struct ReplaceConstantReferences<'a> {
    errors: &'a mut dyn ErrorManager,
    definitions: ConstantDefinitions,
    /// Finished expansions, by constant name.
    expanded: HashMap<String, Vec<Value>>,
    drop_declaration: bool,
}

impl<'a> ReplaceConstantReferences<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager, definitions: ConstantDefinitions) -> Self {
        ReplaceConstantReferences {
            errors,
            definitions,
            expanded: HashMap::new(),
            drop_declaration: false,
        }
    }

    fn expand(&mut self, name: &str, depth: usize) -> Result<Vec<Value>, ExpandError> {
        if let Some(values) = self.expanded.get(name) {
            return Ok(values.clone());
        }
        if depth > MAX_EXPANSION_DEPTH {
            return Err(ExpandError::Cyclic(name.to_string()));
        }
        let values = match self.definitions.get(name) {
            Some(definition) => definition.values.clone(),
            None => return Err(ExpandError::Undefined(name.to_string())),
        };
        let values = self.expand_list(&values, depth + 1)?;
        if expanded_size(&values) > MAX_EXPANDED_VALUES {
            return Err(ExpandError::TooLarge(name.to_string()));
        }
        self.expanded.insert(name.to_string(), values.clone());
        Ok(values)
    }

    fn expand_list(&mut self, values: &[Value], depth: usize) -> Result<Vec<Value>, ExpandError> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::ConstantReference(reference) => {
                    out.extend(self.expand(&reference.name, depth)?);
                }
                Value::Composite(composite) => {
                    let mut composite = composite.clone();
                    composite.values = self.expand_list(&composite.values, depth)?;
                    out.push(Value::Composite(composite));
                }
                Value::Function(function) => {
                    let mut function = function.clone();
                    function.arguments = self.expand_list(&function.arguments, depth)?;
                    out.push(Value::Function(function));
                }
                other => out.push(other.deep_copy()),
            }
        }
        Ok(out)
    }

    fn report(&mut self, err: ExpandError, location: &SourceLocation) {
        let message = match err {
            ExpandError::Undefined(name) => format!("{}: {}", UNDEFINED_CONSTANT_ERROR, name),
            ExpandError::Cyclic(name) => format!("{}: {}", CYCLIC_CONSTANT_ERROR, name),
            ExpandError::TooLarge(name) => format!("{}: {}", EXPANSION_TOO_LARGE_ERROR, name),
        };
        self.errors
            .report(GssDiagnostic::new(message, location.clone()));
    }
}

/// Number of values in `values`, counting the parts of composites and
/// function arguments.
fn expanded_size(values: &[Value]) -> usize {
    values
        .iter()
        .map(|value| match value {
            Value::Composite(composite) => 1 + expanded_size(&composite.values),
            Value::Function(function) => 1 + expanded_size(&function.arguments),
            _ => 1,
        })
        .sum()
}

impl CssCompilerPass for ReplaceConstantReferences<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        debug!(constants = self.definitions.len(), "replace constant references");
        MutatingVisitController::new(tree).start_visit(self);
    }
}

impl MutatingVisitor for ReplaceConstantReferences<'_> {
    fn enter_definition(&mut self, _node: &mut Definition, ctl: &mut MutationControl) -> VisitResult {
        ctl.remove_current_node();
        VisitResult::SkipChildren
    }

    fn enter_declaration(
        &mut self,
        _node: &mut Declaration,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.drop_declaration = false;
        VisitResult::Continue
    }

    fn leave_declaration(&mut self, _node: &mut Declaration, ctl: &mut MutationControl) {
        if std::mem::take(&mut self.drop_declaration) {
            ctl.remove_current_node();
        }
    }

    fn enter_constant_reference(
        &mut self,
        node: &mut ConstantReference,
        ctl: &mut MutationControl,
    ) -> VisitResult {
        match self.expand(&node.name, 0) {
            Ok(values) => ctl.replace_current_value_with(values, false),
            Err(err) => {
                self.report(err, &node.location);
                if ctl.is_inside(NodeKind::Declaration) {
                    self.drop_declaration = true;
                } else {
                    ctl.remove_current_node();
                }
            }
        }
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Node;
    use crate::passes::test_support::{messages, parse, shape};
    use crate::passes::CreateDefinitionNodes;
    use gss_core::BasicErrorManager;

    fn run(text: &str) -> (CssTree, BasicErrorManager) {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateDefinitionNodes::new(&mut errors).run_pass(&mut tree);
        let definitions = CollectConstantDefinitions::collect(&tree);
        ReplaceConstantReferences::new(&mut errors, definitions).run_pass(&mut tree);
        (tree, errors)
    }

    fn declaration_text(node: &Node) -> String {
        match node {
            Node::Declaration(d) => d
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            other => panic!("expected a declaration, got {:?}", other),
        }
    }

    fn first_ruleset_values(tree: &CssTree) -> Vec<String> {
        let Node::Ruleset(ruleset) = &tree.body.children[0] else {
            panic!("expected a ruleset");
        };
        ruleset.block.children.iter().map(declaration_text).collect()
    }

    #[test]
    fn collect_keeps_every_definition() {
        let mut tree = parse("@def A 1; @def B 2; @def A 3;");
        let mut errors = BasicErrorManager::new();
        CreateDefinitionNodes::new(&mut errors).run_pass(&mut tree);
        let mut collector = CollectConstantDefinitions::new();
        collector.run_pass(&mut tree);
        let definitions = collector.into_definitions();
        assert_eq!(definitions.names(), vec!["A", "B"]);
        assert_eq!(definitions.all("A").len(), 2);
        assert_eq!(
            definitions.get("A").map(|d| d.values[0].to_string()),
            Some("3".to_string())
        );
        assert!(definitions.get("C").is_none());
    }

    #[test]
    fn references_are_inlined() {
        let (tree, errors) = run("@def COLOR #fff; @def PAD 1px 2px; .a { color: COLOR; padding: PAD 0 }");
        assert!(!errors.has_errors());
        assert_eq!(shape(&tree.body.children), vec!["ruleset"]);
        assert_eq!(first_ruleset_values(&tree), vec!["#fff", "1px 2px 0"]);
    }

    #[test]
    fn references_inside_functions_and_composites() {
        let (tree, _) = run("@def W 10px; @def FONT Arial; .a { width: calc(W + 1px); font: FONT, serif }");
        assert_eq!(
            first_ruleset_values(&tree),
            vec!["calc(10px + 1px)", "Arial,serif"]
        );
    }

    #[test]
    fn definitions_may_use_other_definitions() {
        let (tree, _) = run("@def BASE 2px; @def DOUBLE BASE BASE; .a { margin: DOUBLE }");
        assert_eq!(first_ruleset_values(&tree), vec!["2px 2px"]);
    }

    #[test]
    fn last_definition_wins() {
        let (tree, _) = run("@def C red; @def C blue; .a { color: C }");
        assert_eq!(first_ruleset_values(&tree), vec!["blue"]);
    }

    #[test]
    fn undefined_reference_removes_the_declaration() {
        let (tree, errors) = run(".a { color: MISSING; width: 1px }");
        assert_eq!(
            messages(&errors),
            vec![format!("{}: MISSING", UNDEFINED_CONSTANT_ERROR)]
        );
        assert_eq!(first_ruleset_values(&tree), vec!["1px"]);
    }

    #[test]
    fn cycles_are_reported() {
        let (tree, errors) = run("@def A B; @def B A; .a { x: A }");
        assert_eq!(errors.error_count(), 1);
        assert!(messages(&errors)[0].starts_with(CYCLIC_CONSTANT_ERROR));
        let Node::Ruleset(ruleset) = &tree.body.children[0] else {
            panic!("expected a ruleset");
        };
        assert!(ruleset.block.is_empty());
    }

    fn fan_out(levels: usize) -> String {
        let mut text = String::new();
        for level in 0..levels {
            text.push_str(&format!("@def C{0} C{1} C{1}; ", level, level + 1));
        }
        text.push_str(&format!("@def C{} x; .a {{ w: C0; h: 1px }}", levels));
        text
    }

    #[test]
    fn shared_definitions_expand_fully() {
        let (tree, errors) = run(&fan_out(3));
        assert!(!errors.has_errors(), "{}", errors.render_all());
        assert_eq!(first_ruleset_values(&tree), vec!["x x x x x x x x", "1px"]);
    }

    #[test]
    fn runaway_expansion_is_reported() {
        // C6 is the first to pass 10,000 values: 2^14.
        let (tree, errors) = run(&fan_out(20));
        assert_eq!(errors.error_count(), 1);
        assert_eq!(
            messages(&errors),
            vec![format!("{}: C6", EXPANSION_TOO_LARGE_ERROR)]
        );
        assert_eq!(first_ruleset_values(&tree), vec!["1px"]);
    }
}
