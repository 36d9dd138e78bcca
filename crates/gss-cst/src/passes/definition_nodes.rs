// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Conversion of `@def NAME value...;` into [`Definition`] nodes.

use gss_core::{ErrorManager, GssDiagnostic};
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{is_constant_name, AtRuleType, CssTree, Definition, Node, UnknownAtRule, Value};
use crate::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};

pub const DEF_BLOCK_ERROR: &str = "@def cannot have a block";
pub const DEF_NO_PARAMETERS_ERROR: &str = "@def needs a name and a value";
pub const DEF_NAME_ERROR: &str = "the name of a @def must be an identifier";
pub const DEF_NAME_WARNING: &str =
    "constant names should be upper case letters, digits and underscores";

/// Turns `@def` at-rules into definitions.
pub struct CreateDefinitionNodes<'a> {
    errors: &'a mut dyn ErrorManager,
}

impl<'a> CreateDefinitionNodes<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager) -> Self {
        CreateDefinitionNodes { errors }
    }
}

impl CssCompilerPass for CreateDefinitionNodes<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        debug!(children = tree.body.len(), "create definition nodes");
        MutatingVisitController::new(tree).start_visit(self);
    }
}

impl MutatingVisitor for CreateDefinitionNodes<'_> {
    fn enter_unknown_at_rule(
        &mut self,
        node: &mut UnknownAtRule,
        ctl: &mut MutationControl,
    ) -> VisitResult {
        if node.at_type != AtRuleType::Def {
            return VisitResult::Continue;
        }
        let problem = if node.block.is_some() {
            Some(DEF_BLOCK_ERROR)
        } else {
            match node.parameters.first() {
                None => Some(DEF_NO_PARAMETERS_ERROR),
                Some(Value::Literal(_)) => None,
                Some(_) => Some(DEF_NAME_ERROR),
            }
        };
        if let Some(message) = problem {
            self.errors
                .report(GssDiagnostic::new(message, node.location.clone()));
            ctl.remove_current_node();
            return VisitResult::SkipChildren;
        }

        let mut parameters = std::mem::take(&mut node.parameters).into_iter();
        let Some(Value::Literal(name)) = parameters.next() else {
            return VisitResult::SkipChildren;
        };
        if !is_constant_name(&name.text) {
            self.errors
                .report_warning(GssDiagnostic::new(DEF_NAME_WARNING, name.location.clone()));
        }
        let definition = Definition {
            name,
            values: parameters.collect(),
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        ctl.replace_current_block_child_with(vec![Node::Definition(definition)], false);
        VisitResult::SkipChildren
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, parse, shape, warnings};
    use gss_core::BasicErrorManager;

    fn run(text: &str) -> (CssTree, BasicErrorManager) {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateDefinitionNodes::new(&mut errors).run_pass(&mut tree);
        (tree, errors)
    }

    fn definition(node: &Node) -> &Definition {
        match node {
            Node::Definition(definition) => definition,
            other => panic!("expected a definition, got {:?}", other),
        }
    }

    #[test]
    fn simple_definition() {
        let (tree, errors) = run("@def FOO 10px;");
        assert!(!errors.has_errors());
        let def = definition(&tree.body.children[0]);
        assert_eq!(def.name.text, "FOO");
        let values: Vec<String> = def.values.iter().map(|v| v.to_string()).collect();
        assert_eq!(values, vec!["10px"]);
        assert_eq!(def.location.excerpt(), "@def FOO 10px;");
    }

    #[test]
    fn values_may_reference_other_constants() {
        let (tree, _) = run("@def BORDER 1px solid BASE_COLOR;");
        let def = definition(&tree.body.children[0]);
        assert_eq!(def.values.len(), 3);
        assert!(matches!(def.values[2], Value::ConstantReference(_)));
    }

    #[test]
    fn lower_case_name_is_only_a_warning() {
        let (tree, errors) = run("@def foo 1;");
        assert!(!errors.has_errors());
        assert_eq!(warnings(&errors), vec![DEF_NAME_WARNING]);
        assert_eq!(definition(&tree.body.children[0]).name.text, "foo");
    }

    #[test]
    fn malformed_definitions_are_removed() {
        let (tree, errors) = run("@def X { a: b } @def; @def 'x' 1; .a { b: c }");
        assert_eq!(
            messages(&errors),
            vec![DEF_BLOCK_ERROR, DEF_NO_PARAMETERS_ERROR, DEF_NAME_ERROR]
        );
        assert_eq!(shape(&tree.body.children), vec!["ruleset"]);
    }

    #[test]
    fn nested_definitions_are_converted() {
        let (tree, errors) = run("@media screen { @def A 1; }");
        assert!(!errors.has_errors());
        let Node::UnknownAtRule(media) = &tree.body.children[0] else {
            panic!("expected an at-rule");
        };
        let block = media.block.as_ref().expect("block");
        assert_eq!(shape(&block.children), vec!["@def"]);
    }
}
