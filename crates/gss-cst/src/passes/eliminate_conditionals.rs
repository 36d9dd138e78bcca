// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Evaluation of conditional blocks against a set of true conditions.
//!
//! Every [`ConditionalBlock`] is replaced by the children of its first rule
//! whose condition holds, or removed when none does. The replacement is
//! visited, so chains nested inside the chosen branch are resolved too.

use std::collections::HashSet;

use gss_core::{ErrorManager, GssDiagnostic};
use thiserror::Error;
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{ConditionalBlock, ConditionalKind, ConditionalRule, CssTree, Value};
use crate::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};

pub const INVALID_CONDITION_ERROR: &str = "invalid condition";

/// A condition that does not parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at offset {offset} in '{text}'")]
pub struct ConditionError {
    pub message: String,
    pub text: String,
    pub offset: usize,
}

/// Evaluate a boolean condition such as `A && !(B || C)`.
///
/// Names in `true_conditions` are true, every other name is false.
pub fn evaluate_condition(
    text: &str,
    true_conditions: &HashSet<String>,
) -> Result<bool, ConditionError> {
    let mut evaluator = ConditionEvaluator {
        text,
        pos: 0,
        true_conditions,
    };
    let value = evaluator.parse_or()?;
    evaluator.skip_spaces();
    if evaluator.pos < text.len() {
        return Err(evaluator.error("unexpected text"));
    }
    Ok(value)
}

struct ConditionEvaluator<'t> {
    text: &'t str,
    pos: usize,
    true_conditions: &'t HashSet<String>,
}

impl<'t> ConditionEvaluator<'t> {
    fn error(&self, message: &str) -> ConditionError {
        ConditionError {
            message: message.to_string(),
            text: self.text.to_string(),
            offset: self.pos,
        }
    }

    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn skip_spaces(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_spaces();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<bool, ConditionError> {
        let mut value = self.parse_and()?;
        while self.eat("||") {
            let rhs = self.parse_and()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn parse_and(&mut self) -> Result<bool, ConditionError> {
        let mut value = self.parse_unary()?;
        while self.eat("&&") {
            let rhs = self.parse_unary()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn parse_unary(&mut self) -> Result<bool, ConditionError> {
        if self.eat("!") {
            return Ok(!self.parse_unary()?);
        }
        if self.eat("(") {
            let value = self.parse_or()?;
            if !self.eat(")") {
                return Err(self.error("expected ')'"));
            }
            return Ok(value);
        }
        self.skip_spaces();
        let name_len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
            .unwrap_or(self.rest().len());
        if name_len == 0 {
            return Err(self.error("expected a condition name"));
        }
        let name = &self.rest()[..name_len];
        let value = self.true_conditions.contains(name);
        self.pos += name_len;
        Ok(value)
    }
}

/// Resolves conditional blocks.
pub struct EliminateConditionalNodes<'a> {
    errors: &'a mut dyn ErrorManager,
    true_conditions: HashSet<String>,
}

impl<'a> EliminateConditionalNodes<'a> {
    pub fn new<I, S>(errors: &'a mut dyn ErrorManager, true_conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EliminateConditionalNodes {
            errors,
            true_conditions: true_conditions.into_iter().map(Into::into).collect(),
        }
    }

    fn holds(&self, rule: &ConditionalRule) -> Result<bool, ConditionError> {
        if rule.kind == ConditionalKind::Else {
            return Ok(true);
        }
        match rule.condition() {
            Some(Value::BooleanExpression(expression)) => {
                evaluate_condition(&expression.text, &self.true_conditions)
            }
            Some(Value::Literal(literal)) => {
                evaluate_condition(&literal.text, &self.true_conditions)
            }
            Some(other) => evaluate_condition(&other.to_string(), &self.true_conditions),
            None => Ok(false),
        }
    }
}

impl CssCompilerPass for EliminateConditionalNodes<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        debug!(
            children = tree.body.len(),
            conditions = self.true_conditions.len(),
            "eliminate conditional nodes"
        );
        MutatingVisitController::new(tree).start_visit(self);
    }
}

impl MutatingVisitor for EliminateConditionalNodes<'_> {
    fn enter_conditional_block(
        &mut self,
        node: &mut ConditionalBlock,
        ctl: &mut MutationControl,
    ) -> VisitResult {
        let mut chosen = None;
        for (index, rule) in node.rules.iter().enumerate() {
            match self.holds(rule) {
                Ok(true) => {
                    chosen = Some(index);
                    break;
                }
                Ok(false) => {}
                Err(err) => {
                    let message = format!("{}: {}", INVALID_CONDITION_ERROR, err);
                    self.errors
                        .report(GssDiagnostic::new(message, rule.location.clone()));
                    ctl.remove_current_node();
                    return VisitResult::SkipChildren;
                }
            }
        }
        match chosen {
            Some(index) => {
                let children = std::mem::take(&mut node.rules[index].block.children);
                ctl.replace_current_block_child_with(children, true);
            }
            None => ctl.remove_current_node(),
        }
        VisitResult::SkipChildren
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{parse, shape};
    use crate::passes::CreateConditionalNodes;
    use crate::nodes::Node;
    use gss_core::BasicErrorManager;

    fn conditions(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn run(text: &str, names: &[&str]) -> (CssTree, BasicErrorManager) {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateConditionalNodes::new(&mut errors).run_pass(&mut tree);
        EliminateConditionalNodes::new(&mut errors, names.iter().copied()).run_pass(&mut tree);
        (tree, errors)
    }

    fn class_names(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|node| match node {
                Node::Ruleset(ruleset) => Some(ruleset.selectors[0].refiners[0].name.clone()),
                _ => None,
            })
            .collect()
    }

    mod evaluate {
        use super::*;

        #[test]
        fn operators() {
            let set = conditions(&["A", "B"]);
            assert_eq!(evaluate_condition("A", &set), Ok(true));
            assert_eq!(evaluate_condition("C", &set), Ok(false));
            assert_eq!(evaluate_condition("!C", &set), Ok(true));
            assert_eq!(evaluate_condition("A && C", &set), Ok(false));
            assert_eq!(evaluate_condition("C || B", &set), Ok(true));
            assert_eq!(evaluate_condition("!(A && B) || C", &set), Ok(false));
            assert_eq!(evaluate_condition("A && (C || B)", &set), Ok(true));
            assert_eq!(evaluate_condition("BROWSER_IE6", &set), Ok(false));
        }

        #[test]
        fn and_binds_tighter_than_or() {
            let set = conditions(&["A"]);
            assert_eq!(evaluate_condition("A || B && C", &set), Ok(true));
            assert_eq!(evaluate_condition("B && C || A", &set), Ok(true));
        }

        #[test]
        fn malformed() {
            let set = conditions(&[]);
            assert!(evaluate_condition("", &set).is_err());
            assert!(evaluate_condition("A &&", &set).is_err());
            assert!(evaluate_condition("(A", &set).is_err());
            assert!(evaluate_condition("A B", &set).is_err());
        }
    }

    #[test]
    fn first_true_branch_wins() {
        let text = "@if (A) { .a { x: y } } @elseif (B) { .b { x: y } } @else { .c { x: y } }";
        let (tree, _) = run(text, &["B"]);
        assert_eq!(class_names(&tree.body.children), vec!["b"]);
        let (tree, _) = run(text, &["A", "B"]);
        assert_eq!(class_names(&tree.body.children), vec!["a"]);
        let (tree, _) = run(text, &[]);
        assert_eq!(class_names(&tree.body.children), vec!["c"]);
    }

    #[test]
    fn no_true_branch_removes_the_block() {
        let (tree, errors) = run(".x { a: b } @if (A) { .a { x: y } } .z { a: b }", &[]);
        assert!(!errors.has_errors());
        assert_eq!(class_names(&tree.body.children), vec!["x", "z"]);
    }

    #[test]
    fn nested_blocks_are_resolved() {
        let (tree, _) = run(
            "@if (A) { @if (B) { .ab { x: y } } @else { .a { x: y } } .after { x: y } }",
            &["A"],
        );
        assert_eq!(class_names(&tree.body.children), vec!["a", "after"]);
    }

    #[test]
    fn conditionals_inside_rulesets() {
        let (tree, _) = run(".a { @if (A) { color: red } @else { color: blue } }", &[]);
        let Node::Ruleset(ruleset) = &tree.body.children[0] else {
            panic!("expected a ruleset");
        };
        assert_eq!(shape(&ruleset.block.children), vec!["declaration"]);
        let Node::Declaration(declaration) = &ruleset.block.children[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(declaration.values[0].to_string(), "blue");
    }

    #[test]
    fn invalid_condition_is_an_error() {
        let (tree, errors) = run("@if (A &&) { .a { x: y } } .b { x: y }", &["A"]);
        assert_eq!(errors.error_count(), 1);
        let message = &errors.errors().next().expect("error").message;
        assert!(message.starts_with(INVALID_CONDITION_ERROR));
        assert_eq!(class_names(&tree.body.children), vec!["b"]);
    }
}
