// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Assembly of `@if`/`@elseif`/`@else` runs into [`ConditionalBlock`]s.
//!
//! Leaving an `@if` replaces it with a new conditional block holding its
//! rule. Leaving an `@elseif` or `@else` removes it and appends its rule to
//! that block, which by then is the previous sibling. A rule must follow
//! the rule it continues directly: any other node in between, or the end
//! of the enclosing block, closes the chain.

use gss_core::{ErrorManager, GssDiagnostic};
use tracing::{debug, error};

use super::CssCompilerPass;
use crate::nodes::{
    AtRuleType, Block, BlockKind, ConditionalBlock, ConditionalKind, ConditionalRule, CssTree,
    Declaration, Definition, FontFace, ImportRule, MediaRule, Node, PageRule, PageSelector,
    Ruleset, UnknownAtRule,
};
use crate::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};

pub const NO_PRECEDING_IF_ERROR: &str = "@elseif and @else must directly follow @if or @elseif";
pub const MISSING_CONDITION_ERROR: &str = "@if and @elseif need a condition";
pub const TOO_MANY_CONDITIONS_ERROR: &str = "@if and @elseif take a single condition";
pub const ELSE_WITH_PARAMETERS_ERROR: &str = "@else takes no condition";
pub const MISSING_BLOCK_ERROR: &str = "a conditional rule needs a block";

/// Where the rule being built goes once its at-rule is left.
enum Target {
    /// A new chain, spliced in place of the `@if`.
    New(ConditionalBlock),
    /// The chain already in the tree, just before the current node.
    Previous,
}

/// Groups conditional at-rule runs into conditional blocks.
pub struct CreateConditionalNodes<'a> {
    errors: &'a mut dyn ErrorManager,
    stack: Vec<(ConditionalKind, Target)>,
    /// True right after a chain that an `@elseif` or `@else` may continue.
    chain_open: bool,
}

impl<'a> CreateConditionalNodes<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager) -> Self {
        CreateConditionalNodes {
            errors,
            stack: Vec::new(),
            chain_open: false,
        }
    }

    fn error(&mut self, message: &str, node: &UnknownAtRule) {
        self.errors
            .report(GssDiagnostic::new(message, node.location.clone()));
    }

    /// Build the rule for a conditional at-rule. Problems are reported but
    /// the rule is built anyway.
    fn build_rule(&mut self, kind: ConditionalKind, node: &mut UnknownAtRule) -> ConditionalRule {
        match (kind, node.parameters.len()) {
            (ConditionalKind::Else, 0) => {}
            (ConditionalKind::Else, _) => self.error(ELSE_WITH_PARAMETERS_ERROR, node),
            (_, 0) => self.error(MISSING_CONDITION_ERROR, node),
            (_, 1) => {}
            (_, _) => self.error(TOO_MANY_CONDITIONS_ERROR, node),
        }
        let block = match node.block.take() {
            Some(block) => block,
            None => {
                self.error(MISSING_BLOCK_ERROR, node);
                Block::new(BlockKind::Generic)
            }
        };
        ConditionalRule {
            kind,
            parameters: std::mem::take(&mut node.parameters),
            block,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        }
    }

    fn close_chain(&mut self) -> VisitResult {
        self.chain_open = false;
        VisitResult::Continue
    }
}

fn conditional_kind(at_type: AtRuleType) -> Option<ConditionalKind> {
    match at_type {
        AtRuleType::If => Some(ConditionalKind::If),
        AtRuleType::ElseIf => Some(ConditionalKind::ElseIf),
        AtRuleType::Else => Some(ConditionalKind::Else),
        _ => None,
    }
}

impl CssCompilerPass for CreateConditionalNodes<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        debug!(children = tree.body.len(), "create conditional nodes");
        MutatingVisitController::new(tree).start_visit(self);
    }
}

impl MutatingVisitor for CreateConditionalNodes<'_> {
    fn enter_unknown_at_rule(
        &mut self,
        node: &mut UnknownAtRule,
        ctl: &mut MutationControl,
    ) -> VisitResult {
        match conditional_kind(node.at_type) {
            None => self.close_chain(),
            Some(ConditionalKind::If) => {
                let chain = ConditionalBlock::new(std::mem::take(&mut node.comments));
                self.stack.push((ConditionalKind::If, Target::New(chain)));
                self.close_chain()
            }
            Some(kind) if self.chain_open => {
                self.stack.push((kind, Target::Previous));
                self.close_chain()
            }
            Some(_) => {
                self.error(NO_PRECEDING_IF_ERROR, node);
                ctl.remove_current_node();
                VisitResult::SkipChildren
            }
        }
    }

    fn leave_unknown_at_rule(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        if conditional_kind(node.at_type).is_none() {
            return;
        }
        let Some((kind, target)) = self.stack.pop() else {
            return;
        };
        let rule = self.build_rule(kind, node);
        match target {
            Target::New(mut chain) => {
                chain.push_rule(rule);
                ctl.replace_current_block_child_with(vec![Node::ConditionalBlock(chain)], false);
                self.chain_open = true;
            }
            Target::Previous => {
                ctl.remove_current_node();
                ctl.update_previous_sibling(move |previous| match previous {
                    Node::ConditionalBlock(chain) => chain.push_rule(rule),
                    other => error!(kind = %other.kind(), "conditional rule has no chain to join"),
                });
                self.chain_open = kind != ConditionalKind::Else;
            }
        }
    }

    fn leave_block(&mut self, _node: &mut Block, _ctl: &mut MutationControl) {
        self.chain_open = false;
    }

    fn leave_declaration_block(&mut self, _node: &mut Block, _ctl: &mut MutationControl) {
        self.chain_open = false;
    }

    fn enter_ruleset(&mut self, _node: &mut Ruleset, _ctl: &mut MutationControl) -> VisitResult {
        self.close_chain()
    }

    fn enter_declaration(
        &mut self,
        _node: &mut Declaration,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.chain_open = false;
        VisitResult::SkipChildren
    }

    fn enter_definition(&mut self, _node: &mut Definition, _ctl: &mut MutationControl) -> VisitResult {
        self.chain_open = false;
        VisitResult::SkipChildren
    }

    fn enter_media_rule(&mut self, _node: &mut MediaRule, _ctl: &mut MutationControl) -> VisitResult {
        self.close_chain()
    }

    fn enter_page_rule(&mut self, _node: &mut PageRule, _ctl: &mut MutationControl) -> VisitResult {
        self.close_chain()
    }

    fn enter_page_selector(
        &mut self,
        _node: &mut PageSelector,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.close_chain()
    }

    fn enter_font_face(&mut self, _node: &mut FontFace, _ctl: &mut MutationControl) -> VisitResult {
        self.close_chain()
    }

    fn enter_import_rule(&mut self, _node: &mut ImportRule, _ctl: &mut MutationControl) -> VisitResult {
        self.close_chain()
    }

    fn enter_conditional_block(
        &mut self,
        _node: &mut ConditionalBlock,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.close_chain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Value;
    use crate::passes::test_support::{messages, parse, shape};
    use gss_core::{BasicErrorManager, SourceLocation};

    fn run(text: &str) -> (CssTree, BasicErrorManager) {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateConditionalNodes::new(&mut errors).run_pass(&mut tree);
        (tree, errors)
    }

    fn chain(node: &Node) -> &ConditionalBlock {
        match node {
            Node::ConditionalBlock(chain) => chain,
            other => panic!("expected a conditional block, got {:?}", other),
        }
    }

    fn kinds(chain: &ConditionalBlock) -> Vec<ConditionalKind> {
        chain.rules.iter().map(|rule| rule.kind).collect()
    }

    #[test]
    fn full_chain_becomes_one_block() {
        let text = "@if (A) { .a { b: c } } @elseif (B) { .b { c: d } } @else { .c { d: e } }";
        let (tree, errors) = run(text);
        assert!(!errors.has_errors());
        assert_eq!(shape(&tree.body.children), vec!["conditional block"]);
        let chain = chain(&tree.body.children[0]);
        assert_eq!(
            kinds(chain),
            vec![
                ConditionalKind::If,
                ConditionalKind::ElseIf,
                ConditionalKind::Else
            ]
        );
        assert_eq!(chain.location.excerpt(), text);
        assert!(chain.is_closed());
        match chain.rules[1].condition() {
            Some(Value::BooleanExpression(e)) => assert_eq!(e.text, "B"),
            other => panic!("unexpected condition {:?}", other),
        }
    }

    #[test]
    fn separate_ifs_make_separate_blocks() {
        let (tree, errors) = run("@if A { } @if B { } @else { }");
        assert!(!errors.has_errors());
        let children = &tree.body.children;
        assert_eq!(children.len(), 2);
        assert_eq!(kinds(chain(&children[0])), vec![ConditionalKind::If]);
        assert_eq!(
            kinds(chain(&children[1])),
            vec![ConditionalKind::If, ConditionalKind::Else]
        );
    }

    #[test]
    fn orphans_are_errors() {
        let (tree, errors) = run("@else { } .a { b: c } @elseif (A) { }");
        assert_eq!(
            messages(&errors),
            vec![NO_PRECEDING_IF_ERROR, NO_PRECEDING_IF_ERROR]
        );
        assert_eq!(shape(&tree.body.children), vec!["ruleset"]);
    }

    #[test]
    fn other_nodes_close_the_chain() {
        let (tree, errors) = run("@if (A) { } .x { y: z } @else { }");
        assert_eq!(messages(&errors), vec![NO_PRECEDING_IF_ERROR]);
        assert_eq!(shape(&tree.body.children), vec!["conditional block", "ruleset"]);

        let (_, errors) = run("@if (A) { } @def X 1; @else { }");
        assert_eq!(messages(&errors), vec![NO_PRECEDING_IF_ERROR]);

        let (_, errors) = run("@if (A) { } @else { } @else { }");
        assert_eq!(messages(&errors), vec![NO_PRECEDING_IF_ERROR]);
    }

    #[test]
    fn nested_chains() {
        let (tree, errors) =
            run("@if (A) { @if (B) { } @else { } } @elseif (C) { .x { @if (D) { y: z } } } @else { }");
        assert!(!errors.has_errors(), "{:?}", messages(&errors));
        assert_eq!(tree.body.len(), 1);
        let outer = chain(&tree.body.children[0]);
        assert_eq!(outer.rules.len(), 3);
        let inner = chain(&outer.rules[0].block.children[0]);
        assert_eq!(kinds(inner), vec![ConditionalKind::If, ConditionalKind::Else]);

        let Node::Ruleset(ruleset) = &outer.rules[1].block.children[0] else {
            panic!("expected a ruleset");
        };
        assert_eq!(kinds(chain(&ruleset.block.children[0])), vec![ConditionalKind::If]);
    }

    #[test]
    fn chain_does_not_continue_into_a_child_block() {
        let (_, errors) = run("@if (A) { @else { } }");
        assert_eq!(messages(&errors), vec![NO_PRECEDING_IF_ERROR]);
    }

    #[test]
    fn malformed_rules_are_reported_but_converted() {
        let (tree, errors) = run("@if { } @elseif (B); @else (C) { }");
        assert_eq!(
            messages(&errors),
            vec![
                MISSING_CONDITION_ERROR,
                MISSING_BLOCK_ERROR,
                ELSE_WITH_PARAMETERS_ERROR
            ]
        );
        assert_eq!(tree.body.len(), 1);
        assert_eq!(chain(&tree.body.children[0]).rules.len(), 3);
    }

    #[test]
    fn too_many_conditions() {
        let rule = UnknownAtRule::new("if", SourceLocation::unknown())
            .with_parameters(vec![Value::literal("A"), Value::literal("B")])
            .with_block(Block::new(BlockKind::Generic));
        let mut tree = CssTree::new(
            Block::with_children(BlockKind::Generic, vec![Node::UnknownAtRule(rule)]),
            SourceLocation::unknown(),
        );
        let mut errors = BasicErrorManager::new();
        CreateConditionalNodes::new(&mut errors).run_pass(&mut tree);
        assert_eq!(messages(&errors), vec![TOO_MANY_CONDITIONS_ERROR]);
        assert_eq!(chain(&tree.body.children[0]).rules[0].parameters.len(), 2);
    }

    #[test]
    fn if_comments_move_to_the_block() {
        let (tree, _) = run("/* chain */ @if (A) { } /* other */ @else { }");
        let chain = chain(&tree.body.children[0]);
        assert_eq!(chain.comments, vec!["/* chain */".to_string()]);
        assert!(chain.rules[0].comments.is_empty());
        assert_eq!(chain.rules[1].comments, vec!["/* other */".to_string()]);
    }
}
