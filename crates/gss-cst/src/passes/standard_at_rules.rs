// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Classification of raw at-rules into typed nodes.
//!
//! One forward walk converts `@charset`, `@import`, `@media`, `@page`, the
//! page margin boxes and `@font-face`, validating each. A rule that fails
//! validation is reported and removed; the only exception is a malformed
//! first `@charset`, which is reported and still converted.
//!
//! `@charset` and the accepted `@import`s leave the body. They are buffered
//! while walking and moved to [`CssTree::charset`] and [`CssTree::imports`]
//! when the walk leaves the root. An `@import` that follows any other rule
//! stays in place, marked ignored.

use gss_core::{ErrorManager, GssDiagnostic, SourceLocation};
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{
    AtRuleType, Block, BlockKind, CharSet, CompositeOperator, ConditionalBlock, CssTree,
    Definition, FontFace, ImportRule, MediaRule, Node, NodeKind, PageRule, PageSelector,
    Ruleset, UnknownAtRule, Value,
};
use crate::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};

pub const CHARSET_PARAMETER_ERROR: &str = "@charset takes exactly one quoted string";
pub const CHARSET_POSITION_ERROR: &str = "@charset must be the first rule of the stylesheet";
pub const DUPLICATE_CHARSET_WARNING: &str = "duplicate @charset removed";
pub const IMPORT_PARAMETERS_ERROR: &str =
    "@import takes a string or url() followed by an optional media list";
pub const IMPORT_BLOCK_ERROR: &str = "@import cannot have a block";
pub const IGNORED_IMPORT_WARNING: &str = "@import after other rules is ignored";
pub const IMPORT_BLOCKING_WARNING: &str = "this rule causes a later @import to be ignored";
pub const MEDIA_BLOCK_ERROR: &str = "@media needs a block of rules";
pub const MEDIA_QUERY_ERROR: &str = "invalid media query";
pub const MEDIA_CHILD_ERROR: &str = "this rule is not allowed inside @media";
pub const PAGE_BLOCK_ERROR: &str = "@page needs a block of declarations";
pub const PAGE_PARAMETERS_ERROR: &str = "invalid @page selector";
pub const PAGE_SELECTOR_ERROR: &str =
    "a page margin box needs a block of declarations and takes no parameters";
pub const FONT_FACE_ERROR: &str =
    "@font-face needs a block of declarations and takes no parameters";

const PSEUDO_PAGES: [&str; 3] = [":left", ":right", ":first"];

/// Converts recognized raw at-rules into typed nodes.
pub struct CreateStandardAtRuleNodes<'a> {
    errors: &'a mut dyn ErrorManager,
    charset_seen: bool,
    charset: Option<CharSet>,
    imports: Vec<ImportRule>,
    /// The first rule after which imports are ignored.
    blocking: Option<SourceLocation>,
}

impl<'a> CreateStandardAtRuleNodes<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager) -> Self {
        CreateStandardAtRuleNodes {
            errors,
            charset_seen: false,
            charset: None,
            imports: Vec::new(),
            blocking: None,
        }
    }

    fn error(&mut self, message: &str, location: &SourceLocation) {
        self.errors
            .report(GssDiagnostic::new(message, location.clone()));
    }

    fn warning(&mut self, message: &str, location: &SourceLocation) {
        self.errors
            .report_warning(GssDiagnostic::new(message, location.clone()));
    }

    fn note_blocking(&mut self, location: &SourceLocation) {
        if self.blocking.is_none() {
            self.blocking = Some(location.clone());
        }
    }

    fn reject(&mut self, message: &str, location: &SourceLocation, ctl: &mut MutationControl) {
        self.error(message, location);
        ctl.remove_current_node();
    }

    // ========================================================================
    // Per-rule handlers
    // ========================================================================

    fn create_charset(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        if self.charset_seen {
            self.warning(DUPLICATE_CHARSET_WARNING, &node.location);
            ctl.remove_current_node();
            return;
        }
        self.charset_seen = true;
        if !ctl.is_top_level() || self.blocking.is_some() || !self.imports.is_empty() {
            self.reject(CHARSET_POSITION_ERROR, &node.location, ctl);
            return;
        }
        let well_formed =
            node.block.is_none() && matches!(node.parameters.as_slice(), [Value::String(_)]);
        if !well_formed {
            self.error(CHARSET_PARAMETER_ERROR, &node.location);
        }
        self.charset = Some(CharSet {
            parameters: std::mem::take(&mut node.parameters),
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        });
        ctl.remove_current_node();
    }

    fn create_import(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        if node.block.is_some() {
            self.reject(IMPORT_BLOCK_ERROR, &node.location, ctl);
            return;
        }
        if !is_valid_import(&node.parameters) {
            self.reject(IMPORT_PARAMETERS_ERROR, &node.location, ctl);
            return;
        }
        let mut import = ImportRule {
            parameters: std::mem::take(&mut node.parameters),
            ignored: false,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        match self.blocking.clone() {
            None => {
                self.imports.push(import);
                ctl.remove_current_node();
            }
            Some(blocking) => {
                self.warning(IGNORED_IMPORT_WARNING, &import.location);
                self.warning(IMPORT_BLOCKING_WARNING, &blocking);
                import.ignored = true;
                ctl.replace_current_block_child_with(vec![Node::Import(import)], false);
            }
        }
    }

    fn create_media(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        let block = match node.block.as_ref() {
            Some(block) if block.kind == BlockKind::Generic => block,
            _ => return self.reject(MEDIA_BLOCK_ERROR, &node.location, ctl),
        };
        if let Some(child) = block.children.iter().find(|c| !is_allowed_in_media(c)) {
            let location = child.location().clone();
            return self.reject(MEDIA_CHILD_ERROR, &location, ctl);
        }
        if !is_valid_media_query(&node.parameters) {
            return self.reject(MEDIA_QUERY_ERROR, &node.location, ctl);
        }
        let Some(block) = node.block.take() else {
            return;
        };
        let media = MediaRule {
            name: std::mem::take(&mut node.name),
            parameters: std::mem::take(&mut node.parameters),
            block,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        ctl.replace_current_block_child_with(vec![Node::Media(media)], true);
    }

    fn create_page(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        let Some(block) = take_declaration_block(node) else {
            return self.reject(PAGE_BLOCK_ERROR, &node.location, ctl);
        };
        if !is_valid_page_selector(&node.parameters) {
            node.block = Some(block);
            return self.reject(PAGE_PARAMETERS_ERROR, &node.location, ctl);
        }
        let page = PageRule {
            name: std::mem::take(&mut node.name),
            parameters: std::mem::take(&mut node.parameters),
            block,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        ctl.replace_current_block_child_with(vec![Node::Page(page)], true);
    }

    fn create_page_selector(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        let in_page = ctl.enclosing().ends_with(&[NodeKind::Page, NodeKind::DeclarationBlock]);
        if !in_page || !node.parameters.is_empty() {
            return self.reject(PAGE_SELECTOR_ERROR, &node.location, ctl);
        }
        let Some(block) = take_declaration_block(node) else {
            return self.reject(PAGE_SELECTOR_ERROR, &node.location, ctl);
        };
        let selector = PageSelector {
            name: std::mem::take(&mut node.name),
            block,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        ctl.replace_current_block_child_with(vec![Node::PageSelector(selector)], true);
    }

    fn create_font_face(&mut self, node: &mut UnknownAtRule, ctl: &mut MutationControl) {
        if !node.parameters.is_empty() {
            return self.reject(FONT_FACE_ERROR, &node.location, ctl);
        }
        let Some(block) = take_declaration_block(node) else {
            return self.reject(FONT_FACE_ERROR, &node.location, ctl);
        };
        let font_face = FontFace {
            name: std::mem::take(&mut node.name),
            block,
            location: node.location.clone(),
            comments: std::mem::take(&mut node.comments),
        };
        ctl.replace_current_block_child_with(vec![Node::FontFace(font_face)], true);
    }
}

impl CssCompilerPass for CreateStandardAtRuleNodes<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        debug!(children = tree.body.len(), "create standard at-rule nodes");
        MutatingVisitController::new(tree).start_visit(self);
    }
}

impl MutatingVisitor for CreateStandardAtRuleNodes<'_> {
    fn enter_tree(&mut self, node: &mut CssTree, _ctl: &mut MutationControl) -> VisitResult {
        self.charset_seen = node.charset.is_some();
        VisitResult::Continue
    }

    fn leave_tree(&mut self, node: &mut CssTree, _ctl: &mut MutationControl) {
        if let Some(charset) = self.charset.take() {
            node.charset.get_or_insert(charset);
        }
        node.imports.append(&mut self.imports);
    }

    fn enter_unknown_at_rule(
        &mut self,
        node: &mut UnknownAtRule,
        ctl: &mut MutationControl,
    ) -> VisitResult {
        match node.at_type {
            AtRuleType::Charset => self.create_charset(node, ctl),
            AtRuleType::Import => self.create_import(node, ctl),
            at_type => {
                self.note_blocking(&node.location);
                match at_type {
                    AtRuleType::Media => self.create_media(node, ctl),
                    AtRuleType::Page => self.create_page(node, ctl),
                    AtRuleType::PageMarginBox => self.create_page_selector(node, ctl),
                    AtRuleType::FontFace => self.create_font_face(node, ctl),
                    _ => {}
                }
            }
        }
        VisitResult::Continue
    }

    fn enter_ruleset(&mut self, node: &mut Ruleset, _ctl: &mut MutationControl) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_media_rule(&mut self, node: &mut MediaRule, _ctl: &mut MutationControl) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_page_rule(&mut self, node: &mut PageRule, _ctl: &mut MutationControl) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_page_selector(
        &mut self,
        node: &mut PageSelector,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_font_face(&mut self, node: &mut FontFace, _ctl: &mut MutationControl) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_definition(&mut self, node: &mut Definition, _ctl: &mut MutationControl) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::SkipChildren
    }

    fn enter_conditional_block(
        &mut self,
        node: &mut ConditionalBlock,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        self.note_blocking(&node.location);
        VisitResult::Continue
    }

    fn enter_charset(&mut self, node: &mut CharSet, ctl: &mut MutationControl) -> VisitResult {
        // A typed charset left in the body by an earlier run.
        if ctl.parent_kind() != Some(NodeKind::Tree) {
            if self.charset_seen {
                self.warning(DUPLICATE_CHARSET_WARNING, &node.location);
                ctl.remove_current_node();
            } else {
                self.charset_seen = true;
            }
        }
        VisitResult::SkipChildren
    }
}

// ============================================================================
// Validation
// ============================================================================

fn take_declaration_block(node: &mut UnknownAtRule) -> Option<Block> {
    match node.block.take() {
        Some(block) if block.kind == BlockKind::Declarations => Some(block),
        other => {
            node.block = other;
            None
        }
    }
}

fn is_valid_import(parameters: &[Value]) -> bool {
    let target_ok = |value: &Value| match value {
        Value::String(_) => true,
        Value::Function(function) => function.name.eq_ignore_ascii_case("url"),
        _ => false,
    };
    match parameters {
        [target] => target_ok(target),
        [target, media] => {
            target_ok(target) && matches!(media, Value::Composite(_) | Value::Literal(_))
        }
        _ => false,
    }
}

fn is_allowed_in_media(node: &Node) -> bool {
    match node {
        Node::Ruleset(_)
        | Node::ConditionalBlock(_)
        | Node::Media(_)
        | Node::Page(_)
        | Node::FontFace(_) => true,
        Node::UnknownAtRule(rule) => matches!(
            rule.at_type,
            AtRuleType::Page
                | AtRuleType::If
                | AtRuleType::ElseIf
                | AtRuleType::Else
                | AtRuleType::For
                | AtRuleType::Media
                | AtRuleType::Keyframes
                | AtRuleType::Supports
                | AtRuleType::FontFace
        ),
        _ => false,
    }
}

/// A piece of a flattened media query list.
enum QueryPart<'v> {
    Term(&'v Value),
    Comma,
}

fn flatten_query<'v>(values: &'v [Value], out: &mut Vec<QueryPart<'v>>) {
    for value in values {
        match value {
            Value::Composite(composite) if composite.operator == CompositeOperator::Comma => {
                for (i, part) in composite.values.iter().enumerate() {
                    if i > 0 {
                        out.push(QueryPart::Comma);
                    }
                    flatten_query(std::slice::from_ref(part), out);
                }
            }
            other => out.push(QueryPart::Term(other)),
        }
    }
}

/// `query (, query)*` where `query` is
/// `[only | not] expression (and expression)*`.
fn is_valid_media_query(parameters: &[Value]) -> bool {
    if parameters.is_empty() {
        return false;
    }
    let mut parts = Vec::new();
    flatten_query(parameters, &mut parts);
    parts
        .split(|part| matches!(part, QueryPart::Comma))
        .all(is_valid_single_query)
}

fn is_valid_single_query(parts: &[QueryPart<'_>]) -> bool {
    let mut terms = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            QueryPart::Term(value) => terms.push(*value),
            QueryPart::Comma => return false,
        }
    }
    let mut rest = terms.as_slice();
    if let Some(first) = rest.first().and_then(|v| v.as_literal()) {
        if first.eq_ignore_ascii_case("only") || first.eq_ignore_ascii_case("not") {
            rest = &rest[1..];
        }
    }
    if rest.is_empty() {
        return false;
    }
    rest.iter().enumerate().all(|(i, value)| {
        if i % 2 == 1 {
            value
                .as_literal()
                .is_some_and(|text| text.eq_ignore_ascii_case("and"))
        } else {
            is_media_expression(value)
        }
    }) && rest.len() % 2 == 1
}

fn is_media_expression(value: &Value) -> bool {
    match value {
        Value::BooleanExpression(_) => true,
        Value::Literal(literal) => {
            let text = literal.text.as_str();
            if text.starts_with('(') {
                return text.ends_with(')');
            }
            !["and", "only", "not"]
                .iter()
                .any(|keyword| text.eq_ignore_ascii_case(keyword))
        }
        _ => false,
    }
}

/// `[name] [pseudo-page]`, where a pseudo page is one of `:left`,
/// `:right` or `:first`.
fn is_valid_page_selector(parameters: &[Value]) -> bool {
    let is_pseudo = |value: &Value| {
        value
            .as_literal()
            .is_some_and(|text| PSEUDO_PAGES.contains(&text.to_ascii_lowercase().as_str()))
    };
    let is_name = |value: &Value| {
        value
            .as_literal()
            .is_some_and(|text| !text.is_empty() && !text.starts_with(':'))
    };
    match parameters {
        [] => true,
        [only] => is_pseudo(only) || is_name(only),
        [name, pseudo] => is_name(name) && is_pseudo(pseudo),
        _ => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
