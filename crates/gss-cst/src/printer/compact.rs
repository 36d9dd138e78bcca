// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Minimal-whitespace CSS output.
//!
//! The printer appends to one buffer as it walks. Every value is written
//! with a trailing space and whatever follows decides whether to keep it:
//! a declaration terminator, a closing parenthesis or an argument separator
//! trims it first. List separators are handled the same way, with the `,`
//! after the last selector trimmed when the block opens.

use tracing::error;

use super::escape_string;
use crate::nodes::{
    Block, BooleanExpression, CharSet, Combinator, CompositeOperator, CompositeValue,
    ConditionalBlock, ConstantReference, CssTree, Declaration, Definition, FontFace,
    FunctionValue, ImportRule, Literal, MediaRule, NodeKind, Numeric, PageRule, PageSelector,
    Priority, Refiner, Selector, StringValue, UnknownAtRule,
};
use crate::visitor::{VisitControl, VisitController, VisitResult, Visitor};

enum ValueFrame {
    Composite {
        operator: CompositeOperator,
        written: usize,
    },
    Function,
}

/// Prints a tree as compact CSS.
///
/// ```
/// use gss_cst::{parse_str, CompactPrinter};
///
/// let tree = parse_str("a.gss", ".a, .b { color: red; }").expect("parse");
/// assert_eq!(CompactPrinter::print(&tree), ".a,.b{color:red}");
/// ```
#[derive(Default)]
pub struct CompactPrinter {
    buffer: String,
    frames: Vec<ValueFrame>,
    /// Parameters written so far for the current `@page`.
    page_parameters: usize,
    failed: bool,
}

impl CompactPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `tree` and return the output.
    pub fn print(tree: &CssTree) -> String {
        let mut printer = CompactPrinter::new();
        printer.run(tree);
        printer.into_output()
    }

    /// Append the output for `tree` to the buffer.
    pub fn run(&mut self, tree: &CssTree) {
        VisitController::new(tree).start_visit(self);
    }

    /// The output so far, without surrounding whitespace.
    pub fn output(&self) -> &str {
        self.buffer.trim()
    }

    pub fn into_output(self) -> String {
        self.output().to_string()
    }

    /// True if printing stopped early on a node that cannot be printed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn trim_trailing(&mut self, c: char) {
        if self.buffer.ends_with(c) {
            self.buffer.pop();
        }
    }

    fn trim_space(&mut self) {
        let len = self.buffer.trim_end_matches(' ').len();
        self.buffer.truncate(len);
    }

    /// Write `text` as one value, separating it from the previous part of an
    /// enclosing composite.
    fn write_value(&mut self, text: &str) {
        self.begin_value();
        self.write(text);
        self.write(" ");
    }

    fn begin_value(&mut self) {
        if let Some(ValueFrame::Composite { operator, written }) = self.frames.last_mut() {
            let operator = *operator;
            *written += 1;
            if *written > 1 {
                self.trim_space();
                self.write(operator.symbol());
            }
        }
    }

    fn in_function(&self) -> bool {
        matches!(self.frames.last(), Some(ValueFrame::Function))
    }

    fn open_block(&mut self) {
        self.trim_space();
        self.trim_trailing(',');
        self.write("{");
    }

    fn at_rule_name(&mut self, name: &str) {
        self.write("@");
        self.write(name);
        self.write(" ");
    }

    fn end_statement(&mut self) {
        self.trim_space();
        self.write(";");
    }
}

impl Visitor for CompactPrinter {
    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    fn enter_block(&mut self, _node: &Block, ctl: &mut VisitControl) -> VisitResult {
        if ctl.parent_kind() != Some(NodeKind::Tree) {
            self.open_block();
        }
        VisitResult::Continue
    }

    fn leave_block(&mut self, _node: &Block, ctl: &mut VisitControl) {
        if ctl.parent_kind() != Some(NodeKind::Tree) {
            self.write("}");
        }
    }

    fn enter_declaration_block(&mut self, _node: &Block, _ctl: &mut VisitControl) -> VisitResult {
        self.open_block();
        VisitResult::Continue
    }

    fn leave_declaration_block(&mut self, _node: &Block, _ctl: &mut VisitControl) {
        self.trim_trailing(';');
        self.write("}");
    }

    // ------------------------------------------------------------------
    // Rulesets
    // ------------------------------------------------------------------

    fn enter_selector(&mut self, node: &Selector, _ctl: &mut VisitControl) -> VisitResult {
        self.write(&node.element);
        VisitResult::Continue
    }

    fn leave_selector(&mut self, _node: &Selector, ctl: &mut VisitControl) {
        if ctl.parent_kind() == Some(NodeKind::Ruleset) {
            self.write(",");
        }
    }

    fn enter_refiner(&mut self, node: &Refiner, _ctl: &mut VisitControl) -> VisitResult {
        self.write(&node.to_string());
        VisitResult::Continue
    }

    fn enter_combinator(&mut self, node: &Combinator, _ctl: &mut VisitControl) -> VisitResult {
        self.write(node.kind.symbol());
        VisitResult::Continue
    }

    fn enter_declaration(&mut self, node: &Declaration, _ctl: &mut VisitControl) -> VisitResult {
        if node.star_hack {
            self.write("*");
        }
        self.write(&node.property);
        self.write(":");
        VisitResult::Continue
    }

    fn leave_declaration(&mut self, _node: &Declaration, _ctl: &mut VisitControl) {
        self.end_statement();
    }

    // ------------------------------------------------------------------
    // At-rules
    // ------------------------------------------------------------------

    fn enter_unknown_at_rule(&mut self, node: &UnknownAtRule, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name(&node.name);
        VisitResult::Continue
    }

    fn leave_unknown_at_rule(&mut self, node: &UnknownAtRule, _ctl: &mut VisitControl) {
        if node.block.is_none() {
            self.end_statement();
        }
    }

    fn enter_media_rule(&mut self, node: &MediaRule, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name(&node.name);
        VisitResult::Continue
    }

    fn enter_page_rule(&mut self, node: &PageRule, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name(&node.name);
        self.page_parameters = 0;
        VisitResult::Continue
    }

    fn enter_page_selector(&mut self, node: &PageSelector, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name(&node.name);
        VisitResult::Continue
    }

    fn enter_font_face(&mut self, node: &FontFace, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name(&node.name);
        VisitResult::Continue
    }

    fn enter_charset(&mut self, _node: &CharSet, _ctl: &mut VisitControl) -> VisitResult {
        self.at_rule_name("charset");
        VisitResult::Continue
    }

    fn leave_charset(&mut self, _node: &CharSet, _ctl: &mut VisitControl) {
        self.end_statement();
    }

    fn enter_import_rule(&mut self, node: &ImportRule, _ctl: &mut VisitControl) -> VisitResult {
        if node.ignored {
            return VisitResult::SkipChildren;
        }
        self.at_rule_name("import");
        VisitResult::Continue
    }

    fn leave_import_rule(&mut self, node: &ImportRule, _ctl: &mut VisitControl) {
        if !node.ignored {
            self.end_statement();
        }
    }

    fn enter_definition(&mut self, _node: &Definition, _ctl: &mut VisitControl) -> VisitResult {
        VisitResult::SkipChildren
    }

    fn enter_conditional_block(
        &mut self,
        node: &ConditionalBlock,
        ctl: &mut VisitControl,
    ) -> VisitResult {
        error!(
            location = %node.location,
            "conditional block reached the compact printer; conditionals must be eliminated first"
        );
        self.failed = true;
        ctl.stop_visit();
        VisitResult::Stop
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn enter_literal(&mut self, node: &Literal, ctl: &mut VisitControl) -> VisitResult {
        if ctl.parent_kind() == Some(NodeKind::Page) {
            // `@page name:first`
            if self.page_parameters > 0 && node.text.starts_with(':') {
                self.trim_space();
            }
            self.page_parameters += 1;
        }
        let separator = Some(node.text.as_str())
            .filter(|text| self.in_function() && matches!(*text, "," | "=" | " "));
        match separator {
            Some(text) => {
                self.trim_space();
                self.write(text);
            }
            None => self.write_value(&node.text),
        }
        VisitResult::Continue
    }

    fn enter_string(&mut self, node: &StringValue, _ctl: &mut VisitControl) -> VisitResult {
        self.write_value(&escape_string(&node.value, node.quote));
        VisitResult::Continue
    }

    fn enter_numeric(&mut self, node: &Numeric, _ctl: &mut VisitControl) -> VisitResult {
        self.write_value(&format!("{}{}", node.number, node.unit));
        VisitResult::Continue
    }

    fn enter_composite(&mut self, node: &CompositeValue, _ctl: &mut VisitControl) -> VisitResult {
        self.begin_value();
        self.frames.push(ValueFrame::Composite {
            operator: node.operator,
            written: 0,
        });
        VisitResult::Continue
    }

    fn leave_composite(&mut self, _node: &CompositeValue, _ctl: &mut VisitControl) {
        self.frames.pop();
    }

    fn enter_function(&mut self, node: &FunctionValue, _ctl: &mut VisitControl) -> VisitResult {
        self.begin_value();
        self.write(&node.name);
        self.write("(");
        self.frames.push(ValueFrame::Function);
        VisitResult::Continue
    }

    fn leave_function(&mut self, _node: &FunctionValue, _ctl: &mut VisitControl) {
        self.frames.pop();
        self.trim_space();
        self.write(") ");
    }

    fn enter_priority(&mut self, _node: &Priority, _ctl: &mut VisitControl) -> VisitResult {
        self.write_value("!important");
        VisitResult::Continue
    }

    fn enter_boolean_expression(
        &mut self,
        node: &BooleanExpression,
        ctl: &mut VisitControl,
    ) -> VisitResult {
        if ctl.parent_kind() == Some(NodeKind::ConditionalRule) {
            self.write_value(&node.text);
        } else {
            self.write_value(&format!("({})", node.text));
        }
        VisitResult::Continue
    }

    fn enter_constant_reference(
        &mut self,
        node: &ConstantReference,
        _ctl: &mut VisitControl,
    ) -> VisitResult {
        self.write_value(&node.name);
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::parse;
    use crate::passes::{CreateConditionalNodes, CreateStandardAtRuleNodes, CssCompilerPass};
    use gss_core::{BasicErrorManager, ErrorManager};

    fn compact(text: &str) -> String {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut tree);
        assert!(!errors.has_errors(), "{}", errors.render_all());
        CompactPrinter::print(&tree)
    }

    mod rulesets {
        use super::*;

        #[test]
        fn trailing_semicolon_is_trimmed() {
            assert_eq!(
                compact(".a{color:red;}.b{color:blue;}"),
                ".a{color:red}.b{color:blue}"
            );
        }

        #[test]
        fn selector_list_has_no_spaces() {
            assert_eq!(compact(".a, .b { color: red; }"), ".a,.b{color:red}");
        }

        #[test]
        fn combinators_and_refiners() {
            assert_eq!(
                compact("div.a > p#b + span ~ em a:hover { x: y }"),
                "div.a>p#b+span~em a:hover{x:y}"
            );
        }

        #[test]
        fn empty_block() {
            assert_eq!(compact(".a { }"), ".a{}");
        }

        #[test]
        fn star_hack_and_priority() {
            assert_eq!(
                compact(".a { *zoom: 1; color: red !important; }"),
                ".a{*zoom:1;color:red !important}"
            );
        }
    }

    mod values {
        use super::*;

        #[test]
        fn function_space_is_trimmed_before_terminator() {
            let out = compact("A { width: mult(5, 6); }");
            assert_eq!(out, "A{width:mult(5,6)}");
            let out = compact("A { width: mult(5, 6); height: 1px }");
            assert!(out.contains("mult(5,6);height"), "{}", out);
        }

        #[test]
        fn legacy_filter_arguments() {
            assert_eq!(
                compact(".a { filter: alpha(opacity=80); }"),
                ".a{filter:alpha(opacity=80)}"
            );
        }

        #[test]
        fn progid_filter() {
            assert_eq!(
                compact(
                    ".a{filter:progid:DXImageTransform.Microsoft.gradient(startColorstr='#1', endColorstr='#2')}"
                ),
                ".a{filter:progid:DXImageTransform.Microsoft.gradient(startColorstr='#1',endColorstr='#2')}"
            );
        }

        #[test]
        fn space_separated_arguments() {
            assert_eq!(
                compact(".a { width: calc(100% - 10px); }"),
                ".a{width:calc(100% - 10px)}"
            );
        }

        #[test]
        fn composites() {
            assert_eq!(
                compact(".a { font: 12px/1.5 Arial, sans-serif; }"),
                ".a{font:12px/1.5 Arial,sans-serif}"
            );
        }

        #[test]
        fn numbers_and_colors() {
            assert_eq!(
                compact(".a { margin: 0 -2em .5px 10%; color: #fff }"),
                ".a{margin:0 -2em .5px 10%;color:#fff}"
            );
        }

        #[test]
        fn strings_are_escaped() {
            assert_eq!(
                compact(".a { content: \"<b>\"; }"),
                ".a{content:\"\\3c b\\3e \"}"
            );
        }
    }

    mod at_rules {
        use super::*;

        #[test]
        fn media_query_parentheses_are_restored() {
            assert_eq!(
                compact("@media screen and (color) { .a { x: y } }"),
                "@media screen and (color){.a{x:y}}"
            );
            assert_eq!(
                compact("@media (color), print { .a { x: y } }"),
                "@media (color),print{.a{x:y}}"
            );
        }

        #[test]
        fn named_page_with_pseudo_class() {
            assert_eq!(
                compact("@page toc:first { margin: 0 }"),
                "@page toc:first{margin:0}"
            );
            assert_eq!(
                compact("@page toc { margin: 0 } @page :left { margin: 1in }"),
                "@page toc{margin:0}@page :left{margin:1in}"
            );
        }

        #[test]
        fn page_and_font_face() {
            assert_eq!(
                compact("@page :first { margin: 0; @top-left { content: 'x' } }"),
                "@page :first{margin:0;@top-left{content:'x'}}"
            );
            assert_eq!(
                compact("@font-face { font-family: Foo; src: url(foo.woff); }"),
                "@font-face{font-family:Foo;src:url(foo.woff)}"
            );
        }

        #[test]
        fn charset_and_imports_lead() {
            assert_eq!(
                compact("@charset \"UTF-8\"; @import url(a.css) screen; .a { x: y }"),
                "@charset \"UTF-8\";@import url(a.css) screen;.a{x:y}"
            );
        }

        #[test]
        fn unknown_rules_pass_through() {
            assert_eq!(compact("@custom a b;"), "@custom a b;");
            assert_eq!(
                compact("@keyframes spin { from { x: y } }"),
                "@keyframes spin{from{x:y}}"
            );
        }

        #[test]
        fn ignored_imports_and_definitions_print_nothing() {
            let mut tree = parse(".a { x: y } @import 'late.css'; @def A 1;");
            let mut errors = BasicErrorManager::new();
            CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut tree);
            crate::passes::CreateDefinitionNodes::new(&mut errors).run_pass(&mut tree);
            assert_eq!(CompactPrinter::print(&tree), ".a{x:y}");
        }
    }

    #[test]
    fn conditional_block_stops_printing() {
        let mut tree = parse(".a { x: y } @if (A) { .b { x: y } } .c { x: y }");
        let mut errors = BasicErrorManager::new();
        CreateConditionalNodes::new(&mut errors).run_pass(&mut tree);
        let mut printer = CompactPrinter::new();
        printer.run(&tree);
        assert!(printer.failed());
        assert_eq!(printer.output(), ".a{x:y}");
    }
}
