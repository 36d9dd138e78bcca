// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Indented, human-readable CSS output.

use tracing::error;

use super::escape_string;
use crate::nodes::{
    CharSet, CompositeOperator, ConditionalBlock, CssTree, Declaration, Definition, FontFace,
    ImportRule, MediaRule, PageRule, PageSelector, Ruleset, Selector, UnknownAtRule, Value,
};
use crate::visitor::{VisitControl, VisitController, VisitResult, Visitor};

const INDENT: &str = "  ";

/// Prints a tree with one declaration per line and two-space indentation.
#[derive(Debug, Default)]
pub struct PrettyPrinter {
    out: String,
    indent: usize,
    failed: bool,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(tree: &CssTree) -> String {
        let mut printer = PrettyPrinter::new();
        printer.run(tree);
        printer.into_output()
    }

    pub fn run(&mut self, tree: &CssTree) {
        VisitController::new(tree).start_visit(self);
    }

    /// The output, ending with a single newline unless empty.
    pub fn into_output(self) -> String {
        let trimmed = self.out.trim();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}\n", trimmed)
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Start a rule, separating top-level rules by a blank line.
    fn begin_rule(&mut self, ctl: &VisitControl) {
        if ctl.is_top_level() && !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn open(&mut self, header: &str, ctl: &VisitControl) {
        self.begin_rule(ctl);
        self.line(&format!("{} {{", header));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    fn at_rule_header(name: &str, parameters: &[Value]) -> String {
        let parameters = values_text(parameters);
        if parameters.is_empty() {
            format!("@{}", name)
        } else {
            format!("@{} {}", name, parameters)
        }
    }
}

fn selector_text(selector: &Selector) -> String {
    let mut text = selector.element.clone();
    for refiner in &selector.refiners {
        text.push_str(&refiner.to_string());
    }
    if let Some(combinator) = &selector.combinator {
        match combinator.kind.symbol() {
            " " => text.push(' '),
            symbol => {
                text.push(' ');
                text.push_str(symbol);
                text.push(' ');
            }
        }
        text.push_str(&selector_text(&combinator.selector));
    }
    text
}

fn values_text(values: &[Value]) -> String {
    values
        .iter()
        .map(value_text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Media features lost their parentheses in parsing; they are put back.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(v) => escape_string(&v.value, v.quote),
        Value::Composite(v) => {
            let separator = match v.operator {
                CompositeOperator::Comma => ", ",
                CompositeOperator::Slash => "/",
            };
            v.values
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join(separator)
        }
        Value::Function(v) => {
            let mut text = format!("{}(", v.name);
            for argument in &v.arguments {
                match argument.as_literal() {
                    Some(",") => text.push_str(", "),
                    Some(" ") => text.push(' '),
                    _ => text.push_str(&value_text(argument)),
                }
            }
            text.push(')');
            text
        }
        Value::BooleanExpression(v) => format!("({})", v.text),
        other => other.to_string(),
    }
}

impl Visitor for PrettyPrinter {
    fn enter_ruleset(&mut self, node: &Ruleset, ctl: &mut VisitControl) -> VisitResult {
        let selectors: Vec<String> = node.selectors.iter().map(selector_text).collect();
        self.open(&selectors.join(", "), ctl);
        VisitResult::Continue
    }

    fn leave_ruleset(&mut self, _node: &Ruleset, _ctl: &mut VisitControl) {
        self.close();
    }

    fn enter_declaration(&mut self, node: &Declaration, _ctl: &mut VisitControl) -> VisitResult {
        self.write_declaration(node);
        VisitResult::SkipChildren
    }

    fn enter_unknown_at_rule(&mut self, node: &UnknownAtRule, ctl: &mut VisitControl) -> VisitResult {
        let header = Self::at_rule_header(&node.name, &node.parameters);
        match node.block {
            Some(_) => self.open(&header, ctl),
            None => {
                self.begin_rule(ctl);
                self.line(&format!("{};", header));
            }
        }
        VisitResult::Continue
    }

    fn leave_unknown_at_rule(&mut self, node: &UnknownAtRule, _ctl: &mut VisitControl) {
        if node.block.is_some() {
            self.close();
        }
    }

    fn enter_media_rule(&mut self, node: &MediaRule, ctl: &mut VisitControl) -> VisitResult {
        self.open(&Self::at_rule_header(&node.name, &node.parameters), ctl);
        VisitResult::Continue
    }

    fn leave_media_rule(&mut self, _node: &MediaRule, _ctl: &mut VisitControl) {
        self.close();
    }

    fn enter_page_rule(&mut self, node: &PageRule, ctl: &mut VisitControl) -> VisitResult {
        let mut header = format!("@{}", node.name);
        for (i, parameter) in node.parameters.iter().enumerate() {
            let text = value_text(parameter);
            if i == 0 || !text.starts_with(':') {
                header.push(' ');
            }
            header.push_str(&text);
        }
        self.open(&header, ctl);
        VisitResult::Continue
    }

    fn leave_page_rule(&mut self, _node: &PageRule, _ctl: &mut VisitControl) {
        self.close();
    }

    fn enter_page_selector(&mut self, node: &PageSelector, ctl: &mut VisitControl) -> VisitResult {
        self.open(&format!("@{}", node.name), ctl);
        VisitResult::Continue
    }

    fn leave_page_selector(&mut self, _node: &PageSelector, _ctl: &mut VisitControl) {
        self.close();
    }

    fn enter_font_face(&mut self, node: &FontFace, ctl: &mut VisitControl) -> VisitResult {
        self.open(&format!("@{}", node.name), ctl);
        VisitResult::Continue
    }

    fn leave_font_face(&mut self, _node: &FontFace, _ctl: &mut VisitControl) {
        self.close();
    }

    fn enter_charset(&mut self, node: &CharSet, _ctl: &mut VisitControl) -> VisitResult {
        self.line(&format!("{};", Self::at_rule_header("charset", &node.parameters)));
        VisitResult::SkipChildren
    }

    fn enter_import_rule(&mut self, node: &ImportRule, _ctl: &mut VisitControl) -> VisitResult {
        if !node.ignored {
            self.line(&format!("{};", Self::at_rule_header("import", &node.parameters)));
        }
        VisitResult::SkipChildren
    }

    fn enter_definition(&mut self, _node: &Definition, _ctl: &mut VisitControl) -> VisitResult {
        VisitResult::SkipChildren
    }

    fn enter_conditional_block(
        &mut self,
        node: &ConditionalBlock,
        ctl: &mut VisitControl,
    ) -> VisitResult {
        error!(location = %node.location, "conditional block reached the pretty printer");
        self.failed = true;
        ctl.stop_visit();
        VisitResult::Stop
    }
}

impl PrettyPrinter {
    fn write_declaration(&mut self, node: &Declaration) {
        let star = if node.star_hack { "*" } else { "" };
        let text = format!(
            "{}{}: {};",
            star,
            node.property,
            values_text(&node.values)
        );
        self.line(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::parse;
    use crate::passes::{CreateStandardAtRuleNodes, CssCompilerPass};
    use gss_core::BasicErrorManager;

    fn pretty(text: &str) -> String {
        let mut tree = parse(text);
        let mut errors = BasicErrorManager::new();
        CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut tree);
        PrettyPrinter::print(&tree)
    }

    #[test]
    fn rulesets() {
        assert_eq!(
            pretty(".a,.b>.c{color:red;font:12px/1.5 Arial,serif}.d{margin:0}"),
            ".a, .b > .c {\n  color: red;\n  font: 12px/1.5 Arial, serif;\n}\n\n.d {\n  margin: 0;\n}\n"
        );
    }

    #[test]
    fn nested_at_rules() {
        assert_eq!(
            pretty("@media screen and (color){.a{x:rgba(0,0,0,.5)}}"),
            "@media screen and (color) {\n  .a {\n    x: rgba(0, 0, 0, .5);\n  }\n}\n"
        );
    }

    #[test]
    fn statements() {
        assert_eq!(
            pretty("@charset \"UTF-8\";@import url(a.css);@custom x;.a{*zoom:1}"),
            "@charset \"UTF-8\";\n@import url(a.css);\n\n@custom x;\n\n.a {\n  *zoom: 1;\n}\n"
        );
    }

    #[test]
    fn page_rules() {
        assert_eq!(
            pretty("@page :first{margin:0;@top-left{content:'x'}}"),
            "@page :first {\n  margin: 0;\n  @top-left {\n    content: 'x';\n  }\n}\n"
        );
        assert_eq!(
            pretty("@page toc:first{margin:0}"),
            "@page toc:first {\n  margin: 0;\n}\n"
        );
    }

    #[test]
    fn empty_tree() {
        assert_eq!(pretty(""), "");
    }
}
