// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Reports at-rules of unrecognized type.

use std::collections::HashSet;

use gss_core::{ErrorManager, GssDiagnostic};
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{AtRuleType, CssTree, UnknownAtRule};
use crate::visitor::{VisitControl, VisitController, VisitResult, Visitor};

pub const UNKNOWN_AT_RULE_ERROR: &str = "unknown at-rule";

/// Reports every at-rule the compiler has no knowledge of, unless
/// unrecognized at-rules are allowed or the name is explicitly allowed.
pub struct CheckUnknownAtRules<'a> {
    errors: &'a mut dyn ErrorManager,
    allow_unrecognized: bool,
    allowed_names: HashSet<String>,
}

impl<'a> CheckUnknownAtRules<'a> {
    pub fn new(errors: &'a mut dyn ErrorManager, allow_unrecognized: bool) -> Self {
        CheckUnknownAtRules {
            errors,
            allow_unrecognized,
            allowed_names: HashSet::new(),
        }
    }

    /// Names (without `@`) accepted even when unrecognized at-rules are not.
    pub fn with_allowed_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_names
            .extend(names.into_iter().map(|name| name.into().to_ascii_lowercase()));
        self
    }
}

impl CssCompilerPass for CheckUnknownAtRules<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        if self.allow_unrecognized {
            return;
        }
        debug!(children = tree.body.len(), "check unknown at-rules");
        VisitController::new(tree).start_visit(self);
    }
}

impl Visitor for CheckUnknownAtRules<'_> {
    fn enter_unknown_at_rule(&mut self, node: &UnknownAtRule, _ctl: &mut VisitControl) -> VisitResult {
        let allowed = self.allowed_names.contains(&node.name.to_ascii_lowercase());
        if node.at_type == AtRuleType::Unknown && !allowed {
            self.errors.report(GssDiagnostic::new(
                format!("{}: @{}", UNKNOWN_AT_RULE_ERROR, node.name),
                node.location.clone(),
            ));
        }
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{messages, parse};
    use gss_core::BasicErrorManager;

    #[test]
    fn unknown_rules_are_reported_when_not_allowed() {
        let mut tree = parse("@custom x; @media screen { @other { } } @keyframes k { } @for x { }");
        let mut errors = BasicErrorManager::new();
        CheckUnknownAtRules::new(&mut errors, false).run_pass(&mut tree);
        assert_eq!(
            messages(&errors),
            vec!["unknown at-rule: @custom", "unknown at-rule: @other"]
        );
    }

    #[test]
    fn allowed_when_configured() {
        let mut tree = parse("@custom x; @other;");
        let mut errors = BasicErrorManager::new();
        CheckUnknownAtRules::new(&mut errors, true).run_pass(&mut tree);
        assert!(!errors.has_errors());

        CheckUnknownAtRules::new(&mut errors, false)
            .with_allowed_names(["CUSTOM"])
            .run_pass(&mut tree);
        assert_eq!(messages(&errors), vec!["unknown at-rule: @other"]);
    }
}
