// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compiler passes over a [`CssTree`].
//!
//! Each pass is a visitor run to completion by one of the visit controllers.
//! Passes never fail: problems are reported to an [`ErrorManager`] and the
//! pass applies a local recovery, usually removing the offending node.
//!
//! The usual order is:
//!
//! 1. [`CreateStandardAtRuleNodes`]
//! 2. [`CreateDefinitionNodes`]
//! 3. [`CreateConditionalNodes`]
//! 4. [`CheckUnknownAtRules`]
//! 5. [`EliminateConditionalNodes`]
//! 6. [`CollectConstantDefinitions`] then [`ReplaceConstantReferences`]
//! 7. [`CssClassRenaming`]
//!
//! [`ErrorManager`]: gss_core::ErrorManager

mod class_renaming;
mod conditional_nodes;
mod constants;
mod definition_nodes;
mod eliminate_conditionals;
mod standard_at_rules;
mod unknown_at_rules;

use crate::nodes::CssTree;

pub use class_renaming::CssClassRenaming;
pub use conditional_nodes::{
    CreateConditionalNodes, ELSE_WITH_PARAMETERS_ERROR, MISSING_BLOCK_ERROR,
    MISSING_CONDITION_ERROR, NO_PRECEDING_IF_ERROR, TOO_MANY_CONDITIONS_ERROR,
};
pub use constants::{
    CollectConstantDefinitions, ConstantDefinitions, ReplaceConstantReferences,
    CYCLIC_CONSTANT_ERROR, EXPANSION_TOO_LARGE_ERROR, UNDEFINED_CONSTANT_ERROR,
};
pub use definition_nodes::{
    CreateDefinitionNodes, DEF_BLOCK_ERROR, DEF_NAME_ERROR, DEF_NAME_WARNING,
    DEF_NO_PARAMETERS_ERROR,
};
pub use eliminate_conditionals::{
    evaluate_condition, ConditionError, EliminateConditionalNodes, INVALID_CONDITION_ERROR,
};
pub use standard_at_rules::{
    CreateStandardAtRuleNodes, CHARSET_PARAMETER_ERROR, CHARSET_POSITION_ERROR,
    DUPLICATE_CHARSET_WARNING, FONT_FACE_ERROR, IGNORED_IMPORT_WARNING, IMPORT_BLOCK_ERROR,
    IMPORT_BLOCKING_WARNING, IMPORT_PARAMETERS_ERROR, MEDIA_BLOCK_ERROR, MEDIA_CHILD_ERROR,
    MEDIA_QUERY_ERROR, PAGE_BLOCK_ERROR, PAGE_PARAMETERS_ERROR, PAGE_SELECTOR_ERROR,
};
pub use unknown_at_rules::{CheckUnknownAtRules, UNKNOWN_AT_RULE_ERROR};

/// A pass that rewrites or inspects a whole tree.
pub trait CssCompilerPass {
    fn run_pass(&mut self, tree: &mut CssTree);
}

#[cfg(test)]
pub(crate) mod test_support {
    use gss_core::BasicErrorManager;

    use crate::nodes::{CssTree, Node};
    use crate::parser::parse_str;

    pub(crate) fn parse(text: &str) -> CssTree {
        parse_str("test.gss", text).expect("parse")
    }

    pub(crate) fn messages(errors: &BasicErrorManager) -> Vec<String> {
        errors.errors().map(|d| d.message.clone()).collect()
    }

    pub(crate) fn warnings(errors: &BasicErrorManager) -> Vec<String> {
        errors.warnings().map(|d| d.message.clone()).collect()
    }

    /// Short names of the body's children, for shape assertions.
    pub(crate) fn shape(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|node| match node {
                Node::UnknownAtRule(rule) => format!("@{}", rule.name),
                other => other.kind().to_string(),
            })
            .collect()
    }
}
