// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fixture tests for the pass pipeline and printers.
//!
//! Each `tests/fixtures/<name>.gss` file is run through every tree pass and
//! printed; the output must match `<name>.css` (compact) or
//! `<name>.pretty.css` (pretty), ignoring surrounding whitespace.

use std::path::PathBuf;

use difference::assert_diff;
use gss_core::{BasicErrorManager, ErrorManager};
use gss_cst::passes::{
    CheckUnknownAtRules, CollectConstantDefinitions, CreateConditionalNodes,
    CreateDefinitionNodes, CreateStandardAtRuleNodes, EliminateConditionalNodes,
    ReplaceConstantReferences,
};
use gss_cst::{parse_str, CompactPrinter, CssCompilerPass, CssTree, PrettyPrinter};
use itertools::Itertools;

fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

fn compile(name: &str, conditions: &[&str]) -> CssTree {
    let source = read_fixture(&format!("{}.gss", name));
    let mut tree = match parse_str(name, &source) {
        Ok(tree) => tree,
        Err(e) => panic!("{}", e.render()),
    };
    let mut errors = BasicErrorManager::new();
    CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut tree);
    CreateDefinitionNodes::new(&mut errors).run_pass(&mut tree);
    CreateConditionalNodes::new(&mut errors).run_pass(&mut tree);
    CheckUnknownAtRules::new(&mut errors, false).run_pass(&mut tree);
    EliminateConditionalNodes::new(&mut errors, conditions.iter().copied()).run_pass(&mut tree);
    let definitions = CollectConstantDefinitions::collect(&tree);
    ReplaceConstantReferences::new(&mut errors, definitions).run_pass(&mut tree);
    assert!(!errors.has_errors(), "{}", errors.render_all());
    tree
}

fn assert_output(expected_file: &str, got: &str) {
    let expected = read_fixture(expected_file);
    let expected = visualize(expected.trim());
    let got = visualize(got.trim());
    if expected != got {
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn assert_compact(name: &str, conditions: &[&str]) {
    let tree = compile(name, conditions);
    assert_output(&format!("{}.css", name), &CompactPrinter::print(&tree));
}

#[test]
fn fixture_basic() {
    assert_compact("basic", &[]);
}

#[test]
fn fixture_basic_pretty() {
    let tree = compile("basic", &[]);
    assert_output("basic.pretty.css", &PrettyPrinter::print(&tree));
}

#[test]
fn fixture_constants() {
    assert_compact("constants", &[]);
}

#[test]
fn fixture_conditionals() {
    assert_compact("conditionals", &["MOBILE"]);
}

#[test]
fn fixture_at_rules() {
    assert_compact("at_rules", &[]);
}

#[test]
fn compact_output_reparses_to_the_same_output() {
    for name in ["basic", "constants", "at_rules"] {
        let first = CompactPrinter::print(&compile(name, &[]));
        let mut reparsed = parse_str("reparsed", &first).expect("compact output parses");
        let mut errors = BasicErrorManager::new();
        CreateStandardAtRuleNodes::new(&mut errors).run_pass(&mut reparsed);
        assert!(!errors.has_errors(), "{}", errors.render_all());
        assert_eq!(CompactPrinter::print(&reparsed), first, "fixture {}", name);
    }
}
