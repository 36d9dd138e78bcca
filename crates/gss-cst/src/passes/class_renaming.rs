// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Renaming of class (and optionally id) selectors through substitution maps.

use std::collections::HashSet;

use gss_core::substitution::SubstitutionMap;
use tracing::debug;

use super::CssCompilerPass;
use crate::nodes::{CssTree, Declaration, Refiner, RefinerKind};
use crate::visitor::{MutatingVisitController, MutatingVisitor, MutationControl, VisitResult};

/// Rewrites class refiners with a [`SubstitutionMap`].
pub struct CssClassRenaming<'a> {
    classes: &'a mut dyn SubstitutionMap,
    ids: Option<&'a mut dyn SubstitutionMap>,
    excluded: HashSet<String>,
    renamed: usize,
}

impl<'a> CssClassRenaming<'a> {
    pub fn new(classes: &'a mut dyn SubstitutionMap) -> Self {
        CssClassRenaming {
            classes,
            ids: None,
            excluded: HashSet::new(),
            renamed: 0,
        }
    }

    /// Rename ids too, with their own map.
    pub fn with_id_map(mut self, ids: &'a mut dyn SubstitutionMap) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Class names that keep their name.
    pub fn with_excluded_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Number of refiners renamed so far.
    pub fn renamed(&self) -> usize {
        self.renamed
    }
}

impl CssCompilerPass for CssClassRenaming<'_> {
    fn run_pass(&mut self, tree: &mut CssTree) {
        MutatingVisitController::new(tree).start_visit(self);
        debug!(renamed = self.renamed, "css class renaming");
    }
}

impl MutatingVisitor for CssClassRenaming<'_> {
    fn enter_refiner(&mut self, node: &mut Refiner, _ctl: &mut MutationControl) -> VisitResult {
        let map = match node.kind {
            RefinerKind::Class if !self.excluded.contains(&node.name) => Some(&mut *self.classes),
            RefinerKind::Id => self.ids.as_deref_mut(),
            _ => None,
        };
        if let Some(map) = map {
            node.name = map.get(&node.name);
            self.renamed += 1;
        }
        VisitResult::Continue
    }

    fn enter_declaration(
        &mut self,
        _node: &mut Declaration,
        _ctl: &mut MutationControl,
    ) -> VisitResult {
        VisitResult::SkipChildren
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Node;
    use crate::passes::test_support::parse;
    use gss_core::substitution::{
        MinimalSubstitutionMap, RecordingSubstitutionMap, SimpleSubstitutionMap,
    };

    fn selector_names(tree: &CssTree) -> Vec<String> {
        tree.body
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Ruleset(ruleset) => Some(ruleset),
                _ => None,
            })
            .flat_map(|ruleset| ruleset.selectors.iter())
            .flat_map(|selector| {
                let mut names = Vec::new();
                let mut current = Some(selector);
                while let Some(selector) = current {
                    names.extend(selector.refiners.iter().map(|r| r.to_string()));
                    current = selector.combinator.as_ref().map(|c| &c.selector);
                }
                names
            })
            .collect()
    }

    #[test]
    fn classes_are_renamed() {
        let mut tree = parse(".a, .b > .c:hover { x: y } #main .a { x: y }");
        let mut map = SimpleSubstitutionMap;
        let mut pass = CssClassRenaming::new(&mut map);
        pass.run_pass(&mut tree);
        assert_eq!(pass.renamed(), 4);
        assert_eq!(
            selector_names(&tree),
            vec![".a_", ".b_", ".c_", ":hover", "#main", ".a_"]
        );
    }

    #[test]
    fn excluded_classes_keep_their_name() {
        let mut tree = parse(".keep .a { x: y }");
        let mut map = SimpleSubstitutionMap;
        CssClassRenaming::new(&mut map)
            .with_excluded_classes(["keep"])
            .run_pass(&mut tree);
        assert_eq!(selector_names(&tree), vec![".keep", ".a_"]);
    }

    #[test]
    fn ids_use_their_own_map() {
        let mut tree = parse("#main.a { x: y }");
        let mut classes = SimpleSubstitutionMap;
        let mut ids = MinimalSubstitutionMap::new();
        CssClassRenaming::new(&mut classes)
            .with_id_map(&mut ids)
            .run_pass(&mut tree);
        assert_eq!(selector_names(&tree), vec!["#a", ".a_"]);
    }

    #[test]
    fn renaming_is_recorded() {
        let mut tree = parse(".x .y .x { a: b }");
        let mut map = RecordingSubstitutionMap::new(MinimalSubstitutionMap::new());
        CssClassRenaming::new(&mut map).run_pass(&mut tree);
        assert_eq!(selector_names(&tree), vec![".a", ".b", ".a"]);
        assert_eq!(map.mappings(), vec![("x", "a"), ("y", "b")]);
    }
}
