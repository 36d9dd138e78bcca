// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rulesets, selectors and declarations.

use std::fmt;

use gss_core::SourceLocation;

use super::tree::Block;
use super::values::Value;

/// `selector, selector { declarations }`
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub selectors: Vec<Selector>,
    /// Always a declaration block.
    pub block: Block,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

/// One compound selector, optionally followed by a combinator and the next
/// selector in the chain.
///
/// `div.menu > a:hover` is `div` with a `.menu` refiner, combined with `>`
/// to the selector `a` with a `:hover` refiner.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Element name, `*`, or `""` when the selector starts with a refiner.
    pub element: String,
    pub refiners: Vec<Refiner>,
    pub combinator: Option<Box<Combinator>>,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl Selector {
    pub fn new(element: impl Into<String>, location: SourceLocation) -> Self {
        Selector {
            element: element.into(),
            refiners: Vec::new(),
            combinator: None,
            location,
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefinerKind {
    Class,
    Id,
    PseudoClass,
    PseudoElement,
    Attribute,
}

/// A class, id, pseudo-class, pseudo-element or attribute condition.
///
/// For attributes, `name` holds everything between the brackets.
/// Functional pseudo-classes keep their argument text in `argument`.
#[derive(Debug, Clone, PartialEq)]
pub struct Refiner {
    pub kind: RefinerKind,
    pub name: String,
    pub argument: Option<String>,
    pub location: SourceLocation,
}

impl Refiner {
    pub fn new(kind: RefinerKind, name: impl Into<String>, location: SourceLocation) -> Self {
        Refiner {
            kind,
            name: name.into(),
            argument: None,
            location,
        }
    }
}

impl fmt::Display for Refiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RefinerKind::Class => write!(f, ".{}", self.name),
            RefinerKind::Id => write!(f, "#{}", self.name),
            RefinerKind::PseudoClass => {
                write!(f, ":{}", self.name)?;
                if let Some(argument) = &self.argument {
                    write!(f, "({})", argument)?;
                }
                Ok(())
            }
            RefinerKind::PseudoElement => write!(f, "::{}", self.name),
            RefinerKind::Attribute => write!(f, "[{}]", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinatorKind {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

impl CombinatorKind {
    pub fn symbol(self) -> &'static str {
        match self {
            CombinatorKind::Descendant => " ",
            CombinatorKind::Child => ">",
            CombinatorKind::AdjacentSibling => "+",
            CombinatorKind::GeneralSibling => "~",
        }
    }
}

/// Joins a selector to the one that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub selector: Selector,
    pub location: SourceLocation,
}

/// `property: value...;`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub values: Vec<Value>,
    /// The property was written with the IE `*property` hack.
    pub star_hack: bool,
    pub location: SourceLocation,
    pub comments: Vec<String>,
}

impl Declaration {
    pub fn new(property: impl Into<String>, values: Vec<Value>, location: SourceLocation) -> Self {
        Declaration {
            property: property.into(),
            values,
            star_hack: false,
            location,
            comments: Vec::new(),
        }
    }

    /// True if the last value is `!important`.
    pub fn is_important(&self) -> bool {
        matches!(self.values.last(), Some(Value::Priority(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refiner_display() {
        let loc = SourceLocation::unknown;
        assert_eq!(Refiner::new(RefinerKind::Class, "a", loc()).to_string(), ".a");
        assert_eq!(Refiner::new(RefinerKind::Id, "b", loc()).to_string(), "#b");
        assert_eq!(Refiner::new(RefinerKind::PseudoElement, "before", loc()).to_string(), "::before");
        let mut nth = Refiner::new(RefinerKind::PseudoClass, "nth-child", loc());
        nth.argument = Some("2n+1".to_string());
        assert_eq!(nth.to_string(), ":nth-child(2n+1)");
        assert_eq!(Refiner::new(RefinerKind::Attribute, "href^='x'", loc()).to_string(), "[href^='x']");
    }
}
