// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Property values, at-rule parameters and function arguments.

use std::fmt;
use std::sync::LazyLock;

use gss_core::SourceLocation;
use regex::Regex;

static CONSTANT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z_][A-Z_0-9]*$").expect("constant name pattern is valid")
});

/// True if `name` has the shape of a `@def` constant: upper case letters,
/// digits and underscores, not starting with a digit.
pub fn is_constant_name(name: &str) -> bool {
    CONSTANT_NAME.is_match(name)
}

/// A value in a declaration, at-rule parameter list or function argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    String(StringValue),
    Numeric(Numeric),
    Composite(CompositeValue),
    Function(FunctionValue),
    Priority(Priority),
    BooleanExpression(BooleanExpression),
    ConstantReference(ConstantReference),
}

impl Value {
    /// Shorthand for a literal with an unknown location.
    pub fn literal(text: impl Into<String>) -> Self {
        Value::Literal(Literal::new(text, SourceLocation::unknown()))
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Value::Literal(v) => &v.location,
            Value::String(v) => &v.location,
            Value::Numeric(v) => &v.location,
            Value::Composite(v) => &v.location,
            Value::Function(v) => &v.location,
            Value::Priority(v) => &v.location,
            Value::BooleanExpression(v) => &v.location,
            Value::ConstantReference(v) => &v.location,
        }
    }

    /// The literal text if this is a [`Literal`].
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(lit) => Some(&lit.text),
            _ => None,
        }
    }

    /// True for the `,`, `=` and space literals that separate function arguments.
    pub fn is_argument_separator(&self) -> bool {
        matches!(self.as_literal(), Some("," | "=" | " "))
    }

    pub fn deep_copy(&self) -> Value {
        self.clone()
    }
}

/// Source-faithful text for a value, used in diagnostics and tests.
///
/// This is not the compact printer's output: no whitespace is trimmed and
/// strings are written without escaping.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(v) => write!(f, "{}", v.text),
            Value::String(v) => write!(f, "{q}{}{q}", v.value, q = v.quote.as_char()),
            Value::Numeric(v) => write!(f, "{}{}", v.number, v.unit),
            Value::Composite(v) => {
                for (i, part) in v.values.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", v.operator.symbol())?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            Value::Function(v) => {
                write!(f, "{}(", v.name)?;
                for arg in &v.arguments {
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Value::Priority(_) => write!(f, "!important"),
            Value::BooleanExpression(v) => write!(f, "{}", v.text),
            Value::ConstantReference(v) => write!(f, "{}", v.name),
        }
    }
}

/// An identifier or any other bare token.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub location: SourceLocation,
}

impl Literal {
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Literal {
            text: text.into(),
            location,
        }
    }
}

/// The quote character a string was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// A quoted string. `value` holds the decoded contents without quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct StringValue {
    pub value: String,
    pub quote: Quote,
    pub location: SourceLocation,
}

/// A number with an optional unit: `10px`, `50%`, `.5`, `-2em`.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    /// The number as written.
    pub number: String,
    /// The unit, or `""` for a bare number.
    pub unit: String,
    pub location: SourceLocation,
}

/// Operator joining the parts of a [`CompositeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeOperator {
    Comma,
    Slash,
}

impl CompositeOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            CompositeOperator::Comma => ",",
            CompositeOperator::Slash => "/",
        }
    }
}

/// Values joined by `,` or `/`: `Arial, sans-serif` or `12px/1.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    pub operator: CompositeOperator,
    pub values: Vec<Value>,
    pub location: SourceLocation,
}

/// A function call such as `rgba(0, 0, 0, .5)` or `url(a.png)`.
///
/// The arguments keep their separators: `,` and `=` literals, and a `" "`
/// literal between space-separated arguments. A parenthesized group without a
/// function name is a function with an empty `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: String,
    pub arguments: Vec<Value>,
    pub location: SourceLocation,
}

/// The `!important` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Priority {
    pub location: SourceLocation,
}

/// A boolean condition: the parameter of `@if`/`@elseif`, or a parenthesized
/// media feature like `(color)`. `text` excludes the outer parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpression {
    pub text: String,
    pub location: SourceLocation,
}

/// A use of a `@def` constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantReference {
    pub name: String,
    pub location: SourceLocation,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_names() {
        assert!(is_constant_name("COLOR"));
        assert!(is_constant_name("_BASE_2"));
        assert!(!is_constant_name("2COLOR"));
        assert!(!is_constant_name("Color"));
        assert!(!is_constant_name(""));
    }

    #[test]
    fn separators() {
        assert!(Value::literal(",").is_argument_separator());
        assert!(Value::literal(" ").is_argument_separator());
        assert!(!Value::literal("a").is_argument_separator());
    }

    #[test]
    fn display_composite() {
        let value = Value::Composite(CompositeValue {
            operator: CompositeOperator::Slash,
            values: vec![Value::literal("12px"), Value::literal("1.5")],
            location: SourceLocation::unknown(),
        });
        assert_eq!(value.to_string(), "12px/1.5");
    }
}
