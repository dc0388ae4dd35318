//! SIMPLE slot values: operators, modifier sets, tokens and flags.

use std::fmt;

use bitflags::bitflags;

use crate::Name;

/// Operator carried by the virtual `Operator` node.
///
/// Unary plus/minus share `Add`/`Sub` with their infix forms; the parent
/// node kind tells them apart.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Shifts
    Shl,
    Shr,
    UShr,

    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,

    // Bitwise and logical
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,

    // Unary
    Not,
    Complement,
    Increment,
    Decrement,

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
}

impl Operator {
    const ALL: [Operator; 35] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::Lt,
        Self::Gt,
        Self::LtEq,
        Self::GtEq,
        Self::Eq,
        Self::NotEq,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Complement,
        Self::Increment,
        Self::Decrement,
        Self::Assign,
        Self::AddAssign,
        Self::SubAssign,
        Self::MulAssign,
        Self::DivAssign,
        Self::RemAssign,
        Self::AndAssign,
        Self::OrAssign,
        Self::XorAssign,
        Self::ShlAssign,
        Self::ShrAssign,
        Self::UShrAssign,
    ];

    /// Source-level symbol.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
            Self::Complement => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::RemAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::UShrAssign => ">>>=",
        }
    }

    /// Parse a source-level symbol.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Self::ALL.into_iter().find(|op| op.as_symbol() == symbol)
    }

    /// Returns `true` for `=` and the compound assignments.
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::RemAssign
                | Self::AndAssign
                | Self::OrAssign
                | Self::XorAssign
                | Self::ShlAssign
                | Self::ShrAssign
                | Self::UShrAssign
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const SYNCHRONIZED = 1 << 6;
        const NATIVE = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
    }
}

impl Modifiers {
    const KEYWORDS: [(Modifiers, &'static str); 12] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::STATIC, "static"),
        (Modifiers::FINAL, "final"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::SYNCHRONIZED, "synchronized"),
        (Modifiers::NATIVE, "native"),
        (Modifiers::TRANSIENT, "transient"),
        (Modifiers::VOLATILE, "volatile"),
        (Modifiers::STRICTFP, "strictfp"),
        (Modifiers::DEFAULT, "default"),
    ];

    /// Parse a whitespace-separated keyword list such as `"public static"`.
    pub fn from_keywords(text: &str) -> Option<Modifiers> {
        text.split_whitespace().try_fold(Modifiers::empty(), |acc, word| {
            Self::KEYWORDS
                .iter()
                .find(|(_, kw)| *kw == word)
                .map(|(flag, _)| acc | *flag)
        })
    }

    /// Keywords in canonical order, space separated.
    pub fn to_keywords(self) -> String {
        Self::KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, kw)| *kw)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Type of value a SIMPLE role holds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// Identifier or type name.
    Name,
    /// Literal token text (numbers, strings, characters), quotes included.
    Literal,
    Bool,
    Op,
    Modifiers,
    Count,
}

/// A SIMPLE slot value.
///
/// `Name` and `Literal` hold interned text and are only comparable by
/// integer within one interner; use [`Tree::same_value`](crate::Tree::same_value)
/// across trees.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Value {
    Name(Name),
    Literal(Name),
    Bool(bool),
    Op(Operator),
    Modifiers(Modifiers),
    Count(u32),
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Name(_) => ValueKind::Name,
            Value::Literal(_) => ValueKind::Literal,
            Value::Bool(_) => ValueKind::Bool,
            Value::Op(_) => ValueKind::Op,
            Value::Modifiers(_) => ValueKind::Modifiers,
            Value::Count(_) => ValueKind::Count,
        }
    }

    /// Interned text carried by this value, if any.
    pub const fn text(&self) -> Option<Name> {
        match self {
            Value::Name(n) | Value::Literal(n) => Some(*n),
            _ => None,
        }
    }

    /// Same value with its interned text (if any) replaced through `f`.
    #[must_use]
    pub fn map_text(self, f: impl FnOnce(Name) -> Name) -> Value {
        match self {
            Value::Name(n) => Value::Name(f(n)),
            Value::Literal(n) => Value::Literal(f(n)),
            other => other,
        }
    }
}

/// Abstraction category of a generalizable token.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenCategory {
    /// Simple names: variables, fields, methods.
    Name,
    /// Number, string and character literals.
    Literal,
    /// Named (non-primitive) types.
    Type,
}

impl TokenCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenCategory::Name => "name",
            TokenCategory::Literal => "literal",
            TokenCategory::Type => "type",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
