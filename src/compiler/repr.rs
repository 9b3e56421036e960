//! Required representations and the coercion table.
//!
//! Integers have two representations: a raw machine word living only inside
//! generated code (`PureInt`) and a boxed `Int` cell. Every use site states
//! which representation it needs and [`plan`] decides, statically, what code
//! bridges the gap or that no bridge exists.

use crate::value::Tag;
use std::fmt;

/// The representation a caller requires of a compiled sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repr {
    /// A raw machine integer.
    PureInt,
    /// A boxed `Int` cell.
    Int,
    /// A list: a `Cons` cell or `Nil`.
    Cons,
    /// A byte buffer.
    Bytes,
    /// Any cell; no constraint.
    Any,
    /// The value is discarded.
    Void,
}

impl Repr {
    pub fn name(self) -> &'static str {
        match self {
            Repr::PureInt => "pure-int",
            Repr::Int => "int",
            Repr::Cons => "cons",
            Repr::Bytes => "bytes",
            Repr::Any => "any",
            Repr::Void => "void",
        }
    }

    /// Whether the word produced under this representation is a cell address.
    pub fn is_cell(self) -> bool {
        !matches!(self, Repr::PureInt | Repr::Void)
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the compiler knows about a value it has just emitted code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The tag is fixed at compile time.
    Known(Tag),
    /// Some cell, decided at run time.
    Unknown,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Known(tag) => f.write_str(tag.name()),
            Shape::Unknown => f.write_str("unknown"),
        }
    }
}

/// Code that turns a value of some shape into the required representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Use the value as it is.
    Keep,
    /// Load the raw word out of a known `Int` cell.
    Unbox,
    /// Unbox through a runtime check; non-integers become 0.
    UnboxChecked,
    /// Allocate an `Int` cell around a raw word.
    Box,
    /// Pass an `Int` cell through a runtime check; anything else becomes a
    /// fresh `Int` of 0.
    BoxChecked,
}

/// Decide how to bring `actual` to `required`, or `None` on a type mismatch.
pub fn plan(actual: Shape, required: Repr) -> Option<Coercion> {
    use Coercion::*;

    let tag = match actual {
        _ if required == Repr::Void => return Some(Keep),
        Shape::Unknown if required == Repr::PureInt => return Some(UnboxChecked),
        Shape::Unknown if required == Repr::Int => return Some(BoxChecked),
        Shape::Unknown => return Some(Keep),
        Shape::Known(tag) => tag,
    };

    match (tag, required) {
        (Tag::PureInt, Repr::PureInt) => Some(Keep),
        (Tag::PureInt, Repr::Int | Repr::Any) => Some(Box),
        (Tag::PureInt, _) => None,

        (Tag::Int, Repr::PureInt) => Some(Unbox),
        (Tag::Int, Repr::Int | Repr::Any) => Some(Keep),
        (Tag::Int, _) => None,

        (_, Repr::PureInt | Repr::Int) => None,
        (_, Repr::Any | Repr::Void) => Some(Keep),
        (Tag::Cons | Tag::Nil, Repr::Cons) => Some(Keep),
        (Tag::Bytes, Repr::Bytes) => Some(Keep),
        (_, Repr::Cons | Repr::Bytes) => None,
    }
}
