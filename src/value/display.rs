//! Display implementation for cells
//!
//! This is the writer: it renders any cell back into text the reader
//! accepts, except for lambdas, builtins and errors, which render as
//! opaque `<...>` forms.

use super::{Cell, Tag};
use std::fmt;

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Tag::PureInt | Tag::Int => write!(f, "{}", self.word.get() as i64),
            Tag::Cons => write_list(self, f),
            Tag::Symbol => f.write_str(self.symbol_name().unwrap_or("")),
            Tag::Lambda => match self.lambda_params() {
                Some(params) => write!(f, "<fn {}>", params),
                None => f.write_str("<fn>"),
            },
            Tag::Builtin => match self.builtin() {
                Some(op) => write!(f, "<builtin {}>", op.name()),
                None => f.write_str("<builtin ?>"),
            },
            Tag::Bytes => {
                f.write_str("\"")?;
                for b in self.to_bytes().unwrap_or_default() {
                    match b {
                        b'"' => f.write_str("\\\"")?,
                        b'\\' => f.write_str("\\\\")?,
                        b'\n' => f.write_str("\\n")?,
                        b'\t' => f.write_str("\\t")?,
                        0x20..=0x7e => write!(f, "{}", b as char)?,
                        _ => write!(f, "\\x{:02x}", b)?,
                    }
                }
                f.write_str("\"")
            }
            Tag::Error => write!(f, "<error {}>", self.word.get() as i64),
            Tag::Nil => f.write_str("nil"),
        }
    }
}

fn write_list(cell: &Cell, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("(")?;
    let mut cur = cell;
    loop {
        match cur.car() {
            Some(head) => write!(f, "{}", head)?,
            None => f.write_str("nil")?,
        }
        match cur.cdr() {
            Some(tail) if tail.tag() == Tag::Cons => {
                f.write_str(" ")?;
                cur = tail;
            }
            Some(tail) if tail.tag() != Tag::Nil => {
                write!(f, " . {}", tail)?;
                break;
            }
            _ => break,
        }
    }
    f.write_str(")")
}

/// Render `value` into the byte buffer `buf`, truncating to its size and
/// zero-terminating when room is left. Returns the number of bytes written,
/// or `None` when `buf` is not a buffer.
pub fn write_into(value: &Cell, buf: &Cell) -> Option<usize> {
    let storage = buf.bytes()?;
    let text = value.to_string();
    let written = text.len().min(storage.len());
    for (slot, &b) in storage.iter().zip(text.as_bytes()) {
        slot.set(b);
    }
    if let Some(slot) = storage.get(written) {
        slot.set(0);
    }
    Some(written)
}
