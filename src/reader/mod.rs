//! Reader: source text to cells.
//!
//! Integers (decimal or `0x` hex), symbols, strings, `nil`, lists and the
//! `'x` quote shorthand. Strings read as byte buffers.

mod lexer;
mod parser;
mod token;

pub use lexer::Lexer;
pub use parser::Reader;
pub use token::{SourceLoc, Token, TokenWithLoc};

use crate::error::ReadError;
use crate::value::CellRef;

/// Read exactly one expression from `input`; anything after it is ignored.
pub fn read_str(input: &str) -> Result<CellRef, ReadError> {
    Reader::new(strip_shebang(input))
        .try_read()?
        .ok_or(ReadError::Empty)
}

/// Read every expression in `input`.
pub fn read_all(input: &str) -> Result<Vec<CellRef>, ReadError> {
    let mut reader = Reader::new(strip_shebang(input));
    let mut forms = Vec::new();
    while let Some(form) = reader.try_read()? {
        forms.push(form);
    }
    Ok(forms)
}

fn strip_shebang(input: &str) -> &str {
    match input.strip_prefix("#!") {
        Some(rest) => rest.find('\n').map_or("", |nl| &rest[nl..]),
        None => input,
    }
}
