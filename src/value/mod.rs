//! Tagged cells
//!
//! Every value the compiler or generated code touches is a [`Cell`]: two
//! machine words plus a tag. Generated code reads and writes the two words at
//! fixed offsets ([`WORD_OFFSET`], [`NEXT_OFFSET`]), so the layout is
//! `#[repr(C)]`.
//!
//! | tag      | word (offset 0)       | next (offset 8)      |
//! |----------|-----------------------|----------------------|
//! | Int      | integer value         | unused               |
//! | Cons     | head address          | tail address or 0    |
//! | Symbol   | name address          | name length          |
//! | Lambda   | parameter list        | code pointer or 0    |
//! | Builtin  | opcode                | unused               |
//! | Bytes    | data address          | length               |
//! | Error    | error code            | unused               |
//! | Nil      | unused                | unused               |
//!
//! Cells are never reclaimed (see [`heap`]), which is what makes
//! `&'static Cell` the natural reference type.

mod display;
pub mod heap;

pub use display::write_into;

use crate::builtins::Builtin;
use std::cell::Cell as Slot;
use std::fmt;

/// Byte offset of the first word inside a cell.
pub const WORD_OFFSET: i32 = 0;
/// Byte offset of the second word inside a cell.
pub const NEXT_OFFSET: i32 = 8;

/// Reference to a cell. Cells live for the rest of the process.
pub type CellRef = &'static Cell;

/// The fixed tag set.
///
/// `PureInt` never labels a heap cell; it names the state "generated code
/// holds a raw integer that has not been boxed yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Tag {
    PureInt,
    Int,
    Cons,
    Symbol,
    Lambda,
    Builtin,
    Bytes,
    Error,
    Nil,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::PureInt => "pure-int",
            Tag::Int => "int",
            Tag::Cons => "cons",
            Tag::Symbol => "symbol",
            Tag::Lambda => "lambda",
            Tag::Builtin => "builtin",
            Tag::Bytes => "bytes",
            Tag::Error => "error",
            Tag::Nil => "nil",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codes carried by `Error` cells produced at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum ErrorCode {
    /// `eval` could not compile its argument.
    Compile = 1,
    /// Text handed to the reader was malformed.
    Read = 2,
    /// A storage operation failed.
    Io = 3,
    /// A runtime helper ran outside of any session.
    NoSession = 4,
}

impl ErrorCode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ErrorCode::Compile),
            2 => Some(ErrorCode::Read),
            3 => Some(ErrorCode::Io),
            4 => Some(ErrorCode::NoSession),
            _ => None,
        }
    }
}

#[repr(C)]
pub struct Cell {
    word: Slot<u64>,
    next: Slot<u64>,
    tag: Tag,
}

/// Reinterpret a word produced by generated code as a cell reference.
///
/// # Safety
///
/// `bits` must be zero or the address of a live cell. Every word that
/// generated code hands back under a non-`PureInt` representation satisfies
/// this, as do the head/tail words of cons cells.
pub unsafe fn cell_at(bits: u64) -> Option<CellRef> {
    (bits as *const Cell).as_ref()
}

impl Cell {
    pub(crate) const fn new(tag: Tag, word: u64, next: u64) -> Self {
        Cell {
            word: Slot::new(word),
            next: Slot::new(next),
            tag,
        }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Address of this cell as generated code sees it.
    #[inline]
    pub fn addr(&self) -> u64 {
        self as *const Cell as u64
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.tag == Tag::Nil
    }

    /// Cons cells and `Nil` both count as lists.
    pub fn is_list(&self) -> bool {
        matches!(self.tag, Tag::Cons | Tag::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        (self.tag == Tag::Int).then(|| self.word.get() as i64)
    }

    pub fn car(&self) -> Option<CellRef> {
        if self.tag != Tag::Cons {
            return None;
        }
        // SAFETY: cons words only ever hold cell addresses or zero.
        unsafe { cell_at(self.word.get()) }
    }

    pub fn cdr(&self) -> Option<CellRef> {
        if self.tag != Tag::Cons {
            return None;
        }
        // SAFETY: as for `car`.
        unsafe { cell_at(self.next.get()) }
    }

    pub fn symbol_name(&self) -> Option<&'static str> {
        if self.tag != Tag::Symbol {
            return None;
        }
        // SAFETY: symbol cells are built by `heap::alloc_sym` from a leaked
        // `str`, so address and length describe valid, immutable UTF-8.
        unsafe {
            let bytes =
                std::slice::from_raw_parts(self.word.get() as *const u8, self.next.get() as usize);
            Some(std::str::from_utf8_unchecked(bytes))
        }
    }

    pub fn builtin(&self) -> Option<Builtin> {
        if self.tag != Tag::Builtin {
            return None;
        }
        Builtin::from_opcode(self.word.get())
    }

    pub fn lambda_params(&self) -> Option<CellRef> {
        if self.tag != Tag::Lambda {
            return None;
        }
        // SAFETY: lambda params are a cell address or zero.
        unsafe { cell_at(self.word.get()) }
    }

    /// Code pointer of a lambda, once its body has been finalized.
    pub fn lambda_code(&self) -> Option<*const u8> {
        if self.tag != Tag::Lambda || self.next.get() == 0 {
            return None;
        }
        Some(self.next.get() as *const u8)
    }

    pub(crate) fn set_lambda_code(&self, code: *const u8) {
        debug_assert_eq!(self.tag, Tag::Lambda);
        self.next.set(code as u64);
    }

    pub fn error_code(&self) -> Option<i64> {
        (self.tag == Tag::Error).then(|| self.word.get() as i64)
    }

    /// The storage of a byte buffer.
    pub fn bytes(&self) -> Option<&'static [Slot<u8>]> {
        if self.tag != Tag::Bytes {
            return None;
        }
        // SAFETY: bytes cells are built by `heap` from a leaked slice whose
        // address and length are recorded in the two words and never change.
        unsafe {
            Some(std::slice::from_raw_parts(
                self.word.get() as *const Slot<u8>,
                self.next.get() as usize,
            ))
        }
    }

    pub fn len(&self) -> Option<usize> {
        self.bytes().map(<[_]>::len)
    }

    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes()?.get(index).map(Slot::get)
    }

    /// Store one byte; returns `false` when out of range or not a buffer.
    pub fn set_byte(&self, index: usize, value: u8) -> bool {
        match self.bytes().and_then(|b| b.get(index)) {
            Some(slot) => {
                slot.set(value);
                true
            }
            None => false,
        }
    }

    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        self.bytes().map(|b| b.iter().map(Slot::get).collect())
    }

    /// Buffer contents up to the first zero byte, decoded lossily.
    pub fn to_text(&self) -> Option<String> {
        let bytes = self.to_bytes()?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Iterate the elements of a list starting at this cell.
    pub fn iter(&'static self) -> ListIter {
        ListIter { cur: Some(self) }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{} {}>", self.tag, self)
    }
}

/// Iterator over list elements. Stops at the first non-cons tail.
pub struct ListIter {
    cur: Option<CellRef>,
}

impl Iterator for ListIter {
    type Item = CellRef;

    fn next(&mut self) -> Option<CellRef> {
        let cell = self.cur?;
        let head = cell.car()?;
        self.cur = cell.cdr();
        Some(head)
    }
}

/// The `n`th element of a list, if there is one.
pub fn nth(list: Option<CellRef>, n: usize) -> Option<CellRef> {
    list?.iter().nth(n)
}

/// Elements of a list, or nothing for an absent list.
pub fn elements(list: Option<CellRef>) -> ListIter {
    ListIter { cur: list }
}
