//! Cell allocation.
//!
//! Cells are leaked on allocation and never freed: the image is expected to
//! run for as long as its process does, and generated code embeds cell
//! addresses as constants. Every constructor returns a fully initialized
//! cell, so a tag is fixed from the moment a cell becomes reachable.

use super::{Cell, CellRef, ErrorCode, Tag};
use crate::builtins::Builtin;
use std::cell::Cell as Slot;

thread_local! {
    static ALLOCATED: Slot<usize> = const { Slot::new(0) };
    static NIL: CellRef = alloc_nil();
}

fn alloc(cell: Cell) -> CellRef {
    ALLOCATED.with(|n| n.set(n.get() + 1));
    Box::leak(Box::new(cell))
}

/// Number of cells allocated on this thread so far.
pub fn allocated() -> usize {
    ALLOCATED.with(Slot::get)
}

fn addr_of(cell: Option<CellRef>) -> u64 {
    cell.map_or(0, Cell::addr)
}

fn leak_storage(len: usize) -> &'static [Slot<u8>] {
    let storage: Box<[Slot<u8>]> = (0..len).map(|_| Slot::new(0)).collect();
    Box::leak(storage)
}

pub fn alloc_int(value: i64) -> CellRef {
    alloc(Cell::new(Tag::Int, value as u64, 0))
}

pub fn alloc_cons(head: Option<CellRef>, tail: Option<CellRef>) -> CellRef {
    alloc(Cell::new(Tag::Cons, addr_of(head), addr_of(tail)))
}

/// A lambda whose code pointer is filled in once its body is finalized.
pub fn alloc_lambda(params: Option<CellRef>) -> CellRef {
    alloc(Cell::new(Tag::Lambda, addr_of(params), 0))
}

pub fn alloc_nil() -> CellRef {
    alloc(Cell::new(Tag::Nil, 0, 0))
}

/// The shared `Nil` of this thread. `Nil` cells carry no state, so one is
/// enough for every place that only needs "empty".
pub fn nil() -> CellRef {
    NIL.with(|n| *n)
}

pub fn alloc_error(code: ErrorCode) -> CellRef {
    alloc(Cell::new(Tag::Error, code as i64 as u64, 0))
}

pub fn alloc_builtin(op: Builtin) -> CellRef {
    alloc(Cell::new(Tag::Builtin, op.opcode(), 0))
}

pub fn alloc_sym(name: &str) -> CellRef {
    let name: &'static str = Box::leak(Box::from(name));
    alloc(Cell::new(
        Tag::Symbol,
        name.as_ptr() as u64,
        name.len() as u64,
    ))
}

/// Zero-filled byte buffer of `size` bytes.
pub fn alloc_num_bytes(size: usize) -> CellRef {
    let storage = leak_storage(size);
    alloc(Cell::new(
        Tag::Bytes,
        storage.as_ptr() as u64,
        storage.len() as u64,
    ))
}

/// Zero-filled string buffer. Strings and blobs share one representation.
pub fn alloc_num_string(size: usize) -> CellRef {
    alloc_num_bytes(size)
}

/// Byte buffer holding a copy of `content`.
pub fn alloc_bytes(content: &[u8]) -> CellRef {
    let cell = alloc_num_bytes(content.len());
    if let Some(storage) = cell.bytes() {
        for (slot, &b) in storage.iter().zip(content) {
            slot.set(b);
        }
    }
    cell
}

pub fn alloc_string(content: &str) -> CellRef {
    alloc_bytes(content.as_bytes())
}

/// New buffer holding the contents of `a` followed by `b`. Operands that are
/// not buffers contribute nothing.
pub fn alloc_concat(a: &Cell, b: &Cell) -> CellRef {
    let mut joined = a.to_bytes().unwrap_or_default();
    joined.extend(b.to_bytes().unwrap_or_default());
    alloc_bytes(&joined)
}

/// Proper list of `items`; `Nil` when empty.
pub fn list(items: &[CellRef]) -> CellRef {
    items
        .iter()
        .rev()
        .fold(None, |tail, &head| Some(alloc_cons(Some(head), tail)))
        .unwrap_or_else(alloc_nil)
}
