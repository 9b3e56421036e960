//! Runtime helper functions for JIT-compiled code
//!
//! Generated code calls these for anything that allocates, checks tags, or
//! reaches the session (output sink, device, compiler). All of them use the
//! C calling convention and pass cells as raw addresses and integers as raw
//! words. None of them may unwind: failures turn into neutral results or
//! `Error` cells.

use crate::context::with_session;
use crate::value::heap::{self, alloc_error, nil};
use crate::value::{cell_at, write_into, Cell, CellRef, ErrorCode, Tag};

/// Reinterpret a word handed over by generated code.
fn cell(bits: u64) -> Option<CellRef> {
    // SAFETY: helpers only receive words produced under a cell representation.
    unsafe { cell_at(bits) }
}

fn text_arg(bits: u64) -> Option<String> {
    cell(bits).and_then(Cell::to_text)
}

fn error(code: ErrorCode) -> u64 {
    alloc_error(code).addr()
}

// =============================================================================
// Boxing
// =============================================================================

#[no_mangle]
pub extern "C" fn sledge_jit_box_int(raw: i64) -> u64 {
    heap::alloc_int(raw).addr()
}

/// Unbox a value whose tag was not known at compile time. Anything that is
/// not an `Int` reads as 0.
#[no_mangle]
pub extern "C" fn sledge_jit_unbox(bits: u64) -> i64 {
    cell(bits).and_then(Cell::as_int).unwrap_or(0)
}

/// An `Int` cell for a value whose tag was not known at compile time. An
/// `Int` passes through untouched; anything else is replaced by a fresh 0.
#[no_mangle]
pub extern "C" fn sledge_jit_ensure_int(bits: u64) -> u64 {
    match cell(bits) {
        Some(value) if value.tag() == Tag::Int => bits,
        _ => heap::alloc_int(0).addr(),
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

/// Truncating division. A zero divisor yields 0 rather than trapping.
#[no_mangle]
pub extern "C" fn sledge_jit_div(a: i64, b: i64) -> i64 {
    if b == 0 {
        0
    } else {
        a.wrapping_div(b)
    }
}

// =============================================================================
// Lists
// =============================================================================

#[no_mangle]
pub extern "C" fn sledge_jit_cons(head: u64, tail: u64) -> u64 {
    heap::alloc_cons(cell(head), cell(tail)).addr()
}

/// Head of a cons; `Nil` for anything else.
#[no_mangle]
pub extern "C" fn sledge_jit_car(list: u64) -> u64 {
    cell(list).and_then(Cell::car).unwrap_or_else(nil).addr()
}

/// Raw integer in the head of a cons; 0 for anything else.
#[no_mangle]
pub extern "C" fn sledge_jit_car_int(list: u64) -> i64 {
    cell(list)
        .and_then(Cell::car)
        .and_then(Cell::as_int)
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn sledge_jit_cdr(list: u64) -> u64 {
    cell(list).and_then(Cell::cdr).unwrap_or_else(nil).addr()
}

// =============================================================================
// Buffers
// =============================================================================

#[no_mangle]
pub extern "C" fn sledge_jit_alloc_bytes(size: i64) -> u64 {
    heap::alloc_num_bytes(usize::try_from(size).unwrap_or(0)).addr()
}

#[no_mangle]
pub extern "C" fn sledge_jit_alloc_str(size: i64) -> u64 {
    heap::alloc_num_string(usize::try_from(size).unwrap_or(0)).addr()
}

#[no_mangle]
pub extern "C" fn sledge_jit_concat(a: u64, b: u64) -> u64 {
    match (cell(a), cell(b)) {
        (Some(a), Some(b)) => heap::alloc_concat(a, b).addr(),
        (Some(only), None) | (None, Some(only)) => heap::alloc_concat(only, nil()).addr(),
        (None, None) => heap::alloc_num_bytes(0).addr(),
    }
}

/// Checked read; out of range reads as 0.
#[no_mangle]
pub extern "C" fn sledge_jit_get(buf: u64, index: i64) -> i64 {
    let index = usize::try_from(index).ok();
    cell(buf)
        .zip(index)
        .and_then(|(buf, index)| buf.byte(index))
        .map_or(0, i64::from)
}

/// Checked write; out of range is ignored. Returns the buffer.
#[no_mangle]
pub extern "C" fn sledge_jit_put(buf: u64, index: i64, byte: i64) -> u64 {
    if let (Some(target), Ok(index)) = (cell(buf), usize::try_from(index)) {
        target.set_byte(index, byte as u8);
    }
    buf
}

#[no_mangle]
pub extern "C" fn sledge_jit_size(buf: u64) -> i64 {
    cell(buf).and_then(Cell::len).map_or(0, |n| n as i64)
}

/// Render `value` into `buf`. Returns the buffer.
#[no_mangle]
pub extern "C" fn sledge_jit_write(buf: u64, value: u64) -> u64 {
    if let (Some(target), Some(value)) = (cell(buf), cell(value)) {
        write_into(value, target);
    }
    buf
}

// =============================================================================
// Session access
// =============================================================================

/// Print `value` to the session's output. Returns `value`.
#[no_mangle]
pub extern "C" fn sledge_jit_print(value: u64) -> u64 {
    let shown = cell(value).unwrap_or_else(nil);
    if with_session(|session| session.emit_line(shown)).is_none() {
        println!("{}", shown);
    }
    value
}

/// Compile and run a quoted expression inside the running session.
#[no_mangle]
pub extern "C" fn sledge_jit_eval(expr: u64) -> u64 {
    let Some(expr) = cell(expr) else {
        return nil().addr();
    };
    with_session(|session| match session.eval(expr) {
        Ok(result) => result.addr(),
        Err(err) => {
            tracing::warn!(%err, expr = %expr, "eval failed");
            error(ErrorCode::Compile)
        }
    })
    .unwrap_or_else(|| error(ErrorCode::NoSession))
}

#[no_mangle]
pub extern "C" fn sledge_jit_pixel(x: i64, y: i64, color: i64) -> i64 {
    with_session(|session| session.use_device(|dev| dev.pixel(x, y, color)));
    0
}

#[no_mangle]
pub extern "C" fn sledge_jit_rectfill(x: i64, y: i64, w: i64, h: i64, color: i64) -> i64 {
    with_session(|session| session.use_device(|dev| dev.rectfill(x, y, w, h, color)));
    0
}

#[no_mangle]
pub extern "C" fn sledge_jit_flip() -> i64 {
    with_session(|session| session.use_device(|dev| dev.flip()));
    0
}

fn blit(bitmap: u64, x: i64, y: i64, w: i64, h: i64, color: i64, inverted: bool) -> i64 {
    let Some(bits) = cell(bitmap).and_then(Cell::to_bytes) else {
        return 0;
    };
    with_session(|session| {
        session.use_device(|dev| dev.blit_mono(&bits, x, y, w, h, color, inverted))
    });
    0
}

#[no_mangle]
pub extern "C" fn sledge_jit_blit_mono(bitmap: u64, x: i64, y: i64, w: i64, h: i64, color: i64) -> i64 {
    blit(bitmap, x, y, w, h, color, false)
}

#[no_mangle]
pub extern "C" fn sledge_jit_blit_mono_inv(
    bitmap: u64,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    color: i64,
) -> i64 {
    blit(bitmap, x, y, w, h, color, true)
}

#[no_mangle]
pub extern "C" fn sledge_jit_inkey() -> i64 {
    with_session(|session| session.use_device(|dev| dev.inkey()))
        .flatten()
        .unwrap_or(0)
}

/// Contents of a stored file as a buffer, or an `Io` error cell.
#[no_mangle]
pub extern "C" fn sledge_jit_load(path: u64) -> u64 {
    let Some(path) = text_arg(path) else {
        return error(ErrorCode::Io);
    };
    let loaded = with_session(|session| session.use_device(|dev| dev.load(&path))).flatten();
    match loaded {
        Some(Ok(data)) => heap::alloc_bytes(&data).addr(),
        Some(Err(err)) => {
            tracing::debug!(%err, path = %path, "load failed");
            error(ErrorCode::Io)
        }
        None => error(ErrorCode::NoSession),
    }
}

/// Store a buffer under `path`. Returns the buffer, or an `Io` error cell.
#[no_mangle]
pub extern "C" fn sledge_jit_save(buf: u64, path: u64) -> u64 {
    let (Some(data), Some(path)) = (cell(buf).and_then(Cell::to_bytes), text_arg(path)) else {
        return error(ErrorCode::Io);
    };
    let saved = with_session(|session| session.use_device(|dev| dev.save(&path, &data))).flatten();
    match saved {
        Some(Ok(())) => buf,
        Some(Err(err)) => {
            tracing::debug!(%err, path = %path, "save failed");
            error(ErrorCode::Io)
        }
        None => error(ErrorCode::NoSession),
    }
}

/// Stored file names as a list of buffers.
#[no_mangle]
pub extern "C" fn sledge_jit_ls() -> u64 {
    let listed = with_session(|session| session.use_device(|dev| dev.list_files())).flatten();
    match listed {
        Some(Ok(names)) => {
            let cells: Vec<CellRef> = names.iter().map(|n| heap::alloc_string(n)).collect();
            heap::list(&cells).addr()
        }
        Some(Err(_)) => error(ErrorCode::Io),
        None => error(ErrorCode::NoSession),
    }
}
