//! Shared test helpers.
//!
//! Every helper builds a fresh session, so tests never see each other's
//! definitions.

#![allow(dead_code)]

use sledge::{read_all, CellRef, CompileError, Error, Repr, Session, Transcript};

/// A session whose `print` output is captured.
pub fn session() -> (Session, Transcript) {
    let transcript = Transcript::new();
    let session = Session::new()
        .expect("compiler starts")
        .with_output(transcript.clone());
    (session, transcript)
}

/// Evaluate every expression in `source`; the value of the last one.
pub fn eval(source: &str) -> Result<CellRef, Error> {
    let (session, _) = session();
    eval_in(&session, source)
}

pub fn eval_in(session: &Session, source: &str) -> Result<CellRef, Error> {
    session
        .eval_str(source)?
        .ok_or(Error::Read(sledge::ReadError::Empty))
}

/// Evaluate `source` with the last expression compiled to a raw integer.
pub fn eval_int(source: &str) -> Result<i64, Error> {
    let (session, _) = session();
    eval_int_in(&session, source)
}

pub fn eval_int_in(session: &Session, source: &str) -> Result<i64, Error> {
    let exprs = read_all(source)?;
    let Some((&last, init)) = exprs.split_last() else {
        return Err(Error::Read(sledge::ReadError::Empty));
    };
    for &expr in init {
        session.exec(expr)?;
    }
    Ok(session.eval_int(last)?)
}

/// Compile and run the last expression of `source` under `required`,
/// returning the raw result word.
pub fn eval_as(source: &str, required: Repr) -> Result<u64, Error> {
    let (session, _) = session();
    let exprs = read_all(source)?;
    let Some((&last, init)) = exprs.split_last() else {
        return Err(Error::Read(sledge::ReadError::Empty));
    };
    for &expr in init {
        session.exec(expr)?;
    }
    let code = session.compile(last, required)?;
    Ok(session.run(&code))
}

/// The compile error `source` fails with.
pub fn compile_error(source: &str) -> CompileError {
    match eval(source) {
        Err(Error::Compile(err)) => err,
        Err(Error::Read(err)) => panic!("read error instead of compile error: {err}"),
        Ok(value) => panic!("expected a compile error, got {value}"),
    }
}

/// Reinterpret a word returned under a cell representation.
pub fn as_cell(bits: u64) -> CellRef {
    // SAFETY: only called on results of code compiled under a cell
    // representation.
    unsafe { sledge::value::cell_at(bits) }.expect("non-null cell")
}

pub fn text(cell: CellRef) -> String {
    cell.to_text().expect("a byte buffer")
}
