//! Bounded stack of nested function compilations.
//!
//! The Cranelift function being built travels on the Rust call stack inside
//! a [`FnCtx`](super::emit::FnCtx); this stack only records which function
//! literals are open, so that depth stays bounded and a call can find the
//! function it sits inside of before that function has any code.

use crate::error::CompileError;
use crate::value::CellRef;
use std::rc::Rc;

/// Deepest allowed nesting of function literals.
pub const MAX_DEPTH: usize = 49;

/// One function literal whose body is being compiled.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The symbol the function is being bound to, when compiled by `def`.
    pub name: Option<Rc<str>>,
    /// Lambda cell allocated up front; its code pointer is still empty.
    pub lambda: CellRef,
}

#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub fn new() -> Self {
        ContextStack {
            frames: Vec::with_capacity(MAX_DEPTH),
        }
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), CompileError> {
        if self.frames.len() >= MAX_DEPTH {
            return Err(CompileError::ContextStackOverflow { limit: MAX_DEPTH });
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost open function bound to `name`.
    pub fn find(&self, name: &str) -> Option<&Frame> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.name.as_deref() == Some(name))
    }

    /// Whether `lambda` belongs to a function literal still being compiled.
    pub fn contains(&self, lambda: CellRef) -> bool {
        self.frames.iter().any(|frame| std::ptr::eq(frame.lambda, lambda))
    }

    /// Drop every frame; used when a top-level compile is abandoned.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
