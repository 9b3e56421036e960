// Byte buffer builtins
//
// `get`, `put` and `size` go through helpers that check the tag and the
// bounds. `uget`, `uput` and `usize` are inlined loads and stores straight
// through the buffer's address and length words with no checks at all.

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::builtins::Builtin;
use crate::error::CompileError;
use crate::value::{Tag, NEXT_OFFSET, WORD_OFFSET};
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{InstBuilder, MemFlags, Value};

impl Compiler {
    /// `alloc` and `alloc-str`: a zero-filled buffer of the given size.
    pub(crate) fn compile_alloc(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let size = self.compile_arg(fx, form.arg(0)?, Repr::PureInt)?;
        let buffer = if form.op == Builtin::AllocStr {
            self.helper(fx, |h| h.alloc_str, &[size])
        } else {
            self.helper(fx, |h| h.alloc_bytes, &[size])
        };
        self.coerce(fx, buffer, Shape::Known(Tag::Bytes), required, form.whole)
    }

    pub(crate) fn compile_concat(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands = self.compile_operands(fx, form, &[Repr::Any, Repr::Any])?;
        let joined = self.helper(fx, |h| h.concat, &operands);
        self.coerce(fx, joined, Shape::Known(Tag::Bytes), required, form.whole)
    }

    /// `get` and `size`: checked reads producing raw integers.
    pub(crate) fn compile_checked_read(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let result = if form.op == Builtin::Size {
            let buffer = self.compile_arg(fx, form.arg(0)?, Repr::Bytes)?;
            self.helper(fx, |h| h.size, &[buffer])
        } else {
            let operands = self.compile_operands(fx, form, &[Repr::Bytes, Repr::PureInt])?;
            self.helper(fx, |h| h.get, &operands)
        };
        self.coerce(fx, result, Shape::Known(Tag::PureInt), required, form.whole)
    }

    pub(crate) fn compile_put(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands =
            self.compile_operands(fx, form, &[Repr::Bytes, Repr::PureInt, Repr::PureInt])?;
        let buffer = self.helper(fx, |h| h.put, &operands);
        self.coerce(fx, buffer, Shape::Known(Tag::Bytes), required, form.whole)
    }

    pub(crate) fn compile_uget(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands = self.compile_operands(fx, form, &[Repr::Bytes, Repr::PureInt])?;
        let addr = byte_addr(fx, operands[0], operands[1]);
        let byte = fx.builder.ins().uload8(I64, MemFlags::new(), addr, 0);
        self.coerce(fx, byte, Shape::Known(Tag::PureInt), required, form.whole)
    }

    pub(crate) fn compile_uput(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands =
            self.compile_operands(fx, form, &[Repr::Bytes, Repr::PureInt, Repr::PureInt])?;
        let (buffer, index, byte) = (operands[0], operands[1], operands[2]);
        let addr = byte_addr(fx, buffer, index);
        fx.builder.ins().istore8(MemFlags::new(), byte, addr, 0);
        self.coerce(fx, buffer, Shape::Known(Tag::Bytes), required, form.whole)
    }

    pub(crate) fn compile_usize(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let buffer = self.compile_arg(fx, form.arg(0)?, Repr::Bytes)?;
        let size = fx.load_word(buffer, NEXT_OFFSET);
        self.coerce(fx, size, Shape::Known(Tag::PureInt), required, form.whole)
    }
}

/// Address of byte `index` of a buffer cell, unchecked.
fn byte_addr(fx: &mut FnCtx<'_>, buffer: Value, index: Value) -> Value {
    let base = fx.load_word(buffer, WORD_OFFSET);
    fx.builder.ins().iadd(base, index)
}
