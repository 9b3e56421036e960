// Graphics, keyboard and storage builtins
//
// Thin calls into the session's device. Drawing and input work on raw
// integers; storage results can be buffers, lists or error cells and are
// left for run time to sort out.

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::builtins::Builtin;
use crate::error::CompileError;
use crate::value::Tag;
use cranelift_codegen::ir::Value;

const INT: Repr = Repr::PureInt;

impl Compiler {
    pub(crate) fn compile_graphics(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let result = match form.op {
            Builtin::Pixel => {
                let args = self.compile_operands(fx, form, &[INT, INT, INT])?;
                self.helper(fx, |h| h.pixel, &args)
            }
            Builtin::RectFill => {
                let args = self.compile_operands(fx, form, &[INT, INT, INT, INT, INT])?;
                self.helper(fx, |h| h.rectfill, &args)
            }
            Builtin::BlitMono | Builtin::BlitMonoInv => {
                let args =
                    self.compile_operands(fx, form, &[Repr::Bytes, INT, INT, INT, INT, INT])?;
                if form.op == Builtin::BlitMonoInv {
                    self.helper(fx, |h| h.blit_mono_inv, &args)
                } else {
                    self.helper(fx, |h| h.blit_mono, &args)
                }
            }
            Builtin::Flip => self.helper(fx, |h| h.flip, &[]),
            Builtin::Inkey => self.helper(fx, |h| h.inkey, &[]),
            op => {
                return Err(CompileError::unknown_operator(
                    form.whole,
                    format!("`{}` is not a graphics builtin", op.name()),
                ))
            }
        };
        self.coerce(fx, result, Shape::Known(Tag::PureInt), required, form.whole)
    }

    pub(crate) fn compile_storage(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let result = match form.op {
            Builtin::Load => {
                let path = self.compile_arg(fx, form.arg(0)?, Repr::Bytes)?;
                self.helper(fx, |h| h.load, &[path])
            }
            Builtin::Save => {
                let args = self.compile_operands(fx, form, &[Repr::Bytes, Repr::Bytes])?;
                self.helper(fx, |h| h.save, &args)
            }
            Builtin::Ls => self.helper(fx, |h| h.ls, &[]),
            op => {
                return Err(CompileError::unknown_operator(
                    form.whole,
                    format!("`{}` is not a storage builtin", op.name()),
                ))
            }
        };
        self.coerce(fx, result, Shape::Unknown, required, form.whole)
    }
}
