// quote, eval, write, print

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::error::CompileError;
use crate::value::Tag;
use cranelift_codegen::ir::Value;

impl Compiler {
    pub(crate) fn compile_quote(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        self.compile_literal(fx, form.arg(0)?, required)
    }

    /// The argument is evaluated to an expression, which is compiled and
    /// run when this code runs.
    pub(crate) fn compile_eval(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let expr = self.compile_arg(fx, form.arg(0)?, Repr::Any)?;
        let result = self.helper(fx, |h| h.eval, &[expr]);
        self.coerce(fx, result, Shape::Unknown, required, form.whole)
    }

    pub(crate) fn compile_write(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands = self.compile_operands(fx, form, &[Repr::Bytes, Repr::Any])?;
        let buffer = self.helper(fx, |h| h.write, &operands);
        self.coerce(fx, buffer, Shape::Known(Tag::Bytes), required, form.whole)
    }

    pub(crate) fn compile_print(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let value = self.compile_arg(fx, form.arg(0)?, Repr::Any)?;
        let printed = self.helper(fx, |h| h.print, &[value]);
        if required == Repr::PureInt {
            return Ok(fx.iconst(0));
        }
        self.coerce(fx, printed, Shape::Unknown, required, form.whole)
    }
}
