// car, cdr, cons

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::error::CompileError;
use crate::value::Tag;
use cranelift_codegen::ir::Value;

impl Compiler {
    /// Head of a list. Under `PureInt` the head is unboxed by the same
    /// helper call instead of going through a separate coercion.
    pub(crate) fn compile_car(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let list = self.compile_arg(fx, form.arg(0)?, Repr::Cons)?;
        if required == Repr::PureInt {
            return Ok(self.helper(fx, |h| h.car_int, &[list]));
        }
        let head = self.helper(fx, |h| h.car, &[list]);
        self.coerce(fx, head, Shape::Unknown, required, form.whole)
    }

    pub(crate) fn compile_cdr(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let list = self.compile_arg(fx, form.arg(0)?, Repr::Cons)?;
        let tail = self.helper(fx, |h| h.cdr, &[list]);
        self.coerce(fx, tail, Shape::Unknown, required, form.whole)
    }

    pub(crate) fn compile_cons(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands = self.compile_operands(fx, form, &[Repr::Any, Repr::Any])?;
        let pair = self.helper(fx, |h| h.cons, &operands);
        self.coerce(fx, pair, Shape::Known(Tag::Cons), required, form.whole)
    }
}
