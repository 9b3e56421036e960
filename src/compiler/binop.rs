// Arithmetic and comparison builtins
//
// Both operands are compiled to raw integers and combined inline, except
// division, which goes through a helper so that a zero divisor cannot trap.

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::builtins::Builtin;
use crate::error::CompileError;
use crate::value::Tag;
use cranelift_codegen::ir::condcodes::IntCC;
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{InstBuilder, Value};
use smallvec::SmallVec;

pub(crate) type Operands = SmallVec<[Value; 6]>;

impl Compiler {
    /// Compile the first `reprs.len()` arguments of `form` in order, one
    /// representation each. Every finished operand is kept in an evaluation
    /// slot while the next one compiles, since that may contain arbitrary
    /// nested code.
    pub(crate) fn compile_operands(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        reprs: &[Repr],
    ) -> Result<Operands, CompileError> {
        for (i, &repr) in reprs.iter().enumerate() {
            match form.arg(i).and_then(|arg| self.compile_arg(fx, arg, repr)) {
                Ok(value) => fx.save(value),
                Err(err) => {
                    fx.release(i);
                    return Err(err);
                }
            }
        }
        let mut values: Operands = reprs.iter().map(|_| fx.restore()).collect();
        values.reverse();
        Ok(values)
    }

    pub(crate) fn compile_binop(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let operands = self.compile_operands(fx, form, &[Repr::PureInt, Repr::PureInt])?;
        let (a, b) = (operands[0], operands[1]);

        let result = match form.op {
            Builtin::Add => fx.builder.ins().iadd(a, b),
            Builtin::Sub => fx.builder.ins().isub(a, b),
            Builtin::Mul => fx.builder.ins().imul(a, b),
            Builtin::Div => self.helper(fx, |h| h.div, &[a, b]),
            Builtin::Mod => {
                // a - (a / b) * b
                let quotient = self.helper(fx, |h| h.div, &[a, b]);
                let product = fx.builder.ins().imul(quotient, b);
                fx.builder.ins().isub(a, product)
            }
            Builtin::Lt => compare(fx, IntCC::SignedLessThan, a, b),
            Builtin::Gt => compare(fx, IntCC::SignedGreaterThan, a, b),
            op => {
                return Err(CompileError::unknown_operator(
                    form.whole,
                    format!("`{}` is not an arithmetic operator", op.name()),
                ))
            }
        };

        self.coerce(fx, result, Shape::Known(Tag::PureInt), required, form.whole)
    }
}

/// 0 or 1 as a full word.
fn compare(fx: &mut FnCtx<'_>, cc: IntCC, a: Value, b: Value) -> Value {
    let flag = fx.builder.ins().icmp(cc, a, b);
    fx.builder.ins().uextend(I64, flag)
}
