// Control flow: if, while, do
//
// Conditions are compiled to raw integers; zero is false. Arms and bodies
// are compiled against the caller's representation so that every path
// meets at the join block with the same kind of word.

use super::emit::FnCtx;
use super::repr::Repr;
use super::{Compiler, Form};
use crate::error::CompileError;
use crate::value::{elements, CellRef};
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{InstBuilder, Value};
use smallvec::SmallVec;

impl Compiler {
    pub(crate) fn compile_if(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let condition = form.arg(0)?;
        let then_arm = form.arg(1)?;
        let else_arm = form.opt_arg(2);

        let cond = self.compile_arg(fx, condition, Repr::PureInt)?;

        let then_block = fx.builder.create_block();
        let else_block = fx.builder.create_block();
        let join_block = fx.builder.create_block();
        fx.builder.append_block_param(join_block, I64);

        fx.builder
            .ins()
            .brif(cond, then_block, &[], else_block, &[]);

        fx.builder.switch_to_block(then_block);
        fx.builder.seal_block(then_block);
        let then_value = self.compile_arg(fx, then_arm, required)?;
        fx.builder.ins().jump(join_block, &[then_value]);

        fx.builder.switch_to_block(else_block);
        fx.builder.seal_block(else_block);
        let else_value = match else_arm {
            Some(arm) => self.compile_arg(fx, arm, required)?,
            None => self.empty_value(fx, required),
        };
        fx.builder.ins().jump(join_block, &[else_value]);

        fx.builder.switch_to_block(join_block);
        fx.builder.seal_block(join_block);
        Ok(fx.builder.block_params(join_block)[0])
    }

    /// Loops while the condition is non-zero. Yields the value of the last
    /// iteration, or the empty value when the body never ran.
    pub(crate) fn compile_while(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let condition = form.arg(0)?;
        let body = form.arg(1)?;

        let last = fx.fresh_var();
        let initial = self.empty_value(fx, required);
        fx.builder.def_var(last, initial);

        let header = fx.builder.create_block();
        let body_block = fx.builder.create_block();
        let exit = fx.builder.create_block();

        fx.builder.ins().jump(header, &[]);
        fx.builder.switch_to_block(header);
        let cond = self.compile_arg(fx, condition, Repr::PureInt)?;
        fx.builder.ins().brif(cond, body_block, &[], exit, &[]);

        fx.builder.switch_to_block(body_block);
        fx.builder.seal_block(body_block);
        let value = self.compile_arg(fx, body, required)?;
        fx.builder.def_var(last, value);
        fx.builder.ins().jump(header, &[]);
        fx.builder.seal_block(header);

        fx.builder.switch_to_block(exit);
        fx.builder.seal_block(exit);
        Ok(fx.builder.use_var(last))
    }

    /// Evaluate in order; only the last value is kept.
    pub(crate) fn compile_do(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let exprs: SmallVec<[CellRef; 8]> = elements(form.args).collect();
        let Some((&last, init)) = exprs.split_last() else {
            return Err(form.missing());
        };
        for &expr in init {
            self.compile_arg(fx, expr, Repr::Void)?;
        }
        self.compile_arg(fx, last, required)
    }
}
