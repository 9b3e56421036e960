// Application dispatch
//
// Resolves the operator of an application at compile time and hands the
// form to the compiler for that kind of operator. Builtins never survive to
// run time; they are only a way of choosing what code to emit.

use super::emit::FnCtx;
use super::repr::Repr;
use super::{Compiler, Form};
use crate::builtins::Builtin;
use crate::error::CompileError;
use crate::value::{CellRef, Tag};
use cranelift_codegen::ir::Value;
use tracing::{debug, trace};

impl Compiler {
    pub(crate) fn compile_applic(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let Some(operator) = expr.car() else {
            return Err(CompileError::unknown_operator(expr, "empty application"));
        };
        let args = expr.cdr();
        trace!(%operator, %required, "applic");

        if let Some(name) = operator.symbol_name() {
            if let Some(frame) = self.contexts.find(name) {
                let lambda = frame.lambda;
                debug!(name, "self-recursive call");
                return self.compile_call(fx, expr, lambda, args, required);
            }
            return match self.lookup(name) {
                Some(callee) => self.apply(fx, expr, callee, args, required),
                None => Err(CompileError::UndefinedSymbol {
                    name: name.to_string(),
                }),
            };
        }

        match operator.tag() {
            Tag::Cons if self.is_fn_form(operator) => {
                let lambda = self.compile_fn_literal(operator, None)?;
                self.compile_call(fx, expr, lambda, args, required)
            }
            // Any other nested application stands in for the whole form.
            Tag::Cons => self.compile_applic(fx, operator, required),
            _ => self.apply(fx, expr, operator, args, required),
        }
    }

    /// Apply an operator value that is already known at compile time.
    fn apply(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        callee: CellRef,
        args: Option<CellRef>,
        required: Repr,
    ) -> Result<Value, CompileError> {
        match callee.tag() {
            Tag::Builtin => match callee.builtin() {
                Some(op) => {
                    let form = Form {
                        whole: expr,
                        op,
                        args,
                    };
                    self.compile_builtin(fx, form, required)
                }
                None => Err(CompileError::unknown_operator(expr, "corrupt builtin")),
            },
            Tag::Lambda => self.compile_call(fx, expr, callee, args, required),
            Tag::PureInt
            | Tag::Int
            | Tag::Cons
            | Tag::Symbol
            | Tag::Bytes
            | Tag::Error
            | Tag::Nil => Err(CompileError::unknown_operator(
                expr,
                format!("cannot apply {}", callee.tag()),
            )),
        }
    }

    fn compile_builtin(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        use Builtin::*;

        match form.op {
            Add | Sub | Mul | Div | Mod | Lt | Gt => self.compile_binop(fx, form, required),
            If => self.compile_if(fx, form, required),
            While => self.compile_while(fx, form, required),
            Do => self.compile_do(fx, form, required),
            Def => self.compile_def(fx, form, required),
            Mut => self.compile_mut(fx, form, required),
            Fn => self.compile_fn(fx, form, required),
            Quote => self.compile_quote(fx, form, required),
            Eval => self.compile_eval(fx, form, required),
            Print => self.compile_print(fx, form, required),
            Write => self.compile_write(fx, form, required),
            Car => self.compile_car(fx, form, required),
            Cdr => self.compile_cdr(fx, form, required),
            Cons => self.compile_cons(fx, form, required),
            Alloc | AllocStr => self.compile_alloc(fx, form, required),
            Concat => self.compile_concat(fx, form, required),
            Get | Size => self.compile_checked_read(fx, form, required),
            Put => self.compile_put(fx, form, required),
            UGet => self.compile_uget(fx, form, required),
            UPut => self.compile_uput(fx, form, required),
            USize => self.compile_usize(fx, form, required),
            Pixel | RectFill | Flip | BlitMono | BlitMonoInv | Inkey => {
                self.compile_graphics(fx, form, required)
            }
            Load | Save | Ls => self.compile_storage(fx, form, required),
            UdpPoll | UdpSend | TcpBind | TcpConnect | TcpSend => {
                Err(CompileError::unknown_operator(
                    form.whole,
                    format!("builtin `{}` is not available on this target", form.op.name()),
                ))
            }
        }
    }

    /// Whether `expr` is an application of the `fn` builtin.
    pub(crate) fn is_fn_form(&self, expr: CellRef) -> bool {
        expr.car()
            .and_then(|op| op.symbol_name())
            .and_then(|name| self.lookup(name))
            .and_then(|op| op.builtin())
            == Some(Builtin::Fn)
    }
}
