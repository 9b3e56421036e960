// Function literals and calls
//
// A function literal is compiled into its own native function as soon as it
// is met. Its lambda cell is allocated first and pushed on the context
// stack, so a call to the function from inside its own body can find the
// cell and read the code pointer from it at run time, once it exists.
//
// Calls bind arguments by overwriting the global entries of the parameter
// names, in order. Nothing is restored afterwards.

use super::context::Frame;
use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::builtins::Builtin;
use crate::error::CompileError;
use crate::symbol::BINDING_OFFSET;
use crate::value::{elements, heap, CellRef, Tag, NEXT_OFFSET};
use cranelift_codegen::ir::Value;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::{debug, warn};

impl Compiler {
    /// `fn` in value position: compile the literal now, yield its lambda.
    pub(crate) fn compile_fn(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let lambda = self.compile_fn_literal(form.whole, None)?;
        let value = fx.cell(lambda);
        self.coerce(fx, value, Shape::Known(Tag::Lambda), required, form.whole)
    }

    /// Compile `(fn param ... body)` into a lambda cell with finished code.
    pub(crate) fn compile_fn_literal(
        &mut self,
        literal: CellRef,
        name: Option<&str>,
    ) -> Result<CellRef, CompileError> {
        let params = literal.cdr();
        let Some(body) = elements(params).last() else {
            return Err(CompileError::ArgumentCount {
                usage: Builtin::Fn.usage(),
                expr: literal.to_string(),
            });
        };

        let lambda = heap::alloc_lambda(params);
        self.contexts.push(Frame {
            name: name.map(Rc::from),
            lambda,
        })?;
        let depth = self.contexts.depth();
        debug!(name = name.unwrap_or("(anonymous)"), depth, "compiling fn");

        let compiled = self.emit_function(|this, fx| this.compile_arg(fx, body, Repr::Any));
        self.contexts.pop();

        match compiled {
            Ok(code) => {
                lambda.set_lambda_code(code);
                debug!(name = name.unwrap_or("(anonymous)"), depth, "compiled fn");
                Ok(lambda)
            }
            Err(err) => {
                warn!("could not compile fn {}", name.unwrap_or("(anonymous)"));
                Err(err)
            }
        }
    }

    /// Call `lambda` with the unevaluated arguments `args`.
    pub(crate) fn compile_call(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        lambda: CellRef,
        args: Option<CellRef>,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let mut params: SmallVec<[CellRef; 8]> = elements(lambda.lambda_params()).collect();
        // The last element is the body.
        params.pop();

        for (param, arg) in params.iter().zip(elements(args)) {
            let Some(name) = param.symbol_name() else {
                return Err(CompileError::type_mismatch(param, param.tag(), "symbol"));
            };
            let entry = self.env.intern(name);
            let value = self.compile_arg(fx, arg, Repr::Any)?;
            let slot = fx.addr(entry.slot_addr());
            fx.store_word(value, slot, BINDING_OFFSET);
        }

        let code = match lambda.lambda_code() {
            Some(ptr) => fx.addr(ptr as u64),
            None if self.contexts.contains(lambda) => {
                let cell = fx.cell(lambda);
                fx.load_word(cell, NEXT_OFFSET)
            }
            None => {
                return Err(CompileError::unknown_operator(
                    expr,
                    "function has no compiled code",
                ))
            }
        };
        let result = self.backend.call_code(&mut fx.builder, code);
        self.coerce(fx, result, Shape::Unknown, required, expr)
    }
}
