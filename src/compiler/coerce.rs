// Sub-expression compilation and representation coercion
//
// `compile_arg` is the single entry point for compiling any sub-expression.
// It picks the code for the expression's kind, then bridges whatever that
// code produces to the representation the caller asked for.

use super::emit::FnCtx;
use super::repr::{plan, Coercion, Repr, Shape};
use super::Compiler;
use crate::error::CompileError;
use crate::value::{heap, CellRef, Tag, WORD_OFFSET};
use crate::symbol::BINDING_OFFSET;
use cranelift_codegen::ir::Value;
use tracing::debug;

impl Compiler {
    /// Compile `expr` so that its value satisfies `required`.
    pub(crate) fn compile_arg(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        required: Repr,
    ) -> Result<Value, CompileError> {
        if let Some(name) = expr.symbol_name() {
            return self.compile_symbol(fx, expr, name, required);
        }
        match expr.tag() {
            Tag::Cons => self.compile_applic(fx, expr, required),
            _ => self.compile_literal(fx, expr, required),
        }
    }

    /// A constant, compiled by reference to the cell itself.
    pub(crate) fn compile_literal(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        required: Repr,
    ) -> Result<Value, CompileError> {
        if let (Some(n), Repr::PureInt) = (expr.as_int(), required) {
            return Ok(fx.iconst(n));
        }
        let value = fx.cell(expr);
        self.coerce(fx, value, Shape::Known(expr.tag()), required, expr)
    }

    /// Load a symbol's binding at run time. The binding found now fixes the
    /// shape the rest of the expression is compiled against.
    fn compile_symbol(
        &mut self,
        fx: &mut FnCtx<'_>,
        expr: CellRef,
        name: &str,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let entry = self.env.intern(name);
        let binding = match self.assumed_binding(entry) {
            Some(cell) => cell,
            None => {
                let default = unbound_default(name, required)?;
                debug!(name, %required, value = %default, "binding unbound symbol to default");
                self.seed(entry, default);
                default
            }
        };
        let slot = fx.addr(entry.slot_addr());
        let value = fx.load_word(slot, BINDING_OFFSET);
        self.coerce(fx, value, Shape::Known(binding.tag()), required, expr)
    }

    /// Bring `value`, of the given shape, to `required`.
    pub(crate) fn coerce(
        &mut self,
        fx: &mut FnCtx<'_>,
        value: Value,
        shape: Shape,
        required: Repr,
        expr: CellRef,
    ) -> Result<Value, CompileError> {
        match plan(shape, required) {
            Some(Coercion::Keep) => Ok(value),
            Some(Coercion::Unbox) => Ok(fx.load_word(value, WORD_OFFSET)),
            Some(Coercion::UnboxChecked) => Ok(self.helper(fx, |h| h.unbox, &[value])),
            Some(Coercion::Box) => Ok(self.helper(fx, |h| h.box_int, &[value])),
            Some(Coercion::BoxChecked) => Ok(self.helper(fx, |h| h.ensure_int, &[value])),
            None => Err(CompileError::type_mismatch(expr, shape, required)),
        }
    }

    /// The value an `if` without an else arm, or a `while` that never
    /// iterates, yields under `required`.
    pub(crate) fn empty_value(&mut self, fx: &mut FnCtx<'_>, required: Repr) -> Value {
        match required {
            Repr::PureInt | Repr::Void => fx.iconst(0),
            Repr::Int => {
                let zero = fx.iconst(0);
                self.helper(fx, |h| h.box_int, &[zero])
            }
            Repr::Cons | Repr::Any => fx.cell(heap::nil()),
            Repr::Bytes => {
                let zero = fx.iconst(0);
                self.helper(fx, |h| h.alloc_bytes, &[zero])
            }
        }
    }
}

/// Default binding for a symbol used before anything was bound to it.
fn unbound_default(name: &str, required: Repr) -> Result<CellRef, CompileError> {
    match required {
        Repr::PureInt | Repr::Int | Repr::Any | Repr::Void => Ok(heap::alloc_int(0)),
        Repr::Cons => Ok(heap::nil()),
        Repr::Bytes => Err(CompileError::UndefinedSymbol {
            name: name.to_string(),
        }),
    }
}
