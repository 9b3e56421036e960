// def and mut
//
// Both write a symbol's environment entry from generated code, never while
// compiling. `def` always replaces the binding. `mut` keeps a boxed integer
// binding and writes the new value into that very cell, so every other
// reference to the cell sees the change; any other binding is replaced like
// `def` would.

use super::emit::FnCtx;
use super::repr::{Repr, Shape};
use super::{Compiler, Form};
use crate::error::CompileError;
use crate::symbol::{EnvEntry, BINDING_OFFSET};
use crate::value::{heap, Tag, WORD_OFFSET};
use cranelift_codegen::ir::Value;
use tracing::debug;

impl Compiler {
    pub(crate) fn compile_def(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let entry = self.target_entry(form)?;
        let value_expr = form.arg(1)?;

        let value = if self.is_fn_form(value_expr) {
            let lambda = self.compile_fn_literal(value_expr, Some(entry.name()))?;
            self.bind_pending(entry, lambda);
            fx.cell(lambda)
        } else {
            // The binding keeps whatever the value turns out to be; only
            // the result of `def` itself is narrowed to `required`.
            let inner = match required {
                Repr::PureInt | Repr::Int | Repr::Void => Repr::Any,
                other => other,
            };
            let value = self.compile_arg(fx, value_expr, inner)?;
            if !matches!(value_expr.tag(), Tag::Cons | Tag::Symbol) {
                self.bind_pending(entry, value_expr);
            }
            value
        };

        store_binding(fx, entry, value);
        match required {
            Repr::PureInt | Repr::Int => {
                let shape = match value_expr.tag() {
                    Tag::Cons | Tag::Symbol => Shape::Unknown,
                    tag => Shape::Known(tag),
                };
                self.coerce(fx, value, shape, required, value_expr)
            }
            _ => Ok(value),
        }
    }

    pub(crate) fn compile_mut(
        &mut self,
        fx: &mut FnCtx<'_>,
        form: Form,
        required: Repr,
    ) -> Result<Value, CompileError> {
        let entry = self.target_entry(form)?;
        let value_expr = form.arg(1)?;

        let binding = match self.assumed_binding(entry) {
            Some(cell) => cell,
            None => {
                debug!(name = entry.name(), "mut of unbound symbol, defaulting to 0");
                let zero = heap::alloc_int(0);
                self.seed(entry, zero);
                zero
            }
        };

        if binding.tag() == Tag::Int {
            let raw = self.compile_arg(fx, value_expr, Repr::PureInt)?;
            let slot = fx.addr(entry.slot_addr());
            let boxed = fx.load_word(slot, BINDING_OFFSET);
            fx.store_word(raw, boxed, WORD_OFFSET);
            self.coerce(fx, raw, Shape::Known(Tag::PureInt), required, form.whole)
        } else {
            let value = self.compile_arg(fx, value_expr, Repr::Any)?;
            store_binding(fx, entry, value);
            self.coerce(fx, value, Shape::Unknown, required, form.whole)
        }
    }

    /// The entry named by the first argument of `def` or `mut`.
    fn target_entry(&mut self, form: Form) -> Result<&'static EnvEntry, CompileError> {
        let target = form.arg(0)?;
        match target.symbol_name() {
            Some(name) => Ok(self.env.intern(name)),
            None => Err(CompileError::type_mismatch(target, target.tag(), "symbol")),
        }
    }
}

fn store_binding(fx: &mut FnCtx<'_>, entry: &EnvEntry, value: Value) {
    let slot = fx.addr(entry.slot_addr());
    fx.store_word(value, slot, BINDING_OFFSET);
}
