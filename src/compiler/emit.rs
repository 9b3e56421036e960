//! Per-function emission state.
//!
//! A [`FnCtx`] wraps the Cranelift builder of one function under
//! construction together with its evaluation-slot stack. Nested function
//! literals get their own `FnCtx`; the enclosing one simply waits on the
//! Rust call stack until the nested compile returns.

use crate::value::CellRef;
use cranelift_codegen::ir::types::I64;
use cranelift_codegen::ir::{Function, InstBuilder, MemFlags, Value};
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext, Variable};

pub(crate) struct FnCtx<'a> {
    pub(crate) builder: FunctionBuilder<'a>,
    /// Variables backing the evaluation-slot stack, reused by depth.
    saved: Vec<Variable>,
    depth: usize,
    next_var: u32,
}

impl<'a> FnCtx<'a> {
    pub(crate) fn new(func: &'a mut Function, builder_ctx: &'a mut FunctionBuilderContext) -> Self {
        let mut builder = FunctionBuilder::new(func, builder_ctx);
        let entry = builder.create_block();
        builder.switch_to_block(entry);
        builder.seal_block(entry);
        FnCtx {
            builder,
            saved: Vec::new(),
            depth: 0,
            next_var: 0,
        }
    }

    /// A new variable in this function.
    pub(crate) fn fresh_var(&mut self) -> Variable {
        let var = Variable::from_u32(self.next_var);
        self.next_var += 1;
        self.builder.declare_var(var, I64);
        var
    }

    /// Keep `value` in the next evaluation slot.
    pub(crate) fn save(&mut self, value: Value) {
        if self.depth == self.saved.len() {
            let var = self.fresh_var();
            self.saved.push(var);
        }
        self.builder.def_var(self.saved[self.depth], value);
        self.depth += 1;
    }

    /// Take back the most recently saved value.
    pub(crate) fn restore(&mut self) -> Value {
        debug_assert!(self.depth > 0, "evaluation slot underflow");
        self.depth -= 1;
        self.builder.use_var(self.saved[self.depth])
    }

    /// Give up `count` saved slots without reading them.
    pub(crate) fn release(&mut self, count: usize) {
        debug_assert!(count <= self.depth, "evaluation slot underflow");
        self.depth -= count;
    }

    pub(crate) fn iconst(&mut self, value: i64) -> Value {
        self.builder.ins().iconst(I64, value)
    }

    /// Address of a cell, embedded as a constant.
    pub(crate) fn cell(&mut self, cell: CellRef) -> Value {
        self.iconst(cell.addr() as i64)
    }

    pub(crate) fn addr(&mut self, addr: u64) -> Value {
        self.iconst(addr as i64)
    }

    /// Load a word from a cell or environment entry.
    pub(crate) fn load_word(&mut self, base: Value, offset: i32) -> Value {
        self.builder.ins().load(I64, MemFlags::trusted(), base, offset)
    }

    pub(crate) fn store_word(&mut self, value: Value, base: Value, offset: i32) {
        self.builder
            .ins()
            .store(MemFlags::trusted(), value, base, offset);
    }

    /// Return `result` and close the function.
    pub(crate) fn finish(mut self, result: Value) {
        self.builder.ins().return_(&[result]);
        self.builder.seal_all_blocks();
        self.builder.finalize();
    }
}
