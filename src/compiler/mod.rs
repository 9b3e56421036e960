//! Expression-to-native compiler.
//!
//! One pass over the cell tree, emitting Cranelift IR as it goes. Every
//! compile routine takes the representation its caller requires and either
//! emits code producing exactly that, or fails with a [`CompileError`].
//!
//! ## Layout
//!
//! - [`repr`]: required representations and the coercion table
//! - `coerce`: `compile_arg`, the entry point for every sub-expression
//! - `dispatch`: applications and builtin dispatch
//! - `binop`, `branching`, `binding`, `data`, `buffer`, `meta`, `device`:
//!   one file per family of builtins
//! - `funcall`: function literals and calls to them
//! - [`context`]: the bounded stack of open function literals
//! - `emit`: per-function builder state and the evaluation-slot stack

mod binding;
mod binop;
mod branching;
mod buffer;
mod coerce;
pub mod context;
mod data;
mod device;
mod dispatch;
mod emit;
mod funcall;
mod meta;
pub mod repr;

pub use context::{ContextStack, Frame, MAX_DEPTH};
pub use repr::{Coercion, Repr, Shape};

use crate::builtins::Builtin;
use crate::config::Config;
use crate::error::CompileError;
use crate::jit::{Backend, JitCode, RuntimeHelpers};
use crate::symbol::{Env, EnvEntry};
use crate::value::{heap, nth, CellRef};
use cranelift_codegen::ir::Value;
use cranelift_frontend::FunctionBuilderContext;
use cranelift_module::FuncId;
use emit::FnCtx;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Compiler state shared by every compilation in a session: the Cranelift
/// module, the global environment and the open function literals.
///
/// Only generated code writes `def` bindings into the environment. While a
/// top-level expression is compiled, the values its `def`s will bind are
/// kept in `pending`, so the rest of the expression is compiled against
/// them; `pending` is dropped when the compile ends.
pub struct Compiler {
    backend: Backend,
    env: Env,
    contexts: ContextStack,
    pending: FxHashMap<&'static str, CellRef>,
    /// Unbound entries given a binding during the current compile because
    /// generated code loads them. Unbound again if the compile fails.
    seeded: Vec<&'static EnvEntry>,
}

impl Compiler {
    /// Set up the JIT and bind every builtin name.
    pub fn new(config: &Config) -> Result<Self, CompileError> {
        let backend = Backend::new(config)?;
        let mut env = Env::new();
        for &op in Builtin::ALL {
            let entry = env.intern(op.name());
            env.bind(entry, heap::alloc_builtin(op));
        }
        debug!(builtins = Builtin::ALL.len(), "compiler ready");
        Ok(Compiler {
            backend,
            env,
            contexts: ContextStack::new(),
            pending: FxHashMap::default(),
            seeded: Vec::new(),
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// Number of function literals currently being compiled.
    pub fn depth(&self) -> usize {
        self.contexts.depth()
    }

    /// Compile a top-level expression into a callable function whose result
    /// satisfies `required`.
    pub fn compile(&mut self, expr: CellRef, required: Repr) -> Result<JitCode, CompileError> {
        debug!(%expr, %required, "compile");
        let compiled = self.emit_function(|this, fx| this.compile_arg(fx, expr, required));
        self.pending.clear();
        let seeded = std::mem::take(&mut self.seeded);
        match compiled {
            Ok(code) => Ok(JitCode::new(code, required)),
            Err(err) => {
                self.contexts.clear();
                for entry in seeded.into_iter().rev() {
                    self.env.unbind(entry);
                }
                debug!(%err, "compile failed");
                Err(err)
            }
        }
    }

    /// What `name` is bound to as far as the expression being compiled can
    /// tell: a `def` compiled earlier in it, or else the live binding.
    pub(crate) fn lookup(&self, name: &str) -> Option<CellRef> {
        self.pending
            .get(name)
            .copied()
            .or_else(|| self.env.lookup(name))
    }

    /// The binding code about to load `entry` is compiled against. A slot
    /// only a pending `def` binds is seeded with that value, so the load
    /// finds a cell of the expected shape even if the `def` never runs.
    pub(crate) fn assumed_binding(&mut self, entry: &'static EnvEntry) -> Option<CellRef> {
        match (self.pending.get(entry.name()).copied(), entry.binding()) {
            (Some(pending), None) => {
                self.seed(entry, pending);
                Some(pending)
            }
            (Some(pending), Some(_)) => Some(pending),
            (None, live) => live,
        }
    }

    /// Bind an unbound entry for the code being compiled.
    pub(crate) fn seed(&mut self, entry: &'static EnvEntry, value: CellRef) {
        self.env.bind(entry, value);
        self.seeded.push(entry);
    }

    /// Record what a `def` compiled in the current expression will bind.
    pub(crate) fn bind_pending(&mut self, entry: &'static EnvEntry, value: CellRef) {
        self.pending.insert(entry.name(), value);
    }

    /// Build one function of signature `() -> i64` whose body is produced
    /// by `body`, then finalize it.
    fn emit_function(
        &mut self,
        body: impl FnOnce(&mut Self, &mut FnCtx<'_>) -> Result<Value, CompileError>,
    ) -> Result<*const u8, CompileError> {
        let (id, func) = self.backend.new_function()?;
        // Boxed: nested literals recurse through here once per level.
        let mut func = Box::new(func);
        let mut builder_ctx = Box::new(FunctionBuilderContext::new());
        let mut fx = FnCtx::new(&mut func, &mut builder_ctx);
        let result = body(self, &mut fx)?;
        fx.finish(result);
        self.backend.finalize(id, *func)
    }

    /// Emit a call to one of the runtime helpers.
    fn helper(
        &mut self,
        fx: &mut FnCtx<'_>,
        select: fn(&RuntimeHelpers) -> FuncId,
        args: &[Value],
    ) -> Value {
        let id = select(self.backend.helpers());
        self.backend.call_helper(&mut fx.builder, id, args)
    }
}

/// An application of a builtin, with its arguments still unevaluated.
#[derive(Clone, Copy)]
pub(crate) struct Form {
    pub(crate) whole: CellRef,
    pub(crate) op: Builtin,
    pub(crate) args: Option<CellRef>,
}

impl Form {
    /// Argument `n`, required to be present.
    pub(crate) fn arg(&self, n: usize) -> Result<CellRef, CompileError> {
        nth(self.args, n).ok_or_else(|| self.missing())
    }

    pub(crate) fn opt_arg(&self, n: usize) -> Option<CellRef> {
        nth(self.args, n)
    }

    pub(crate) fn missing(&self) -> CompileError {
        CompileError::ArgumentCount {
            usage: self.op.usage(),
            expr: self.whole.to_string(),
        }
    }
}
