//! Native code generation through Cranelift
//!
//! ## Architecture
//!
//! ```text
//! cell tree -> Compiler -> Cranelift IR -> native code -> JitCode
//! ```
//!
//! ## Calling Convention
//!
//! Every compiled top-level expression and every function literal body has
//! the same shape:
//!
//! ```ignore
//! type CompiledFn = unsafe extern "C" fn() -> u64;
//! ```
//!
//! Arguments travel through the global environment rather than the native
//! stack, so nothing else is needed. Generated code calls back into the
//! `sledge_jit_*` helpers in [`runtime`] for allocation, tag-dependent
//! operations and session access.

mod code;
mod compiler;
pub mod runtime;

pub use code::JitCode;
pub(crate) use compiler::{Backend, RuntimeHelpers};
