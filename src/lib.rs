//! # Sledge - a native-code Lisp for small machines
//!
//! Sledge has no interpreter: every expression that is read is compiled
//! straight to machine code with Cranelift and then called.
//!
//! ## Quick Start
//!
//! ```
//! use sledge::{read_str, Repr, Session};
//!
//! let session = Session::new().unwrap();
//! session
//!     .eval_str("(def fact (fn n (if (lt n 2) 1 (* n (fact (- n 1))))))")
//!     .unwrap();
//! let call = read_str("(fact 5)").unwrap();
//! assert_eq!(session.eval_int(call).unwrap(), 120);
//! ```
//!
//! ## Architecture
//!
//! 1. **Reader** - source text to cells
//! 2. **Compiler** - one pass from cells to Cranelift IR, with every
//!    sub-expression compiled against a required representation
//! 3. **JIT** - Cranelift turns each top-level expression and each function
//!    literal into a native function; runtime helpers cover allocation and
//!    anything touching the session
//! 4. **Session** - owns the compiler, the device and the output sink, and
//!    runs what the compiler produces
//!
//! ## Values
//!
//! Values are tagged cells that are never freed. Integers also have an
//! unboxed form that only exists inside generated code.

pub mod builtins;
pub mod compiler;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod jit;
pub mod reader;
pub mod repl;
pub mod session;
pub mod symbol;
pub mod value;

pub use builtins::Builtin;
pub use compiler::{Compiler, Repr};
pub use config::{Config, OptLevel};
pub use device::{Device, Framebuffer, HostDevice};
pub use error::{CompileError, Error, ReadError, Result};
pub use jit::JitCode;
pub use reader::{read_all, read_str};
pub use session::{Session, Transcript};
pub use value::{Cell, CellRef, ErrorCode, Tag};
