//! A running image: compiler, environment, device and output sink.
//!
//! A session compiles one top-level expression at a time and runs it right
//! away. Everything a program defines lives in the compiler's environment
//! and persists across expressions.

use crate::compiler::{Compiler, Repr};
use crate::config::Config;
use crate::context::SessionScope;
use crate::device::{Device, HostDevice};
use crate::error::{CompileError, Result};
use crate::jit::JitCode;
use crate::reader::Reader;
use crate::value::heap::nil;
use crate::value::{cell_at, CellRef};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::{debug, trace};

pub struct Session {
    compiler: RefCell<Compiler>,
    device: RefCell<Box<dyn Device>>,
    output: RefCell<Box<dyn Write>>,
}

impl Session {
    pub fn new() -> std::result::Result<Self, CompileError> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> std::result::Result<Self, CompileError> {
        let compiler = Compiler::new(&config)?;
        Ok(Session {
            compiler: RefCell::new(compiler),
            device: RefCell::new(Box::new(HostDevice::new(&config))),
            output: RefCell::new(Box::new(io::stdout())),
        })
    }

    /// Send `print` output somewhere other than stdout.
    pub fn with_output(self, output: impl Write + 'static) -> Self {
        *self.output.borrow_mut() = Box::new(output);
        self
    }

    pub fn with_device(self, device: impl Device + 'static) -> Self {
        *self.device.borrow_mut() = Box::new(device);
        self
    }

    /// Compile `expr` so that it produces `required`.
    pub fn compile(&self, expr: CellRef, required: Repr) -> std::result::Result<JitCode, CompileError> {
        self.compiler.borrow_mut().compile(expr, required)
    }

    /// Run compiled code with this session published to the runtime.
    pub fn run(&self, code: &JitCode) -> u64 {
        let _scope = SessionScope::enter(self);
        trace!(?code, "running");
        // SAFETY: the code was produced by this session's compiler, which
        // outlives the call, and the session is published for its duration.
        unsafe { code.call() }
    }

    /// Compile and run `expr`, returning its value as a cell.
    pub fn eval(&self, expr: CellRef) -> std::result::Result<CellRef, CompileError> {
        let code = self.compile(expr, Repr::Any)?;
        let bits = self.run(&code);
        // SAFETY: code compiled under `Any` returns a cell address.
        Ok(unsafe { cell_at(bits) }.unwrap_or_else(nil))
    }

    /// Compile and run `expr` as a raw integer.
    pub fn eval_int(&self, expr: CellRef) -> std::result::Result<i64, CompileError> {
        let code = self.compile(expr, Repr::PureInt)?;
        Ok(self.run(&code) as i64)
    }

    /// Compile and run `expr` for its effects only.
    pub fn exec(&self, expr: CellRef) -> std::result::Result<(), CompileError> {
        let code = self.compile(expr, Repr::Void)?;
        self.run(&code);
        Ok(())
    }

    /// Read and evaluate every expression in `source`, in order. Returns the
    /// value of the last one. Stops at the first failure; expressions before
    /// it keep their effects.
    pub fn eval_str(&self, source: &str) -> Result<Option<CellRef>> {
        let mut reader = Reader::new(source);
        let mut last = None;
        while let Some(expr) = reader.try_read()? {
            debug!(%expr, "evaluating");
            last = Some(self.eval(expr)?);
        }
        Ok(last)
    }

    /// Like [`Session::eval_str`], but keeps going after a failing
    /// expression. Returns every failure with the expression it came from.
    pub fn load_str(&self, source: &str) -> Result<Vec<(CellRef, CompileError)>> {
        let mut reader = Reader::new(source);
        let mut failures = Vec::new();
        while let Some(expr) = reader.try_read()? {
            if let Err(err) = self.exec(expr) {
                failures.push((expr, err));
            }
        }
        Ok(failures)
    }

    /// The value currently bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<CellRef> {
        self.compiler.borrow().env().lookup(name)
    }

    /// Function literals currently open; zero between top-level compiles.
    pub fn depth(&self) -> usize {
        self.compiler.borrow().depth()
    }

    /// Every bound name, sorted.
    pub fn bound_names(&self) -> Vec<Rc<str>> {
        self.compiler.borrow().env().bound_names()
    }

    /// Run `f` against the device. `None` when the device is already in use
    /// further up the stack.
    pub fn use_device<R>(&self, f: impl FnOnce(&mut dyn Device) -> R) -> Option<R> {
        let mut device = self.device.try_borrow_mut().ok()?;
        Some(f(device.as_mut()))
    }

    /// Write `value` and a newline to the output sink.
    pub(crate) fn emit_line(&self, value: CellRef) {
        match self.output.try_borrow_mut() {
            Ok(mut out) => {
                if let Err(err) = writeln!(out, "{}", value) {
                    debug!(%err, "print failed");
                }
            }
            Err(_) => debug!("output busy, print dropped"),
        }
    }
}

/// An in-memory output sink that can be read back after handing a clone of
/// it to a session.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<u8>>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
