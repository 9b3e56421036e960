//! Compiled top-level expressions.

use crate::compiler::Repr;
use std::fmt;

/// Entry point of a compiled top-level expression.
///
/// The JIT module that owns the code never releases it, so the pointer
/// stays valid for as long as the process runs.
#[derive(Clone, Copy)]
pub struct JitCode {
    fn_ptr: *const u8,
    repr: Repr,
}

impl JitCode {
    pub(crate) fn new(fn_ptr: *const u8, repr: Repr) -> Self {
        JitCode { fn_ptr, repr }
    }

    pub fn fn_ptr(&self) -> *const u8 {
        self.fn_ptr
    }

    /// The representation of the word returned by [`JitCode::call`].
    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// Run the code and return its raw result word.
    ///
    /// # Safety
    /// Generated code reads and writes cells and environment entries by
    /// address. The compiler that produced this code must still be alive,
    /// and helpers that reach the session need one to be installed with
    /// [`crate::context::SessionScope`] on this thread.
    #[inline]
    pub unsafe fn call(&self) -> u64 {
        let f: unsafe extern "C" fn() -> u64 = std::mem::transmute(self.fn_ptr);
        f()
    }
}

impl fmt::Debug for JitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JitCode")
            .field("fn_ptr", &self.fn_ptr)
            .field("repr", &self.repr)
            .finish()
    }
}
