//! Thread-local session context.
//!
//! Runtime helpers are plain `extern "C"` functions called from generated
//! code, so they cannot take the session as a parameter. The running session
//! is published here for the duration of a call into compiled code.

use crate::session::Session;
use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr;

thread_local! {
    static SESSION: Cell<*const Session> = const { Cell::new(ptr::null()) };
}

/// Publishes a session for as long as it lives. Restores whatever was
/// published before on drop, so nested scopes (an `eval` inside running
/// code) unwind correctly.
pub struct SessionScope<'a> {
    previous: *const Session,
    _session: PhantomData<&'a Session>,
}

impl<'a> SessionScope<'a> {
    pub fn enter(session: &'a Session) -> Self {
        let previous = SESSION.with(|s| s.replace(session as *const Session));
        SessionScope {
            previous,
            _session: PhantomData,
        }
    }
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        SESSION.with(|s| s.set(self.previous));
    }
}

/// Run `f` against the published session, or return `None` without one.
pub fn with_session<R>(f: impl FnOnce(&Session) -> R) -> Option<R> {
    let current = SESSION.with(Cell::get);
    // SAFETY: a non-null pointer was published by a live `SessionScope`,
    // which borrows the session for at least as long as it is published.
    unsafe { current.as_ref() }.map(f)
}

/// Whether a session is published on this thread.
pub fn has_session() -> bool {
    SESSION.with(|s| !s.get().is_null())
}
