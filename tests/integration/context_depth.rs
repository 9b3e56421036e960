use crate::common::{eval_in, eval_int_in, session};
use sledge::compiler::MAX_DEPTH;
use sledge::{CompileError, Error, Tag};

fn nested_fns(depth: usize) -> String {
    format!("{}1{}", "(fn ".repeat(depth), ")".repeat(depth))
}

// Each nesting level recurses through the compiler, so these run on a
// thread with a generous stack.
fn on_big_stack(test: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(test)
        .expect("spawn test thread")
        .join()
        .expect("test thread panicked");
}

#[test]
fn test_deepest_allowed_nesting_compiles() {
    on_big_stack(|| {
        let (session, _) = session();
        let value = eval_in(&session, &nested_fns(MAX_DEPTH)).unwrap();
        assert_eq!(value.tag(), Tag::Lambda);
    });
}

#[test]
fn test_one_level_deeper_overflows() {
    on_big_stack(|| {
        let (session, _) = session();
        let err = eval_in(&session, &nested_fns(MAX_DEPTH + 1)).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Compile(CompileError::ContextStackOverflow { limit: MAX_DEPTH })
            ),
            "{err}"
        );
        // The stack is empty again and the session keeps working.
        assert_eq!(session.depth(), 0);
        assert_eq!(eval_int_in(&session, "(def f (fn x (+ x 1))) (f 1)").unwrap(), 2);
    });
}

#[test]
fn test_nested_literal_runs() {
    let (session, _) = session();
    eval_in(&session, "(def outer (fn ((fn y (* y 3)) 5)))").unwrap();
    assert_eq!(eval_int_in(&session, "(outer)").unwrap(), 15);
}
