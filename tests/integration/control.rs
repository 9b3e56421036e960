use crate::common::{as_cell, compile_error, eval, eval_as, eval_int, session};
use sledge::{read_str, CompileError, Repr};

#[test]
fn test_if_picks_arm_by_zero() {
    assert_eq!(eval_int("(if 0 1 2)").unwrap(), 2);
    assert_eq!(eval_int("(if 1 1 2)").unwrap(), 1);
    assert_eq!(eval_int("(if -5 1 2)").unwrap(), 1);
    assert_eq!(eval_int("(if (lt 1 2) 10 20)").unwrap(), 10);
}

#[test]
fn test_if_arms_under_any() {
    assert_eq!(eval("(if 0 1 2)").unwrap().as_int(), Some(2));
    assert_eq!(eval("(if 1 '(1) 2)").unwrap().to_string(), "(1)");
}

#[test]
fn test_if_without_else() {
    let (session, _) = session();
    assert!(session.exec(read_str("(if 0 1)").unwrap()).is_ok());
    assert_eq!(eval_int("(if 0 1)").unwrap(), 0);
    assert!(eval("(if 0 1)").unwrap().is_nil());
    let boxed = as_cell(eval_as("(if 0 1)", Repr::Int).unwrap());
    assert_eq!(boxed.as_int(), Some(0));
}

#[test]
fn test_if_requires_then_arm() {
    let err = compile_error("(if 1)");
    assert!(matches!(err, CompileError::ArgumentCount { .. }), "{err}");
}

#[test]
fn test_while_counts() {
    let source = "
        (def i 0)
        (def sum 0)
        (while (lt i 5)
          (do (mut sum (+ sum i))
              (mut i (+ i 1))))
        sum";
    assert_eq!(eval_int(source).unwrap(), 10);
}

#[test]
fn test_while_yields_last_iteration() {
    assert_eq!(
        eval_int("(def k 0) (while (lt k 3) (mut k (+ k 1)))").unwrap(),
        3
    );
}

#[test]
fn test_while_that_never_runs() {
    assert_eq!(eval_int("(while 0 1)").unwrap(), 0);
    assert!(eval("(while 0 1)").unwrap().is_nil());
}

#[test]
fn test_do_sequences() {
    assert_eq!(eval_int("(do 1 2 3)").unwrap(), 3);
    assert_eq!(eval_int("(do (def a 4) (+ a 1))").unwrap(), 5);
}

#[test]
fn test_empty_do() {
    let err = compile_error("(do)");
    assert_eq!(
        err,
        CompileError::ArgumentCount {
            usage: "(do expr ...)",
            expr: "(do)".into()
        }
    );
}

#[test]
fn test_nested_control_in_condition() {
    let source = "
        (def n 0)
        (while (if (lt n 10) 1 0) (mut n (+ n 2)))
        n";
    assert_eq!(eval_int(source).unwrap(), 10);
}
