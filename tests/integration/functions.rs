use crate::common::{as_cell, compile_error, eval, eval_as, eval_in, eval_int, eval_int_in, session};
use sledge::{CompileError, Repr, Tag};

const FACT: &str = "(def fact (fn n (if (lt n 2) 1 (* n (fact (- n 1))))))";

#[test]
fn test_fn_without_params() {
    let value = eval("(def x (fn (+ 1 1))) (x)").unwrap();
    assert_eq!(value.tag(), Tag::Int);
    assert_eq!(value.as_int(), Some(2));
}

#[test]
fn test_fn_is_a_lambda_value() {
    let value = eval("(fn a (+ a 1))").unwrap();
    assert_eq!(value.tag(), Tag::Lambda);
    assert!(value.lambda_code().is_some());
    assert_eq!(value.to_string(), "<fn (a (+ a 1))>");
}

#[test]
fn test_recursive_factorial() {
    let (session, _) = session();
    eval_in(&session, FACT).unwrap();
    assert_eq!(eval_int_in(&session, "(fact 5)").unwrap(), 120);
    assert_eq!(eval_in(&session, "(fact 5)").unwrap().as_int(), Some(120));
    assert_eq!(eval_int_in(&session, "(fact 1)").unwrap(), 1);
    assert_eq!(eval_int_in(&session, "(fact 10)").unwrap(), 3_628_800);
}

#[test]
fn test_call_inside_same_compile_as_definition() {
    let source = format!("(do {FACT} (fact 4))");
    assert_eq!(eval_int(&source).unwrap(), 24);
}

#[test]
fn test_two_params() {
    let source = "(def sub2 (fn a b (- a b))) (sub2 10 3)";
    assert_eq!(eval_int(source).unwrap(), 7);
}

#[test]
fn test_literal_fn_as_operator() {
    assert_eq!(eval_int("((fn x (+ x 1)) 4)").unwrap(), 5);
}

#[test]
fn test_extra_arguments_are_not_evaluated() {
    assert_eq!(eval_int("(def g (fn a a)) (g 1 (no-such-fn 2))").unwrap(), 1);
}

#[test]
fn test_missing_argument_keeps_previous_binding() {
    assert_eq!(eval_int("(def q 8) (def h (fn q (+ q 1))) (h)").unwrap(), 9);
}

#[test]
fn test_parameters_overwrite_globals() {
    let (session, _) = session();
    eval_in(&session, "(def p 10) (def inc (fn p (+ p 1)))").unwrap();
    assert_eq!(eval_int_in(&session, "(inc 1)").unwrap(), 2);
    assert_eq!(eval_int_in(&session, "p").unwrap(), 1);
}

#[test]
fn test_function_returning_list() {
    let value = eval("(def pair (fn a b (cons a b))) (pair 1 2)").unwrap();
    assert_eq!(value.to_string(), "(1 . 2)");
}

#[test]
fn test_higher_order_via_global() {
    let source = "
        (def twice (fn n (* n 2)))
        (def apply-twice (fn v (twice (twice v))))
        (apply-twice 3)";
    assert_eq!(eval_int(source).unwrap(), 12);
}

#[test]
fn test_failed_fn_is_not_bound() {
    let (session, _) = session();
    let err = eval_in(&session, "(def bad (fn (car 5)))").unwrap_err();
    assert!(matches!(err, sledge::Error::Compile(CompileError::TypeMismatch { .. })));
    assert!(session.lookup("bad").is_none());
    // The session keeps working.
    assert_eq!(eval_int_in(&session, "(+ 1 1)").unwrap(), 2);
}

#[test]
fn test_fn_without_body() {
    let err = compile_error("(fn)");
    assert_eq!(
        err,
        CompileError::ArgumentCount {
            usage: "(fn param ... body)",
            expr: "(fn)".into()
        }
    );
}

#[test]
fn test_applying_a_non_function() {
    let err = compile_error("(5 1)");
    assert!(matches!(err, CompileError::UnknownOperator { .. }), "{err}");
    let err = compile_error("(no-such-fn 1)");
    assert_eq!(
        err,
        CompileError::UndefinedSymbol {
            name: "no-such-fn".into()
        }
    );
}

#[test]
fn test_nested_application_operator_stands_for_form() {
    assert_eq!(eval_int("((+ 1 2) 9)").unwrap(), 3);
}

#[test]
fn test_call_result_under_int_is_checked() {
    let boxed = as_cell(eval_as("(def f (fn 7)) (f)", Repr::Int).unwrap());
    assert_eq!(boxed.tag(), Tag::Int);
    assert_eq!(boxed.as_int(), Some(7));

    let replaced = as_cell(eval_as("(def p (fn '(1 2))) (p)", Repr::Int).unwrap());
    assert_eq!(replaced.tag(), Tag::Int);
    assert_eq!(replaced.as_int(), Some(0));
}
