use crate::common::{as_cell, compile_error, eval, eval_as, eval_int};
use sledge::{CompileError, Repr};

#[test]
fn test_basic_operators() {
    assert_eq!(eval_int("(+ 1 2)").unwrap(), 3);
    assert_eq!(eval_int("(- 10 4)").unwrap(), 6);
    assert_eq!(eval_int("(* 6 7)").unwrap(), 42);
    assert_eq!(eval_int("(/ 7 2)").unwrap(), 3);
    assert_eq!(eval_int("(% 7 3)").unwrap(), 1);
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_eq!(eval_int("(/ -7 2)").unwrap(), -3);
    assert_eq!(eval_int("(% -7 3)").unwrap(), -1);
    assert_eq!(eval_int("(% 7 -3)").unwrap(), 1);
}

#[test]
fn test_division_by_zero_yields_zero() {
    assert_eq!(eval_int("(/ 5 0)").unwrap(), 0);
}

#[test]
fn test_comparisons_are_zero_or_one() {
    assert_eq!(eval_int("(lt 1 2)").unwrap(), 1);
    assert_eq!(eval_int("(lt 2 1)").unwrap(), 0);
    assert_eq!(eval_int("(gt 3 -3)").unwrap(), 1);
    assert_eq!(eval_int("(gt 3 3)").unwrap(), 0);
}

#[test]
fn test_nested_operands() {
    assert_eq!(eval_int("(+ (* 2 3) (- 10 4))").unwrap(), 12);
    assert_eq!(eval_int("(* (+ 1 (+ 2 (+ 3 4))) (- 0 1))").unwrap(), -10);
}

#[test]
fn test_result_is_boxed_under_any() {
    let value = eval("(+ 40 2)").unwrap();
    assert_eq!(value.as_int(), Some(42));
}

#[test]
fn test_hex_literals() {
    assert_eq!(eval_int("(+ 0x10 1)").unwrap(), 17);
}

#[test]
fn test_unbound_symbol_defaults_to_zero() {
    assert_eq!(eval_int("(+ never-bound 5)").unwrap(), 5);
    assert_eq!(eval_as("never-bound", Repr::PureInt).unwrap(), 0);
    let boxed = as_cell(eval_as("never-bound", Repr::Int).unwrap());
    assert_eq!(boxed.as_int(), Some(0));
}

#[test]
fn test_unbound_symbol_defaults_to_nil_as_list() {
    let value = as_cell(eval_as("never-bound", Repr::Cons).unwrap());
    assert!(value.is_nil());
}

#[test]
fn test_unbound_symbol_as_buffer_is_undefined() {
    let err = compile_error("(size never-bound)");
    assert_eq!(
        err,
        CompileError::UndefinedSymbol {
            name: "never-bound".into()
        }
    );
}

#[test]
fn test_non_integer_operand_is_type_mismatch() {
    let err = compile_error("(+ 1 '(2))");
    assert!(matches!(err, CompileError::TypeMismatch { .. }), "{err}");
    let err = compile_error("(+ \"a\" 1)");
    assert!(matches!(err, CompileError::TypeMismatch { .. }), "{err}");
}

#[test]
fn test_missing_operand() {
    let err = compile_error("(+ 1)");
    assert_eq!(
        err,
        CompileError::ArgumentCount {
            usage: "(+ a b)",
            expr: "(+ 1)".into()
        }
    );
}
