use crate::common::{eval, eval_in, eval_int, eval_int_in, session};
use sledge::{ErrorCode, Tag};

#[test]
fn test_quote_passes_expression_through() {
    let value = eval("(quote foo)").unwrap();
    assert_eq!(value.tag(), Tag::Symbol);
    assert_eq!(value.symbol_name(), Some("foo"));
    assert_eq!(eval("'(+ 1 2)").unwrap().to_string(), "(+ 1 2)");
    assert_eq!(eval_int("'7").unwrap(), 7);
}

#[test]
fn test_eval_runs_quoted_code() {
    assert_eq!(eval_int("(eval '(+ 1 2))").unwrap(), 3);
    assert_eq!(eval("(eval '(cons 1 nil))").unwrap().to_string(), "(1)");
}

#[test]
fn test_eval_sees_definitions() {
    let (session, _) = session();
    eval_in(&session, "(def base 40) (def code '(+ base 2))").unwrap();
    assert_eq!(eval_int_in(&session, "(eval code)").unwrap(), 42);
}

#[test]
fn test_eval_can_define() {
    let (session, _) = session();
    eval_in(&session, "(eval '(def made-by-eval 9))").unwrap();
    assert_eq!(session.lookup("made-by-eval").and_then(|c| c.as_int()), Some(9));
}

#[test]
fn test_eval_of_bad_code_yields_error_cell() {
    let value = eval("(eval '(car 5))").unwrap();
    assert_eq!(value.tag(), Tag::Error);
    assert_eq!(value.error_code(), Some(ErrorCode::Compile as i64));
}

#[test]
fn test_print_writes_lines() {
    let (session, transcript) = session();
    eval_in(&session, "(print 42) (print '(a \"b\")) (print nil)").unwrap();
    assert_eq!(transcript.lines(), vec!["42", "(a \"b\")", "nil"]);
}

#[test]
fn test_print_returns_its_argument() {
    let (session, transcript) = session();
    assert_eq!(eval_in(&session, "(print 5)").unwrap().as_int(), Some(5));
    assert_eq!(eval_int_in(&session, "(print 6)").unwrap(), 0);
    assert_eq!(transcript.lines(), vec!["5", "6"]);
}

#[test]
fn test_print_inside_function() {
    let (session, transcript) = session();
    eval_in(
        &session,
        "(def count-down (fn n (while (gt n 0) (do (print n) (mut n (- n 1))))))",
    )
    .unwrap();
    eval_in(&session, "(count-down 3)").unwrap();
    assert_eq!(transcript.lines(), vec!["3", "2", "1"]);
}
