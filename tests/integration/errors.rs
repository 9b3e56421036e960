use crate::common::{compile_error, eval_in, eval_int_in, session};
use sledge::{CompileError, Error, ReadError};

#[test]
fn test_argument_count_names_usage() {
    let err = compile_error("(car)");
    assert_eq!(err.to_string(), "missing argument in (car), usage: (car list)");
}

#[test]
fn test_type_mismatch_names_both_representations() {
    let err = compile_error("(+ 1 '(2 3))");
    assert_eq!(
        err.to_string(),
        "type mismatch in (2 3): got cons, required pure-int"
    );
}

#[test]
fn test_undefined_operator() {
    let err = compile_error("(frobnicate 1 2)");
    assert_eq!(err.to_string(), "undefined symbol: frobnicate");
}

#[test]
fn test_network_builtins_are_unavailable() {
    for source in [
        "(udp-poll)",
        "(udp-send \"host\" 1 \"x\")",
        "(tcp-bind 80)",
        "(tcp-connect \"host\" 80)",
        "(tcp-send \"x\")",
    ] {
        let err = compile_error(source);
        assert!(
            matches!(&err, CompileError::UnknownOperator { reason, .. } if reason.contains("not available")),
            "{source}: {err}"
        );
    }
}

#[test]
fn test_failure_deep_inside_aborts_whole_expression() {
    let (session, _) = session();
    let err = eval_in(&session, "(def z (+ 1 (if 1 (car 2) 3)))").unwrap_err();
    assert!(matches!(err, Error::Compile(CompileError::TypeMismatch { .. })));
    assert!(session.lookup("z").is_none());
}

#[test]
fn test_session_survives_errors() {
    let (session, _) = session();
    assert!(eval_in(&session, "(car 1)").is_err());
    assert!(eval_in(&session, "(fn)").is_err());
    assert_eq!(eval_int_in(&session, "(* 3 3)").unwrap(), 9);
}

#[test]
fn test_read_errors_surface() {
    let (session, _) = session();
    let err = eval_in(&session, "(+ 1 2").unwrap_err();
    assert!(matches!(err, Error::Read(ReadError::UnterminatedList { .. })));
    let err = eval_in(&session, ")").unwrap_err();
    assert!(matches!(err, Error::Read(ReadError::UnexpectedClose { .. })));
}
