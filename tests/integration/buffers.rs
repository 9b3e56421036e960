use crate::common::{compile_error, eval, eval_int, text};
use sledge::{CompileError, Tag};

#[test]
fn test_alloc_and_size() {
    assert_eq!(eval_int("(def buf (alloc 10)) (size buf)").unwrap(), 10);
    assert_eq!(eval_int("(def buf (alloc 10)) (usize buf)").unwrap(), 10);
    let buf = eval("(alloc-str 3)").unwrap();
    assert_eq!(buf.tag(), Tag::Bytes);
    assert_eq!(buf.to_bytes(), Some(vec![0, 0, 0]));
}

#[test]
fn test_checked_put_get() {
    assert_eq!(
        eval_int("(def buf (alloc 4)) (put buf 0 65) (get buf 0)").unwrap(),
        65
    );
}

#[test]
fn test_unchecked_put_get() {
    assert_eq!(
        eval_int("(def buf (alloc 4)) (uput buf 2 66) (uget buf 2)").unwrap(),
        66
    );
    // Both families see the same storage.
    assert_eq!(
        eval_int("(def buf (alloc 4)) (uput buf 1 7) (get buf 1)").unwrap(),
        7
    );
}

#[test]
fn test_put_truncates_to_a_byte() {
    assert_eq!(
        eval_int("(def buf (alloc 1)) (put buf 0 321) (get buf 0)").unwrap(),
        65
    );
}

#[test]
fn test_checked_access_out_of_range() {
    let source = "(def buf (alloc 2)) (put buf 5 1) (get buf 5)";
    assert_eq!(eval_int(source).unwrap(), 0);
    assert_eq!(eval_int("(def buf (alloc 2)) (get buf -1)").unwrap(), 0);
}

#[test]
fn test_put_returns_buffer() {
    let buf = eval("(put (alloc 2) 1 90)").unwrap();
    assert_eq!(buf.to_bytes(), Some(vec![0, 90]));
    let buf = eval("(uput (alloc 2) 0 1)").unwrap();
    assert_eq!(buf.to_bytes(), Some(vec![1, 0]));
}

#[test]
fn test_string_literals_are_buffers() {
    assert_eq!(eval_int("(size \"hello\")").unwrap(), 5);
    assert_eq!(eval_int("(get \"A\" 0)").unwrap(), 65);
}

#[test]
fn test_concat() {
    assert_eq!(text(eval("(concat \"ab\" \"cd\")").unwrap()), "abcd");
    assert_eq!(text(eval("(concat \"ab\" 5)").unwrap()), "ab");
}

#[test]
fn test_write_renders_into_buffer() {
    let buf = eval("(def b (alloc 8)) (write b '(1 2))").unwrap();
    assert_eq!(text(buf), "(1 2)");
    let buf = eval("(write (alloc 3) 12345)").unwrap();
    assert_eq!(buf.to_bytes(), Some(b"123".to_vec()));
}

#[test]
fn test_buffer_ops_need_buffers() {
    let err = compile_error("(size 5)");
    assert!(matches!(err, CompileError::TypeMismatch { .. }), "{err}");
    let err = compile_error("(get '(1) 0)");
    assert!(matches!(err, CompileError::TypeMismatch { .. }), "{err}");
}
