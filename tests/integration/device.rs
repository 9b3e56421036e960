use crate::common::{eval_in, eval_int_in, text};
use sledge::{Config, ErrorCode, HostDevice, Session, Tag, Transcript};
use tempfile::TempDir;

fn device_session(keys: &[i64]) -> (Session, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config::default()
        .with_screen(64, 48)
        .with_storage_root(dir.path());
    let device = HostDevice::new(&config).with_keys(keys.iter().copied());
    let session = Session::with_config(config)
        .expect("compiler starts")
        .with_device(device)
        .with_output(Transcript::new());
    (session, dir)
}

fn pixel_at(session: &Session, x: i64, y: i64) -> Option<u32> {
    session
        .use_device(|dev| dev.framebuffer().and_then(|fb| fb.get(x, y)))
        .flatten()
}

#[test]
fn test_pixel_and_rectfill() {
    let (session, _dir) = device_session(&[]);
    eval_in(&session, "(pixel 3 4 9)").unwrap();
    assert_eq!(pixel_at(&session, 3, 4), Some(9));

    eval_in(&session, "(rectfill 10 10 2 3 5)").unwrap();
    assert_eq!(pixel_at(&session, 11, 12), Some(5));
    assert_eq!(pixel_at(&session, 12, 12), Some(0));

    // Off-screen drawing is clipped, not an error.
    assert_eq!(eval_int_in(&session, "(pixel 1000 1000 1)").unwrap(), 0);
}

#[test]
fn test_drawing_with_computed_coordinates() {
    let (session, _dir) = device_session(&[]);
    let source = "
        (def i 0)
        (while (lt i 8)
          (do (pixel i i 2) (mut i (+ i 1))))";
    eval_in(&session, source).unwrap();
    for i in 0..8 {
        assert_eq!(pixel_at(&session, i, i), Some(2));
    }
    assert_eq!(pixel_at(&session, 8, 8), Some(0));
}

#[test]
fn test_blit_mono() {
    let (session, _dir) = device_session(&[]);
    eval_in(&session, "(def bm (alloc 1)) (put bm 0 128)").unwrap();
    eval_in(&session, "(blit-mono bm 10 10 2 1 7)").unwrap();
    assert_eq!(pixel_at(&session, 10, 10), Some(7));
    assert_eq!(pixel_at(&session, 11, 10), Some(0));

    eval_in(&session, "(blit-mono-inv bm 20 20 2 1 6)").unwrap();
    assert_eq!(pixel_at(&session, 20, 20), Some(0));
    assert_eq!(pixel_at(&session, 21, 20), Some(6));
}

#[test]
fn test_inkey_drains_queue() {
    let (session, _dir) = device_session(&[65, 66]);
    assert_eq!(eval_int_in(&session, "(inkey)").unwrap(), 65);
    assert_eq!(eval_int_in(&session, "(inkey)").unwrap(), 66);
    assert_eq!(eval_int_in(&session, "(inkey)").unwrap(), 0);
}

#[test]
fn test_flip_yields_zero() {
    let (session, _dir) = device_session(&[]);
    assert_eq!(eval_int_in(&session, "(flip)").unwrap(), 0);
}

#[test]
fn test_save_load_and_ls() {
    let (session, dir) = device_session(&[]);
    let saved = eval_in(&session, "(save \"hello\" \"greeting.txt\")").unwrap();
    assert_eq!(text(saved), "hello");
    assert_eq!(
        std::fs::read(dir.path().join("greeting.txt")).unwrap(),
        b"hello"
    );

    let loaded = eval_in(&session, "(load \"greeting.txt\")").unwrap();
    assert_eq!(loaded.tag(), Tag::Bytes);
    assert_eq!(text(loaded), "hello");

    let listing = eval_in(&session, "(ls)").unwrap();
    assert_eq!(listing.to_string(), "(\"greeting.txt\")");
}

#[test]
fn test_storage_failures_yield_error_cells() {
    let (session, _dir) = device_session(&[]);
    let missing = eval_in(&session, "(load \"missing.txt\")").unwrap();
    assert_eq!(missing.tag(), Tag::Error);
    assert_eq!(missing.error_code(), Some(ErrorCode::Io as i64));

    let escaped = eval_in(&session, "(load \"../outside\")").unwrap();
    assert_eq!(escaped.error_code(), Some(ErrorCode::Io as i64));
}
