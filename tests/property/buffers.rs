// Property tests for byte buffers.

use crate::common::{eval, eval_int};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn put_then_get_keeps_low_byte(len in 1i64..64, value in any::<i64>(), seed in any::<u32>()) {
        let index = i64::from(seed) % len;
        let source = format!("(def b (alloc {})) (put b {} {}) (get b {})", len, index, value, index);
        prop_assert_eq!(eval_int(&source).unwrap(), value & 0xff);
    }

    #[test]
    fn checked_access_outside_is_zero(len in 0i64..16, past in 0i64..16) {
        let index = len + past;
        let source = format!("(def b (alloc {})) (put b {} 9) (get b {})", len, index, index);
        prop_assert_eq!(eval_int(&source).unwrap(), 0);
    }

    #[test]
    fn concat_sizes_add(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let source = format!("(concat \"{}\" \"{}\")", a, b);
        let joined = eval(&source).unwrap();
        prop_assert_eq!(joined.to_text(), Some(format!("{}{}", a, b)));
    }
}
