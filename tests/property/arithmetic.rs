// Property tests for integer arithmetic.
//
// The same expression must agree with Rust's wrapping arithmetic whether
// it is compiled to a raw integer or to a boxed cell.

use crate::common::{eval, eval_int};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_commutative(a in -10000i64..10000, b in -10000i64..10000) {
        let r1 = eval_int(&format!("(+ {} {})", a, b)).unwrap();
        let r2 = eval_int(&format!("(+ {} {})", b, a)).unwrap();
        prop_assert_eq!(r1, r2, "addition not commutative for {} + {}", a, b);
    }

    #[test]
    fn arithmetic_matches_wrapping_ops(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(eval_int(&format!("(+ {} {})", a, b)).unwrap(), a.wrapping_add(b));
        prop_assert_eq!(eval_int(&format!("(- {} {})", a, b)).unwrap(), a.wrapping_sub(b));
        prop_assert_eq!(eval_int(&format!("(* {} {})", a, b)).unwrap(), a.wrapping_mul(b));
    }

    #[test]
    fn division_truncates(a in -100000i64..100000, b in -1000i64..1000) {
        prop_assume!(b != 0);
        prop_assert_eq!(eval_int(&format!("(/ {} {})", a, b)).unwrap(), a / b);
    }

    #[test]
    fn mod_law(a in -100000i64..100000, b in -1000i64..1000) {
        prop_assume!(b != 0);
        let q = eval_int(&format!("(/ {} {})", a, b)).unwrap();
        let r = eval_int(&format!("(% {} {})", a, b)).unwrap();
        prop_assert_eq!(q * b + r, a, "mod law broken for {} and {}", a, b);
    }

    #[test]
    fn division_by_zero_is_zero(a in any::<i64>()) {
        prop_assert_eq!(eval_int(&format!("(/ {} 0)", a)).unwrap(), 0);
    }

    #[test]
    fn comparisons_are_flags(a in -1000i64..1000, b in -1000i64..1000) {
        prop_assert_eq!(eval_int(&format!("(lt {} {})", a, b)).unwrap(), (a < b) as i64);
        prop_assert_eq!(eval_int(&format!("(gt {} {})", a, b)).unwrap(), (a > b) as i64);
    }

    #[test]
    fn boxed_and_raw_results_agree(a in -10000i64..10000, b in -10000i64..10000, c in -100i64..100) {
        let source = format!("(- (* {} {}) (+ {} {}))", a, c, b, c);
        let raw = eval_int(&source).unwrap();
        let boxed = eval(&source).unwrap();
        prop_assert_eq!(boxed.as_int(), Some(raw));
    }

    #[test]
    fn definitions_feed_arithmetic(a in -10000i64..10000, b in -10000i64..10000) {
        let source = format!("(def x {}) (def y {}) (+ x y)", a, b);
        prop_assert_eq!(eval_int(&source).unwrap(), a + b);
    }
}
