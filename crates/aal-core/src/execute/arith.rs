//! Modular accumulator arithmetic.
//!
//! Reductions use truncating remainder, so a result keeps the sign of the
//! unreduced value and the accumulator can go negative.

use crate::{Word, MODULUS};

/// Reduces a value into `(-MODULUS, MODULUS)`, keeping its sign.
#[must_use]
pub const fn reduce(value: Word) -> Word {
    value % MODULUS
}

/// `ADD`: `(acc + operand) mod MODULUS`.
#[must_use]
pub const fn add(acc: Word, operand: Word) -> Word {
    reduce(acc.wrapping_add(operand))
}

/// `SUB`: `(acc - operand) mod MODULUS`.
#[must_use]
pub const fn sub(acc: Word, operand: Word) -> Word {
    reduce(acc.wrapping_sub(operand))
}

/// `MULT`: `(acc * operand) mod MODULUS`.
#[must_use]
pub const fn mult(acc: Word, operand: Word) -> Word {
    reduce(acc.wrapping_mul(operand))
}

/// `DIV`: truncating quotient, not reduced. `None` for a zero divisor.
#[must_use]
pub const fn div(acc: Word, operand: Word) -> Option<Word> {
    acc.checked_div(operand)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(999_999, 1, 0)]
    #[case(999_999, 2, 1)]
    #[case(-999_999, -2, -1)]
    #[case(5, -7, -2)]
    fn add_wraps_with_dividend_sign(#[case] acc: Word, #[case] x: Word, #[case] expected: Word) {
        assert_eq!(add(acc, x), expected);
    }

    #[rstest]
    #[case(0, 1, -1)]
    #[case(-999_999, 1, 0)]
    #[case(-999_999, 5, -4)]
    fn sub_can_go_negative(#[case] acc: Word, #[case] x: Word, #[case] expected: Word) {
        assert_eq!(sub(acc, x), expected);
    }

    #[rstest]
    #[case(1000, 1000, 0)]
    #[case(1001, 1000, 1000)]
    #[case(-3, 400_000, -200_000)]
    #[case(999_999, 999_999, 1)]
    fn mult_reduces(#[case] acc: Word, #[case] x: Word, #[case] expected: Word) {
        assert_eq!(mult(acc, x), expected);
    }

    #[rstest]
    #[case(7, 2, Some(3))]
    #[case(-7, 2, Some(-3))]
    #[case(7, -2, Some(-3))]
    #[case(2_000_000_000, 1, Some(2_000_000_000))]
    #[case(5, 0, None)]
    fn div_truncates_toward_zero_without_reduction(
        #[case] acc: Word,
        #[case] x: Word,
        #[case] expected: Option<Word>,
    ) {
        assert_eq!(div(acc, x), expected);
    }

    proptest! {
        #[test]
        fn reduced_results_follow_dividend_sign(
            acc in -999_999i64..=999_999,
            x in i64::from(i32::MIN)..=i64::from(i32::MAX),
        ) {
            for (raw, result) in [
                (acc + x, add(acc, x)),
                (acc - x, sub(acc, x)),
                (acc * x, mult(acc, x)),
            ] {
                prop_assert!(result.abs() < MODULUS);
                prop_assert!(result == 0 || result.signum() == raw.signum());
                prop_assert_eq!((raw - result) % MODULUS, 0);
            }
        }

        #[test]
        fn div_matches_truncating_quotient(
            acc in i64::from(i32::MIN)..=i64::from(i32::MAX),
            x in (1i64..=1000).prop_union(-1000i64..=-1),
        ) {
            let q = div(acc, x).unwrap();
            prop_assert_eq!(q * x + acc % x, acc);
            prop_assert!(q.abs() <= acc.abs());
        }
    }
}
