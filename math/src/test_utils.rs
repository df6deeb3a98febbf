use crate::types::{Balance, MAX_FEE, MAX_WEIGHT, MIN_FEE, MIN_WEIGHT, ONE_RAW};
use crate::FixedU256;

use num_traits::ToPrimitive;
use proptest::prelude::*;

// ----- Macros

/// Asserts that two expressions `$x` and `$y` are approximately equal to each other up to a delta `$z`.
#[macro_export]
macro_rules! assert_approx_eq {
	($x:expr, $y:expr, $z:expr) => {{
		assert_approx_eq!($x, $y, $z, "values are not approximately equal");
	}};
	($x:expr, $y:expr, $z:expr, $r:expr) => {{
		let diff = if $x >= $y {
			$x.clone().checked_sub($y.clone()).unwrap()
		} else {
			$y.clone().checked_sub($x.clone()).unwrap()
		};
		assert!(
			diff <= $z,
			"\n{}\n    left: {:?}\n   right: {:?}\n    diff: {:?}\nmax_diff: {:?}\n",
			$r,
			$x,
			$y,
			diff,
			$z
		);
	}};
}
pub(crate) use assert_approx_eq;

/// Asserts that `$x` is within relative error `$z` of the reference value `$y`.
macro_rules! prop_assert_relative_approx_eq {
	($x:expr, $y:expr, $z:expr) => {{
		prop_assert_relative_approx_eq!($x, $y, $z, "values are not approximately equal");
	}};
	($x:expr, $y:expr, $z:expr, $r:expr) => {{
		let error = $crate::test_utils::relative_error($x, $y);
		prop_assert!(
			error <= $z,
			"\n{}\n    left: {:?}\n   right: {:?}\n   error: {:?}\nmax_error: {:?}\n",
			$r,
			$x,
			$y,
			error,
			$z
		);
	}};
}
pub(crate) use prop_assert_relative_approx_eq;

// ----- Helpers

pub fn to_f64(value: FixedU256) -> f64 {
	value.to_f64().unwrap_or(f64::NAN)
}

/// `|x - y| / y`, computed on floats. Good enough for tolerances above 1e-15.
pub fn relative_error(x: FixedU256, y: FixedU256) -> f64 {
	let (x, y) = (to_f64(x), to_f64(y));
	if y == 0.0 {
		return x.abs();
	}
	((x - y) / y).abs()
}

pub fn units(n: u128) -> Balance {
	FixedU256::from_integer(n)
}

// ----- Property Test Strategies

/// Pool balances between 1 and 10^9 whole units.
pub fn any_balance() -> impl Strategy<Value = Balance> {
	(ONE_RAW..1_000_000_000 * ONE_RAW).prop_map(FixedU256::from_raw)
}

pub fn any_weight() -> impl Strategy<Value = Balance> {
	(MIN_WEIGHT.into_inner().low_u128()..MAX_WEIGHT.into_inner().low_u128()).prop_map(FixedU256::from_raw)
}

pub fn any_fee() -> impl Strategy<Value = Balance> {
	(MIN_FEE.into_inner().low_u128()..MAX_FEE.into_inner().low_u128()).prop_map(FixedU256::from_raw)
}

/// A fraction of one in `[min_permill, max_permill)` parts per million.
pub fn fraction(min_permill: u128, max_permill: u128) -> impl Strategy<Value = Balance> {
	(min_permill..max_permill).prop_map(|p| FixedU256::from_raw(p * (ONE_RAW / 1_000_000)))
}

#[test]
fn relative_error_works() {
	assert_eq!(relative_error(units(2), units(2)), 0.0);
	assert!((relative_error(units(101), units(100)) - 0.01).abs() < 1e-12);
}
