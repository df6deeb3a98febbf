use crate::test_utils::{any_balance, any_fee, any_weight, fraction, prop_assert_relative_approx_eq};
use crate::types::{Balance, ONE_RAW};
use crate::weighted::*;
use crate::FixedU256;

use proptest::prelude::*;

const TOLERANCE: f64 = 1e-8;

fn moderate_weight() -> impl Strategy<Value = Balance> {
	(ONE_RAW..10 * ONE_RAW).prop_map(FixedU256::from_raw)
}

fn share_of(balance: Balance, ratio: Balance) -> Balance {
	balance.multiply(ratio).unwrap()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn out_given_in_should_invert_in_given_out(
		balance_in in any_balance(),
		balance_out in any_balance(),
		weight_in in moderate_weight(),
		weight_out in moderate_weight(),
		swap_fee in any_fee(),
		out_ratio in fraction(100, 333_000),
	) {
		let amount_out = share_of(balance_out, out_ratio);

		let amount_in = calculate_in_given_out(balance_in, weight_in, balance_out, weight_out, amount_out, swap_fee).unwrap();
		let received = calculate_out_given_in(balance_in, weight_in, balance_out, weight_out, amount_in, swap_fee).unwrap();

		prop_assert_relative_approx_eq!(received, amount_out, TOLERANCE, "out given in is not inverse of in given out");
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn single_in_given_pool_out_should_invert_pool_out_given_single_in(
		balance_in in any_balance(),
		pool_supply in any_balance(),
		weight_in in moderate_weight(),
		other_weight in (ONE_RAW..40 * ONE_RAW).prop_map(FixedU256::from_raw),
		swap_fee in any_fee(),
		in_ratio in fraction(100, 500_000),
	) {
		let total_weight = weight_in.checked_add(other_weight).unwrap();
		let amount_in = share_of(balance_in, in_ratio);

		let minted = calculate_pool_out_given_single_in(balance_in, weight_in, pool_supply, total_weight, amount_in, swap_fee).unwrap();
		let required = calculate_single_in_given_pool_out(balance_in, weight_in, pool_supply, total_weight, minted, swap_fee).unwrap();

		prop_assert_relative_approx_eq!(required, amount_in, TOLERANCE);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn single_out_given_pool_in_should_invert_pool_in_given_single_out(
		balance_out in any_balance(),
		pool_supply in any_balance(),
		weight_out in moderate_weight(),
		other_weight in (ONE_RAW..40 * ONE_RAW).prop_map(FixedU256::from_raw),
		swap_fee in any_fee(),
		exit_fee in prop_oneof![Just(Balance::ZERO), fraction(10_000, 10_001)],
		out_ratio in fraction(100, 333_000),
	) {
		let total_weight = weight_out.checked_add(other_weight).unwrap();
		let amount_out = share_of(balance_out, out_ratio);

		let pool_amount_in = calculate_pool_in_given_single_out(balance_out, weight_out, pool_supply, total_weight, amount_out, swap_fee, exit_fee).unwrap();
		let withdrawn = calculate_single_out_given_pool_in(balance_out, weight_out, pool_supply, total_weight, pool_amount_in, swap_fee, exit_fee).unwrap();

		prop_assert_relative_approx_eq!(withdrawn, amount_out, TOLERANCE);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn spot_price_should_not_decrease_after_swap(
		balance_in in any_balance(),
		balance_out in any_balance(),
		weight_in in any_weight(),
		weight_out in any_weight(),
		swap_fee in any_fee(),
		in_ratio in fraction(1, 500_000),
	) {
		let amount_in = share_of(balance_in, in_ratio);

		let amount_out = calculate_out_given_in(balance_in, weight_in, balance_out, weight_out, amount_in, swap_fee).unwrap();
		let spot_before = calculate_spot_price(balance_in, weight_in, balance_out, weight_out, swap_fee).unwrap();
		let spot_after = calculate_spot_price(
			balance_in.checked_add(amount_in).unwrap(),
			weight_in,
			balance_out.checked_sub(amount_out).unwrap(),
			weight_out,
			swap_fee,
		).unwrap();

		prop_assert!(spot_after >= spot_before);
		if !amount_out.is_zero() {
			prop_assert!(spot_before <= amount_in.divide(amount_out).unwrap());
		}
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn out_given_in_should_grow_with_amount_in(
		balance_in in any_balance(),
		balance_out in any_balance(),
		weight_in in any_weight(),
		weight_out in any_weight(),
		swap_fee in any_fee(),
		small_ratio in fraction(1_000, 200_000),
		extra_ratio in fraction(1_000, 200_000),
	) {
		let small = share_of(balance_in, small_ratio);
		let large = small.checked_add(share_of(balance_in, extra_ratio)).unwrap();

		let small_out = calculate_out_given_in(balance_in, weight_in, balance_out, weight_out, small, swap_fee).unwrap();
		let large_out = calculate_out_given_in(balance_in, weight_in, balance_out, weight_out, large, swap_fee).unwrap();

		prop_assert!(large_out >= small_out);
		prop_assert!(large_out < balance_out);
	}
}
