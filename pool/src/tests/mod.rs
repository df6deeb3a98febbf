use crate::types::Balance;
use crate::Pool;
use mock::Test;

mod atomicity;

/// Sum of denormalized weights of all bound tokens.
pub(crate) fn sum_of_weights(pool: &Pool<Test>) -> Balance {
	pool.current_tokens()
		.iter()
		.map(|asset| pool.denormalized_weight(*asset).unwrap())
		.fold(Balance::ZERO, |acc, w| acc.checked_add(w).unwrap())
}

/// Checks that every record index matches its position in the token list.
pub(crate) fn indexes_are_consistent(pool: &Pool<Test>) -> bool {
	pool.current_tokens()
		.iter()
		.enumerate()
		.all(|(i, asset)| pool.record(*asset).map(|r| r.index as usize == i && r.bound) == Some(true))
}

/// Checks that all share balances add up to the total supply.
pub(crate) fn shares_add_up(pool: &Pool<Test>) -> bool {
	let sum = pool
		.shares()
		.holders()
		.fold(Balance::ZERO, |acc, (_, b)| acc.checked_add(*b).unwrap());
	sum == pool.total_supply()
}
