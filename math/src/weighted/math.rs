use crate::types::{Balance, ONE};
use crate::MathError;

/// Calculating normalized weight of an asset.
/// Formula : WEIGHT / TOTAL_WEIGHT
pub fn calculate_normalized_weight(weight: Balance, total_weight: Balance) -> Result<Balance, MathError> {
	weight.divide(total_weight)
}

/// Calculating spot price of `out` asset denominated in `in` asset, fee included.
/// Formula : (IN_BALANCE / IN_WEIGHT) / (OUT_BALANCE / OUT_WEIGHT) * (1 / (1 - SWAP_FEE))
///
/// - `balance_in` - pool balance of selling asset
/// - `weight_in` - denormalized weight of selling asset
/// - `balance_out` - pool balance of buying asset
/// - `weight_out` - denormalized weight of buying asset
/// - `swap_fee` - swap fee
///
/// Returns MathError in case of error
pub fn calculate_spot_price(
	balance_in: Balance,
	weight_in: Balance,
	balance_out: Balance,
	weight_out: Balance,
	swap_fee: Balance,
) -> Result<Balance, MathError> {
	let numer = balance_in.divide(weight_in)?;
	let denom = balance_out.divide(weight_out)?;
	let ratio = numer.divide(denom)?;
	let scale = ONE.divide(ONE.checked_sub(swap_fee)?)?;
	ratio.multiply(scale)
}

/// Calculating amount to be received from the pool given the amount sold to the pool.
/// Formula : OUT_BALANCE * (1 - (IN_BALANCE / (IN_BALANCE + AMOUNT_IN * (1 - SWAP_FEE))) ^ (IN_WEIGHT / OUT_WEIGHT))
///
/// - `balance_in` - pool balance of selling asset
/// - `weight_in` - denormalized weight of selling asset
/// - `balance_out` - pool balance of buying asset
/// - `weight_out` - denormalized weight of buying asset
/// - `amount_in` - amount sold to the pool, fee included
/// - `swap_fee` - swap fee
///
/// Returns MathError in case of error
pub fn calculate_out_given_in(
	balance_in: Balance,
	weight_in: Balance,
	balance_out: Balance,
	weight_out: Balance,
	amount_in: Balance,
	swap_fee: Balance,
) -> Result<Balance, MathError> {
	let weight_ratio = weight_in.divide(weight_out)?;
	let adjusted_in = amount_in.multiply(ONE.checked_sub(swap_fee)?)?;
	let y = balance_in.divide(balance_in.checked_add(adjusted_in)?)?;
	let foo = y.power(weight_ratio)?;
	// rounding may push the power above one for tiny trades, nothing comes out then
	let bar = ONE.saturating_sub(foo);
	balance_out.multiply(bar)
}

/// Calculating amount to be sold to the pool given the amount to be received from the pool.
/// Formula : IN_BALANCE * ((OUT_BALANCE / (OUT_BALANCE - AMOUNT_OUT)) ^ (OUT_WEIGHT / IN_WEIGHT) - 1) / (1 - SWAP_FEE)
///
/// - `balance_in` - pool balance of selling asset
/// - `weight_in` - denormalized weight of selling asset
/// - `balance_out` - pool balance of buying asset
/// - `weight_out` - denormalized weight of buying asset
/// - `amount_out` - amount bought from the pool
/// - `swap_fee` - swap fee
///
/// Returns MathError in case of error
pub fn calculate_in_given_out(
	balance_in: Balance,
	weight_in: Balance,
	balance_out: Balance,
	weight_out: Balance,
	amount_out: Balance,
	swap_fee: Balance,
) -> Result<Balance, MathError> {
	let weight_ratio = weight_out.divide(weight_in)?;
	let diff = balance_out.checked_sub(amount_out)?;
	let y = balance_out.divide(diff)?;
	let foo = y.power(weight_ratio)?.checked_sub(ONE)?;
	let amount_in = balance_in.multiply(foo)?;
	amount_in.divide(ONE.checked_sub(swap_fee)?)
}

/// Calculating pool shares minted for a single asset deposit.
///
/// Only the part of the deposit which is implicitly swapped into the other assets pays the swap fee,
/// which is `(1 - normalized weight)` of it.
///
/// - `balance_in` - pool balance of deposited asset
/// - `weight_in` - denormalized weight of deposited asset
/// - `pool_supply` - total supply of pool shares
/// - `total_weight` - sum of denormalized weights
/// - `amount_in` - deposited amount
/// - `swap_fee` - swap fee
///
/// Returns MathError in case of error
pub fn calculate_pool_out_given_single_in(
	balance_in: Balance,
	weight_in: Balance,
	pool_supply: Balance,
	total_weight: Balance,
	amount_in: Balance,
	swap_fee: Balance,
) -> Result<Balance, MathError> {
	let normalized_weight = calculate_normalized_weight(weight_in, total_weight)?;
	let zaz = ONE.checked_sub(normalized_weight)?.multiply(swap_fee)?;
	let amount_in_after_fee = amount_in.multiply(ONE.checked_sub(zaz)?)?;

	let new_balance_in = balance_in.checked_add(amount_in_after_fee)?;
	let in_ratio = new_balance_in.divide(balance_in)?;

	let pool_ratio = in_ratio.power(normalized_weight)?;
	let new_pool_supply = pool_ratio.multiply(pool_supply)?;
	new_pool_supply.checked_sub(pool_supply)
}

/// Calculating amount of a single asset to deposit for the given amount of pool shares.
/// Inverse of [`calculate_pool_out_given_single_in`].
///
/// - `balance_in` - pool balance of deposited asset
/// - `weight_in` - denormalized weight of deposited asset
/// - `pool_supply` - total supply of pool shares
/// - `total_weight` - sum of denormalized weights
/// - `pool_amount_out` - pool shares to be minted
/// - `swap_fee` - swap fee
///
/// Returns MathError in case of error
pub fn calculate_single_in_given_pool_out(
	balance_in: Balance,
	weight_in: Balance,
	pool_supply: Balance,
	total_weight: Balance,
	pool_amount_out: Balance,
	swap_fee: Balance,
) -> Result<Balance, MathError> {
	let normalized_weight = calculate_normalized_weight(weight_in, total_weight)?;
	let new_pool_supply = pool_supply.checked_add(pool_amount_out)?;
	let pool_ratio = new_pool_supply.divide(pool_supply)?;

	let boo = ONE.divide(normalized_weight)?;
	let in_ratio = pool_ratio.power(boo)?;
	let new_balance_in = in_ratio.multiply(balance_in)?;
	let amount_in_after_fee = new_balance_in.checked_sub(balance_in)?;

	let zar = ONE.checked_sub(normalized_weight)?.multiply(swap_fee)?;
	amount_in_after_fee.divide(ONE.checked_sub(zar)?)
}

/// Calculating amount of a single asset withdrawn for the given amount of pool shares.
///
/// Exit fee is charged on the pool shares first, swap fee on the `(1 - normalized weight)` part of the
/// withdrawal afterwards.
///
/// - `balance_out` - pool balance of withdrawn asset
/// - `weight_out` - denormalized weight of withdrawn asset
/// - `pool_supply` - total supply of pool shares
/// - `total_weight` - sum of denormalized weights
/// - `pool_amount_in` - pool shares redeemed
/// - `swap_fee` - swap fee
/// - `exit_fee` - exit fee
///
/// Returns MathError in case of error
pub fn calculate_single_out_given_pool_in(
	balance_out: Balance,
	weight_out: Balance,
	pool_supply: Balance,
	total_weight: Balance,
	pool_amount_in: Balance,
	swap_fee: Balance,
	exit_fee: Balance,
) -> Result<Balance, MathError> {
	let normalized_weight = calculate_normalized_weight(weight_out, total_weight)?;

	let pool_amount_in_after_exit_fee = pool_amount_in.multiply(ONE.checked_sub(exit_fee)?)?;
	let new_pool_supply = pool_supply.checked_sub(pool_amount_in_after_exit_fee)?;
	let pool_ratio = new_pool_supply.divide(pool_supply)?;

	let out_ratio = pool_ratio.power(ONE.divide(normalized_weight)?)?;
	let new_balance_out = out_ratio.multiply(balance_out)?;

	let amount_out_before_swap_fee = balance_out.checked_sub(new_balance_out)?;

	let zaz = ONE.checked_sub(normalized_weight)?.multiply(swap_fee)?;
	amount_out_before_swap_fee.multiply(ONE.checked_sub(zaz)?)
}

/// Calculating amount of pool shares to redeem for the given single asset withdrawal.
/// Inverse of [`calculate_single_out_given_pool_in`].
///
/// - `balance_out` - pool balance of withdrawn asset
/// - `weight_out` - denormalized weight of withdrawn asset
/// - `pool_supply` - total supply of pool shares
/// - `total_weight` - sum of denormalized weights
/// - `amount_out` - withdrawn amount
/// - `swap_fee` - swap fee
/// - `exit_fee` - exit fee
///
/// Returns MathError in case of error
pub fn calculate_pool_in_given_single_out(
	balance_out: Balance,
	weight_out: Balance,
	pool_supply: Balance,
	total_weight: Balance,
	amount_out: Balance,
	swap_fee: Balance,
	exit_fee: Balance,
) -> Result<Balance, MathError> {
	let normalized_weight = calculate_normalized_weight(weight_out, total_weight)?;

	let zoo = ONE.checked_sub(normalized_weight)?;
	let zar = zoo.multiply(swap_fee)?;
	let amount_out_before_swap_fee = amount_out.divide(ONE.checked_sub(zar)?)?;

	let new_balance_out = balance_out.checked_sub(amount_out_before_swap_fee)?;
	let out_ratio = new_balance_out.divide(balance_out)?;

	let pool_ratio = out_ratio.power(normalized_weight)?;
	let new_pool_supply = pool_ratio.multiply(pool_supply)?;
	let pool_amount_in_after_exit_fee = pool_supply.checked_sub(new_pool_supply)?;

	pool_amount_in_after_exit_fee.divide(ONE.checked_sub(exit_fee)?)
}
