use crate::fixed::FixedU256;
use primitive_types::U256;

pub type Balance = FixedU256;

/// Raw representation of one whole unit.
pub const ONE_RAW: u128 = 1_000_000_000_000_000_000;

pub const ONE: FixedU256 = FixedU256::from_raw(ONE_RAW);

/// Minimum number of assets a pool needs before it can be finalized.
pub const MIN_ASSETS: usize = 2;
/// Maximum number of assets a pool can hold.
pub const MAX_ASSETS: usize = 8;

pub const MIN_FEE: FixedU256 = FixedU256::from_raw(ONE_RAW / 1_000_000);
pub const MAX_FEE: FixedU256 = FixedU256::from_raw(ONE_RAW / 10);

pub const MIN_WEIGHT: FixedU256 = ONE;
pub const MAX_WEIGHT: FixedU256 = FixedU256::from_raw(ONE_RAW * 50);
pub const MAX_TOTAL_WEIGHT: FixedU256 = FixedU256::from_raw(ONE_RAW * 50);

pub const MIN_BALANCE: FixedU256 = FixedU256::from_raw(ONE_RAW / 1_000_000_000_000);

/// Pool shares minted to the controller on finalization.
pub const INIT_POOL_SUPPLY: FixedU256 = FixedU256::from_raw(ONE_RAW * 100);

/// Max fraction of the `in` balance that can be sold in one operation.
pub const MAX_IN_RATIO: FixedU256 = FixedU256::from_raw(ONE_RAW / 2);
/// Max fraction of the `out` balance that can be bought in one operation.
pub const MAX_OUT_RATIO: FixedU256 = FixedU256::from_raw(ONE_RAW / 3 + 1);

pub const MIN_POW_BASE: FixedU256 = FixedU256::from_raw(1);
pub const MAX_POW_BASE: FixedU256 = FixedU256::from_raw(2 * ONE_RAW - 1);

/// Absolute precision the fractional power series stops at. Gives a relative error around 1e-10.
pub const POW_PRECISION: FixedU256 = FixedU256::from_raw(ONE_RAW / 10_000_000_000);

/// Hard ceiling on power series terms. Bases within the ratio caps converge in well under 100 terms.
pub const MAX_POW_ITERATIONS: u32 = 10_000;

/// `U256::MAX` as a share allowance never gets decremented.
pub const INFINITE: FixedU256 = FixedU256::from_inner(U256::MAX);
