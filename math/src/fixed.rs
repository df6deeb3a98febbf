use crate::types::{MAX_POW_BASE, MAX_POW_ITERATIONS, MIN_POW_BASE, ONE, ONE_RAW, POW_PRECISION};
use crate::{
	ensure, MathError,
	MathError::{BaseTooHigh, BaseTooLow, DivisionByZero, Overflow, PowApproximation, Underflow},
};
use codec::{Decode, Encode};
use core::fmt;
use num_traits::{Bounded, ToPrimitive};
use primitive_types::U256;
use scale_info::TypeInfo;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Unsigned decimal number with 18 fractional digits, stored as a raw `U256` scaled by `10^18`.
///
/// Every arithmetic operation is checked and states its rounding direction:
///
/// - `multiply` rounds down, `multiply_up` rounds up
/// - `divide` rounds half up, `divide_down` / `divide_up` round down / up
/// - `power_int` and `power` compose `multiply`, so they round down at every step
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo)]
pub struct FixedU256(U256);

impl FixedU256 {
	pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

	pub const fn from_inner(inner: U256) -> Self {
		Self(inner)
	}

	/// Build from an already scaled `u128`.
	pub const fn from_raw(raw: u128) -> Self {
		Self(U256([raw as u64, (raw >> 64) as u64, 0, 0]))
	}

	/// Build from a whole number. `u128::MAX * 10^18` fits comfortably, so this cannot fail.
	pub fn from_integer(n: u128) -> Self {
		Self(U256::from(n) * U256::from(ONE_RAW))
	}

	/// `n / d` rounded half up.
	pub fn from_rational(n: u128, d: u128) -> Result<Self, MathError> {
		Self::from_integer(n).divide(Self::from_integer(d))
	}

	pub const fn into_inner(self) -> U256 {
		self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Whole part of the number.
	pub fn to_integer(self) -> U256 {
		self.0 / U256::from(ONE_RAW)
	}

	pub fn floor(self) -> Self {
		Self(self.to_integer() * U256::from(ONE_RAW))
	}

	pub fn checked_add(self, other: Self) -> Result<Self, MathError> {
		self.0.checked_add(other.0).map(Self).ok_or(Overflow)
	}

	pub fn checked_sub(self, other: Self) -> Result<Self, MathError> {
		self.0.checked_sub(other.0).map(Self).ok_or(Underflow)
	}

	pub fn saturating_sub(self, other: Self) -> Self {
		Self(self.0.saturating_sub(other.0))
	}

	/// Absolute difference, plus `true` when `other` is the bigger one.
	pub fn sub_sign(self, other: Self) -> (Self, bool) {
		if self >= other {
			(Self(self.0 - other.0), false)
		} else {
			(Self(other.0 - self.0), true)
		}
	}

	/// `a * b / ONE`, rounded down.
	pub fn multiply(self, other: Self) -> Result<Self, MathError> {
		let c = self.0.checked_mul(other.0).ok_or(Overflow)?;
		Ok(Self(c / U256::from(ONE_RAW)))
	}

	/// `a * b / ONE`, rounded up.
	pub fn multiply_up(self, other: Self) -> Result<Self, MathError> {
		let c = self.0.checked_mul(other.0).ok_or(Overflow)?;
		let (q, r) = c.div_mod(U256::from(ONE_RAW));
		if r.is_zero() {
			Ok(Self(q))
		} else {
			q.checked_add(U256::one()).map(Self).ok_or(Overflow)
		}
	}

	/// `(a * ONE + b / 2) / b`, i.e. rounded half up.
	pub fn divide(self, other: Self) -> Result<Self, MathError> {
		ensure!(!other.is_zero(), DivisionByZero);
		let c0 = self.0.checked_mul(U256::from(ONE_RAW)).ok_or(Overflow)?;
		let c1 = c0.checked_add(other.0 / U256::from(2)).ok_or(Overflow)?;
		Ok(Self(c1 / other.0))
	}

	/// `a * ONE / b`, rounded down.
	pub fn divide_down(self, other: Self) -> Result<Self, MathError> {
		ensure!(!other.is_zero(), DivisionByZero);
		let c0 = self.0.checked_mul(U256::from(ONE_RAW)).ok_or(Overflow)?;
		Ok(Self(c0 / other.0))
	}

	/// `a * ONE / b`, rounded up.
	pub fn divide_up(self, other: Self) -> Result<Self, MathError> {
		ensure!(!other.is_zero(), DivisionByZero);
		let c0 = self.0.checked_mul(U256::from(ONE_RAW)).ok_or(Overflow)?;
		let (q, r) = c0.div_mod(other.0);
		if r.is_zero() {
			Ok(Self(q))
		} else {
			q.checked_add(U256::one()).map(Self).ok_or(Overflow)
		}
	}

	/// Integer remainder of the raw representations.
	pub fn modulo(self, other: Self) -> Result<Self, MathError> {
		ensure!(!other.is_zero(), DivisionByZero);
		Ok(Self(self.0 % other.0))
	}

	/// Mean of both values, rounded down. Never overflows.
	pub fn average(self, other: Self) -> Self {
		Self((self.0 & other.0) + (self.0 ^ other.0) / U256::from(2))
	}

	/// `self^n` for a whole exponent, by squaring.
	pub fn power_int(self, n: u64) -> Result<Self, MathError> {
		let mut base = self;
		let mut n = n;
		let mut result = if n % 2 != 0 { base } else { ONE };

		n /= 2;
		while n != 0 {
			base = base.multiply(base)?;
			if n % 2 != 0 {
				result = result.multiply(base)?;
			}
			n /= 2;
		}

		Ok(result)
	}

	/// `self^exponent` for a fractional exponent.
	///
	/// The whole part of the exponent is computed by squaring with `power_int`, the fractional part with
	/// the binomial series `(1 + x)^a = sum(binom(a, k) * x^k)`, truncated once a term drops below
	/// `POW_PRECISION`. The base has to stay within `[MIN_POW_BASE, MAX_POW_BASE]` for the series to converge.
	pub fn power(self, exponent: Self) -> Result<Self, MathError> {
		ensure!(self >= MIN_POW_BASE, BaseTooLow);
		ensure!(self <= MAX_POW_BASE, BaseTooHigh);

		let whole = exponent.floor();
		let remain = exponent.checked_sub(whole)?;

		let n = whole.to_integer();
		ensure!(n <= U256::from(u64::MAX), Overflow);
		let whole_pow = self.power_int(n.low_u64())?;

		if remain.is_zero() {
			return Ok(whole_pow);
		}

		let partial = self.power_approx(remain, POW_PRECISION)?;
		whole_pow.multiply(partial)
	}

	fn power_approx(self, exponent: Self, precision: Self) -> Result<Self, MathError> {
		let (x, x_neg) = self.sub_sign(ONE);
		let mut term = ONE;
		let mut sum = term;
		let mut negative = false;

		// term(k) = term(k-1) * (a - (k-1)) * x / k
		for k in 1..=MAX_POW_ITERATIONS {
			if term < precision {
				return Ok(sum);
			}

			let big_k = Self::from_integer(k as u128);
			let (c, c_neg) = exponent.sub_sign(big_k.checked_sub(ONE)?);
			term = term.multiply(c.multiply(x)?)?;
			term = term.divide(big_k)?;

			if term.is_zero() {
				return Ok(sum);
			}

			if x_neg {
				negative = !negative;
			}
			if c_neg {
				negative = !negative;
			}

			sum = if negative {
				sum.checked_sub(term)?
			} else {
				sum.checked_add(term)?
			};
		}

		ensure!(term < precision, PowApproximation);
		Ok(sum)
	}
}

impl Bounded for FixedU256 {
	fn min_value() -> Self {
		Self::ZERO
	}

	fn max_value() -> Self {
		Self(U256::MAX)
	}
}

impl ToPrimitive for FixedU256 {
	fn to_i64(&self) -> Option<i64> {
		self.to_u64().and_then(|v| i64::try_from(v).ok())
	}

	fn to_u64(&self) -> Option<u64> {
		let whole = self.to_integer();
		if whole > U256::from(u64::MAX) {
			None
		} else {
			Some(whole.low_u64())
		}
	}

	fn to_f64(&self) -> Option<f64> {
		let limbs = self.0 .0;
		let raw = limbs
			.iter()
			.rev()
			.fold(0f64, |acc, limb| acc * 18_446_744_073_709_551_616f64 + *limb as f64);
		Some(raw / ONE_RAW as f64)
	}
}

impl fmt::Display for FixedU256 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (whole, frac) = self.0.div_mod(U256::from(ONE_RAW));
		write!(f, "{}.{:018}", whole, frac.low_u64())
	}
}

impl fmt::Debug for FixedU256 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "FixedU256({self})")
	}
}
