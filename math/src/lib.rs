//! # Weighted Pool Math
//!
//! Deterministic 18-decimal fixed point arithmetic and the weighted constant-value
//! bonding curve used by multi-asset weighted pools.
//!
//! Everything in this crate is pure. Pool state lives elsewhere.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(not(feature = "std"), test))]
extern crate std;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod fixed;
#[cfg(test)]
pub mod test_utils;
pub mod types;
pub mod weighted;

pub use fixed::FixedU256;
pub use primitive_types::U256;

#[macro_export]
macro_rules! ensure {
	($e:expr, $f:expr) => {
		match $e {
			true => (),
			false => {
				return Err($f);
			}
		}
	};
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum MathError {
	Overflow,
	Underflow,
	DivisionByZero,
	BaseTooLow,
	BaseTooHigh,
	/// The fractional power series did not reach the requested precision.
	PowApproximation,
}
