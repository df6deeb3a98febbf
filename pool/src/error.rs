// This file is part of weighted-pool.

// Copyright (C) 2020-2022  Intergalactic, Limited (GIB).
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use weighted_pool_math::MathError;

/// Category of a pool failure. Every failure aborts the whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	PreconditionViolation,
	ParameterOutOfRange,
	/// A computed amount rounded to zero.
	RoundingToZero,
	SlippageExceeded,
	RatioLimitExceeded,
	ArithmeticFailure,
	ExternalTransferFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Caller is not the pool controller.
	#[error("caller is not the pool controller")]
	NotController,

	/// Pool composition and parameters are frozen once finalized.
	#[error("pool is finalized")]
	IsFinalized,

	#[error("pool is not finalized")]
	NotFinalized,

	#[error("asset is already bound")]
	IsBound,

	#[error("asset is not bound")]
	NotBound,

	#[error("swapping is not public")]
	SwapNotPublic,

	/// Selling and buying the same asset.
	#[error("assets of a swap must differ")]
	SameAsset,

	/// Maximum number of assets has been reached.
	#[error("too many tokens")]
	MaxTokens,

	/// Pool needs more assets before it can be finalized.
	#[error("not enough tokens")]
	MinTokens,

	/// Anchor asset cannot be removed from the pool.
	#[error("anchor asset cannot be unbound")]
	AnchorProtected,

	/// Anchor asset is missing or its normalized weight is below the configured minimum.
	#[error("anchor asset weight is too low")]
	AnchorWeightTooLow,

	/// Pool is not reentrant.
	#[error("pool is locked by an operation in progress")]
	Reentrancy,

	/// Pool share balance is not sufficient.
	#[error("insufficient pool share balance")]
	InsufficientBalance,

	/// Pool share allowance is not sufficient.
	#[error("insufficient pool share allowance")]
	InsufficientAllowance,

	#[error("weight is below minimum")]
	MinWeight,

	#[error("weight is above maximum")]
	MaxWeight,

	#[error("total weight is above maximum")]
	MaxTotalWeight,

	#[error("balance is below minimum")]
	MinBalance,

	#[error("fee is below minimum")]
	MinFee,

	#[error("fee is above maximum")]
	MaxFee,

	/// Number of provided limits does not match number of bound assets.
	#[error("limits do not match pool tokens")]
	LengthMismatch,

	#[error("invalid pool configuration")]
	InvalidConfig,

	/// Share ratio of a join or exit rounded to zero.
	#[error("pool ratio is zero")]
	ZeroRatio,

	/// Computed asset or share amount rounded to zero.
	#[error("computed amount is zero")]
	ZeroAmount,

	/// Amount in is above the caller's limit.
	#[error("amount in exceeds limit")]
	LimitIn,

	/// Amount out is below the caller's limit.
	#[error("amount out is below limit")]
	LimitOut,

	/// Spot price after the trade is above the caller's limit.
	#[error("spot price exceeds limit")]
	LimitPrice,

	/// Spot price before the trade is already above the caller's limit.
	#[error("spot price is above limit before trade")]
	BadLimitPrice,

	#[error("amount in exceeds max in ratio")]
	MaxInRatio,

	#[error("amount out exceeds max out ratio")]
	MaxOutRatio,

	/// Post trade prices could not be confirmed.
	#[error("trade price check failed")]
	MathApprox,

	#[error("math error: {0:?}")]
	Math(MathError),

	/// Asset transfer reported failure.
	#[error("asset transfer failed")]
	TransferFailed,
}

impl From<MathError> for Error {
	fn from(e: MathError) -> Self {
		Error::Math(e)
	}
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		use Error::*;
		match self {
			NotController | IsFinalized | NotFinalized | IsBound | NotBound | SwapNotPublic | SameAsset | MaxTokens
			| MinTokens | AnchorProtected | AnchorWeightTooLow | Reentrancy | InsufficientBalance
			| InsufficientAllowance => ErrorKind::PreconditionViolation,
			MinWeight | MaxWeight | MaxTotalWeight | MinBalance | MinFee | MaxFee | LengthMismatch | InvalidConfig => {
				ErrorKind::ParameterOutOfRange
			}
			ZeroRatio | ZeroAmount => ErrorKind::RoundingToZero,
			LimitIn | LimitOut | LimitPrice | BadLimitPrice => ErrorKind::SlippageExceeded,
			MaxInRatio | MaxOutRatio => ErrorKind::RatioLimitExceeded,
			MathApprox | Math(_) => ErrorKind::ArithmeticFailure,
			TransferFailed => ErrorKind::ExternalTransferFailed,
		}
	}
}
