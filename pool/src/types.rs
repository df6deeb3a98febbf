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

use crate::Error;
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use weighted_pool_math::types::*;

/// Bookkeeping of a single bound asset.
#[derive(Debug, Encode, Decode, Copy, Clone, PartialEq, Eq, Default, TypeInfo, Serialize, Deserialize)]
pub struct TokenRecord {
	pub bound: bool,
	/// Position in `PoolState::tokens`.
	pub index: u32,
	pub denorm: Balance,
	pub balance: Balance,
}

/// Mutable composition and parameters of a pool.
#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo, Serialize, Deserialize)]
pub struct PoolState<AssetId: Ord, AccountId> {
	pub controller: AccountId,
	/// Bound assets in iteration order.
	pub tokens: Vec<AssetId>,
	pub records: BTreeMap<AssetId, TokenRecord>,
	pub total_weight: Balance,
	pub swap_fee: Balance,
	pub finalized: bool,
	pub public_swap: bool,
}

impl<AssetId: Ord + Copy, AccountId> PoolState<AssetId, AccountId> {
	pub fn new(controller: AccountId) -> Self {
		Self {
			controller,
			tokens: Vec::new(),
			records: BTreeMap::new(),
			total_weight: Balance::ZERO,
			swap_fee: MIN_FEE,
			finalized: false,
			public_swap: false,
		}
	}

	pub fn is_bound(&self, asset: &AssetId) -> bool {
		self.records.get(asset).map(|r| r.bound).unwrap_or(false)
	}

	pub(crate) fn record(&self, asset: &AssetId) -> Result<TokenRecord, Error> {
		self.records.get(asset).copied().filter(|r| r.bound).ok_or(Error::NotBound)
	}

	pub(crate) fn record_mut(&mut self, asset: &AssetId) -> Result<&mut TokenRecord, Error> {
		self.records.get_mut(asset).filter(|r| r.bound).ok_or(Error::NotBound)
	}

	/// Removes `asset` by moving the last token into its slot.
	pub(crate) fn remove_token(&mut self, asset: &AssetId) -> Result<TokenRecord, Error> {
		let record = self.record(asset)?;
		let index = record.index as usize;
		ensure!(self.tokens.get(index) == Some(asset), Error::NotBound);

		self.tokens.swap_remove(index);
		if let Some(moved) = self.tokens.get(index).copied() {
			self.record_mut(&moved)?.index = record.index;
		}
		self.records.remove(asset);
		Ok(record)
	}
}

/// Runtime parameters of a pool.
#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo, Serialize, Deserialize)]
pub struct PoolConfig<AssetId, AccountId> {
	/// Asset which cannot be unbound and has to keep `min_anchor_weight` of the pool at finalization.
	pub anchor: Option<AssetId>,
	pub min_anchor_weight: Balance,
	/// Fraction of redeemed pool shares sent to `fee_sink` on exit.
	pub exit_fee: Balance,
	pub fee_sink: AccountId,
	pub max_in_ratio: Balance,
	pub max_out_ratio: Balance,
	/// Pool shares minted to the controller on finalization.
	pub initial_supply: Balance,
}

impl<AssetId, AccountId> PoolConfig<AssetId, AccountId> {
	pub fn new(fee_sink: AccountId) -> Self {
		Self {
			anchor: None,
			min_anchor_weight: Balance::ZERO,
			exit_fee: Balance::ZERO,
			fee_sink,
			max_in_ratio: MAX_IN_RATIO,
			max_out_ratio: MAX_OUT_RATIO,
			initial_supply: INIT_POOL_SUPPLY,
		}
	}

	pub fn with_anchor(mut self, asset: AssetId, min_weight: Balance) -> Self {
		self.anchor = Some(asset);
		self.min_anchor_weight = min_weight;
		self
	}

	pub fn with_exit_fee(mut self, exit_fee: Balance) -> Self {
		self.exit_fee = exit_fee;
		self
	}

	pub fn with_ratio_limits(mut self, max_in_ratio: Balance, max_out_ratio: Balance) -> Self {
		self.max_in_ratio = max_in_ratio;
		self.max_out_ratio = max_out_ratio;
		self
	}

	pub fn validate(&self) -> Result<(), Error> {
		ensure!(
			!self.max_in_ratio.is_zero() && self.max_in_ratio <= ONE,
			Error::InvalidConfig
		);
		ensure!(
			!self.max_out_ratio.is_zero() && self.max_out_ratio <= ONE,
			Error::InvalidConfig
		);
		ensure!(self.exit_fee < ONE, Error::InvalidConfig);
		ensure!(self.min_anchor_weight <= ONE, Error::InvalidConfig);
		ensure!(!self.initial_supply.is_zero(), Error::InvalidConfig);
		Ok(())
	}
}

/// Asset movement executed by a pool operation, kept until the operation commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Movement<AssetId, AccountId> {
	Pulled {
		asset: AssetId,
		from: AccountId,
		amount: Balance,
	},
	Pushed {
		asset: AssetId,
		to: AccountId,
		amount: Balance,
	},
}
