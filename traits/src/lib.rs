// This file is part of weighted-pool-traits.

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

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt::Debug;
use weighted_pool_math::types::Balance;

/// Asset movement capability consumed by a pool.
///
/// Implementations are not trusted to conform. A transfer may report failure either by returning
/// `Ok(false)` or by returning an error, callers treat both the same way.
pub trait AssetTransfer<AssetId, AccountId> {
	type Error: Debug;

	/// Move `amount` of `asset` from `from` into the pool account `pool`.
	fn pull(&mut self, asset: AssetId, from: &AccountId, pool: &AccountId, amount: Balance)
		-> Result<bool, Self::Error>;

	/// Move `amount` of `asset` out of the pool account `pool` to `to`.
	fn push(&mut self, asset: AssetId, pool: &AccountId, to: &AccountId, amount: Balance) -> Result<bool, Self::Error>;

	/// Balance of `asset` held by `holder`.
	fn balance_of(&self, asset: AssetId, holder: &AccountId) -> Balance;
}
