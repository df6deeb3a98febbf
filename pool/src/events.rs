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

use crate::types::Balance;
use codec::{Decode, Encode};
use scale_info::TypeInfo;

#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo)]
pub enum Event<AssetId, AccountId> {
	/// Asset was added to the pool.
	Bound {
		asset: AssetId,
		balance: Balance,
		denorm: Balance,
	},
	/// Balance or weight of a bound asset changed.
	Rebound {
		asset: AssetId,
		balance: Balance,
		denorm: Balance,
	},
	/// Asset was removed and its balance returned to `who`.
	Unbound {
		asset: AssetId,
		who: AccountId,
		balance: Balance,
	},
	/// Pool was finalized and the initial share supply minted to `who`.
	Finalized { who: AccountId, supply: Balance },
	SwapFeeUpdated { fee: Balance },
	PublicSwapUpdated { public: bool },
	ControllerUpdated { controller: AccountId },
	/// Trade executed.
	Swapped {
		who: AccountId,
		asset_in: AssetId,
		asset_out: AssetId,
		amount_in: Balance,
		amount_out: Balance,
	},
	/// Asset deposited as part of a join. Emitted once per deposited asset.
	Joined {
		who: AccountId,
		asset: AssetId,
		amount: Balance,
	},
	/// Asset withdrawn as part of an exit. Emitted once per withdrawn asset.
	Exited {
		who: AccountId,
		asset: AssetId,
		amount: Balance,
	},
	/// Recorded balance was synced with the pool account balance.
	Gulped { asset: AssetId, balance: Balance },
	/// Pool shares moved. `None` stands for minting or burning.
	Transfer {
		from: Option<AccountId>,
		to: Option<AccountId>,
		amount: Balance,
	},
	Approval {
		owner: AccountId,
		spender: AccountId,
		amount: Balance,
	},
}
