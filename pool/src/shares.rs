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

//! Pool share ledger.
//!
//! Fungible share bookkeeping with allowances. An allowance of [`INFINITE`] is never decremented.

use crate::types::{Balance, INFINITE};
use crate::Error;
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DECIMALS: u8 = 18;

/// Previous value of a ledger entry overwritten by the operation in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Undo<AccountId> {
	Balance(AccountId, Balance),
	Allowance(AccountId, AccountId, Balance),
	TotalSupply(Balance),
}

#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo, Serialize, Deserialize)]
pub struct PoolShares<AccountId: Ord> {
	balances: BTreeMap<AccountId, Balance>,
	allowances: BTreeMap<(AccountId, AccountId), Balance>,
	total_supply: Balance,
	/// Entries changed since the last `commit`, oldest first.
	#[codec(skip)]
	#[serde(skip)]
	journal: Vec<Undo<AccountId>>,
}

impl<AccountId: Ord> Default for PoolShares<AccountId> {
	fn default() -> Self {
		Self {
			balances: BTreeMap::new(),
			allowances: BTreeMap::new(),
			total_supply: Balance::ZERO,
			journal: Vec::new(),
		}
	}
}

impl<AccountId: Ord + Clone> PoolShares<AccountId> {
	pub fn total_supply(&self) -> Balance {
		self.total_supply
	}

	pub fn balance_of(&self, who: &AccountId) -> Balance {
		self.balances.get(who).copied().unwrap_or_default()
	}

	pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Balance {
		self.allowances
			.get(&(owner.clone(), spender.clone()))
			.copied()
			.unwrap_or_default()
	}

	/// Iterates over all non-zero holders.
	pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &Balance)> {
		self.balances.iter()
	}

	pub(crate) fn mint(&mut self, to: &AccountId, amount: Balance) -> Result<(), Error> {
		let new_supply = self.total_supply.checked_add(amount)?;
		let new_balance = self.balance_of(to).checked_add(amount)?;
		self.set_balance(to, new_balance);
		self.set_total_supply(new_supply);
		Ok(())
	}

	pub(crate) fn burn(&mut self, from: &AccountId, amount: Balance) -> Result<(), Error> {
		let new_balance = self
			.balance_of(from)
			.checked_sub(amount)
			.map_err(|_| Error::InsufficientBalance)?;
		let new_supply = self.total_supply.checked_sub(amount)?;
		self.set_balance(from, new_balance);
		self.set_total_supply(new_supply);
		Ok(())
	}

	/// Moves `amount` from `from` to `to`. Moving to self only checks the balance.
	pub(crate) fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Balance) -> Result<(), Error> {
		let from_balance = self
			.balance_of(from)
			.checked_sub(amount)
			.map_err(|_| Error::InsufficientBalance)?;
		if from == to {
			return Ok(());
		}
		let to_balance = self.balance_of(to).checked_add(amount)?;
		self.set_balance(from, from_balance);
		self.set_balance(to, to_balance);
		Ok(())
	}

	/// Moves `amount` on behalf of `from`, spending `spender`'s allowance unless `spender` is `from`.
	pub(crate) fn transfer_from(
		&mut self,
		spender: &AccountId,
		from: &AccountId,
		to: &AccountId,
		amount: Balance,
	) -> Result<(), Error> {
		let allowance = self.allowance(from, spender);
		let spends_allowance = spender != from;
		if spends_allowance {
			ensure!(amount <= allowance, Error::InsufficientAllowance);
		}

		self.transfer(from, to, amount)?;

		if spends_allowance && allowance != INFINITE {
			self.set_allowance(from, spender, allowance.checked_sub(amount)?);
		}
		Ok(())
	}

	pub(crate) fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Balance) {
		self.set_allowance(owner, spender, amount);
	}

	/// Returns the new allowance.
	pub(crate) fn increase_approval(&mut self, owner: &AccountId, spender: &AccountId, amount: Balance) -> Result<Balance, Error> {
		let allowance = self.allowance(owner, spender).checked_add(amount)?;
		self.set_allowance(owner, spender, allowance);
		Ok(allowance)
	}

	/// Returns the new allowance, clamped at zero.
	pub(crate) fn decrease_approval(&mut self, owner: &AccountId, spender: &AccountId, amount: Balance) -> Balance {
		let allowance = self.allowance(owner, spender).saturating_sub(amount);
		self.set_allowance(owner, spender, allowance);
		allowance
	}

	/// Forgets the recorded changes, keeping the current ledger.
	pub(crate) fn commit(&mut self) {
		self.journal.clear();
	}

	/// Restores every entry changed since the last `commit`.
	pub(crate) fn rollback(&mut self) {
		while let Some(undo) = self.journal.pop() {
			match undo {
				Undo::Balance(who, amount) => self.write_balance(&who, amount),
				Undo::Allowance(owner, spender, amount) => self.write_allowance(&owner, &spender, amount),
				Undo::TotalSupply(amount) => self.total_supply = amount,
			}
		}
	}

	fn set_total_supply(&mut self, amount: Balance) {
		self.journal.push(Undo::TotalSupply(self.total_supply));
		self.total_supply = amount;
	}

	fn set_balance(&mut self, who: &AccountId, amount: Balance) {
		self.journal.push(Undo::Balance(who.clone(), self.balance_of(who)));
		self.write_balance(who, amount);
	}

	fn set_allowance(&mut self, owner: &AccountId, spender: &AccountId, amount: Balance) {
		self.journal
			.push(Undo::Allowance(owner.clone(), spender.clone(), self.allowance(owner, spender)));
		self.write_allowance(owner, spender, amount);
	}

	fn write_balance(&mut self, who: &AccountId, amount: Balance) {
		if amount.is_zero() {
			self.balances.remove(who);
		} else {
			self.balances.insert(who.clone(), amount);
		}
	}

	fn write_allowance(&mut self, owner: &AccountId, spender: &AccountId, amount: Balance) {
		let key = (owner.clone(), spender.clone());
		if amount.is_zero() {
			self.allowances.remove(&key);
		} else {
			self.allowances.insert(key, amount);
		}
	}
}
