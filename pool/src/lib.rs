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

//! # Weighted Pool
//!
//! Multi-asset weighted constant-value pool.
//!
//! ## Overview
//!
//! A pool holds up to `MAX_ASSETS` assets, each with its own denormalized weight. Prices follow the
//! weighted product invariant implemented in `weighted-pool-math`.
//!
//! A pool starts empty and unfinalized. The controller binds assets one by one, adjusts balances and
//! weights with `rebind`, may remove assets with `unbind` and sets the swap fee. `finalize` freezes the
//! composition, mints the initial pool share supply to the controller and opens swapping to everyone.
//!
//! Once finalized, anyone can
//! - swap with exact amount in or exact amount out,
//! - join or exit proportionally with all assets,
//! - join or exit with a single asset.
//!
//! ### Terminology
//!
//! * **Controller** - account allowed to change pool composition and parameters.
//! * **Pool share** - fungible token representing proportional ownership of all pooled assets.
//! * **Anchor** - configured asset which cannot be unbound and has to keep a minimum weight.
//! * **Exit fee** - fraction of redeemed pool shares sent to the fee sink.
//!
//! ## Assumptions
//!
//! Every mutating operation is all-or-nothing. Recorded balances, the share ledger and events are
//! restored on failure and asset transfers already executed by the failing operation are reverted.
//!
//! `Pool` methods take `&mut self`. Use [`SharedPool`] to share a pool between threads; it rejects
//! reentrant calls made from asset transfer callbacks.
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate weighted_pool_math;

pub mod error;
pub mod events;
pub mod shared;
pub mod shares;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};
pub use events::Event;
pub use shared::SharedPool;
pub use shares::{PoolShares, DECIMALS};
pub use types::{Balance, PoolConfig, PoolState, TokenRecord};

use core::fmt::Debug;
use types::*;
use weighted_pool_math::weighted;
use weighted_pool_traits::AssetTransfer;

pub const LOG_TARGET: &str = "weighted-pool";

pub trait Config {
	type AccountId: Clone + Ord + Debug;

	type AssetId: Copy + Ord + Debug;

	/// Moves pooled assets between accounts and the pool account.
	type Currency: AssetTransfer<Self::AssetId, Self::AccountId>;
}

pub type EventOf<T> = Event<<T as Config>::AssetId, <T as Config>::AccountId>;
pub type PoolConfigOf<T> = PoolConfig<<T as Config>::AssetId, <T as Config>::AccountId>;
pub type PoolStateOf<T> = PoolState<<T as Config>::AssetId, <T as Config>::AccountId>;

pub struct Pool<T: Config> {
	account: T::AccountId,
	config: PoolConfigOf<T>,
	state: PoolStateOf<T>,
	shares: PoolShares<T::AccountId>,
	currency: T::Currency,
	events: Vec<EventOf<T>>,
	journal: Vec<Movement<T::AssetId, T::AccountId>>,
}

impl<T: Config> Pool<T> {
	/// Creates an empty pool held by `account` and controlled by `controller`.
	pub fn new(
		account: T::AccountId,
		controller: T::AccountId,
		config: PoolConfigOf<T>,
		currency: T::Currency,
	) -> Result<Self, Error> {
		config.validate()?;

		log::debug!(target: LOG_TARGET, "pool {:?} created, controller {:?}", account, controller);

		Ok(Self {
			account,
			config,
			state: PoolState::new(controller),
			shares: PoolShares::default(),
			currency,
			events: Vec::new(),
			journal: Vec::new(),
		})
	}

	// ----- Controller operations

	pub fn set_swap_fee(&mut self, who: &T::AccountId, swap_fee: Balance) -> Result<(), Error> {
		self.with_transaction(|pool| {
			ensure!(!pool.state.finalized, Error::IsFinalized);
			pool.ensure_controller(who)?;
			ensure!(swap_fee >= MIN_FEE, Error::MinFee);
			ensure!(swap_fee <= MAX_FEE, Error::MaxFee);

			pool.state.swap_fee = swap_fee;
			pool.deposit_event(Event::SwapFeeUpdated { fee: swap_fee });
			Ok(())
		})
	}

	pub fn set_controller(&mut self, who: &T::AccountId, controller: T::AccountId) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.ensure_controller(who)?;

			pool.state.controller = controller.clone();
			pool.deposit_event(Event::ControllerUpdated { controller });
			Ok(())
		})
	}

	pub fn set_public_swap(&mut self, who: &T::AccountId, public: bool) -> Result<(), Error> {
		self.with_transaction(|pool| {
			ensure!(!pool.state.finalized, Error::IsFinalized);
			pool.ensure_controller(who)?;

			pool.state.public_swap = public;
			pool.deposit_event(Event::PublicSwapUpdated { public });
			Ok(())
		})
	}

	/// Freezes pool composition, mints the initial share supply to the controller and enables swaps.
	pub fn finalize(&mut self, who: &T::AccountId) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.ensure_controller(who)?;
			ensure!(!pool.state.finalized, Error::IsFinalized);
			ensure!(pool.state.tokens.len() >= MIN_ASSETS, Error::MinTokens);

			if let Some(anchor) = pool.config.anchor {
				ensure!(pool.state.is_bound(&anchor), Error::AnchorWeightTooLow);
			}
			pool.ensure_anchor_weight()?;

			pool.state.finalized = true;
			pool.state.public_swap = true;

			let supply = pool.config.initial_supply;
			pool.mint_pool_share(supply)?;
			pool.push_pool_share(who, supply)?;

			log::debug!(target: LOG_TARGET, "pool {:?} finalized with {:?} tokens", pool.account, pool.state.tokens);

			pool.deposit_event(Event::Finalized {
				who: who.clone(),
				supply,
			});
			Ok(())
		})
	}

	/// Adds `asset` to the pool, pulling `balance` of it from the controller.
	pub fn bind(&mut self, who: &T::AccountId, asset: T::AssetId, balance: Balance, denorm: Balance) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.ensure_controller(who)?;
			ensure!(!pool.state.is_bound(&asset), Error::IsBound);
			ensure!(!pool.state.finalized, Error::IsFinalized);
			ensure!(pool.state.tokens.len() < MAX_ASSETS, Error::MaxTokens);

			pool.state.records.insert(
				asset,
				TokenRecord {
					bound: true,
					index: pool.state.tokens.len() as u32,
					denorm: Balance::ZERO,
					balance: Balance::ZERO,
				},
			);
			pool.state.tokens.push(asset);

			pool.do_rebind(who, asset, balance, denorm)?;

			log::debug!(target: LOG_TARGET, "bound {:?}, balance {:?}, weight {:?}", asset, balance, denorm);

			pool.deposit_event(Event::Bound { asset, balance, denorm });
			Ok(())
		})
	}

	/// Sets balance and weight of a bound asset. The exact balance difference is pulled from or pushed to
	/// the controller.
	pub fn rebind(&mut self, who: &T::AccountId, asset: T::AssetId, balance: Balance, denorm: Balance) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.ensure_controller(who)?;
			pool.state.record(&asset)?;
			ensure!(!pool.state.finalized, Error::IsFinalized);

			pool.do_rebind(who, asset, balance, denorm)?;

			log::debug!(target: LOG_TARGET, "rebound {:?}, balance {:?}, weight {:?}", asset, balance, denorm);

			pool.deposit_event(Event::Rebound { asset, balance, denorm });
			Ok(())
		})
	}

	/// Removes `asset` from the pool and returns its whole balance to the controller.
	///
	/// The last asset takes the slot of the removed one.
	pub fn unbind(&mut self, who: &T::AccountId, asset: T::AssetId) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			pool.ensure_controller(who)?;
			pool.state.record(&asset)?;
			ensure!(!pool.state.finalized, Error::IsFinalized);
			ensure!(pool.config.anchor != Some(asset), Error::AnchorProtected);

			let record = pool.state.remove_token(&asset)?;
			pool.state.total_weight = pool.state.total_weight.checked_sub(record.denorm)?;
			pool.ensure_anchor_weight()?;

			pool.push_underlying(asset, who, record.balance)?;

			log::debug!(target: LOG_TARGET, "unbound {:?}, returned {:?}", asset, record.balance);

			pool.deposit_event(Event::Unbound {
				asset,
				who: who.clone(),
				balance: record.balance,
			});
			Ok(record.balance)
		})
	}

	/// Syncs the recorded balance of `asset` with the balance of the pool account.
	pub fn gulp(&mut self, asset: T::AssetId) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			pool.state.record(&asset)?;

			let balance = pool.currency.balance_of(asset, &pool.account);
			pool.state.record_mut(&asset)?.balance = balance;

			pool.deposit_event(Event::Gulped { asset, balance });
			Ok(balance)
		})
	}

	// ----- Trades

	/// Sells exact `amount_in` of `asset_in`.
	///
	/// Returns amount of `asset_out` received and spot price after the trade.
	pub fn swap_exact_amount_in(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		amount_in: Balance,
		asset_out: T::AssetId,
		min_amount_out: Balance,
		max_price: Balance,
	) -> Result<(Balance, Balance), Error> {
		self.with_transaction(|pool| {
			ensure!(asset_in != asset_out, Error::SameAsset);
			let record_in = pool.state.record(&asset_in)?;
			let record_out = pool.state.record(&asset_out)?;
			ensure!(pool.state.public_swap, Error::SwapNotPublic);

			ensure!(
				amount_in <= record_in.balance.multiply(pool.config.max_in_ratio)?,
				Error::MaxInRatio
			);

			let swap_fee = pool.state.swap_fee;
			let spot_price_before = weighted::calculate_spot_price(
				record_in.balance,
				record_in.denorm,
				record_out.balance,
				record_out.denorm,
				swap_fee,
			)?;
			ensure!(spot_price_before <= max_price, Error::BadLimitPrice);

			let amount_out = weighted::calculate_out_given_in(
				record_in.balance,
				record_in.denorm,
				record_out.balance,
				record_out.denorm,
				amount_in,
				swap_fee,
			)?;
			ensure!(!amount_out.is_zero(), Error::ZeroAmount);
			ensure!(amount_out >= min_amount_out, Error::LimitOut);

			let spot_price_after = pool.settle_swap(
				(asset_in, record_in),
				(asset_out, record_out),
				amount_in,
				amount_out,
				spot_price_before,
				max_price,
			)?;

			pool.pull_underlying(asset_in, who, amount_in)?;
			pool.push_underlying(asset_out, who, amount_out)?;

			pool.deposit_swapped(who, asset_in, asset_out, amount_in, amount_out);
			Ok((amount_out, spot_price_after))
		})
	}

	/// Buys exact `amount_out` of `asset_out`.
	///
	/// Returns amount of `asset_in` paid and spot price after the trade.
	pub fn swap_exact_amount_out(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		max_amount_in: Balance,
		asset_out: T::AssetId,
		amount_out: Balance,
		max_price: Balance,
	) -> Result<(Balance, Balance), Error> {
		self.with_transaction(|pool| {
			ensure!(asset_in != asset_out, Error::SameAsset);
			let record_in = pool.state.record(&asset_in)?;
			let record_out = pool.state.record(&asset_out)?;
			ensure!(pool.state.public_swap, Error::SwapNotPublic);

			ensure!(
				amount_out <= record_out.balance.multiply(pool.config.max_out_ratio)?,
				Error::MaxOutRatio
			);

			let swap_fee = pool.state.swap_fee;
			let spot_price_before = weighted::calculate_spot_price(
				record_in.balance,
				record_in.denorm,
				record_out.balance,
				record_out.denorm,
				swap_fee,
			)?;
			ensure!(spot_price_before <= max_price, Error::BadLimitPrice);

			let amount_in = weighted::calculate_in_given_out(
				record_in.balance,
				record_in.denorm,
				record_out.balance,
				record_out.denorm,
				amount_out,
				swap_fee,
			)?;
			ensure!(!amount_in.is_zero(), Error::ZeroAmount);
			ensure!(amount_in <= max_amount_in, Error::LimitIn);

			let spot_price_after = pool.settle_swap(
				(asset_in, record_in),
				(asset_out, record_out),
				amount_in,
				amount_out,
				spot_price_before,
				max_price,
			)?;

			pool.pull_underlying(asset_in, who, amount_in)?;
			pool.push_underlying(asset_out, who, amount_out)?;

			pool.deposit_swapped(who, asset_in, asset_out, amount_in, amount_out);
			Ok((amount_in, spot_price_after))
		})
	}

	// ----- Liquidity

	/// Mints exactly `pool_amount_out` shares for a proportional deposit of every bound asset.
	///
	/// `max_amounts_in` follows the order of [`Self::current_tokens`]. Deposits are rounded up.
	/// Returns deposited amounts in the same order.
	pub fn join_pool(
		&mut self,
		who: &T::AccountId,
		pool_amount_out: Balance,
		max_amounts_in: &[Balance],
	) -> Result<Vec<Balance>, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			ensure!(max_amounts_in.len() == pool.state.tokens.len(), Error::LengthMismatch);

			let pool_total = pool.shares.total_supply();
			let ratio = pool_amount_out.divide_up(pool_total)?;
			ensure!(!ratio.is_zero(), Error::ZeroRatio);

			let tokens = pool.state.tokens.clone();
			let mut amounts = Vec::with_capacity(tokens.len());
			for (asset, max_amount_in) in tokens.iter().zip(max_amounts_in) {
				let record = pool.state.record(asset)?;
				let amount_in = ratio.multiply_up(record.balance)?;
				ensure!(!amount_in.is_zero(), Error::ZeroAmount);
				ensure!(amount_in <= *max_amount_in, Error::LimitIn);

				pool.state.record_mut(asset)?.balance = record.balance.checked_add(amount_in)?;
				amounts.push(amount_in);
			}

			pool.mint_pool_share(pool_amount_out)?;
			pool.push_pool_share(who, pool_amount_out)?;

			for (asset, amount_in) in tokens.iter().zip(&amounts) {
				pool.pull_underlying(*asset, who, *amount_in)?;
				pool.deposit_event(Event::Joined {
					who: who.clone(),
					asset: *asset,
					amount: *amount_in,
				});
			}

			log::debug!(target: LOG_TARGET, "{:?} joined with {:?} shares, deposited {:?}", who, pool_amount_out, amounts);

			Ok(amounts)
		})
	}

	/// Redeems `pool_amount_in` shares for a proportional withdrawal of every bound asset.
	///
	/// The exit fee part of the shares goes to the fee sink, the rest is burned. `min_amounts_out` follows
	/// the order of [`Self::current_tokens`]. Withdrawals are rounded down. Returns withdrawn amounts in the
	/// same order.
	pub fn exit_pool(
		&mut self,
		who: &T::AccountId,
		pool_amount_in: Balance,
		min_amounts_out: &[Balance],
	) -> Result<Vec<Balance>, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			ensure!(min_amounts_out.len() == pool.state.tokens.len(), Error::LengthMismatch);

			let pool_total = pool.shares.total_supply();
			let exit_fee = pool_amount_in.multiply(pool.config.exit_fee)?;
			let pool_amount_in_after_exit_fee = pool_amount_in.checked_sub(exit_fee)?;
			let ratio = pool_amount_in_after_exit_fee.divide_down(pool_total)?;
			ensure!(!ratio.is_zero(), Error::ZeroRatio);

			let tokens = pool.state.tokens.clone();
			let mut amounts = Vec::with_capacity(tokens.len());
			for (asset, min_amount_out) in tokens.iter().zip(min_amounts_out) {
				let record = pool.state.record(asset)?;
				let amount_out = ratio.multiply(record.balance)?;
				ensure!(!amount_out.is_zero(), Error::ZeroAmount);
				ensure!(amount_out >= *min_amount_out, Error::LimitOut);

				pool.state.record_mut(asset)?.balance = record.balance.checked_sub(amount_out)?;
				amounts.push(amount_out);
			}

			pool.settle_exit_shares(who, pool_amount_in, exit_fee)?;

			for (asset, amount_out) in tokens.iter().zip(&amounts) {
				pool.push_underlying(*asset, who, *amount_out)?;
				pool.deposit_event(Event::Exited {
					who: who.clone(),
					asset: *asset,
					amount: *amount_out,
				});
			}

			log::debug!(target: LOG_TARGET, "{:?} exited with {:?} shares, withdrew {:?}", who, pool_amount_in, amounts);

			Ok(amounts)
		})
	}

	/// Deposits exact `amount_in` of a single asset. Returns minted pool shares.
	pub fn join_swap_extern_amount_in(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		amount_in: Balance,
		min_pool_amount_out: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			let record = pool.state.record(&asset_in)?;
			ensure!(
				amount_in <= record.balance.multiply(pool.config.max_in_ratio)?,
				Error::MaxInRatio
			);

			let pool_amount_out = weighted::calculate_pool_out_given_single_in(
				record.balance,
				record.denorm,
				pool.shares.total_supply(),
				pool.state.total_weight,
				amount_in,
				pool.state.swap_fee,
			)?;
			ensure!(!pool_amount_out.is_zero(), Error::ZeroAmount);
			ensure!(pool_amount_out >= min_pool_amount_out, Error::LimitOut);

			pool.settle_single_join(who, asset_in, record, amount_in, pool_amount_out)?;
			Ok(pool_amount_out)
		})
	}

	/// Mints exact `pool_amount_out` shares for a deposit of a single asset. Returns deposited amount.
	pub fn join_swap_pool_amount_out(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		pool_amount_out: Balance,
		max_amount_in: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			let record = pool.state.record(&asset_in)?;

			let amount_in = weighted::calculate_single_in_given_pool_out(
				record.balance,
				record.denorm,
				pool.shares.total_supply(),
				pool.state.total_weight,
				pool_amount_out,
				pool.state.swap_fee,
			)?;
			ensure!(!amount_in.is_zero(), Error::ZeroAmount);
			ensure!(amount_in <= max_amount_in, Error::LimitIn);
			ensure!(
				amount_in <= record.balance.multiply(pool.config.max_in_ratio)?,
				Error::MaxInRatio
			);

			pool.settle_single_join(who, asset_in, record, amount_in, pool_amount_out)?;
			Ok(amount_in)
		})
	}

	/// Redeems exact `pool_amount_in` shares for a single asset. Returns withdrawn amount.
	pub fn exit_swap_pool_amount_in(
		&mut self,
		who: &T::AccountId,
		asset_out: T::AssetId,
		pool_amount_in: Balance,
		min_amount_out: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			let record = pool.state.record(&asset_out)?;

			let amount_out = weighted::calculate_single_out_given_pool_in(
				record.balance,
				record.denorm,
				pool.shares.total_supply(),
				pool.state.total_weight,
				pool_amount_in,
				pool.state.swap_fee,
				pool.config.exit_fee,
			)?;
			ensure!(!amount_out.is_zero(), Error::ZeroAmount);
			ensure!(amount_out >= min_amount_out, Error::LimitOut);
			ensure!(
				amount_out <= record.balance.multiply(pool.config.max_out_ratio)?,
				Error::MaxOutRatio
			);

			pool.settle_single_exit(who, asset_out, record, amount_out, pool_amount_in)?;
			Ok(amount_out)
		})
	}

	/// Withdraws exact `amount_out` of a single asset. Returns redeemed pool shares.
	pub fn exit_swap_extern_amount_out(
		&mut self,
		who: &T::AccountId,
		asset_out: T::AssetId,
		amount_out: Balance,
		max_pool_amount_in: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			ensure!(pool.state.finalized, Error::NotFinalized);
			let record = pool.state.record(&asset_out)?;
			ensure!(
				amount_out <= record.balance.multiply(pool.config.max_out_ratio)?,
				Error::MaxOutRatio
			);

			let pool_amount_in = weighted::calculate_pool_in_given_single_out(
				record.balance,
				record.denorm,
				pool.shares.total_supply(),
				pool.state.total_weight,
				amount_out,
				pool.state.swap_fee,
				pool.config.exit_fee,
			)?;
			ensure!(!pool_amount_in.is_zero(), Error::ZeroAmount);
			ensure!(pool_amount_in <= max_pool_amount_in, Error::LimitIn);

			pool.settle_single_exit(who, asset_out, record, amount_out, pool_amount_in)?;
			Ok(pool_amount_in)
		})
	}

	// ----- Pool shares

	pub fn total_supply(&self) -> Balance {
		self.shares.total_supply()
	}

	pub fn balance_of(&self, who: &T::AccountId) -> Balance {
		self.shares.balance_of(who)
	}

	pub fn allowance(&self, owner: &T::AccountId, spender: &T::AccountId) -> Balance {
		self.shares.allowance(owner, spender)
	}

	pub fn transfer(&mut self, who: &T::AccountId, to: &T::AccountId, amount: Balance) -> Result<(), Error> {
		self.with_transaction(|pool| pool.move_pool_share(who, to, amount))
	}

	pub fn transfer_from(
		&mut self,
		spender: &T::AccountId,
		from: &T::AccountId,
		to: &T::AccountId,
		amount: Balance,
	) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.shares.transfer_from(spender, from, to, amount)?;
			pool.deposit_event(Event::Transfer {
				from: Some(from.clone()),
				to: Some(to.clone()),
				amount,
			});
			Ok(())
		})
	}

	pub fn approve(&mut self, owner: &T::AccountId, spender: &T::AccountId, amount: Balance) -> Result<(), Error> {
		self.with_transaction(|pool| {
			pool.shares.approve(owner, spender, amount);
			pool.deposit_approval(owner, spender, amount);
			Ok(())
		})
	}

	pub fn increase_approval(
		&mut self,
		owner: &T::AccountId,
		spender: &T::AccountId,
		amount: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			let allowance = pool.shares.increase_approval(owner, spender, amount)?;
			pool.deposit_approval(owner, spender, allowance);
			Ok(allowance)
		})
	}

	/// Decreasing below zero clamps the allowance to zero.
	pub fn decrease_approval(
		&mut self,
		owner: &T::AccountId,
		spender: &T::AccountId,
		amount: Balance,
	) -> Result<Balance, Error> {
		self.with_transaction(|pool| {
			let allowance = pool.shares.decrease_approval(owner, spender, amount);
			pool.deposit_approval(owner, spender, allowance);
			Ok(allowance)
		})
	}

	// ----- Queries

	pub fn account(&self) -> &T::AccountId {
		&self.account
	}

	pub fn controller(&self) -> &T::AccountId {
		&self.state.controller
	}

	pub fn config(&self) -> &PoolConfigOf<T> {
		&self.config
	}

	pub fn state(&self) -> &PoolStateOf<T> {
		&self.state
	}

	pub fn shares(&self) -> &PoolShares<T::AccountId> {
		&self.shares
	}

	pub fn is_public_swap(&self) -> bool {
		self.state.public_swap
	}

	pub fn is_finalized(&self) -> bool {
		self.state.finalized
	}

	pub fn is_bound(&self, asset: T::AssetId) -> bool {
		self.state.is_bound(&asset)
	}

	pub fn num_tokens(&self) -> usize {
		self.state.tokens.len()
	}

	/// Bound assets in iteration order.
	pub fn current_tokens(&self) -> &[T::AssetId] {
		&self.state.tokens
	}

	pub fn final_tokens(&self) -> Result<&[T::AssetId], Error> {
		ensure!(self.state.finalized, Error::NotFinalized);
		Ok(&self.state.tokens)
	}

	pub fn record(&self, asset: T::AssetId) -> Option<TokenRecord> {
		self.state.records.get(&asset).copied()
	}

	pub fn balance(&self, asset: T::AssetId) -> Result<Balance, Error> {
		Ok(self.state.record(&asset)?.balance)
	}

	pub fn denormalized_weight(&self, asset: T::AssetId) -> Result<Balance, Error> {
		Ok(self.state.record(&asset)?.denorm)
	}

	pub fn normalized_weight(&self, asset: T::AssetId) -> Result<Balance, Error> {
		let record = self.state.record(&asset)?;
		Ok(weighted::calculate_normalized_weight(
			record.denorm,
			self.state.total_weight,
		)?)
	}

	pub fn total_denormalized_weight(&self) -> Balance {
		self.state.total_weight
	}

	pub fn swap_fee(&self) -> Balance {
		self.state.swap_fee
	}

	/// Spot price of `asset_out` denominated in `asset_in`, swap fee included.
	pub fn spot_price(&self, asset_in: T::AssetId, asset_out: T::AssetId) -> Result<Balance, Error> {
		self.calculate_spot_price(asset_in, asset_out, self.state.swap_fee)
	}

	pub fn spot_price_sans_fee(&self, asset_in: T::AssetId, asset_out: T::AssetId) -> Result<Balance, Error> {
		self.calculate_spot_price(asset_in, asset_out, Balance::ZERO)
	}

	pub fn events(&self) -> &[EventOf<T>] {
		&self.events
	}

	pub fn take_events(&mut self) -> Vec<EventOf<T>> {
		core::mem::take(&mut self.events)
	}

	// ----- Internals

	fn calculate_spot_price(&self, asset_in: T::AssetId, asset_out: T::AssetId, fee: Balance) -> Result<Balance, Error> {
		let record_in = self.state.record(&asset_in)?;
		let record_out = self.state.record(&asset_out)?;
		Ok(weighted::calculate_spot_price(
			record_in.balance,
			record_in.denorm,
			record_out.balance,
			record_out.denorm,
			fee,
		)?)
	}

	fn ensure_controller(&self, who: &T::AccountId) -> Result<(), Error> {
		ensure!(*who == self.state.controller, Error::NotController);
		Ok(())
	}

	/// A bound anchor has to keep at least `min_anchor_weight` of the total weight.
	fn ensure_anchor_weight(&self) -> Result<(), Error> {
		let Some(anchor) = self.config.anchor else {
			return Ok(());
		};
		let Ok(record) = self.state.record(&anchor) else {
			return Ok(());
		};
		let normalized = weighted::calculate_normalized_weight(record.denorm, self.state.total_weight)?;
		ensure!(normalized >= self.config.min_anchor_weight, Error::AnchorWeightTooLow);
		Ok(())
	}

	fn do_rebind(&mut self, who: &T::AccountId, asset: T::AssetId, balance: Balance, denorm: Balance) -> Result<(), Error> {
		ensure!(denorm >= MIN_WEIGHT, Error::MinWeight);
		ensure!(denorm <= MAX_WEIGHT, Error::MaxWeight);
		ensure!(balance >= MIN_BALANCE, Error::MinBalance);

		let record = self.state.record(&asset)?;

		let (weight_delta, weight_decreased) = denorm.sub_sign(record.denorm);
		self.state.total_weight = if weight_decreased {
			self.state.total_weight.checked_sub(weight_delta)?
		} else {
			let total_weight = self.state.total_weight.checked_add(weight_delta)?;
			ensure!(total_weight <= MAX_TOTAL_WEIGHT, Error::MaxTotalWeight);
			total_weight
		};

		let entry = self.state.record_mut(&asset)?;
		entry.denorm = denorm;
		entry.balance = balance;
		self.ensure_anchor_weight()?;

		let (balance_delta, balance_decreased) = balance.sub_sign(record.balance);
		if balance_delta.is_zero() {
			Ok(())
		} else if balance_decreased {
			self.push_underlying(asset, who, balance_delta)
		} else {
			self.pull_underlying(asset, who, balance_delta)
		}
	}

	/// Records swapped balances and validates prices after the trade. Returns spot price after the trade.
	fn settle_swap(
		&mut self,
		(asset_in, record_in): (T::AssetId, TokenRecord),
		(asset_out, record_out): (T::AssetId, TokenRecord),
		amount_in: Balance,
		amount_out: Balance,
		spot_price_before: Balance,
		max_price: Balance,
	) -> Result<Balance, Error> {
		let balance_in = record_in.balance.checked_add(amount_in)?;
		let balance_out = record_out.balance.checked_sub(amount_out)?;

		let spot_price_after = weighted::calculate_spot_price(
			balance_in,
			record_in.denorm,
			balance_out,
			record_out.denorm,
			self.state.swap_fee,
		)?;
		ensure!(spot_price_after >= spot_price_before, Error::MathApprox);
		ensure!(spot_price_after <= max_price, Error::LimitPrice);
		ensure!(spot_price_before <= amount_in.divide(amount_out)?, Error::MathApprox);

		self.state.record_mut(&asset_in)?.balance = balance_in;
		self.state.record_mut(&asset_out)?.balance = balance_out;

		Ok(spot_price_after)
	}

	fn settle_single_join(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		record: TokenRecord,
		amount_in: Balance,
		pool_amount_out: Balance,
	) -> Result<(), Error> {
		self.state.record_mut(&asset_in)?.balance = record.balance.checked_add(amount_in)?;

		self.mint_pool_share(pool_amount_out)?;
		self.push_pool_share(who, pool_amount_out)?;
		self.pull_underlying(asset_in, who, amount_in)?;

		log::debug!(target: LOG_TARGET, "{:?} joined with {:?} of {:?} for {:?} shares", who, amount_in, asset_in, pool_amount_out);

		self.deposit_event(Event::Joined {
			who: who.clone(),
			asset: asset_in,
			amount: amount_in,
		});
		Ok(())
	}

	fn settle_single_exit(
		&mut self,
		who: &T::AccountId,
		asset_out: T::AssetId,
		record: TokenRecord,
		amount_out: Balance,
		pool_amount_in: Balance,
	) -> Result<(), Error> {
		self.state.record_mut(&asset_out)?.balance = record.balance.checked_sub(amount_out)?;

		let exit_fee = pool_amount_in.multiply(self.config.exit_fee)?;
		self.settle_exit_shares(who, pool_amount_in, exit_fee)?;
		self.push_underlying(asset_out, who, amount_out)?;

		log::debug!(target: LOG_TARGET, "{:?} exited with {:?} shares for {:?} of {:?}", who, pool_amount_in, amount_out, asset_out);

		self.deposit_event(Event::Exited {
			who: who.clone(),
			asset: asset_out,
			amount: amount_out,
		});
		Ok(())
	}

	/// Takes `pool_amount_in` shares from `who`, sends `exit_fee` of them to the fee sink and burns the rest.
	fn settle_exit_shares(&mut self, who: &T::AccountId, pool_amount_in: Balance, exit_fee: Balance) -> Result<(), Error> {
		self.pull_pool_share(who, pool_amount_in)?;
		if !exit_fee.is_zero() {
			let fee_sink = self.config.fee_sink.clone();
			self.push_pool_share(&fee_sink, exit_fee)?;
		}
		self.burn_pool_share(pool_amount_in.checked_sub(exit_fee)?)
	}

	fn mint_pool_share(&mut self, amount: Balance) -> Result<(), Error> {
		self.shares.mint(&self.account, amount)?;
		self.deposit_event(Event::Transfer {
			from: None,
			to: Some(self.account.clone()),
			amount,
		});
		Ok(())
	}

	fn burn_pool_share(&mut self, amount: Balance) -> Result<(), Error> {
		self.shares.burn(&self.account, amount)?;
		self.deposit_event(Event::Transfer {
			from: Some(self.account.clone()),
			to: None,
			amount,
		});
		Ok(())
	}

	fn push_pool_share(&mut self, to: &T::AccountId, amount: Balance) -> Result<(), Error> {
		let account = self.account.clone();
		self.move_pool_share(&account, to, amount)
	}

	fn pull_pool_share(&mut self, from: &T::AccountId, amount: Balance) -> Result<(), Error> {
		let account = self.account.clone();
		self.move_pool_share(from, &account, amount)
	}

	fn move_pool_share(&mut self, from: &T::AccountId, to: &T::AccountId, amount: Balance) -> Result<(), Error> {
		self.shares.transfer(from, to, amount)?;
		self.deposit_event(Event::Transfer {
			from: Some(from.clone()),
			to: Some(to.clone()),
			amount,
		});
		Ok(())
	}

	fn pull_underlying(&mut self, asset: T::AssetId, from: &T::AccountId, amount: Balance) -> Result<(), Error> {
		match self.currency.pull(asset, from, &self.account, amount) {
			Ok(true) => {
				self.journal.push(Movement::Pulled {
					asset,
					from: from.clone(),
					amount,
				});
				Ok(())
			}
			result => {
				log::debug!(target: LOG_TARGET, "pull of {:?} {:?} from {:?} failed: {:?}", amount, asset, from, result);
				Err(Error::TransferFailed)
			}
		}
	}

	fn push_underlying(&mut self, asset: T::AssetId, to: &T::AccountId, amount: Balance) -> Result<(), Error> {
		match self.currency.push(asset, &self.account, to, amount) {
			Ok(true) => {
				self.journal.push(Movement::Pushed {
					asset,
					to: to.clone(),
					amount,
				});
				Ok(())
			}
			result => {
				log::debug!(target: LOG_TARGET, "push of {:?} {:?} to {:?} failed: {:?}", amount, asset, to, result);
				Err(Error::TransferFailed)
			}
		}
	}

	fn deposit_event(&mut self, event: EventOf<T>) {
		self.events.push(event);
	}

	fn deposit_swapped(
		&mut self,
		who: &T::AccountId,
		asset_in: T::AssetId,
		asset_out: T::AssetId,
		amount_in: Balance,
		amount_out: Balance,
	) {
		log::debug!(
			target: LOG_TARGET,
			"{:?} swapped {:?} of {:?} for {:?} of {:?}",
			who,
			amount_in,
			asset_in,
			amount_out,
			asset_out
		);

		self.deposit_event(Event::Swapped {
			who: who.clone(),
			asset_in,
			asset_out,
			amount_in,
			amount_out,
		});
	}

	fn deposit_approval(&mut self, owner: &T::AccountId, spender: &T::AccountId, amount: Balance) {
		self.deposit_event(Event::Approval {
			owner: owner.clone(),
			spender: spender.clone(),
			amount,
		});
	}

	/// Runs `f` as a single all-or-nothing operation.
	///
	/// On error, asset movements executed by `f` are reverted in reverse order, the share ledger entries
	/// it changed are restored and state and event log are reset. `PoolState` holds at most `MAX_ASSETS`
	/// records, so it is snapshotted whole.
	fn with_transaction<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, Error>) -> Result<R, Error> {
		let state = self.state.clone();
		let events = self.events.len();

		let result = f(self);
		let journal = core::mem::take(&mut self.journal);

		match &result {
			Ok(_) => self.shares.commit(),
			Err(e) => {
				log::trace!(target: LOG_TARGET, "operation failed with {:?}, reverting {} transfers", e, journal.len());

				self.compensate(journal);
				self.state = state;
				self.shares.rollback();
				self.events.truncate(events);
			}
		}
		result
	}

	fn compensate(&mut self, journal: Vec<Movement<T::AssetId, T::AccountId>>) {
		for movement in journal.into_iter().rev() {
			let reverted = match &movement {
				Movement::Pulled { asset, from, amount } => self.currency.push(*asset, &self.account, from, *amount),
				Movement::Pushed { asset, to, amount } => self.currency.pull(*asset, to, &self.account, *amount),
			};
			if !matches!(reverted, Ok(true)) {
				log::error!(
					target: LOG_TARGET,
					"pool {:?} failed to revert {:?}: {:?}",
					self.account,
					movement,
					reverted
				);
			}
		}
	}
}
