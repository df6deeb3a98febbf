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

use crate::{Config, Error, Pool, LOG_TARGET};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
	Read,
	Write,
}

thread_local! {
	/// Pools locked by the current thread, keyed by address.
	static HELD: RefCell<Vec<(usize, Access)>> = RefCell::new(Vec::new());
}

/// Marks a pool as locked by the current thread until dropped.
struct Held(usize);

impl Held {
	/// Fails if the access conflicts with one this thread already holds on the same pool.
	fn enter(key: usize, access: Access) -> Result<Self, Error> {
		HELD.with(|held| {
			let mut held = held.borrow_mut();
			let conflict = held
				.iter()
				.any(|(k, a)| *k == key && (access == Access::Write || *a == Access::Write));
			ensure!(!conflict, Error::Reentrancy);
			held.push((key, access));
			Ok(Held(key))
		})
	}
}

impl Drop for Held {
	fn drop(&mut self) {
		HELD.with(|held| {
			let mut held = held.borrow_mut();
			if let Some(position) = held.iter().rposition(|(k, _)| *k == self.0) {
				held.remove(position);
			}
		});
	}
}

/// Cloneable handle to a pool shared between threads.
///
/// Queries run concurrently, mutations are exclusive. A call made from a thread already inside a
/// mutation of the same pool, e.g. by an asset transfer callback, fails with [`Error::Reentrancy`], as
/// does a mutation attempted from inside a query.
pub struct SharedPool<T: Config> {
	inner: Arc<RwLock<Pool<T>>>,
}

impl<T: Config> Clone for SharedPool<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T: Config> SharedPool<T> {
	pub fn new(pool: Pool<T>) -> Self {
		Self {
			inner: Arc::new(RwLock::new(pool)),
		}
	}

	/// Runs a mutating operation with exclusive access to the pool.
	pub fn mutate<R>(&self, f: impl FnOnce(&mut Pool<T>) -> Result<R, Error>) -> Result<R, Error> {
		let _held = Held::enter(self.key(), Access::Write).map_err(|e| {
			log::warn!(target: LOG_TARGET, "rejected reentrant pool mutation");
			e
		})?;
		let mut pool = self.inner.write();
		f(&mut pool)
	}

	/// Runs a query. Fails if called while a mutation on this thread is in progress.
	pub fn read<R>(&self, f: impl FnOnce(&Pool<T>) -> R) -> Result<R, Error> {
		let _held = Held::enter(self.key(), Access::Read).map_err(|e| {
			log::warn!(target: LOG_TARGET, "rejected pool read during mutation");
			e
		})?;
		// nested queries on this thread must not queue behind a waiting writer
		let pool = self.inner.read_recursive();
		Ok(f(&pool))
	}

	/// Unwraps the pool if this is the last handle.
	pub fn try_unwrap(self) -> Result<Pool<T>, Self> {
		Arc::try_unwrap(self.inner)
			.map(|lock| lock.into_inner())
			.map_err(|inner| Self { inner })
	}

	fn key(&self) -> usize {
		Arc::as_ptr(&self.inner) as usize
	}
}
