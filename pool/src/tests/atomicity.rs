use crate::tests::mock::*;
use crate::tests::shares_add_up;
use crate::types::Balance;
use crate::{assert_balance, Error, ErrorKind, Event, SharedPool};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Barrier};
use std::thread;
use test_case::test_case;

#[test_case(TransferFailure::ReturnFalse ; "transfer returns false")]
#[test_case(TransferFailure::Error ; "transfer returns error")]
fn join_pool_should_revert_earlier_pulls_when_later_pull_fails(failure: TransferFailure) {
	let mut pool = three_asset_pool().finalized().build();
	Tokens::fail_transfers_of(DAI, failure);

	let error = pool.join_pool(&BOB, units(10), &[units(100), units(100), units(10_000)]).unwrap_err();

	assert_eq!(error, Error::TransferFailed);
	assert_eq!(error.kind(), ErrorKind::ExternalTransferFailed);

	// WETH and MKR pulled, DAI failed, MKR and WETH pushed back
	assert_eq!(Tokens::transfer_count(), 5);
	assert_balance!(BOB, WETH, units(25));
	assert_balance!(BOB, MKR, units(4));
	assert_balance!(BOB, DAI, units(40_000));
	assert_balance!(POOL, WETH, units(50));
	assert_balance!(POOL, MKR, units(20));

	assert_eq!(pool.balance(WETH), Ok(units(50)));
	assert_eq!(pool.balance(MKR), Ok(units(20)));
	assert_eq!(pool.total_supply(), units(100));
	assert_eq!(pool.balance_of(&BOB), Balance::ZERO);
	assert!(shares_add_up(&pool));
	assert!(pool.events().is_empty());
}

#[test]
fn join_pool_should_work_after_failing_transfers_are_restored() {
	let mut pool = three_asset_pool().finalized().build();
	Tokens::fail_transfers_of(MKR, TransferFailure::Error);
	assert_eq!(
		pool.join_pool(&BOB, units(10), &[units(100), units(100), units(10_000)]),
		Err(Error::TransferFailed)
	);

	Tokens::restore_transfers_of(MKR);

	assert_eq!(
		pool.join_pool(&BOB, units(10), &[units(100), units(100), units(10_000)]),
		Ok(vec![units(5), units(2), units(1_000)])
	);
	assert_eq!(pool.balance_of(&BOB), units(10));
}

#[test]
fn swap_should_revert_pull_when_push_fails() {
	let mut pool = three_asset_pool().finalized().build();
	Tokens::fail_transfers_of(DAI, TransferFailure::ReturnFalse);

	assert_eq!(
		pool.swap_exact_amount_in(&BOB, WETH, units(1), DAI, Balance::ZERO, units(1)),
		Err(Error::TransferFailed)
	);

	assert_eq!(Tokens::transfer_count(), 3);
	assert_balance!(BOB, WETH, units(25));
	assert_balance!(POOL, WETH, units(50));
	assert_eq!(pool.balance(WETH), Ok(units(50)));
	assert_eq!(pool.balance(DAI), Ok(units(10_000)));
	assert_eq!(pool.spot_price(WETH, DAI), Ok(raw(5_005_005_005_005_005)));
	assert!(pool.events().is_empty());
}

#[test]
fn swap_should_fail_without_compensation_when_first_transfer_fails() {
	let mut pool = three_asset_pool().finalized().build();
	Tokens::fail_transfers_of(WETH, TransferFailure::Error);

	assert_eq!(
		pool.swap_exact_amount_in(&BOB, WETH, units(1), DAI, Balance::ZERO, units(1)),
		Err(Error::TransferFailed)
	);

	assert_eq!(Tokens::transfer_count(), 1);
	assert_balance!(BOB, DAI, units(40_000));
}

#[test]
fn single_asset_join_should_revert_minted_shares_when_pull_fails() {
	let mut pool = three_asset_pool().finalized().build();
	Tokens::fail_transfers_of(WETH, TransferFailure::ReturnFalse);

	assert_eq!(
		pool.join_swap_extern_amount_in(&BOB, WETH, units(5), Balance::ZERO),
		Err(Error::TransferFailed)
	);

	assert_eq!(pool.total_supply(), units(100));
	assert_eq!(pool.balance_of(&BOB), Balance::ZERO);
	assert_eq!(pool.balance_of(&POOL), Balance::ZERO);
	assert_eq!(pool.balance(WETH), Ok(units(50)));
}

#[test]
fn exit_pool_should_restore_burned_shares_when_push_fails() {
	let mut pool = three_asset_pool().finalized().build();
	pool.approve(&ALICE, &BOB, units(7)).unwrap();
	let ledger = pool.shares().clone();
	Tokens::fail_transfers_of(DAI, TransferFailure::Error);

	assert_eq!(
		pool.exit_pool(&ALICE, units(10), &[Balance::ZERO; 3]),
		Err(Error::TransferFailed)
	);

	assert_eq!(pool.shares(), &ledger);
	assert_eq!(pool.allowance(&ALICE, &BOB), units(7));
	assert_eq!(pool.balance_of(&FEE_SINK), Balance::ZERO);

	assert_eq!(pool.total_supply(), units(100));
	assert_eq!(pool.balance_of(&ALICE), units(100));
	assert_balance!(ALICE, WETH, Balance::ZERO);
	assert_balance!(ALICE, MKR, Balance::ZERO);
	assert_balance!(POOL, WETH, units(50));
	assert_balance!(POOL, MKR, units(20));
	assert_eq!(pool.balance(MKR), Ok(units(20)));
}

#[test]
fn bind_should_leave_no_trace_when_pull_fails() {
	let mut pool = ExtBuilder::default().build();
	Tokens::deposit(WETH, &ALICE, units(10));
	Tokens::fail_transfers_of(WETH, TransferFailure::ReturnFalse);

	assert_eq!(pool.bind(&ALICE, WETH, units(10), units(5)), Err(Error::TransferFailed));

	assert!(!pool.is_bound(WETH));
	assert_eq!(pool.num_tokens(), 0);
	assert_eq!(pool.total_denormalized_weight(), Balance::ZERO);
	assert!(pool.record(WETH).is_none());
}

#[test]
fn shared_pool_should_reject_reentrant_calls_from_transfer_callback() {
	let pool = three_asset_pool().finalized().build();
	let shared = SharedPool::new(pool);

	let reentrant_results: Rc<RefCell<Vec<Result<(), Error>>>> = Rc::new(RefCell::new(vec![]));
	let handle = shared.clone();
	let results = Rc::clone(&reentrant_results);
	Tokens::on_transfer(move || {
		let mutated = handle.mutate(|pool| pool.transfer(&ALICE, &BOB, units(1)));
		let read = handle.read(|pool| pool.total_supply()).map(|_| ());
		results.borrow_mut().push(mutated);
		results.borrow_mut().push(read);
	});

	let (amount_out, _) = shared
		.mutate(|pool| pool.swap_exact_amount_in(&BOB, WETH, units(1), DAI, Balance::ZERO, units(1)))
		.unwrap();
	assert!(!amount_out.is_zero());

	assert_eq!(
		*reentrant_results.borrow(),
		vec![Err(Error::Reentrancy); 4],
		"both transfers of the swap should see a locked pool"
	);
	assert_eq!(Error::Reentrancy.kind(), ErrorKind::PreconditionViolation);

	assert_eq!(shared.read(|pool| pool.balance_of(&BOB)), Ok(Balance::ZERO));
	assert_eq!(shared.read(|pool| pool.balance(WETH)), Ok(Ok(units(51))));

	// callback still holds a handle
	let shared = match shared.try_unwrap() {
		Ok(_) => panic!("pool should still be shared"),
		Err(shared) => shared,
	};
	Tokens::on_transfer(|| {});
	let pool = shared.try_unwrap().ok().unwrap();
	assert_balance!(POOL, WETH, units(51));
	assert_eq!(pool.balance(WETH), Ok(units(51)));
}

#[test]
fn shared_pool_should_serialize_calls_from_multiple_threads() {
	let pool = three_asset_pool().build();
	let shared = SharedPool::new(pool);

	let workers: Vec<_> = (1..=8u128)
		.map(|i| {
			let handle = shared.clone();
			thread::spawn(move || handle.mutate(|pool| pool.set_swap_fee(&ALICE, fraction(i, 1_000))))
		})
		.collect();

	for worker in workers {
		assert_eq!(worker.join().unwrap(), Ok(()));
	}

	let pool = shared.try_unwrap().ok().unwrap();
	let fees: Vec<_> = pool
		.events()
		.iter()
		.filter_map(|event| match event {
			Event::SwapFeeUpdated { fee } => Some(*fee),
			_ => None,
		})
		.collect();
	assert_eq!(fees.len(), 8);
	assert_eq!(fees.last(), Some(&pool.swap_fee()));
	assert!(pool.swap_fee() >= fraction(1, 1_000) && pool.swap_fee() <= fraction(8, 1_000));
}

#[test]
fn shared_pool_should_allow_concurrent_reads() {
	let pool = three_asset_pool().finalized().build();
	let shared = SharedPool::new(pool);
	let barrier = Arc::new(Barrier::new(2));

	let readers: Vec<_> = (0..2)
		.map(|_| {
			let handle = shared.clone();
			let barrier = Arc::clone(&barrier);
			// each reader waits inside `read` for the other one
			thread::spawn(move || {
				handle.read(|pool| {
					barrier.wait();
					pool.total_supply()
				})
			})
		})
		.collect();

	for reader in readers {
		assert_eq!(reader.join().unwrap(), Ok(units(100)));
	}
}

#[test]
fn shared_pool_should_allow_nested_reads_and_reject_mutation_from_read() {
	let pool = three_asset_pool().finalized().build();
	let shared = SharedPool::new(pool);

	let nested = shared.read(|_| shared.read(|pool| pool.balance(WETH)));
	assert_eq!(nested, Ok(Ok(Ok(units(50)))));

	let mutated = shared.read(|_| shared.mutate(|pool| pool.set_public_swap(&ALICE, false)));
	assert_eq!(mutated, Ok(Err(Error::Reentrancy)));

	// the rejected call leaves no lock behind
	assert_eq!(shared.mutate(|pool| pool.transfer(&ALICE, &BOB, units(1))), Ok(()));
	assert_eq!(shared.read(|pool| pool.balance_of(&BOB)), Ok(units(1)));
}

#[test]
fn shared_pool_should_lock_each_pool_separately() {
	let first = SharedPool::new(three_asset_pool().finalized().build());
	let second = SharedPool::new(ExtBuilder::default().build());

	let result = first.mutate(|_| second.mutate(|pool| pool.set_swap_fee(&ALICE, fraction(2, 1_000))));

	assert_eq!(result, Ok(()));
	assert_eq!(second.read(|pool| pool.swap_fee()), Ok(fraction(2, 1_000)));
}
