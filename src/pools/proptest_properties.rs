//! Property-based tests for pool invariants.
//!
//! 1. **Key symmetry**: `PoolKey::derive(a, b) == PoolKey::derive(b, a)`.
//! 2. **Share conservation**: ledger balances always sum to `total_shares`.
//! 3. **Product growth**: swaps never decrease `reserve_low × reserve_high`.
//! 4. **No free lunch**: deposit then full withdrawal never returns more
//!    than was deposited.
//! 5. **Square root**: `integer_sqrt` returns the floor root.

#![allow(clippy::panic)]

use proptest::prelude::*;

use crate::domain::{
    AccountId, Amount, AssetId, AssetPair, DepositRequest, FeeRate, PoolKey, Shares,
    WithdrawalRequest,
};
use crate::engine::liquidity::{plan_deposit, plan_withdrawal};
use crate::engine::swap::plan_swap;
use crate::math::integer_sqrt;
use crate::pools::{Pool, PoolBook};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn asset_low() -> AssetId {
    AssetId::from_bytes([1u8; 32])
}

fn asset_high() -> AssetId {
    AssetId::from_bytes([2u8; 32])
}

fn provider(index: u8) -> AccountId {
    AccountId::from_bytes([index.wrapping_add(100); 32])
}

fn empty_book() -> PoolBook {
    let Ok(pair) = AssetPair::new(asset_low(), asset_high()) else {
        panic!("valid pair");
    };
    PoolBook::new(pair.key(), Pool::new(pair))
}

fn seeded_book(a: u128, b: u128) -> PoolBook {
    let mut book = empty_book();
    let request = DepositRequest::new(Amount::new(a), Amount::new(b));
    let Ok(plan) = plan_deposit(&book, (asset_low(), asset_high()), &request, provider(0))
    else {
        panic!("seed deposit failed");
    };
    book.commit(plan.change);
    book
}

#[derive(Debug, Clone)]
enum Op {
    Deposit { who: u8, a: u128, b: u128 },
    Withdraw { who: u8, fraction: u8 },
    Swap { low_in: bool, amount: u128 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, 1u128..1_000_000, 1u128..1_000_000)
            .prop_map(|(who, a, b)| Op::Deposit { who, a, b }),
        (0u8..4, 1u8..=100).prop_map(|(who, fraction)| Op::Withdraw { who, fraction }),
        (any::<bool>(), 0u128..100_000).prop_map(|(low_in, amount)| Op::Swap { low_in, amount }),
    ]
}

/// Applies `op`; rejected operations leave the book untouched.
fn apply(book: &mut PoolBook, op: &Op) {
    let pair = (asset_low(), asset_high());
    match *op {
        Op::Deposit { who, a, b } => {
            let request = DepositRequest::new(Amount::new(a), Amount::new(b));
            if let Ok(plan) = plan_deposit(book, pair, &request, provider(who)) {
                book.commit(plan.change);
            }
        }
        Op::Withdraw { who, fraction } => {
            let held = book.shares_of(&provider(who)).get();
            let burn = held / 100 * u128::from(fraction);
            let request = WithdrawalRequest::new(Shares::new(burn));
            if let Ok(plan) = plan_withdrawal(book, pair, &request, provider(who)) {
                book.commit(plan.change);
            }
        }
        Op::Swap { low_in, amount } => {
            let direction = if low_in {
                pair
            } else {
                (asset_high(), asset_low())
            };
            if let Ok(plan) = plan_swap(
                book,
                Amount::new(amount),
                Amount::ZERO,
                direction,
                FeeRate::DEFAULT,
            ) {
                book.commit(plan.change);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_key_is_order_independent(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let a = AssetId::from_bytes(a);
        let b = AssetId::from_bytes(b);
        prop_assert_eq!(PoolKey::derive(a, b), PoolKey::derive(b, a));
    }

    #[test]
    fn prop_shares_are_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut book = empty_book();
        for op in &ops {
            apply(&mut book, op);
            prop_assert_eq!(book.reconcile(), Ok(()));
        }
    }

    #[test]
    fn prop_swaps_never_shrink_the_product(
        a in 1_000u128..10_000_000,
        b in 1_000u128..10_000_000,
        swaps in prop::collection::vec((any::<bool>(), 0u128..1_000_000), 1..20),
    ) {
        let mut book = seeded_book(a, b);
        for (low_in, amount) in swaps {
            let before = book.pool().invariant();
            apply(&mut book, &Op::Swap { low_in, amount });
            prop_assert!(book.pool().invariant() >= before);
        }
    }

    #[test]
    fn prop_deposit_then_withdraw_never_profits(
        ra in 1_000u128..10_000_000,
        rb in 1_000u128..10_000_000,
        a in 1u128..1_000_000,
        b in 1u128..1_000_000,
    ) {
        let mut book = seeded_book(ra, rb);
        let pair = (asset_low(), asset_high());
        let depositor = provider(9);

        let request = DepositRequest::new(Amount::new(a), Amount::new(b));
        let Ok(deposit) = plan_deposit(&book, pair, &request, depositor) else {
            return Ok(());
        };
        book.commit(deposit.change);

        let request = WithdrawalRequest::new(deposit.liquidity);
        let Ok(withdrawal) = plan_withdrawal(&book, pair, &request, depositor) else {
            panic!("withdrawing freshly minted shares must succeed");
        };
        prop_assert!(withdrawal.amount_a <= deposit.amount_a);
        prop_assert!(withdrawal.amount_b <= deposit.amount_b);
    }

    #[test]
    fn prop_integer_sqrt_is_floor_root(x in any::<u64>()) {
        let x = u128::from(x);
        let r = integer_sqrt(x);
        prop_assert!(r * r <= x);
        prop_assert!((r + 1) * (r + 1) > x);
    }
}
