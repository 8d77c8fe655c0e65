//! Integration tests exercising the exchange through its public API.
//!
//! These tests verify end-to-end flows: pool creation, the deposit, swap
//! and withdrawal lifecycle, owner-only administration, rollback when the
//! custody collaborator refuses a transfer, and concurrent use of the
//! shared host.

#![allow(clippy::panic)]

use std::sync::Arc;

use pair_amm::assets::InMemoryAssets;
use pair_amm::config::AmmConfig;
use pair_amm::domain::{
    AccountId, Amount, AssetId, DepositRequest, FeeRate, PoolEvent, PoolInfo, PoolKey, Shares,
    WithdrawalRequest,
};
use pair_amm::error::AmmError;
use pair_amm::events::EventLog;
use pair_amm::exchange::{Exchange, SharedExchange};
use pair_amm::traits::AssetTransfer;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const OWNER: AccountId = AccountId::from_bytes([0x01; 32]);
const CUSTODY: AccountId = AccountId::from_bytes([0x02; 32]);
const ALICE: AccountId = AccountId::from_bytes([0xA1; 32]);
const BOB: AccountId = AccountId::from_bytes([0xB0; 32]);
const CAROL: AccountId = AccountId::from_bytes([0xC0; 32]);

const X: AssetId = AssetId::from_bytes([0x10; 32]);
const Y: AssetId = AssetId::from_bytes([0x20; 32]);
const Z: AssetId = AssetId::from_bytes([0x30; 32]);

const FUNDING: u128 = 1_000_000;

fn config() -> AmmConfig {
    let Ok(config) = AmmConfig::new(OWNER, CUSTODY) else {
        panic!("valid config");
    };
    config
}

/// Custody table where every trader holds `FUNDING` of every asset and has
/// approved custody without limit.
fn funded_assets() -> Arc<InMemoryAssets> {
    let assets = Arc::new(InMemoryAssets::new());
    for account in [ALICE, BOB, CAROL] {
        for asset in [X, Y, Z] {
            let Ok(()) = assets.mint(asset, account, Amount::new(FUNDING)) else {
                panic!("mint failed");
            };
            let Ok(()) = assets.approve(asset, account, CUSTODY, Amount::MAX) else {
                panic!("approve failed");
            };
        }
    }
    assets
}

fn exchange() -> (Exchange<Arc<InMemoryAssets>>, Arc<InMemoryAssets>) {
    let assets = funded_assets();
    let Ok(exchange) = Exchange::new(config(), Arc::clone(&assets)) else {
        panic!("valid exchange");
    };
    (exchange, assets)
}

fn deposit(
    exchange: &mut Exchange<Arc<InMemoryAssets>>,
    provider: AccountId,
    a: u128,
    b: u128,
) -> (u128, u128, u128) {
    let request = DepositRequest::new(Amount::new(a), Amount::new(b));
    let Ok(receipt) = exchange.add_liquidity(X, Y, &request, provider) else {
        panic!("deposit failed");
    };
    (
        receipt.amount_a().get(),
        receipt.amount_b().get(),
        receipt.liquidity().get(),
    )
}

/// Exchange holding the pool after the first two documented deposits:
/// reserves 150/150, Alice 100 shares, Bob 50.
fn seeded_exchange() -> (Exchange<Arc<InMemoryAssets>>, Arc<InMemoryAssets>) {
    let (mut exchange, assets) = exchange();
    let Ok(_) = exchange.create_pool(X, Y) else {
        panic!("pool creation failed");
    };
    deposit(&mut exchange, ALICE, 100, 100);
    deposit(&mut exchange, BOB, 50, 50);
    (exchange, assets)
}

// ---------------------------------------------------------------------------
// Pool creation
// ---------------------------------------------------------------------------

#[test]
fn create_pool_returns_canonical_key() {
    let (mut exchange, _) = exchange();
    let Ok(key) = exchange.create_pool(Y, X) else {
        panic!("pool creation failed");
    };
    assert_eq!(key, PoolKey::derive(X, Y));
    assert_eq!(exchange.list_pools(), &[key]);

    let Some(pool) = exchange.get_pool(X, Y) else {
        panic!("pool should exist");
    };
    assert_eq!(pool.asset_low(), X);
    assert_eq!(pool.asset_high(), Y);
}

#[test]
fn create_pool_rejects_duplicates_and_bad_pairs() {
    let (mut exchange, _) = exchange();
    let Ok(key) = exchange.create_pool(X, Y) else {
        panic!("pool creation failed");
    };
    assert_eq!(
        exchange.create_pool(Y, X),
        Err(AmmError::PoolAlreadyExists(key))
    );
    assert_eq!(exchange.create_pool(X, X), Err(AmmError::IdenticalAssets));
    assert_eq!(
        exchange.create_pool(AssetId::NULL, X),
        Err(AmmError::NullAsset)
    );
    assert_eq!(exchange.pool_count(), 1);
}

#[test]
fn pools_are_listed_in_creation_order() {
    let (mut exchange, _) = exchange();
    let mut expected = Vec::new();
    for (a, b) in [(Z, Y), (X, Z), (Y, X)] {
        let Ok(key) = exchange.create_pool(a, b) else {
            panic!("pool creation failed");
        };
        expected.push(key);
    }
    assert_eq!(exchange.list_pools(), expected.as_slice());
}

// ---------------------------------------------------------------------------
// Documented scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_first_deposit_mints_square_root() {
    let (mut exchange, assets) = exchange();
    let Ok(_) = exchange.create_pool(X, Y) else {
        panic!("pool creation failed");
    };

    assert_eq!(deposit(&mut exchange, ALICE, 100, 100), (100, 100, 100));
    assert_eq!(exchange.get_user_shares(X, Y, ALICE), Shares::new(100));
    assert_eq!(assets.balance_of(X, CUSTODY), Amount::new(100));
    assert_eq!(assets.balance_of(Y, ALICE), Amount::new(FUNDING - 100));
}

#[test]
fn scenario_second_deposit_is_proportional() {
    let (exchange, _) = seeded_exchange();
    assert_eq!(exchange.get_user_shares(X, Y, BOB), Shares::new(50));
    assert_eq!(
        exchange.get_pool_info(X, Y),
        PoolInfo {
            reserve_a: Amount::new(150),
            reserve_b: Amount::new(150),
            total_shares: Shares::new(150),
            exists: true,
        }
    );
}

#[test]
fn scenario_swap_prices_with_fee() {
    let (mut exchange, assets) = seeded_exchange();
    assert_eq!(
        exchange.get_amount_out(Amount::new(10), X, Y),
        Ok(Amount::new(9))
    );

    let Ok(receipt) = exchange.swap_exact_in(Amount::new(10), Amount::new(9), X, Y, CAROL) else {
        panic!("swap failed");
    };
    assert_eq!(receipt.amount_out(), Amount::new(9));

    let info = exchange.get_pool_info(Y, X);
    assert_eq!(info.reserve_a, Amount::new(141));
    assert_eq!(info.reserve_b, Amount::new(160));
    assert_eq!(assets.balance_of(Y, CAROL), Amount::new(FUNDING + 9));
    assert_eq!(assets.balance_of(X, CAROL), Amount::new(FUNDING - 10));
}

#[test]
fn swap_on_empty_pool_fails() {
    let (mut exchange, _) = exchange();
    let Ok(_) = exchange.create_pool(X, Y) else {
        panic!("pool creation failed");
    };
    assert_eq!(
        exchange.swap_exact_in(Amount::new(10), Amount::ZERO, X, Y, CAROL),
        Err(AmmError::InsufficientLiquidity)
    );
    assert_eq!(
        exchange.get_amount_out(Amount::new(10), X, Y),
        Err(AmmError::InsufficientLiquidity)
    );
}

#[test]
fn fee_bounds_are_enforced() {
    let (mut exchange, _) = exchange();
    assert_eq!(exchange.update_fee(OWNER, 31), Err(AmmError::FeeTooHigh(31)));
    assert_eq!(exchange.update_fee(OWNER, 30), Ok(FeeRate::MAX));
    assert_eq!(exchange.config().fee_rate(), FeeRate::MAX);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn swap_grows_the_product_and_withdrawals_share_fees() {
    let (mut exchange, assets) = seeded_exchange();
    let k_before = exchange.get_pool(X, Y).map(|pool| pool.invariant());

    for _ in 0..5 {
        let Ok(_) = exchange.swap_exact_in(Amount::new(20), Amount::ZERO, X, Y, CAROL) else {
            panic!("swap failed");
        };
        let Ok(_) = exchange.swap_exact_in(Amount::new(20), Amount::ZERO, Y, X, CAROL) else {
            panic!("swap failed");
        };
    }
    let k_after = exchange.get_pool(X, Y).map(|pool| pool.invariant());
    assert!(k_after > k_before);

    let request = WithdrawalRequest::new(Shares::new(100));
    let Ok(receipt) = exchange.remove_liquidity(X, Y, &request, ALICE) else {
        panic!("withdrawal failed");
    };
    // fees stay in the pool, so the round trip returns at least the deposit
    assert!(receipt.amount_a().get() + receipt.amount_b().get() >= 200);
    assert_eq!(exchange.get_user_shares(X, Y, ALICE), Shares::ZERO);
    assert_eq!(
        assets.balance_of(X, ALICE).get(),
        FUNDING - 100 + receipt.amount_a().get()
    );
    assert_eq!(exchange.audit(), Ok(()));
}

#[test]
fn full_withdrawal_empties_the_pool() {
    let (mut exchange, _) = seeded_exchange();
    for (provider, shares) in [(ALICE, 100), (BOB, 50)] {
        let request = WithdrawalRequest::new(Shares::new(shares));
        let Ok(_) = exchange.remove_liquidity(Y, X, &request, provider) else {
            panic!("withdrawal failed");
        };
    }
    let info = exchange.get_pool_info(X, Y);
    assert_eq!(info.total_shares, Shares::ZERO);
    assert_eq!(info.reserve_a, Amount::ZERO);
    assert!(info.exists);

    // an emptied pool accepts a fresh first deposit at any ratio
    assert_eq!(deposit(&mut exchange, CAROL, 400, 100), (400, 100, 200));
}

#[test]
fn withdrawal_rejections() {
    let (mut exchange, _) = seeded_exchange();
    assert_eq!(
        exchange.remove_liquidity(X, Y, &WithdrawalRequest::new(Shares::new(51)), BOB),
        Err(AmmError::InsufficientShares)
    );
    let greedy =
        WithdrawalRequest::new(Shares::new(50)).with_minimums(Amount::new(51), Amount::ZERO);
    assert_eq!(
        exchange.remove_liquidity(X, Y, &greedy, BOB),
        Err(AmmError::InsufficientOutputAmount)
    );
    assert_eq!(
        exchange.remove_liquidity(X, Z, &WithdrawalRequest::new(Shares::new(1)), BOB),
        Err(AmmError::PoolNotFound)
    );
    assert_eq!(exchange.get_user_shares(X, Y, BOB), Shares::new(50));
}

#[test]
fn slippage_bound_rejects_swap_without_side_effects() {
    let (mut exchange, assets) = seeded_exchange();
    assert_eq!(
        exchange.swap_exact_in(Amount::new(10), Amount::new(10), X, Y, CAROL),
        Err(AmmError::InsufficientOutputAmount)
    );
    assert_eq!(assets.balance_of(X, CAROL), Amount::new(FUNDING));
    assert_eq!(exchange.get_pool_info(X, Y).reserve_a, Amount::new(150));
}

#[test]
fn missing_pool_reads_as_zeroed_info() {
    let (exchange, _) = exchange();
    assert_eq!(exchange.get_pool_info(X, Y), PoolInfo::default());
    assert_eq!(exchange.get_user_shares(X, Y, ALICE), Shares::ZERO);
    assert!(exchange.get_pool(X, Y).is_none());
}

// ---------------------------------------------------------------------------
// Transfer failures roll back
// ---------------------------------------------------------------------------

#[test]
fn failed_second_pull_refunds_first_and_keeps_pool_unchanged() {
    let (mut exchange, assets) = seeded_exchange();
    let before = exchange.get_pool_info(X, Y);
    assets.freeze(Y);

    let request = DepositRequest::new(Amount::new(10), Amount::new(10));
    assert!(matches!(
        exchange.add_liquidity(X, Y, &request, CAROL),
        Err(AmmError::TransferFailed(_))
    ));

    assert_eq!(exchange.get_pool_info(X, Y), before);
    assert_eq!(exchange.get_user_shares(X, Y, CAROL), Shares::ZERO);
    assert_eq!(assets.balance_of(X, CAROL), Amount::new(FUNDING));
    assert_eq!(exchange.audit(), Ok(()));
}

#[test]
fn custody_shortfall_fails_before_any_payout() {
    let (mut exchange, assets) = seeded_exchange();
    // drain custody of Y so the Y payout cannot be covered
    let Ok(()) = exchange.emergency_withdraw(OWNER, Y, Amount::new(150)) else {
        panic!("emergency withdrawal failed");
    };

    let request = WithdrawalRequest::new(Shares::new(50));
    assert!(matches!(
        exchange.remove_liquidity(X, Y, &request, BOB),
        Err(AmmError::TransferFailed(_))
    ));
    assert_eq!(exchange.get_user_shares(X, Y, BOB), Shares::new(50));
    assert_eq!(exchange.get_pool_info(X, Y).reserve_a, Amount::new(150));
    // the X payout never left custody
    assert_eq!(assets.balance_of(X, BOB), Amount::new(FUNDING - 50));
    assert_eq!(assets.balance_of(X, CUSTODY), Amount::new(150));
}

#[test]
fn failed_payout_is_reclaimed_when_allowed() {
    let (mut exchange, assets) = seeded_exchange();
    assets.freeze(Y);

    let request = WithdrawalRequest::new(Shares::new(50));
    assert!(matches!(
        exchange.remove_liquidity(X, Y, &request, BOB),
        Err(AmmError::TransferFailed(_))
    ));
    assert_eq!(exchange.get_user_shares(X, Y, BOB), Shares::new(50));
    assert_eq!(assets.balance_of(X, BOB), Amount::new(FUNDING - 50));
    assert_eq!(assets.balance_of(X, CUSTODY), Amount::new(150));
    assert_eq!(exchange.audit(), Ok(()));
}

#[test]
fn unreclaimable_payout_is_charged_to_the_provider() {
    let (mut exchange, assets) = seeded_exchange();
    // Bob revokes custody's allowance, so a paid-out X cannot be pulled back
    let Ok(()) = assets.approve(X, BOB, CUSTODY, Amount::ZERO) else {
        panic!("revoke failed");
    };
    assets.freeze(Y);

    let request = WithdrawalRequest::new(Shares::new(50));
    assert!(matches!(
        exchange.remove_liquidity(X, Y, &request, BOB),
        Err(AmmError::PartiallySettled(_))
    ));

    // Bob burned the shares covering his X payout and nothing more
    assert_eq!(assets.balance_of(X, BOB), Amount::new(FUNDING));
    assert_eq!(exchange.get_user_shares(X, Y, BOB), Shares::ZERO);
    let info = exchange.get_pool_info(X, Y);
    assert_eq!(info.reserve_a, assets.balance_of(X, CUSTODY));
    assert_eq!(info.reserve_b, assets.balance_of(Y, CUSTODY));
    assert_eq!(info.reserve_a, Amount::new(100));
    assert_eq!(info.total_shares, Shares::new(100));
    assert_eq!(exchange.audit(), Ok(()));

    // a retry after the freeze lifts cannot pay Bob a second time
    assets.thaw(Y);
    assert!(matches!(
        exchange.remove_liquidity(X, Y, &request, BOB),
        Err(AmmError::InsufficientShares)
    ));

    // Alice's claim is fully funded
    let Ok(receipt) =
        exchange.remove_liquidity(X, Y, &WithdrawalRequest::new(Shares::new(100)), ALICE)
    else {
        panic!("alice withdrawal failed");
    };
    assert_eq!(receipt.amount_a(), Amount::new(100));
    assert_eq!(receipt.amount_b(), Amount::new(150));
    assert_eq!(assets.balance_of(X, CUSTODY), Amount::ZERO);
    assert_eq!(assets.balance_of(Y, CUSTODY), Amount::ZERO);
}

#[test]
fn failed_swap_payout_refunds_the_input() {
    let (mut exchange, assets) = seeded_exchange();
    assets.freeze(Y);
    assert!(matches!(
        exchange.swap_exact_in(Amount::new(10), Amount::ZERO, X, Y, CAROL),
        Err(AmmError::TransferFailed(_))
    ));
    assert_eq!(assets.balance_of(X, CAROL), Amount::new(FUNDING));
    assert_eq!(exchange.get_pool_info(X, Y).reserve_a, Amount::new(150));
}

// ---------------------------------------------------------------------------
// Administration and events
// ---------------------------------------------------------------------------

#[test]
fn owner_only_operations_reject_strangers_first() {
    let (mut exchange, _) = seeded_exchange();
    assert_eq!(exchange.update_fee(ALICE, 31), Err(AmmError::Unauthorized));
    assert_eq!(
        exchange.emergency_withdraw(ALICE, X, Amount::new(1)),
        Err(AmmError::Unauthorized)
    );
    assert_eq!(exchange.config().fee_rate(), FeeRate::DEFAULT);
}

#[test]
fn emergency_withdrawal_leaves_reserves_alone() {
    let (mut exchange, assets) = seeded_exchange();
    let Ok(()) = exchange.emergency_withdraw(OWNER, X, Amount::new(40)) else {
        panic!("emergency withdrawal failed");
    };
    assert_eq!(assets.balance_of(X, OWNER), Amount::new(40));
    assert_eq!(exchange.get_pool_info(X, Y).reserve_a, Amount::new(150));
}

#[test]
fn higher_fee_lowers_quotes() {
    let (mut exchange, _) = seeded_exchange();
    let Ok(default_quote) = exchange.get_amount_out(Amount::new(50), X, Y) else {
        panic!("quote failed");
    };
    let Ok(_) = exchange.update_fee(OWNER, 30) else {
        panic!("fee update failed");
    };
    let Ok(max_fee_quote) = exchange.get_amount_out(Amount::new(50), X, Y) else {
        panic!("quote failed");
    };
    assert!(max_fee_quote < default_quote);
}

#[test]
fn events_follow_committed_operations_only() {
    let (mut exchange, _) = exchange();
    let log = Arc::new(EventLog::new());
    exchange.subscribe(log.clone());

    let Ok(key) = exchange.create_pool(X, Y) else {
        panic!("pool creation failed");
    };
    deposit(&mut exchange, ALICE, 100, 100);
    let _ = exchange.swap_exact_in(Amount::new(10), Amount::new(1_000), X, Y, CAROL);
    let Ok(_) = exchange.swap_exact_in(Amount::new(10), Amount::ZERO, X, Y, CAROL) else {
        panic!("swap failed");
    };
    let Ok(_) = exchange.update_fee(OWNER, 5) else {
        panic!("fee update failed");
    };

    let names: Vec<_> = log.events().iter().map(PoolEvent::name).collect();
    assert_eq!(
        names,
        ["PoolCreated", "LiquidityAdded", "TokenSwapped", "FeeUpdated"]
    );
    assert_eq!(log.events()[1].pool(), Some(key));
}

// ---------------------------------------------------------------------------
// Concurrent host
// ---------------------------------------------------------------------------

#[test]
fn shared_exchange_serializes_per_pool_and_conserves_assets() {
    let assets = funded_assets();
    let Ok(exchange) = SharedExchange::new(config(), Arc::clone(&assets)) else {
        panic!("valid exchange");
    };
    for (a, b) in [(X, Y), (Y, Z)] {
        let Ok(_) = exchange.create_pool(a, b) else {
            panic!("pool creation failed");
        };
        let request = DepositRequest::new(Amount::new(100_000), Amount::new(100_000));
        let Ok(_) = exchange.add_liquidity(a, b, &request, ALICE) else {
            panic!("seed deposit failed");
        };
    }

    std::thread::scope(|scope| {
        for (trader, (asset_in, asset_out)) in [(BOB, (X, Y)), (CAROL, (Z, Y))] {
            let exchange = &exchange;
            scope.spawn(move || {
                for round in 0..50u128 {
                    let (from, to) = if round % 2 == 0 {
                        (asset_in, asset_out)
                    } else {
                        (asset_out, asset_in)
                    };
                    let _ =
                        exchange.swap_exact_in(Amount::new(100), Amount::ZERO, from, to, trader);
                }
            });
        }
    });

    assert_eq!(exchange.audit(), Ok(()));
    for asset in [X, Y, Z] {
        let held: u128 = [ALICE, BOB, CAROL, CUSTODY]
            .iter()
            .map(|account| assets.balance_of(asset, *account).get())
            .sum();
        assert_eq!(held, 3 * FUNDING);
    }
    let custody_y = assets.balance_of(Y, CUSTODY).get();
    let reserves_y = exchange.get_pool_info(Y, X).reserve_a.get()
        + exchange.get_pool_info(Y, Z).reserve_a.get();
    assert_eq!(custody_y, reserves_y);
}
