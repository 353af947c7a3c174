mod common;

use common::{MockLedger, RENT_EXEMPT_LAMPORTS};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use walletsweep_engine::{
    BatchKind, BatchPlanner, SweepConfig, NATIVE_DUST_THRESHOLD_LAMPORTS,
};
use walletsweep_sdk::{find_associated_token_address, serialized_transaction_size};

const SOL: u64 = 1_000_000_000;

// spl-token instruction tags
const TRANSFER_CHECKED_TAG: u8 = 12;
const CLOSE_ACCOUNT_TAG: u8 = 9;

fn count_creates(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .filter(|ix| ix.program_id == spl_associated_token_account::id())
        .count()
}

fn count_token_ixs_with_tag(instructions: &[Instruction], tag: u8) -> usize {
    instructions
        .iter()
        .filter(|ix| ix.program_id == spl_token::id() && ix.data.first() == Some(&tag))
        .count()
}

#[tokio::test]
async fn test_one_batch_per_asset_with_expected_composition() {
    let ledger = MockLedger::new()
        .with_holding(Pubkey::new_unique(), 100, 6)
        .with_holding(Pubkey::new_unique(), 200, 9)
        .with_holding(Pubkey::new_unique(), 300, 0);
    let config = SweepConfig::default();

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 3);
    assert_eq!(plan.holdings_count, 3);
    assert!(plan.skipped.is_empty());

    for (i, batch) in plan.batches.iter().enumerate() {
        assert_eq!(batch.index, i);
        assert_eq!(batch.kind, BatchKind::AssetTransfer);
        assert_eq!(batch.accounts_processed, 1);
        assert!(batch.mint.is_some());

        // At most one create, exactly one transfer, never a close.
        assert_eq!(count_creates(&batch.instructions), 1);
        assert_eq!(
            count_token_ixs_with_tag(&batch.instructions, TRANSFER_CHECKED_TAG),
            1
        );
        assert_eq!(
            count_token_ixs_with_tag(&batch.instructions, CLOSE_ACCOUNT_TAG),
            0
        );

        assert!(batch.compute_unit_limit >= 50_000);
        assert!(batch.compute_unit_limit <= 1_400_000);
    }
}

#[tokio::test]
async fn test_existing_destination_skips_create() {
    let mint = Pubkey::new_unique();
    let destination = Pubkey::new_unique();
    let destination_account = find_associated_token_address(&destination, &mint);

    let ledger = MockLedger::new()
        .with_holding(mint, 1_000, 6)
        .with_existing_account(destination_account);
    let config = SweepConfig::default();

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &destination)
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 1);
    assert_eq!(count_creates(&plan.batches[0].instructions), 0);
    assert_eq!(plan.rent_for_new_accounts_lamports, 0);
}

#[tokio::test]
async fn test_failed_existence_check_degrades_to_create() {
    let mint = Pubkey::new_unique();
    let destination = Pubkey::new_unique();

    let mut ledger = MockLedger::new()
        .with_holding(mint, 1_000, 6)
        .with_existing_account(find_associated_token_address(&destination, &mint));
    ledger.fail_existence_checks = true;

    let config = SweepConfig::default();
    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &destination)
        .await
        .unwrap();

    // The check failed, so the planner assumes the account is missing and
    // includes the (idempotent, therefore harmless) create.
    assert_eq!(count_creates(&plan.batches[0].instructions), 1);
    assert_eq!(plan.rent_for_new_accounts_lamports, RENT_EXEMPT_LAMPORTS);
}

#[tokio::test]
async fn test_native_sweep_amount_reserves_fees_and_rent() {
    let ledger = MockLedger::new()
        .with_holding(Pubkey::new_unique(), 500, 6)
        .with_native_balance(SOL);
    let config = SweepConfig::default();

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 2);
    let native = plan.batches.last().unwrap();
    assert_eq!(native.kind, BatchKind::NativeSweep);

    let asset_fee = plan.batches[0].fee.total_lamports;
    let expected = SOL
        - config.native_reserve_lamports
        - asset_fee
        - plan.rent_for_new_accounts_lamports;
    assert_eq!(plan.native_sweep_lamports, expected);
    assert_eq!(plan.rent_for_new_accounts_lamports, RENT_EXEMPT_LAMPORTS);
    assert!(native.label.contains(&expected.to_string()));

    // Never more than balance minus reserve.
    assert!(plan.native_sweep_lamports <= SOL - config.native_reserve_lamports);
}

#[tokio::test]
async fn test_empty_wallet_yields_empty_plan() {
    let ledger = MockLedger::new().with_native_balance(1_000_000); // 0.001 SOL
    let config = SweepConfig::default();

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.native_sweep_lamports, 0);
    assert_eq!(plan.total_estimated_fee_lamports, 0);
}

#[tokio::test]
async fn test_native_excluded_when_disabled() {
    let ledger = MockLedger::new()
        .with_holding(Pubkey::new_unique(), 100, 6)
        .with_holding(Pubkey::new_unique(), 200, 6)
        .with_native_balance(5 * SOL);
    let config = SweepConfig {
        include_native: false,
        ..SweepConfig::default()
    };

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 2);
    assert!(plan
        .batches
        .iter()
        .all(|b| b.kind == BatchKind::AssetTransfer));
    assert_eq!(plan.native_sweep_lamports, 0);
}

#[tokio::test]
async fn test_sweep_amount_monotone_in_reserve() {
    async fn sweep_with_reserve(reserve: u64) -> u64 {
        let ledger = MockLedger::new()
            .with_holding(Pubkey::new_unique(), 100, 6)
            .with_native_balance(2 * SOL);
        let config = SweepConfig {
            native_reserve_lamports: reserve,
            ..SweepConfig::default()
        };
        BatchPlanner::new(&ledger, &config)
            .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
            .await
            .unwrap()
            .native_sweep_lamports
    }

    let mut previous = u64::MAX;
    for reserve in [0u64, 10_000_000, 100_000_000, SOL, 3 * SOL] {
        let swept = sweep_with_reserve(reserve).await;
        assert!(swept <= previous, "sweep not monotone at reserve {reserve}");
        previous = swept;
    }
}

#[tokio::test]
async fn test_remainder_at_dust_threshold_is_not_swept() {
    let config = SweepConfig::default();

    // Spendable exactly at the threshold: no sweep batch.
    let ledger = MockLedger::new()
        .with_native_balance(config.native_reserve_lamports + NATIVE_DUST_THRESHOLD_LAMPORTS);
    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();
    assert!(plan.is_empty());

    // One lamport above: swept.
    let ledger = MockLedger::new()
        .with_native_balance(config.native_reserve_lamports + NATIVE_DUST_THRESHOLD_LAMPORTS + 1);
    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();
    assert_eq!(plan.batches.len(), 1);
    assert_eq!(
        plan.native_sweep_lamports,
        NATIVE_DUST_THRESHOLD_LAMPORTS + 1
    );
}

#[tokio::test]
async fn test_planning_twice_is_structurally_identical() {
    let ledger = MockLedger::new()
        .with_holding(Pubkey::new_unique(), 100, 6)
        .with_holding(Pubkey::new_unique(), 200, 6)
        .with_native_balance(SOL);
    let config = SweepConfig::default();
    let owner = Pubkey::new_unique();
    let destination = Pubkey::new_unique();

    let planner = BatchPlanner::new(&ledger, &config);
    let first = planner.plan(&owner, &destination).await.unwrap();
    let second = planner.plan(&owner, &destination).await.unwrap();

    assert_eq!(first.batches.len(), second.batches.len());
    for (a, b) in first.batches.iter().zip(&second.batches) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.instructions, b.instructions);
        // Same structure, fresh blockhash.
        assert_ne!(
            a.transaction.message.recent_blockhash,
            b.transaction.message.recent_blockhash
        );
    }
}

#[tokio::test]
async fn test_oversized_asset_is_skipped_without_affecting_siblings() {
    let small_mint = Pubkey::new_unique();
    let big_mint = Pubkey::new_unique();
    let destination = Pubkey::new_unique();

    // The small asset's destination account exists (no create needed), the
    // big one's does not, so its batch serializes larger.
    let make_ledger = || {
        MockLedger::new()
            .with_holding(small_mint, 100, 6)
            .with_holding(big_mint, 200, 6)
            .with_existing_account(find_associated_token_address(&destination, &small_mint))
    };

    let owner = Pubkey::new_unique();
    let config = SweepConfig::default();
    let ledger = make_ledger();
    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&owner, &destination)
        .await
        .unwrap();

    let small_size = serialized_transaction_size(&plan.batches[0].transaction).unwrap();
    let big_size = serialized_transaction_size(&plan.batches[1].transaction).unwrap();
    assert!(small_size < big_size);

    // Re-plan with a ceiling only the smaller batch fits under.
    let config = SweepConfig {
        max_transaction_size_bytes: (small_size + big_size) / 2,
        ..SweepConfig::default()
    };
    let ledger = make_ledger();
    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&owner, &destination)
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 1);
    assert_eq!(plan.batches[0].mint, Some(small_mint));
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].mint, big_mint);
    assert!(plan.skipped[0].reason.contains("bytes"));
}

#[tokio::test]
async fn test_multi_asset_chunking() {
    let ledger = MockLedger::new()
        .with_holding(Pubkey::new_unique(), 1, 6)
        .with_holding(Pubkey::new_unique(), 2, 6)
        .with_holding(Pubkey::new_unique(), 3, 6);
    let config = SweepConfig {
        batch_size: 2,
        ..SweepConfig::default()
    };

    let plan = BatchPlanner::new(&ledger, &config)
        .plan(&Pubkey::new_unique(), &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(plan.batches.len(), 2);
    assert_eq!(plan.batches[0].accounts_processed, 2);
    assert_eq!(plan.batches[0].mint, None);
    assert_eq!(plan.batches[1].accounts_processed, 1);
    assert_eq!(
        count_token_ixs_with_tag(&plan.batches[0].instructions, TRANSFER_CHECKED_TAG),
        2
    );
}
