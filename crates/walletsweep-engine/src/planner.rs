/*!
# Batch Planner

Turns a wallet snapshot into an ordered list of size-validated, unsigned
transaction batches: one batch per asset chunk (chunk size 1 by default),
then an optional SOL sweep batch.

Planning is two-pass by necessity: the sweep amount cannot be computed
until every asset batch has been planned and fee-estimated, because the
sweep must leave enough behind to pay for those batches and for the rent
of any destination accounts that still need creating.

Planning is side-effect free. Its only reads are the balance snapshot,
one blockhash, destination-account existence checks, and the rent figure;
nothing is submitted here.
*/

use solana_sdk::{hash::Hash, instruction::Instruction, program_pack::Pack, pubkey::Pubkey};
use tracing::{debug, info, warn};
use walletsweep_sdk::{
    build_asset_transfer_ix, build_compute_budget_ixs, build_create_destination_account_ix,
    build_native_transfer_ix, build_unsigned_transaction, estimate_fee,
    find_associated_token_address, plan_compute_units, validate_transaction_size, OpCounts,
    TransactionBuilderError,
};

use crate::{
    batch::{BatchKind, PlannedBatch, SkippedAsset},
    config::SweepConfig,
    error::SweepError,
    ledger::LedgerRpc,
    resolver::{AccountResolver, AssetHolding},
};

/// Remainders at or below this are left behind rather than swept.
pub const NATIVE_DUST_THRESHOLD_LAMPORTS: u64 = 10_000_000; // 0.01 SOL

/// The complete plan for one run.
///
/// All batches share one recent blockhash, fetched once per planning
/// pass. If execution is delayed past that blockhash's validity window,
/// every remaining unexecuted batch expires at once; callers wanting
/// long-running dispatch should re-plan instead of re-submitting.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Asset batches in holdings order, native sweep last.
    pub batches: Vec<PlannedBatch>,
    /// Assets excluded because their minimum instruction set exceeded
    /// the byte ceiling.
    pub skipped: Vec<SkippedAsset>,
    pub holdings_count: usize,
    pub native_balance: u64,
    /// Lamports moved by the native sweep batch, 0 if none was emitted.
    pub native_sweep_lamports: u64,
    pub rent_for_new_accounts_lamports: u64,
    /// Estimated fees across all emitted batches, native sweep included.
    pub total_estimated_fee_lamports: u64,
}

impl SweepPlan {
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

enum AssetBatchOutcome {
    Planned { batch: PlannedBatch, creates: usize },
    Oversized { size: usize, max: usize },
}

pub struct BatchPlanner<'a> {
    ledger: &'a dyn LedgerRpc,
    config: &'a SweepConfig,
}

impl<'a> BatchPlanner<'a> {
    pub fn new(ledger: &'a dyn LedgerRpc, config: &'a SweepConfig) -> Self {
        Self { ledger, config }
    }

    /// Plan the full sweep of `owner`'s balances to `destination`.
    ///
    /// Errors here are planning-fatal (RPC unreachable, instruction
    /// construction failure). A single asset overflowing the byte
    /// ceiling is not: it lands in [`SweepPlan::skipped`] and its
    /// siblings plan normally. An empty plan is a valid terminal state,
    /// not an error.
    pub async fn plan(
        &self,
        owner: &Pubkey,
        destination: &Pubkey,
    ) -> Result<SweepPlan, SweepError> {
        let resolved = AccountResolver::new(self.ledger).resolve(owner).await?;
        let recent_blockhash = self.ledger.get_latest_blockhash().await?;

        let mut batches: Vec<PlannedBatch> = Vec::new();
        let mut skipped: Vec<SkippedAsset> = Vec::new();
        let mut creates_needed = 0usize;
        let mut asset_fees: u64 = 0;

        let chunk_size = self.config.batch_size.max(1);
        for group in resolved.holdings.chunks(chunk_size) {
            let outcome = self
                .plan_asset_batch(owner, destination, group, recent_blockhash, batches.len())
                .await?;
            match outcome {
                AssetBatchOutcome::Planned { batch, creates } => {
                    creates_needed += creates;
                    asset_fees += batch.fee.total_lamports;
                    batches.push(batch);
                }
                AssetBatchOutcome::Oversized { size, max } => {
                    let reason = format!("serialized to {size} bytes (max {max})");
                    warn!(%reason, assets = group.len(), "excluding oversized batch");
                    for holding in group {
                        skipped.push(SkippedAsset {
                            mint: holding.mint,
                            reason: reason.clone(),
                        });
                    }
                }
            }
        }

        // Rent for destination accounts that still need creating comes out
        // of the sweepable balance, as do the asset batches' fees.
        let rent_for_new_accounts = if creates_needed > 0 {
            let per_account = self
                .ledger
                .get_minimum_balance_for_rent_exemption(spl_token::state::Account::LEN)
                .await?;
            per_account * creates_needed as u64
        } else {
            0
        };

        let mut total_fees = asset_fees;
        let mut native_sweep_lamports = 0u64;
        if self.config.include_native {
            let spendable = resolved
                .native_balance
                .saturating_sub(self.config.native_reserve_lamports)
                .saturating_sub(asset_fees)
                .saturating_sub(rent_for_new_accounts);

            if spendable > NATIVE_DUST_THRESHOLD_LAMPORTS {
                let batch = self.plan_native_batch(
                    owner,
                    destination,
                    spendable,
                    recent_blockhash,
                    batches.len(),
                )?;
                total_fees += batch.fee.total_lamports;
                native_sweep_lamports = spendable;
                batches.push(batch);
            } else if spendable > 0 {
                debug!(spendable, "native remainder below dust threshold, not sweeping");
            }
        }

        info!(
            batches = batches.len(),
            skipped = skipped.len(),
            native_sweep_lamports,
            total_estimated_fee_lamports = total_fees,
            "planned sweep"
        );

        Ok(SweepPlan {
            batches,
            skipped,
            holdings_count: resolved.holdings.len(),
            native_balance: resolved.native_balance,
            native_sweep_lamports,
            rent_for_new_accounts_lamports: rent_for_new_accounts,
            total_estimated_fee_lamports: total_fees,
        })
    }

    async fn plan_asset_batch(
        &self,
        owner: &Pubkey,
        destination: &Pubkey,
        group: &[AssetHolding],
        recent_blockhash: Hash,
        index: usize,
    ) -> Result<AssetBatchOutcome, SweepError> {
        let mut ops = OpCounts::default();
        let mut operations: Vec<Instruction> = Vec::with_capacity(group.len() * 2);
        let mut creates = 0usize;

        for holding in group {
            let destination_account = find_associated_token_address(destination, &holding.mint);

            let exists = match self.ledger.account_exists(&destination_account).await {
                Ok(exists) => exists,
                Err(err) => {
                    // Optimistic: a spurious create is an on-chain no-op,
                    // while skipping a required create breaks the transfer.
                    warn!(
                        mint = %holding.mint,
                        %err,
                        "existence check failed, assuming destination account must be created"
                    );
                    false
                }
            };
            if !exists {
                operations.push(build_create_destination_account_ix(
                    owner,
                    destination,
                    &holding.mint,
                ));
                ops.creates += 1;
                creates += 1;
            }

            operations.push(build_asset_transfer_ix(
                &holding.source_account,
                &holding.mint,
                &destination_account,
                owner,
                holding.raw_amount,
                holding.decimals,
            )?);
            ops.transfers += 1;
            // No close instruction: source accounts stay open, keeping
            // their rent, so an emptied-account close can never fail the
            // batch.
        }

        let compute_unit_limit = plan_compute_units(&ops, group.len());
        let price = self.config.compute_unit_price_micro_lamports;

        let mut instructions = build_compute_budget_ixs(compute_unit_limit, price).to_vec();
        instructions.extend(operations);

        let transaction = build_unsigned_transaction(&instructions, owner, recent_blockhash)?;
        match validate_transaction_size(&transaction, self.config.max_transaction_size_bytes) {
            Ok(size) => {
                debug!(index, size, compute_unit_limit, "planned asset batch");
            }
            Err(TransactionBuilderError::TransactionTooLarge { size, max }) => {
                return Ok(AssetBatchOutcome::Oversized { size, max });
            }
            Err(other) => return Err(other.into()),
        }

        let label = match group {
            [holding] => format!("transfer {} units of mint {}", holding.raw_amount, holding.mint),
            _ => format!("transfer {} assets", group.len()),
        };

        Ok(AssetBatchOutcome::Planned {
            batch: PlannedBatch {
                index,
                kind: BatchKind::AssetTransfer,
                label,
                mint: match group {
                    [holding] => Some(holding.mint),
                    _ => None,
                },
                accounts_processed: group.len(),
                instructions,
                transaction,
                compute_unit_limit,
                fee: estimate_fee(compute_unit_limit, price),
            },
            creates,
        })
    }

    fn plan_native_batch(
        &self,
        owner: &Pubkey,
        destination: &Pubkey,
        lamports: u64,
        recent_blockhash: Hash,
        index: usize,
    ) -> Result<PlannedBatch, SweepError> {
        let ops = OpCounts {
            transfers: 1,
            ..OpCounts::default()
        };
        let compute_unit_limit = plan_compute_units(&ops, 0);
        let price = self.config.compute_unit_price_micro_lamports;

        let mut instructions = build_compute_budget_ixs(compute_unit_limit, price).to_vec();
        instructions.push(build_native_transfer_ix(owner, destination, lamports));

        let transaction = build_unsigned_transaction(&instructions, owner, recent_blockhash)?;
        validate_transaction_size(&transaction, self.config.max_transaction_size_bytes)?;

        Ok(PlannedBatch {
            index,
            kind: BatchKind::NativeSweep,
            label: format!("sweep {lamports} lamports"),
            mint: None,
            accounts_processed: 1,
            instructions,
            transaction,
            compute_unit_limit,
            fee: estimate_fee(compute_unit_limit, price),
        })
    }
}
