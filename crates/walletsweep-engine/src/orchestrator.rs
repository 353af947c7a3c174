use solana_sdk::{native_token::lamports_to_sol, pubkey::Pubkey, transaction::Transaction};
use std::sync::Arc;
use tracing::info;

use crate::{
    batch::{BatchKind, BatchSummary, ExecutionResult, SkippedAsset},
    config::SweepConfig,
    error::SweepError,
    executor::BatchExecutor,
    ledger::LedgerRpc,
    planner::BatchPlanner,
    signer::SweepSigner,
};

/// What a sweep run produced, partial failures included.
///
/// `success` is true only when every dispatched batch succeeded. Partial
/// success is an expected terminal state and never surfaces as an error;
/// inspect `summary` rather than relying on `Result`.
#[derive(Debug)]
pub struct SweepOutcome {
    pub success: bool,
    /// Human-readable one-line summary, present even on partial failure.
    pub message: String,
    pub results: Vec<ExecutionResult>,
    pub summary: BatchSummary,
    /// Token accounts whose transfer batch succeeded.
    pub assets_transferred: usize,
    pub native_swept_lamports: u64,
    pub estimated_fee_lamports: u64,
    pub skipped: Vec<SkippedAsset>,
}

/// Top-level façade: resolve → plan → sign once → execute → summarize.
pub struct SweepOrchestrator {
    ledger: Arc<dyn LedgerRpc>,
    config: SweepConfig,
}

impl SweepOrchestrator {
    pub fn new(ledger: Arc<dyn LedgerRpc>) -> Self {
        Self::with_config(ledger, SweepConfig::default())
    }

    pub fn with_config(ledger: Arc<dyn LedgerRpc>, config: SweepConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Move every token balance and the sweepable SOL remainder from
    /// `owner` to `destination`.
    ///
    /// Fails fast only on conditions that make planning impossible or on
    /// wholesale signer rejection. Everything after signing is captured
    /// into per-batch results.
    pub async fn sweep(
        &self,
        owner: &Pubkey,
        destination: &Pubkey,
        signer: &dyn SweepSigner,
    ) -> Result<SweepOutcome, SweepError> {
        // 1. Plan all batches against one balance snapshot.
        let planner = BatchPlanner::new(self.ledger.as_ref(), &self.config);
        let plan = planner.plan(owner, destination).await?;

        if plan.is_empty() {
            info!(%owner, "nothing to transfer");
            return Ok(SweepOutcome {
                success: true,
                message: "nothing to transfer".to_string(),
                results: Vec::new(),
                summary: BatchSummary::from_results(&[]),
                assets_transferred: 0,
                native_swept_lamports: 0,
                estimated_fee_lamports: 0,
                skipped: plan.skipped,
            });
        }

        // 2. One signing pass over the whole run.
        let unsigned: Vec<Transaction> = plan
            .batches
            .iter()
            .map(|batch| batch.transaction.clone())
            .collect();
        let expected = unsigned.len();
        let signed = signer.sign_all(unsigned).await?;
        if signed.len() != expected {
            return Err(SweepError::SignerContract {
                expected,
                actual: signed.len(),
            });
        }

        // 3. Dispatch and confirm.
        let executor = BatchExecutor::new(self.ledger.as_ref(), &self.config);
        let results = executor.execute(&plan.batches, signed).await;

        // 4. Aggregate.
        let summary = BatchSummary::from_results(&results);
        let assets_transferred: usize = plan
            .batches
            .iter()
            .zip(&results)
            .filter(|(batch, result)| batch.kind == BatchKind::AssetTransfer && result.success)
            .map(|(batch, _)| batch.accounts_processed)
            .sum();
        let native_swept_lamports = plan
            .batches
            .iter()
            .zip(&results)
            .any(|(batch, result)| batch.kind == BatchKind::NativeSweep && result.success)
            .then_some(plan.native_sweep_lamports)
            .unwrap_or(0);

        let mut message = format!(
            "transferred {} asset(s) and {:.9} SOL in {}/{} batch(es), estimated fees {:.9} SOL",
            assets_transferred,
            lamports_to_sol(native_swept_lamports),
            summary.successful_batches,
            summary.total_batches,
            lamports_to_sol(plan.total_estimated_fee_lamports),
        );
        if !plan.skipped.is_empty() {
            message.push_str(&format!(", {} asset(s) skipped", plan.skipped.len()));
        }

        info!(
            success = summary.all_succeeded(),
            successful = summary.successful_batches,
            failed = summary.failed_batches,
            "sweep finished"
        );

        Ok(SweepOutcome {
            success: summary.all_succeeded(),
            message,
            results,
            summary,
            assets_transferred,
            native_swept_lamports,
            estimated_fee_lamports: plan.total_estimated_fee_lamports,
            skipped: plan.skipped,
        })
    }
}
