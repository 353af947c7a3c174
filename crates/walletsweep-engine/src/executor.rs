/*!
# Batch Executor

Dispatches signed batches and collects one [`ExecutionResult`] per batch.

Failure isolation is the whole design: a batch that fails to submit or
confirm is recorded and the run continues; nothing a batch does can abort
its siblings. There is no automatic retry at this layer either; callers
inspect the summary and decide.

Two strategies:
- *sequential*: submit one at a time with a fixed inter-batch delay, to
  stay under upstream rate limits;
- *concurrent*: fan out all submissions at once and fan the results back
  in. `results[i]` corresponds to `batches[i]` under both.
*/

use futures::future::join_all;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info, warn};

use crate::{
    batch::{ExecutionResult, PlannedBatch},
    config::SweepConfig,
    ledger::LedgerRpc,
};

pub struct BatchExecutor<'a> {
    ledger: &'a dyn LedgerRpc,
    config: &'a SweepConfig,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(ledger: &'a dyn LedgerRpc, config: &'a SweepConfig) -> Self {
        Self { ledger, config }
    }

    /// Dispatch every batch with its signed transaction. `signed[i]` must
    /// be the signed form of `batches[i]`; the orchestrator enforces the
    /// signer's length/order contract before calling this.
    pub async fn execute(
        &self,
        batches: &[PlannedBatch],
        signed: Vec<Transaction>,
    ) -> Vec<ExecutionResult> {
        debug_assert_eq!(batches.len(), signed.len());
        if self.config.execute_in_sequence {
            self.execute_sequential(batches, signed).await
        } else {
            self.execute_concurrent(batches, signed).await
        }
    }

    async fn execute_sequential(
        &self,
        batches: &[PlannedBatch],
        signed: Vec<Transaction>,
    ) -> Vec<ExecutionResult> {
        let total = batches.len();
        let mut results = Vec::with_capacity(total);

        for (i, (batch, transaction)) in batches.iter().zip(signed).enumerate() {
            info!(batch = i + 1, total, label = %batch.label, "dispatching batch");
            results.push(self.dispatch_one(batch, transaction).await);

            if i + 1 < total && !self.config.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.config.inter_batch_delay).await;
            }
        }

        results
    }

    async fn execute_concurrent(
        &self,
        batches: &[PlannedBatch],
        signed: Vec<Transaction>,
    ) -> Vec<ExecutionResult> {
        info!(total = batches.len(), "dispatching batches concurrently");
        let dispatches = batches
            .iter()
            .zip(signed)
            .map(|(batch, transaction)| self.dispatch_one(batch, transaction));
        // join_all preserves input order, so results[i] maps to batches[i]
        // no matter which batch completes first.
        join_all(dispatches).await
    }

    /// Submit and (optionally) confirm one batch. Never fails: every
    /// error is captured into the returned result.
    async fn dispatch_one(
        &self,
        batch: &PlannedBatch,
        transaction: Transaction,
    ) -> ExecutionResult {
        let submitted = self
            .ledger
            .send_transaction(
                &transaction,
                self.config.skip_preflight,
                self.config.preflight_commitment,
            )
            .await;

        let signature = match submitted {
            Ok(signature) => signature,
            Err(err) => {
                warn!(batch = batch.index, label = %batch.label, %err, "submission failed");
                return self.failed(batch, None, err.to_string());
            }
        };

        if self.config.confirm_transactions {
            match self
                .ledger
                .confirm_transaction(&signature, self.config.confirmation_commitment)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    warn!(batch = batch.index, %signature, "transaction was not confirmed");
                    return self.failed(
                        batch,
                        Some(signature),
                        format!("transaction {signature} was not confirmed"),
                    );
                }
                Err(err) => {
                    warn!(batch = batch.index, %signature, %err, "confirmation failed");
                    return self.failed(batch, Some(signature), err.to_string());
                }
            }
        }

        debug!(batch = batch.index, %signature, "batch succeeded");
        ExecutionResult {
            batch_index: batch.index,
            kind: batch.kind,
            label: batch.label.clone(),
            success: true,
            signature: Some(signature),
            error: None,
        }
    }

    fn failed(
        &self,
        batch: &PlannedBatch,
        signature: Option<solana_sdk::signature::Signature>,
        error: String,
    ) -> ExecutionResult {
        ExecutionResult {
            batch_index: batch.index,
            kind: batch.kind,
            label: batch.label.clone(),
            success: false,
            signature,
            error: Some(error),
        }
    }
}
