use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Signature,
    transaction::Transaction};
use std::collections::HashMap;
use std::fmt;
use walletsweep_sdk::FeeQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BatchKind {
    /// One (or a configured chunk of) token asset: optional idempotent
    /// destination-account create plus a transfer.
    AssetTransfer,
    /// The final SOL sweep, computed after fees and rent are known.
    NativeSweep,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchKind::AssetTransfer => write!(f, "asset-transfer"),
            BatchKind::NativeSweep => write!(f, "native-sweep"),
        }
    }
}

/// One planned, size-validated, unsigned transaction batch.
///
/// Immutable once constructed; the planner hands it to the signer and
/// executor exactly once per run.
#[derive(Debug, Clone)]
pub struct PlannedBatch {
    /// Stable position in the plan; `results[index]` corresponds to this
    /// batch regardless of dispatch strategy.
    pub index: usize,
    pub kind: BatchKind,
    pub label: String,
    /// Set for single-asset batches, `None` for the native sweep and for
    /// multi-asset chunks.
    pub mint: Option<Pubkey>,
    pub accounts_processed: usize,
    pub instructions: Vec<Instruction>,
    /// Unsigned; stamped with the blockhash shared by the whole plan.
    pub transaction: Transaction,
    pub compute_unit_limit: u32,
    pub fee: FeeQuote,
}

/// An asset whose minimum instruction set could not fit the transaction
/// byte ceiling. Reported, never fatal for sibling assets.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedAsset {
    pub mint: Pubkey,
    pub reason: String,
}

/// Outcome of dispatching one batch. Append-only per run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub batch_index: usize,
    pub kind: BatchKind,
    pub label: String,
    pub success: bool,
    /// Present when submission succeeded, even if confirmation later
    /// failed.
    pub signature: Option<Signature>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Derived per-run aggregate; recomputed from results, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_batches: usize,
    pub successful_batches: usize,
    pub failed_batches: usize,
    pub per_kind: HashMap<BatchKind, KindCounts>,
}

impl BatchSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let mut per_kind: HashMap<BatchKind, KindCounts> = HashMap::new();
        let mut successful = 0;

        for result in results {
            let counts = per_kind.entry(result.kind).or_default();
            counts.total += 1;
            if result.success {
                counts.successful += 1;
                successful += 1;
            } else {
                counts.failed += 1;
            }
        }

        Self {
            total_batches: results.len(),
            successful_batches: successful,
            failed_batches: results.len() - successful,
            per_kind,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.successful_batches == self.total_batches
    }
}
