use solana_sdk::{commitment_config::CommitmentConfig, packet::PACKET_DATA_SIZE};
use std::time::Duration;

/// Configuration for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Assets packed into each transaction batch.
    ///
    /// Defaults to 1: one batch per asset eliminates the bin-packing
    /// problem entirely (an oversized asset can be skipped without
    /// re-splitting) at the cost of more transactions.
    pub batch_size: usize,

    /// Whether to append a SOL sweep batch after the asset batches.
    pub include_native: bool,

    /// Lamports left behind in the source wallet, on top of estimated
    /// fees and rent for new destination accounts.
    pub native_reserve_lamports: u64,

    /// Serialized transaction byte ceiling. Batches over this are
    /// reported and skipped, never submitted.
    pub max_transaction_size_bytes: usize,

    /// Dispatch batches one at a time (with `inter_batch_delay` between
    /// them) instead of concurrently.
    pub execute_in_sequence: bool,

    /// Await confirmation for each batch after submission.
    pub confirm_transactions: bool,

    /// Skip preflight simulation on submission.
    pub skip_preflight: bool,

    /// Commitment used for preflight simulation.
    pub preflight_commitment: CommitmentConfig,

    /// Commitment awaited when confirming.
    pub confirmation_commitment: CommitmentConfig,

    /// Pause between sequential dispatches, to stay under upstream RPC
    /// rate limits.
    pub inter_batch_delay: Duration,

    /// Priority-fee price in micro-lamports per compute unit, applied to
    /// every batch.
    pub compute_unit_price_micro_lamports: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            include_native: true,
            native_reserve_lamports: 10_000_000, // 0.01 SOL
            max_transaction_size_bytes: PACKET_DATA_SIZE,
            execute_in_sequence: true,
            confirm_transactions: true,
            skip_preflight: false,
            preflight_commitment: CommitmentConfig::confirmed(),
            confirmation_commitment: CommitmentConfig::confirmed(),
            inter_batch_delay: Duration::from_millis(500),
            compute_unit_price_micro_lamports: 1_000,
        }
    }
}
