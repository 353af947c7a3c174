/*!
# Compute Budget Planning and Fee Estimation

Isolated, thoroughly tested math for sizing a batch's compute-unit ceiling
and estimating what it will cost to land on chain.

Underestimating compute units causes a guaranteed on-chain failure
(out-of-compute), while overestimating only wastes a small, bounded
priority fee. Every constant here therefore leans conservative, and all of
them are empirically calibrated tunables rather than physical law.

All money math is integer lamports. SOL floats appear only in display
helpers.
*/

use serde::Serialize;
use solana_sdk::native_token::lamports_to_sol;

/// Fixed per-transaction floor, independent of instruction composition.
pub const BASE_OVERHEAD_UNITS: u64 = 20_000;

/// Idempotent destination-account creation, measured cost.
pub const CREATE_ACCOUNT_UNITS: u64 = 25_000;

/// Token transfer (checked) cost.
pub const TRANSFER_UNITS: u64 = 6_000;

/// Source-account close cost. Unused by the sweep planner, which leaves
/// source accounts open, but part of the estimator's general contract.
pub const CLOSE_ACCOUNT_UNITS: u64 = 3_000;

/// Absolute floor for any transaction we emit.
pub const MIN_COMPUTE_UNITS: u64 = 50_000;

/// Per-asset floor for multi-asset batches.
pub const PER_ASSET_FLOOR_UNITS: u64 = 40_000;

/// The ledger's hard per-transaction compute ceiling. A transaction
/// declaring more than this is unsubmittable.
pub const MAX_COMPUTE_UNITS: u64 = 1_400_000;

/// Per-transaction signature fee.
pub const BASE_SIGNATURE_FEE_LAMPORTS: u64 = 5_000;

/// Conservative flat estimate used when fee arithmetic overflows.
pub const FALLBACK_FLAT_FEE_LAMPORTS: u64 = 15_000;

/// Marginal per-account overhead applied per additional asset in a batch.
const MARGINAL_OVERHEAD_PER_ASSET: f64 = 0.03;

/// Cap on the accumulated marginal overhead.
const MARGINAL_OVERHEAD_CAP: f64 = 0.30;

/// Operation composition of a batch, the input to [`plan_compute_units`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub creates: usize,
    pub transfers: usize,
    pub closes: usize,
}

impl OpCounts {
    pub fn instruction_count(&self) -> usize {
        self.creates + self.transfers + self.closes
    }
}

/// Compute-unit ceiling for a batch with the given operation composition
/// touching `asset_count` distinct assets.
///
/// The estimate is monotonically non-decreasing in instruction count and
/// always lies within `[max(MIN_COMPUTE_UNITS, asset_count * 40_000),
/// MAX_COMPUTE_UNITS]`.
pub fn plan_compute_units(ops: &OpCounts, asset_count: usize) -> u32 {
    let raw = BASE_OVERHEAD_UNITS
        + ops.creates as u64 * CREATE_ACCOUNT_UNITS
        + ops.transfers as u64 * TRANSFER_UNITS
        + ops.closes as u64 * CLOSE_ACCOUNT_UNITS;

    // Per-account marginal overhead grows slightly non-linearly with the
    // number of assets packed into one transaction.
    let marginal = (asset_count.saturating_sub(1) as f64 * MARGINAL_OVERHEAD_PER_ASSET)
        .min(MARGINAL_OVERHEAD_CAP);

    let buffer = safety_buffer(asset_count);
    let estimated = (raw as f64 * (1.0 + marginal) * buffer) as u64;

    let floor = MIN_COMPUTE_UNITS
        .max(asset_count as u64 * PER_ASSET_FLOOR_UNITS)
        .min(MAX_COMPUTE_UNITS);

    estimated.clamp(floor, MAX_COMPUTE_UNITS) as u32
}

fn safety_buffer(asset_count: usize) -> f64 {
    if asset_count > 10 {
        2.0
    } else if asset_count > 5 {
        1.8
    } else {
        1.5
    }
}

/// Estimated cost of one batch, in lamports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub base_fee_lamports: u64,
    pub compute_unit_fee_lamports: u64,
    pub total_lamports: u64,
}

impl FeeQuote {
    /// Flat conservative quote used when estimation arithmetic fails.
    pub fn flat_fallback() -> Self {
        Self {
            base_fee_lamports: BASE_SIGNATURE_FEE_LAMPORTS,
            compute_unit_fee_lamports: FALLBACK_FLAT_FEE_LAMPORTS - BASE_SIGNATURE_FEE_LAMPORTS,
            total_lamports: FALLBACK_FLAT_FEE_LAMPORTS,
        }
    }

    pub fn total_sol(&self) -> f64 {
        lamports_to_sol(self.total_lamports)
    }
}

/// Estimate the fee for a batch declaring `compute_units` at
/// `cu_price_micro_lamports` per unit.
///
/// Never fails: if the arithmetic overflows (absurd unit price), the
/// estimator degrades to [`FeeQuote::flat_fallback`] so that fee
/// estimation can never block batch construction.
pub fn estimate_fee(compute_units: u32, cu_price_micro_lamports: u64) -> FeeQuote {
    let compute_unit_fee = (compute_units as u64)
        .checked_mul(cu_price_micro_lamports)
        .map(|micro| micro.div_ceil(1_000_000));

    match compute_unit_fee
        .and_then(|fee| BASE_SIGNATURE_FEE_LAMPORTS.checked_add(fee).map(|t| (fee, t)))
    {
        Some((compute_unit_fee_lamports, total_lamports)) => FeeQuote {
            base_fee_lamports: BASE_SIGNATURE_FEE_LAMPORTS,
            compute_unit_fee_lamports,
            total_lamports,
        },
        None => FeeQuote::flat_fallback(),
    }
}
