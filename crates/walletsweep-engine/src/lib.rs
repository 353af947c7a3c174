/*!
# Walletsweep Engine

Batched, fee-aware bulk transfer of everything a wallet holds — every SPL
token balance plus the sweepable SOL remainder — to a destination wallet.

The engine plans one size-validated transaction batch per asset, estimates
fees and rent, derives the SOL sweep amount from what those reservations
leave over, has the caller's signer sign the entire run in one pass, then
dispatches sequentially or concurrently with per-batch failure isolation.

## Quick Start

```no_run
use std::sync::Arc;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use walletsweep_engine::{KeypairSigner, RpcLedger, SweepOrchestrator};

# async fn example() -> Result<(), walletsweep_engine::SweepError> {
let rpc = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let orchestrator = SweepOrchestrator::new(Arc::new(RpcLedger::new(rpc)));

let signer = KeypairSigner::new(Keypair::new());
let destination = Pubkey::new_unique();

let outcome = orchestrator.sweep(&signer.pubkey(), &destination, &signer).await?;
println!("{}", outcome.message);
# Ok(())
# }
```

## Custom Configuration

```no_run
# use std::sync::Arc;
# use solana_client::nonblocking::rpc_client::RpcClient;
use walletsweep_engine::{RpcLedger, SweepConfig, SweepOrchestrator};

# let rpc = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let config = SweepConfig {
    execute_in_sequence: false, // concurrent fan-out
    native_reserve_lamports: 50_000_000,
    ..SweepConfig::default()
};
let orchestrator = SweepOrchestrator::with_config(Arc::new(RpcLedger::new(rpc)), config);
```
*/

mod batch;
mod config;
mod error;
mod executor;
mod ledger;
mod orchestrator;
mod planner;
mod resolver;
mod signer;

pub use batch::{BatchKind, BatchSummary, ExecutionResult, KindCounts, PlannedBatch, SkippedAsset};
pub use config::SweepConfig;
pub use error::SweepError;
pub use executor::BatchExecutor;
pub use ledger::{LedgerRpc, RpcLedger};
pub use orchestrator::{SweepOrchestrator, SweepOutcome};
pub use planner::{BatchPlanner, SweepPlan, NATIVE_DUST_THRESHOLD_LAMPORTS};
pub use resolver::{AccountResolver, AssetHolding, ResolvedAccounts};
pub use signer::{KeypairSigner, SweepSigner};

// Re-export the fee types that appear in public fields.
pub use walletsweep_sdk::FeeQuote;
