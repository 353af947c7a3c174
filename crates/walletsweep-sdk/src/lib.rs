/*!
# Walletsweep SDK

Pure building blocks for planning wallet-sweep transactions: destination
address derivation, instruction construction, compute-budget planning and
fee estimation, and unsigned-transaction assembly.

Nothing in this crate performs RPC calls. Callers provide whatever on-chain
data is needed (recent blockhash, rent figures) and receive unsigned
transactions to sign and send themselves.

## Quick Start

```rust
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use walletsweep_sdk::{
    build_asset_transfer_ix, build_compute_budget_ixs, build_create_destination_account_ix,
    build_unsigned_transaction, estimate_fee, find_associated_token_address, plan_compute_units,
    OpCounts,
};

# fn example() -> Result<(), Box<dyn std::error::Error>> {
let owner = Pubkey::new_unique();
let destination = Pubkey::new_unique();
let mint = Pubkey::new_unique();
let source = Pubkey::new_unique();

let destination_account = find_associated_token_address(&destination, &mint);
let ops = OpCounts { creates: 1, transfers: 1, closes: 0 };
let units = plan_compute_units(&ops, 1);
let fee = estimate_fee(units, 1_000);

let mut instructions = build_compute_budget_ixs(units, 1_000).to_vec();
instructions.push(build_create_destination_account_ix(&owner, &destination, &mint));
instructions.push(build_asset_transfer_ix(
    &source, &mint, &destination_account, &owner, 500, 6,
)?);

let tx = build_unsigned_transaction(&instructions, &owner, Hash::default())?;
assert_eq!(tx.message.instructions.len(), 4);
assert!(fee.total_lamports > 0);
# Ok(())
# }
# example().unwrap();
```
*/

mod address_finders;
mod compute_budget;
mod instruction_builders;
mod transaction_builders;

pub use address_finders::find_associated_token_address;
pub use compute_budget::*;
pub use instruction_builders::*;
pub use transaction_builders::*;
