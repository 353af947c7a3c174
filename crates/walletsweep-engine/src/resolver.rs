use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{error::SweepError, ledger::LedgerRpc};

/// One token holding of the source wallet, snapshotted at resolution time.
///
/// `raw_amount` is always greater than zero; zero-balance accounts are
/// filtered during resolution. Staleness between snapshot and execution is
/// accepted risk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHolding {
    /// The token account holding the balance.
    pub source_account: Pubkey,
    /// The asset's mint.
    pub mint: Pubkey,
    /// Balance in the asset's smallest unit.
    pub raw_amount: u64,
    pub decimals: u8,
}

/// Snapshot of everything a wallet holds.
#[derive(Debug, Clone)]
pub struct ResolvedAccounts {
    pub native_balance: u64,
    pub holdings: Vec<AssetHolding>,
}

/// Enumerates a wallet's token holdings and native balance.
pub struct AccountResolver<'a> {
    ledger: &'a dyn LedgerRpc,
}

impl<'a> AccountResolver<'a> {
    pub fn new(ledger: &'a dyn LedgerRpc) -> Self {
        Self { ledger }
    }

    /// Read-only snapshot of `owner`'s balances. RPC failures propagate;
    /// there is no retry at this layer.
    pub async fn resolve(&self, owner: &Pubkey) -> Result<ResolvedAccounts, SweepError> {
        let native_balance = self.ledger.get_balance(owner).await?;
        let holdings: Vec<AssetHolding> = self
            .ledger
            .get_token_holdings(owner)
            .await?
            .into_iter()
            .filter(|holding| holding.raw_amount > 0)
            .collect();

        debug!(
            %owner,
            native_balance,
            holdings = holdings.len(),
            "resolved wallet balances"
        );

        Ok(ResolvedAccounts {
            native_balance,
            holdings,
        })
    }
}
