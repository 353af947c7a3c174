/*!
# Ledger RPC Façade

[`LedgerRpc`] is the narrow interface the engine needs from a Solana RPC
endpoint. Keeping it a trait lets tests run the whole pipeline against an
in-memory ledger, and lets callers swap in pooled or instrumented clients.

[`RpcLedger`] is the production implementation over
`solana_client::nonblocking::rpc_client::RpcClient`.
*/

use async_trait::async_trait;
use solana_account_decoder::UiAccountData;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig,
    rpc_request::TokenAccountsFilter,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::str::FromStr;
use std::sync::Arc;

use crate::{error::SweepError, resolver::AssetHolding};

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Native balance of `account` in lamports.
    async fn get_balance(&self, account: &Pubkey) -> Result<u64, SweepError>;

    /// Every token holding account owned by `owner`, including
    /// zero-balance accounts. Filtering is the resolver's job.
    async fn get_token_holdings(&self, owner: &Pubkey) -> Result<Vec<AssetHolding>, SweepError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, SweepError>;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, SweepError>;

    async fn account_exists(&self, account: &Pubkey) -> Result<bool, SweepError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
        preflight_commitment: CommitmentConfig,
    ) -> Result<Signature, SweepError>;

    /// True once `signature` has reached `commitment`.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<bool, SweepError>;
}

/// [`LedgerRpc`] backed by a nonblocking [`RpcClient`].
pub struct RpcLedger {
    client: Arc<RpcClient>,
}

impl RpcLedger {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LedgerRpc for RpcLedger {
    async fn get_balance(&self, account: &Pubkey) -> Result<u64, SweepError> {
        Ok(self.client.get_balance(account).await?)
    }

    async fn get_token_holdings(&self, owner: &Pubkey) -> Result<Vec<AssetHolding>, SweepError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await?;

        let mut holdings = Vec::with_capacity(accounts.len());
        for keyed in accounts {
            let source_account = Pubkey::from_str(&keyed.pubkey)
                .map_err(|e| SweepError::InvalidAccountData(e.to_string()))?;
            holdings.push(parse_token_account(source_account, &keyed.account.data)?);
        }
        Ok(holdings)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, SweepError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, SweepError> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }

    async fn account_exists(&self, account: &Pubkey) -> Result<bool, SweepError> {
        let response = self
            .client
            .get_account_with_commitment(account, CommitmentConfig::confirmed())
            .await?;
        Ok(response.value.is_some())
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        skip_preflight: bool,
        preflight_commitment: CommitmentConfig,
    ) -> Result<Signature, SweepError> {
        let config = RpcSendTransactionConfig {
            skip_preflight,
            preflight_commitment: Some(preflight_commitment.commitment),
            ..RpcSendTransactionConfig::default()
        };
        Ok(self
            .client
            .send_transaction_with_config(transaction, config)
            .await?)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<bool, SweepError> {
        let response = self
            .client
            .confirm_transaction_with_commitment(signature, commitment)
            .await?;
        Ok(response.value)
    }
}

/// Decode one jsonParsed token account into an [`AssetHolding`].
fn parse_token_account(
    source_account: Pubkey,
    data: &UiAccountData,
) -> Result<AssetHolding, SweepError> {
    let UiAccountData::Json(parsed) = data else {
        return Err(SweepError::InvalidAccountData(format!(
            "token account {source_account} was not returned jsonParsed"
        )));
    };

    let info = &parsed.parsed["info"];
    let field = |name: &str| {
        info[name].as_str().ok_or_else(|| {
            SweepError::InvalidAccountData(format!(
                "token account {source_account} is missing `{name}`"
            ))
        })
    };

    let mint = Pubkey::from_str(field("mint")?)
        .map_err(|e| SweepError::InvalidAccountData(e.to_string()))?;
    let raw_amount = info["tokenAmount"]["amount"]
        .as_str()
        .unwrap_or("0")
        .parse::<u64>()
        .map_err(|e| SweepError::InvalidAccountData(e.to_string()))?;
    let decimals = info["tokenAmount"]["decimals"].as_u64().ok_or_else(|| {
        SweepError::InvalidAccountData(format!(
            "token account {source_account} is missing `decimals`"
        ))
    })? as u8;

    Ok(AssetHolding {
        source_account,
        mint,
        raw_amount,
        decimals,
    })
}
