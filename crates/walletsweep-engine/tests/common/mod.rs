#![allow(dead_code)]

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::collections::HashSet;
use std::sync::Mutex;
use walletsweep_engine::{AssetHolding, LedgerRpc, SweepError};

/// Default rent-exempt balance for a 165-byte token account.
pub const RENT_EXEMPT_LAMPORTS: u64 = 2_039_280;

/// In-memory ledger driving the engine through every scenario without a
/// validator. Send/confirm failures are scripted by call index.
pub struct MockLedger {
    pub native_balance: u64,
    pub holdings: Vec<AssetHolding>,
    pub existing_accounts: HashSet<Pubkey>,
    pub rent_exempt_lamports: u64,
    /// When set, every `account_exists` call errors (the planner must
    /// degrade to "assume creation needed").
    pub fail_existence_checks: bool,
    /// Indices of `send_transaction` calls that fail.
    pub fail_sends: HashSet<usize>,
    /// Indices of `confirm_transaction` calls that report unconfirmed.
    pub fail_confirms: HashSet<usize>,

    sent: Mutex<Vec<Transaction>>,
    send_calls: Mutex<usize>,
    confirm_calls: Mutex<usize>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            native_balance: 0,
            holdings: Vec::new(),
            existing_accounts: HashSet::new(),
            rent_exempt_lamports: RENT_EXEMPT_LAMPORTS,
            fail_existence_checks: false,
            fail_sends: HashSet::new(),
            fail_confirms: HashSet::new(),
            sent: Mutex::new(Vec::new()),
            send_calls: Mutex::new(0),
            confirm_calls: Mutex::new(0),
        }
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_balance(mut self, lamports: u64) -> Self {
        self.native_balance = lamports;
        self
    }

    pub fn with_holding(mut self, mint: Pubkey, raw_amount: u64, decimals: u8) -> Self {
        self.holdings.push(AssetHolding {
            source_account: Pubkey::new_unique(),
            mint,
            raw_amount,
            decimals,
        });
        self
    }

    pub fn with_existing_account(mut self, account: Pubkey) -> Self {
        self.existing_accounts.insert(account);
        self
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn confirm_call_count(&self) -> usize {
        *self.confirm_calls.lock().unwrap()
    }
}

pub fn rpc_error(message: &str) -> SweepError {
    SweepError::Rpc(ClientError {
        request: None,
        kind: ClientErrorKind::Custom(message.to_string()),
    })
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_balance(&self, _account: &Pubkey) -> Result<u64, SweepError> {
        Ok(self.native_balance)
    }

    async fn get_token_holdings(&self, _owner: &Pubkey) -> Result<Vec<AssetHolding>, SweepError> {
        Ok(self.holdings.clone())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, SweepError> {
        Ok(Hash::new_unique())
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        _data_len: usize,
    ) -> Result<u64, SweepError> {
        Ok(self.rent_exempt_lamports)
    }

    async fn account_exists(&self, account: &Pubkey) -> Result<bool, SweepError> {
        if self.fail_existence_checks {
            return Err(rpc_error("existence check unavailable"));
        }
        Ok(self.existing_accounts.contains(account))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        _skip_preflight: bool,
        _preflight_commitment: CommitmentConfig,
    ) -> Result<Signature, SweepError> {
        let call_index = {
            let mut calls = self.send_calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            index
        };

        if self.fail_sends.contains(&call_index) {
            return Err(rpc_error("scripted send failure"));
        }

        self.sent.lock().unwrap().push(transaction.clone());
        Ok(Signature::new_unique())
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> Result<bool, SweepError> {
        let call_index = {
            let mut calls = self.confirm_calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            index
        };
        Ok(!self.fail_confirms.contains(&call_index))
    }
}
