use thiserror::Error;

/// Errors produced by the sweep engine.
///
/// Only planning-phase conditions and wholesale signer rejection surface
/// through `Result`; everything that goes wrong after signing is captured
/// into per-batch [`crate::ExecutionResult`]s instead.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("RPC request failed: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("account data could not be decoded: {0}")]
    InvalidAccountData(String),

    #[error("signer rejected the batch operation: {0}")]
    SignerRejected(String),

    #[error("signer returned {actual} transactions, expected {expected}")]
    SignerContract { expected: usize, actual: usize },

    #[error(transparent)]
    Instruction(#[from] walletsweep_sdk::InstructionBuilderError),

    #[error(transparent)]
    TransactionBuild(#[from] walletsweep_sdk::TransactionBuilderError),
}
