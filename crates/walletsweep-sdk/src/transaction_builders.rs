/*!
# Transaction Builders

Assembly of unsigned transactions from instruction lists, plus the
serialized-size validation that decides whether a planned batch can be
submitted at all.

Transactions returned here are unsigned; signing is the caller's
responsibility and happens in one pass over all batches of a run.
*/

use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, packet::PACKET_DATA_SIZE,
    pubkey::Pubkey, transaction::Transaction,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionBuilderError {
    #[error("cannot build a transaction with no instructions")]
    NoInstructions,

    #[error("transaction too large: {size} bytes (max {max})")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("transaction serialization failed: {0}")]
    Serialization(String),
}

/// Build an unsigned transaction carrying `instructions`, paid by `payer`,
/// stamped with `recent_blockhash`.
pub fn build_unsigned_transaction(
    instructions: &[Instruction],
    payer: &Pubkey,
    recent_blockhash: Hash,
) -> Result<Transaction, TransactionBuilderError> {
    if instructions.is_empty() {
        return Err(TransactionBuilderError::NoInstructions);
    }

    let message = Message::new_with_blockhash(instructions, Some(payer), &recent_blockhash);
    Ok(Transaction::new_unsigned(message))
}

/// Wire size of `transaction` in bytes.
///
/// `Transaction::new_unsigned` pre-allocates one placeholder signature per
/// required signer, so the size measured here matches the signed wire size.
pub fn serialized_transaction_size(
    transaction: &Transaction,
) -> Result<usize, TransactionBuilderError> {
    bincode::serialize(transaction)
        .map(|bytes| bytes.len())
        .map_err(|e| TransactionBuilderError::Serialization(e.to_string()))
}

/// Validate `transaction` against a byte ceiling, returning its size.
///
/// `max_size` is typically [`PACKET_DATA_SIZE`] or a caller-configured
/// conservative value below it.
pub fn validate_transaction_size(
    transaction: &Transaction,
    max_size: usize,
) -> Result<usize, TransactionBuilderError> {
    let size = serialized_transaction_size(transaction)?;
    if size > max_size {
        return Err(TransactionBuilderError::TransactionTooLarge {
            size,
            max: max_size,
        });
    }
    Ok(size)
}
