use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer as _,
    transaction::Transaction,
};

use crate::error::SweepError;

/// Signing capability owned by the caller.
///
/// The engine hands over every unsigned transaction of a run in a single
/// call so wallet-style signers can prompt once. Implementations must
/// return the same number of transactions in the same order, or reject
/// the whole operation with an error; partial signing is not assumed.
#[async_trait]
pub trait SweepSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    async fn sign_all(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, SweepError>;
}

/// Local keypair signer for backend and CLI use.
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl SweepSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_all(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, SweepError> {
        let mut signed = Vec::with_capacity(transactions.len());
        for mut transaction in transactions {
            let blockhash = transaction.message.recent_blockhash;
            transaction
                .try_sign(&[&self.keypair], blockhash)
                .map_err(|e| SweepError::SignerRejected(e.to_string()))?;
            signed.push(transaction);
        }
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{hash::Hash, system_instruction};
    use walletsweep_sdk::build_unsigned_transaction;

    fn unsigned_transfer(from: &Pubkey, lamports: u64) -> Transaction {
        let ix = system_instruction::transfer(from, &Pubkey::new_unique(), lamports);
        build_unsigned_transaction(&[ix], from, Hash::new_unique()).unwrap()
    }

    #[test]
    fn test_sign_all_preserves_length_and_order() {
        let signer = KeypairSigner::new(Keypair::new());
        let owner = signer.pubkey();

        let unsigned: Vec<Transaction> =
            (1..=4).map(|i| unsigned_transfer(&owner, i * 100)).collect();
        let messages: Vec<_> = unsigned.iter().map(|tx| tx.message.clone()).collect();

        let signed = tokio_test::block_on(signer.sign_all(unsigned)).unwrap();

        assert_eq!(signed.len(), 4);
        for (i, tx) in signed.iter().enumerate() {
            // signed[i] corresponds to unsigned[i]
            assert_eq!(tx.message, messages[i]);
            assert!(tx.is_signed());
        }
    }

    #[test]
    fn test_sign_all_rejects_foreign_payer() {
        let signer = KeypairSigner::new(Keypair::new());
        let stranger = Pubkey::new_unique();

        let result = tokio_test::block_on(signer.sign_all(vec![unsigned_transfer(&stranger, 1)]));
        assert!(matches!(result, Err(SweepError::SignerRejected(_))));
    }
}
