use solana_sdk::pubkey::Pubkey;

/// Derive the associated token account that holds `mint` balances for
/// `wallet`. Pure function over the two keys; the same inputs always
/// produce the same address.
pub fn find_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(wallet, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let first = find_associated_token_address(&wallet, &mint);
        let second = find_associated_token_address(&wallet, &mint);
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_mints_give_different_accounts() {
        let wallet = Pubkey::new_unique();

        let a = find_associated_token_address(&wallet, &Pubkey::new_unique());
        let b = find_associated_token_address(&wallet, &Pubkey::new_unique());
        assert_ne!(a, b);
    }
}
