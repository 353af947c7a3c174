/*!
# Instruction Builders

The atomic operations a sweep is made of: idempotent destination-account
creation, token transfer, source-account close, native SOL transfer, and
the compute-budget pair attached to every batch.

All builders follow the `build_*_ix` naming pattern and return plain
[`Instruction`]s ready to be assembled into an unsigned transaction.
*/

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, instruction::Instruction,
    program_error::ProgramError, pubkey::Pubkey, system_instruction,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstructionBuilderError {
    #[error("token instruction construction failed: {0}")]
    Token(#[from] ProgramError),
}

/// Idempotent create of the associated token account holding `mint` for
/// `destination_owner`, funded by `payer`.
///
/// Safe to include even when the account already exists: the instruction
/// is a no-op on chain in that case, not an error. Planners rely on this
/// when an existence check could not be performed.
pub fn build_create_destination_account_ix(
    payer: &Pubkey,
    destination_owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        payer,
        destination_owner,
        mint,
        &spl_token::id(),
    )
}

/// Transfer `raw_amount` base units of `mint` from `source` to
/// `destination`, signed by `authority`.
///
/// `raw_amount` is the exact integer smallest-unit amount; there is no
/// partial-amount support. `decimals` must match the mint, which lets the
/// token program reject stale snapshots cheaply.
pub fn build_asset_transfer_ix(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    raw_amount: u64,
    decimals: u8,
) -> Result<Instruction, InstructionBuilderError> {
    Ok(spl_token::instruction::transfer_checked(
        &spl_token::id(),
        source,
        mint,
        destination,
        authority,
        &[],
        raw_amount,
        decimals,
    )?)
}

/// Close `account`, sending its rent lamports to `rent_destination`.
///
/// Only safe when the account balance is exactly zero. The sweep planner
/// deliberately never emits this (sources are left open, trading a little
/// rent for reliability); the builder exists for a separate cleanup flow.
pub fn build_close_account_ix(
    account: &Pubkey,
    authority: &Pubkey,
    rent_destination: &Pubkey,
) -> Result<Instruction, InstructionBuilderError> {
    Ok(spl_token::instruction::close_account(
        &spl_token::id(),
        account,
        rent_destination,
        authority,
        &[],
    )?)
}

/// Native SOL transfer of `lamports` from `from` to `to`.
pub fn build_native_transfer_ix(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, to, lamports)
}

/// The compute-budget pair declared at the head of every batch: unit
/// ceiling first, then price per unit in micro-lamports.
pub fn build_compute_budget_ixs(
    unit_limit: u32,
    unit_price_micro_lamports: u64,
) -> [Instruction; 2] {
    [
        ComputeBudgetInstruction::set_compute_unit_limit(unit_limit),
        ComputeBudgetInstruction::set_compute_unit_price(unit_price_micro_lamports),
    ]
}
