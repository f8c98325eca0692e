use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::solana_program::system_instruction;

use crate::constants::{SEED_RAFFLE, SEED_VAULT};
use crate::error::RaffleError;
use crate::events::WinnerPicked;
use crate::state::Raffle;

/// Accounts for the randomness callback. Invoked by the MagicBlock VRF
/// program; only its identity PDA can sign, so users cannot inject their
/// own randomness.
///
/// Remaining accounts: the player accounts registered at request time, one
/// of which is the winner to be paid.
#[derive(Accounts)]
pub struct ConsumeRandomness<'info> {
    /// CHECK: Address constraint pins the VRF program identity.
    #[account(address = ephemeral_vrf_sdk::consts::VRF_PROGRAM_IDENTITY)]
    pub vrf_program_identity: Signer<'info>,

    #[account(mut, seeds = [SEED_RAFFLE], bump = raffle.bump)]
    pub raffle: Account<'info, Raffle>,

    /// System-owned PDA that holds the prize pot.
    #[account(mut, seeds = [SEED_VAULT], bump = raffle.vault_bump)]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Settles the round with the delivered random word.
///
/// Ordering contract: all owned state is reset inside `Raffle::settle`
/// before the payout CPI runs. A failed transfer surfaces as
/// `PrizeTransferFailed` and the runtime rolls the reset back with it, so
/// state and funds cannot diverge. A callback with no pending request is
/// rejected unchanged.
pub fn process_consume_randomness<'info>(
    ctx: Context<'_, '_, 'info, 'info, ConsumeRandomness<'info>>,
    randomness: [u8; 32],
) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;

    let (winner, prize) = raffle.settle(&randomness, clock.unix_timestamp)?;
    msg!("Winner selected: {} (prize {} lamports)", winner, prize);

    let winner_info = ctx
        .remaining_accounts
        .iter()
        .find(|info| *info.key == winner)
        .ok_or(RaffleError::MissingWinnerAccount)?;

    let vault_seeds: &[&[u8]] = &[SEED_VAULT, &[raffle.vault_bump]];
    invoke_signed(
        &system_instruction::transfer(&ctx.accounts.vault.key(), &winner, prize),
        &[
            ctx.accounts.vault.to_account_info(),
            winner_info.clone(),
            ctx.accounts.system_program.to_account_info(),
        ],
        &[vault_seeds],
    )
    .map_err(|err| {
        msg!("Prize transfer failed: {:?}", err);
        RaffleError::PrizeTransferFailed
    })?;

    emit!(WinnerPicked {
        winner,
        prize,
        timestamp: clock.unix_timestamp,
    });

    msg!("Round settled and reopened at {}", clock.unix_timestamp);
    Ok(())
}
