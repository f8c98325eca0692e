use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::{SEED_RAFFLE, SEED_VAULT};
use crate::events::RaffleEntered;
use crate::state::Raffle;

/// Accounts required to enter the current round.
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The entrant; pays `amount` lamports into the vault.
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(mut, seeds = [SEED_RAFFLE], bump = raffle.bump)]
    pub raffle: Account<'info, Raffle>,

    /// System-owned PDA that holds the prize pot.
    #[account(mut, seeds = [SEED_VAULT], bump = raffle.vault_bump)]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Buys one slot in the current round.
///
/// `amount` must cover the entrance fee; anything above it is kept in the
/// pot as well, nothing is refunded. Fails while a randomness request is
/// outstanding.
pub fn process_enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    ctx.accounts.raffle.record_entry(player, amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let total_players = ctx.accounts.raffle.players.len() as u64;
    emit!(RaffleEntered {
        player,
        amount,
        total_players,
    });

    msg!(
        "Entry recorded: player={}, amount={}, total_players={}",
        player,
        amount,
        total_players
    );
    Ok(())
}
