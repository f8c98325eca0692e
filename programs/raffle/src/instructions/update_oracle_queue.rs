use anchor_lang::prelude::*;

use crate::constants::SEED_RAFFLE;
use crate::error::RaffleError;
use crate::state::Raffle;

/// Accounts required to swap the randomness provider queue. Only the raffle
/// authority may reconfigure it.
#[derive(Accounts)]
pub struct UpdateOracleQueue<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_RAFFLE],
        bump = raffle.bump,
        constraint = raffle.authority == authority.key() @ RaffleError::Unauthorized
    )]
    pub raffle: Account<'info, Raffle>,

    /// CHECK: Future randomness requests are validated against this key.
    pub new_oracle_queue: UncheckedAccount<'info>,
}

/// Points the raffle at a new oracle queue. An outstanding request is
/// unaffected: its callback authenticates against the VRF program identity,
/// not the queue.
pub fn process_update_oracle_queue(ctx: Context<UpdateOracleQueue>) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    raffle.oracle_queue = ctx.accounts.new_oracle_queue.key();
    msg!("Oracle queue updated to {}", raffle.oracle_queue);
    Ok(())
}
