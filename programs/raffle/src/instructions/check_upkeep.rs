use anchor_lang::prelude::*;

use crate::constants::SEED_RAFFLE;
use crate::state::Raffle;

/// Accounts required to probe readiness. Nothing is mutable; the check is
/// free of side effects and may be polled by any observer.
#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(seeds = [SEED_RAFFLE], bump = raffle.bump)]
    pub raffle: Account<'info, Raffle>,
}

/// Reports whether the round may be closed right now. Keeper bots poll this
/// and call `perform_upkeep` when it returns true; `perform_upkeep` repeats
/// the check itself, so a stale `true` here is harmless.
pub fn process_check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
    let raffle = &ctx.accounts.raffle;
    let ready = raffle.is_ready(Clock::get()?.unix_timestamp);
    msg!(
        "Upkeep check: ready={}, state={:?}, pot={}, players={}",
        ready,
        raffle.state,
        raffle.pot,
        raffle.players.len()
    );
    Ok(ready)
}
