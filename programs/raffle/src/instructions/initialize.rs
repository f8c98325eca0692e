use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::{SEED_RAFFLE, SEED_VAULT};
use crate::error::RaffleError;
use crate::state::{Raffle, RaffleState};

/// Accounts required to create the raffle.
///
/// Creates the singleton raffle state PDA and funds the vault PDA with its
/// rent-exempt minimum, so the pot accounting starts at zero.
#[derive(Accounts)]
pub struct InitializeRaffle<'info> {
    /// Pays for account creation and becomes the raffle authority.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [SEED_RAFFLE],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// System-owned PDA that holds the prize pot.
    #[account(mut, seeds = [SEED_VAULT], bump)]
    pub vault: SystemAccount<'info>,

    /// Oracle queue of the VRF provider this raffle will request
    /// randomness from.
    /// CHECK: Recorded as the whitelisted queue; validated against it on
    /// every request.
    pub oracle_queue: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Creates the raffle with its immutable configuration: the entrance fee in
/// lamports and the minimum interval in seconds between settlements. The
/// round starts Open with the interval measured from now.
pub fn process_initialize_raffle(
    ctx: Context<InitializeRaffle>,
    entrance_fee: u64,
    interval: i64,
) -> Result<()> {
    require!(entrance_fee > 0 && interval > 0, RaffleError::InvalidConfig);

    let clock = Clock::get()?;

    // The vault keeps its rent-exempt minimum across payouts; only the pot
    // on top of it ever moves.
    let rent_minimum = Rent::get()?.minimum_balance(0);
    let vault_lamports = ctx.accounts.vault.lamports();
    if vault_lamports < rent_minimum {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.payer.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                },
            ),
            rent_minimum - vault_lamports,
        )?;
    }

    let raffle = &mut ctx.accounts.raffle;
    raffle.bump = ctx.bumps.raffle;
    raffle.vault_bump = ctx.bumps.vault;
    raffle.authority = ctx.accounts.payer.key();
    raffle.oracle_queue = ctx.accounts.oracle_queue.key();
    raffle.entrance_fee = entrance_fee;
    raffle.interval = interval;
    raffle.state = RaffleState::Open;
    raffle.last_settled_at = clock.unix_timestamp;
    raffle.pot = 0;
    raffle.recent_winner = Pubkey::default();
    raffle.vrf_request_slot = 0;
    raffle.players = Vec::new();

    msg!(
        "Raffle initialized: fee={} lamports, interval={}s, queue={}",
        entrance_fee,
        interval,
        raffle.oracle_queue
    );
    Ok(())
}
