use anchor_lang::prelude::*;
use instructions::*;

mod constants;
mod error;
mod events;
mod instructions;
mod state;

declare_id!("2v5pugu3917uZDDBT7UXKiQMdEZ2sdJcj5pQMS82ZEyG");

#[program]
pub mod raffle {
    use super::*;

    pub fn initialize_raffle(
        ctx: Context<InitializeRaffle>,
        entrance_fee: u64,
        interval: i64,
    ) -> Result<()> {
        process_initialize_raffle(ctx, entrance_fee, interval)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        process_enter_raffle(ctx, amount)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
        process_check_upkeep(ctx)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, client_seed: u8) -> Result<()> {
        process_perform_upkeep(ctx, client_seed)
    }

    /// Randomness callback. Invoked by the MagicBlock VRF program once per
    /// outstanding request; not callable by users.
    pub fn consume_randomness<'info>(
        ctx: Context<'_, '_, 'info, 'info, ConsumeRandomness<'info>>,
        randomness: [u8; 32],
    ) -> Result<()> {
        process_consume_randomness(ctx, randomness)
    }

    pub fn update_oracle_queue(ctx: Context<UpdateOracleQueue>) -> Result<()> {
        process_update_oracle_queue(ctx)
    }
}
