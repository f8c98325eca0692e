use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::{system_program, Discriminator};
use ephemeral_vrf_sdk::consts::IDENTITY;
use ephemeral_vrf_sdk::instructions::{create_request_randomness_ix, RequestRandomnessParams};
use ephemeral_vrf_sdk::types::SerializableAccountMeta;
use solana_program::hash::hash;

use crate::constants::{SEED_RAFFLE, SEED_VAULT};
use crate::error::RaffleError;
use crate::events::RandomnessRequested;
use crate::state::Raffle;

/// Accounts required to close the round and request randomness.
///
/// Anyone may perform upkeep; readiness gates the transition, not identity.
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    /// Pays the oracle request fee.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut, seeds = [SEED_RAFFLE], bump = raffle.bump)]
    pub raffle: Account<'info, Raffle>,

    /// System-owned PDA that holds the prize pot; registered as a callback
    /// account so settlement can pay out of it.
    #[account(mut, seeds = [SEED_VAULT], bump = raffle.vault_bump)]
    pub vault: SystemAccount<'info>,

    /// CHECK: Must be the queue configured on the raffle.
    #[account(
        mut,
        constraint = oracle_queue.key() == raffle.oracle_queue @ RaffleError::InvalidOracleQueue
    )]
    pub oracle_queue: UncheckedAccount<'info>,

    /// Program identity PDA signing the VRF request.
    /// CHECK: Seeds verified.
    #[account(seeds = [b"identity"], bump)]
    pub program_identity: UncheckedAccount<'info>,

    /// CHECK: Address constraint pins the MagicBlock VRF program.
    #[account(address = ephemeral_vrf_sdk::consts::VRF_PROGRAM_ID)]
    pub vrf_program: UncheckedAccount<'info>,

    /// CHECK: Address constraint pins the slot hashes sysvar.
    #[account(address = anchor_lang::solana_program::sysvar::slot_hashes::ID)]
    pub slot_hashes: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Closes the round and issues exactly one randomness request.
///
/// Readiness is re-evaluated here no matter what the caller observed: it can
/// go stale between observation and invocation. The entry window closes
/// (state flips to Calculating) before the outbound request, so the player
/// set the oracle will draw from is already frozen.
///
/// Fire-and-forget: fulfillment arrives later through `consume_randomness`,
/// authenticated as the VRF program identity.
pub fn process_perform_upkeep(ctx: Context<PerformUpkeep>, client_seed: u8) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;

    if !raffle.is_ready(clock.unix_timestamp) {
        msg!(
            "Upkeep not needed: state={:?}, pot={}, players={}, last_settled_at={}, now={}",
            raffle.state,
            raffle.pot,
            raffle.players.len(),
            raffle.last_settled_at,
            clock.unix_timestamp
        );
        return err!(RaffleError::UpkeepNotNeeded);
    }

    raffle.begin_request(clock.unix_timestamp, clock.slot)?;

    // Callback account list, fixed at request time. Order matches the
    // ConsumeRandomness context; the VRF identity signer is prepended by the
    // oracle itself. Every distinct player is registered writable so the
    // winner, unknown until fulfillment, can be paid. MAX_PLAYERS keeps the
    // list small enough for the callback to fit one transaction.
    let raffle_key = raffle.key();
    let mut callback_accounts = vec![
        SerializableAccountMeta {
            pubkey: raffle_key,
            is_signer: false,
            is_writable: true,
        },
        SerializableAccountMeta {
            pubkey: ctx.accounts.vault.key(),
            is_signer: false,
            is_writable: true,
        },
        SerializableAccountMeta {
            pubkey: system_program::ID,
            is_signer: false,
            is_writable: false,
        },
    ];
    for player in raffle.distinct_players() {
        callback_accounts.push(SerializableAccountMeta {
            pubkey: player,
            is_signer: false,
            is_writable: true,
        });
    }

    // Seed the request with caller entropy and the slot; the hash doubles as
    // the request identifier in the emitted event.
    let mut seed_input = [0u8; 9];
    seed_input[0] = client_seed;
    seed_input[1..9].copy_from_slice(&clock.slot.to_le_bytes());
    let caller_seed = hash(&seed_input).to_bytes();

    let vrf_ix = create_request_randomness_ix(RequestRandomnessParams {
        payer: ctx.accounts.payer.key(),
        oracle_queue: ctx.accounts.oracle_queue.key(),
        callback_program_id: crate::ID,
        callback_discriminator: crate::instruction::ConsumeRandomness::DISCRIMINATOR.to_vec(),
        caller_seed,
        accounts_metas: Some(callback_accounts),
        callback_args: None,
    });

    invoke_signed(
        &vrf_ix,
        &[
            ctx.accounts.payer.to_account_info(),
            ctx.accounts.program_identity.to_account_info(),
            ctx.accounts.oracle_queue.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.slot_hashes.to_account_info(),
        ],
        &[&[IDENTITY, &[ctx.bumps.program_identity]]],
    )?;

    emit!(RandomnessRequested {
        raffle: raffle_key,
        seed: caller_seed,
        slot: clock.slot,
    });

    msg!(
        "Randomness requested: slot={}, players={}, pot={}",
        clock.slot,
        raffle.players.len(),
        raffle.pot
    );
    Ok(())
}
