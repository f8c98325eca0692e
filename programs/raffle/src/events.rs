//! Program events for off-chain indexing. The player ledger is cleared on
//! every settlement, so event logs are the only history of past rounds.

use anchor_lang::prelude::*;

/// A paid entry was recorded.
#[event]
pub struct RaffleEntered {
    pub player: Pubkey,
    /// Lamports paid into the pot (>= entrance fee, overpayment kept).
    pub amount: u64,
    pub total_players: u64,
}

/// A randomness request was issued and the round closed for entries.
#[event]
pub struct RandomnessRequested {
    pub raffle: Pubkey,
    /// Caller seed hash submitted to the oracle; identifies the request.
    pub seed: [u8; 32],
    /// Slot at which the request was issued.
    pub slot: u64,
}

/// A winner was selected and the full pot paid out.
#[event]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub prize: u64,
    pub timestamp: i64,
}
