use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Payment is below the entrance fee")]
    InsufficientEntranceFee,

    #[msg("Raffle is not open for entries")]
    RaffleNotOpen,

    #[msg("Player list is full")]
    RaffleFull,

    #[msg("Upkeep conditions are not met")]
    UpkeepNotNeeded,

    #[msg("No randomness request is pending")]
    NoPendingRequest,

    #[msg("No players in the current round")]
    NoPlayers,

    #[msg("Winner account was not supplied to the callback")]
    MissingWinnerAccount,

    #[msg("Prize transfer to the winner failed")]
    PrizeTransferFailed,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Invalid oracle queue account")]
    InvalidOracleQueue,

    #[msg("Entrance fee and interval must be greater than zero")]
    InvalidConfig,

    #[msg("Math overflow")]
    Overflow,
}
