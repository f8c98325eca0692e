/// Seed of the singleton raffle state PDA.
pub const SEED_RAFFLE: &[u8] = b"raffle";

/// Seed of the system-owned PDA holding the prize pot.
pub const SEED_VAULT: &[u8] = b"vault";

/// Capacity of the player ledger. Every distinct player is registered as a
/// callback account at request time, and a transaction message (1232 bytes)
/// holds roughly 35 account keys, so the full ledger plus the fixed callback
/// accounts and the oracle's own keys must stay well under that ceiling.
pub const MAX_PLAYERS: usize = 20;
