use anchor_lang::prelude::*;

use crate::constants::MAX_PLAYERS;
use crate::error::RaffleError;

/// Lifecycle of a round. Only two states exist; the only transitions are
/// `Open -> Calculating` (begin_request) and `Calculating -> Open` (settle).
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries.
    Open,
    /// A randomness request is outstanding; entries are rejected.
    Calculating,
}

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    pub bump: u8,

    /// Bump of the vault PDA holding the pot.
    pub vault_bump: u8,

    /// Authority allowed to swap the oracle queue.
    pub authority: Pubkey,

    /// Oracle queue of the VRF provider; randomness requests are only sent
    /// to this queue.
    pub oracle_queue: Pubkey,

    /// Minimum lamports required to enter. Fixed at initialization.
    pub entrance_fee: u64,

    /// Seconds that must elapse since the last settlement before the round
    /// may close. Fixed at initialization.
    pub interval: i64,

    pub state: RaffleState,

    /// Timestamp of the last successful settlement (or raffle creation).
    pub last_settled_at: i64,

    /// Lamports collected since the last settlement. Drained to zero by the
    /// payout; mirrors the entry funds held in the vault.
    pub pot: u64,

    /// Winner of the last settled round. Informational only.
    pub recent_winner: Pubkey,

    /// Slot of the outstanding randomness request; zero when none.
    pub vrf_request_slot: u64,

    /// Entrants of the current round, in entry order. An address may appear
    /// more than once; each slot is a separate chance to win.
    #[max_len(MAX_PLAYERS)]
    pub players: Vec<Pubkey>,
}

impl Raffle {
    /// Readiness to close the round: the interval has elapsed, the round is
    /// open, the pot is funded, and at least one player entered. Pure, no
    /// side effects; safe to evaluate at any time.
    pub fn is_ready(&self, now: i64) -> bool {
        let time_elapsed = now.saturating_sub(self.last_settled_at) >= self.interval;
        let is_open = self.state == RaffleState::Open;
        let has_funds = self.pot > 0;
        let has_players = !self.players.is_empty();
        time_elapsed && is_open && has_funds && has_players
    }

    /// Records a paid entry. All checks run before any mutation, so a failed
    /// entry leaves the ledger untouched.
    pub fn record_entry(&mut self, player: Pubkey, amount: u64) -> Result<()> {
        require!(
            amount >= self.entrance_fee,
            RaffleError::InsufficientEntranceFee
        );
        require!(self.state == RaffleState::Open, RaffleError::RaffleNotOpen);
        require!(self.players.len() < MAX_PLAYERS, RaffleError::RaffleFull);

        self.pot = self
            .pot
            .checked_add(amount)
            .ok_or(RaffleError::Overflow)?;
        self.players.push(player);
        Ok(())
    }

    /// Closes the entry window ahead of the randomness request. Re-evaluates
    /// readiness itself: a caller's earlier observation may be stale. A
    /// second call while Calculating fails here (`is_open` is false).
    pub fn begin_request(&mut self, now: i64, slot: u64) -> Result<()> {
        require!(self.is_ready(now), RaffleError::UpkeepNotNeeded);
        self.state = RaffleState::Calculating;
        self.vrf_request_slot = slot;
        Ok(())
    }

    /// Applies the winner-selection rule and resets the round. Every owned
    /// field is mutated before this returns; the caller performs the payout
    /// afterwards, so effects always precede the external interaction.
    ///
    /// Returns the winner and the prize drained from the pot.
    pub fn settle(&mut self, randomness: &[u8; 32], now: i64) -> Result<(Pubkey, u64)> {
        require!(
            self.state == RaffleState::Calculating,
            RaffleError::NoPendingRequest
        );
        require!(!self.players.is_empty(), RaffleError::NoPlayers);

        let index = Self::winner_index(randomness, self.players.len() as u64);
        let winner = self.players[index as usize];
        let prize = self.pot;

        self.recent_winner = winner;
        self.state = RaffleState::Open;
        self.players.clear();
        self.last_settled_at = now;
        self.pot = 0;
        self.vrf_request_slot = 0;

        Ok((winner, prize))
    }

    /// Winner slot for a 32-byte random word: the first 8 bytes as a
    /// little-endian u64, reduced modulo the player count. Truncating to
    /// 8 bytes is deliberate: a u64 domain already dwarfs any feasible
    /// player count, so the remaining 24 bytes add nothing and the modulo
    /// bias is negligible. `player_count` must be non-zero.
    pub fn winner_index(randomness: &[u8; 32], player_count: u64) -> u64 {
        let value = u64::from_le_bytes(randomness[0..8].try_into().unwrap());
        value % player_count
    }

    /// Distinct player keys in entry order. These are registered as callback
    /// accounts when randomness is requested, so their count (bounded by
    /// `MAX_PLAYERS`) must fit in a single callback transaction.
    pub fn distinct_players(&self) -> Vec<Pubkey> {
        let mut distinct: Vec<Pubkey> = Vec::with_capacity(self.players.len());
        for player in &self.players {
            if !distinct.contains(player) {
                distinct.push(*player);
            }
        }
        distinct
    }

    /// Entrant at `index` in the current round, if any.
    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.players.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raffle(entrance_fee: u64, interval: i64) -> Raffle {
        Raffle {
            bump: 0,
            vault_bump: 0,
            authority: Pubkey::new_unique(),
            oracle_queue: Pubkey::new_unique(),
            entrance_fee,
            interval,
            state: RaffleState::Open,
            last_settled_at: 0,
            pot: 0,
            recent_winner: Pubkey::default(),
            vrf_request_slot: 0,
            players: Vec::new(),
        }
    }

    fn randomness_from(value: u64) -> [u8; 32] {
        let mut randomness = [0u8; 32];
        randomness[0..8].copy_from_slice(&value.to_le_bytes());
        randomness
    }

    #[test]
    fn entry_appends_caller_at_last_position() {
        let mut r = raffle(10, 60);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        r.record_entry(a, 10).unwrap();
        r.record_entry(b, 10).unwrap();

        assert_eq!(r.players.len(), 2);
        assert_eq!(r.players.last(), Some(&b));
        assert_eq!(r.player(0), Some(&a));
        assert_eq!(r.player(2), None);
        assert_eq!(r.pot, 20);
    }

    #[test]
    fn duplicate_entries_get_separate_slots() {
        let mut r = raffle(10, 60);
        let a = Pubkey::new_unique();

        r.record_entry(a, 10).unwrap();
        r.record_entry(a, 10).unwrap();
        r.record_entry(a, 10).unwrap();

        assert_eq!(r.players, vec![a, a, a]);
        assert_eq!(r.pot, 30);
    }

    #[test]
    fn overpayment_is_kept_in_full() {
        let mut r = raffle(10, 60);
        r.record_entry(Pubkey::new_unique(), 25).unwrap();
        assert_eq!(r.pot, 25);
    }

    #[test]
    fn underpayment_is_rejected_without_mutation() {
        let mut r = raffle(10, 60);
        let err = r.record_entry(Pubkey::new_unique(), 9).unwrap_err();
        assert_eq!(err, RaffleError::InsufficientEntranceFee.into());
        assert!(r.players.is_empty());
        assert_eq!(r.pot, 0);

        // Fee check applies regardless of state.
        r.state = RaffleState::Calculating;
        let err = r.record_entry(Pubkey::new_unique(), 9).unwrap_err();
        assert_eq!(err, RaffleError::InsufficientEntranceFee.into());
        assert!(r.players.is_empty());
    }

    #[test]
    fn entry_rejected_while_calculating() {
        let mut r = raffle(10, 60);
        r.record_entry(Pubkey::new_unique(), 10).unwrap();
        r.state = RaffleState::Calculating;

        let err = r.record_entry(Pubkey::new_unique(), 10).unwrap_err();
        assert_eq!(err, RaffleError::RaffleNotOpen.into());
        assert_eq!(r.players.len(), 1);
        assert_eq!(r.pot, 10);
    }

    #[test]
    fn entry_rejected_at_capacity() {
        let mut r = raffle(1, 60);
        for _ in 0..MAX_PLAYERS {
            r.record_entry(Pubkey::new_unique(), 1).unwrap();
        }
        let err = r.record_entry(Pubkey::new_unique(), 1).unwrap_err();
        assert_eq!(err, RaffleError::RaffleFull.into());
        assert_eq!(r.players.len(), MAX_PLAYERS);
    }

    #[test]
    fn distinct_players_dedupe_preserving_entry_order() {
        let mut r = raffle(10, 60);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        r.record_entry(a, 10).unwrap();
        r.record_entry(b, 10).unwrap();
        r.record_entry(a, 10).unwrap();
        r.record_entry(b, 10).unwrap();

        assert_eq!(r.players.len(), 4);
        assert_eq!(r.distinct_players(), vec![a, b]);
    }

    #[test]
    fn full_round_callback_account_list_fits_one_transaction() {
        let mut r = raffle(1, 60);
        for _ in 0..MAX_PLAYERS {
            r.record_entry(Pubkey::new_unique(), 1).unwrap();
        }

        // The callback transaction names raffle + vault + system_program
        // plus every distinct player, and the oracle adds its identity, fee
        // payer and program ids (~6 more keys). A 1232-byte transaction
        // message holds roughly 35 account keys; an undeliverable callback
        // would leave the round Calculating forever with the pot locked.
        let callback_accounts = 3 + r.distinct_players().len();
        assert!(callback_accounts + 6 <= 35);
    }

    #[test]
    fn readiness_requires_all_four_conditions() {
        for mask in 0u8..16 {
            let time_elapsed = mask & 1 != 0;
            let open = mask & 2 != 0;
            let funded = mask & 4 != 0;
            let has_players = mask & 8 != 0;

            let mut r = raffle(1, 100);
            r.last_settled_at = 1_000;
            r.state = if open {
                RaffleState::Open
            } else {
                RaffleState::Calculating
            };
            r.pot = if funded { 5 } else { 0 };
            if has_players {
                r.players.push(Pubkey::new_unique());
            }
            let now = if time_elapsed { 1_100 } else { 1_099 };

            assert_eq!(
                r.is_ready(now),
                time_elapsed && open && funded && has_players,
                "combination {mask:04b}"
            );
        }
    }

    #[test]
    fn readiness_check_has_no_side_effects() {
        let mut r = raffle(1, 100);
        r.record_entry(Pubkey::new_unique(), 1).unwrap();
        let before_players = r.players.clone();

        assert!(r.is_ready(100));
        assert!(r.is_ready(100));

        assert_eq!(r.state, RaffleState::Open);
        assert_eq!(r.players, before_players);
        assert_eq!(r.pot, 1);
        assert_eq!(r.last_settled_at, 0);
    }

    #[test]
    fn begin_request_flips_to_calculating() {
        let mut r = raffle(1, 100);
        r.record_entry(Pubkey::new_unique(), 1).unwrap();

        r.begin_request(100, 42).unwrap();
        assert_eq!(r.state, RaffleState::Calculating);
        assert_eq!(r.vrf_request_slot, 42);

        // A second close attempt always fails before fulfillment.
        let err = r.begin_request(200, 43).unwrap_err();
        assert_eq!(err, RaffleError::UpkeepNotNeeded.into());
        assert_eq!(r.vrf_request_slot, 42);
    }

    #[test]
    fn begin_request_fails_when_empty_round_expires() {
        // Interval elapsed but nobody entered: hasFunds and hasPlayers fail.
        let mut r = raffle(1, 100);
        let err = r.begin_request(100, 1).unwrap_err();
        assert_eq!(err, RaffleError::UpkeepNotNeeded.into());
        assert_eq!(r.state, RaffleState::Open);
    }

    #[test]
    fn begin_request_fails_before_interval() {
        let mut r = raffle(1, 100);
        r.record_entry(Pubkey::new_unique(), 1).unwrap();
        let err = r.begin_request(99, 1).unwrap_err();
        assert_eq!(err, RaffleError::UpkeepNotNeeded.into());
        assert_eq!(r.state, RaffleState::Open);
    }

    #[test]
    fn settle_rejected_while_open() {
        let mut r = raffle(1, 100);
        r.record_entry(Pubkey::new_unique(), 1).unwrap();

        let err = r.settle(&randomness_from(7), 100).unwrap_err();
        assert_eq!(err, RaffleError::NoPendingRequest.into());
        assert_eq!(r.players.len(), 1);
        assert_eq!(r.pot, 1);
    }

    #[test]
    fn three_entrants_randomness_seven_picks_second() {
        let mut r = raffle(1, 100);
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let c = Pubkey::new_unique();
        r.record_entry(a, 1).unwrap();
        r.record_entry(b, 1).unwrap();
        r.record_entry(c, 1).unwrap();

        r.begin_request(100, 42).unwrap();

        // 7 mod 3 == 1 -> B wins the full pot of 3.
        let (winner, prize) = r.settle(&randomness_from(7), 150).unwrap();
        assert_eq!(winner, b);
        assert_eq!(prize, 3);

        assert_eq!(r.recent_winner, b);
        assert_eq!(r.state, RaffleState::Open);
        assert!(r.players.is_empty());
        assert_eq!(r.pot, 0);
        assert_eq!(r.last_settled_at, 150);
        assert_eq!(r.vrf_request_slot, 0);
    }

    #[test]
    fn round_reopens_for_entries_after_settlement() {
        let mut r = raffle(1, 100);
        r.record_entry(Pubkey::new_unique(), 1).unwrap();
        r.begin_request(100, 1).unwrap();
        r.settle(&randomness_from(0), 150).unwrap();

        let d = Pubkey::new_unique();
        r.record_entry(d, 1).unwrap();
        assert_eq!(r.players, vec![d]);
        assert_eq!(r.pot, 1);

        // Interval is measured from the new settlement time.
        assert!(!r.is_ready(249));
        assert!(r.is_ready(250));
    }

    proptest! {
        #[test]
        fn winner_index_always_in_range(
            randomness in any::<[u8; 32]>(),
            count in 1u64..=10_000,
        ) {
            prop_assert!(Raffle::winner_index(&randomness, count) < count);
        }

        #[test]
        fn winner_index_is_value_mod_count(
            value in any::<u64>(),
            count in 1u64..=10_000,
        ) {
            let index = Raffle::winner_index(&randomness_from(value), count);
            prop_assert_eq!(index, value % count);
        }

        #[test]
        fn begin_request_succeeds_iff_ready(
            now in 0i64..=1_000,
            interval in 1i64..=1_000,
            pot in 0u64..=5,
            player_count in 0usize..=3,
        ) {
            let mut r = raffle(1, interval);
            r.pot = pot;
            for _ in 0..player_count {
                r.players.push(Pubkey::new_unique());
            }

            let ready = r.is_ready(now);
            let result = r.begin_request(now, 1);
            prop_assert_eq!(result.is_ok(), ready);
            if ready {
                prop_assert_eq!(r.state, RaffleState::Calculating);
            } else {
                prop_assert_eq!(r.state, RaffleState::Open);
            }
        }

        #[test]
        fn settlement_pays_full_pot_and_resets(
            randomness in any::<[u8; 32]>(),
            entries in proptest::collection::vec(1u64..=100, 1..=16),
        ) {
            let mut r = raffle(1, 10);
            let mut total = 0u64;
            for amount in &entries {
                r.record_entry(Pubkey::new_unique(), *amount).unwrap();
                total += amount;
            }
            r.begin_request(10, 1).unwrap();

            let expected = r.players
                [Raffle::winner_index(&randomness, entries.len() as u64) as usize];
            let (winner, prize) = r.settle(&randomness, 20).unwrap();

            prop_assert_eq!(winner, expected);
            prop_assert_eq!(prize, total);
            prop_assert_eq!(r.pot, 0);
            prop_assert!(r.players.is_empty());
            prop_assert_eq!(r.state, RaffleState::Open);
        }
    }
}
