pub mod check_upkeep;
pub mod consume_randomness;
pub mod enter_raffle;
pub mod initialize;
pub mod perform_upkeep;
pub mod update_oracle_queue;

pub use check_upkeep::*;
pub use consume_randomness::*;
pub use enter_raffle::*;
pub use initialize::*;
pub use perform_upkeep::*;
pub use update_oracle_queue::*;
