//! Turn-based duel and war sessions

pub mod duel;
pub mod war;

pub use duel::{settle_duel, Duel, DuelChallenge, DuelOutcome, DuelSettlement, DuelStatus, DuelStrike, DuelTurn};
pub use war::{
    settle_war, CasualtyKind, CasualtyRecord, VictoryConditions, War, WarActionRecord, WarOutcome, WarSide, WarStatus,
    WarTurn,
};
