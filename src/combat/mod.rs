//! Combat resolution for duels and wars
//!
//! Pure functions of the combatants' state, the battlefield and a random
//! source. Nothing here touches storage.

pub mod casualties;
pub mod duel_damage;
pub mod war_damage;

pub use casualties::{calculate_casualties, casualty_rate, Casualties};
pub use duel_damage::{calculate_damage, DuelAction, DuelHit, Fighter};
pub use war_damage::{calculate_war_damage, war_modifier, WarHit};
