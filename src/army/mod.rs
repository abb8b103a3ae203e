//! Army economy: recruitment, training, upkeep, fortification, power
//!
//! Every function here operates on a single in-memory `Army`; persistence
//! and transactions belong to the service layer.

pub mod fortification;
pub mod model;
pub mod power;
pub mod recruitment;
pub mod resets;
pub mod specialization;
pub mod status;
pub mod supply;
pub mod training;

pub use fortification::{build_fortification, FortificationRecord};
pub use model::Army;
pub use power::{calculate_army_power, ArmyPower};
pub use recruitment::{can_recruit, recruit, RecruitReport};
pub use resets::{consume_daily_action, maybe_reset_daily, maybe_reset_weekly};
pub use specialization::{change_army_type, change_formation};
pub use status::{status_effects, StatusEffect};
pub use supply::{apply_supply_consumption, supply_consumption, SupplyReport};
pub use training::{desertion_rate, distribute_units, knight_chance, train, TrainingRecord, UnitSplit};
