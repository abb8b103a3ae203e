//! War tactics
//!
//! Each war turn the acting leader picks a tactic. The attacker's damage
//! factor is divided by the defender's (their last chosen tactic), and the
//! morale factor scales the acting side's morale afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TacticModifiers {
    pub damage: f64,
    pub morale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tactic {
    #[default]
    FrontalAssault,
    FlankingManeuver,
    DefensiveStand,
    FeignedRetreat,
    SiegeBombardment,
    NightRaid,
    HoldTheLine,
}

impl Tactic {
    pub const ALL: [Tactic; 7] = [
        Tactic::FrontalAssault,
        Tactic::FlankingManeuver,
        Tactic::DefensiveStand,
        Tactic::FeignedRetreat,
        Tactic::SiegeBombardment,
        Tactic::NightRaid,
        Tactic::HoldTheLine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tactic::FrontalAssault => "Frontal Assault",
            Tactic::FlankingManeuver => "Flanking Maneuver",
            Tactic::DefensiveStand => "Defensive Stand",
            Tactic::FeignedRetreat => "Feigned Retreat",
            Tactic::SiegeBombardment => "Siege Bombardment",
            Tactic::NightRaid => "Night Raid",
            Tactic::HoldTheLine => "Hold the Line",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup that falls back to Frontal Assault
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn modifiers(&self) -> TacticModifiers {
        let (damage, morale) = match self {
            Tactic::FrontalAssault => (1.0, 1.0),
            Tactic::FlankingManeuver => (1.2, 0.95),
            Tactic::DefensiveStand => (0.8, 1.05),
            Tactic::FeignedRetreat => (1.1, 0.9),
            Tactic::SiegeBombardment => (1.3, 0.9),
            Tactic::NightRaid => (1.25, 0.85),
            Tactic::HoldTheLine => (0.9, 1.1),
        };
        TacticModifiers { damage, morale }
    }
}
