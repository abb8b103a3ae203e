//! Army specializations
//!
//! The specialization skews both the unit mix produced by training and the
//! weight each unit category carries in army power.

use serde::{Deserialize, Serialize};

/// Per-category multipliers of a specialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmyTypeBonuses {
    pub infantry: f64,
    pub cavalry: f64,
    pub archers: f64,
    pub siege: f64,
}

impl ArmyTypeBonuses {
    /// Largest bonus and the category it belongs to
    pub fn strongest(&self) -> (&'static str, f64) {
        [
            ("infantry", self.infantry),
            ("cavalry", self.cavalry),
            ("archers", self.archers),
            ("siege", self.siege),
        ]
        .into_iter()
        .fold(("infantry", f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArmyType {
    InfantryHeavy,
    CavalryHeavy,
    ArcherHeavy,
    #[default]
    Balanced,
    SiegeSpecialized,
    Defensive,
}

impl ArmyType {
    pub const ALL: [ArmyType; 6] = [
        ArmyType::InfantryHeavy,
        ArmyType::CavalryHeavy,
        ArmyType::ArcherHeavy,
        ArmyType::Balanced,
        ArmyType::SiegeSpecialized,
        ArmyType::Defensive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArmyType::InfantryHeavy => "Infantry Heavy",
            ArmyType::CavalryHeavy => "Cavalry Heavy",
            ArmyType::ArcherHeavy => "Archer Heavy",
            ArmyType::Balanced => "Balanced",
            ArmyType::SiegeSpecialized => "Siege Specialized",
            ArmyType::Defensive => "Defensive",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup that falls back to Balanced
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn bonuses(&self) -> ArmyTypeBonuses {
        let (infantry, cavalry, archers, siege) = match self {
            ArmyType::InfantryHeavy => (1.3, 0.8, 1.0, 0.9),
            ArmyType::CavalryHeavy => (0.8, 1.4, 0.9, 0.7),
            ArmyType::ArcherHeavy => (0.9, 0.9, 1.3, 1.0),
            ArmyType::Balanced => (1.1, 1.1, 1.1, 1.1),
            ArmyType::SiegeSpecialized => (1.0, 0.7, 1.0, 1.5),
            ArmyType::Defensive => (1.4, 0.6, 1.2, 0.8),
        };
        ArmyTypeBonuses {
            infantry,
            cavalry,
            archers,
            siege,
        }
    }

    /// Comma-separated list of valid names, for rejection messages
    pub fn names() -> String {
        Self::ALL.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
    }
}
