//! Siege equipment catalog

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct SiegeEngineStats {
    pub name: &'static str,
    pub cost: u32,
    pub attack_power: u32,
    pub defense_bonus: u32,
    pub siege_bonus: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiegeEngine {
    BatteringRam,
    Trebuchet,
    Catapult,
    SiegeTower,
    Mantlet,
    Ballista,
    Petrary,
}

impl SiegeEngine {
    pub const ALL: [SiegeEngine; 7] = [
        SiegeEngine::BatteringRam,
        SiegeEngine::Trebuchet,
        SiegeEngine::Catapult,
        SiegeEngine::SiegeTower,
        SiegeEngine::Mantlet,
        SiegeEngine::Ballista,
        SiegeEngine::Petrary,
    ];

    pub fn stats(&self) -> SiegeEngineStats {
        let (name, cost, attack_power, defense_bonus, siege_bonus, description) = match self {
            SiegeEngine::BatteringRam => ("Battering Ram", 500, 75, 10, 2.0, "Heavy wooden ram for breaking gates"),
            SiegeEngine::Trebuchet => ("Trebuchet", 1500, 150, 5, 3.5, "Massive siege engine for wall destruction"),
            SiegeEngine::Catapult => ("Catapult", 800, 100, 5, 2.5, "Medium siege engine for wall damage"),
            SiegeEngine::SiegeTower => ("Siege Tower", 1200, 50, 20, 2.0, "Mobile tower for wall assault"),
            SiegeEngine::Mantlet => ("Mantlet", 300, 0, 30, 0.0, "Mobile shields for archer protection"),
            SiegeEngine::Ballista => ("Ballista", 600, 80, 10, 1.5, "Giant crossbow for anti-personnel"),
            SiegeEngine::Petrary => ("Petrary", 400, 60, 5, 1.8, "Small stone-throwing engine"),
        };
        SiegeEngineStats {
            name,
            cost,
            attack_power,
            defense_bonus,
            siege_bonus,
            description,
        }
    }
}
