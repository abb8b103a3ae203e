//! War casualties
//!
//! The defender loses `rate` of its power as casualties; the attacker
//! takes half that rate back as counterattack losses. Only the primary
//! rate is clamped.

use serde::{Deserialize, Serialize};

use crate::tables::{Terrain, Weather};

pub const MIN_CASUALTY_RATE: f64 = 0.05;
pub const MAX_CASUALTY_RATE: f64 = 0.5;
pub const COUNTERATTACK_FACTOR: f64 = 0.5;

/// Fraction of the target's strength lost to `damage`
pub fn casualty_rate(target_power: u64, damage: u64, terrain: Terrain, weather: Weather) -> f64 {
    let raw = damage as f64 / (target_power as f64 + 1000.0);
    let shelter = terrain.modifiers().defense * weather.modifiers().morale;
    (raw / shelter).clamp(MIN_CASUALTY_RATE, MAX_CASUALTY_RATE)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Casualties {
    pub rate: f64,
    /// Losses of the side that was hit
    pub defender: u64,
    /// Counterattack losses of the side that struck
    pub attacker: u64,
}

pub fn calculate_casualties(
    attacker_power: u64,
    defender_power: u64,
    damage: u64,
    terrain: Terrain,
    weather: Weather,
) -> Casualties {
    let rate = casualty_rate(defender_power, damage, terrain, weather);
    Casualties {
        rate,
        defender: (defender_power as f64 * rate).floor() as u64,
        attacker: (attacker_power as f64 * rate * COUNTERATTACK_FACTOR).floor() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_clamped() {
        assert_eq!(casualty_rate(100_000, 1, Terrain::OpenPlains, Weather::Overcast), MIN_CASUALTY_RATE);
        assert_eq!(casualty_rate(0, 100_000, Terrain::OpenPlains, Weather::Overcast), MAX_CASUALTY_RATE);
    }

    #[test]
    fn test_rate_in_band() {
        // 200 / 1000 / (1.0 * 1.0)
        let rate = casualty_rate(0, 200, Terrain::OpenPlains, Weather::Overcast);
        assert!((rate - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_defensive_terrain_shelters() {
        let open = casualty_rate(1000, 300, Terrain::OpenPlains, Weather::Overcast);
        let cliffs = casualty_rate(1000, 300, Terrain::CoastalCliffs, Weather::Overcast);
        assert!(cliffs < open);
    }

    #[test]
    fn test_counterattack_is_half_rate() {
        let c = calculate_casualties(1000, 1000, 400, Terrain::OpenPlains, Weather::Overcast);
        assert!((c.rate - 0.2).abs() < 1e-12);
        assert_eq!(c.defender, 200);
        assert_eq!(c.attacker, 100);
    }
}
