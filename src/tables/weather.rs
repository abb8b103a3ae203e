//! Weather conditions for duels and wars
//!
//! Weather is rolled once when a contest starts and never changes mid-contest.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherModifiers {
    pub morale: f64,
    pub visibility: f64,
    pub movement: f64,
    pub archery: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Weather {
    #[default]
    ClearSkies,
    HeavyRain,
    Foggy,
    Stormy,
    Snowstorm,
    LightRain,
    Overcast,
}

impl Weather {
    pub const ALL: [Weather; 7] = [
        Weather::ClearSkies,
        Weather::HeavyRain,
        Weather::Foggy,
        Weather::Stormy,
        Weather::Snowstorm,
        Weather::LightRain,
        Weather::Overcast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weather::ClearSkies => "Clear Skies",
            Weather::HeavyRain => "Heavy Rain",
            Weather::Foggy => "Foggy",
            Weather::Stormy => "Stormy",
            Weather::Snowstorm => "Snowstorm",
            Weather::LightRain => "Light Rain",
            Weather::Overcast => "Overcast",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup that falls back to Clear Skies
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Weather::ClearSkies)
    }

    pub fn modifiers(&self) -> WeatherModifiers {
        let (morale, visibility, movement, archery) = match self {
            Weather::ClearSkies => (1.1, 1.2, 1.1, 1.1),
            Weather::HeavyRain => (0.9, 0.7, 0.8, 0.6),
            Weather::Foggy => (0.95, 0.5, 0.9, 0.7),
            Weather::Stormy => (0.8, 0.6, 0.7, 0.5),
            Weather::Snowstorm => (0.7, 0.4, 0.6, 0.4),
            Weather::LightRain => (1.0, 0.9, 0.95, 0.8),
            Weather::Overcast => (1.0, 1.0, 1.0, 1.0),
        };
        WeatherModifiers {
            morale,
            visibility,
            movement,
            archery,
        }
    }

    /// Combined damage scaling: morale x archery
    pub fn combat_factor(&self) -> f64 {
        let m = self.modifiers();
        m.morale * m.archery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_skies_combat_factor() {
        assert!((Weather::ClearSkies.combat_factor() - 1.21).abs() < 1e-9);
    }

    #[test]
    fn test_overcast_is_neutral() {
        assert_eq!(Weather::Overcast.combat_factor(), 1.0);
    }

    #[test]
    fn test_unknown_weather_falls_back() {
        assert_eq!(Weather::lookup("Meteor Shower"), Weather::ClearSkies);
        assert_eq!(Weather::lookup("snowstorm"), Weather::Snowstorm);
    }

    #[test]
    fn test_storms_hurt_archery() {
        assert!(Weather::Snowstorm.modifiers().archery < Weather::LightRain.modifiers().archery);
        assert!(Weather::Foggy.modifiers().visibility < 0.6);
    }
}
