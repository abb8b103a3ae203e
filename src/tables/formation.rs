//! Battle formations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationModifiers {
    pub infantry: f64,
    pub cavalry: f64,
    pub archer: f64,
    pub defense: f64,
    /// Positive = faster, negative = slower
    pub movement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Formation {
    #[default]
    Line,
    Phalanx,
    Wedge,
    Square,
    Skirmish,
    Column,
    Echelon,
    Tortoise,
}

impl Formation {
    pub const ALL: [Formation; 8] = [
        Formation::Line,
        Formation::Phalanx,
        Formation::Wedge,
        Formation::Square,
        Formation::Skirmish,
        Formation::Column,
        Formation::Echelon,
        Formation::Tortoise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Formation::Line => "Line",
            Formation::Phalanx => "Phalanx",
            Formation::Wedge => "Wedge",
            Formation::Square => "Square",
            Formation::Skirmish => "Skirmish",
            Formation::Column => "Column",
            Formation::Echelon => "Echelon",
            Formation::Tortoise => "Tortoise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Formation::Line => "Standard infantry line with archer support",
            Formation::Phalanx => "Dense spear formation, strong defense",
            Formation::Wedge => "Cavalry wedge formation for breaking lines",
            Formation::Square => "Defensive square against cavalry",
            Formation::Skirmish => "Loose formation for archers and skirmishers",
            Formation::Column => "Fast marching column",
            Formation::Echelon => "Staggered formation for flanking",
            Formation::Tortoise => "Testudo formation with overlapping shields",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup that falls back to Line
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn modifiers(&self) -> FormationModifiers {
        let (infantry, cavalry, archer, defense, movement) = match self {
            Formation::Line => (1.0, 0.8, 1.2, 0.9, 0.0),
            Formation::Phalanx => (1.3, 0.5, 0.7, 1.4, -0.2),
            Formation::Wedge => (0.9, 1.4, 0.6, 0.8, 0.1),
            Formation::Square => (1.1, 0.6, 1.0, 1.3, -0.3),
            Formation::Skirmish => (0.8, 0.9, 1.3, 0.7, 0.2),
            Formation::Column => (1.0, 1.1, 0.8, 0.8, 0.3),
            Formation::Echelon => (1.1, 1.2, 0.9, 0.9, 0.0),
            Formation::Tortoise => (1.2, 0.4, 0.5, 1.5, -0.4),
        };
        FormationModifiers {
            infantry,
            cavalry,
            archer,
            defense,
            movement,
        }
    }

    /// Army power multiplier: mean of the four combat modifiers
    pub fn power_bonus(&self) -> f64 {
        let m = self.modifiers();
        (m.infantry + m.cavalry + m.archer + m.defense) / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_power_bonus() {
        assert!((Formation::Line.power_bonus() - 0.975).abs() < 1e-9);
    }

    #[test]
    fn test_power_bonus_positive_for_all() {
        for formation in Formation::ALL {
            assert!(formation.power_bonus() > 0.0, "{}", formation.name());
        }
    }

    #[test]
    fn test_lookup_falls_back_to_line() {
        assert_eq!(Formation::lookup("Circle"), Formation::Line);
        assert_eq!(Formation::parse("tortoise"), Some(Formation::Tortoise));
    }
}
