//! Status effects derived from an army's gauges

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::army::model::Army;
use crate::tables::ArmyType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusEffect {
    HighMorale,
    GoodMorale,
    PoorMorale,
    LowMorale,
    LimitedSupplies,
    LowSupplies,
    Fortified { bonus_pct: u32 },
    StrongFortifications { bonus_pct: u32 },
    Specialized { category: String, bonus: f64 },
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEffect::HighMorale => write!(f, "High Morale (+15% effectiveness)"),
            StatusEffect::GoodMorale => write!(f, "Good Morale (+5% effectiveness)"),
            StatusEffect::PoorMorale => write!(f, "Poor Morale (-10% effectiveness)"),
            StatusEffect::LowMorale => write!(f, "Low Morale (-20% effectiveness)"),
            StatusEffect::LimitedSupplies => write!(f, "Limited Supplies (reduced recruitment)"),
            StatusEffect::LowSupplies => write!(f, "Low Supplies (desertion risk)"),
            StatusEffect::Fortified { bonus_pct } => write!(f, "Fortified (+{bonus_pct}% defense)"),
            StatusEffect::StrongFortifications { bonus_pct } => {
                write!(f, "Strong Fortifications (+{bonus_pct}% defense)")
            }
            StatusEffect::Specialized { category, bonus } => {
                write!(f, "Specialized: {category} x{bonus:.1}")
            }
        }
    }
}

pub fn status_effects(army: &Army) -> Vec<StatusEffect> {
    let mut effects = Vec::new();

    match army.morale {
        m if m >= 90 => effects.push(StatusEffect::HighMorale),
        m if m >= 70 => effects.push(StatusEffect::GoodMorale),
        m if m <= 30 => effects.push(StatusEffect::LowMorale),
        m if m <= 50 => effects.push(StatusEffect::PoorMorale),
        _ => {}
    }

    match army.supplies {
        s if s <= 20 => effects.push(StatusEffect::LowSupplies),
        s if s <= 50 => effects.push(StatusEffect::LimitedSupplies),
        _ => {}
    }

    match army.fortifications {
        f if f >= 50 => effects.push(StatusEffect::StrongFortifications { bonus_pct: f / 10 }),
        f if f >= 20 => effects.push(StatusEffect::Fortified { bonus_pct: f / 20 }),
        _ => {}
    }

    if army.army_type != ArmyType::Balanced {
        let (category, bonus) = army.army_type.bonuses().strongest();
        effects.push(StatusEffect::Specialized {
            category: category.to_string(),
            bonus,
        });
    }

    effects
}
