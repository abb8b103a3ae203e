//! Army type and formation switching

use crate::army::model::Army;
use crate::core::error::{Rejection, Result};
use crate::tables::{ArmyType, Formation};

/// Switch specialization for one tactical point
pub fn change_army_type(army: &mut Army, name: &str) -> Result<ArmyType> {
    let army_type = ArmyType::parse(name).ok_or_else(|| Rejection::UnknownArmyType(name.to_string()))?;
    if army.tactical_points < 1 {
        return Err(Rejection::InsufficientTacticalPoints.into());
    }

    army.tactical_points -= 1;
    army.army_type = army_type;
    Ok(army_type)
}

/// Formation changes are free
pub fn change_formation(army: &mut Army, name: &str) -> Result<Formation> {
    let formation = Formation::parse(name).ok_or_else(|| Rejection::UnknownFormation(name.to_string()))?;
    army.formation = formation;
    Ok(formation)
}
