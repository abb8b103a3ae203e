//! Static modifier tables
//!
//! Immutable lookup data. Every table is a closed enum with a total
//! `modifiers()` match; free-text names resolve through `parse` (strict)
//! or `lookup` (falls back to the table's default entry).

pub mod army_type;
pub mod formation;
pub mod siege;
pub mod tactic;
pub mod terrain;
pub mod weather;

pub use army_type::{ArmyType, ArmyTypeBonuses};
pub use formation::{Formation, FormationModifiers};
pub use siege::{SiegeEngine, SiegeEngineStats};
pub use tactic::{Tactic, TacticModifiers};
pub use terrain::{Affinity, Terrain, TerrainModifiers};
pub use weather::{Weather, WeatherModifiers};
