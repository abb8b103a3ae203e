//! Battlefield terrain and its effects
//!
//! Every duel and war is fought on one terrain, rolled at creation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Combat category a terrain modifier applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affinity {
    Infantry,
    Archery,
    Cavalry,
    Defense,
}

/// Multiplicative terrain modifiers (1.0 = neutral)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainModifiers {
    pub infantry: f64,
    pub cavalry: f64,
    pub archery: f64,
    pub defense: f64,
    /// Scales the surprise-attack chance in wars
    pub ambush: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    OpenPlains,
    DenseForest,
    RockyMountains,
    SwampyMarshlands,
    DesertWastes,
    FrozenTundra,
    HillyHighlands,
    RiverCrossing,
    ForestHills,
    CoastalCliffs,
}

impl Terrain {
    pub const ALL: [Terrain; 10] = [
        Terrain::OpenPlains,
        Terrain::DenseForest,
        Terrain::RockyMountains,
        Terrain::SwampyMarshlands,
        Terrain::DesertWastes,
        Terrain::FrozenTundra,
        Terrain::HillyHighlands,
        Terrain::RiverCrossing,
        Terrain::ForestHills,
        Terrain::CoastalCliffs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::OpenPlains => "Open Plains",
            Terrain::DenseForest => "Dense Forest",
            Terrain::RockyMountains => "Rocky Mountains",
            Terrain::SwampyMarshlands => "Swampy Marshlands",
            Terrain::DesertWastes => "Desert Wastes",
            Terrain::FrozenTundra => "Frozen Tundra",
            Terrain::HillyHighlands => "Hilly Highlands",
            Terrain::RiverCrossing => "River Crossing",
            Terrain::ForestHills => "Forest Hills",
            Terrain::CoastalCliffs => "Coastal Cliffs",
        }
    }

    /// Exact (case-insensitive) name match
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup that falls back to Open Plains
    pub fn lookup(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Roll a battlefield
    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Terrain::OpenPlains)
    }

    pub fn modifiers(&self) -> TerrainModifiers {
        let (infantry, defense, cavalry, archery, ambush) = match self {
            Terrain::OpenPlains => (1.1, 1.0, 1.3, 1.2, 0.5),
            Terrain::DenseForest => (0.9, 1.2, 0.6, 0.7, 1.5),
            Terrain::RockyMountains => (0.8, 1.4, 0.4, 0.8, 1.3),
            Terrain::SwampyMarshlands => (0.7, 1.1, 0.3, 0.6, 1.4),
            Terrain::DesertWastes => (0.9, 0.9, 0.8, 0.9, 0.7),
            Terrain::FrozenTundra => (0.8, 1.0, 0.7, 0.8, 0.8),
            Terrain::HillyHighlands => (1.0, 1.3, 0.9, 1.1, 1.2),
            Terrain::RiverCrossing => (0.8, 1.5, 0.5, 1.0, 1.1),
            Terrain::ForestHills => (0.9, 1.2, 0.7, 0.9, 1.4),
            Terrain::CoastalCliffs => (0.9, 1.6, 0.2, 1.3, 1.0),
        };
        TerrainModifiers {
            infantry,
            cavalry,
            archery,
            defense,
            ambush,
        }
    }

    /// Modifier for a single combat category
    pub fn modifier(&self, affinity: Affinity) -> f64 {
        let m = self.modifiers();
        match affinity {
            Affinity::Infantry => m.infantry,
            Affinity::Archery => m.archery,
            Affinity::Cavalry => m.cavalry,
            Affinity::Defense => m.defense,
        }
    }

    /// Weighted blend used by war damage: 30% infantry, 30% cavalry, 20% archery, 20% defense
    pub fn composite_factor(&self) -> f64 {
        let m = self.modifiers();
        0.3 * m.infantry + 0.3 * m.cavalry + 0.2 * m.archery + 0.2 * m.defense
    }
}
