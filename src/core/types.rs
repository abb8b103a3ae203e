//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Chat-platform user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// Guild (server) identifier; commanders are scoped per guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

/// Identity pair every operation is keyed by
///
/// A commander and its army share the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommanderKey {
    pub player: PlayerId,
    pub scope: ScopeId,
}

impl CommanderKey {
    pub fn new(player: u64, scope: u64) -> Self {
        Self {
            player: PlayerId(player),
            scope: ScopeId(scope),
        }
    }

    /// Another player in the same scope
    pub fn with_player(&self, player: u64) -> Self {
        Self {
            player: PlayerId(player),
            scope: self.scope,
        }
    }
}

impl fmt::Display for CommanderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.player.0, self.scope.0)
    }
}

/// Unique identifier for a duel session or pending challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DuelId(pub Uuid);

impl DuelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DuelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DuelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a war
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WarId(pub Uuid);

impl WarId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WarId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of a war
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn other(&self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commander_key_equality() {
        let a = CommanderKey::new(1, 10);
        let b = CommanderKey::new(1, 10);
        let c = CommanderKey::new(1, 11);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_commander_key_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<CommanderKey, &str> = HashMap::new();
        map.insert(CommanderKey::new(7, 1), "marshal");
        assert_eq!(map.get(&CommanderKey::new(7, 1)), Some(&"marshal"));
        assert_eq!(map.get(&CommanderKey::new(7, 2)), None);
    }

    #[test]
    fn test_with_player_keeps_scope() {
        let key = CommanderKey::new(1, 42);
        let other = key.with_player(2);
        assert_eq!(other.scope, key.scope);
        assert_eq!(other.player, PlayerId(2));
    }

    #[test]
    fn test_team_other() {
        assert_eq!(Team::A.other(), Team::B);
        assert_eq!(Team::B.other(), Team::A);
    }

    #[test]
    fn test_session_ids_unique() {
        assert_ne!(DuelId::new(), DuelId::new());
        assert_ne!(WarId::new(), WarId::new());
    }
}
