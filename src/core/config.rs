//! Game configuration with documented constants
//!
//! All tunable numbers are collected here with a note on what they drive.
//! Values can be overridden from a TOML file; anything omitted keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{GameError, Result};

/// Configuration for the game engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === REGISTRATION ===
    /// Soldier capacity of a freshly registered army
    pub starting_max_soldiers: u32,
    /// Recruit capacity of a freshly registered army
    pub starting_max_recruits: u32,
    /// Tactical points granted at registration
    pub starting_tactical_points: u32,
    /// Unspent stat points granted at registration
    pub starting_stat_points: u32,

    // === RECRUITMENT ===
    /// Recruits allowed per 7-day window
    pub weekly_recruit_quota: u32,
    /// Inclusive range of the base recruitment draw
    pub recruit_base_min: i32,
    pub recruit_base_max: i32,
    /// Symmetric jitter added on top of the base draw
    pub recruit_jitter: i32,
    /// Floor applied after jitter, before morale scaling
    pub recruit_floor: i32,
    /// Minimum morale needed to recruit
    pub recruit_min_morale: u32,
    /// Minimum supplies needed to recruit
    pub recruit_min_supplies: u32,
    /// Recruits gained per supply spent
    pub recruits_per_supply: u32,
    /// Length of the recruitment window
    pub recruit_cooldown_days: i64,

    // === DAILY ACTIONS ===
    /// Duel challenges a commander may issue per window
    pub daily_actions: u32,
    /// Length of the daily window
    pub daily_window_hours: i64,

    // === TRAINING ===
    /// Recruits trained per supply spent
    pub recruits_per_training_supply: u32,
    /// Hard ceiling on the per-unit desertion probability
    pub desertion_cap: f64,
    /// Desertion probability at perfect morale and supplies
    pub desertion_base: f64,
    /// Knight conversion chance before volume and level terms
    pub knight_chance_base: f64,
    /// Ceiling of the knight chance
    pub knight_chance_cap: f64,
    /// Ceiling of the batch-volume contribution to knight chance
    pub knight_volume_cap: f64,
    /// Batch size is divided by this to get the volume contribution
    ///
    /// Not a typo for 1000. The knight-chance formula is usually written
    /// `amount / 1000`, yet the reference odds (100 recruits at level 1
    /// gives about 0.081) only hold with 10000: 0.07 + 0.01 + 0.001. The
    /// default matches those odds; 1000 gives the steeper curve, which
    /// caps that case at 0.15.
    pub knight_volume_divisor: f64,
    /// Knight chance gained per commander level
    pub knight_chance_per_level: f64,
    /// Morale gained by a successful training session
    pub training_morale_gain: u32,

    // === FORTIFICATION ===
    pub fortification_cost: u32,
    pub fortification_bonus_min: u32,
    pub fortification_bonus_max: u32,

    // === ARMY POWER ===
    /// Power multiplier at zero morale
    ///
    /// Both 0.5x-1.0x and 0.75x-1.25x curves are in use; the default is
    /// 0.5 + morale/100 * 0.5 and both ends are tunable.
    pub power_morale_floor: f64,
    /// Extra multiplier gained between zero and full morale
    pub power_morale_span: f64,

    // === DUELS ===
    pub duel_starting_hp: u32,
    pub duel_winner_xp: u64,
    pub duel_loser_xp: u64,
    /// Advisory per-round timeout stored on each duel (seconds, not enforced)
    pub duel_round_timeout_secs: u32,
    /// Unanswered challenges are dropped after this long
    pub challenge_expiry_hours: i64,

    // === WARS ===
    /// Rounds after which a war is scored
    pub war_rounds: u32,
    pub war_winner_xp: u64,
    pub war_participation_xp: u64,
    /// Declarations not accepted within this long are called off
    pub war_declaration_expiry_hours: i64,

    // === SWEEPS ===
    /// Minutes between supply consumption sweeps
    pub supply_sweep_minutes: u64,
    /// Hours between weekly/daily reset sweeps
    pub reset_sweep_hours: u64,

    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_max_soldiers: 500,
            starting_max_recruits: 1000,
            starting_tactical_points: 5,
            starting_stat_points: 5,

            weekly_recruit_quota: 700,
            recruit_base_min: 50,
            recruit_base_max: 150,
            recruit_jitter: 20,
            recruit_floor: 10,
            recruit_min_morale: 30,
            recruit_min_supplies: 10,
            recruits_per_supply: 10,
            recruit_cooldown_days: 7,

            daily_actions: 3,
            daily_window_hours: 24,

            recruits_per_training_supply: 5,
            desertion_cap: 0.3,
            desertion_base: 0.01,
            knight_chance_base: 0.07,
            knight_chance_cap: 0.15,
            knight_volume_cap: 0.05,
            knight_volume_divisor: 10_000.0,
            knight_chance_per_level: 0.001,
            training_morale_gain: 2,

            fortification_cost: 20,
            fortification_bonus_min: 3,
            fortification_bonus_max: 7,

            power_morale_floor: 0.5,
            power_morale_span: 0.5,

            duel_starting_hp: 100,
            duel_winner_xp: 50,
            duel_loser_xp: 15,
            duel_round_timeout_secs: 60,
            challenge_expiry_hours: 24,

            war_rounds: 10,
            war_winner_xp: 200,
            war_participation_xp: 50,
            war_declaration_expiry_hours: 72,

            supply_sweep_minutes: 30,
            reset_sweep_hours: 24,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.recruit_base_min > self.recruit_base_max {
            return Err(GameError::Config(format!(
                "recruit_base_min ({}) must be <= recruit_base_max ({})",
                self.recruit_base_min, self.recruit_base_max
            )));
        }

        if self.recruit_base_min < 0 || self.recruit_jitter < 0 || self.recruit_floor < 0 {
            return Err(GameError::Config(format!(
                "recruit_base_min ({}), recruit_jitter ({}) and recruit_floor ({}) must not be negative",
                self.recruit_base_min, self.recruit_jitter, self.recruit_floor
            )));
        }

        if self.fortification_bonus_min > self.fortification_bonus_max {
            return Err(GameError::Config(format!(
                "fortification_bonus_min ({}) must be <= fortification_bonus_max ({})",
                self.fortification_bonus_min, self.fortification_bonus_max
            )));
        }

        if !(0.0..=1.0).contains(&self.desertion_cap) || self.desertion_base > self.desertion_cap {
            return Err(GameError::Config(
                "desertion_base must not exceed desertion_cap, which must be within [0, 1]".into(),
            ));
        }

        if self.knight_volume_divisor <= 0.0 {
            return Err(GameError::Config("knight_volume_divisor must be positive".into()));
        }

        if self.recruits_per_supply == 0 || self.recruits_per_training_supply == 0 {
            return Err(GameError::Config("supply ratios must be positive".into()));
        }

        if self.war_rounds == 0 || self.duel_starting_hp == 0 {
            return Err(GameError::Config("war_rounds and duel_starting_hp must be positive".into()));
        }

        if self.challenge_expiry_hours <= 0 || self.war_declaration_expiry_hours <= 0 {
            return Err(GameError::Config("session expiry windows must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str("weekly_recruit_quota = 900\nseed = 7\n").unwrap();
        assert_eq!(config.weekly_recruit_quota, 900);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.war_rounds, 10);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = GameConfig::from_toml_str("recruit_base_min = 200\nrecruit_base_max = 100\n");
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_negative_recruit_tuning_rejected() {
        for toml in ["recruit_jitter = -5\n", "recruit_floor = -1\n", "recruit_base_min = -10\n"] {
            let result = GameConfig::from_toml_str(toml);
            assert!(matches!(result, Err(GameError::Config(_))), "accepted {toml}");
        }
    }

    #[test]
    fn test_expiry_windows_must_be_positive() {
        let result = GameConfig::from_toml_str("challenge_expiry_hours = 0\n");
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.weekly_recruit_quota, 700);
    }
}
