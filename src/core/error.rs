use thiserror::Error;

/// Recoverable validation failures, reported to the player verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Thou art not registered in this realm")]
    NotRegistered,

    #[error("Thou art already registered in this realm")]
    AlreadyRegistered,

    #[error("Weekly recruitment limit reached")]
    WeeklyQuotaReached,

    #[error("Morale too low for recruitment (need at least {need}, have {have})")]
    MoraleTooLow { need: u32, have: u32 },

    #[error("Insufficient supplies! Need {need}, have {have}")]
    InsufficientSupplies { need: u32, have: u32 },

    #[error("Can only recruit {remaining} more this week")]
    QuotaExceeded { remaining: u32 },

    #[error("Recruit capacity full! Can only recruit {available} more")]
    RecruitCapacityFull { available: u32 },

    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    #[error("Thou only hast {have} recruits to train")]
    NotEnoughRecruits { have: u32 },

    #[error("Not enough stat points (have {have})")]
    InsufficientStatPoints { have: u32 },

    #[error("Unknown stat '{0}'")]
    UnknownStat(String),

    #[error("Insufficient tactical points! Need at least 1")]
    InsufficientTacticalPoints,

    #[error("Unknown army type '{0}'")]
    UnknownArmyType(String),

    #[error("Unknown formation '{0}'")]
    UnknownFormation(String),

    #[error("Unknown duel action '{0}'")]
    UnknownAction(String),

    #[error("Unknown war tactic '{0}'")]
    UnknownTactic(String),

    #[error("It is not thy turn")]
    NotYourTurn,

    #[error("This contest has already ended")]
    SessionEnded,

    #[error("No such duel or war")]
    SessionNotFound,

    #[error("Thou art not a party to this contest")]
    NotParticipant,

    #[error("The war has not yet begun")]
    WarNotStarted,

    #[error("The war has already begun and must be fought to its end")]
    WarAlreadyBegun,

    #[error("Thou canst not challenge thyself")]
    SelfChallenge,

    #[error("Thy opponent is already engaged in another contest")]
    AlreadyEngaged,

    #[error("Wager of {wager} prestige exceeds available prestige ({have})")]
    WagerNotCovered { wager: u32, have: u32 },

    #[error("Daily action limit reached; try again after the next reset")]
    DailyLimitReached,
}

/// Every failure the engine can surface
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl GameError {
    /// Line shown to the player; internals never leak past this
    pub fn user_message(&self) -> String {
        match self {
            GameError::Rejected(reason) => reason.to_string(),
            _ => "An ill omen befell the command! Please try again.".to_string(),
        }
    }

    /// Validation failures are expected; everything else gets logged
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameError::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
