//! Common error infrastructure for undercity-core.
//!
//! Generation, placement and pathing never fail: they degrade to fallbacks.
//! The errors here cover the remaining fail-fast class, which is running
//! turn, AI or NPC logic against a level or entity that does not exist.

use crate::state::{EntityId, GridParseError, LevelKind};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative request.
    Recoverable,
    /// Invalid input; should not retry without changes.
    Validation,
    /// Unexpected state inconsistency, usually a caller sequencing bug.
    Internal,
    /// State is unusable and the session cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all undercity errors.
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by the simulation when the caller sequences operations wrongly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("no active level; start a session first")]
    NoActiveLevel,

    #[error("enemy {0} not found on the active level")]
    EnemyNotFound(EntityId),

    #[error("npc {0} not found on the active level")]
    NpcNotFound(EntityId),

    #[error("content template `{0}` is missing")]
    MissingTemplate(String),

    #[error("already inside a generated level ({0})")]
    AlreadyInLevel(LevelKind),

    #[error("not inside a generated level")]
    NotInLevel,

    #[error("invalid depth {depth} (expected 1..={max})")]
    InvalidDepth { depth: u32, max: u32 },

    #[error("invalid town layout: {0}")]
    InvalidLayout(#[from] GridParseError),
}

impl GameError for SimError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveLevel | Self::EnemyNotFound(_) | Self::NpcNotFound(_) => {
                ErrorSeverity::Internal
            }
            Self::MissingTemplate(_) | Self::InvalidLayout(_) => ErrorSeverity::Fatal,
            Self::AlreadyInLevel(_) | Self::NotInLevel | Self::InvalidDepth { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveLevel => "SIM_NO_ACTIVE_LEVEL",
            Self::EnemyNotFound(_) => "SIM_ENEMY_NOT_FOUND",
            Self::NpcNotFound(_) => "SIM_NPC_NOT_FOUND",
            Self::MissingTemplate(_) => "SIM_MISSING_TEMPLATE",
            Self::AlreadyInLevel(_) => "SIM_ALREADY_IN_LEVEL",
            Self::NotInLevel => "SIM_NOT_IN_LEVEL",
            Self::InvalidDepth { .. } => "SIM_INVALID_DEPTH",
            Self::InvalidLayout(_) => "SIM_INVALID_LAYOUT",
        }
    }
}
