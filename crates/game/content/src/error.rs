//! Content validation errors.

use undercity_core::state::{GridParseError, Position};
use undercity_core::{ErrorSeverity, GameError};

/// Problems found while validating a content catalog.
///
/// These are caught once at load time so the simulation never has to
/// discover a dangling template id in the middle of a turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("enemy table refers to unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("curfew template `{0}` is not defined")]
    MissingCurfewTemplate(&'static str),

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("town layout does not parse: {0}")]
    InvalidTown(#[from] GridParseError),

    #[error("{what} at {position} is not a walkable town cell")]
    BlockedTownCell { what: String, position: Position },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate(_) => "CONTENT_UNKNOWN_TEMPLATE",
            Self::MissingCurfewTemplate(_) => "CONTENT_MISSING_CURFEW_TEMPLATE",
            Self::DuplicateId { .. } => "CONTENT_DUPLICATE_ID",
            Self::InvalidTown(_) => "CONTENT_INVALID_TOWN",
            Self::BlockedTownCell { .. } => "CONTENT_BLOCKED_TOWN_CELL",
        }
    }
}
