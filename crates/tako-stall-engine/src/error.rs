/*
[INPUT]:  Rejected operator actions (cart, commit, payment, removal, edit)
[OUTPUT]: Structured rejection types with user-facing classification
[POS]:    Error handling layer - unified error type for the engine
[UPDATE]: When adding new policy rejections
*/

use thiserror::Error;

use crate::types::{LineId, QueueNumber};

/// Policy rejections raised by the order engine.
///
/// None of these are fatal: the engine state is left untouched whenever one
/// is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Neither a drink quantity nor a filling was chosen
    #[error("nothing to add: choose a filling or a drink first")]
    NothingToAdd,

    /// Commit requested on an empty draft cart
    #[error("draft cart is empty")]
    EmptyDraft,

    /// Commit requested while a draft line is loaded into the form
    #[error("finish editing line {line_id} before committing")]
    LineEditInProgress { line_id: LineId },

    /// Draft or queue line does not exist
    #[error("unknown line: {0}")]
    UnknownLine(LineId),

    /// No committed lines carry this queue number
    #[error("unknown queue number: #{0}")]
    UnknownQueueNumber(QueueNumber),

    /// Removal requested for a group with unpaid lines
    #[error("order #{0} is not fully paid")]
    Unpaid(QueueNumber),

    /// A whole-order edit is already staged in the draft cart
    #[error("order #{active} is already being edited")]
    OrderEditActive { active: QueueNumber },

    /// Confirm requested with no removal awaiting confirmation
    #[error("no removal is awaiting confirmation")]
    NoPendingRemoval,

    /// The queue counter cannot advance past this number
    #[error("no queue numbers left after #{last}")]
    QueueExhausted { last: QueueNumber },

    /// Engine configuration is out of range
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Check whether the rejection should be surfaced to the operator as a warning
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::NothingToAdd
                | EngineError::EmptyDraft
                | EngineError::LineEditInProgress { .. }
                | EngineError::Unpaid(_)
                | EngineError::OrderEditActive { .. }
                | EngineError::QueueExhausted { .. }
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
