//! Error types for the groove-agents crate.
//!
//! Per-tick behavior never fails: degenerate states (no valid move, empty
//! weight sets) are handled by documented fallback policies. The errors
//! here cover API misuse only -- registering a duplicate move name or
//! referencing a move the catalog has never seen.

use groove_types::MoveId;

/// Errors that can occur during catalog and dancer operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A move with the given name already exists in the catalog.
    #[error("duplicate move name: {0}")]
    DuplicateMoveName(String),

    /// A move ID was not found in the catalog.
    #[error("unknown move: {0}")]
    UnknownMove(MoveId),
}
