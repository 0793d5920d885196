//! Error types for the groove-social crate.
//!
//! Manager passes are self-healing by design: missing dancers are pruned,
//! degenerate collections take documented fallbacks. Errors exist only
//! for API misuse by an embedding caller.

use groove_types::{CongaLineId, CrewId, DancerId, GroupId};

/// Errors that can occur when driving the social managers directly.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// A dancer ID was not found in the arena.
    #[error("dancer not found: {0}")]
    DancerNotFound(DancerId),

    /// A group ID was not found in the manager.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// A conga line ID was not found in the manager.
    #[error("conga line not found: {0}")]
    LineNotFound(CongaLineId),

    /// A crew ID was not found in the manager.
    #[error("crew not found: {0}")]
    CrewNotFound(CrewId),
}
