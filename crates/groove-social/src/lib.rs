//! Emergent social structures for the Groove simulation.
//!
//! Four lifecycle managers plus the trend tracker sit on top of the
//! dancer arena:
//!
//! - [`GroupManager`] -- transient spatial dance groups
//! - [`CongaManager`] -- leader-to-follower conga chains
//! - [`TrendTracker`] -- decaying per-move popularity scores
//! - [`RelationshipGraph`] -- pairwise friend/rival/neutral bonds
//! - [`CrewManager`] -- persistent crews grown from friendships
//!
//! All managers key dancers by [`DancerId`] handles and self-heal when a
//! dancer vanishes from the arena; none of them hold references into it.
//!
//! [`DancerId`]: groove_types::DancerId

pub mod conga;
pub mod crews;
pub mod error;
pub mod groups;
pub mod relationship;
pub mod trends;

pub use conga::{CongaLine, CongaManager};
pub use crews::{CrewManager, DanceCrew};
pub use error::SocialError;
pub use groups::{DanceGroup, GroupManager};
pub use relationship::{PairKey, Relationship, RelationshipGraph, compatibility};
pub use trends::TrendTracker;
