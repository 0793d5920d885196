//! Dancer agents for the Groove simulation.
//!
//! This crate owns the global move catalog and everything a single dancer
//! does in a tick: beat response, move selection and invention, learning
//! from neighbors, conga following, kinematics, and energy management.
//! Celebrity dancers add a floor-wide influence pass on top of the
//! standard update.
//!
//! Multi-dancer structures (groups, conga lines, trends, relationships,
//! crews) live in `groove-social`; this crate only emits the proposals
//! those managers consume.

pub mod celebrity;
pub mod config;
pub mod dancer;
pub mod error;
pub mod moves;

pub use celebrity::apply_celebrity_influence;
pub use config::BehaviorConfig;
pub use dancer::{Dancer, DancerKind, DancerSnapshot, UpdateOutcome, weighted_choice};
pub use error::AgentError;
pub use moves::{DanceMove, MoveCatalog, learn_chance};
