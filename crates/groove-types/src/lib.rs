//! Shared type definitions for the Groove dance-floor simulation.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries in the Groove workspace: identity handles, the beat signal
//! contract, personality vectors, and floor geometry.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (relationship kinds, floor moods)
//! - [`beat`] -- The per-tick beat signal consumed by every dancer
//! - [`structs`] -- Personality, floor bounds, and color

pub mod beat;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use beat::BeatSignal;
pub use enums::{FloorMood, RelationshipKind};
pub use ids::{CongaLineId, CrewId, DancerId, GroupId, MoveId};
pub use structs::{Color, FLOOR_MARGIN, FloorBounds, Personality, clamp_unit};
