//! Tick cycle and orchestration for the Groove simulation.
//!
//! This crate wires the dancer arena (`groove-agents`) and the social
//! managers (`groove-social`) into a single frame-stepped state:
//!
//! - [`config`] -- typed configuration loaded from `groove-config.yaml`
//! - [`tick`] -- [`PartyState`] and the six-phase per-frame tick
//! - [`controls`] -- the between-tick control surface (moods, resize, ...)
//! - [`render`] -- read-only [`RenderFrame`] assembly for the renderer
//!
//! The simulation is single-threaded and synchronous: one tick per
//! rendered frame, no suspension, no locking. External collaborators
//! (beat source, renderer, UI) live outside this crate and talk to it
//! through [`BeatSignal`] input and [`RenderFrame`] output.
//!
//! [`PartyState`]: tick::PartyState
//! [`RenderFrame`]: render::RenderFrame
//! [`BeatSignal`]: groove_types::BeatSignal

pub mod config;
pub mod controls;
pub mod render;
pub mod tick;

pub use config::{ConfigError, PartyConfig};
pub use render::RenderFrame;
pub use tick::{PartyState, TickSummary};
