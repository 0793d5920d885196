//! Personality, floor geometry, and color types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Clamp a scalar to the unit range [0.0, 1.0].
///
/// Every bounded trait and score in the simulation passes through this
/// helper rather than trusting callers to stay in range.
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// Personality vector assigned at dancer creation.
///
/// Each trait is an `f32` in the range 0.0 to 1.0. Personality is the
/// stable identity of a dancer's behavioral tendencies; only floor-mood
/// presets applied by the control surface nudge individual traits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// How social the dancer is; drives social radius and group seeding.
    pub extroversion: f32,
    /// How well the dancer follows the beat; drives impulses and learning.
    pub rhythm_sensitivity: f32,
    /// Tendency to invent new moves rather than copy.
    pub creativity: f32,
    /// Influence on others; propensity to originate vs. follow trends.
    pub trendsetter: f32,
    /// How energetically the dancer moves (trait, not the live level).
    pub energy: f32,
}

impl Personality {
    /// Build a personality, clamping every trait to [0.0, 1.0].
    pub fn new(
        extroversion: f32,
        rhythm_sensitivity: f32,
        creativity: f32,
        trendsetter: f32,
        energy: f32,
    ) -> Self {
        Self {
            extroversion: clamp_unit(extroversion),
            rhythm_sensitivity: clamp_unit(rhythm_sensitivity),
            creativity: clamp_unit(creativity),
            trendsetter: clamp_unit(trendsetter),
            energy: clamp_unit(energy),
        }
    }

    /// A flat mid-range personality, useful as a test baseline.
    pub const fn balanced() -> Self {
        Self {
            extroversion: 0.5,
            rhythm_sensitivity: 0.5,
            creativity: 0.5,
            trendsetter: 0.5,
            energy: 0.5,
        }
    }

    /// Mean absolute trait difference over the kinematic-adjacent traits
    /// (extroversion, energy, rhythm sensitivity).
    ///
    /// This is the similarity score used by the neighbor scan: values
    /// below 0.3 read as "very similar" (attraction), above 0.7 as
    /// "very different" (repulsion).
    pub fn similarity_distance(&self, other: &Self) -> f32 {
        ((self.extroversion - other.extroversion).abs()
            + (self.energy - other.energy).abs()
            + (self.rhythm_sensitivity - other.rhythm_sensitivity).abs())
            / 3.0
    }
}

// ---------------------------------------------------------------------------
// FloorBounds
// ---------------------------------------------------------------------------

/// Inset from the floor edge inside which dancers are kept.
pub const FLOOR_MARGIN: f32 = 10.0;

/// The dance floor rectangle, supplied each tick for boundary clamping.
///
/// The floor may be resized at runtime; the control surface clamps
/// out-of-bounds dancers back inside after a resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorBounds {
    /// Floor width in floor units (pixels for the reference renderer).
    pub width: f32,
    /// Floor height in floor units.
    pub height: f32,
}

impl FloorBounds {
    /// Create bounds for a `width` x `height` floor.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a point to the playable area `[margin, extent - margin]`
    /// on each axis.
    ///
    /// Written as a max/min chain so a degenerate floor (smaller than
    /// twice the margin) still resolves to a point instead of panicking.
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.max(FLOOR_MARGIN).min(self.width - FLOOR_MARGIN),
            point.y.max(FLOOR_MARGIN).min(self.height - FLOOR_MARGIN),
        )
    }

    /// Whether a point already lies within the playable area.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= FLOOR_MARGIN
            && point.x <= self.width - FLOOR_MARGIN
            && point.y >= FLOOR_MARGIN
            && point.y <= self.height - FLOOR_MARGIN
    }
}

impl Default for FloorBounds {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Gold, reserved for celebrities.
    pub const GOLD: Self = Self {
        r: 255,
        g: 215,
        b: 0,
    };

    /// Create a color from raw channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert an HSV triple (each component in [0,1], hue wrapping) to RGB.
    ///
    /// Used by the spawner to derive a dancer's color from personality.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = clamp_unit(saturation);
        let v = clamp_unit(value);

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

/// Convert a unit-range channel to a byte.
fn channel(value: f32) -> u8 {
    (clamp_unit(value) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personality_clamps_traits() {
        let p = Personality::new(1.5, -0.2, 0.5, 0.9, 2.0);
        assert!((p.extroversion - 1.0).abs() < f32::EPSILON);
        assert!(p.rhythm_sensitivity.abs() < f32::EPSILON);
        assert!((p.energy - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn identical_personalities_have_zero_distance() {
        let p = Personality::balanced();
        assert!(p.similarity_distance(&p) < f32::EPSILON);
    }

    #[test]
    fn opposite_personalities_have_full_distance() {
        let a = Personality::new(0.0, 0.0, 0.5, 0.5, 0.0);
        let b = Personality::new(1.0, 1.0, 0.5, 0.5, 1.0);
        assert!((a.similarity_distance(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clamp_point_respects_margin() {
        let bounds = FloorBounds::new(200.0, 100.0);
        let clamped = bounds.clamp_point(Vec2::new(-50.0, 500.0));
        assert!((clamped.x - FLOOR_MARGIN).abs() < f32::EPSILON);
        assert!((clamped.y - (100.0 - FLOOR_MARGIN)).abs() < f32::EPSILON);
        assert!(bounds.contains(clamped));
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0), Color::new(255, 0, 0));
        assert_eq!(Color::from_hsv(1.0 / 3.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(Color::from_hsv(2.0 / 3.0, 1.0, 1.0), Color::new(0, 0, 255));
    }

    #[test]
    fn hsv_zero_saturation_is_grayscale() {
        let c = Color::from_hsv(0.42, 0.0, 0.5);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(Color::from_hsv(1.25, 1.0, 1.0), Color::from_hsv(0.25, 1.0, 1.0));
    }
}
