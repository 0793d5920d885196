//! Crowd spawning: random personalities, personality-derived colors, and
//! spawn placement.
//!
//! Personalities draw each trait uniformly from [0.1, 0.9]; extroversion
//! and creativity are additionally scaled by the config's sociability and
//! creativity multipliers (0.5 is neutral, so a multiplier of 1.0 doubles
//! the draw before clamping). Colors map creativity/rhythm to hue,
//! extroversion to saturation, and the energy trait to value, so a
//! glance at the floor reads as a personality histogram. Celebrities are
//! always gold.

use glam::Vec2;
use rand::Rng;
use tracing::info;

use groove_core::PartyState;
use groove_core::config::CrowdSection;
use groove_types::{Color, DancerId, FloorBounds, Personality};

/// Draw a random personality, applying creation-time multipliers.
pub fn random_personality(
    default_creativity: f32,
    default_sociability: f32,
    rng: &mut impl Rng,
) -> Personality {
    Personality::new(
        rng.random_range(0.1..0.9) * default_sociability * 2.0,
        rng.random_range(0.1..0.9),
        rng.random_range(0.1..0.9) * default_creativity * 2.0,
        rng.random_range(0.1..0.9),
        rng.random_range(0.1..0.9),
    )
}

/// Derive a dancer's render color from its personality.
pub fn personality_color(personality: &Personality) -> Color {
    let hue =
        (personality.creativity * 0.7 + personality.rhythm_sensitivity * 0.3).rem_euclid(1.0);
    let saturation = 0.7 + personality.extroversion * 0.3;
    let value = 0.7 + personality.energy * 0.3;
    Color::from_hsv(hue, saturation, value)
}

/// Pick a spawn position inset `margin` from every floor edge.
pub fn spawn_position(bounds: &FloorBounds, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let max_x = (bounds.width - margin).max(margin);
    let max_y = (bounds.height - margin).max(margin);
    Vec2::new(
        rng.random_range(margin..=max_x),
        rng.random_range(margin..=max_y),
    )
}

/// Spawn the configured starting crowd (dancers, then celebrities).
///
/// Returns the IDs of everyone spawned, dancers first.
pub fn spawn_crowd(
    state: &mut PartyState,
    crowd: &CrowdSection,
    rng: &mut impl Rng,
) -> Vec<DancerId> {
    let bounds = state.bounds;
    let mut spawned = Vec::with_capacity(crowd.initial_dancers + crowd.celebrities);

    for _ in 0..crowd.initial_dancers {
        let personality =
            random_personality(crowd.default_creativity, crowd.default_sociability, rng);
        let color = personality_color(&personality);
        let position = spawn_position(&bounds, crowd.spawn_margin, rng);
        spawned.push(state.add_dancer(personality, position, color));
    }

    for _ in 0..crowd.celebrities {
        let position = spawn_position(&bounds, crowd.spawn_margin, rng);
        spawned.push(state.add_celebrity(position, Color::GOLD));
    }

    info!(
        dancers = crowd.initial_dancers,
        celebrities = crowd.celebrities,
        "crowd spawned"
    );
    spawned
}

#[cfg(test)]
mod tests {
    use groove_agents::BehaviorConfig;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn personalities_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..200 {
            let p = random_personality(0.5, 0.5, &mut rng);
            for trait_value in [
                p.extroversion,
                p.rhythm_sensitivity,
                p.creativity,
                p.trendsetter,
                p.energy,
            ] {
                assert!((0.0..=1.0).contains(&trait_value));
            }
        }
    }

    #[test]
    fn multipliers_shift_the_draws() {
        let mut rng = SmallRng::seed_from_u64(2);
        // A maxed creativity multiplier doubles every draw; the lowest
        // possible result is 0.2 and most hit the 1.0 clamp ceiling.
        for _ in 0..50 {
            let p = random_personality(1.0, 0.5, &mut rng);
            assert!(p.creativity >= 0.2);
        }
        // A zero multiplier nulls the trait entirely.
        for _ in 0..50 {
            let p = random_personality(0.0, 0.5, &mut rng);
            assert!(p.creativity.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn spawn_positions_respect_margin() {
        let mut rng = SmallRng::seed_from_u64(3);
        let bounds = FloorBounds::new(800.0, 600.0);
        for _ in 0..200 {
            let position = spawn_position(&bounds, 50.0, &mut rng);
            assert!(position.x >= 50.0 && position.x <= 750.0);
            assert!(position.y >= 50.0 && position.y <= 550.0);
        }
    }

    #[test]
    fn spawn_crowd_fills_the_floor() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut state = PartyState::new(
            FloorBounds::new(1024.0, 768.0),
            BehaviorConfig::default(),
            0.1,
            9,
        );
        let crowd = CrowdSection {
            initial_dancers: 12,
            celebrities: 2,
            ..CrowdSection::default()
        };

        let ids = spawn_crowd(&mut state, &crowd, &mut rng);

        assert_eq!(ids.len(), 14);
        assert_eq!(state.dancers.len(), 14);
        let celebrity_count = state
            .dancers
            .values()
            .filter(|d| d.kind.is_celebrity())
            .count();
        assert_eq!(celebrity_count, 2);
        // Celebrities wear gold.
        for dancer in state.dancers.values() {
            if dancer.kind.is_celebrity() {
                assert_eq!(dancer.color, Color::GOLD);
            }
        }
    }

    #[test]
    fn color_derivation_is_deterministic() {
        let p = Personality::new(0.5, 0.5, 0.5, 0.5, 0.5);
        assert_eq!(personality_color(&p), personality_color(&p));
    }
}
