//! Celebrity dancers: construction and the post-update influence pass.
//!
//! A celebrity is not a subclass; it is a [`DancerKind::Celebrity`] tag on
//! the shared dancer record. The standard update runs unchanged, and the
//! tick cycle explicitly dispatches [`apply_celebrity_influence`] afterward
//! for each celebrity on the floor.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use groove_types::{Color, DancerId, Personality};

use crate::config::BehaviorConfig;
use crate::dancer::{Dancer, DancerKind};
use crate::moves::MoveCatalog;

impl Dancer {
    /// Create a celebrity dancer.
    ///
    /// Celebrities carry a fixed near-maximal personality, a 150-unit
    /// social/influence radius, a much faster move-change cadence, and a
    /// signature move (name prefixed "Celebrity ") they start on.
    pub fn new_celebrity(
        position: Vec2,
        color: Color,
        catalog: &mut MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let personality = Personality::new(0.9, 0.9, 0.95, 0.95, 0.9);

        // The standard constructor already invents a personal move for a
        // 0.95-creativity dancer; the signature is a second, prefixed one.
        let mut celebrity = Self::new(personality, position, color, catalog, cfg, rng);
        let signature_move = celebrity.invent_move(Some("Celebrity "), catalog, rng);

        celebrity.social_radius = cfg.celebrity_influence_radius;
        celebrity.move_change_threshold = cfg.celebrity_move_threshold;
        celebrity.kind = DancerKind::Celebrity {
            influence_radius: cfg.celebrity_influence_radius,
            signature_move,
        };

        debug!(dancer = %celebrity.id, "celebrity joined the floor");
        celebrity
    }
}

/// Run one celebrity's influence pass over the whole floor.
///
/// Every dancer inside the influence radius gets a flat per-tick chance to
/// learn the celebrity's current move (through the standard learning
/// roll), and is pulled toward the celebrity with strength falling off
/// linearly with distance. The celebrity itself occasionally reverts to
/// its signature move.
///
/// No-op when `celebrity_id` is missing or not actually a celebrity.
pub fn apply_celebrity_influence(
    celebrity_id: DancerId,
    dancers: &mut BTreeMap<DancerId, Dancer>,
    catalog: &MoveCatalog,
    cfg: &BehaviorConfig,
    rng: &mut impl Rng,
) {
    let Some(celebrity) = dancers.get(&celebrity_id) else {
        return;
    };
    let DancerKind::Celebrity {
        influence_radius,
        signature_move,
    } = celebrity.kind
    else {
        return;
    };
    let celebrity_position = celebrity.position;
    let celebrity_move = celebrity.current_move;

    let ids: Vec<DancerId> = dancers.keys().copied().collect();
    for id in ids {
        if id == celebrity_id {
            continue;
        }
        let Some(dancer) = dancers.get_mut(&id) else {
            continue;
        };
        let distance = dancer.position.distance(celebrity_position);
        if distance >= influence_radius {
            continue;
        }

        if rng.random::<f32>() < cfg.celebrity_teach_probability {
            if let Some(mv) = catalog.get(celebrity_move) {
                dancer.try_learn(mv, rng);
            }
        }

        let attraction = cfg.celebrity_attraction_factor * (1.0 - distance / influence_radius);
        dancer.move_toward(celebrity_position, attraction, cfg);
    }

    if rng.random::<f32>() < cfg.signature_revert_probability {
        if let Some(celebrity) = dancers.get_mut(&celebrity_id) {
            if celebrity.current_move != signature_move {
                celebrity.current_move = signature_move;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn setup() -> (MoveCatalog, BehaviorConfig, SmallRng) {
        (
            MoveCatalog::with_basic_moves(),
            BehaviorConfig::default(),
            SmallRng::seed_from_u64(77),
        )
    }

    #[test]
    fn celebrity_construction() {
        let (mut catalog, cfg, mut rng) = setup();
        let celebrity =
            Dancer::new_celebrity(Vec2::new(400.0, 300.0), Color::GOLD, &mut catalog, &cfg, &mut rng);

        assert!(celebrity.kind.is_celebrity());
        assert!((celebrity.social_radius - 150.0).abs() < f32::EPSILON);
        assert!((celebrity.move_change_threshold - 0.5).abs() < f32::EPSILON);
        assert!((celebrity.personality.creativity - 0.95).abs() < f32::EPSILON);

        // Five basics + the constructor's personal move + the signature.
        assert_eq!(catalog.len(), 7);

        if let DancerKind::Celebrity { signature_move, .. } = celebrity.kind {
            assert_eq!(celebrity.current_move, signature_move);
            let name = catalog
                .get(signature_move)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            assert!(name.starts_with("Celebrity "));
        }
    }

    #[test]
    fn influence_teaches_and_attracts() {
        let (mut catalog, cfg, mut rng) = setup();
        let cfg = BehaviorConfig {
            celebrity_teach_probability: 1.0,
            signature_revert_probability: 0.0,
            ..cfg
        };

        let mut dancers = BTreeMap::new();
        let mut celebrity =
            Dancer::new_celebrity(Vec2::new(400.0, 300.0), Color::GOLD, &mut catalog, &cfg, &mut rng);

        // Give the celebrity a trivially learnable current move so the
        // learning roll is certain for a max-rhythm student.
        let easy = catalog.register(String::from("Nod"), 0.0, 0.1, None);
        assert!(easy.is_ok());
        if let Ok(easy) = easy {
            celebrity.current_move = easy;
        }
        let celebrity_id = celebrity.id;

        let student_personality = Personality::new(0.5, 1.0, 0.5, 0.5, 0.5);
        let student = Dancer::new(
            student_personality,
            Vec2::new(450.0, 300.0),
            Color::new(10, 20, 30),
            &mut catalog,
            &cfg,
            &mut rng,
        );
        let student_id = student.id;

        dancers.insert(celebrity_id, celebrity);
        dancers.insert(student_id, student);

        apply_celebrity_influence(celebrity_id, &mut dancers, &catalog, &cfg, &mut rng);

        let student = dancers.get(&student_id);
        assert!(student.is_some());
        if let Some(student) = student {
            let easy_id = catalog.id_by_name("Nod");
            assert!(easy_id.is_some_and(|id| student.known_moves.contains(&id)));
            // Pulled toward the celebrity (negative x direction).
            assert!(student.velocity.x < 0.0);
        }
    }

    #[test]
    fn influence_skips_dancers_outside_radius() {
        let (mut catalog, cfg, mut rng) = setup();
        let cfg = BehaviorConfig {
            celebrity_teach_probability: 1.0,
            ..cfg
        };

        let mut dancers = BTreeMap::new();
        let celebrity =
            Dancer::new_celebrity(Vec2::new(100.0, 100.0), Color::GOLD, &mut catalog, &cfg, &mut rng);
        let celebrity_id = celebrity.id;

        let far = Dancer::new(
            Personality::new(0.5, 1.0, 0.5, 0.5, 0.5),
            Vec2::new(700.0, 700.0),
            Color::new(10, 20, 30),
            &mut catalog,
            &cfg,
            &mut rng,
        );
        let far_id = far.id;

        dancers.insert(celebrity_id, celebrity);
        dancers.insert(far_id, far);

        apply_celebrity_influence(celebrity_id, &mut dancers, &catalog, &cfg, &mut rng);

        let far = dancers.get(&far_id);
        assert!(far.is_some_and(|d| d.velocity.length() < f32::EPSILON));
    }

    #[test]
    fn celebrity_reverts_to_signature() {
        let (mut catalog, cfg, mut rng) = setup();
        let cfg = BehaviorConfig {
            signature_revert_probability: 1.0,
            ..cfg
        };

        let mut dancers = BTreeMap::new();
        let mut celebrity =
            Dancer::new_celebrity(Vec2::new(400.0, 300.0), Color::GOLD, &mut catalog, &cfg, &mut rng);
        let celebrity_id = celebrity.id;
        let signature = match celebrity.kind {
            DancerKind::Celebrity { signature_move, .. } => Some(signature_move),
            DancerKind::Standard => None,
        };

        celebrity.current_move = catalog.id_by_name("Jump").unwrap_or_default();
        dancers.insert(celebrity_id, celebrity);

        apply_celebrity_influence(celebrity_id, &mut dancers, &catalog, &cfg, &mut rng);

        let current = dancers.get(&celebrity_id).map(|d| d.current_move);
        assert_eq!(current, signature);
    }

    #[test]
    fn influence_on_standard_dancer_is_noop() {
        let (mut catalog, cfg, mut rng) = setup();
        let mut dancers = BTreeMap::new();
        let plain = Dancer::new(
            Personality::balanced(),
            Vec2::new(50.0, 50.0),
            Color::new(1, 2, 3),
            &mut catalog,
            &cfg,
            &mut rng,
        );
        let plain_id = plain.id;
        dancers.insert(plain_id, plain);

        // Dispatching the influence pass on a non-celebrity does nothing.
        apply_celebrity_influence(plain_id, &mut dancers, &catalog, &cfg, &mut rng);
        assert!(dancers.get(&plain_id).is_some_and(|d| d.velocity.length() < f32::EPSILON));
    }
}
