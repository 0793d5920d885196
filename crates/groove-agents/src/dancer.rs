//! Dancer state and the per-tick behavior update.
//!
//! A [`Dancer`] owns its kinematic and energy state plus its social links
//! (at most one leader it follows, any number of followers). The per-tick
//! [`update`] runs the behavior pipeline in a fixed order: beat response,
//! social behavior, neighbor scan, idle wander, kinematics, energy, and
//! target clearing.
//!
//! Cross-dancer reads go through [`DancerSnapshot`] slices captured before
//! any dancer mutates, so every scan observes the previous tick's settled
//! state. Structural proposals (conga recruitment) are returned in the
//! [`UpdateOutcome`] and applied by the conga manager, which owns every
//! follower-pointer write.
//!
//! [`update`]: Dancer::update

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use chrono::{DateTime, Utc};
use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use groove_types::{
    BeatSignal, Color, DancerId, FLOOR_MARGIN, FloorBounds, MoveId, Personality,
};

use crate::config::BehaviorConfig;
use crate::moves::{DanceMove, MoveCatalog, learn_chance};

// ---------------------------------------------------------------------------
// DancerKind
// ---------------------------------------------------------------------------

/// Which behavior profile a dancer runs.
///
/// Celebrities share the standard update; their extra influence pass and
/// signature-move reversion are dispatched explicitly by the tick cycle
/// (see the `celebrity` module) rather than through virtual override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DancerKind {
    /// A regular crowd member.
    Standard,
    /// A celebrity with amplified influence.
    Celebrity {
        /// Radius of the post-update influence pass.
        influence_radius: f32,
        /// The bespoke move created at construction.
        signature_move: MoveId,
    },
}

impl DancerKind {
    /// Whether this dancer is a celebrity.
    pub const fn is_celebrity(&self) -> bool {
        matches!(self, Self::Celebrity { .. })
    }
}

// ---------------------------------------------------------------------------
// DancerSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of a dancer captured at the start of a tick.
///
/// Neighbor scans, conga pursuit, and manager passes read these instead of
/// live state, so mutation order within a tick cannot leak into what other
/// dancers observe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DancerSnapshot {
    /// Identity of the dancer.
    pub id: DancerId,
    /// Position at the start of the tick.
    pub position: Vec2,
    /// Personality (copied; it is cheap and stable).
    pub personality: Personality,
    /// Social radius at the start of the tick.
    pub social_radius: f32,
    /// Move the dancer was performing at the start of the tick.
    pub current_move: MoveId,
    /// Leader this dancer was following, if any.
    pub following: Option<DancerId>,
    /// Whether the dancer had followers (i.e. leads a conga).
    pub leads_conga: bool,
}

// ---------------------------------------------------------------------------
// UpdateOutcome
// ---------------------------------------------------------------------------

/// Structural proposals emitted by a dancer update.
///
/// Dancers never write other dancers' state; the tick cycle hands these to
/// the managers that own the corresponding structures.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutcome {
    /// Dancers recruited for a new conga line, closest first. Empty when
    /// no recruitment was attempted or every roll failed.
    pub conga_recruits: Vec<DancerId>,
}

// ---------------------------------------------------------------------------
// Dancer
// ---------------------------------------------------------------------------

/// A dancing agent on the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Dancer {
    /// Stable identity handle.
    pub id: DancerId,
    /// Behavior profile (standard or celebrity).
    pub kind: DancerKind,
    /// Behavioral tendencies, fixed at creation (mood presets aside).
    pub personality: Personality,
    /// Current position on the floor.
    pub position: Vec2,
    /// Current velocity, integrated each tick.
    pub velocity: Vec2,
    /// Render color.
    pub color: Color,
    /// Live energy level in [energy floor, 1.0].
    pub energy: f32,
    /// The move currently being performed.
    pub current_move: MoveId,
    /// Moves this dancer knows; grows only.
    pub known_moves: BTreeSet<MoveId>,
    /// Distance within which this dancer notices others.
    pub social_radius: f32,
    /// Conga predecessor this dancer trails, if any.
    pub following: Option<DancerId>,
    /// Dancers trailing this one (back-references, no ownership).
    pub followers: Vec<DancerId>,
    /// Target point assigned on group join; cleared when reached.
    pub target_position: Option<Vec2>,
    /// The last global beat this dancer responded to.
    pub beat_cursor: u64,
    /// When the dancer joined the floor.
    pub created_at: DateTime<Utc>,
    /// Accumulated beat seconds since the last move change.
    pub(crate) move_timer: f32,
    /// Beat seconds after which the next re-selection triggers.
    pub(crate) move_change_threshold: f32,
    /// Personal rhythm variation added to the beat phase angle.
    pub(crate) phase_offset: f32,
}

impl Dancer {
    /// Create a standard dancer.
    ///
    /// The dancer starts on a random basic move with the full basic
    /// repertoire. Highly creative dancers (creativity above the
    /// configured threshold) immediately invent a personal move and start
    /// on it instead.
    pub fn new(
        personality: Personality,
        position: Vec2,
        color: Color,
        catalog: &mut MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let current_move = catalog
            .basic_moves()
            .choose(rng)
            .copied()
            .unwrap_or_default();
        let known_moves: BTreeSet<MoveId> = catalog.basic_moves().iter().copied().collect();

        let mut dancer = Self {
            id: DancerId::new(),
            kind: DancerKind::Standard,
            personality,
            position,
            velocity: Vec2::ZERO,
            color,
            energy: 1.0,
            current_move,
            known_moves,
            social_radius: cfg.social_radius(personality.extroversion),
            following: None,
            followers: Vec::new(),
            target_position: None,
            beat_cursor: 0,
            created_at: Utc::now(),
            move_timer: 0.0,
            move_change_threshold: rng
                .random_range(cfg.initial_move_threshold_min..cfg.initial_move_threshold_max),
            phase_offset: rng.random_range(0.0..TAU),
        };

        if personality.creativity > cfg.creation_invent_threshold {
            dancer.invent_move(None, catalog, rng);
        }

        dancer
    }

    /// Capture the read-only view other dancers and managers observe this
    /// tick.
    pub fn snapshot(&self) -> DancerSnapshot {
        DancerSnapshot {
            id: self.id,
            position: self.position,
            personality: self.personality,
            social_radius: self.social_radius,
            current_move: self.current_move,
            following: self.following,
            leads_conga: !self.followers.is_empty(),
        }
    }

    /// Run one tick of behavior.
    ///
    /// `neighbors` is the start-of-tick snapshot of every dancer on the
    /// floor (including this one; it skips itself by ID).
    pub fn update(
        &mut self,
        neighbors: &[DancerSnapshot],
        beat: &BeatSignal,
        bounds: &FloorBounds,
        catalog: &mut MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        self.respond_to_beat(beat, catalog, cfg, rng);

        if self.following.is_some() {
            self.follow_conga(neighbors, cfg, rng);
        } else if rng.random::<f32>() < cfg.conga_attempt_probability {
            outcome.conga_recruits = self.try_start_conga(neighbors, cfg, rng);
        }

        self.scan_neighbors(neighbors, catalog, cfg, rng);
        self.wander(cfg, rng);
        self.integrate(bounds, cfg);
        self.spend_energy(catalog, cfg);
        self.clear_reached_target(cfg);

        outcome
    }

    // -----------------------------------------------------------------------
    // Behavior steps
    // -----------------------------------------------------------------------

    /// Step 1: react to a new beat with a velocity impulse and, when the
    /// move timer runs out, a move re-selection.
    fn respond_to_beat(
        &mut self,
        beat: &BeatSignal,
        catalog: &mut MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) {
        if beat.beat_count <= self.beat_cursor {
            return;
        }
        if rng.random::<f32>() >= self.personality.rhythm_sensitivity {
            return;
        }

        let response = beat.beat_strength * self.personality.rhythm_sensitivity;
        let angle = self.phase_offset + beat.phase * TAU;
        self.velocity +=
            Vec2::from_angle(angle) * response * self.personality.energy * cfg.beat_impulse_scale;

        // The timer accumulates beat seconds, so faster tempos change
        // moves more often in wall-clock terms.
        if beat.tempo > 0.0 {
            self.move_timer += 60.0 / beat.tempo;
        }
        if self.move_timer >= self.move_change_threshold {
            self.select_new_move(catalog, cfg, rng);
            self.move_timer = 0.0;
            self.move_change_threshold = rng
                .random_range(cfg.redraw_move_threshold_min..cfg.redraw_move_threshold_max);
        }

        self.beat_cursor = beat.beat_count;
    }

    /// Step 2a: trail the conga predecessor at the configured distance.
    fn follow_conga(
        &mut self,
        neighbors: &[DancerSnapshot],
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) {
        let Some(leader_id) = self.following else {
            return;
        };
        let Some(leader) = neighbors.iter().find(|s| s.id == leader_id) else {
            // Predecessor vanished this tick; the conga manager re-links
            // or disbands on its next pass.
            return;
        };

        let delta = leader.position - self.position;
        let distance = delta.length();
        if distance > cfg.follow_distance + cfg.follow_slack {
            self.move_toward(leader.position, cfg.follow_pursuit_factor, cfg);
        } else if distance < cfg.follow_distance - cfg.follow_slack {
            self.velocity -= delta * cfg.follow_backoff_factor;
        }

        if rng.random::<f32>() < cfg.follow_move_sync_probability {
            self.current_move = leader.current_move;
        }
    }

    /// Step 2b: a rare attempt to start a conga line.
    ///
    /// Only extroverted, energetic dancers qualify. Returns the recruits
    /// whose rolls succeeded, closest first; the conga manager turns them
    /// into an actual line.
    fn try_start_conga(
        &self,
        neighbors: &[DancerSnapshot],
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) -> Vec<DancerId> {
        if self.personality.extroversion < cfg.conga_min_extroversion
            || self.personality.energy < cfg.conga_min_energy
            || rng.random::<f32>() >= cfg.conga_start_probability
        {
            return Vec::new();
        }

        let mut nearby: Vec<(DancerId, f32, f32)> = neighbors
            .iter()
            .filter(|s| s.id != self.id)
            .filter_map(|s| {
                let distance = s.position.distance(self.position);
                (distance < self.social_radius)
                    .then_some((s.id, distance, s.personality.extroversion))
            })
            .collect();
        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

        nearby
            .iter()
            .take(cfg.conga_recruit_limit)
            .filter(|(_, _, extroversion)| {
                rng.random::<f32>() < self.personality.trendsetter * extroversion
            })
            .map(|(id, _, _)| *id)
            .collect()
    }

    /// Step 3: learn from and react to every neighbor in social radius.
    fn scan_neighbors(
        &mut self,
        neighbors: &[DancerSnapshot],
        catalog: &MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) {
        for other in neighbors {
            if other.id == self.id {
                continue;
            }
            let delta = other.position - self.position;
            let distance = delta.length();
            if distance >= self.social_radius {
                continue;
            }

            if let Some(mv) = catalog.get(other.current_move) {
                self.try_learn(mv, rng);
            }

            // Similar dancers attract, very different ones repel.
            let similarity = self.personality.similarity_distance(&other.personality);
            if similarity < cfg.attraction_threshold {
                self.move_toward(other.position, cfg.attraction_factor, cfg);
            } else if similarity > cfg.repulsion_threshold {
                self.velocity -= delta * cfg.repulsion_factor;
            }
        }
    }

    /// Step 4: occasionally pick a fresh random direction when idle.
    fn wander(&mut self, cfg: &BehaviorConfig, rng: &mut impl Rng) {
        if self.following.is_some() || self.target_position.is_some() {
            return;
        }
        if rng.random::<f32>() >= cfg.wander_probability {
            return;
        }
        let angle = rng.random_range(0.0..TAU);
        let speed =
            rng.random_range(cfg.wander_speed_min..cfg.wander_speed_max) * self.personality.energy;
        self.velocity = Vec2::from_angle(angle) * speed;
    }

    /// Step 5: integrate position, apply friction, bounce off the floor
    /// edges with damping.
    fn integrate(&mut self, bounds: &FloorBounds, cfg: &BehaviorConfig) {
        self.position += self.velocity;
        self.velocity *= cfg.friction;

        let max_x = bounds.width - FLOOR_MARGIN;
        let max_y = bounds.height - FLOOR_MARGIN;

        if self.position.x < FLOOR_MARGIN {
            self.position.x = FLOOR_MARGIN;
            self.velocity.x = -self.velocity.x * cfg.bounce_damping;
        } else if self.position.x > max_x {
            self.position.x = max_x;
            self.velocity.x = -self.velocity.x * cfg.bounce_damping;
        }

        if self.position.y < FLOOR_MARGIN {
            self.position.y = FLOOR_MARGIN;
            self.velocity.y = -self.velocity.y * cfg.bounce_damping;
        } else if self.position.y > max_y {
            self.position.y = max_y;
            self.velocity.y = -self.velocity.y * cfg.bounce_damping;
        }
    }

    /// Step 6: regenerate passively, then pay for the current move and
    /// for motion. Energy stays inside [floor, 1.0].
    fn spend_energy(&mut self, catalog: &MoveCatalog, cfg: &BehaviorConfig) {
        self.energy = (self.energy + cfg.energy_regen).min(1.0);
        let move_cost = catalog
            .get(self.current_move)
            .map_or(0.0, |m| m.energy_required)
            * cfg.move_energy_cost;
        let drain = move_cost + self.velocity.length() * cfg.velocity_energy_cost;
        self.energy = (self.energy - drain).max(cfg.energy_floor);
    }

    /// Step 7: drop the assigned target once the dancer is close enough.
    fn clear_reached_target(&mut self, cfg: &BehaviorConfig) {
        if let Some(target) = self.target_position {
            if target.distance_squared(self.position) < cfg.target_reached_dist_sq {
                self.target_position = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Moves
    // -----------------------------------------------------------------------

    /// Re-select the current move.
    ///
    /// Valid candidates are known moves affordable at the current energy,
    /// falling back to affordable basics, falling back to the single
    /// cheapest basic. Selection strategy branches on personality:
    /// strong trendsetters occasionally invent, trend followers weight by
    /// popularity, everyone else weights by personality fit.
    pub fn select_new_move(
        &mut self,
        catalog: &mut MoveCatalog,
        cfg: &BehaviorConfig,
        rng: &mut impl Rng,
    ) {
        let mut valid: Vec<MoveId> = self
            .known_moves
            .iter()
            .copied()
            .filter(|id| {
                catalog
                    .get(*id)
                    .is_some_and(|m| m.energy_required <= self.energy)
            })
            .collect();
        if valid.is_empty() {
            valid = catalog
                .basic_moves()
                .iter()
                .copied()
                .filter(|id| {
                    catalog
                        .get(*id)
                        .is_some_and(|m| m.energy_required <= self.energy)
                })
                .collect();
        }
        if valid.is_empty() {
            if let Some(cheapest) = catalog.cheapest_basic() {
                self.current_move = cheapest;
            }
            return;
        }

        let p = self.personality;
        if p.trendsetter > cfg.trendsetter_invent_threshold
            && rng.random::<f32>() < cfg.invent_roll_probability
        {
            if rng.random::<f32>() < p.creativity * cfg.invent_creativity_factor {
                self.invent_move(None, catalog, rng);
                return;
            }
        } else if p.trendsetter < cfg.trend_follower_threshold
            && rng.random::<f32>() < cfg.trend_follower_roll_probability
        {
            let weighted: Vec<(MoveId, f32)> = valid
                .iter()
                .map(|id| {
                    (
                        *id,
                        0.5 + catalog.get(*id).map_or(0.0, DanceMove::popularity),
                    )
                })
                .collect();
            if let Some(choice) = weighted_choice(rng, &weighted) {
                self.current_move = choice;
            }
            return;
        }

        let weighted: Vec<(MoveId, f32)> = valid
            .iter()
            .map(|id| {
                let (complexity, energy_required) = catalog
                    .get(*id)
                    .map_or((0.5, 0.5), |m| (m.complexity, m.energy_required));
                let rhythm_match = 1.0 - (complexity - p.rhythm_sensitivity).abs();
                let energy_match = 1.0 - (energy_required - p.energy).abs();
                (*id, 0.5 + 0.3 * rhythm_match + 0.2 * energy_match)
            })
            .collect();
        if let Some(choice) = weighted_choice(rng, &weighted) {
            self.current_move = choice;
        }
    }

    /// Invent a new move, learn it, and start performing it.
    pub fn invent_move(
        &mut self,
        prefix: Option<&str>,
        catalog: &mut MoveCatalog,
        rng: &mut impl Rng,
    ) -> MoveId {
        let id = catalog.invent(prefix, &self.personality, self.id, rng);
        self.known_moves.insert(id);
        self.current_move = id;
        id
    }

    /// Attempt to learn an observed move. No-op when already known.
    ///
    /// Returns `true` when the move was newly learned.
    pub fn try_learn(&mut self, mv: &DanceMove, rng: &mut impl Rng) -> bool {
        if self.known_moves.contains(&mv.id) {
            return false;
        }
        if rng.random::<f32>() < learn_chance(self.personality.rhythm_sensitivity, mv.complexity) {
            self.known_moves.insert(mv.id);
            return true;
        }
        false
    }

    /// Apply a velocity impulse toward a point, scaled by the energy
    /// trait. No-op once within the minimum approach distance.
    pub fn move_toward(&mut self, target: Vec2, speed_factor: f32, cfg: &BehaviorConfig) {
        let delta = target - self.position;
        let distance = delta.length();
        if distance > cfg.move_toward_min_distance {
            self.velocity += delta * (speed_factor * self.personality.energy / distance);
        }
    }
}

// ---------------------------------------------------------------------------
// Weighted choice
// ---------------------------------------------------------------------------

/// Roulette-wheel sampling over non-negative weights.
///
/// Degenerate inputs follow the documented recovery policy: an empty
/// candidate list yields `None`, and an all-zero (or negative) weight set
/// falls back to a uniform choice.
pub fn weighted_choice<T: Copy>(rng: &mut impl Rng, candidates: &[(T, f32)]) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let total: f32 = candidates.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return candidates.choose(rng).map(|(value, _)| *value);
    }

    let mut roll = rng.random_range(0.0..total);
    for (value, weight) in candidates {
        let w = weight.max(0.0);
        if roll < w {
            return Some(*value);
        }
        roll -= w;
    }
    // Floating-point accumulation can leave a hair of roll unspent.
    candidates.last().map(|(value, _)| *value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
