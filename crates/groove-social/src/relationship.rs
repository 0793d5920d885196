//! The pairwise relationship graph.
//!
//! Relationships are keyed by an order-independent [`PairKey`] of stable
//! dancer IDs, created lazily when two dancers first come within social
//! radius, updated from personality-and-repertoire compatibility, and
//! pruned when they stay weak or lose an endpoint. Friendship and rivalry
//! are threshold promotions on strength; a later demotion to neutral
//! never erases the recorded promotion.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use groove_agents::Dancer;
use groove_types::{DancerId, RelationshipKind};

/// Compatibility above which a pair bonds toward friendship.
const FRIEND_COMPATIBILITY: f32 = 0.7;

/// Compatibility below which a pair sours toward rivalry.
const RIVAL_COMPATIBILITY: f32 = 0.3;

/// Strength at which a bonding pair is promoted to friends.
const FRIEND_STRENGTH: f32 = 0.7;

/// Strength at which a souring pair is promoted to rivals.
const RIVAL_STRENGTH: f32 = 0.5;

/// Strength gain per time unit for very compatible pairs.
const BOND_RATE: f32 = 0.01;

/// Strength gain per time unit along the rivalry path.
const RIVALRY_RATE: f32 = 0.005;

/// Chance an incompatible pair trends rival rather than indifferent.
const RIVALRY_PROBABILITY: f32 = 0.5;

/// Strength loss per time unit for indifferent incompatible pairs.
const FADE_RATE: f32 = 0.01;

/// Slow strength drift for moderately compatible pairs.
const DRIFT_RATE: f32 = 0.001;

/// Moderate-compatibility drift never drops strength below this.
const DRIFT_FLOOR: f32 = 0.1;

/// Strength below which a moderate pair demotes to neutral.
const NEUTRAL_DEMOTION: f32 = 0.3;

/// Pruning: relationships weaker than this...
const PRUNE_STRENGTH: f32 = 0.1;

/// ...and older than this are dropped.
const PRUNE_DURATION: f32 = 10.0;

/// Relationships stronger than this are handed to the renderer.
const VISIBLE_STRENGTH: f32 = 0.4;

/// Weights of the two compatibility factors.
const PERSONALITY_WEIGHT: f32 = 0.6;
const REPERTOIRE_WEIGHT: f32 = 0.4;

// ---------------------------------------------------------------------------
// PairKey
// ---------------------------------------------------------------------------

/// Canonicalized unordered pair of dancer IDs.
///
/// `PairKey::new(a, b)` and `PairKey::new(b, a)` are the same key, so a
/// pair has exactly one graph entry regardless of scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairKey {
    lo: DancerId,
    hi: DancerId,
}

impl PairKey {
    /// Build the canonical key for two dancers.
    pub fn new(a: DancerId, b: DancerId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The lower endpoint.
    pub const fn first(&self) -> DancerId {
        self.lo
    }

    /// The higher endpoint.
    pub const fn second(&self) -> DancerId {
        self.hi
    }
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// State of one pairwise relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Bond strength in [0.0, 1.0].
    pub strength: f32,
    /// Current qualitative kind.
    pub kind: RelationshipKind,
    /// Time units since the relationship was created.
    pub duration: f32,
    /// Duration at which the pair was first promoted to friends, if ever.
    /// Promotion history survives later demotion.
    pub promoted_friend_at: Option<f32>,
}

impl Relationship {
    /// A fresh neutral relationship.
    const fn new() -> Self {
        Self {
            strength: 0.0,
            kind: RelationshipKind::Neutral,
            duration: 0.0,
            promoted_friend_at: None,
        }
    }

    /// Advance the relationship by `dt` time units given the pair's
    /// current compatibility.
    fn apply(&mut self, compatibility: f32, dt: f32, rng: &mut impl Rng) {
        if compatibility > FRIEND_COMPATIBILITY {
            self.strength = (self.strength + BOND_RATE * dt).min(1.0);
            if self.strength > FRIEND_STRENGTH && self.kind != RelationshipKind::Friend {
                self.kind = RelationshipKind::Friend;
                if self.promoted_friend_at.is_none() {
                    self.promoted_friend_at = Some(self.duration);
                }
            }
        } else if compatibility < RIVAL_COMPATIBILITY {
            if rng.random::<f32>() < RIVALRY_PROBABILITY {
                self.strength = (self.strength + RIVALRY_RATE * dt).min(1.0);
                if self.strength > RIVAL_STRENGTH && self.kind != RelationshipKind::Rival {
                    self.kind = RelationshipKind::Rival;
                }
            } else {
                self.strength = (self.strength - FADE_RATE * dt).max(0.0);
                self.kind = RelationshipKind::Neutral;
            }
        } else {
            self.strength = (self.strength - DRIFT_RATE * dt).max(DRIFT_FLOOR);
            if self.strength < NEUTRAL_DEMOTION {
                self.kind = RelationshipKind::Neutral;
            }
        }

        self.duration += dt;
    }

    /// Whether the relationship qualifies for the render output.
    pub fn is_visible(&self) -> bool {
        self.strength > VISIBLE_STRENGTH
    }
}

// ---------------------------------------------------------------------------
// Compatibility
// ---------------------------------------------------------------------------

/// Compatibility of two dancers in [0.0, 1.0].
///
/// 60% personality match (mean trait difference over extroversion,
/// rhythm sensitivity, creativity, energy) and 40% repertoire overlap
/// (shared known moves over the union, denominator floored at 1).
pub fn compatibility(a: &Dancer, b: &Dancer) -> f32 {
    let trait_difference = ((a.personality.extroversion - b.personality.extroversion).abs()
        + (a.personality.rhythm_sensitivity - b.personality.rhythm_sensitivity).abs()
        + (a.personality.creativity - b.personality.creativity).abs()
        + (a.personality.energy - b.personality.energy).abs())
        / 4.0;
    let personality_match = 1.0 - trait_difference;

    let shared = a.known_moves.intersection(&b.known_moves).count();
    let total = a.known_moves.union(&b.known_moves).count();
    let repertoire_match = shared as f32 / total.max(1) as f32;

    PERSONALITY_WEIGHT * personality_match + REPERTOIRE_WEIGHT * repertoire_match
}

// ---------------------------------------------------------------------------
// RelationshipGraph
// ---------------------------------------------------------------------------

/// Sparse pairwise relationship storage with decay and pruning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipGraph {
    relationships: BTreeMap<PairKey, Relationship>,
}

impl RelationshipGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            relationships: BTreeMap::new(),
        }
    }

    /// One maintenance pass: update every stored relationship from live
    /// compatibility, prune weak-and-old or orphaned entries, then lazily
    /// create entries for every pair currently within social radius.
    pub fn update(
        &mut self,
        dancers: &BTreeMap<DancerId, Dancer>,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        let keys: Vec<PairKey> = self.relationships.keys().copied().collect();
        for key in keys {
            let pair = dancers
                .get(&key.first())
                .zip(dancers.get(&key.second()));
            match pair {
                Some((a, b)) => {
                    let score = compatibility(a, b);
                    let prune = match self.relationships.get_mut(&key) {
                        Some(rel) => {
                            rel.apply(score, dt, rng);
                            rel.strength < PRUNE_STRENGTH && rel.duration > PRUNE_DURATION
                        }
                        None => false,
                    };
                    if prune {
                        debug!(a = %key.first(), b = %key.second(), "relationship faded out");
                        self.relationships.remove(&key);
                    }
                }
                None => {
                    // An endpoint left the floor.
                    self.relationships.remove(&key);
                }
            }
        }

        let snapshot: Vec<&Dancer> = dancers.values().collect();
        for (i, a) in snapshot.iter().enumerate() {
            for b in snapshot.iter().skip(i + 1) {
                if a.position.distance(b.position) < a.social_radius {
                    self.relationships
                        .entry(PairKey::new(a.id, b.id))
                        .or_insert_with(Relationship::new);
                }
            }
        }
    }

    /// Look up the relationship for a pair.
    pub fn get(&self, key: PairKey) -> Option<&Relationship> {
        self.relationships.get(&key)
    }

    /// Relationships strong enough to render (strength above 0.4).
    pub fn visible(&self) -> impl Iterator<Item = (PairKey, &Relationship)> {
        self.relationships
            .iter()
            .filter(|(_, rel)| rel.is_visible())
            .map(|(key, rel)| (*key, rel))
    }

    /// Iterate over all stored relationships.
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, &Relationship)> {
        self.relationships.iter().map(|(key, rel)| (*key, rel))
    }

    /// Number of stored relationships.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
