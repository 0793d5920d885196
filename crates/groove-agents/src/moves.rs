//! The global dance-move catalog.
//!
//! Moves are shared, append-only entities: once registered they are never
//! deleted and their name/complexity/energy attributes never change. The
//! only mutable attribute is popularity, which is owned by the trend
//! tracker. Dancers hold [`MoveId`] references into the catalog and learn
//! moves probabilistically by watching neighbors.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use groove_types::{DancerId, MoveId, Personality, clamp_unit};

use crate::error::AgentError;

/// Adjectives used to compose invented move names.
const MOVE_ADJECTIVES: &[&str] = &[
    "Funky", "Smooth", "Wild", "Chill", "Electric", "Bouncy", "Groovy",
];

/// Nouns used to compose invented move names.
const MOVE_NOUNS: &[&str] = &[
    "Slide", "Hop", "Twist", "Wave", "Shake", "Bounce", "Glide", "Sway",
];

/// The five moves every dancer knows from the start: (name, complexity,
/// energy required).
const BASIC_MOVES: &[(&str, f32, f32)] = &[
    ("Shuffle", 0.2, 0.3),
    ("Twist", 0.3, 0.4),
    ("Jump", 0.1, 0.7),
    ("Spin", 0.4, 0.5),
    ("Wave", 0.2, 0.3),
];

/// Probability that a dancer learns an observed move.
///
/// Rhythm-sensitive dancers learn faster; complex moves are harder to
/// pick up.
pub fn learn_chance(rhythm_sensitivity: f32, complexity: f32) -> f32 {
    clamp_unit(rhythm_sensitivity * (1.0 - complexity))
}

// ---------------------------------------------------------------------------
// DanceMove
// ---------------------------------------------------------------------------

/// A named dance pattern in the global catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DanceMove {
    /// Stable identity of the move.
    pub id: MoveId,
    /// Unique display name ("Shuffle", "Funky Slide 12", ...).
    pub name: String,
    /// How difficult the move is, 0.0 to 1.0.
    pub complexity: f32,
    /// Energy level a dancer needs to perform the move, 0.0 to 1.0.
    pub energy_required: f32,
    /// Dancers who invented the move (provenance only, no ownership).
    pub originators: BTreeSet<DancerId>,
    /// Current trend score, 0.0 to 1.0. Written only by the trend tracker.
    popularity: f32,
}

impl DanceMove {
    /// The move's current trend score.
    pub const fn popularity(&self) -> f32 {
        self.popularity
    }
}

// ---------------------------------------------------------------------------
// MoveCatalog
// ---------------------------------------------------------------------------

/// Append-only registry of every move on the floor.
///
/// The catalog enforces name uniqueness at insert time. Dancers use the
/// read accessors and the invention API; [`set_popularity`] is reserved
/// for the trend tracker, which is the sole owner of popularity state.
///
/// [`set_popularity`]: MoveCatalog::set_popularity
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCatalog {
    /// All registered moves by ID.
    moves: BTreeMap<MoveId, DanceMove>,
    /// Name index for uniqueness checks and renderer lookups.
    by_name: BTreeMap<String, MoveId>,
    /// The seed moves every dancer starts with, in registration order.
    basics: Vec<MoveId>,
}

impl MoveCatalog {
    /// Create a catalog seeded with the five basic moves.
    pub fn with_basic_moves() -> Self {
        let mut catalog = Self {
            moves: BTreeMap::new(),
            by_name: BTreeMap::new(),
            basics: Vec::new(),
        };
        for (name, complexity, energy_required) in BASIC_MOVES {
            if let Ok(id) = catalog.register((*name).to_owned(), *complexity, *energy_required, None)
            {
                catalog.basics.push(id);
            }
        }
        catalog
    }

    /// Register a new move under a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateMoveName`] if the name is taken.
    pub fn register(
        &mut self,
        name: String,
        complexity: f32,
        energy_required: f32,
        originator: Option<DancerId>,
    ) -> Result<MoveId, AgentError> {
        if self.by_name.contains_key(&name) {
            return Err(AgentError::DuplicateMoveName(name));
        }
        Ok(self.insert(name, complexity, energy_required, originator))
    }

    /// Insert a move whose name the caller has already verified unique.
    fn insert(
        &mut self,
        name: String,
        complexity: f32,
        energy_required: f32,
        originator: Option<DancerId>,
    ) -> MoveId {
        let id = MoveId::new();
        let mut originators = BTreeSet::new();
        if let Some(dancer) = originator {
            originators.insert(dancer);
        }

        self.by_name.insert(name.clone(), id);
        self.moves.insert(
            id,
            DanceMove {
                id,
                name,
                complexity: clamp_unit(complexity),
                energy_required: clamp_unit(energy_required),
                originators,
                popularity: 0.0,
            },
        );
        id
    }

    /// Invent a move from a dancer's personality.
    ///
    /// Complexity scales with creativity, energy requirement with the
    /// energy trait. The name is a random "Adjective Noun" pair (with an
    /// optional prefix, used for celebrity signatures and crew moves),
    /// disambiguated with a numeric suffix on collision.
    pub fn invent(
        &mut self,
        prefix: Option<&str>,
        personality: &Personality,
        originator: DancerId,
        rng: &mut impl Rng,
    ) -> MoveId {
        let complexity = 0.5 + 0.5 * personality.creativity;
        let energy_required = 0.3 + 0.7 * personality.energy;

        let adjective = MOVE_ADJECTIVES.choose(rng).copied().unwrap_or("Funky");
        let noun = MOVE_NOUNS.choose(rng).copied().unwrap_or("Slide");
        let base = prefix.map_or_else(
            || format!("{adjective} {noun}"),
            |p| format!("{p}{adjective} {noun}"),
        );

        let mut name = base.clone();
        if self.by_name.contains_key(&name) {
            let mut suffix: u32 = rng.random_range(1..=99);
            name = format!("{base} {suffix}");
            while self.by_name.contains_key(&name) {
                suffix = suffix.saturating_add(1);
                name = format!("{base} {suffix}");
            }
        }

        debug!(move_name = %name, dancer = %originator, "move invented");

        self.insert(name, complexity, energy_required, Some(originator))
    }

    /// Look up a move by ID.
    pub fn get(&self, id: MoveId) -> Option<&DanceMove> {
        self.moves.get(&id)
    }

    /// Look up a move ID by exact name.
    pub fn id_by_name(&self, name: &str) -> Option<MoveId> {
        self.by_name.get(name).copied()
    }

    /// Whether a name is already registered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The seed moves every dancer knows at creation.
    pub fn basic_moves(&self) -> &[MoveId] {
        &self.basics
    }

    /// The basic move with the lowest energy requirement -- the last
    /// resort of the move-selection fallback chain. Ties keep the earliest
    /// registered move.
    pub fn cheapest_basic(&self) -> Option<MoveId> {
        self.basics
            .iter()
            .filter_map(|id| self.moves.get(id))
            .fold(None, |best: Option<&DanceMove>, candidate| match best {
                Some(b) if b.energy_required <= candidate.energy_required => Some(b),
                _ => Some(candidate),
            })
            .map(|m| m.id)
    }

    /// Overwrite a move's popularity score, clamped to [0.0, 1.0].
    ///
    /// Reserved for the trend tracker, the exclusive owner of popularity
    /// state. Unknown IDs are ignored.
    pub fn set_popularity(&mut self, id: MoveId, score: f32) {
        if let Some(mv) = self.moves.get_mut(&id) {
            mv.popularity = clamp_unit(score);
        }
    }

    /// Number of registered moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the catalog holds no moves (only possible before seeding).
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Iterate over all registered moves.
    pub fn iter(&self) -> impl Iterator<Item = &DanceMove> {
        self.moves.values()
    }
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::with_basic_moves()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
