//! Persistent dance crews grown from strong friendship clusters.
//!
//! Unlike groups and conga lines, crews have no lifespan: they persist
//! until their last member leaves the floor. A crew forms around a
//! creative or trendsetting founder with enough strong friendships, may
//! carry signature moves (invented by the founder, prefixed with the crew
//! name), and recruits dancers befriended by its members.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use groove_agents::{Dancer, MoveCatalog};
use groove_types::{Color, CrewId, DancerId, MoveId, RelationshipKind};

use crate::relationship::{PairKey, RelationshipGraph};

/// Maximum number of crews on the floor.
const MAX_CREWS: usize = 3;

/// Friendship strength required of the founder's seed friends.
const FOUNDING_STRENGTH: f32 = 0.7;

/// Founder needs at least this many strong friends.
const FOUNDING_MIN_FRIENDS: usize = 2;

/// Founder must be creative or trendsetting beyond this value.
const FOUNDER_TRAIT_THRESHOLD: f32 = 0.6;

/// At most this many seed friends join at founding.
const FOUNDING_FRIEND_LIMIT: usize = 3;

/// Founders above this creativity mint a signature move.
const SIGNATURE_CREATIVITY: f32 = 0.7;

/// Crews stop recruiting at this size.
const MAX_MEMBERS: usize = 8;

/// Friendship strength that counts toward joining an existing crew.
const JOIN_STRENGTH: f32 = 0.5;

/// Friendships needed to join outright.
const JOIN_MIN_FRIENDS: usize = 2;

/// With a single qualifying friendship, joining happens at this rate.
const JOIN_SINGLE_FRIEND_PROBABILITY: f32 = 0.3;

/// Adjectives used to compose crew names.
const CREW_ADJECTIVES: &[&str] = &[
    "Dynamic", "Rhythmic", "Smooth", "Electric", "Funky", "Wild", "Groove",
];

/// Nouns used to compose crew names.
const CREW_NOUNS: &[&str] = &[
    "Crew", "Squad", "Collective", "Posse", "Tribe", "Alliance", "Ensemble",
];

// ---------------------------------------------------------------------------
// DanceCrew
// ---------------------------------------------------------------------------

/// A persistent crew with a shared identity.
#[derive(Debug, Clone, PartialEq)]
pub struct DanceCrew {
    /// Stable identity of the crew.
    pub id: CrewId,
    /// Display name ("The Electric Posse", ...).
    pub name: String,
    /// The dancer who founded the crew.
    pub founder: DancerId,
    /// Current member handles.
    pub members: BTreeSet<DancerId>,
    /// Moves associated with this crew.
    pub signature_moves: BTreeSet<MoveId>,
    /// Tick at which the crew formed.
    pub formed_at_tick: u64,
    /// Wall-clock formation stamp.
    pub created_at: DateTime<Utc>,
    /// Render color, drawn bright at founding.
    pub color: Color,
}

// ---------------------------------------------------------------------------
// CrewManager
// ---------------------------------------------------------------------------

/// Forms and grows crews from the relationship graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewManager {
    /// Live crews by ID.
    crews: BTreeMap<CrewId, DanceCrew>,
    /// Reverse index; a dancer belongs to at most one crew.
    crew_of: BTreeMap<DancerId, CrewId>,
}

impl CrewManager {
    /// Create an empty manager.
    pub const fn new() -> Self {
        Self {
            crews: BTreeMap::new(),
            crew_of: BTreeMap::new(),
        }
    }

    /// One crew pass: prune vanished members and empty crews, consider
    /// founding one new crew, then let existing crews recruit.
    pub fn update(
        &mut self,
        dancers: &mut BTreeMap<DancerId, Dancer>,
        graph: &RelationshipGraph,
        catalog: &mut MoveCatalog,
        tick: u64,
        rng: &mut impl Rng,
    ) {
        self.prune(dancers);
        self.form_crew(dancers, graph, catalog, tick, rng);
        self.grow_crews(dancers, graph, catalog, rng);
    }

    /// Drop members whose dancer left the floor, then drop empty crews.
    fn prune(&mut self, dancers: &BTreeMap<DancerId, Dancer>) {
        let mut emptied = Vec::new();
        for (crew_id, crew) in &mut self.crews {
            let gone: Vec<DancerId> = crew
                .members
                .iter()
                .copied()
                .filter(|id| !dancers.contains_key(id))
                .collect();
            for id in gone {
                crew.members.remove(&id);
                self.crew_of.remove(&id);
            }
            if crew.members.is_empty() {
                emptied.push(*crew_id);
            }
        }
        for crew_id in emptied {
            debug!(crew = %crew_id, "crew dissolved");
            self.crews.remove(&crew_id);
        }
    }

    /// Found at most one crew per tick around an unaffiliated dancer with
    /// enough strong friendships.
    fn form_crew(
        &mut self,
        dancers: &mut BTreeMap<DancerId, Dancer>,
        graph: &RelationshipGraph,
        catalog: &mut MoveCatalog,
        tick: u64,
        rng: &mut impl Rng,
    ) {
        if self.crews.len() >= MAX_CREWS {
            return;
        }

        let ids: Vec<DancerId> = dancers.keys().copied().collect();
        for founder_id in &ids {
            if self.crew_of.contains_key(founder_id) {
                continue;
            }
            let Some(founder_personality) = dancers.get(founder_id).map(|d| d.personality)
            else {
                continue;
            };
            if founder_personality.creativity <= FOUNDER_TRAIT_THRESHOLD
                && founder_personality.trendsetter <= FOUNDER_TRAIT_THRESHOLD
            {
                continue;
            }

            let friends: Vec<DancerId> = ids
                .iter()
                .filter(|other| **other != *founder_id && !self.crew_of.contains_key(other))
                .filter(|other| {
                    graph
                        .get(PairKey::new(*founder_id, **other))
                        .is_some_and(|rel| {
                            rel.kind == RelationshipKind::Friend
                                && rel.strength > FOUNDING_STRENGTH
                        })
                })
                .copied()
                .collect();
            if friends.len() < FOUNDING_MIN_FRIENDS {
                continue;
            }

            let adjective = CREW_ADJECTIVES.choose(rng).copied().unwrap_or("Funky");
            let noun = CREW_NOUNS.choose(rng).copied().unwrap_or("Crew");
            let name = format!("The {adjective} {noun}");

            let mut members = BTreeSet::new();
            members.insert(*founder_id);
            for friend in friends.iter().take(FOUNDING_FRIEND_LIMIT) {
                members.insert(*friend);
            }

            let mut crew = DanceCrew {
                id: CrewId::new(),
                name: name.clone(),
                founder: *founder_id,
                members,
                signature_moves: BTreeSet::new(),
                formed_at_tick: tick,
                created_at: Utc::now(),
                color: Color::new(
                    rng.random_range(100..=255),
                    rng.random_range(100..=255),
                    rng.random_range(100..=255),
                ),
            };

            if founder_personality.creativity > SIGNATURE_CREATIVITY {
                if let Some(founder) = dancers.get_mut(founder_id) {
                    let prefix = format!("{name} ");
                    let signature = founder.invent_move(Some(&prefix), catalog, rng);
                    crew.signature_moves.insert(signature);
                }
            }

            info!(
                crew = %crew.id,
                name = %crew.name,
                members = crew.members.len(),
                "dance crew founded"
            );
            for member in &crew.members {
                self.crew_of.insert(*member, crew.id);
            }
            self.crews.insert(crew.id, crew);
            return;
        }
    }

    /// Let crews below the size cap recruit unaffiliated dancers that are
    /// befriended by current members. Recruits roll to learn the crew's
    /// signature moves.
    fn grow_crews(
        &mut self,
        dancers: &mut BTreeMap<DancerId, Dancer>,
        graph: &RelationshipGraph,
        catalog: &MoveCatalog,
        rng: &mut impl Rng,
    ) {
        let crew_ids: Vec<CrewId> = self.crews.keys().copied().collect();
        for crew_id in crew_ids {
            let Some((members, signatures)) = self
                .crews
                .get(&crew_id)
                .filter(|crew| crew.members.len() < MAX_MEMBERS)
                .map(|crew| (crew.members.clone(), crew.signature_moves.clone()))
            else {
                continue;
            };

            let candidates: Vec<DancerId> = dancers
                .keys()
                .copied()
                .filter(|id| !self.crew_of.contains_key(id))
                .collect();
            for candidate in candidates {
                let friend_count = members
                    .iter()
                    .filter(|member| {
                        graph
                            .get(PairKey::new(candidate, **member))
                            .is_some_and(|rel| {
                                rel.kind == RelationshipKind::Friend
                                    && rel.strength > JOIN_STRENGTH
                            })
                    })
                    .count();

                let joins = friend_count >= JOIN_MIN_FRIENDS
                    || (friend_count >= 1
                        && rng.random::<f32>() < JOIN_SINGLE_FRIEND_PROBABILITY);
                if !joins {
                    continue;
                }

                if let Some(crew) = self.crews.get_mut(&crew_id) {
                    crew.members.insert(candidate);
                }
                self.crew_of.insert(candidate, crew_id);
                debug!(crew = %crew_id, dancer = %candidate, "dancer joined crew");

                if let Some(dancer) = dancers.get_mut(&candidate) {
                    for signature in &signatures {
                        if let Some(mv) = catalog.get(*signature) {
                            dancer.try_learn(mv, rng);
                        }
                    }
                }

                if self
                    .crews
                    .get(&crew_id)
                    .is_some_and(|crew| crew.members.len() >= MAX_MEMBERS)
                {
                    break;
                }
            }
        }
    }

    /// The crew a dancer belongs to, if any.
    pub fn crew_of(&self, dancer: DancerId) -> Option<CrewId> {
        self.crew_of.get(&dancer).copied()
    }

    /// Look up a crew by ID.
    pub fn get(&self, id: CrewId) -> Option<&DanceCrew> {
        self.crews.get(&id)
    }

    /// Iterate over live crews.
    pub fn crews(&self) -> impl Iterator<Item = &DanceCrew> {
        self.crews.values()
    }

    /// Number of live crews.
    pub fn len(&self) -> usize {
        self.crews.len()
    }

    /// Whether no crews exist.
    pub fn is_empty(&self) -> bool {
        self.crews.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
