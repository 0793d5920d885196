//! Transient dance groups and their lifecycle manager.
//!
//! Groups are spatial clusters with a bounded lifetime. The manager ages
//! and disbands them each tick, recomputes the derived centroid, dominant
//! move, and energy, forms at most one new group per tick from
//! unaffiliated nearby dancers, and reassigns membership by proximity.
//!
//! Group membership and conga participation are mutually exclusive: the
//! formation scan and the reassignment pass both skip conga members, and
//! the conga manager removes recruits from their group.

use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use groove_agents::Dancer;
use groove_types::{DancerId, GroupId, MoveId};

/// Maximum number of live groups on the floor.
const MAX_GROUPS: usize = 3;

/// Minimum membership; below this a group disbands at maintenance.
const MIN_MEMBERS: usize = 3;

/// Floor breached during the reassignment pass also disbands a group.
const REASSIGN_MIN_MEMBERS: usize = 2;

/// Radius floor for any group.
const RADIUS_FLOOR: f32 = 50.0;

/// Radius grows with the square root of membership at this scale.
const RADIUS_PER_SQRT_MEMBER: f32 = 20.0;

/// Lifespan draw bounds in time units.
const LIFESPAN_MIN: f32 = 10.0;
const LIFESPAN_MAX: f32 = 30.0;

/// Probability a joining dancer adopts the group's dominant move.
const ADOPT_DOMINANT_PROBABILITY: f32 = 0.3;

/// Joining dancers get a target point within this fraction of the radius.
const TARGET_RADIUS_FACTOR: f32 = 0.8;

/// Group energy smoothing: this much new signal per tick.
const ENERGY_SMOOTHING: f32 = 0.7;

// ---------------------------------------------------------------------------
// DanceGroup
// ---------------------------------------------------------------------------

/// A transient cluster of dancers sharing proximity and a dominant move.
#[derive(Debug, Clone, PartialEq)]
pub struct DanceGroup {
    /// Stable identity of the group.
    pub id: GroupId,
    /// Arithmetic mean of member positions, recomputed each tick.
    pub centroid: Vec2,
    /// Capture radius; monotonic in the square root of membership,
    /// floored at 50.
    pub radius: f32,
    /// Member handles (no ownership; members may leave any tick).
    pub members: BTreeSet<DancerId>,
    /// Time units since formation.
    pub age: f32,
    /// Time units after which the group disbands.
    pub lifespan: f32,
    /// Smoothed mean of member energy traits.
    pub energy: f32,
    /// Mode of member current moves, if the group is non-empty.
    pub dominant_move: Option<MoveId>,
}

impl DanceGroup {
    /// Create an empty group centered at a point with a random lifespan.
    fn new(centroid: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            id: GroupId::new(),
            centroid,
            radius: RADIUS_FLOOR,
            members: BTreeSet::new(),
            age: 0.0,
            lifespan: rng.random_range(LIFESPAN_MIN..LIFESPAN_MAX),
            energy: 0.5,
            dominant_move: None,
        }
    }

    /// Add a member and grow the radius.
    fn add_member(&mut self, dancer: DancerId) {
        self.members.insert(dancer);
        self.resize();
    }

    /// Remove a member. The radius keeps its high-water mark until the
    /// next add, matching the monotonic-in-sqrt contract.
    fn remove_member(&mut self, dancer: DancerId) {
        self.members.remove(&dancer);
    }

    /// Recompute the radius from the current membership.
    fn resize(&mut self) {
        let count = self.members.len() as f32;
        self.radius = RADIUS_FLOOR.max(RADIUS_PER_SQRT_MEMBER * count.sqrt());
    }

    /// Recompute the derived fields from live member state.
    fn refresh(&mut self, dancers: &BTreeMap<DancerId, Dancer>) {
        let live: Vec<&Dancer> = self
            .members
            .iter()
            .filter_map(|id| dancers.get(id))
            .collect();
        if live.is_empty() {
            return;
        }
        let count = live.len() as f32;

        let sum: Vec2 = live.iter().map(|d| d.position).sum();
        self.centroid = sum / count;

        let mut move_counts: BTreeMap<MoveId, usize> = BTreeMap::new();
        for dancer in &live {
            *move_counts.entry(dancer.current_move).or_insert(0) += 1;
        }
        self.dominant_move = move_counts
            .iter()
            .max_by_key(|(_, n)| **n)
            .map(|(id, _)| *id);

        let mean_energy: f32 = live.iter().map(|d| d.personality.energy).sum::<f32>() / count;
        self.energy =
            (1.0 - ENERGY_SMOOTHING) * self.energy + ENERGY_SMOOTHING * mean_energy;
    }
}

// ---------------------------------------------------------------------------
// GroupManager
// ---------------------------------------------------------------------------

/// Creates, updates, and disbands dance groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupManager {
    /// Live groups by ID.
    groups: BTreeMap<GroupId, DanceGroup>,
    /// Reverse index from dancer to its group.
    member_index: BTreeMap<DancerId, GroupId>,
}

impl GroupManager {
    /// Create an empty manager.
    pub const fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            member_index: BTreeMap::new(),
        }
    }

    /// Age, refresh, and disband existing groups, then consider forming
    /// one new group from unaffiliated nearby dancers.
    ///
    /// `formation_factor` is the externally tunable multiplier on the
    /// formation probability.
    pub fn update(
        &mut self,
        dancers: &BTreeMap<DancerId, Dancer>,
        dt: f32,
        formation_factor: f32,
        rng: &mut impl Rng,
    ) {
        let mut expired = Vec::new();
        for (id, group) in &mut self.groups {
            group.age += dt;
            group.refresh(dancers);
            if group.age >= group.lifespan || group.members.len() < MIN_MEMBERS {
                expired.push(*id);
            }
        }
        for id in expired {
            self.disband(id);
        }

        self.form_group(dancers, formation_factor, rng);
    }

    /// Scan for a new group among dancers that are in no group and no
    /// conga. Creates at most one group per tick.
    fn form_group(
        &mut self,
        dancers: &BTreeMap<DancerId, Dancer>,
        formation_factor: f32,
        rng: &mut impl Rng,
    ) {
        if self.groups.len() >= MAX_GROUPS {
            return;
        }

        let available: Vec<&Dancer> = dancers
            .values()
            .filter(|d| {
                !self.member_index.contains_key(&d.id)
                    && d.following.is_none()
                    && d.followers.is_empty()
            })
            .collect();
        if available.len() < MIN_MEMBERS {
            return;
        }

        for candidate in &available {
            let neighbors: Vec<DancerId> = available
                .iter()
                .filter(|other| {
                    other.id != candidate.id
                        && other.position.distance(candidate.position) < candidate.social_radius
                })
                .map(|other| other.id)
                .collect();
            if neighbors.len() < MIN_MEMBERS - 1 {
                continue;
            }

            let extroversion_sum: f32 = candidate.personality.extroversion
                + neighbors
                    .iter()
                    .filter_map(|id| dancers.get(id))
                    .map(|d| d.personality.extroversion)
                    .sum::<f32>();
            let average_extroversion = extroversion_sum / (1 + neighbors.len()) as f32;

            if rng.random::<f32>() < average_extroversion * formation_factor {
                let mut group = DanceGroup::new(candidate.position, rng);
                group.add_member(candidate.id);
                self.member_index.insert(candidate.id, group.id);
                for id in neighbors {
                    group.add_member(id);
                    self.member_index.insert(id, group.id);
                }
                info!(
                    group = %group.id,
                    members = group.members.len(),
                    "dance group formed"
                );
                self.groups.insert(group.id, group);
                return;
            }
        }
    }

    /// Reassign every non-conga dancer to the nearest group whose radius
    /// contains it, then drop groups that fell below the reassignment
    /// floor.
    ///
    /// Joining dancers may adopt the group's dominant move and receive a
    /// target point inside the group.
    pub fn assign_members(
        &mut self,
        dancers: &mut BTreeMap<DancerId, Dancer>,
        rng: &mut impl Rng,
    ) {
        let ids: Vec<DancerId> = dancers.keys().copied().collect();
        for id in ids {
            let Some((position, in_conga)) = dancers
                .get(&id)
                .map(|d| (d.position, d.following.is_some() || !d.followers.is_empty()))
            else {
                continue;
            };
            if in_conga {
                continue;
            }

            let current = self.member_index.get(&id).copied();
            let mut closest: Option<(GroupId, f32)> = None;
            for (gid, group) in &self.groups {
                let distance = group.centroid.distance(position);
                if distance < group.radius
                    && closest.is_none_or(|(_, best)| distance < best)
                {
                    closest = Some((*gid, distance));
                }
            }
            let destination = closest.map(|(gid, _)| gid);
            if destination == current {
                continue;
            }

            if let Some(old) = current {
                if let Some(group) = self.groups.get_mut(&old) {
                    group.remove_member(id);
                }
                self.member_index.remove(&id);
            }

            let Some(new_gid) = destination else {
                continue;
            };
            let Some(group) = self.groups.get_mut(&new_gid) else {
                continue;
            };
            group.add_member(id);
            self.member_index.insert(id, new_gid);

            if let Some(dancer) = dancers.get_mut(&id) {
                if let Some(dominant) = group.dominant_move {
                    if rng.random::<f32>() < ADOPT_DOMINANT_PROBABILITY {
                        dancer.current_move = dominant;
                    }
                }
                let angle = rng.random_range(0.0..TAU);
                let distance = rng.random_range(0.0..group.radius * TARGET_RADIUS_FACTOR);
                dancer.target_position =
                    Some(group.centroid + Vec2::from_angle(angle) * distance);
            }
        }

        let starved: Vec<GroupId> = self
            .groups
            .iter()
            .filter(|(_, g)| g.members.len() < REASSIGN_MIN_MEMBERS)
            .map(|(id, _)| *id)
            .collect();
        for id in starved {
            self.disband(id);
        }
    }

    /// Remove a dancer from whatever group it is in (conga recruitment,
    /// dancer removal).
    pub fn remove_dancer(&mut self, dancer: DancerId) {
        if let Some(gid) = self.member_index.remove(&dancer) {
            if let Some(group) = self.groups.get_mut(&gid) {
                group.remove_member(dancer);
            }
        }
    }

    /// Disband a group and clear its members from the index.
    fn disband(&mut self, id: GroupId) {
        if let Some(group) = self.groups.remove(&id) {
            debug!(group = %id, age = group.age, "dance group disbanded");
            for member in group.members {
                self.member_index.remove(&member);
            }
        }
    }

    /// The group a dancer belongs to, if any.
    pub fn group_of(&self, dancer: DancerId) -> Option<GroupId> {
        self.member_index.get(&dancer).copied()
    }

    /// Iterate over live groups.
    pub fn groups(&self) -> impl Iterator<Item = &DanceGroup> {
        self.groups.values()
    }

    /// Number of live groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no live groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
