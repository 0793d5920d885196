//! Conga lines: leader-to-follower chains and their manager.
//!
//! Dancers only ever *propose* a conga (the recruitment list in their
//! update outcome); the [`CongaManager`] owns every follower-pointer
//! write, so the chain invariant -- walking "following" references from
//! any follower reaches the leader with no cycles -- has a single writer.
//!
//! Chains are linked in recruitment order: the first follower trails the
//! leader, every later follower trails its predecessor. Removing an
//! interior follower re-links the next one to the removed follower's
//! predecessor.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, info};

use groove_agents::Dancer;
use groove_types::{CongaLineId, DancerId};

use crate::groups::GroupManager;

/// Lifespan draw bounds in time units.
const LIFESPAN_MIN: f32 = 15.0;
const LIFESPAN_MAX: f32 = 40.0;

// ---------------------------------------------------------------------------
// CongaLine
// ---------------------------------------------------------------------------

/// A leader plus an ordered chain of followers.
#[derive(Debug, Clone, PartialEq)]
pub struct CongaLine {
    /// Stable identity of the line.
    pub id: CongaLineId,
    /// The dancer at the head of the line.
    pub leader: DancerId,
    /// Followers in chain order; element N trails element N-1 (element 0
    /// trails the leader).
    pub followers: Vec<DancerId>,
    /// Time units since formation.
    pub age: f32,
    /// Time units after which the line disbands.
    pub lifespan: f32,
}

// ---------------------------------------------------------------------------
// CongaManager
// ---------------------------------------------------------------------------

/// Tracks conga-line formation and disbandment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CongaManager {
    /// Live lines by ID.
    lines: BTreeMap<CongaLineId, CongaLine>,
    /// Reverse index from any member (leader included) to its line.
    line_of: BTreeMap<DancerId, CongaLineId>,
}

impl CongaManager {
    /// Create an empty manager.
    pub const fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
            line_of: BTreeMap::new(),
        }
    }

    /// Register a new line from a dancer's recruitment proposal.
    ///
    /// Recruits that vanished, already dance in a line, or already follow
    /// someone are dropped. Returns `None` (and registers nothing) when
    /// the leader is unavailable or no recruit survives filtering.
    ///
    /// Recruits are chained in the given order and removed from any dance
    /// group, keeping group membership and conga participation mutually
    /// exclusive.
    pub fn start_line(
        &mut self,
        leader: DancerId,
        recruits: &[DancerId],
        dancers: &mut BTreeMap<DancerId, Dancer>,
        groups: &mut GroupManager,
        rng: &mut impl Rng,
    ) -> Option<CongaLineId> {
        if self.line_of.contains_key(&leader) {
            return None;
        }
        if !dancers.get(&leader).is_some_and(|d| d.following.is_none()) {
            return None;
        }

        let eligible: Vec<DancerId> = recruits
            .iter()
            .copied()
            .filter(|id| *id != leader && !self.line_of.contains_key(id))
            .filter(|id| dancers.get(id).is_some_and(|d| d.following.is_none()))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let line = CongaLine {
            id: CongaLineId::new(),
            leader,
            followers: Vec::new(),
            age: 0.0,
            lifespan: rng.random_range(LIFESPAN_MIN..LIFESPAN_MAX),
        };
        let line_id = line.id;
        self.lines.insert(line_id, line);
        self.line_of.insert(leader, line_id);
        groups.remove_dancer(leader);

        for recruit in eligible {
            self.add_follower(line_id, recruit, dancers, groups);
        }

        if let Some(line) = self.lines.get(&line_id) {
            info!(
                line = %line_id,
                leader = %leader,
                followers = line.followers.len(),
                "conga line started"
            );
        }
        Some(line_id)
    }

    /// Append a dancer to the end of a line's chain.
    ///
    /// Returns `false` when the line or dancer is missing, or the dancer
    /// already dances in a line.
    pub fn add_follower(
        &mut self,
        line_id: CongaLineId,
        dancer_id: DancerId,
        dancers: &mut BTreeMap<DancerId, Dancer>,
        groups: &mut GroupManager,
    ) -> bool {
        if self.line_of.contains_key(&dancer_id) {
            return false;
        }
        let Some(line) = self.lines.get_mut(&line_id) else {
            return false;
        };
        if !dancers.contains_key(&dancer_id) {
            return false;
        }

        let predecessor = line.followers.last().copied().unwrap_or(line.leader);
        line.followers.push(dancer_id);
        let leader = line.leader;

        if let Some(dancer) = dancers.get_mut(&dancer_id) {
            dancer.following = Some(predecessor);
        }
        if let Some(lead) = dancers.get_mut(&leader) {
            lead.followers.push(dancer_id);
        }
        self.line_of.insert(dancer_id, line_id);
        groups.remove_dancer(dancer_id);
        true
    }

    /// Remove a follower from a line, re-linking the chain around it.
    ///
    /// The next follower's "following" reference moves to the removed
    /// follower's predecessor (the leader when the removed follower was
    /// first). Removing the last follower simply truncates the chain.
    pub fn remove_follower(
        &mut self,
        line_id: CongaLineId,
        dancer_id: DancerId,
        dancers: &mut BTreeMap<DancerId, Dancer>,
    ) -> bool {
        let Some(line) = self.lines.get_mut(&line_id) else {
            return false;
        };
        let Some(index) = line.followers.iter().position(|id| *id == dancer_id) else {
            return false;
        };

        let predecessor = if index == 0 {
            line.leader
        } else {
            line.followers.get(index - 1).copied().unwrap_or(line.leader)
        };
        if let Some(next) = line.followers.get(index + 1).copied() {
            if let Some(dancer) = dancers.get_mut(&next) {
                dancer.following = Some(predecessor);
            }
        }

        line.followers.remove(index);
        let leader = line.leader;

        if let Some(dancer) = dancers.get_mut(&dancer_id) {
            dancer.following = None;
        }
        if let Some(lead) = dancers.get_mut(&leader) {
            lead.followers.retain(|id| *id != dancer_id);
        }
        self.line_of.remove(&dancer_id);
        true
    }

    /// Age lines, prune vanished members, and disband lines whose
    /// lifespan elapsed or whose chain emptied.
    pub fn update(&mut self, dancers: &mut BTreeMap<DancerId, Dancer>, dt: f32) {
        let line_ids: Vec<CongaLineId> = self.lines.keys().copied().collect();

        for line_id in line_ids {
            // Prune followers whose dancer no longer exists.
            let stale: Vec<DancerId> = self
                .lines
                .get(&line_id)
                .map(|line| {
                    line.followers
                        .iter()
                        .copied()
                        .filter(|id| !dancers.contains_key(id))
                        .collect()
                })
                .unwrap_or_default();
            for id in stale {
                self.remove_follower(line_id, id, dancers);
            }

            let should_disband = match self.lines.get_mut(&line_id) {
                Some(line) => {
                    line.age += dt;
                    line.age >= line.lifespan
                        || line.followers.is_empty()
                        || !dancers.contains_key(&line.leader)
                }
                None => false,
            };
            if should_disband {
                self.disband(line_id, dancers);
            }
        }
    }

    /// Disband a line: clear every "following" reference in the chain and
    /// the leader's follower list.
    fn disband(&mut self, line_id: CongaLineId, dancers: &mut BTreeMap<DancerId, Dancer>) {
        let Some(line) = self.lines.remove(&line_id) else {
            return;
        };
        debug!(line = %line_id, age = line.age, "conga line disbanded");

        for follower in &line.followers {
            if let Some(dancer) = dancers.get_mut(follower) {
                dancer.following = None;
            }
            self.line_of.remove(follower);
        }
        if let Some(leader) = dancers.get_mut(&line.leader) {
            leader.followers.clear();
        }
        self.line_of.remove(&line.leader);
    }

    /// Whether a dancer is a member (leader or follower) of any line.
    pub fn is_member(&self, dancer: DancerId) -> bool {
        self.line_of.contains_key(&dancer)
    }

    /// Iterate over live lines.
    pub fn lines(&self) -> impl Iterator<Item = &CongaLine> {
        self.lines.values()
    }

    /// Number of live lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines are live.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use groove_agents::{BehaviorConfig, MoveCatalog};
    use groove_types::{Color, Personality};

    use super::*;

    fn spawn_dancers(
        count: usize,
        catalog: &mut MoveCatalog,
        rng: &mut SmallRng,
    ) -> (Vec<DancerId>, BTreeMap<DancerId, Dancer>) {
        let cfg = BehaviorConfig::default();
        let mut ids = Vec::new();
        let mut dancers = BTreeMap::new();
        for i in 0..count {
            let dancer = Dancer::new(
                Personality::new(0.8, 0.5, 0.5, 0.5, 0.8),
                Vec2::new(100.0 + 20.0 * i as f32, 100.0),
                Color::new(80, 80, 80),
                catalog,
                &cfg,
                rng,
            );
            ids.push(dancer.id);
            dancers.insert(dancer.id, dancer);
        }
        (ids, dancers)
    }

    /// Walk "following" references from a dancer; return the hop count to
    /// the line's leader, or `None` on a break or cycle.
    fn hops_to_leader(
        start: DancerId,
        leader: DancerId,
        dancers: &BTreeMap<DancerId, Dancer>,
    ) -> Option<usize> {
        let mut current = start;
        let mut hops = 0;
        let mut visited = std::collections::BTreeSet::new();
        while current != leader {
            if !visited.insert(current) {
                return None; // cycle
            }
            current = dancers.get(&current).and_then(|d| d.following)?;
            hops += 1;
        }
        Some(hops)
    }

    #[test]
    fn start_line_chains_followers() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(4, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, recruits) = match ids.as_slice() {
            [leader, rest @ ..] => (*leader, rest.to_vec()),
            [] => return,
        };

        let line_id = manager.start_line(leader, &recruits, &mut dancers, &mut groups, &mut rng);
        assert!(line_id.is_some());

        // First follower trails the leader, each next one its predecessor.
        let first = recruits.first().copied();
        assert_eq!(
            first.and_then(|id| dancers.get(&id)).and_then(|d| d.following),
            Some(leader)
        );
        let second = recruits.get(1).copied();
        assert_eq!(
            second.and_then(|id| dancers.get(&id)).and_then(|d| d.following),
            first
        );

        // Chain integrity: follower k reaches the leader in k+1 hops.
        for (k, id) in recruits.iter().enumerate() {
            assert_eq!(hops_to_leader(*id, leader, &dancers), Some(k + 1));
        }

        // The leader's back-reference list holds the whole chain.
        assert_eq!(
            dancers.get(&leader).map(|d| d.followers.clone()),
            Some(recruits)
        );
    }

    #[test]
    fn interior_removal_relinks_chain() {
        // Scenario: recruit a 4th follower into a 3-follower line, remove
        // follower #2; follower #3 must re-link to follower #1.
        let mut rng = SmallRng::seed_from_u64(2);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(5, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, f1, f2, f3, f4) = match ids.as_slice() {
            [a, b, c, d, e] => (*a, *b, *c, *d, *e),
            _ => return,
        };

        let line_id = manager.start_line(leader, &[f1, f2, f3], &mut dancers, &mut groups, &mut rng);
        let Some(line_id) = line_id else {
            assert!(line_id.is_some());
            return;
        };
        assert!(manager.add_follower(line_id, f4, &mut dancers, &mut groups));

        assert!(manager.remove_follower(line_id, f2, &mut dancers));

        assert_eq!(dancers.get(&f3).and_then(|d| d.following), Some(f1));
        assert_eq!(dancers.get(&f2).and_then(|d| d.following), None);
        // f4 still trails f3; the whole chain stays connected.
        assert_eq!(dancers.get(&f4).and_then(|d| d.following), Some(f3));
        assert_eq!(hops_to_leader(f4, leader, &dancers), Some(3));
        assert!(!manager.is_member(f2));
    }

    #[test]
    fn removing_first_follower_relinks_to_leader() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(3, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, f1, f2) = match ids.as_slice() {
            [a, b, c] => (*a, *b, *c),
            _ => return,
        };

        let line_id = manager.start_line(leader, &[f1, f2], &mut dancers, &mut groups, &mut rng);
        let Some(line_id) = line_id else {
            assert!(line_id.is_some());
            return;
        };

        assert!(manager.remove_follower(line_id, f1, &mut dancers));
        assert_eq!(dancers.get(&f2).and_then(|d| d.following), Some(leader));
    }

    #[test]
    fn line_disbands_when_lifespan_elapses() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(3, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, recruits) = match ids.as_slice() {
            [leader, rest @ ..] => (*leader, rest.to_vec()),
            [] => return,
        };
        manager.start_line(leader, &recruits, &mut dancers, &mut groups, &mut rng);

        // Lifespans top out at 40 time units.
        manager.update(&mut dancers, 50.0);

        assert!(manager.is_empty());
        for dancer in dancers.values() {
            assert_eq!(dancer.following, None);
            assert!(dancer.followers.is_empty());
        }
    }

    #[test]
    fn line_disbands_when_followers_empty() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(2, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, f1) = match ids.as_slice() {
            [a, b] => (*a, *b),
            _ => return,
        };
        let line_id = manager.start_line(leader, &[f1], &mut dancers, &mut groups, &mut rng);
        let Some(line_id) = line_id else {
            assert!(line_id.is_some());
            return;
        };

        manager.remove_follower(line_id, f1, &mut dancers);
        manager.update(&mut dancers, 0.016);

        assert!(manager.is_empty());
        assert!(!manager.is_member(leader));
    }

    #[test]
    fn vanished_follower_is_pruned() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(4, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader, f1, f2, f3) = match ids.as_slice() {
            [a, b, c, d] => (*a, *b, *c, *d),
            _ => return,
        };
        manager.start_line(leader, &[f1, f2, f3], &mut dancers, &mut groups, &mut rng);

        dancers.remove(&f2);
        manager.update(&mut dancers, 0.016);

        // Chain re-linked around the vanished dancer.
        assert_eq!(dancers.get(&f3).and_then(|d| d.following), Some(f1));
        assert_eq!(hops_to_leader(f3, leader, &dancers), Some(2));
    }

    #[test]
    fn recruits_already_in_lines_are_filtered() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(4, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        let mut manager = CongaManager::new();

        let (leader_a, f1, leader_b, f2) = match ids.as_slice() {
            [a, b, c, d] => (*a, *b, *c, *d),
            _ => return,
        };

        manager.start_line(leader_a, &[f1], &mut dancers, &mut groups, &mut rng);
        // Second leader tries to poach f1; only f2 is eligible.
        let line_b = manager.start_line(leader_b, &[f1, f2], &mut dancers, &mut groups, &mut rng);

        assert!(line_b.is_some());
        assert_eq!(dancers.get(&f1).and_then(|d| d.following), Some(leader_a));
        assert_eq!(dancers.get(&f2).and_then(|d| d.following), Some(leader_b));
    }

    #[test]
    fn recruitment_removes_dancer_from_group() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut catalog = MoveCatalog::with_basic_moves();
        let (ids, mut dancers) = spawn_dancers(4, &mut catalog, &mut rng);
        let mut groups = GroupManager::new();
        // Let a real group form first (average extroversion 0.8, factor
        // 1.0: a handful of attempts is plenty).
        for _ in 0..32 {
            groups.update(&dancers, 0.016, 1.0, &mut rng);
            if !groups.is_empty() {
                break;
            }
        }
        assert!(!groups.is_empty());
        assert!(ids.iter().any(|id| groups.group_of(*id).is_some()));

        let mut manager = CongaManager::new();
        let (leader, recruits) = match ids.as_slice() {
            [leader, rest @ ..] => (*leader, rest.to_vec()),
            [] => return,
        };
        manager.start_line(leader, &recruits, &mut dancers, &mut groups, &mut rng);

        // Mutual exclusivity: no conga member may remain in a group.
        for id in &ids {
            assert_eq!(groups.group_of(*id), None);
        }
    }
}
