//! The simulation state and the per-frame tick cycle.
//!
//! [`PartyState`] owns the dancer arena and every social registry. One
//! call to [`run_tick`] advances the whole floor by a frame:
//!
//! 1. **Snapshot** -- capture a read-only view of every dancer so all
//!    cross-dancer reads this tick observe the previous tick's settled
//!    state (no mutation-order asymmetry).
//! 2. **Dancers** -- run each dancer's behavior update against the
//!    snapshot, collecting conga proposals.
//! 3. **Celebrities** -- dispatch the influence pass for each celebrity.
//! 4. **Structures** -- register proposed conga lines, then run group and
//!    conga maintenance and the group membership reassignment.
//! 5. **Trends** -- tally current moves and write popularity back to the
//!    catalog (the trend tracker is the only popularity writer).
//! 6. **Network** -- update the relationship graph, then crews.
//!
//! All randomness flows through one seeded [`StdRng`], so stochastic
//! behavior is reproducible under test.
//!
//! [`run_tick`]: PartyState::run_tick

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use groove_agents::{
    BehaviorConfig, Dancer, DancerSnapshot, MoveCatalog, apply_celebrity_influence,
};
use groove_social::{
    CongaManager, CrewManager, GroupManager, RelationshipGraph, TrendTracker,
};
use groove_types::{BeatSignal, Color, DancerId, FloorBounds, Personality};

use crate::config::PartyConfig;

/// Summary of a single tick's execution, for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Dancers on the floor at end of tick.
    pub dancers: usize,
    /// Live dance groups.
    pub groups: usize,
    /// Live conga lines.
    pub conga_lines: usize,
    /// Live crews.
    pub crews: usize,
    /// Stored pairwise relationships.
    pub relationships: usize,
    /// Moves registered in the catalog.
    pub moves: usize,
    /// Name of the current top trend, if any move has a score.
    pub top_move: Option<String>,
}

/// The complete simulation state for one dance floor.
#[derive(Debug)]
pub struct PartyState {
    /// The dancer arena; every cross-structure reference is a [`DancerId`]
    /// into this map.
    pub dancers: BTreeMap<DancerId, Dancer>,
    /// The global move catalog.
    pub catalog: MoveCatalog,
    /// Transient dance groups.
    pub groups: GroupManager,
    /// Conga lines.
    pub congas: CongaManager,
    /// Decaying per-move popularity.
    pub trends: TrendTracker,
    /// Pairwise relationships.
    pub relationships: RelationshipGraph,
    /// Persistent crews.
    pub crews: CrewManager,
    /// Current floor geometry.
    pub bounds: FloorBounds,
    /// Behavioral constants shared by every dancer.
    pub behavior: BehaviorConfig,
    /// Tunable multiplier on group formation (control surface).
    pub group_formation_factor: f32,
    /// Ticks executed so far.
    pub tick: u64,
    /// Wall-clock time the state was created.
    pub started_at: DateTime<Utc>,
    /// The single random source behind every stochastic draw.
    rng: StdRng,
}

impl PartyState {
    /// Create an empty floor.
    pub fn new(
        bounds: FloorBounds,
        behavior: BehaviorConfig,
        group_formation_factor: f32,
        seed: u64,
    ) -> Self {
        Self {
            dancers: BTreeMap::new(),
            catalog: MoveCatalog::with_basic_moves(),
            groups: GroupManager::new(),
            congas: CongaManager::new(),
            trends: TrendTracker::new(),
            relationships: RelationshipGraph::new(),
            crews: CrewManager::new(),
            bounds,
            behavior,
            group_formation_factor,
            tick: 0,
            started_at: Utc::now(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create an empty floor from a loaded configuration.
    pub fn from_config(config: &PartyConfig) -> Self {
        Self::new(
            FloorBounds::new(config.floor.width, config.floor.height),
            BehaviorConfig::default(),
            config.social.group_formation_factor,
            config.party.seed,
        )
    }

    /// Add a standard dancer to the floor.
    pub fn add_dancer(
        &mut self,
        personality: Personality,
        position: Vec2,
        color: Color,
    ) -> DancerId {
        let dancer = Dancer::new(
            personality,
            position,
            color,
            &mut self.catalog,
            &self.behavior,
            &mut self.rng,
        );
        let id = dancer.id;
        self.dancers.insert(id, dancer);
        id
    }

    /// Add a celebrity dancer to the floor.
    pub fn add_celebrity(&mut self, position: Vec2, color: Color) -> DancerId {
        let dancer = Dancer::new_celebrity(
            position,
            color,
            &mut self.catalog,
            &self.behavior,
            &mut self.rng,
        );
        let id = dancer.id;
        self.dancers.insert(id, dancer);
        id
    }

    /// Remove a dancer from the floor.
    ///
    /// Group membership is released immediately; conga lines, the
    /// relationship graph, and crews self-heal on their next pass.
    pub fn remove_dancer(&mut self, id: DancerId) -> bool {
        let removed = self.dancers.remove(&id).is_some();
        if removed {
            self.groups.remove_dancer(id);
        }
        removed
    }

    /// Draw a random value in `[0, 1)` from the state's random source.
    ///
    /// Exposed for spawners that want creation-time draws on the same
    /// reproducible stream.
    pub fn roll(&mut self) -> f32 {
        self.rng.random()
    }

    /// Advance the whole floor by one frame.
    ///
    /// `beat` is this frame's beat-signal snapshot; `dt` is the elapsed
    /// wall-clock time in seconds since the previous tick.
    pub fn run_tick(&mut self, beat: &BeatSignal, dt: f32) -> TickSummary {
        self.tick = self.tick.saturating_add(1);

        // Phase 1: snapshot before any mutation.
        let snapshots: Vec<DancerSnapshot> =
            self.dancers.values().map(Dancer::snapshot).collect();

        // Phase 2: per-dancer behavior.
        let ids: Vec<DancerId> = self.dancers.keys().copied().collect();
        let mut conga_proposals: Vec<(DancerId, Vec<DancerId>)> = Vec::new();
        let mut celebrities: Vec<DancerId> = Vec::new();
        for id in &ids {
            let Some(dancer) = self.dancers.get_mut(id) else {
                continue;
            };
            if dancer.kind.is_celebrity() {
                celebrities.push(*id);
            }
            let outcome = dancer.update(
                &snapshots,
                beat,
                &self.bounds,
                &mut self.catalog,
                &self.behavior,
                &mut self.rng,
            );
            if !outcome.conga_recruits.is_empty() {
                conga_proposals.push((*id, outcome.conga_recruits));
            }
        }

        // Phase 3: celebrity influence.
        for id in celebrities {
            apply_celebrity_influence(
                id,
                &mut self.dancers,
                &self.catalog,
                &self.behavior,
                &mut self.rng,
            );
        }

        // Phase 4: structural managers. Conga registration runs first so
        // recruits are out of their groups before the group passes.
        for (leader, recruits) in conga_proposals {
            let _ = self.congas.start_line(
                leader,
                &recruits,
                &mut self.dancers,
                &mut self.groups,
                &mut self.rng,
            );
        }
        self.groups
            .update(&self.dancers, dt, self.group_formation_factor, &mut self.rng);
        self.congas.update(&mut self.dancers, dt);
        self.groups.assign_members(&mut self.dancers, &mut self.rng);

        // Phase 5: trends own popularity.
        self.trends.update(&self.dancers, beat, &mut self.catalog);

        // Phase 6: relationships, then crews built on top of them.
        self.relationships
            .update(&self.dancers, dt, &mut self.rng);
        self.crews.update(
            &mut self.dancers,
            &self.relationships,
            &mut self.catalog,
            self.tick,
            &mut self.rng,
        );

        let top_move = self
            .trends
            .top_trends(1)
            .first()
            .and_then(|(id, _)| self.catalog.get(*id))
            .map(|m| m.name.clone());

        let summary = TickSummary {
            tick: self.tick,
            dancers: self.dancers.len(),
            groups: self.groups.len(),
            conga_lines: self.congas.len(),
            crews: self.crews.len(),
            relationships: self.relationships.len(),
            moves: self.catalog.len(),
            top_move,
        };
        debug!(
            tick = summary.tick,
            dancers = summary.dancers,
            groups = summary.groups,
            congas = summary.conga_lines,
            crews = summary.crews,
            "tick complete"
        );
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
