//! Behavioral constants for dancer mechanics.
//!
//! Every probability, impulse scale, and threshold used by the per-tick
//! dancer update is bundled here so callers (tick cycle, tests) can
//! override defaults. The defaults are the reference values of the
//! simulation's behavior model; tests zero individual probabilities to
//! make single behaviors deterministic.

/// Tunable constants applied during every dancer update.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Scale applied to the beat-response velocity impulse (default: 5.0).
    pub beat_impulse_scale: f32,

    /// Lower bound of the initial move-change threshold draw, in beat
    /// seconds (default: 1.0).
    pub initial_move_threshold_min: f32,

    /// Upper bound of the initial move-change threshold draw (default: 3.0).
    pub initial_move_threshold_max: f32,

    /// Lower bound of the re-drawn move-change threshold after each
    /// re-selection (default: 1.0).
    pub redraw_move_threshold_min: f32,

    /// Upper bound of the re-drawn move-change threshold (default: 4.0).
    pub redraw_move_threshold_max: f32,

    /// Creativity above which a freshly-created dancer invents a personal
    /// move at construction (default: 0.7).
    pub creation_invent_threshold: f32,

    /// Per-tick probability of attempting to start a conga at all
    /// (default: 0.01).
    pub conga_attempt_probability: f32,

    /// Probability that an attempt actually triggers recruitment; congas
    /// are rare events (default: 0.005).
    pub conga_start_probability: f32,

    /// Minimum extroversion required to lead a conga (default: 0.7).
    pub conga_min_extroversion: f32,

    /// Minimum energy trait required to lead a conga (default: 0.6).
    pub conga_min_energy: f32,

    /// How many of the closest neighbors a would-be leader tries to
    /// recruit (default: 5).
    pub conga_recruit_limit: usize,

    /// Trailing distance a conga follower maintains behind its
    /// predecessor (default: 30.0).
    pub follow_distance: f32,

    /// Dead zone around the trailing distance; outside it the follower
    /// pursues or backs off (default: 5.0).
    pub follow_slack: f32,

    /// Speed factor used when a follower has to catch up (default: 0.2).
    pub follow_pursuit_factor: f32,

    /// Correction factor applied when a follower crowds its predecessor
    /// (default: 0.01).
    pub follow_backoff_factor: f32,

    /// Per-tick probability a follower syncs its move to the leader's
    /// (default: 0.1).
    pub follow_move_sync_probability: f32,

    /// Similarity distance below which neighbors attract (default: 0.3).
    pub attraction_threshold: f32,

    /// Similarity distance above which neighbors repel (default: 0.7).
    pub repulsion_threshold: f32,

    /// Speed factor of the attraction impulse (default: 0.01).
    pub attraction_factor: f32,

    /// Scale of the repulsion impulse (default: 0.01).
    pub repulsion_factor: f32,

    /// Per-tick probability of picking a fresh random wander direction
    /// when idle (default: 0.05).
    pub wander_probability: f32,

    /// Lower bound of the wander speed draw (default: 0.5).
    pub wander_speed_min: f32,

    /// Upper bound of the wander speed draw (default: 2.0).
    pub wander_speed_max: f32,

    /// Per-tick velocity retention multiplier (default: 0.9).
    pub friction: f32,

    /// Velocity damping applied when reflecting off a floor edge
    /// (default: 0.8).
    pub bounce_damping: f32,

    /// Passive energy regeneration per tick (default: 0.001).
    pub energy_regen: f32,

    /// Energy drained per tick per unit of the current move's
    /// energy requirement (default: 0.01).
    pub move_energy_cost: f32,

    /// Energy drained per tick per unit of velocity magnitude
    /// (default: 0.001).
    pub velocity_energy_cost: f32,

    /// Energy never drops below this floor (default: 0.1).
    pub energy_floor: f32,

    /// Squared distance at which an assigned target point counts as
    /// reached and is cleared (default: 25.0).
    pub target_reached_dist_sq: f32,

    /// Minimum distance below which `move_toward` applies no impulse
    /// (default: 5.0).
    pub move_toward_min_distance: f32,

    /// Base social radius shared by every dancer (default: 30.0).
    pub social_radius_base: f32,

    /// Additional social radius granted per unit extroversion
    /// (default: 70.0).
    pub social_radius_span: f32,

    /// Trendsetter value above which a dancer may invent during
    /// re-selection (default: 0.8).
    pub trendsetter_invent_threshold: f32,

    /// Probability gate on the invention branch (default: 0.2).
    pub invent_roll_probability: f32,

    /// Creativity multiplier inside the invention branch (default: 0.3).
    pub invent_creativity_factor: f32,

    /// Trendsetter value below which a dancer prefers popular moves
    /// (default: 0.3).
    pub trend_follower_threshold: f32,

    /// Probability gate on the popularity-weighted branch (default: 0.7).
    pub trend_follower_roll_probability: f32,

    /// Celebrity influence radius, replacing the personality-derived
    /// social radius (default: 150.0).
    pub celebrity_influence_radius: f32,

    /// Celebrity move-change threshold; celebrities switch moves much
    /// faster than the 1.0--3.0 draw (default: 0.5).
    pub celebrity_move_threshold: f32,

    /// Flat per-tick chance that a dancer inside the influence radius
    /// attempts to learn the celebrity's move (default: 0.2).
    pub celebrity_teach_probability: f32,

    /// Base strength of the pull toward a celebrity; falls off linearly
    /// with distance (default: 0.01).
    pub celebrity_attraction_factor: f32,

    /// Per-tick probability a celebrity reverts to its signature move
    /// (default: 0.05).
    pub signature_revert_probability: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            beat_impulse_scale: 5.0,
            initial_move_threshold_min: 1.0,
            initial_move_threshold_max: 3.0,
            redraw_move_threshold_min: 1.0,
            redraw_move_threshold_max: 4.0,
            creation_invent_threshold: 0.7,
            conga_attempt_probability: 0.01,
            conga_start_probability: 0.005,
            conga_min_extroversion: 0.7,
            conga_min_energy: 0.6,
            conga_recruit_limit: 5,
            follow_distance: 30.0,
            follow_slack: 5.0,
            follow_pursuit_factor: 0.2,
            follow_backoff_factor: 0.01,
            follow_move_sync_probability: 0.1,
            attraction_threshold: 0.3,
            repulsion_threshold: 0.7,
            attraction_factor: 0.01,
            repulsion_factor: 0.01,
            wander_probability: 0.05,
            wander_speed_min: 0.5,
            wander_speed_max: 2.0,
            friction: 0.9,
            bounce_damping: 0.8,
            energy_regen: 0.001,
            move_energy_cost: 0.01,
            velocity_energy_cost: 0.001,
            energy_floor: 0.1,
            target_reached_dist_sq: 25.0,
            move_toward_min_distance: 5.0,
            social_radius_base: 30.0,
            social_radius_span: 70.0,
            trendsetter_invent_threshold: 0.8,
            invent_roll_probability: 0.2,
            invent_creativity_factor: 0.3,
            trend_follower_threshold: 0.3,
            trend_follower_roll_probability: 0.7,
            celebrity_influence_radius: 150.0,
            celebrity_move_threshold: 0.5,
            celebrity_teach_probability: 0.2,
            celebrity_attraction_factor: 0.01,
            signature_revert_probability: 0.05,
        }
    }
}

impl BehaviorConfig {
    /// Social radius for a given extroversion value.
    pub fn social_radius(&self, extroversion: f32) -> f32 {
        self.social_radius_base + self.social_radius_span * extroversion
    }
}
