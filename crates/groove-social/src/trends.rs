//! Trend tracking: decaying popularity scores per dance move.
//!
//! Each tick the tracker tallies who is performing what, boosts the score
//! of every move in use (more for moves favored by trendsetters), decays
//! the previous score, and writes the result back into the move catalog.
//! The tracker is the catalog's only popularity writer; dancers read
//! popularity through their selection weights and close the feedback
//! loop.

use std::collections::BTreeMap;

use groove_agents::{Dancer, MoveCatalog};
use groove_types::{BeatSignal, DancerId, MoveId, clamp_unit};

/// Multiplicative decay applied to a move's score before each boost.
const DECAY_RATE: f32 = 0.995;

/// Score boost per dancer currently performing the move.
const COUNT_BOOST: f32 = 0.1;

/// Additional boost per unit of trendsetter trait among performers.
const TRENDSETTER_BOOST: f32 = 0.05;

/// History is sampled every this many beats (on the beat boundary).
const HISTORY_SAMPLE_BEATS: u64 = 4;

/// Aggregates move usage into decaying popularity scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendTracker {
    /// Current score per move that has ever been performed.
    scores: BTreeMap<MoveId, f32>,
    /// Sampled score series per move, for the external trend chart.
    history: BTreeMap<MoveId, Vec<f32>>,
}

impl TrendTracker {
    /// Create an empty tracker.
    pub const fn new() -> Self {
        Self {
            scores: BTreeMap::new(),
            history: BTreeMap::new(),
        }
    }

    /// Tally current moves, update scores, and write popularity back to
    /// the catalog.
    ///
    /// On every fourth beat boundary the current scores are appended to
    /// the history series.
    pub fn update(
        &mut self,
        dancers: &BTreeMap<DancerId, Dancer>,
        beat: &BeatSignal,
        catalog: &mut MoveCatalog,
    ) {
        let mut usage: BTreeMap<MoveId, (usize, f32)> = BTreeMap::new();
        for dancer in dancers.values() {
            let entry = usage.entry(dancer.current_move).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += dancer.personality.trendsetter;
        }

        for (move_id, (count, trendsetter_sum)) in usage {
            let boost = count as f32 * COUNT_BOOST + trendsetter_sum * TRENDSETTER_BOOST;
            let score = self
                .scores
                .entry(move_id)
                .and_modify(|s| *s *= DECAY_RATE)
                .or_insert(0.0);
            *score = clamp_unit(*score + boost);
            catalog.set_popularity(move_id, *score);
        }

        if beat.just_beat && beat.beat_count % HISTORY_SAMPLE_BEATS == 0 {
            for (move_id, score) in &self.scores {
                self.history.entry(*move_id).or_default().push(*score);
            }
        }
    }

    /// Current score for a move (0.0 when never performed).
    pub fn score(&self, move_id: MoveId) -> f32 {
        self.scores.get(&move_id).copied().unwrap_or(0.0)
    }

    /// The `n` highest-scoring moves, best first.
    pub fn top_trends(&self, n: usize) -> Vec<(MoveId, f32)> {
        let mut entries: Vec<(MoveId, f32)> =
            self.scores.iter().map(|(id, s)| (*id, *s)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(n);
        entries
    }

    /// Sampled score history per move.
    pub const fn history(&self) -> &BTreeMap<MoveId, Vec<f32>> {
        &self.history
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

    use groove_agents::BehaviorConfig;
    use groove_types::{Color, Personality};

    use super::*;

    fn crowd_on_move(
        count: usize,
        move_name: &str,
        trendsetter: f32,
        catalog: &mut MoveCatalog,
        rng: &mut SmallRng,
    ) -> BTreeMap<DancerId, Dancer> {
        let cfg = BehaviorConfig::default();
        let move_id = catalog.id_by_name(move_name).unwrap_or_default();
        let mut dancers = BTreeMap::new();
        for i in 0..count {
            let mut dancer = Dancer::new(
                Personality::new(0.5, 0.5, 0.5, trendsetter, 0.5),
                Vec2::new(100.0 + 30.0 * i as f32, 100.0),
                Color::new(0, 0, 0),
                catalog,
                &cfg,
                rng,
            );
            dancer.current_move = move_id;
            dancers.insert(dancer.id, dancer);
        }
        dancers
    }

    #[test]
    fn boost_scales_with_usage_and_trendsetters() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut catalog = MoveCatalog::with_basic_moves();
        let dancers = crowd_on_move(3, "Spin", 0.6, &mut catalog, &mut rng);
        let spin = catalog.id_by_name("Spin").unwrap_or_default();

        let mut tracker = TrendTracker::new();
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);

        // 3 * 0.1 + (3 * 0.6) * 0.05 = 0.39
        assert!((tracker.score(spin) - 0.39).abs() < 1e-4);
    }

    #[test]
    fn score_is_capped_at_one() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut catalog = MoveCatalog::with_basic_moves();
        let dancers = crowd_on_move(30, "Jump", 1.0, &mut catalog, &mut rng);
        let jump = catalog.id_by_name("Jump").unwrap_or_default();

        let mut tracker = TrendTracker::new();
        for _ in 0..10 {
            tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);
            assert!(tracker.score(jump) <= 1.0);
        }
        assert!((tracker.score(jump) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn popularity_written_back_to_catalog() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut catalog = MoveCatalog::with_basic_moves();
        let dancers = crowd_on_move(2, "Wave", 0.0, &mut catalog, &mut rng);
        let wave = catalog.id_by_name("Wave").unwrap_or_default();

        let mut tracker = TrendTracker::new();
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);

        let popularity = catalog.get(wave).map(groove_agents::DanceMove::popularity);
        assert_eq!(popularity, Some(tracker.score(wave)));
        assert!(tracker.score(wave) > 0.0);
    }

    #[test]
    fn unused_moves_keep_their_score() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut catalog = MoveCatalog::with_basic_moves();
        let mut dancers = crowd_on_move(2, "Wave", 0.0, &mut catalog, &mut rng);
        let wave = catalog.id_by_name("Wave").unwrap_or_default();
        let shuffle = catalog.id_by_name("Shuffle").unwrap_or_default();

        let mut tracker = TrendTracker::new();
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);
        let wave_score = tracker.score(wave);

        // Everyone switches to Shuffle; Wave's score is not decayed
        // because decay applies when a move is boosted.
        for dancer in dancers.values_mut() {
            dancer.current_move = shuffle;
        }
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);

        assert!((tracker.score(wave) - wave_score).abs() < f32::EPSILON);
        assert!(tracker.score(shuffle) > 0.0);
    }

    #[test]
    fn decay_bounds_repeated_boosts() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut catalog = MoveCatalog::with_basic_moves();
        let dancers = crowd_on_move(1, "Twist", 0.0, &mut catalog, &mut rng);
        let twist = catalog.id_by_name("Twist").unwrap_or_default();

        let mut tracker = TrendTracker::new();
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);
        let first = tracker.score(twist);
        tracker.update(&dancers, &BeatSignal::silence(), &mut catalog);
        let second = tracker.score(twist);

        // Second score is decayed-first + boost, strictly between the
        // first score and first + boost.
        assert!(second > first);
        assert!(second < first + 0.1);
    }

    #[test]
    fn history_samples_every_fourth_beat() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut catalog = MoveCatalog::with_basic_moves();
        let dancers = crowd_on_move(2, "Spin", 0.5, &mut catalog, &mut rng);
        let spin = catalog.id_by_name("Spin").unwrap_or_default();

        let mut tracker = TrendTracker::new();

        let mut beat = BeatSignal::silence();
        beat.just_beat = true;
        beat.beat_count = 3;
        tracker.update(&dancers, &beat, &mut catalog);
        assert!(tracker.history().get(&spin).is_none());

        beat.beat_count = 4;
        tracker.update(&dancers, &beat, &mut catalog);
        assert_eq!(tracker.history().get(&spin).map(Vec::len), Some(1));

        // Not a beat boundary: no sample even on a multiple of four.
        beat.just_beat = false;
        beat.beat_count = 8;
        tracker.update(&dancers, &beat, &mut catalog);
        assert_eq!(tracker.history().get(&spin).map(Vec::len), Some(1));
    }

    #[test]
    fn top_trends_orders_by_score() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut catalog = MoveCatalog::with_basic_moves();
        let spin_crowd = crowd_on_move(5, "Spin", 0.5, &mut catalog, &mut rng);
        let wave_crowd = crowd_on_move(1, "Wave", 0.0, &mut catalog, &mut rng);
        let spin = catalog.id_by_name("Spin").unwrap_or_default();

        let mut all = spin_crowd;
        all.extend(wave_crowd);

        let mut tracker = TrendTracker::new();
        tracker.update(&all, &BeatSignal::silence(), &mut catalog);

        let top = tracker.top_trends(5);
        assert_eq!(top.first().map(|(id, _)| *id), Some(spin));
        assert_eq!(top.len(), 2);
    }
}
