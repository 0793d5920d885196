//! Read-only render snapshot assembly.
//!
//! The external renderer consumes one [`RenderFrame`] per tick: dancer
//! positions and moves, group geometry, conga chains as ordered position
//! sequences, relationships strong enough to draw, crews, and the top
//! trends. Everything is plain serializable data; the renderer never
//! touches live simulation state.

use serde::Serialize;

use groove_types::{Color, CongaLineId, CrewId, DancerId, GroupId, RelationshipKind};

use crate::tick::PartyState;

/// How many trends the frame carries.
const TOP_TREND_COUNT: usize = 5;

/// One dancer, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DancerView {
    /// Identity, stable across frames.
    pub id: DancerId,
    /// Position as `[x, y]`.
    pub position: [f32; 2],
    /// Render color.
    pub color: Color,
    /// Name of the current move.
    pub move_name: String,
    /// Complexity of the current move.
    pub move_complexity: f32,
    /// Energy requirement of the current move.
    pub move_energy: f32,
    /// The dancer's live energy level.
    pub energy: f32,
    /// Whether this dancer is a celebrity.
    pub is_celebrity: bool,
}

/// One dance group, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    /// Identity, stable across frames.
    pub id: GroupId,
    /// Centroid as `[x, y]`.
    pub centroid: [f32; 2],
    /// Capture radius.
    pub radius: f32,
    /// Current membership size.
    pub member_count: usize,
    /// Name of the dominant move, if any.
    pub dominant_move: Option<String>,
}

/// One conga line as an ordered position sequence (leader first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongaView {
    /// Identity, stable across frames.
    pub id: CongaLineId,
    /// Positions in chain order, leader first.
    pub positions: Vec<[f32; 2]>,
}

/// One visible relationship (strength above the render threshold).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipView {
    /// One endpoint.
    pub a: DancerId,
    /// The other endpoint.
    pub b: DancerId,
    /// Bond strength.
    pub strength: f32,
    /// Friend, rival, or neutral.
    pub kind: RelationshipKind,
}

/// One crew.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewView {
    /// Identity, stable across frames.
    pub id: CrewId,
    /// Display name.
    pub name: String,
    /// Crew color.
    pub color: Color,
    /// Member handles.
    pub members: Vec<DancerId>,
    /// Names of the crew's signature moves.
    pub signature_moves: Vec<String>,
}

/// One trending move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    /// Move name.
    pub move_name: String,
    /// Current trend score.
    pub score: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// The tick this frame reflects.
    pub tick: u64,
    /// All dancers.
    pub dancers: Vec<DancerView>,
    /// All live groups.
    pub groups: Vec<GroupView>,
    /// All live conga lines.
    pub congas: Vec<CongaView>,
    /// Relationships above the visibility threshold.
    pub relationships: Vec<RelationshipView>,
    /// All crews.
    pub crews: Vec<CrewView>,
    /// The strongest current trends, best first.
    pub top_trends: Vec<TrendView>,
}

impl PartyState {
    /// Assemble the read-only frame for the renderer.
    pub fn render_frame(&self) -> RenderFrame {
        let dancers = self
            .dancers
            .values()
            .map(|dancer| {
                let (move_name, move_complexity, move_energy) = self
                    .catalog
                    .get(dancer.current_move)
                    .map_or((String::new(), 0.0, 0.0), |m| {
                        (m.name.clone(), m.complexity, m.energy_required)
                    });
                DancerView {
                    id: dancer.id,
                    position: dancer.position.to_array(),
                    color: dancer.color,
                    move_name,
                    move_complexity,
                    move_energy,
                    energy: dancer.energy,
                    is_celebrity: dancer.kind.is_celebrity(),
                }
            })
            .collect();

        let groups = self
            .groups
            .groups()
            .map(|group| GroupView {
                id: group.id,
                centroid: group.centroid.to_array(),
                radius: group.radius,
                member_count: group.members.len(),
                dominant_move: group
                    .dominant_move
                    .and_then(|id| self.catalog.get(id))
                    .map(|m| m.name.clone()),
            })
            .collect();

        let congas = self
            .congas
            .lines()
            .map(|line| {
                let mut positions = Vec::with_capacity(line.followers.len() + 1);
                if let Some(leader) = self.dancers.get(&line.leader) {
                    positions.push(leader.position.to_array());
                }
                for follower in &line.followers {
                    if let Some(dancer) = self.dancers.get(follower) {
                        positions.push(dancer.position.to_array());
                    }
                }
                CongaView {
                    id: line.id,
                    positions,
                }
            })
            .collect();

        let relationships = self
            .relationships
            .visible()
            .map(|(key, rel)| RelationshipView {
                a: key.first(),
                b: key.second(),
                strength: rel.strength,
                kind: rel.kind,
            })
            .collect();

        let crews = self
            .crews
            .crews()
            .map(|crew| CrewView {
                id: crew.id,
                name: crew.name.clone(),
                color: crew.color,
                members: crew.members.iter().copied().collect(),
                signature_moves: crew
                    .signature_moves
                    .iter()
                    .filter_map(|id| self.catalog.get(*id))
                    .map(|m| m.name.clone())
                    .collect(),
            })
            .collect();

        let top_trends = self
            .trends
            .top_trends(TOP_TREND_COUNT)
            .into_iter()
            .filter_map(|(id, score)| {
                self.catalog.get(id).map(|m| TrendView {
                    move_name: m.name.clone(),
                    score,
                })
            })
            .collect();

        RenderFrame {
            tick: self.tick,
            dancers,
            groups,
            congas,
            relationships,
            crews,
            top_trends,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use groove_agents::BehaviorConfig;
    use groove_types::{BeatSignal, FloorBounds, Personality};

    use super::*;

    fn beat(tick: u64) -> BeatSignal {
        BeatSignal {
            beat_count: tick / 8,
            just_beat: tick % 8 == 0 && tick > 0,
            ..BeatSignal::silence()
        }
    }

    fn busy_state() -> PartyState {
        let mut state = PartyState::new(
            FloorBounds::new(1024.0, 768.0),
            BehaviorConfig::default(),
            0.1,
            17,
        );
        for i in 0..10 {
            state.add_dancer(
                Personality::new(0.7, 0.6, 0.4, 0.5, 0.6),
                Vec2::new(200.0 + 25.0 * i as f32, 300.0),
                Color::new(40, 80, 120),
            );
        }
        state.add_celebrity(Vec2::new(500.0, 300.0), Color::GOLD);
        for tick in 1..=120 {
            state.run_tick(&beat(tick), 0.016);
        }
        state
    }

    #[test]
    fn frame_mirrors_state() {
        let state = busy_state();
        let frame = state.render_frame();

        assert_eq!(frame.tick, state.tick);
        assert_eq!(frame.dancers.len(), state.dancers.len());
        assert_eq!(frame.groups.len(), state.groups.len());
        assert_eq!(frame.congas.len(), state.congas.len());
        assert_eq!(frame.crews.len(), state.crews.len());
        assert_eq!(frame.dancers.iter().filter(|d| d.is_celebrity).count(), 1);

        // Every dancer view names a real catalog move.
        for view in &frame.dancers {
            assert!(!view.move_name.is_empty());
        }
    }

    #[test]
    fn conga_views_are_ordered_chains() {
        let state = busy_state();
        let frame = state.render_frame();
        for line in state.congas.lines() {
            let view = frame.congas.iter().find(|v| v.id == line.id);
            assert!(view.is_some_and(|v| v.positions.len() == line.followers.len() + 1));
        }
    }

    #[test]
    fn visible_relationships_pass_threshold() {
        let state = busy_state();
        let frame = state.render_frame();
        for rel in &frame.relationships {
            assert!(rel.strength > 0.4);
        }
    }

    #[test]
    fn frame_serializes_to_json() {
        let state = busy_state();
        let json = serde_json::to_string(&state.render_frame());
        assert!(json.is_ok());
        if let Ok(json) = json {
            assert!(json.contains("\"dancers\""));
            assert!(json.contains("\"top_trends\""));
        }
    }

    #[test]
    fn trends_are_sorted_descending() {
        let state = busy_state();
        let frame = state.render_frame();
        assert!(frame.top_trends.len() <= 5);
        for pair in frame.top_trends.windows(2) {
            if let [a, b] = pair {
                assert!(a.score >= b.score);
            }
        }
    }
}
