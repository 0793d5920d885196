//! The between-tick control surface.
//!
//! An embedding UI calls these methods between ticks -- never while a
//! tick is in progress -- to tune the simulation at runtime: the group
//! formation factor, floor-wide mood presets, floor resizing, and a full
//! floor reset. None of them touch the move catalog or the trend table;
//! moves are append-only and popularity belongs to the trend tracker.

use groove_social::{CongaManager, CrewManager, GroupManager, RelationshipGraph};
use groove_types::{FloorBounds, FloorMood, clamp_unit};
use tracing::info;

use crate::tick::PartyState;

impl PartyState {
    /// Set the group formation factor, clamped to [0.0, 1.0].
    pub fn set_group_formation_factor(&mut self, factor: f32) {
        self.group_formation_factor = clamp_unit(factor);
    }

    /// Apply a mood preset to every dancer currently on the floor.
    ///
    /// Energetic boosts live energy and the energy trait; Relaxed drains
    /// energy but sharpens rhythm sensitivity; Experimental boosts
    /// creativity. All nudged traits stay inside their documented ranges.
    pub fn apply_floor_mood(&mut self, mood: FloorMood) {
        for dancer in self.dancers.values_mut() {
            match mood {
                FloorMood::Energetic => {
                    dancer.energy = (dancer.energy + 0.3).min(1.0);
                    dancer.personality.energy = (dancer.personality.energy + 0.2).min(1.0);
                }
                FloorMood::Relaxed => {
                    dancer.energy = (dancer.energy - 0.2).max(0.1);
                    dancer.personality.energy = (dancer.personality.energy - 0.1).max(0.2);
                    dancer.personality.rhythm_sensitivity =
                        (dancer.personality.rhythm_sensitivity + 0.1).min(1.0);
                }
                FloorMood::Experimental => {
                    dancer.personality.creativity =
                        (dancer.personality.creativity + 0.2).min(1.0);
                }
            }
        }
        info!(?mood, dancers = self.dancers.len(), "floor mood applied");
    }

    /// Resize the dance floor and clamp every dancer back inside the new
    /// playable area.
    pub fn resize_floor(&mut self, width: f32, height: f32) {
        self.bounds = FloorBounds::new(width, height);
        for dancer in self.dancers.values_mut() {
            dancer.position = self.bounds.clamp_point(dancer.position);
        }
        info!(width, height, "floor resized");
    }

    /// Clear the floor: dancers and every social structure go away, the
    /// move catalog and trend history stay (moves are never deleted).
    pub fn clear_floor(&mut self) {
        self.dancers.clear();
        self.groups = GroupManager::new();
        self.congas = CongaManager::new();
        self.relationships = RelationshipGraph::new();
        self.crews = CrewManager::new();
        info!("floor cleared");
    }
}
