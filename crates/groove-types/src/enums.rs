//! Enumeration types shared across the Groove workspace.

use serde::{Deserialize, Serialize};

/// Qualitative state of a pairwise relationship between two dancers.
///
/// Every relationship starts [`Neutral`]. Promotion to [`Friend`] or
/// [`Rival`] happens only when strength crosses the documented thresholds
/// (see the relationship graph); a demotion back to neutral never erases
/// the record of a past promotion.
///
/// [`Neutral`]: RelationshipKind::Neutral
/// [`Friend`]: RelationshipKind::Friend
/// [`Rival`]: RelationshipKind::Rival
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// No strong feeling either way.
    Neutral,
    /// Strong positive bond; prerequisite for crew membership.
    Friend,
    /// Strong negative bond between incompatible dancers.
    Rival,
}

impl RelationshipKind {
    /// Short lowercase label for logs and render output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Friend => "friend",
            Self::Rival => "rival",
        }
    }
}

impl core::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Floor-wide mood preset applied by the external control surface.
///
/// Each preset bulk-mutates a cohort's energy/creativity/rhythm traits;
/// the exact deltas live with the control surface, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorMood {
    /// Boost current energy and the energy trait.
    Energetic,
    /// Lower energy, sharpen rhythm sensitivity.
    Relaxed,
    /// Boost creativity.
    Experimental,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(RelationshipKind::Neutral.label(), "neutral");
        assert_eq!(RelationshipKind::Friend.label(), "friend");
        assert_eq!(RelationshipKind::Rival.label(), "rival");
        assert_eq!(format!("{}", RelationshipKind::Rival), "rival");
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&FloorMood::Experimental);
        assert!(json.is_ok());
        if let Ok(json) = json {
            assert_eq!(json, "\"experimental\"");
            let back: Result<FloorMood, _> = serde_json::from_str(&json);
            assert_eq!(back.ok(), Some(FloorMood::Experimental));
        }
    }
}
