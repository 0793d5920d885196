//! The beat signal contract between the music front end and the core.
//!
//! The core never analyzes audio; it consumes one [`BeatSignal`] snapshot
//! per tick from whatever beat source the embedding process wires up
//! (a real analyzer, or the simulated generator in the engine binary).

use serde::{Deserialize, Serialize};

/// Per-tick structured description of the current musical beat state.
///
/// All fields are plain data; the core treats the signal as opaque input
/// and never writes back to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatSignal {
    /// Monotonic count of beats since playback started.
    pub beat_count: u64,
    /// Strength of the current beat (typically 0.0 to 1.2).
    pub beat_strength: f32,
    /// Current tempo in beats per minute.
    pub tempo: f32,
    /// Position within the current beat, 0.0 to 1.0.
    pub phase: f32,
    /// Overall musical energy, 0.0 to 1.0.
    pub energy: f32,
    /// Whether the track is in a buildup section.
    pub is_buildup: bool,
    /// Whether the track is in a breakdown section.
    pub is_breakdown: bool,
    /// True exactly once per new beat boundary.
    pub just_beat: bool,
    /// Seconds elapsed since playback started.
    pub elapsed_time: f32,
}

impl BeatSignal {
    /// A silent signal: no beats yet, neutral tempo and energy.
    ///
    /// Used as the state before the first real snapshot arrives.
    pub const fn silence() -> Self {
        Self {
            beat_count: 0,
            beat_strength: 0.0,
            tempo: 120.0,
            phase: 0.0,
            energy: 0.5,
            is_buildup: false,
            is_breakdown: false,
            just_beat: false,
            elapsed_time: 0.0,
        }
    }
}

impl Default for BeatSignal {
    fn default() -> Self {
        Self::silence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_no_beats() {
        let signal = BeatSignal::silence();
        assert_eq!(signal.beat_count, 0);
        assert!(!signal.just_beat);
        assert!(signal.beat_strength.abs() < f32::EPSILON);
    }

    #[test]
    fn serde_round_trip() {
        let signal = BeatSignal {
            beat_count: 17,
            beat_strength: 1.1,
            tempo: 128.0,
            phase: 0.25,
            energy: 0.6,
            is_buildup: true,
            is_breakdown: false,
            just_beat: true,
            elapsed_time: 8.0,
        };
        let json = serde_json::to_string(&signal);
        assert!(json.is_ok());
        if let Ok(json) = json {
            let back: Result<BeatSignal, _> = serde_json::from_str(&json);
            assert_eq!(back.ok(), Some(signal));
        }
    }
}
