//! Per-voice cursor tracking within the active measure.
//!
//! Each `(staff, voice)` pair owns a cumulative offset from the start of the
//! current measure plus a pending-skip amount for silent gaps that have not
//! yet been materialized as forward/backup elements. All state is transient
//! within one measure.

use std::collections::HashMap;

use num_traits::Zero;

use crate::models::Rational;

/// Key identifying one voice on one staff.
pub type VoiceKey = (u8, u8);

#[derive(Debug, Clone, Default)]
struct VoicePosition {
    offset: Rational,
    pending_skip: Rational,
}

/// Tracks the measure-relative cursor of every active voice.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    voices: HashMap<VoiceKey, VoicePosition>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sounding duration to the voice's cumulative offset.
    pub fn advance(&mut self, key: VoiceKey, duration: Rational) {
        self.voices.entry(key).or_default().offset += duration;
    }

    /// Record a silent gap without materializing a forward element.
    pub fn record_skip(&mut self, key: VoiceKey, duration: Rational) {
        self.voices.entry(key).or_default().pending_skip += duration;
    }

    /// Pending skip accumulated for the voice.
    pub fn pending_skip(&self, key: VoiceKey) -> Rational {
        self.voices
            .get(&key)
            .map(|v| v.pending_skip)
            .unwrap_or_else(Rational::zero)
    }

    /// Take and reset the voice's pending skip.
    pub fn take_pending_skip(&mut self, key: VoiceKey) -> Rational {
        match self.voices.get_mut(&key) {
            Some(v) => std::mem::replace(&mut v.pending_skip, Rational::zero()),
            None => Rational::zero(),
        }
    }

    /// Current cumulative offset of the voice within the measure.
    pub fn current_offset(&self, key: VoiceKey) -> Rational {
        self.voices
            .get(&key)
            .map(|v| v.offset)
            .unwrap_or_else(Rational::zero)
    }

    /// Move the voice's cursor to an absolute measure-relative position.
    pub fn settle(&mut self, key: VoiceKey, position: Rational) {
        self.voices.entry(key).or_default().offset = position;
    }

    /// Discard all per-voice state at a measure boundary.
    pub fn reset_measure(&mut self) {
        self.voices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::musicxml::duration::frac;

    #[test]
    fn test_advance_accumulates() {
        let mut tracker = PositionTracker::new();
        tracker.advance((1, 1), frac(1, 4));
        tracker.advance((1, 1), frac(1, 8));
        assert_eq!(tracker.current_offset((1, 1)), frac(3, 8));
    }

    #[test]
    fn test_voices_are_independent() {
        let mut tracker = PositionTracker::new();
        tracker.advance((1, 1), frac(1, 4));
        tracker.advance((1, 2), frac(1, 8));
        tracker.advance((2, 1), frac(1, 2));
        assert_eq!(tracker.current_offset((1, 1)), frac(1, 4));
        assert_eq!(tracker.current_offset((1, 2)), frac(1, 8));
        assert_eq!(tracker.current_offset((2, 1)), frac(1, 2));
    }

    #[test]
    fn test_skip_is_pending_not_advanced() {
        let mut tracker = PositionTracker::new();
        tracker.record_skip((1, 1), frac(1, 8));
        assert_eq!(tracker.current_offset((1, 1)), frac(0, 1));
        assert_eq!(tracker.pending_skip((1, 1)), frac(1, 8));
    }

    #[test]
    fn test_take_pending_skip_resets() {
        let mut tracker = PositionTracker::new();
        tracker.record_skip((1, 1), frac(1, 8));
        tracker.record_skip((1, 1), frac(1, 8));
        assert_eq!(tracker.take_pending_skip((1, 1)), frac(1, 4));
        assert_eq!(tracker.pending_skip((1, 1)), frac(0, 1));
    }

    #[test]
    fn test_reset_measure_clears_everything() {
        let mut tracker = PositionTracker::new();
        tracker.advance((1, 1), frac(1, 4));
        tracker.record_skip((1, 2), frac(1, 8));
        tracker.reset_measure();
        assert_eq!(tracker.current_offset((1, 1)), frac(0, 1));
        assert_eq!(tracker.pending_skip((1, 2)), frac(0, 1));
    }

    #[test]
    fn test_settle_moves_cursor() {
        let mut tracker = PositionTracker::new();
        tracker.advance((1, 1), frac(1, 4));
        tracker.settle((1, 1), frac(1, 2));
        assert_eq!(tracker.current_offset((1, 1)), frac(1, 2));
    }
}
