//! Inter-voice and inter-staff position synchronization.
//!
//! MusicXML interleaves the voices of a measure in one flat element sequence;
//! the notional write cursor only moves forward with each note unless a
//! `<backup>` or `<forward>` element corrects it. This engine decides, before
//! every visible note, which correction (if any) has to be emitted.
//!
//! Decision precedence, evaluated in order:
//! 1. no previous note in the measure: no correction;
//! 2. staff change: backup over everything the previous voice advanced since
//!    its last synchronization point, then reconcile the new voice's start;
//! 3. voice change on the same staff: same backup amount, then reconcile;
//! 4. same staff and voice: reconcile the accumulated pending skip against
//!    the position the note actually needs to start at, emitting the signed
//!    gap as one backup or forward.
//!
//! Rests that produce no visible note never reach this engine; they only
//! record a pending skip on the tracker.

use num_traits::Zero;

use crate::models::Rational;

use super::position::{PositionTracker, VoiceKey};

/// A cursor correction to emit before the next note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    Backup(Rational),
    Forward(Rational),
}

/// Context of the previously emitted note.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NoteContext {
    staff: u8,
    voice: u8,
    position_after: Rational,
}

/// Decides backup/forward corrections across voice and staff changes.
#[derive(Debug, Clone)]
pub struct SynchronizationEngine {
    previous: Option<NoteContext>,
    /// Measure-relative position where the current same-voice run began.
    sync_base: Rational,
}

impl Default for SynchronizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SynchronizationEngine {
    pub fn new() -> Self {
        SynchronizationEngine {
            previous: None,
            sync_base: Rational::zero(),
        }
    }

    /// Forget everything at a measure boundary.
    pub fn reset_measure(&mut self) {
        self.previous = None;
        self.sync_base = Rational::zero();
    }

    /// Decide the corrections for the next visible note and settle the
    /// voice's start position on the tracker.
    ///
    /// Returns the corrections to emit (at most two: a change backup followed
    /// by a reconciling forward/backup) and the measure-relative position the
    /// note starts at. Amounts are always strictly positive; zero gaps are
    /// silently consumed. The voice's pending skip is reset either way.
    pub fn prepare(
        &mut self,
        tracker: &mut PositionTracker,
        staff: u8,
        voice: u8,
        onset: Option<Rational>,
    ) -> (Vec<Correction>, Rational) {
        let key: VoiceKey = (staff, voice);
        let pending = tracker.take_pending_skip(key);
        let candidate = tracker.current_offset(key) + pending;
        let needed = onset.unwrap_or(candidate);

        let mut corrections = Vec::new();
        match self.previous {
            None => {
                self.sync_base = needed;
            }
            Some(prev) if prev.staff != staff || prev.voice != voice => {
                // Backup fires first on any staff or voice change, rewinding
                // the full advance of the previous voice's run.
                let rewind = prev.position_after - self.sync_base;
                let cursor = if rewind > Rational::zero() {
                    corrections.push(Correction::Backup(rewind));
                    prev.position_after - rewind
                } else {
                    prev.position_after
                };
                push_gap(&mut corrections, needed - cursor);
                self.sync_base = needed;
            }
            Some(_) => {
                let gap = needed - candidate;
                push_gap(&mut corrections, gap);
                if !gap.is_zero() {
                    self.sync_base = needed;
                }
            }
        }

        tracker.settle(key, needed);
        (corrections, needed)
    }

    /// Record an emitted note: advance the voice and remember its context.
    pub fn note_emitted(
        &mut self,
        tracker: &mut PositionTracker,
        staff: u8,
        voice: u8,
        start: Rational,
        duration: Rational,
    ) {
        tracker.advance((staff, voice), duration);
        self.previous = Some(NoteContext {
            staff,
            voice,
            position_after: start + duration,
        });
    }
}

fn push_gap(corrections: &mut Vec<Correction>, gap: Rational) {
    if gap > Rational::zero() {
        corrections.push(Correction::Forward(gap));
    } else if gap < Rational::zero() {
        corrections.push(Correction::Backup(-gap));
    }
}
