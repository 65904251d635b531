//! The per-part divisions grid.
//!
//! MusicXML expresses every duration as an integer multiple of a per-part
//! "divisions per quarter note" unit. The grid is computed once per part from
//! the part's shortest sounding duration, so that the shortest note maps to
//! the smallest possible integer and every longer duration stays integral.

use num_traits::Zero;

use crate::models::{MeasureEvent, Part, Rational};

use super::duration::quarter;
use super::errors::TranslateError;

/// Divisions grid for one part.
///
/// Invariant: `divisions / factor == (1/4) / shortest` in reduced form. A
/// factor of 1 means the shortest note divides the quarter note integrally;
/// anything else is a degraded mapping the caller records a fidelity warning
/// for.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionsGrid {
    shortest: Rational,
    divisions: i32,
    factor: i32,
}

impl DivisionsGrid {
    /// Build the grid from the part's shortest sounding duration.
    ///
    /// The boolean is true when the mapping is degraded (factor != 1).
    pub fn from_shortest(shortest: Rational) -> (Self, bool) {
        let shortest = if shortest <= Rational::zero() {
            quarter()
        } else {
            shortest
        };
        let ratio = quarter() / shortest;
        let grid = DivisionsGrid {
            shortest,
            divisions: *ratio.numer(),
            factor: *ratio.denom(),
        };
        let degraded = grid.factor != 1;
        (grid, degraded)
    }

    /// Scan a part for its shortest sounding duration and build the grid.
    ///
    /// Grace notes carry no duration and are skipped; silent skips count
    /// because they occupy grid positions too. A part with no durations at
    /// all gets a quarter-note grid.
    pub fn for_part(part: &Part) -> (Self, bool) {
        let mut shortest: Option<Rational> = None;
        let mut consider = |d: Rational| {
            if d > Rational::zero() && shortest.map_or(true, |s| d < s) {
                shortest = Some(d);
            }
        };
        for measure in &part.measures {
            for event in &measure.events {
                match event {
                    MeasureEvent::Note(note) if note.grace.is_none() => consider(note.duration),
                    MeasureEvent::Skip { duration, .. } => consider(*duration),
                    _ => {}
                }
            }
        }
        Self::from_shortest(shortest.unwrap_or_else(quarter))
    }

    /// The value written to the `<divisions>` element.
    pub fn divisions_per_quarter(&self) -> i32 {
        self.divisions
    }

    pub fn multiplying_factor(&self) -> i32 {
        self.factor
    }

    /// Convert a duration to its integer divisions count.
    ///
    /// A non-integral result means the grid was computed from a duration that
    /// does not actually occur as the part's shortest note; that is an
    /// internal inconsistency and fatal, never silently truncated.
    pub fn to_divisions(
        &self,
        duration: Rational,
        measure: u32,
        staff: u8,
        voice: u8,
    ) -> Result<i32, TranslateError> {
        let scaled = duration / self.shortest * Rational::from_integer(self.factor);
        if !scaled.is_integer() {
            return Err(TranslateError::ArithmeticInconsistency {
                measure,
                staff,
                voice,
                value: duration,
            });
        }
        Ok(scaled.to_integer())
    }
}
