//! Exact duration arithmetic and the duration → `<type>`/dot mapping.
//!
//! All durations are `Rational` fractions in whole-note units, kept in lowest
//! terms by construction. Subtraction may go negative; that represents time
//! moving backward and is interpreted by the caller, never treated as an
//! error here.

use num_traits::Zero;

use crate::models::{Rational, TupletMembership};

/// Duration of a quarter note in whole-note units.
pub fn quarter() -> Rational {
    Rational::new(1, 4)
}

/// Shorthand for an exact fraction of a whole note.
pub fn frac(numerator: i32, denominator: i32) -> Rational {
    Rational::new(numerator, denominator)
}

/// Scale a duration by an integer ratio (e.g. 2/3 for a triplet member).
pub fn scale(duration: Rational, numerator: i32, denominator: i32) -> Rational {
    duration * Rational::new(numerator, denominator)
}

/// The duration a tuplet member displays as, before type mapping.
///
/// A triplet eighth sounds 1/12 whole but is written as an eighth; scaling
/// the sounding duration by actual/normal recovers the written value.
pub fn display_duration(sounding: Rational, tuplet: Option<&TupletMembership>) -> Rational {
    match tuplet {
        Some(t) => sounding * Rational::new(t.actual_notes as i32, t.normal_notes as i32),
        None => sounding,
    }
}

/// Map a written duration to its MusicXML `<type>` name and dot count.
///
/// Handles plain and dotted (up to two dots) power-of-two durations from
/// whole down to 1024th. Returns `None` for durations with no graphic note
/// type; the caller decides whether that is reportable.
pub fn note_type_for(duration: Rational) -> Option<(&'static str, u8)> {
    if duration <= Rational::zero() {
        return None;
    }
    for dots in 0..=2u8 {
        // A duration with d dots equals base * (2^(d+1) - 1) / 2^d.
        let base = duration * Rational::new(1 << dots, (1 << (dots + 1)) - 1);
        if let Some(name) = base_type_name(base) {
            return Some((name, dots));
        }
    }
    None
}

fn base_type_name(base: Rational) -> Option<&'static str> {
    if *base.numer() != 1 {
        return None;
    }
    match *base.denom() {
        1 => Some("whole"),
        2 => Some("half"),
        4 => Some("quarter"),
        8 => Some("eighth"),
        16 => Some("16th"),
        32 => Some("32nd"),
        64 => Some("64th"),
        128 => Some("128th"),
        256 => Some("256th"),
        512 => Some("512th"),
        1024 => Some("1024th"),
        _ => None,
    }
}
