//! Pitch spelling as it appears in MusicXML `<pitch>` elements.

use serde::{Deserialize, Serialize};

/// Diatonic step letter, written to `<step>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }
}

/// Written accidental, carried by the `<accidental>` element.
///
/// This is the *graphic* accidental; the sounding alteration lives in
/// [`Pitch::alter`]. The two usually agree but the model keeps them separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "flat-flat",
            Accidental::Flat => "flat",
            Accidental::Natural => "natural",
            Accidental::Sharp => "sharp",
            Accidental::DoubleSharp => "double-sharp",
        }
    }

    /// Chromatic offset in semitones (-2..=2).
    pub fn alter(&self) -> i8 {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }
}

/// A concrete pitch: step, chromatic alteration, octave.
///
/// Octave 4 is the octave of middle C, matching the MusicXML convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    /// Chromatic alteration in semitones; 0 is natural and is not written.
    pub alter: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: i8, octave: i8) -> Self {
        Pitch { step, alter, octave }
    }
}
