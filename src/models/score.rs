//! The read-only score model the translation engine consumes, plus the
//! traversal event stream it is driven by.
//!
//! The engine never mutates these types and never calls back into the
//! traversal; it is purely a sink for [`ScoreEvent`]s delivered in document
//! order (part list order, then measure order, then event order within a
//! measure).

use serde::{Deserialize, Serialize};

use super::notation::{
    ArticulationMark, Beam, Lyric, OrnamentMark, Placement, Slur, StemDirection, TechnicalMark,
    Tie, TupletMembership,
};
use super::pitch::{Accidental, Pitch};
use super::Rational;

/// Clef sign for one staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClefSign {
    G,
    F,
    C,
    Percussion,
}

impl ClefSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClefSign::G => "G",
            ClefSign::F => "F",
            ClefSign::C => "C",
            ClefSign::Percussion => "percussion",
        }
    }
}

/// A clef: sign, staff line, optional octave transposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clef {
    pub sign: ClefSign,
    pub line: Option<u8>,
    /// Octave shift written as `<clef-octave-change>` (-1 for a tenor G clef).
    pub octave_change: Option<i8>,
}

impl Clef {
    pub fn treble() -> Self {
        Clef { sign: ClefSign::G, line: Some(2), octave_change: None }
    }

    pub fn bass() -> Self {
        Clef { sign: ClefSign::F, line: Some(4), octave_change: None }
    }

    pub fn alto() -> Self {
        Clef { sign: ClefSign::C, line: Some(3), octave_change: None }
    }
}

/// Key signature mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        }
    }
}

/// Key signature as a circle-of-fifths position (-7..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub fifths: i8,
    pub mode: Option<KeyMode>,
}

impl Key {
    pub fn new(fifths: i8) -> Self {
        Key { fifths, mode: None }
    }
}

/// Time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}

impl TimeSignature {
    pub fn new(beats: u32, beat_type: u32) -> Self {
        TimeSignature { beats, beat_type }
    }

    /// Measure capacity in whole-note units.
    pub fn measure_duration(&self) -> Rational {
        Rational::new(self.beats as i32, self.beat_type as i32)
    }
}

/// Content of a `<direction>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionContent {
    /// Free text, written as `<words>`.
    Words(String),
    /// Dynamic mark name ("p", "mf", "sfz"), written under `<dynamics>`.
    Dynamics(String),
}

/// A direction attached at a point in the measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub content: DirectionContent,
    pub placement: Option<Placement>,
    /// Staff the direction belongs to, for multi-staff parts.
    pub staff: Option<u8>,
}

/// Barline style, written as `<bar-style>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStyle {
    Regular,
    LightLight,
    LightHeavy,
}

impl BarStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarStyle::Regular => "regular",
            BarStyle::LightLight => "light-light",
            BarStyle::LightHeavy => "light-heavy",
        }
    }
}

/// A barline event, emitted at the right edge of the measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barline {
    pub style: BarStyle,
}

/// Grace-note marker on a note. Grace notes carry no `<duration>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grace {
    /// Slashed grace note (acciaccatura) when true.
    pub slash: bool,
}

/// What a note sounds as: a pitch or a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteContent {
    Pitched(Pitch),
    Rest {
        /// Whole-measure rest, written with `measure="yes"`.
        measure_rest: bool,
    },
}

/// One visible note (or visible rest) in a measure.
///
/// Durations are exact fractions in whole-note units. `onset`, when present,
/// declares the measure-relative position the note must start at; the
/// synchronization engine reconciles it against the tracked cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: NoteContent,
    pub duration: Rational,
    pub onset: Option<Rational>,
    pub voice: u8,
    pub staff: u8,
    /// Member of the same chord as the preceding note.
    pub chord: bool,
    pub grace: Option<Grace>,
    pub accidental: Option<Accidental>,
    pub stem: Option<StemDirection>,
    pub beams: Vec<Beam>,
    pub tuplet: Option<TupletMembership>,
    pub ties: Vec<Tie>,
    pub slurs: Vec<Slur>,
    pub ornaments: Vec<OrnamentMark>,
    pub articulations: Vec<ArticulationMark>,
    pub technicals: Vec<TechnicalMark>,
    pub lyrics: Vec<Lyric>,
}

impl Default for Note {
    fn default() -> Self {
        Note {
            content: NoteContent::Rest { measure_rest: false },
            duration: Rational::new(1, 4),
            onset: None,
            voice: 1,
            staff: 1,
            chord: false,
            grace: None,
            accidental: None,
            stem: None,
            beams: Vec::new(),
            tuplet: None,
            ties: Vec::new(),
            slurs: Vec::new(),
            ornaments: Vec::new(),
            articulations: Vec::new(),
            technicals: Vec::new(),
            lyrics: Vec::new(),
        }
    }
}

impl Note {
    /// A pitched note with the given duration (whole-note units).
    pub fn pitched(pitch: Pitch, duration: Rational) -> Self {
        Note {
            content: NoteContent::Pitched(pitch),
            duration,
            ..Default::default()
        }
    }

    /// A visible rest with the given duration.
    pub fn rest(duration: Rational) -> Self {
        Note {
            content: NoteContent::Rest { measure_rest: false },
            duration,
            ..Default::default()
        }
    }
}

/// One event inside a measure, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasureEvent {
    Clef { staff: u8, clef: Clef },
    Key(Key),
    Time(TimeSignature),
    /// Staff count of the part, announced when it is known or changes.
    Staves(u8),
    Note(Note),
    /// Silent placeholder occupying time without producing a visible note.
    Skip { staff: u8, voice: u8, duration: Rational },
    Direction(Direction),
    Barline(Barline),
    /// A construct with no MusicXML mapping; becomes a marked placeholder.
    Unsupported { kind: String },
}

/// One measure of a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Printed measure number, 1-based.
    pub number: u32,
    pub events: Vec<MeasureEvent>,
    /// Start a new system at this measure (`<print new-system="yes"/>`).
    pub new_system: bool,
}

impl Measure {
    pub fn new(number: u32) -> Self {
        Measure { number, events: Vec::new(), new_system: false }
    }
}

/// One part of the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part id ("P1", "P2", ...), referenced from the part list.
    pub id: String,
    pub name: String,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Part { id: id.into(), name: name.into(), measures: Vec::new() }
    }
}

/// The whole score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub title: Option<String>,
    pub parts: Vec<Part>,
}

/// Traversal event delivered to the translation engine, one per score node,
/// in document order.
#[derive(Debug, Clone, Copy)]
pub enum ScoreEvent<'a> {
    EnterScore(&'a Score),
    LeaveScore,
    EnterPart(&'a Part),
    LeavePart,
    EnterMeasure(&'a Measure),
    LeaveMeasure,
    Event(&'a MeasureEvent),
}

/// Depth-first walk of the score, delivering enter/leave events in the
/// score's declared structural order. The sink's first error aborts the walk.
pub fn traverse<E>(
    score: &Score,
    mut sink: impl FnMut(ScoreEvent<'_>) -> Result<(), E>,
) -> Result<(), E> {
    sink(ScoreEvent::EnterScore(score))?;
    for part in &score.parts {
        sink(ScoreEvent::EnterPart(part))?;
        for measure in &part.measures {
            sink(ScoreEvent::EnterMeasure(measure))?;
            for event in &measure.events {
                sink(ScoreEvent::Event(event))?;
            }
            sink(ScoreEvent::LeaveMeasure)?;
        }
        sink(ScoreEvent::LeavePart)?;
    }
    sink(ScoreEvent::LeaveScore)
}
