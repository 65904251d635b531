//! Per-note notation attachments: ties, slurs, tuplets, articulations,
//! ornaments, technical marks, beams, lyrics.
//!
//! These are read-only value types attached to score-model notes. The
//! translation engine turns them into the `<notations>` sub-tree (and the
//! sibling `<tie>`, `<beam>` and `<lyric>` elements) of a MusicXML note.

use serde::{Deserialize, Serialize};

/// Vertical placement of a notation mark.
///
/// `None` on the carrying mark means the placement attribute is omitted
/// entirely; it is never written as an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Above => "above",
            Placement::Below => "below",
        }
    }
}

/// Start/continue/stop marker shared by ties and slurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartStopContinue {
    Start,
    Continue,
    Stop,
}

impl StartStopContinue {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartStopContinue::Start => "start",
            StartStopContinue::Continue => "continue",
            StartStopContinue::Stop => "stop",
        }
    }
}

/// Tie marker. Produces both the sounding `<tie>` element and the graphic
/// `<tied>` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tie {
    pub kind: StartStopContinue,
    pub placement: Option<Placement>,
}

impl Tie {
    pub fn new(kind: StartStopContinue) -> Self {
        Tie { kind, placement: None }
    }
}

/// Slur marker. A note may carry several, distinguished by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slur {
    /// Slur level 1..N, written to the `number` attribute.
    pub number: u8,
    pub kind: StartStopContinue,
    pub placement: Option<Placement>,
}

impl Slur {
    pub fn new(number: u8, kind: StartStopContinue) -> Self {
        Slur { number, kind, placement: None }
    }
}

/// Tuplet bracket boundary: present only on the first and last member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupletBoundary {
    Start,
    Stop,
}

impl TupletBoundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            TupletBoundary::Start => "start",
            TupletBoundary::Stop => "stop",
        }
    }
}

/// Tuplet membership for a note, driving both `<time-modification>` (on every
/// member) and the bracket `<tuplet>` notation (on the boundary members).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupletMembership {
    /// Actual notes sounding in the tuplet span (3 for a triplet).
    pub actual_notes: u32,
    /// Normal notes the span replaces (2 for a triplet).
    pub normal_notes: u32,
    /// Bracket boundary, if this note opens or closes the group.
    pub boundary: Option<TupletBoundary>,
    pub placement: Option<Placement>,
}

impl TupletMembership {
    pub fn new(actual_notes: u32, normal_notes: u32) -> Self {
        TupletMembership {
            actual_notes,
            normal_notes,
            boundary: None,
            placement: None,
        }
    }
}

/// Articulation marks, children of `<articulations>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Articulation {
    Accent,
    StrongAccent,
    Staccato,
    Staccatissimo,
    Tenuto,
    DetachedLegato,
    Spiccato,
    BreathMark,
    Caesura,
}

impl Articulation {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Articulation::Accent => "accent",
            Articulation::StrongAccent => "strong-accent",
            Articulation::Staccato => "staccato",
            Articulation::Staccatissimo => "staccatissimo",
            Articulation::Tenuto => "tenuto",
            Articulation::DetachedLegato => "detached-legato",
            Articulation::Spiccato => "spiccato",
            Articulation::BreathMark => "breath-mark",
            Articulation::Caesura => "caesura",
        }
    }
}

/// An articulation with optional placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticulationMark {
    pub kind: Articulation,
    pub placement: Option<Placement>,
}

impl ArticulationMark {
    pub fn new(kind: Articulation) -> Self {
        ArticulationMark { kind, placement: None }
    }
}

/// Ornament marks, children of `<ornaments>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ornament {
    TrillMark,
    Turn,
    InvertedTurn,
    Mordent,
    InvertedMordent,
    Tremolo,
}

impl Ornament {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Ornament::TrillMark => "trill-mark",
            Ornament::Turn => "turn",
            Ornament::InvertedTurn => "inverted-turn",
            Ornament::Mordent => "mordent",
            Ornament::InvertedMordent => "inverted-mordent",
            Ornament::Tremolo => "tremolo",
        }
    }
}

/// An ornament with optional placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrnamentMark {
    pub kind: Ornament,
    pub placement: Option<Placement>,
}

impl OrnamentMark {
    pub fn new(kind: Ornament) -> Self {
        OrnamentMark { kind, placement: None }
    }
}

/// Technical marks, children of `<technical>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technical {
    UpBow,
    DownBow,
    Harmonic,
    OpenString,
    Stopped,
    SnapPizzicato,
    /// Fingering digit, written as element text.
    Fingering(u8),
}

impl Technical {
    pub fn xml_name(&self) -> &'static str {
        match self {
            Technical::UpBow => "up-bow",
            Technical::DownBow => "down-bow",
            Technical::Harmonic => "harmonic",
            Technical::OpenString => "open-string",
            Technical::Stopped => "stopped",
            Technical::SnapPizzicato => "snap-pizzicato",
            Technical::Fingering(_) => "fingering",
        }
    }
}

/// A technical mark with optional placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalMark {
    pub kind: Technical,
    pub placement: Option<Placement>,
}

impl TechnicalMark {
    pub fn new(kind: Technical) -> Self {
        TechnicalMark { kind, placement: None }
    }
}

/// Beam state for one beam level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamState {
    Begin,
    Continue,
    End,
}

impl BeamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeamState::Begin => "begin",
            BeamState::Continue => "continue",
            BeamState::End => "end",
        }
    }
}

/// One beam level attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub number: u8,
    pub state: BeamState,
}

/// Stem direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StemDirection {
    Up,
    Down,
}

impl StemDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StemDirection::Up => "up",
            StemDirection::Down => "down",
        }
    }
}

/// Syllabic type for a lyric syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Syllabic {
    Single,
    Begin,
    Middle,
    End,
}

impl Syllabic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Syllabic::Single => "single",
            Syllabic::Begin => "begin",
            Syllabic::Middle => "middle",
            Syllabic::End => "end",
        }
    }
}

/// One lyric syllable attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyric {
    /// Verse number, 1-based.
    pub number: u32,
    pub syllabic: Syllabic,
    pub text: String,
}
