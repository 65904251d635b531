//! Score-model to MusicXML translation engine.
//!
//! This crate walks an in-memory hierarchical score model (parts, measures,
//! voices, notes and their attached musical semantics) and emits a MusicXML
//! partwise document tree, handling the divisions arithmetic, the
//! backup/forward synchronization of simultaneous voices and staves, the
//! deduplication of clef/key/time attributes, and the strict element ordering
//! the schema requires.
//!
//! ```
//! use scorexml::models::{Measure, MeasureEvent, Note, Part, Pitch, Rational, Score, Step};
//! use scorexml::{translate_score, TranslateOptions};
//!
//! let mut part = Part::new("P1", "Flute");
//! let mut measure = Measure::new(1);
//! measure.events.push(MeasureEvent::Note(Note::pitched(
//!     Pitch::new(Step::C, 0, 4),
//!     Rational::new(1, 4),
//! )));
//! part.measures.push(measure);
//! let score = Score { title: None, parts: vec![part] };
//!
//! let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
//! assert!(translation.to_xml().contains("<step>C</step>"));
//! ```

pub mod models;
pub mod renderers;
pub mod xml;

pub use renderers::musicxml::{
    translate_score, Diagnostic, DiagnosticKind, TranslateError, TranslateOptions, Translation,
};
