//! MusicXML translation engine.
//!
//! Converts the in-memory score model into a MusicXML 3.1 partwise document
//! tree. The pipeline, leaves first:
//!
//! - **duration**: exact rational duration arithmetic and `<type>` mapping
//! - **divisions**: the per-part divisions-per-quarter-note grid
//! - **position**: per-(staff, voice) cursor tracking within a measure
//! - **sync**: backup/forward correction decisions across voices and staves
//! - **attributes**: clef/key/time/staves deduplication
//! - **notations**: assembly of the nested `<notations>` sub-tree
//! - **note**: the `<note>` element and its fixed sub-element order
//! - **assembler**: orchestration against the traversal event stream
//! - **errors**: the fatal/recoverable error taxonomy

pub mod assembler;
pub mod attributes;
pub mod divisions;
pub mod duration;
pub mod errors;
pub mod notations;
pub mod note;
pub mod position;
pub mod sync;

pub use assembler::{translate_score, TranslateOptions, Translation, TreeAssembler};
pub use attributes::AttributeDeduplicator;
pub use divisions::DivisionsGrid;
pub use errors::{Diagnostic, DiagnosticKind, TranslateError};
pub use notations::NotationsAssembler;
pub use position::{PositionTracker, VoiceKey};
pub use sync::{Correction, SynchronizationEngine};
