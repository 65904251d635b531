//! Error taxonomy for the translation engine.
//!
//! Two conditions are fatal and unwind the whole run: a duration that fails
//! to rationalize to an integral divisions count, and a broken internal
//! invariant. Unmapped constructs are the only recoverable condition; they
//! are collected as diagnostics on the translation result instead of
//! unwinding.

use thiserror::Error;

use crate::models::Rational;

/// Fatal translation errors. No partial document survives one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    /// A duration does not map onto the part's divisions grid.
    #[error(
        "measure {measure}, staff {staff}, voice {voice}: duration {value} \
         does not rationalize to an integral divisions count"
    )]
    ArithmeticInconsistency {
        measure: u32,
        staff: u8,
        voice: u8,
        value: Rational,
    },

    /// An internal invariant broke; a programming-logic error, not a data error.
    #[error("structural violation in measure {measure}: {detail}")]
    StructuralViolation { measure: u32, detail: String },
}

/// Category of a recoverable diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A score-model construct with no MusicXML mapping; a placeholder
    /// comment was emitted in its place.
    UnmappedConstruct,
    /// The part's shortest note does not divide the quarter note integrally;
    /// translation continued on a degraded grid.
    DegradedDivisions,
}

/// One recoverable condition recorded during a translation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Measure number the condition was observed in; 0 when part-level.
    pub measure: u32,
    pub detail: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::UnmappedConstruct => "unmapped construct",
            DiagnosticKind::DegradedDivisions => "degraded divisions",
        };
        if self.measure == 0 {
            write!(f, "{}: {}", kind, self.detail)
        } else {
            write!(f, "measure {}: {}: {}", self.measure, kind, self.detail)
        }
    }
}
