//! Score-model value types consumed by the translation engine.
//!
//! Everything here is read-only from the engine's point of view: the engine
//! walks these values through the [`score::traverse`] event stream and never
//! mutates them.

pub mod notation;
pub mod pitch;
pub mod score;

/// Exact rational used for all musical durations, in whole-note units.
pub type Rational = num_rational::Rational32;

pub use notation::*;
pub use pitch::*;
pub use score::*;
