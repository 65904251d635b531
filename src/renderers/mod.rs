//! Output renderers. MusicXML is the only backend in this crate.

pub mod musicxml;
