//! Building the `<note>` element and its fixed sub-element order.
//!
//! Sub-order (when applicable): chord, grace, pitch-or-rest, duration,
//! tie(s), voice, type, dot(s), accidental, time-modification, stem, staff,
//! beam(s), notations, lyric(s). This order is required for schema validity
//! and must never vary.

use crate::models::{Note, NoteContent};
use crate::xml::XmlElement;

use super::duration::{display_duration, note_type_for};
use super::notations::NotationsAssembler;

/// Build the `<note>` element.
///
/// `duration_divs` is `None` for grace notes, which carry no `<duration>`.
/// `emit_staff` is set for multi-staff parts. Returns the element plus an
/// optional warning detail when the written duration has no graphic note
/// type (the `<type>` element is then omitted, which is valid MusicXML).
pub fn build_note(
    note: &Note,
    duration_divs: Option<i32>,
    emit_staff: bool,
) -> (XmlElement, Option<String>) {
    let mut el = XmlElement::new("note");
    let mut warning = None;

    if note.chord {
        el.append_child(XmlElement::new("chord"));
    }
    if let Some(grace) = &note.grace {
        let mut grace_el = XmlElement::new("grace");
        if grace.slash {
            grace_el.set_attribute("slash", "yes");
        }
        el.append_child(grace_el);
    }

    match &note.content {
        NoteContent::Pitched(pitch) => {
            let mut pitch_el = XmlElement::new("pitch");
            pitch_el.append_child(XmlElement::new("step").with_text(pitch.step.as_str()));
            if pitch.alter != 0 {
                pitch_el.append_child(XmlElement::new("alter").with_text(pitch.alter.to_string()));
            }
            pitch_el.append_child(XmlElement::new("octave").with_text(pitch.octave.to_string()));
            el.append_child(pitch_el);
        }
        NoteContent::Rest { measure_rest } => {
            let mut rest = XmlElement::new("rest");
            if *measure_rest {
                rest.set_attribute("measure", "yes");
            }
            el.append_child(rest);
        }
    }

    if let Some(divs) = duration_divs {
        el.append_child(XmlElement::new("duration").with_text(divs.to_string()));
    }

    for tie in &note.ties {
        el.append_child(XmlElement::new("tie").with_attribute("type", tie.kind.as_str()));
    }

    el.append_child(XmlElement::new("voice").with_text(note.voice.to_string()));

    let written = display_duration(note.duration, note.tuplet.as_ref());
    match note_type_for(written) {
        Some((type_name, dots)) => {
            el.append_child(XmlElement::new("type").with_text(type_name));
            for _ in 0..dots {
                el.append_child(XmlElement::new("dot"));
            }
        }
        None if note.grace.is_none() && !is_measure_rest(note) => {
            warning = Some(format!("duration {} has no graphic note type", written));
        }
        None => {}
    }

    if let Some(accidental) = &note.accidental {
        el.append_child(XmlElement::new("accidental").with_text(accidental.xml_name()));
    }

    if let Some(tuplet) = &note.tuplet {
        let mut tm = XmlElement::new("time-modification");
        tm.append_child(XmlElement::new("actual-notes").with_text(tuplet.actual_notes.to_string()));
        tm.append_child(XmlElement::new("normal-notes").with_text(tuplet.normal_notes.to_string()));
        el.append_child(tm);
    }

    if let Some(stem) = &note.stem {
        el.append_child(XmlElement::new("stem").with_text(stem.as_str()));
    }

    if emit_staff {
        el.append_child(XmlElement::new("staff").with_text(note.staff.to_string()));
    }

    for beam in &note.beams {
        el.append_child(
            XmlElement::new("beam")
                .with_attribute("number", beam.number.to_string())
                .with_text(beam.state.as_str()),
        );
    }

    let mut bag = NotationsAssembler::new();
    for tie in &note.ties {
        bag.push_tied(tie.kind, tie.placement);
    }
    for slur in &note.slurs {
        bag.push_slur(*slur);
    }
    if let Some(tuplet) = &note.tuplet {
        bag.set_tuplet(tuplet);
    }
    for mark in &note.ornaments {
        bag.push_ornament(*mark);
    }
    for mark in &note.technicals {
        bag.push_technical(*mark);
    }
    for mark in &note.articulations {
        bag.push_articulation(*mark);
    }
    if let Some(notations) = bag.assemble() {
        el.append_child(notations);
    }

    for lyric in &note.lyrics {
        let mut lyric_el =
            XmlElement::new("lyric").with_attribute("number", lyric.number.to_string());
        lyric_el.append_child(XmlElement::new("syllabic").with_text(lyric.syllabic.as_str()));
        lyric_el.append_child(XmlElement::new("text").with_text(lyric.text.clone()));
        el.append_child(lyric_el);
    }

    (el, warning)
}

fn is_measure_rest(note: &Note) -> bool {
    matches!(note.content, NoteContent::Rest { measure_rest: true })
}
