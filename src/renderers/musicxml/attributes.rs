//! Attribute deduplication for clef, key, time and staff count.
//!
//! The engine remembers the part's last-emitted values and queues a new
//! `<attributes>` sub-tree only when a visited value differs, comparing by
//! value rather than identity. Simultaneous changes are coalesced into one
//! sub-tree with the fixed child order divisions, key, time, staves, clef(s).

use std::collections::HashMap;

use crate::models::{Clef, Key, TimeSignature};
use crate::xml::XmlElement;

/// Last-emitted values for one part, persisting across its measures.
#[derive(Debug, Clone, Default)]
struct AttributesSnapshot {
    divisions: Option<i32>,
    key: Option<Key>,
    time: Option<TimeSignature>,
    staves: Option<u8>,
    clefs: HashMap<u8, Clef>,
}

/// Changes queued for the next flush.
#[derive(Debug, Clone, Default)]
struct PendingAttributes {
    divisions: Option<i32>,
    key: Option<Key>,
    time: Option<TimeSignature>,
    staves: Option<u8>,
    /// Changed clefs in visitation order, keyed by staff number.
    clefs: Vec<(u8, Clef)>,
}

impl PendingAttributes {
    fn is_empty(&self) -> bool {
        self.divisions.is_none()
            && self.key.is_none()
            && self.time.is_none()
            && self.staves.is_none()
            && self.clefs.is_empty()
    }
}

/// Emits attributes sub-trees only on value change.
#[derive(Debug, Clone, Default)]
pub struct AttributeDeduplicator {
    snapshot: AttributesSnapshot,
    pending: PendingAttributes,
}

impl AttributeDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything at a part boundary.
    pub fn reset_part(&mut self) {
        *self = Self::default();
    }

    /// Queue the divisions value if it differs from the last-emitted one.
    pub fn consider_divisions(&mut self, divisions: i32) -> bool {
        if self.snapshot.divisions == Some(divisions) {
            return false;
        }
        self.snapshot.divisions = Some(divisions);
        self.pending.divisions = Some(divisions);
        true
    }

    /// Queue a clef for the staff if it differs from the last-emitted one.
    pub fn consider_clef(&mut self, staff: u8, clef: Clef) -> bool {
        if self.snapshot.clefs.get(&staff) == Some(&clef) {
            return false;
        }
        self.snapshot.clefs.insert(staff, clef);
        self.pending.clefs.retain(|(s, _)| *s != staff);
        self.pending.clefs.push((staff, clef));
        true
    }

    pub fn consider_key(&mut self, key: Key) -> bool {
        if self.snapshot.key == Some(key) {
            return false;
        }
        self.snapshot.key = Some(key);
        self.pending.key = Some(key);
        true
    }

    pub fn consider_time(&mut self, time: TimeSignature) -> bool {
        if self.snapshot.time == Some(time) {
            return false;
        }
        self.snapshot.time = Some(time);
        self.pending.time = Some(time);
        true
    }

    pub fn consider_staves(&mut self, staves: u8) -> bool {
        if self.snapshot.staves == Some(staves) {
            return false;
        }
        self.snapshot.staves = Some(staves);
        self.pending.staves = Some(staves);
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Build the coalesced `<attributes>` sub-tree from the queued changes,
    /// or `None` when nothing changed. Clears the queue.
    pub fn flush(&mut self) -> Option<XmlElement> {
        if self.pending.is_empty() {
            return None;
        }
        let pending = std::mem::take(&mut self.pending);
        let mut attributes = XmlElement::new("attributes");

        if let Some(divisions) = pending.divisions {
            attributes.append_child(XmlElement::new("divisions").with_text(divisions.to_string()));
        }
        if let Some(key) = pending.key {
            let mut key_el = XmlElement::new("key");
            key_el.append_child(XmlElement::new("fifths").with_text(key.fifths.to_string()));
            if let Some(mode) = key.mode {
                key_el.append_child(XmlElement::new("mode").with_text(mode.as_str()));
            }
            attributes.append_child(key_el);
        }
        if let Some(time) = pending.time {
            let mut time_el = XmlElement::new("time");
            time_el.append_child(XmlElement::new("beats").with_text(time.beats.to_string()));
            time_el.append_child(XmlElement::new("beat-type").with_text(time.beat_type.to_string()));
            attributes.append_child(time_el);
        }
        if let Some(staves) = pending.staves {
            attributes.append_child(XmlElement::new("staves").with_text(staves.to_string()));
        }
        let multi_staff = self.snapshot.clefs.len() > 1 || self.snapshot.staves.map_or(false, |s| s > 1);
        for (staff, clef) in pending.clefs {
            let mut clef_el = XmlElement::new("clef");
            if multi_staff {
                clef_el.set_attribute("number", staff.to_string());
            }
            clef_el.append_child(XmlElement::new("sign").with_text(clef.sign.as_str()));
            if let Some(line) = clef.line {
                clef_el.append_child(XmlElement::new("line").with_text(line.to_string()));
            }
            if let Some(change) = clef.octave_change {
                clef_el.append_child(
                    XmlElement::new("clef-octave-change").with_text(change.to_string()),
                );
            }
            attributes.append_child(clef_el);
        }
        Some(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClefSign, KeyMode};

    #[test]
    fn test_same_clef_twice_emits_once() {
        let mut dedup = AttributeDeduplicator::new();
        assert!(dedup.consider_clef(1, Clef::treble()));
        // Structurally identical clef from a different score node.
        assert!(!dedup.consider_clef(1, Clef::treble()));
        let flushed = dedup.flush().unwrap();
        assert_eq!(flushed.child_elements().filter(|e| e.tag() == "clef").count(), 1);
        assert!(dedup.flush().is_none());
    }

    #[test]
    fn test_different_clef_emits_again() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_clef(1, Clef::treble());
        dedup.flush();
        assert!(dedup.consider_clef(1, Clef::bass()));
        let flushed = dedup.flush().unwrap();
        assert_eq!(flushed.find_child("clef").unwrap().find_child("sign").unwrap().text(), "F");
    }

    #[test]
    fn test_coalesced_fixed_order() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_clef(1, Clef::treble());
        dedup.consider_key(Key::new(2));
        dedup.consider_time(TimeSignature::new(3, 4));
        dedup.consider_divisions(4);
        dedup.consider_staves(1);
        let flushed = dedup.flush().unwrap();
        let tags: Vec<&str> = flushed.child_elements().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["divisions", "key", "time", "staves", "clef"]);
    }

    #[test]
    fn test_key_mode_written_when_present() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_key(Key { fifths: -1, mode: Some(KeyMode::Minor) });
        let flushed = dedup.flush().unwrap();
        let key = flushed.find_child("key").unwrap();
        assert_eq!(key.find_child("fifths").unwrap().text(), "-1");
        assert_eq!(key.find_child("mode").unwrap().text(), "minor");
    }

    #[test]
    fn test_unchanged_values_never_requeued() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_key(Key::new(0));
        dedup.consider_time(TimeSignature::new(4, 4));
        dedup.flush();
        assert!(!dedup.consider_key(Key::new(0)));
        assert!(!dedup.consider_time(TimeSignature::new(4, 4)));
        assert!(!dedup.has_pending());
    }

    #[test]
    fn test_multi_staff_clefs_numbered() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_staves(2);
        dedup.consider_clef(1, Clef::treble());
        dedup.consider_clef(2, Clef::bass());
        let flushed = dedup.flush().unwrap();
        let clefs: Vec<&XmlElement> =
            flushed.child_elements().filter(|e| e.tag() == "clef").collect();
        assert_eq!(clefs.len(), 2);
        assert_eq!(clefs[0].attribute("number"), Some("1"));
        assert_eq!(clefs[1].attribute("number"), Some("2"));
        assert_eq!(clefs[1].find_child("sign").unwrap().text(), "F");
    }

    #[test]
    fn test_percussion_clef_without_line() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_clef(1, Clef { sign: ClefSign::Percussion, line: None, octave_change: None });
        let flushed = dedup.flush().unwrap();
        let clef = flushed.find_child("clef").unwrap();
        assert_eq!(clef.find_child("sign").unwrap().text(), "percussion");
        assert!(clef.find_child("line").is_none());
    }

    #[test]
    fn test_reset_part_clears_snapshot() {
        let mut dedup = AttributeDeduplicator::new();
        dedup.consider_clef(1, Clef::treble());
        dedup.flush();
        dedup.reset_part();
        assert!(dedup.consider_clef(1, Clef::treble()));
    }
}
