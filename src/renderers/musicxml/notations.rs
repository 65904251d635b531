//! Assembly of the per-note `<notations>` sub-tree.
//!
//! An ephemeral bag collects tie, slur, tuplet, ornament, articulation and
//! technical marks while a note is visited, then flushes them as one
//! `<notations>` element in the schema's fixed order: tied, slur(s), tuplet,
//! ornaments, technical, articulations. An empty bag produces no element at
//! all.

use crate::models::{
    ArticulationMark, OrnamentMark, Placement, Slur, StartStopContinue, Technical, TechnicalMark,
    TupletBoundary, TupletMembership,
};
use crate::xml::XmlElement;

/// Per-note collector for notation sub-trees.
#[derive(Debug, Clone, Default)]
pub struct NotationsAssembler {
    tied: Vec<(StartStopContinue, Option<Placement>)>,
    slurs: Vec<Slur>,
    tuplet: Option<(TupletBoundary, Option<Placement>)>,
    ornaments: Vec<OrnamentMark>,
    articulations: Vec<ArticulationMark>,
    technicals: Vec<TechnicalMark>,
}

impl NotationsAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_tied(&mut self, kind: StartStopContinue, placement: Option<Placement>) {
        self.tied.push((kind, placement));
    }

    pub fn push_slur(&mut self, slur: Slur) {
        self.slurs.push(slur);
    }

    /// Record the tuplet bracket boundary, if this note carries one.
    pub fn set_tuplet(&mut self, tuplet: &TupletMembership) {
        if let Some(boundary) = tuplet.boundary {
            self.tuplet = Some((boundary, tuplet.placement));
        }
    }

    pub fn push_ornament(&mut self, mark: OrnamentMark) {
        self.ornaments.push(mark);
    }

    pub fn push_articulation(&mut self, mark: ArticulationMark) {
        self.articulations.push(mark);
    }

    pub fn push_technical(&mut self, mark: TechnicalMark) {
        self.technicals.push(mark);
    }

    pub fn is_empty(&self) -> bool {
        self.tied.is_empty()
            && self.slurs.is_empty()
            && self.tuplet.is_none()
            && self.ornaments.is_empty()
            && self.articulations.is_empty()
            && self.technicals.is_empty()
    }

    /// Build the `<notations>` element, or `None` when the bag is empty.
    pub fn assemble(self) -> Option<XmlElement> {
        if self.is_empty() {
            return None;
        }
        let mut notations = XmlElement::new("notations");

        for (kind, placement) in self.tied {
            let mut tied = XmlElement::new("tied").with_attribute("type", kind.as_str());
            apply_placement(&mut tied, placement);
            notations.append_child(tied);
        }
        for slur in self.slurs {
            let mut el = XmlElement::new("slur")
                .with_attribute("type", slur.kind.as_str())
                .with_attribute("number", slur.number.to_string());
            apply_placement(&mut el, slur.placement);
            notations.append_child(el);
        }
        if let Some((boundary, placement)) = self.tuplet {
            let mut el = XmlElement::new("tuplet")
                .with_attribute("type", boundary.as_str())
                .with_attribute("bracket", "yes")
                .with_attribute("number", "1");
            apply_placement(&mut el, placement);
            notations.append_child(el);
        }
        if !self.ornaments.is_empty() {
            let mut group = XmlElement::new("ornaments");
            for mark in self.ornaments {
                let mut el = XmlElement::new(mark.kind.xml_name());
                apply_placement(&mut el, mark.placement);
                group.append_child(el);
            }
            notations.append_child(group);
        }
        if !self.technicals.is_empty() {
            let mut group = XmlElement::new("technical");
            for mark in self.technicals {
                let mut el = XmlElement::new(mark.kind.xml_name());
                if let Technical::Fingering(digit) = mark.kind {
                    el.append_text(digit.to_string());
                }
                apply_placement(&mut el, mark.placement);
                group.append_child(el);
            }
            notations.append_child(group);
        }
        if !self.articulations.is_empty() {
            let mut group = XmlElement::new("articulations");
            for mark in self.articulations {
                let mut el = XmlElement::new(mark.kind.xml_name());
                apply_placement(&mut el, mark.placement);
                group.append_child(el);
            }
            notations.append_child(group);
        }
        Some(notations)
    }
}

fn apply_placement(el: &mut XmlElement, placement: Option<Placement>) {
    if let Some(p) = placement {
        el.set_attribute("placement", p.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Articulation, Ornament};

    #[test]
    fn test_empty_bag_produces_no_element() {
        assert!(NotationsAssembler::new().assemble().is_none());
    }

    #[test]
    fn test_fixed_assembly_order() {
        let mut bag = NotationsAssembler::new();
        bag.push_articulation(ArticulationMark::new(Articulation::Staccato));
        bag.push_slur(Slur::new(1, StartStopContinue::Stop));
        bag.push_tied(StartStopContinue::Stop, None);
        let notations = bag.assemble().unwrap();
        let tags: Vec<&str> = notations.child_elements().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["tied", "slur", "articulations"]);
    }

    #[test]
    fn test_full_order_with_all_groups() {
        let mut bag = NotationsAssembler::new();
        bag.push_technical(TechnicalMark::new(Technical::UpBow));
        bag.push_ornament(OrnamentMark::new(Ornament::TrillMark));
        let mut tuplet = TupletMembership::new(3, 2);
        tuplet.boundary = Some(TupletBoundary::Start);
        bag.set_tuplet(&tuplet);
        bag.push_articulation(ArticulationMark::new(Articulation::Accent));
        bag.push_slur(Slur::new(1, StartStopContinue::Start));
        bag.push_tied(StartStopContinue::Start, None);
        let notations = bag.assemble().unwrap();
        let tags: Vec<&str> = notations.child_elements().map(|e| e.tag()).collect();
        assert_eq!(
            tags,
            vec!["tied", "slur", "tuplet", "ornaments", "technical", "articulations"]
        );
    }

    #[test]
    fn test_tuplet_without_boundary_is_ignored() {
        let mut bag = NotationsAssembler::new();
        bag.set_tuplet(&TupletMembership::new(3, 2));
        assert!(bag.assemble().is_none());
    }

    #[test]
    fn test_placement_omitted_when_unspecified() {
        let mut bag = NotationsAssembler::new();
        bag.push_articulation(ArticulationMark::new(Articulation::Tenuto));
        let notations = bag.assemble().unwrap();
        let tenuto = notations.find_child("articulations").unwrap().find_child("tenuto").unwrap();
        assert!(tenuto.attribute("placement").is_none());
    }

    #[test]
    fn test_placement_written_when_present() {
        let mut bag = NotationsAssembler::new();
        bag.push_ornament(OrnamentMark {
            kind: Ornament::Mordent,
            placement: Some(Placement::Above),
        });
        let notations = bag.assemble().unwrap();
        let mordent = notations.find_child("ornaments").unwrap().find_child("mordent").unwrap();
        assert_eq!(mordent.attribute("placement"), Some("above"));
    }

    #[test]
    fn test_fingering_carries_digit_text() {
        let mut bag = NotationsAssembler::new();
        bag.push_technical(TechnicalMark::new(Technical::Fingering(3)));
        let notations = bag.assemble().unwrap();
        let fingering = notations.find_child("technical").unwrap().find_child("fingering").unwrap();
        assert_eq!(fingering.text(), "3");
    }

    #[test]
    fn test_multiple_slurs_kept_in_order() {
        let mut bag = NotationsAssembler::new();
        bag.push_slur(Slur::new(1, StartStopContinue::Stop));
        bag.push_slur(Slur::new(2, StartStopContinue::Start));
        let notations = bag.assemble().unwrap();
        let slurs: Vec<&XmlElement> =
            notations.child_elements().filter(|e| e.tag() == "slur").collect();
        assert_eq!(slurs[0].attribute("number"), Some("1"));
        assert_eq!(slurs[0].attribute("type"), Some("stop"));
        assert_eq!(slurs[1].attribute("number"), Some("2"));
        assert_eq!(slurs[1].attribute("type"), Some("start"));
    }
}
