//! The tree assembler: drives the component pipeline against the traversal
//! event stream and builds the output document.
//!
//! One assembler instance owns one translation run. All mutable state is
//! re-initialized per part and per measure; nothing leaks across runs.

use log::{debug, warn};

use crate::models::{
    Barline, Direction, DirectionContent, Measure, MeasureEvent, Note, Part, Rational, Score,
    ScoreEvent,
};
use crate::xml::{write_document, XmlElement};

use super::attributes::AttributeDeduplicator;
use super::divisions::DivisionsGrid;
use super::errors::{Diagnostic, DiagnosticKind, TranslateError};
use super::note::build_note;
use super::position::PositionTracker;
use super::sync::{Correction, SynchronizationEngine};

/// Immutable configuration for one translation run.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Version attribute written on `<score-partwise>`.
    pub musicxml_version: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            musicxml_version: "3.1".to_string(),
        }
    }
}

/// Result of a successful translation run.
#[derive(Debug, Clone)]
pub struct Translation {
    /// The `<score-partwise>` document root.
    pub root: XmlElement,
    /// Recoverable conditions recorded along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    /// Serialize to the complete document text, declaration and DOCTYPE included.
    pub fn to_xml(&self) -> String {
        write_document(&self.root)
    }
}

/// Translate a score into a MusicXML document tree.
///
/// Fatal errors ([`TranslateError`]) abort the whole run; no partial document
/// is returned. Unmapped constructs are recorded as diagnostics and marked in
/// the output instead.
pub fn translate_score(
    score: &Score,
    options: &TranslateOptions,
) -> Result<Translation, TranslateError> {
    let mut assembler = TreeAssembler::new(options.clone());
    crate::models::traverse(score, |event| assembler.handle(event))?;
    Ok(assembler.finish())
}

/// Orchestrates divisions, position tracking, synchronization, attribute
/// deduplication and notations assembly against the incoming event stream.
pub struct TreeAssembler {
    root: XmlElement,
    part_el: Option<XmlElement>,
    measure_el: Option<XmlElement>,
    grid: Option<DivisionsGrid>,
    tracker: PositionTracker,
    sync: SynchronizationEngine,
    dedup: AttributeDeduplicator,
    diagnostics: Vec<Diagnostic>,
    measure_number: u32,
    part_staves: u8,
    attributes_flushed: bool,
}

impl TreeAssembler {
    pub fn new(options: TranslateOptions) -> Self {
        let root = XmlElement::new("score-partwise")
            .with_attribute("version", options.musicxml_version);
        TreeAssembler {
            root,
            part_el: None,
            measure_el: None,
            grid: None,
            tracker: PositionTracker::new(),
            sync: SynchronizationEngine::new(),
            dedup: AttributeDeduplicator::new(),
            diagnostics: Vec::new(),
            measure_number: 0,
            part_staves: 1,
            attributes_flushed: false,
        }
    }

    /// Consume one traversal event.
    pub fn handle(&mut self, event: ScoreEvent<'_>) -> Result<(), TranslateError> {
        match event {
            ScoreEvent::EnterScore(score) => {
                self.enter_score(score);
                Ok(())
            }
            ScoreEvent::LeaveScore => Ok(()),
            ScoreEvent::EnterPart(part) => {
                self.enter_part(part);
                Ok(())
            }
            ScoreEvent::LeavePart => {
                if let Some(part_el) = self.part_el.take() {
                    self.root.append_child(part_el);
                }
                Ok(())
            }
            ScoreEvent::EnterMeasure(measure) => {
                self.enter_measure(measure);
                Ok(())
            }
            ScoreEvent::LeaveMeasure => self.leave_measure(),
            ScoreEvent::Event(event) => self.handle_measure_event(event),
        }
    }

    /// Finish the run and hand over the document and diagnostics.
    pub fn finish(self) -> Translation {
        Translation {
            root: self.root,
            diagnostics: self.diagnostics,
        }
    }

    fn enter_score(&mut self, score: &Score) {
        if let Some(title) = &score.title {
            if !title.is_empty() {
                self.root
                    .append_child(XmlElement::new("movement-title").with_text(title.clone()));
            }
        }
        let mut part_list = XmlElement::new("part-list");
        for part in &score.parts {
            let mut score_part = XmlElement::new("score-part").with_attribute("id", part.id.clone());
            score_part.append_child(XmlElement::new("part-name").with_text(part.name.clone()));
            part_list.append_child(score_part);
        }
        self.root.append_child(part_list);
    }

    fn enter_part(&mut self, part: &Part) {
        let (grid, degraded) = DivisionsGrid::for_part(part);
        debug!(
            "part {}: divisions {} factor {}",
            part.id,
            grid.divisions_per_quarter(),
            grid.multiplying_factor()
        );
        if degraded {
            let detail = format!(
                "part {}: shortest note does not divide the quarter note; using factor {}",
                part.id,
                grid.multiplying_factor()
            );
            warn!("{}", detail);
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::DegradedDivisions,
                measure: 0,
                detail,
            });
        }
        self.grid = Some(grid);
        self.dedup.reset_part();
        self.part_staves = part_staff_count(part);
        self.part_el = Some(XmlElement::new("part").with_attribute("id", part.id.clone()));
    }

    fn enter_measure(&mut self, measure: &Measure) {
        self.measure_number = measure.number;
        self.tracker.reset_measure();
        self.sync.reset_measure();
        self.attributes_flushed = false;

        let mut measure_el =
            XmlElement::new("measure").with_attribute("number", measure.number.to_string());
        if measure.new_system {
            measure_el.append_child(XmlElement::new("print").with_attribute("new-system", "yes"));
        }
        self.measure_el = Some(measure_el);

        // Divisions and staff count are re-considered each measure; the
        // snapshot suppresses them unless they actually changed.
        if let Some(grid) = &self.grid {
            self.dedup.consider_divisions(grid.divisions_per_quarter());
        }
        if self.part_staves > 1 {
            self.dedup.consider_staves(self.part_staves);
        }
    }

    fn leave_measure(&mut self) -> Result<(), TranslateError> {
        // A measure holding only attribute changes still gets its flush.
        self.flush_attributes()?;
        if let (Some(measure_el), Some(part_el)) = (self.measure_el.take(), self.part_el.as_mut()) {
            part_el.append_child(measure_el);
        }
        Ok(())
    }

    fn handle_measure_event(&mut self, event: &MeasureEvent) -> Result<(), TranslateError> {
        match event {
            MeasureEvent::Clef { staff, clef } => {
                self.dedup.consider_clef(*staff, *clef);
                Ok(())
            }
            MeasureEvent::Key(key) => {
                self.dedup.consider_key(*key);
                Ok(())
            }
            MeasureEvent::Time(time) => {
                self.dedup.consider_time(*time);
                Ok(())
            }
            MeasureEvent::Staves(staves) => {
                self.part_staves = self.part_staves.max(*staves);
                self.dedup.consider_staves(*staves);
                Ok(())
            }
            MeasureEvent::Note(note) => self.handle_note(note),
            MeasureEvent::Skip { staff, voice, duration } => {
                self.tracker.record_skip((*staff, *voice), *duration);
                Ok(())
            }
            MeasureEvent::Direction(direction) => {
                self.flush_attributes()?;
                let el = build_direction(direction);
                self.append_to_measure(el)
            }
            MeasureEvent::Barline(barline) => {
                self.flush_attributes()?;
                let el = build_barline(barline);
                self.append_to_measure(el)
            }
            MeasureEvent::Unsupported { kind } => {
                let detail = format!("no MusicXML mapping for {}", kind);
                warn!("measure {}: {}", self.measure_number, detail);
                self.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::UnmappedConstruct,
                    measure: self.measure_number,
                    detail,
                });
                if let Some(measure_el) = self.measure_el.as_mut() {
                    measure_el.append_comment(format!("unmapped: {}", kind));
                }
                Ok(())
            }
        }
    }

    fn handle_note(&mut self, note: &Note) -> Result<(), TranslateError> {
        self.flush_attributes()?;
        let emit_staff = self.part_staves > 1;

        if note.grace.is_some() {
            // Grace notes carry no duration and never move the cursor.
            let (el, warning) = build_note(note, None, emit_staff);
            self.record_note_warning(warning);
            return self.append_to_measure(el);
        }

        let divs = self.to_divisions(note.duration, note.staff, note.voice)?;

        if note.chord {
            // Chord members share the first note's position; no correction,
            // no advance.
            let (el, warning) = build_note(note, Some(divs), emit_staff);
            self.record_note_warning(warning);
            return self.append_to_measure(el);
        }

        let (corrections, start) =
            self.sync
                .prepare(&mut self.tracker, note.staff, note.voice, note.onset);
        for correction in corrections {
            let (tag, amount) = match correction {
                Correction::Backup(amount) => ("backup", amount),
                Correction::Forward(amount) => ("forward", amount),
            };
            let amount_divs = self.to_divisions(amount, note.staff, note.voice)?;
            // A zero amount is a no-op, never an empty element.
            if amount_divs > 0 {
                let mut el = XmlElement::new(tag);
                el.append_child(XmlElement::new("duration").with_text(amount_divs.to_string()));
                self.append_to_measure(el)?;
            }
        }

        let (el, warning) = build_note(note, Some(divs), emit_staff);
        self.record_note_warning(warning);
        self.append_to_measure(el)?;
        self.sync
            .note_emitted(&mut self.tracker, note.staff, note.voice, start, note.duration);
        Ok(())
    }

    fn to_divisions(
        &self,
        duration: Rational,
        staff: u8,
        voice: u8,
    ) -> Result<i32, TranslateError> {
        match &self.grid {
            Some(grid) => grid.to_divisions(duration, self.measure_number, staff, voice),
            None => Err(TranslateError::StructuralViolation {
                measure: self.measure_number,
                detail: "note outside of any part".to_string(),
            }),
        }
    }

    fn flush_attributes(&mut self) -> Result<(), TranslateError> {
        if !self.dedup.has_pending() {
            return Ok(());
        }
        if self.attributes_flushed {
            return Err(TranslateError::StructuralViolation {
                measure: self.measure_number,
                detail: "duplicate attributes flush within the same measure".to_string(),
            });
        }
        if let Some(attributes) = self.dedup.flush() {
            self.append_to_measure(attributes)?;
            self.attributes_flushed = true;
        }
        Ok(())
    }

    fn append_to_measure(&mut self, el: XmlElement) -> Result<(), TranslateError> {
        match self.measure_el.as_mut() {
            Some(measure_el) => {
                measure_el.append_child(el);
                Ok(())
            }
            None => Err(TranslateError::StructuralViolation {
                measure: self.measure_number,
                detail: "content emitted outside of any measure".to_string(),
            }),
        }
    }

    fn record_note_warning(&mut self, warning: Option<String>) {
        if let Some(detail) = warning {
            warn!("measure {}: {}", self.measure_number, detail);
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::UnmappedConstruct,
                measure: self.measure_number,
                detail,
            });
        }
    }
}

fn part_staff_count(part: &Part) -> u8 {
    let mut staves = 1u8;
    for measure in &part.measures {
        for event in &measure.events {
            let staff = match event {
                MeasureEvent::Staves(n) => *n,
                MeasureEvent::Clef { staff, .. } => *staff,
                MeasureEvent::Note(note) => note.staff,
                MeasureEvent::Skip { staff, .. } => *staff,
                _ => continue,
            };
            staves = staves.max(staff);
        }
    }
    staves
}

fn build_direction(direction: &Direction) -> XmlElement {
    let mut el = XmlElement::new("direction");
    if let Some(placement) = direction.placement {
        el.set_attribute("placement", placement.as_str());
    }
    let mut direction_type = XmlElement::new("direction-type");
    match &direction.content {
        DirectionContent::Words(text) => {
            direction_type.append_child(XmlElement::new("words").with_text(text.clone()));
        }
        DirectionContent::Dynamics(mark) => {
            let mut dynamics = XmlElement::new("dynamics");
            dynamics.append_child(XmlElement::new(mark.clone()));
            direction_type.append_child(dynamics);
        }
    }
    el.append_child(direction_type);
    if let Some(staff) = direction.staff {
        el.append_child(XmlElement::new("staff").with_text(staff.to_string()));
    }
    el
}

fn build_barline(barline: &Barline) -> XmlElement {
    let mut el = XmlElement::new("barline").with_attribute("location", "right");
    el.append_child(XmlElement::new("bar-style").with_text(barline.style.as_str()));
    el
}
