use pretty_assertions::assert_eq;

use scorexml::models::{
    BarStyle, Barline, Direction, DirectionContent, Grace, Lyric, Measure, MeasureEvent, Note,
    Part, Pitch, Placement, Rational, Score, Step, Syllabic, TimeSignature,
};
use scorexml::{translate_score, TranslateOptions};

fn frac(n: i32, d: i32) -> Rational {
    Rational::new(n, d)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_complete_document_text() {
    init_logging();
    let mut part = Part::new("P1", "Voice");
    let mut measure = Measure::new(1);
    measure.events.push(MeasureEvent::Time(TimeSignature::new(4, 4)));
    measure.events.push(MeasureEvent::Note(Note::pitched(
        Pitch::new(Step::C, 0, 4),
        frac(1, 4),
    )));
    measure.events.push(MeasureEvent::Note(Note::pitched(
        Pitch::new(Step::D, 0, 4),
        frac(1, 4),
    )));
    part.measures.push(measure);
    let score = Score {
        title: Some("Test Song".to_string()),
        parts: vec![part],
    };

    let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
    let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">
<score-partwise version=\"3.1\">
  <movement-title>Test Song</movement-title>
  <part-list>
    <score-part id=\"P1\">
      <part-name>Voice</part-name>
    </score-part>
  </part-list>
  <part id=\"P1\">
    <measure number=\"1\">
      <attributes>
        <divisions>1</divisions>
        <time>
          <beats>4</beats>
          <beat-type>4</beat-type>
        </time>
      </attributes>
      <note>
        <pitch>
          <step>C</step>
          <octave>4</octave>
        </pitch>
        <duration>1</duration>
        <voice>1</voice>
        <type>quarter</type>
      </note>
      <note>
        <pitch>
          <step>D</step>
          <octave>4</octave>
        </pitch>
        <duration>1</duration>
        <voice>1</voice>
        <type>quarter</type>
      </note>
    </measure>
  </part>
</score-partwise>
";
    assert_eq!(translation.to_xml(), expected);
    assert!(translation.diagnostics.is_empty());
}

#[test]
fn test_untitled_score_omits_movement_title() {
    let mut part = Part::new("P1", "Music");
    let mut measure = Measure::new(1);
    measure.events.push(MeasureEvent::Note(Note::pitched(
        Pitch::new(Step::C, 0, 4),
        frac(1, 4),
    )));
    part.measures.push(measure);
    let score = Score { title: None, parts: vec![part] };
    let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
    assert!(!translation.to_xml().contains("movement-title"));
}

#[test]
fn test_multi_part_document_order() {
    let mut score = Score::default();
    for (id, name) in [("P1", "Flute"), ("P2", "Cello")] {
        let mut part = Part::new(id, name);
        let mut measure = Measure::new(1);
        measure.events.push(MeasureEvent::Note(Note::pitched(
            Pitch::new(Step::C, 0, 4),
            frac(1, 4),
        )));
        part.measures.push(measure);
        score.parts.push(part);
    }
    let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
    let root = &translation.root;

    let part_list = root.find_child("part-list").unwrap();
    let ids: Vec<&str> = part_list
        .child_elements()
        .filter_map(|e| e.attribute("id"))
        .collect();
    assert_eq!(ids, vec!["P1", "P2"]);

    // Part bodies follow the part-list, in declaration order.
    let body_ids: Vec<&str> = root
        .child_elements()
        .filter(|e| e.tag() == "part")
        .filter_map(|e| e.attribute("id"))
        .collect();
    assert_eq!(body_ids, vec!["P1", "P2"]);
}

#[test]
fn test_grace_lyric_direction_and_barline() {
    init_logging();
    let mut part = Part::new("P1", "Voice");
    let mut measure = Measure::new(1);

    measure.events.push(MeasureEvent::Direction(Direction {
        content: DirectionContent::Dynamics("mf".to_string()),
        placement: Some(Placement::Below),
        staff: None,
    }));

    let mut grace = Note::pitched(Pitch::new(Step::B, 0, 4), frac(1, 16));
    grace.grace = Some(Grace { slash: true });
    measure.events.push(MeasureEvent::Note(grace));

    let mut sung = Note::pitched(Pitch::new(Step::C, 0, 5), frac(1, 4));
    sung.lyrics.push(Lyric {
        number: 1,
        syllabic: Syllabic::Begin,
        text: "glo".to_string(),
    });
    measure.events.push(MeasureEvent::Note(sung));

    measure
        .events
        .push(MeasureEvent::Barline(Barline { style: BarStyle::LightHeavy }));

    part.measures.push(measure);
    let score = Score { title: None, parts: vec![part] };
    let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
    let measure_el = translation
        .root
        .find_child("part")
        .unwrap()
        .find_child("measure")
        .unwrap();

    let tags: Vec<&str> = measure_el.child_elements().map(|e| e.tag()).collect();
    assert_eq!(tags, vec!["attributes", "direction", "note", "note", "barline"]);

    let direction = measure_el.find_child("direction").unwrap();
    assert_eq!(direction.attribute("placement"), Some("below"));
    assert!(direction
        .find_child("direction-type")
        .unwrap()
        .find_child("dynamics")
        .unwrap()
        .find_child("mf")
        .is_some());

    let notes: Vec<_> = measure_el.child_elements().filter(|e| e.tag() == "note").collect();
    assert_eq!(notes[0].find_child("grace").unwrap().attribute("slash"), Some("yes"));
    assert!(notes[0].find_child("duration").is_none());

    let lyric = notes[1].find_child("lyric").unwrap();
    assert_eq!(lyric.attribute("number"), Some("1"));
    assert_eq!(lyric.find_child("syllabic").unwrap().text(), "begin");
    assert_eq!(lyric.find_child("text").unwrap().text(), "glo");

    let barline = measure_el.find_child("barline").unwrap();
    assert_eq!(barline.attribute("location"), Some("right"));
    assert_eq!(barline.find_child("bar-style").unwrap().text(), "light-heavy");
}

#[test]
fn test_custom_version_attribute() {
    let mut part = Part::new("P1", "Music");
    let mut measure = Measure::new(1);
    measure.events.push(MeasureEvent::Note(Note::pitched(
        Pitch::new(Step::C, 0, 4),
        frac(1, 4),
    )));
    part.measures.push(measure);
    let score = Score { title: None, parts: vec![part] };
    let options = TranslateOptions {
        musicxml_version: "4.0".to_string(),
    };
    let translation = translate_score(&score, &options).unwrap();
    assert_eq!(translation.root.attribute("version"), Some("4.0"));
}

#[test]
fn test_system_break_emits_print() {
    let mut part = Part::new("P1", "Music");
    for number in 1..=2 {
        let mut measure = Measure::new(number);
        measure.new_system = number == 2;
        measure.events.push(MeasureEvent::Note(Note::pitched(
            Pitch::new(Step::C, 0, 4),
            frac(1, 4),
        )));
        part.measures.push(measure);
    }
    let score = Score { title: None, parts: vec![part] };
    let translation = translate_score(&score, &TranslateOptions::default()).unwrap();
    let measures: Vec<_> = translation
        .root
        .find_child("part")
        .unwrap()
        .child_elements()
        .filter(|e| e.tag() == "measure")
        .collect();
    assert!(measures[0].find_child("print").is_none());
    let print = measures[1].find_child("print").unwrap();
    assert_eq!(print.attribute("new-system"), Some("yes"));
}
