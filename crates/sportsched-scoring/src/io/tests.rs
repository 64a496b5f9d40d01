use sportsched_core::parse_instance;
use sportsched_test::{double_round_robin, rows_to_text, SAMPLE_INSTANCE};

use super::*;
use crate::error::ScheduleError;
use crate::timetable::Timetable;

#[test]
fn test_text_round_trip() {
    let rows = double_round_robin(6);
    let text = rows_to_text(&rows);
    let tt: Timetable = text.parse().unwrap();

    assert_eq!(tt.rows(), rows);
    assert_eq!(tt.to_string(), text);
}

#[test]
fn test_text_marks_unassigned_cells() {
    let mut tt = Timetable::unassigned(2);
    tt.set_assignment(0, 0, 1, true);
    tt.set_assignment(1, 0, 0, false);
    assert_eq!(tt.to_string(), "+1 ?\n-0 ?\n");
}

#[test]
fn test_invalid_token_reports_line() {
    let err = parse_rows("+1 -1\n\n-0 x0\n").unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::InvalidToken { line: 3, ref token } if token == "x0"
    ));

    assert!(matches!(
        parse_rows("+1 -\n"),
        Err(ScheduleError::InvalidToken { line: 1, .. })
    ));
}

#[test]
fn test_parse_rejects_out_of_range_opponent() {
    assert!(matches!(
        "+5 -1\n-0 +0\n".parse::<Timetable>(),
        Err(ScheduleError::InvalidOpponent { team: 0, slot: 0, opponent: 5 })
    ));
}

#[test]
fn test_xml_round_trip() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();

    let xml = write_solution(&catalog, &tt, "circle");
    assert!(xml.contains("<InstanceName>Sample6</InstanceName>"));
    assert!(xml.contains("<SolutionName>circle</SolutionName>"));
    assert_eq!(xml.matches("<ScheduledMatch").count(), 30);

    let parsed = parse_solution(&catalog, &xml).unwrap();
    assert_eq!(parsed.rows(), tt.rows());
    for t in 0..6 {
        for s in 0..10 {
            assert_eq!(parsed.is_return(t, s), tt.is_return(t, s));
        }
    }
}

#[test]
fn test_xml_escapes_solution_name() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();
    let xml = write_solution(&catalog, &tt, "a<b & \"c\"");
    assert!(xml.contains("<SolutionName>a&lt;b &amp; &quot;c&quot;</SolutionName>"));
    assert!(parse_solution(&catalog, &xml).is_ok());
}

#[test]
fn test_xml_instance_mismatch() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();
    let xml = write_solution(&catalog, &tt, "circle").replace("Sample6", "Other");

    assert!(matches!(
        parse_solution(&catalog, &xml),
        Err(ScheduleError::InstanceMismatch { ref found, .. }) if found == "Other"
    ));
}

#[test]
fn test_xml_missing_game() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();
    let xml = write_solution(&catalog, &tt, "circle");
    let first = xml.find("<ScheduledMatch").unwrap();
    let end = first + xml[first..].find("/>").unwrap() + 2;
    let truncated = format!("{}{}", &xml[..first], &xml[end..]);

    assert!(matches!(
        parse_solution(&catalog, &truncated),
        Err(ScheduleError::Unassigned { slot: 0, .. })
    ));
}

#[test]
fn test_xml_unknown_team() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let xml = r#"<Solution><MetaData><InstanceName>Sample6</InstanceName></MetaData>
        <Games><ScheduledMatch home="0" away="42" slot="0"/></Games></Solution>"#;

    assert!(matches!(
        parse_solution(&catalog, xml),
        Err(ScheduleError::UnknownId { kind: "team", ref id }) if id == "42"
    ));
}

#[test]
fn test_xml_requires_solution_root() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    assert!(matches!(
        parse_solution(&catalog, "<Instance/>"),
        Err(ScheduleError::MissingElement(_))
    ));
    assert!(matches!(
        parse_solution(&catalog, "<Solution"),
        Err(ScheduleError::Xml(_))
    ));
}

#[test]
fn test_fixture_table() {
    let catalog = parse_instance(SAMPLE_INSTANCE).unwrap();
    let tt = Timetable::from_rows(&double_round_robin(6)).unwrap();
    let table = format_fixtures(&catalog, &tt);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("0   1   2"));
    // Round 0 of the circle schedule opens with team 0 hosting team 5.
    assert!(lines[1].starts_with("0-5"));
}
