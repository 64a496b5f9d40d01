//! ITC2021 solution files.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use sportsched_core::Catalog;

use crate::error::{Result, ScheduleError};
use crate::timetable::Timetable;

/// Renders a complete timetable as an ITC2021 solution document.
///
/// Games are listed slot by slot, and by home team inside a slot.
pub fn write_solution(catalog: &Catalog, tt: &Timetable, solution_name: &str) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n<Solution>\n  <MetaData>\n");
    let _ = writeln!(
        out,
        "    <InstanceName>{}</InstanceName>",
        escape(catalog.name())
    );
    let _ = writeln!(
        out,
        "    <SolutionName>{}</SolutionName>",
        escape(solution_name)
    );
    out.push_str("  </MetaData>\n  <Games>\n");
    for s in 0..tt.num_slots() {
        for t in 0..tt.num_teams() {
            if tt.is_assigned(t, s) && tt.is_home(t, s) {
                let _ = writeln!(
                    out,
                    "    <ScheduledMatch home=\"{}\" away=\"{}\" slot=\"{}\"/>",
                    escape(&catalog.teams()[t].id),
                    escape(&catalog.teams()[tt.opponent(t, s)].id),
                    escape(&catalog.slots()[s].id)
                );
            }
        }
    }
    out.push_str("  </Games>\n</Solution>\n");
    out
}

/// Reads a solution document written for `catalog`.
///
/// # Errors
///
/// Fails on malformed XML, on an instance name other than the catalog's,
/// on unknown team or slot ids, and when a cell is left without a game.
pub fn parse_solution(catalog: &Catalog, xml: &str) -> Result<Timetable> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "Solution" {
        return Err(ScheduleError::MissingElement("Solution".to_string()));
    }

    if let Some(name) = child(root, "MetaData")
        .and_then(|m| child(m, "InstanceName"))
        .and_then(|n| n.text())
    {
        let name = name.trim();
        if name != catalog.name() {
            return Err(ScheduleError::InstanceMismatch {
                expected: catalog.name().to_string(),
                found: name.to_string(),
            });
        }
    }

    let games = child(root, "Games").ok_or_else(|| ScheduleError::MissingElement("Games".to_string()))?;
    let mut tt = Timetable::unassigned(catalog.num_teams());
    for game in games
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "ScheduledMatch")
    {
        let home = team(catalog, game, "home")?;
        let away = team(catalog, game, "away")?;
        let slot_id = attr(game, "slot")?;
        let slot = catalog
            .slot_index(slot_id)
            .ok_or_else(|| ScheduleError::UnknownId {
                kind: "slot",
                id: slot_id.to_string(),
            })?;
        tt.set_assignment(home, slot, away, true);
        tt.set_assignment(away, slot, home, false);
    }

    for t in 0..tt.num_teams() {
        for s in 0..tt.num_slots() {
            if !tt.is_assigned(t, s) {
                return Err(ScheduleError::Unassigned { team: t, slot: s });
            }
        }
    }
    tt.refresh_legs();
    Ok(tt)
}

/// Reads a solution file written for `catalog`.
pub fn load_solution(catalog: &Catalog, path: impl AsRef<Path>) -> Result<Timetable> {
    let xml = fs::read_to_string(path)?;
    parse_solution(catalog, &xml)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| ScheduleError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
        })
}

fn team(catalog: &Catalog, node: Node, name: &str) -> Result<usize> {
    let id = attr(node, name)?;
    catalog.team_index(id).ok_or_else(|| ScheduleError::UnknownId {
        kind: "team",
        id: id.to_string(),
    })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
