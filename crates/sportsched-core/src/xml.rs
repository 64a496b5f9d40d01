//! ITC2021 XML instance loader.
//!
//! Only the compact, double round-robin, single-league subset of the format
//! is accepted; anything else is rejected with
//! [`CatalogError::Unsupported`].

use std::path::Path;

use roxmltree::{Document, Node};

use crate::catalog::{Catalog, CatalogBuilder};
use crate::constraint::{Ca4Scope, ConstraintDef, HomeMode, Severity};
use crate::error::{CatalogError, Result};
use crate::resource::{Slot, Team};

/// Reads and parses an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path)?;
    parse_instance(&contents)
}

/// Parses an instance from its XML text.
///
/// # Example
///
/// ```
/// let xml = r#"
/// <Instance>
///   <MetaData><InstanceName>Tiny</InstanceName></MetaData>
///   <Structure>
///     <Format leagueIds="0">
///       <numberRoundRobin>2</numberRoundRobin>
///       <compactness>C</compactness>
///       <gameMode>P</gameMode>
///     </Format>
///   </Structure>
///   <ObjectiveFunction><Objective>SC</Objective></ObjectiveFunction>
///   <Resources>
///     <Leagues><league id="0" name="L"/></Leagues>
///     <Teams>
///       <team id="0" league="0" name="A"/>
///       <team id="1" league="0" name="B"/>
///     </Teams>
///     <Slots><slot id="0" name="S0"/><slot id="1" name="S1"/></Slots>
///   </Resources>
///   <Constraints/>
/// </Instance>"#;
///
/// let catalog = sportsched_core::parse_instance(xml).unwrap();
/// assert_eq!(catalog.name(), "Tiny");
/// assert_eq!(catalog.num_teams(), 2);
/// assert!(catalog.is_phased());
/// ```
pub fn parse_instance(xml: &str) -> Result<Catalog> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "Instance" {
        return Err(CatalogError::MissingElement("Instance".to_string()));
    }

    let name = child(root, "MetaData")
        .ok()
        .and_then(|m| m.children().find(|n| n.tag_name().name() == "InstanceName"))
        .and_then(|n| n.text())
        .unwrap_or_default()
        .trim()
        .to_string();

    let structure = child(root, "Structure")?;
    let formats: Vec<Node> = elements(structure)
        .filter(|n| n.tag_name().name() == "Format")
        .collect();
    let [format] = formats.as_slice() else {
        return Err(CatalogError::Unsupported(format!(
            "expected a single league format, found {}",
            formats.len()
        )));
    };
    let rounds = text(child(*format, "numberRoundRobin")?);
    if rounds != "2" {
        return Err(CatalogError::Unsupported(format!(
            "expected a 2-round-robin, found {}-RR",
            rounds
        )));
    }
    let compactness = text(child(*format, "compactness")?);
    if compactness != "C" {
        return Err(CatalogError::Unsupported(format!(
            "expected a compact timetable, found `{}`",
            compactness
        )));
    }
    let phased = child(*format, "gameMode").map(text).unwrap_or("") == "P";
    if let Ok(additional) = child(structure, "AdditionalGames") {
        if elements(additional).next().is_some() {
            return Err(CatalogError::Unsupported("additional games".to_string()));
        }
    }

    let objective = child(root, "ObjectiveFunction").and_then(|o| child(o, "Objective"))?;
    if text(objective) != "SC" {
        return Err(CatalogError::Unsupported(format!(
            "expected objective SC, found `{}`",
            text(objective)
        )));
    }

    let resources = child(root, "Resources")?;
    if non_empty(resources, "LeagueGroups") {
        return Err(CatalogError::Unsupported("league groups".to_string()));
    }
    let leagues: Vec<Node> = elements(child(resources, "Leagues")?).collect();
    let [league] = leagues.as_slice() else {
        return Err(CatalogError::Unsupported(format!(
            "expected a single league, found {}",
            leagues.len()
        )));
    };
    if non_empty(resources, "TeamGroups") {
        return Err(CatalogError::Unsupported("explicit team groups".to_string()));
    }
    if non_empty(resources, "SlotGroups") {
        return Err(CatalogError::Unsupported("explicit slot groups".to_string()));
    }

    let teams: Vec<Team> = elements(child(resources, "Teams")?)
        .map(|t| -> Result<Team> {
            Ok(Team::new(attr(t, "id")?, t.attribute("name").unwrap_or_default())
                .with_league(t.attribute("league").unwrap_or_default()))
        })
        .collect::<Result<_>>()?;
    let slots: Vec<Slot> = elements(child(resources, "Slots")?)
        .map(|s| -> Result<Slot> {
            Ok(Slot::new(attr(s, "id")?, s.attribute("name").unwrap_or_default()))
        })
        .collect::<Result<_>>()?;

    let ids = Ids {
        teams: &teams,
        slots: &slots,
    };
    let mut builder = CatalogBuilder::new(name)
        .with_league(league.attribute("name").unwrap_or_default())
        .with_phased(phased);

    if let Ok(constraints) = child(root, "Constraints") {
        if non_empty(constraints, "BasicConstraints") {
            return Err(CatalogError::Unsupported("basic constraints".to_string()));
        }
        for section in elements(constraints) {
            for c in elements(section) {
                builder.add_constraint(constraint(c, &ids)?);
            }
        }
    }

    builder.with_teams(teams).with_slots(slots).build()
}

struct Ids<'a> {
    teams: &'a [Team],
    slots: &'a [Slot],
}

impl Ids<'_> {
    fn teams(&self, node: Node, attribute: &str) -> Result<Vec<usize>> {
        split(attr(node, attribute)?)
            .map(|id| {
                self.teams
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| CatalogError::UnknownTeam(id.to_string()))
            })
            .collect()
    }

    fn slots(&self, node: Node, attribute: &str) -> Result<Vec<usize>> {
        split(attr(node, attribute)?)
            .map(|id| {
                self.slots
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or_else(|| CatalogError::UnknownSlot(id.to_string()))
            })
            .collect()
    }

    fn meetings(&self, node: Node) -> Result<Vec<(usize, usize)>> {
        let lookup = |id: &str| {
            self.teams
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| CatalogError::UnknownTeam(id.to_string()))
        };
        split(attr(node, "meetings")?)
            .map(|meeting| match meeting.split_once(',') {
                Some((home, away)) => Ok((lookup(home.trim())?, lookup(away.trim())?)),
                None => Err(invalid(node, "meetings", meeting)),
            })
            .collect()
    }
}

fn constraint(c: Node, ids: &Ids) -> Result<ConstraintDef> {
    let severity = Severity {
        hard: c.attribute("type") == Some("HARD"),
        penalty: opt_int(c, "penalty")?.unwrap_or(0),
    };
    let def = match c.tag_name().name() {
        "CA1" => ConstraintDef::Ca1 {
            teams: ids.teams(c, "teams")?,
            slots: ids.slots(c, "slots")?,
            k_min: opt_int(c, "min")?,
            k_max: opt_int(c, "max")?,
            mode: match attr(c, "mode")? {
                "H" => HomeMode::Home,
                "A" => HomeMode::Away,
                "HA" => HomeMode::Any,
                other => return Err(invalid(c, "mode", other)),
            },
            severity,
        },
        "CA2" => {
            if attr(c, "mode2")? != "GLOBAL" {
                return Err(invalid(c, "mode2", attr(c, "mode2")?));
            }
            ConstraintDef::Ca2 {
                teams1: ids.teams(c, "teams1")?,
                teams2: ids.teams(c, "teams2")?,
                slots: ids.slots(c, "slots")?,
                k_min: opt_int(c, "min")?,
                k_max: opt_int(c, "max")?,
                mode: home_mode(c, "mode1")?,
                severity,
            }
        }
        "CA3" => {
            if attr(c, "mode2")? != "SLOTS" {
                return Err(invalid(c, "mode2", attr(c, "mode2")?));
            }
            let window = attr(c, "intp")?;
            ConstraintDef::Ca3 {
                teams1: ids.teams(c, "teams1")?,
                teams2: ids.teams(c, "teams2")?,
                window: window.parse().map_err(|_| invalid(c, "intp", window))?,
                k_min: opt_int(c, "min")?,
                k_max: opt_int(c, "max")?,
                mode: home_mode(c, "mode1")?,
                severity,
            }
        }
        "CA4" => ConstraintDef::Ca4 {
            teams1: ids.teams(c, "teams1")?,
            teams2: ids.teams(c, "teams2")?,
            slots: ids.slots(c, "slots")?,
            k_min: opt_int(c, "min")?,
            k_max: opt_int(c, "max")?,
            mode: home_mode(c, "mode1")?,
            scope: match attr(c, "mode2")? {
                "GLOBAL" => Ca4Scope::Global,
                "EVERY" => Ca4Scope::Every,
                other => return Err(invalid(c, "mode2", other)),
            },
            severity,
        },
        "GA1" => ConstraintDef::Ga1 {
            meetings: ids.meetings(c)?,
            slots: ids.slots(c, "slots")?,
            k_min: opt_int(c, "min")?,
            k_max: opt_int(c, "max")?,
            severity,
        },
        "BR1" => ConstraintDef::Br1 {
            teams: ids.teams(c, "teams")?,
            slots: ids.slots(c, "slots")?,
            k: int(c, "intp")?,
            mode: match c.attribute("homeMode") {
                None | Some("HA") => HomeMode::Any,
                Some("H") => HomeMode::Home,
                Some("A") => HomeMode::Away,
                Some(other) => return Err(invalid(c, "homeMode", other)),
            },
            severity,
        },
        "BR2" => {
            match c.attribute("homeMode") {
                None | Some("HA") => {}
                Some(other) => return Err(invalid(c, "homeMode", other)),
            }
            if let Some(mode2) = c.attribute("mode2") {
                if mode2 != "LEQ" {
                    return Err(invalid(c, "mode2", mode2));
                }
            }
            ConstraintDef::Br2 {
                teams: ids.teams(c, "teams")?,
                slots: ids.slots(c, "slots")?,
                k: int(c, "intp")?,
                severity,
            }
        }
        "FA2" => {
            home_mode(c, "mode")?;
            ConstraintDef::Fa2 {
                teams: ids.teams(c, "teams")?,
                slots: ids.slots(c, "slots")?,
                k: int(c, "intp")?,
                severity,
            }
        }
        "SE1" => {
            if let Some(mode1) = c.attribute("mode1") {
                if mode1 != "SLOTS" {
                    return Err(invalid(c, "mode1", mode1));
                }
            }
            ConstraintDef::Se1 {
                teams: ids.teams(c, "teams")?,
                m_min: opt_int(c, "min")?,
                m_max: opt_int(c, "max")?,
                severity,
            }
        }
        other => {
            return Err(CatalogError::Unsupported(format!(
                "constraint type {}",
                other
            )))
        }
    };
    Ok(def)
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|n| n.tag_name().name() == name)
        .ok_or_else(|| CatalogError::MissingElement(name.to_string()))
}

fn non_empty(node: Node, name: &str) -> bool {
    child(node, name)
        .map(|c| elements(c).next().is_some())
        .unwrap_or(false)
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or_default()
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| CatalogError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
        })
}

fn int(node: Node, name: &str) -> Result<i64> {
    let value = attr(node, name)?;
    value.trim().parse().map_err(|_| invalid(node, name, value))
}

fn opt_int(node: Node, name: &str) -> Result<Option<i64>> {
    match node.attribute(name) {
        Some(_) => int(node, name).map(Some),
        None => Ok(None),
    }
}

fn home_mode(node: Node, name: &str) -> Result<HomeMode> {
    match attr(node, name)? {
        "H" => Ok(HomeMode::Home),
        "A" => Ok(HomeMode::Away),
        "HA" => Ok(HomeMode::Any),
        other => Err(invalid(node, name, other)),
    }
}

fn invalid(node: Node, attribute: &str, value: &str) -> CatalogError {
    CatalogError::InvalidValue {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn split(list: &str) -> impl Iterator<Item = &str> {
    list.split(';').map(str::trim).filter(|s| !s.is_empty())
}
