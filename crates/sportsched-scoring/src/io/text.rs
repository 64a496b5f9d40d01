//! Plain-text schedule format.

use std::fmt;
use std::str::FromStr;

use sportsched_core::Catalog;

use crate::error::{Result, ScheduleError};
use crate::timetable::{Timetable, UNSET};

impl fmt::Display for Timetable {
    /// One line per team; `+o` when the team hosts `o`, `-o` when it
    /// visits. Unassigned cells print as `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in 0..self.num_teams() {
            for s in 0..self.num_slots() {
                if s > 0 {
                    f.write_str(" ")?;
                }
                match self.opponent(t, s) {
                    UNSET => f.write_str("?")?,
                    o => write!(f, "{}{}", if self.is_home(t, s) { '+' } else { '-' }, o)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Timetable {
    type Err = ScheduleError;

    fn from_str(text: &str) -> Result<Self> {
        Timetable::from_rows(&parse_rows(text)?)
    }
}

/// Parses the text format into `(opponent, is_home)` rows.
///
/// Tokens may be separated by any whitespace; blank lines are skipped.
///
/// # Example
///
/// ```
/// use sportsched_scoring::io::parse_rows;
///
/// let rows = parse_rows("+1  -1\n\n-0\t+0\n").unwrap();
/// assert_eq!(rows, vec![vec![(1, true), (1, false)], vec![(0, false), (0, true)]]);
/// ```
pub fn parse_rows(text: &str) -> Result<Vec<Vec<(usize, bool)>>> {
    let mut rows = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_token(token).ok_or_else(|| ScheduleError::InvalidToken {
                line: number + 1,
                token: token.to_string(),
            }))
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_token(token: &str) -> Option<(usize, bool)> {
    let home = match token.as_bytes().first()? {
        b'+' => true,
        b'-' => false,
        _ => return None,
    };
    let opponent = token[1..].parse().ok()?;
    Some((opponent, home))
}

/// Renders the schedule as a fixture table: one column per slot, one line
/// per game index, each game written `home-away` with team ids.
pub fn format_fixtures(catalog: &Catalog, tt: &Timetable) -> String {
    let mut columns: Vec<Vec<String>> = Vec::with_capacity(tt.num_slots());
    for s in 0..tt.num_slots() {
        let games = (0..tt.num_teams())
            .filter(|&t| tt.is_assigned(t, s) && tt.is_home(t, s))
            .map(|t| {
                format!(
                    "{}-{}",
                    catalog.teams()[t].id,
                    catalog.teams()[tt.opponent(t, s)].id
                )
            })
            .collect();
        columns.push(games);
    }
    let width = columns
        .iter()
        .flatten()
        .map(String::len)
        .chain(catalog.slots().iter().map(|slot| slot.id.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let header: Vec<String> = catalog
        .slots()
        .iter()
        .map(|slot| format!("{:<width$}", slot.id, width = width))
        .collect();
    out.push_str(header.join(" ").trim_end());
    out.push('\n');
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..rows {
        let line: Vec<String> = columns
            .iter()
            .map(|games| {
                let game = games.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", game, width = width)
            })
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }
    out
}
