//! Schedule serialization.
//!
//! - [`text`]: one line per team, `+opp` for a home game and `-opp` for an
//!   away game, used to carry schedules between stages
//! - [`xml`]: the ITC2021 solution format

pub mod text;
pub mod xml;

#[cfg(test)]
mod tests;

pub use text::{format_fixtures, parse_rows};
pub use xml::{load_solution, parse_solution, write_solution};
