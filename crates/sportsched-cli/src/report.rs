//! Human and JSON summaries of a finished run.

use std::fmt;

use owo_colors::OwoColorize;
use serde::Serialize;
use sportsched::{Catalog, SolveOutcome};

#[derive(Debug, Serialize)]
pub struct Summary {
    pub instance: String,
    pub stage_sequence: String,
    pub seed: u64,
    pub cost: i64,
    pub hard_cost: i64,
    pub phase_cost: i64,
    pub feasible: bool,
    pub elapsed_ms: u64,
    pub evaluations: u64,
    pub families: Vec<FamilyCost>,
    pub stages: Vec<StageSummary>,
}

#[derive(Debug, Serialize)]
pub struct FamilyCost {
    pub family: String,
    pub cost: i64,
}

#[derive(Debug, Serialize)]
pub struct StageSummary {
    pub stage: String,
    pub evaluations: u64,
    pub cost: i64,
    pub hard_cost: i64,
}

impl Summary {
    pub fn new(catalog: &Catalog, outcome: &SolveOutcome) -> Self {
        Self {
            instance: catalog.name().to_string(),
            stage_sequence: stage_sequence(outcome),
            seed: outcome.seed,
            cost: outcome.total_cost(),
            hard_cost: outcome.hard_cost(),
            phase_cost: outcome.phase_cost(),
            feasible: outcome.hard_cost() == 0 && outcome.phase_cost() == 0,
            elapsed_ms: outcome.stats.elapsed().as_millis() as u64,
            evaluations: outcome.stats.evaluations,
            families: outcome
                .family_costs()
                .iter()
                .map(|(family, cost)| FamilyCost {
                    family: family.to_string(),
                    cost: *cost,
                })
                .collect(),
            stages: outcome
                .stages
                .iter()
                .map(|report| StageSummary {
                    stage: report.stage.to_string(),
                    evaluations: report.stats.evaluations,
                    cost: report.cost,
                    hard_cost: report.hard_cost,
                })
                .collect(),
        }
    }
}

fn stage_sequence(outcome: &SolveOutcome) -> String {
    outcome
        .stages
        .iter()
        .map(|report| report.stage.name())
        .collect::<Vec<_>>()
        .join(" > ")
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.feasible {
            "feasible".bright_green().to_string()
        } else {
            "infeasible".bright_red().to_string()
        };
        writeln!(f, "{} {} ({})", "Instance:".bold(), self.instance, status)?;
        writeln!(f, "Stages:   {}", self.stage_sequence)?;
        writeln!(f, "Cost:     {}", self.cost)?;
        writeln!(f, "Hard:     {}", self.hard_cost)?;
        writeln!(f, "Phase:    {}", self.phase_cost)?;
        writeln!(f, "Time:     {:.3}s", self.elapsed_ms as f64 / 1000.0)?;
        writeln!(f, "Seed:     {}", self.seed)?;
        for family in self.families.iter().filter(|family| family.cost > 0) {
            writeln!(f, "  {:<4} {}", family.family, family.cost)?;
        }
        Ok(())
    }
}
