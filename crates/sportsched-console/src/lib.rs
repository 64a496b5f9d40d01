//! Colorful console output for solver events.
//!
//! Provides a `tracing` layer that renders the structured events of
//! `sportsched_solver` (stage start and end, progress, the final summary)
//! as colored lines on stdout.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const SOLVER_TARGET: &str = "sportsched_solver";

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times; only the first call has effect. `RUST_LOG`
/// refines the default `sportsched_solver=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = match format!("{}=info", SOLVER_TARGET).parse::<Directive>() {
            Ok(directive) => EnvFilter::builder()
                .with_default_directive(directive)
                .from_env_lossy(),
            Err(_) => EnvFilter::from_default_env(),
        };

        // A subscriber installed by the host application wins.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let line = format!("sportsched v{} - round-robin timetabling", VERSION);
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", line.bright_white().bold());
    let _ = writeln!(stdout, "{}", "─".repeat(line.chars().count()).bright_cyan());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(SOLVER_TARGET) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_solver_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    stage: Option<String>,
    method: Option<String>,
    kind: Option<String>,
    from: Option<String>,
    teams: Option<u64>,
    hard_constraints: Option<u64>,
    evaluations: Option<u64>,
    max_evaluations: Option<u64>,
    levels: Option<u64>,
    duration_ms: Option<u64>,
    speed: Option<u64>,
    cost: Option<i64>,
    hard_cost: Option<i64>,
    phase_cost: Option<i64>,
    best_cost: Option<i64>,
    stage1_cost: Option<i64>,
    stage1_2_cost: Option<i64>,
    temperature: Option<f64>,
    acceptance: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "message" => &mut self.message,
            "stage" => &mut self.stage,
            "method" => &mut self.method,
            "kind" => &mut self.kind,
            "from" => &mut self.from,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "teams" => self.teams = Some(value),
            "hard_constraints" => self.hard_constraints = Some(value),
            "evaluations" => self.evaluations = Some(value),
            "max_evaluations" => self.max_evaluations = Some(value),
            "levels" => self.levels = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "speed" => self.speed = Some(value),
            _ => self.record_i64(field, value as i64),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "cost" => self.cost = Some(value),
            "hard_cost" => self.hard_cost = Some(value),
            "phase_cost" => self.phase_cost = Some(value),
            "best_cost" => self.best_cost = Some(value),
            "stage1_cost" => self.stage1_cost = Some(value),
            "stage1_2_cost" => self.stage1_2_cost = Some(value),
            "teams" | "hard_constraints" | "evaluations" | "max_evaluations" | "levels"
            | "duration_ms" | "speed" => {
                if value >= 0 {
                    self.record_u64(field, value as u64);
                }
            }
            _ => {}
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "temperature" => self.temperature = Some(value),
            "acceptance" => self.acceptance = Some(value),
            _ => {}
        }
    }
}

fn format_solver_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref() {
        Some("solve_start") => format_solve_start(v),
        Some("stage_start") => format_stage_start(v),
        Some("progress") => format_progress(v),
        Some("stage2_start_selected") => format_stage2_selection(v),
        Some("stage_end") => format_stage_end(v),
        Some("solve_end") => format_solve_end(v),
        _ if level == Level::WARN => format_warning(v),
        _ => String::new(),
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} method ({}), teams ({}), hard constraints ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        v.method.as_deref().unwrap_or("?").white().bold(),
        v.teams.unwrap_or(0).bright_yellow(),
        v.hard_constraints
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
    )
}

fn format_stage_start(v: &EventVisitor) -> String {
    let stage = v.stage.as_deref().unwrap_or("stage");
    format!(
        "{} {} {} started: cost ({}), temperature ({}), levels ({}), budget ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", stage).bright_cyan(),
        format_cost(v.cost.unwrap_or(0), v.hard_cost.unwrap_or(0)),
        format!("{:.2}", v.temperature.unwrap_or(0.0)).yellow(),
        v.levels.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.max_evaluations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
    )
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "    {} {:>12} | T {:>9.3} | cost {} | best {}",
        "->".bright_blue(),
        v.evaluations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        v.temperature.unwrap_or(0.0),
        v.cost.unwrap_or(0).to_formatted_string(&Locale::en),
        v.best_cost
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_green(),
    )
}

fn format_stage2_selection(v: &EventVisitor) -> String {
    format!(
        "{} {} {} stage 2 starts from {} (stage1 {}, stage1_2 {})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        v.from.as_deref().unwrap_or("?").white().bold(),
        v.stage1_cost.unwrap_or(0).to_formatted_string(&Locale::en),
        v.stage1_2_cost.unwrap_or(0).to_formatted_string(&Locale::en),
    )
}

fn format_stage_end(v: &EventVisitor) -> String {
    let stage = v.stage.as_deref().unwrap_or("stage");
    format!(
        "{} {} {} ended: time spent ({}), cost ({}), evaluation speed ({}/sec), evaluations ({}), acceptance ({:.1}%)",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", stage).bright_cyan(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_cost(v.cost.unwrap_or(0), v.hard_cost.unwrap_or(0)),
        v.speed
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        v.evaluations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        100.0 * v.acceptance.unwrap_or(0.0),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let cost = v.cost.unwrap_or(0);
    let hard = v.hard_cost.unwrap_or(0);
    let phase = v.phase_cost.unwrap_or(0);
    let feasible = hard == 0 && phase == 0;

    let mut output = format!(
        "{} {} {} Solving ended: cost ({}), time spent ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        format_cost(cost, hard),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    );

    let status = if feasible {
        "FEASIBLE TIMETABLE FOUND"
    } else {
        "INFEASIBLE (hard constraints violated)"
    };
    let padding = 58 - status.len() - 4;
    let (left, right) = (padding / 2, padding - padding / 2);
    let status = format!("  {}  ", status);
    let status = if feasible {
        status.bright_green().bold().to_string()
    } else {
        status.bright_red().bold().to_string()
    };

    let border = "═".repeat(58);
    let _ = write!(
        output,
        "\n\n{}\n{}{}{}{}{}\n{}\n",
        format!("╔{}╗", border).bright_cyan(),
        "║".bright_cyan(),
        " ".repeat(left),
        status,
        " ".repeat(right),
        "║".bright_cyan(),
        format!("╠{}╣", border).bright_cyan(),
    );
    for (label, value) in [("Cost:", cost), ("Hard cost:", hard), ("Phase cost:", phase)] {
        let _ = writeln!(
            output,
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value.to_formatted_string(&Locale::en),
            "║".bright_cyan()
        );
    }
    let _ = writeln!(output, "{}", format!("╚{}╝", border).bright_cyan());
    output
}

fn format_warning(v: &EventVisitor) -> String {
    let message = v
        .message
        .as_deref()
        .or(v.event.as_deref())
        .unwrap_or("warning");
    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        "[Solver]".bright_cyan(),
        message
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{:5}.{:03}", d.as_secs() % 100_000, d.subsec_millis()))
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

/// Total cost, red while any hard constraint is violated.
fn format_cost(cost: i64, hard_cost: i64) -> String {
    let text = cost.to_formatted_string(&Locale::en);
    if hard_cost > 0 {
        text.bright_red().to_string()
    } else if cost == 0 {
        text.bright_green().to_string()
    } else {
        text.white().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1_500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_only_known_events_are_rendered() {
        let visitor = EventVisitor {
            event: Some("step".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_solver_event(&visitor, Level::TRACE).is_empty());

        let visitor = EventVisitor {
            event: Some("stage_end".to_string()),
            stage: Some("stage2".to_string()),
            evaluations: Some(40_000),
            ..EventVisitor::default()
        };
        let line = format_solver_event(&visitor, Level::INFO);
        assert!(line.contains("stage2"));
        assert!(line.contains("40,000"));
    }

    #[test]
    fn test_summary_reports_feasibility() {
        let visitor = EventVisitor {
            event: Some("solve_end".to_string()),
            cost: Some(1_234),
            hard_cost: Some(0),
            phase_cost: Some(0),
            ..EventVisitor::default()
        };
        let summary = format_solver_event(&visitor, Level::INFO);
        assert!(summary.contains("FEASIBLE TIMETABLE FOUND"));
        assert!(summary.contains("1,234"));
    }

    #[test]
    fn test_warnings_use_their_message() {
        let visitor = EventVisitor {
            event: Some("vizing_fallback".to_string()),
            message: Some("edge colouring did not converge".to_string()),
            ..EventVisitor::default()
        };
        let line = format_solver_event(&visitor, Level::WARN);
        assert!(line.contains("edge colouring did not converge"));
    }
}
