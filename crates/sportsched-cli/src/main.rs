//! `sportsched` - solve an ITC2021 instance from the command line.

mod report;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use sportsched::{solve_instance, violations, write_timetable, Method, RunConfig, StartType};

use crate::report::Summary;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compact double round-robin timetabling with staged simulated annealing"
)]
struct Cli {
    /// ITC2021 instance file
    instance: PathBuf,

    /// Run configuration (TOML, or YAML by extension); the tuned set otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stage method: ESA-0, ESA-2S, ESA-2S-OH or ESA-3S
    #[arg(short, long)]
    method: Option<Method>,

    #[arg(long)]
    seed: Option<u64>,

    /// Initial schedule constructor: random, greedy or vizing
    #[arg(long)]
    start_type: Option<StartType>,

    /// Start from this schedule instead of constructing one
    #[arg(long)]
    init_state: Option<PathBuf>,

    /// Evaluation budget of every stage
    #[arg(long)]
    max_evaluations: Option<u64>,

    /// Where to write the best schedule (`.xml` for the solution format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the violated constraints of the best schedule
    #[arg(long)]
    violations: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// No solver progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.quiet && !cli.json {
        sportsched::console::init();
    }

    let config = build_config(&cli)?;
    let (catalog, outcome) = solve_instance(&cli.instance, config)?;

    if let Some(path) = &cli.output {
        write_timetable(&catalog, &outcome, path)?;
    }

    let summary = Summary::new(&catalog, &outcome);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
        if cli.violations {
            for violation in violations(&outcome.state) {
                println!("  {}", violation);
            }
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::tuned(cli.method.unwrap_or_default()),
    };
    if let Some(method) = cli.method {
        config = config.with_method(method);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(start_type) = cli.start_type {
        config = config.with_start_type(start_type);
    }
    if let Some(max_evaluations) = cli.max_evaluations {
        config = config.with_max_evaluations(max_evaluations);
    }
    if let Some(path) = &cli.init_state {
        config.init_state = Some(path.clone());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_tuned_config() {
        let cli = Cli::parse_from([
            "sportsched",
            "instance.xml",
            "--method",
            "esa-3s",
            "--seed",
            "9",
            "--start-type",
            "greedy",
            "--max-evaluations",
            "100",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.method, Method::Esa3s);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.start_type, StartType::Greedy);
        assert_eq!(config.stage2.max_evaluations, 100);
        assert!(!config.auto_budget);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(Cli::try_parse_from(["sportsched", "i.xml", "--method", "ESA-9"]).is_err());
    }
}
