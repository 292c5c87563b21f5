//! brain-sim - run goal/action planners through a scripted scenario.
//!
//! - `brain-sim run <scenario>` - simulate and print the decision timeline
//! - `brain-sim check <scenario>` - validate the scenario and every blueprint

mod scenario;
mod sim;
mod world;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use crate::scenario::Scenario;
use crate::sim::{AgentReport, Simulation};

#[derive(Parser)]
#[command(name = "brain-sim")]
#[command(about = "Goal/action planner scenario runner", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,

        /// Override seconds per tick
        #[arg(long)]
        dt: Option<f32>,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the timeline and final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario YAML file
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            dt,
            seed,
            json,
        } => run_scenario(&scenario, ticks, dt, seed, json),
        Commands::Check { scenario } => check_scenario(&scenario),
    }
}

fn run_scenario(
    path: &Path,
    ticks: Option<u64>,
    dt: Option<f32>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut scenario = Scenario::load(path)?;
    if let Some(dt) = dt {
        scenario.dt_seconds = dt;
    }
    if let Some(seed) = seed {
        scenario.seed = seed;
    }
    scenario.validate()?;
    let ticks = ticks.unwrap_or(scenario.ticks);

    tracing::info!(
        scenario = %path.display(),
        agents = scenario.agents.len(),
        ticks,
        dt = scenario.dt_seconds,
        seed = scenario.seed,
        "Starting simulation"
    );

    let mut sim = Simulation::new(&scenario)?;
    let mut timeline = Vec::new();
    sim.run(ticks, |event| {
        if json {
            timeline.push(event.clone());
        } else {
            println!("{event}");
        }
    });
    let report = sim.report();

    if json {
        let output = serde_json::json!({
            "timeline": timeline,
            "agents": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(sim.ctx().tick, &report);
    }
    Ok(())
}

fn print_report(ticks: u64, report: &[AgentReport]) {
    println!();
    println!("Final state after {ticks} ticks");
    println!("==========================");
    for agent in report {
        let snapshot = &agent.planner;
        println!(
            "{} goal={} action={} ({:?}, {:.2}s, activation {})",
            snapshot.agent,
            snapshot.goal,
            snapshot.action,
            snapshot.action_state,
            snapshot.action_elapsed_seconds,
            snapshot.activations
        );
        for (name, value) in &agent.resources {
            println!("  {name}: {value:.2}");
        }
        if let Some(fault) = &snapshot.fault {
            println!("  fault: {fault}");
        }
    }
}

fn check_scenario(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let sim = Simulation::new(&scenario)?;

    println!(
        "{}: ok ({} agents, {} blueprints, {} script events)",
        path.display(),
        sim.planners().len(),
        scenario.blueprints.len(),
        scenario.script.len()
    );
    Ok(())
}
