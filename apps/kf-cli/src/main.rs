use clap::{Args, Parser, Subcommand, ValueEnum};
use kf_core::units::{deg_c, kpa};
use kf_core::{KfError, KfResult};
use kf_cycle::{RankineCycle, RankineReport};
use kf_fluids::TabulatedSteam;
use kf_network::{Named, NetworkError, SolveOptions, SolveReport, scenarios};
use kf_project::{Network, SamplerOverride, TransitionDef, build_network, transition_sampler};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for a solve that stopped without converging.
const EXIT_NOT_CONVERGED: u8 = 2;

#[derive(Parser)]
#[command(name = "kf")]
#[command(about = "kirchflow - Kirchhoff-style network solver", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network definition file
    Validate {
        /// Path to the YAML or JSON definition
        path: PathBuf,
    },
    /// Solve a network definition file
    Solve {
        /// Path to the YAML or JSON definition
        path: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Solve one of the built-in reference problems
    Demo {
        #[arg(value_enum)]
        which: Demo,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    Circuit,
    Pipes,
    Rankine,
}

#[derive(Args)]
struct RunArgs {
    /// Seed for transitional friction draws (overrides the file)
    #[arg(long)]
    seed: Option<u64>,
    /// Use the mean transitional friction factor instead of random draws
    #[arg(long, conflicts_with = "seed")]
    deterministic: bool,
    /// Newton iteration cap (overrides the file)
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn sampler(&self) -> SamplerOverride {
        match (self.seed, self.deterministic) {
            (_, true) => SamplerOverride::Mean,
            (Some(seed), false) => SamplerOverride::Seeded(seed),
            (None, false) => SamplerOverride::FromFile,
        }
    }

    fn options(&self, from_file: SolveOptions) -> SolveOptions {
        match self.max_iterations {
            Some(n) => from_file.with_max_iterations(n),
            None => from_file,
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    kind: &'static str,
    converged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a SolveReport>,
    unknowns: Vec<Named>,
    checks: Vec<Named>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Validate { path } => cmd_validate(&path),
        Commands::Solve { path, run } => cmd_solve(&path, &run),
        Commands::Demo { which, run } => cmd_demo(which, &run),
    };
    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(path: &Path) -> KfResult<ExitCode> {
    println!("Validating network: {}", path.display());
    let project = kf_project::load(path)?;
    build_network(&project, SamplerOverride::Mean)?;
    println!(
        "✓ {} network '{}' is valid",
        project.network.kind(),
        project.name
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_solve(path: &Path, run: &RunArgs) -> KfResult<ExitCode> {
    let project = kf_project::load(path)?;
    let mut network = build_network(&project, run.sampler())?;
    if !run.json && !project.name.is_empty() {
        println!("{}", project.name);
        println!();
    }
    solve_and_print(&mut network, &run.options(project.solve_options()), run.json)
}

fn cmd_demo(which: Demo, run: &RunArgs) -> KfResult<ExitCode> {
    let mut network = match which {
        Demo::Circuit => Network::Circuit(scenarios::reference_circuit()?),
        Demo::Pipes => {
            let sampler = transition_sampler(run.sampler().resolve(TransitionDef::default()));
            Network::Pipes(scenarios::reference_pipe_network()?.with_sampler(sampler))
        }
        Demo::Rankine => return demo_rankine(run.json),
    };
    solve_and_print(&mut network, &run.options(SolveOptions::default()), run.json)
}

fn solve_and_print(
    network: &mut Network,
    options: &SolveOptions,
    json: bool,
) -> KfResult<ExitCode> {
    let (report, code) = match network.solve(options) {
        Ok(report) => (Some(report), ExitCode::SUCCESS),
        Err(e) if e.is_not_converged() => {
            eprintln!("warning: {e}");
            (None, ExitCode::from(EXIT_NOT_CONVERGED))
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        print_json(network, report.as_ref())?;
    } else {
        if report.is_none() {
            println!("Last iterate (not converged):");
        }
        print_text(network)?;
    }
    Ok(code)
}

fn print_text(network: &mut Network) -> Result<(), NetworkError> {
    match network {
        Network::Circuit(c) => {
            for current in c.branch_currents() {
                println!("{} = {:.1}", current.name, current.value);
            }
            println!();
            println!("Check loop voltage sums:");
            for sum in c.loop_voltage_sums() {
                println!("Voltage sum for loop {} is {:0.2e} V", sum.name, sum.value);
            }
            println!();
            println!("Check junction currents:");
            for j in c.junction_currents() {
                println!("Net current into node {} is {:0.2e} A", j.name, j.value);
            }
        }
        Network::Pipes(p) => {
            for q in p.pipe_flows() {
                println!("The flow in segment {} is {:0.4} m^3/s", q.name, q.value);
            }
            println!();
            println!("Check net node flows:");
            for n in p.net_node_flows() {
                println!("Net flow into node {} is {:0.2e} m^3/s", n.name, n.value);
            }
            println!();
            println!("Check loop head loss:");
            for l in p.loop_head_losses()? {
                println!("Head loss for loop {} is {:0.2e} m", l.name, l.value);
            }
        }
    }
    Ok(())
}

fn print_json(network: &mut Network, report: Option<&SolveReport>) -> KfResult<()> {
    let kind = network.kind();
    let (unknowns, checks) = match network {
        Network::Circuit(c) => {
            let mut checks = c.loop_voltage_sums();
            checks.extend(c.junction_currents());
            (c.branch_currents(), checks)
        }
        Network::Pipes(p) => {
            let mut checks = p.net_node_flows();
            checks.extend(p.loop_head_losses()?);
            (p.pipe_flows(), checks)
        }
    };
    let summary = Summary {
        kind,
        converged: report.is_some(),
        report,
        unknowns,
        checks,
    };
    println!("{}", to_json(&summary)?);
    Ok(())
}

fn demo_rankine(json: bool) -> KfResult<ExitCode> {
    let table = TabulatedSteam::reference();
    let cycles = [
        RankineCycle::new("Rankine cycle - saturated steam inlet", kpa(8.0), kpa(8000.0)),
        RankineCycle::new("Rankine cycle - superheated steam inlet", kpa(8.0), kpa(8000.0))
            .with_superheat(deg_c(500.0)),
    ];
    let reports = cycles
        .iter()
        .map(|c| c.analyze(&table))
        .collect::<Result<Vec<RankineReport>, _>>()?;

    if json {
        println!("{}", to_json(&reports)?);
    } else {
        let (lo, hi) = table.saturation_range_kpa();
        let isobars: Vec<String> = table
            .isobars_kpa()
            .iter()
            .map(|p| p.to_string())
            .collect();
        println!(
            "Steam table: saturation {lo}-{hi} kPa, superheated isobars [{}] kPa",
            isobars.join(", ")
        );
        println!();
        for report in &reports {
            println!("{report}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> KfResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| KfError::InvalidArg {
        what: format!("JSON encoding failed: {e}"),
    })
}
