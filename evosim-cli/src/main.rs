use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evosim_core::Simulation;
use evosim_protocol::{GenerationStats, SimConfig};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "evosim")]
#[command(about = "Grid neuroevolution simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run whole generations headless and print a summary.
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 100)]
        generations: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Advance a fixed number of steps and print the resulting state.
    Step {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        steps: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = false)]
        print_state: bool,
    },
    /// Export one snapshot per completed generation as JSONL.
    Export {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 50)]
        generations: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Run, then dump N random individuals' brain structure as JSON.
    Inspect {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        generations: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 5)]
        count: u32,
    },
    Benchmark {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        generations: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        population: Option<u32>,
        #[arg(long)]
        neurons: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    generations: u32,
    seed: u64,
    first_survival_rate: Option<f32>,
    last_survival_rate: Option<f32>,
    best_survival_rate: Option<f32>,
    extinction_fallbacks: u32,
}

#[derive(Debug, Serialize)]
struct BenchmarkSummary {
    generations: u32,
    elapsed_ms: u128,
    avg_ms_per_generation: f64,
    last_survival_rate: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            generations,
            seed,
            format,
            out,
        } => run_command(config, generations, seed, format, out),
        Commands::Step {
            config,
            steps,
            seed,
            print_state,
        } => step_command(config, steps, seed, print_state),
        Commands::Export {
            config,
            generations,
            seed,
            out,
        } => export_command(config, generations, seed, out),
        Commands::Inspect {
            config,
            generations,
            seed,
            count,
        } => inspect_command(config, generations, seed, count),
        Commands::Benchmark {
            config,
            generations,
            seed,
            population,
            neurons,
        } => benchmark_command(config, generations, seed, population, neurons),
    }
}

fn run_command(
    config_path: Option<PathBuf>,
    generations: u32,
    seed: u64,
    format: OutputFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    for _ in 0..generations {
        let stats = sim.run_generation();
        info!(
            generation = stats.generation,
            survivors = stats.survivors,
            population = stats.population,
            survival_rate = stats.survival_rate,
            "generation finished",
        );
    }

    let history = sim.history();
    let summary = RunSummary {
        generations,
        seed,
        first_survival_rate: history.first().map(|s| s.survival_rate),
        last_survival_rate: history.last().map(|s| s.survival_rate),
        best_survival_rate: history
            .iter()
            .map(|s| s.survival_rate)
            .fold(None, |best: Option<f32>, rate| {
                Some(best.map_or(rate, |b| b.max(rate)))
            }),
        extinction_fallbacks: history.iter().filter(|s| s.extinction_fallback).count() as u32,
    };

    match format {
        OutputFormat::Pretty => {
            let text = format!(
                "generations={} seed={} first_survival={:?} last_survival={:?} best_survival={:?} extinctions={}",
                summary.generations,
                summary.seed,
                summary.first_survival_rate,
                summary.last_survival_rate,
                summary.best_survival_rate,
                summary.extinction_fallbacks,
            );
            write_output(text, out)?;
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&summary)?;
            write_output(text, out)?;
        }
    }
    Ok(())
}

fn step_command(
    config_path: Option<PathBuf>,
    steps: u32,
    seed: u64,
    print_state: bool,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    let completed: Vec<GenerationStats> = sim.step_n(steps.max(1));

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "steps": steps.max(1),
            "generation": sim.generation(),
            "step_in_generation": sim.step_in_generation(),
            "generations_completed": completed.len(),
        }))?
    );
    if print_state {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    }
    Ok(())
}

fn export_command(
    config_path: Option<PathBuf>,
    generations: u32,
    seed: u64,
    out: PathBuf,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;

    let mut lines = Vec::with_capacity(generations as usize + 1);
    lines.push(serde_json::to_string(&sim.snapshot())?);
    for _ in 0..generations {
        sim.run_generation();
        lines.push(serde_json::to_string(&sim.snapshot())?);
    }

    fs::write(&out, lines.join("\n"))
        .with_context(|| format!("failed writing export to {}", out.display()))?;
    println!("exported {} snapshots to {}", lines.len(), out.display());
    Ok(())
}

fn inspect_command(
    config_path: Option<PathBuf>,
    generations: u32,
    seed: u64,
    count: u32,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    sim.run_generations(generations);

    let inspections = sim.inspect(count);
    println!("{}", serde_json::to_string_pretty(&inspections)?);
    Ok(())
}

fn benchmark_command(
    config_path: Option<PathBuf>,
    generations: u32,
    seed: u64,
    population: Option<u32>,
    neurons: Option<u32>,
) -> Result<()> {
    let mut cfg = load_config(config_path)?;
    if let Some(v) = population {
        cfg.population_size = v;
    }
    if let Some(v) = neurons {
        cfg.internal_neurons = v;
    }

    let mut sim = Simulation::new(cfg, seed)?;
    let start = Instant::now();
    sim.run_generations(generations.max(1));
    let elapsed = start.elapsed();

    let summary = BenchmarkSummary {
        generations: generations.max(1),
        elapsed_ms: elapsed.as_millis(),
        avg_ms_per_generation: elapsed.as_secs_f64() * 1000.0 / generations.max(1) as f64,
        last_survival_rate: sim.last_survival_rate(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<SimConfig> {
    if let Some(path) = path {
        evosim_config::load_sim_config_from_path(&path)
    } else {
        Ok(evosim_config::default_sim_config())
    }
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating output directory {}", parent.display())
            })?;
        }
        fs::write(&path, text).with_context(|| format!("failed writing {}", path.display()))?;
        println!("wrote output to {}", path.display());
    } else {
        println!("{text}");
    }
    Ok(())
}
