//! envcheck CLI
//!
//! Command-line interface for checking environments against the
//! reset/step/space contract.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use envcheck::log::JsonLinesLogger;
use envcheck::prelude::*;
use envcheck::utils::{abbreviate, format_duration};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod progress;

use progress::ProgressLogger;

#[derive(Parser)]
#[command(name = "envcheck")]
#[command(version, about = "envcheck - Conformance checks for RL environments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered environments
    List {
        /// Only ids containing this substring
        #[arg(long)]
        marker: Option<String>,
    },

    /// Check one environment against the reset/step contract
    Check {
        /// Environment id
        env: String,

        /// Skip the advisory space checks
        #[arg(long)]
        no_warn: bool,

        /// Render every declared mode
        #[arg(long)]
        render: bool,

        /// Skip render modes that need a display
        #[arg(long)]
        headless: bool,

        /// Check goal rewards against compute_reward
        #[arg(long)]
        goal_reward: bool,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run full episodes with random actions
    Rollout {
        /// Environment id
        env: String,

        /// Number of episodes
        #[arg(long, default_value = "1")]
        episodes: u64,

        /// Observation magnitude bound
        #[arg(long, default_value = "5.0")]
        bound: f64,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop episodes after this many steps
        #[arg(long)]
        max_steps: Option<u64>,
    },

    /// Check and roll out every environment of a suite
    Suite {
        /// JSON suite configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write episode summaries and diagnostics as JSON lines
        #[arg(long)]
        report: Option<PathBuf>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Only run the rollouts
        #[arg(long)]
        skip_check: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = envcheck_envs::registry();

    match cli.command {
        Commands::List { marker } => {
            list_envs(&registry, marker.as_deref());
        }
        Commands::Check {
            env,
            no_warn,
            render,
            headless,
            goal_reward,
            seed,
        } => {
            let config = CheckConfig {
                seed,
                ..CheckConfig::default()
            }
            .warn(!no_warn)
            .skip_render_check(!render)
            .headless(headless)
            .check_goal_reward(goal_reward);
            check(&registry, &env, &config)?;
        }
        Commands::Rollout {
            env,
            episodes,
            bound,
            seed,
            max_steps,
        } => {
            let config = RolloutConfig {
                obs_bound: bound,
                seed,
                max_steps,
            };
            rollout(&registry, &env, episodes, &config)?;
        }
        Commands::Suite {
            config,
            report,
            seed,
            skip_check,
        } => {
            let suite_config = match config {
                Some(path) => load_suite(&path)?,
                None => SuiteConfig::default(),
            };
            suite(&registry, &suite_config, report.as_deref(), seed, skip_check)?;
        }
    }

    Ok(())
}

fn list_envs(registry: &Registry, marker: Option<&str>) {
    for id in registry.matching(marker.unwrap_or("")) {
        println!("{}", id);
    }
}

fn check(registry: &Registry, id: &str, config: &CheckConfig) -> Result<()> {
    tracing::info!(env = id, "Checking environment");

    let mut env = registry.make(id)?;
    let report =
        check_env(&mut *env, config).with_context(|| format!("{} failed the check", id))?;

    for warning in report.warnings() {
        println!("warning: {}", warning);
    }
    println!(
        "{} passed the environment check ({} warnings)",
        id,
        report.warnings().count()
    );
    Ok(())
}

fn rollout(registry: &Registry, id: &str, episodes: u64, config: &RolloutConfig) -> Result<()> {
    tracing::info!(env = id, episodes, bound = config.obs_bound, "Starting rollout");

    let mut env = registry.make(id)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for episode in 0..episodes {
        let episode_config = RolloutConfig {
            seed: config.seed.map(|s| s.wrapping_add(episode)),
            ..config.clone()
        };
        let summary = run_episode(&mut *env, &episode_config, &mut rng)
            .with_context(|| format!("{} failed in episode {}", id, episode))?;
        println!(
            "Episode {}: steps={} return={:.4} cost={:.4}",
            episode, summary.steps, summary.total_reward, summary.total_cost
        );
    }
    Ok(())
}

fn load_suite(path: &Path) -> Result<SuiteConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read suite config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid suite config {}", path.display()))
}

fn suite(
    registry: &Registry,
    suite: &SuiteConfig,
    report: Option<&Path>,
    seed: Option<u64>,
    skip_check: bool,
) -> Result<()> {
    let started = Instant::now();
    let mut logger = CompositeLogger::default();
    logger.add(Box::new(ConsoleLogger::new()));
    if let Some(path) = report {
        let jsonl = JsonLinesLogger::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        logger.add(Box::new(jsonl));
    }

    let outcome = run_batch(registry, suite, &mut logger, seed, skip_check);
    logger.close();
    let summaries = outcome?;

    let steps: u64 = summaries.iter().map(|(_, s)| s.steps).sum();
    println!(
        "Rolled out {} environments ({} steps) in {}",
        summaries.len(),
        abbreviate(steps),
        format_duration(started.elapsed().as_secs_f64())
    );
    Ok(())
}

fn run_batch(
    registry: &Registry,
    suite: &SuiteConfig,
    logger: &mut CompositeLogger,
    seed: Option<u64>,
    skip_check: bool,
) -> Result<Vec<(String, EpisodeSummary)>> {
    if !skip_check {
        let config = CheckConfig {
            seed,
            ..CheckConfig::default()
        };
        let reports = check_suite(registry, suite, &config, &*logger)?;
        println!("Checked {} environments", reports.len());
    }

    let ids = suite.rollout_ids(registry);
    logger.add(Box::new(ProgressLogger::new(ids.len() as u64)?));

    let config = RolloutConfig {
        seed,
        ..RolloutConfig::default()
    };
    Ok(run_suite(registry, suite, &config, &*logger)?)
}
