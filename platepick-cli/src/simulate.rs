//! Simulate command - play many sessions with random answers
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: simulate_runs(), report_results()
//! - Level 3: play_random_session(), compute_statistics()
//! - Level 4: seeding and formatting utilities

use anyhow::{bail, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use platepick_core::{CatalogSource, DishSource};
use platepick_engine::{EngineConfig, GameEngine, Phase};
use platepick_tournament::MatchKind;

use crate::CatalogArgs;

/// Upper bound on events per session before it counts as stuck
const MAX_EVENTS: usize = 10_000;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Number of sessions to play
    #[arg(long, default_value = "100")]
    pub runs: usize,

    /// Number of winners to list
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of one simulated session
#[derive(Clone, Debug, Serialize)]
struct SessionRecord {
    run: usize,
    questions: usize,
    matches: usize,
    rounds: u32,
    contenders: usize,
    winner_id: String,
    winner_name: String,
}

#[derive(Clone, Debug, Serialize)]
struct SimulationResults {
    runs: usize,
    avg_questions: f64,
    max_questions: usize,
    avg_matches: f64,
    max_rounds: u32,
    /// (dish name, wins), most frequent first
    top_winners: Vec<(String, usize)>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let catalog = args.catalog.load(seed)?;
    let config = args.catalog.engine_config(None);

    tracing::info!("Simulating {} sessions over {} dishes", args.runs, catalog.len());

    let records = simulate_runs(&catalog, &config, args.runs, seed)?;
    let results = compute_statistics(&records, args.top);

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play `runs` independent sessions in parallel
fn simulate_runs(
    catalog: &CatalogSource,
    config: &EngineConfig,
    runs: usize,
    seed: Option<u64>,
) -> Result<Vec<SessionRecord>> {
    let seeds = run_seeds(runs, seed);

    seeds
        .into_par_iter()
        .enumerate()
        .map(|(run, run_seed)| {
            let source = catalog.clone().with_seed(run_seed);
            let config = config.clone().with_seed(run_seed);
            let mut chooser = ChaCha8Rng::seed_from_u64(run_seed ^ 0x9E37_79B9_7F4A_7C15);
            play_random_session(run, source, config, &mut chooser)
        })
        .collect()
}

fn report_results(results: &SimulationResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!("\n=== Simulation Results ===");
    println!("Sessions:      {}", results.runs);
    println!("Avg questions: {:.2} (max {})", results.avg_questions, results.max_questions);
    println!("Avg matches:   {:.2}", results.avg_matches);
    println!("Max rounds:    {}", results.max_rounds);

    println!("\nMost picked:");
    for (name, wins) in &results.top_winners {
        println!("  {:>4}  {}", wins, name);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One session with uniformly random answers and picks
fn play_random_session<S: DishSource, R: Rng>(
    run: usize,
    source: S,
    config: EngineConfig,
    chooser: &mut R,
) -> Result<SessionRecord> {
    let mut engine = GameEngine::new(source, config);
    engine.start()?;

    let mut contenders = 0;
    for _ in 0..MAX_EVENTS {
        match engine.phase() {
            Phase::Narrowing => {
                let Some(answer) = engine
                    .question()
                    .and_then(|q| q.options.choose(chooser))
                    .cloned()
                else {
                    bail!("Run {} stalled with no question on {} dishes", run, engine.pool().len());
                };
                engine.submit_answer(&answer)?;
            }
            Phase::Duel => {
                if contenders == 0 {
                    contenders = engine.pool().len();
                }
                let Some((kind, pick)) = engine
                    .current_match()
                    .and_then(|m| m.contenders.choose(chooser).map(|d| (m.kind, d.id.clone())))
                else {
                    bail!("Run {} has no active match", run);
                };
                match kind {
                    MatchKind::Duel => engine.submit_duel_choice(&pick)?,
                    MatchKind::Quad => engine.submit_quad_choice(&pick)?,
                }
            }
            Phase::Result => {
                let Some(winner) = engine.winner() else {
                    bail!("Run {} finished without a winner", run);
                };
                let (matches, rounds) = engine
                    .bracket()
                    .map(|b| (b.history().len(), b.round()))
                    .unwrap_or((0, 0));

                tracing::debug!("Run {} picked {}", run, winner.name);
                return Ok(SessionRecord {
                    run,
                    questions: engine.memory().asked_count(),
                    matches,
                    rounds,
                    contenders: contenders.max(1),
                    winner_id: winner.id.clone(),
                    winner_name: winner.name.clone(),
                });
            }
            Phase::Loading => bail!("Run {} is stuck loading", run),
        }
    }

    bail!("Run {} did not finish within {} events", run, MAX_EVENTS)
}

fn compute_statistics(records: &[SessionRecord], top: usize) -> SimulationResults {
    let runs = records.len();
    let mean = |total: usize| {
        if runs == 0 {
            0.0
        } else {
            total as f64 / runs as f64
        }
    };

    let mut tally: FxHashMap<&str, usize> = FxHashMap::default();
    for record in records {
        *tally.entry(record.winner_name.as_str()).or_insert(0) += 1;
    }
    let mut top_winners: Vec<(String, usize)> = tally
        .into_iter()
        .map(|(name, wins)| (name.to_string(), wins))
        .collect();
    top_winners.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_winners.truncate(top);

    SimulationResults {
        runs,
        avg_questions: mean(records.iter().map(|r| r.questions).sum()),
        max_questions: records.iter().map(|r| r.questions).max().unwrap_or(0),
        avg_matches: mean(records.iter().map(|r| r.matches).sum()),
        max_rounds: records.iter().map(|r| r.rounds).max().unwrap_or(0),
        top_winners,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Per-run seeds: consecutive from `seed`, or drawn from entropy
fn run_seeds(runs: usize, seed: Option<u64>) -> Vec<u64> {
    match seed {
        Some(s) => (0..runs as u64).map(|i| s.wrapping_add(i)).collect(),
        None => {
            let mut rng = ChaCha8Rng::from_entropy();
            (0..runs).map(|_| rng.gen()).collect()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
