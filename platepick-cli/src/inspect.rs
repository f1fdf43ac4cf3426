//! Inspect command - show the question axes a catalog offers
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: analyze() - mine and group on the full catalog
//! - Level 3: print_text_report(), print_json_report()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use platepick_core::{AttributeKind, Dish};
use platepick_questions::{group_candidates, mine_candidates, Candidate, MinerConfig};

use crate::CatalogArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// A question the miner could ask on the full pool
#[derive(Clone, Debug, Serialize)]
struct QuestionSummary {
    id: String,
    kind: AttributeKind,
    weight: f64,
    options: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct InspectReport {
    pool_size: usize,
    candidates: Vec<Candidate>,
    questions: Vec<QuestionSummary>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run inspect command
pub fn run(args: InspectArgs, seed: Option<u64>) -> Result<()> {
    let catalog = args.catalog.load(seed)?;
    let config = args.catalog.engine_config(seed);

    let report = analyze(catalog.dishes(), &config.miner);
    tracing::info!(
        "{} candidates, {} possible questions",
        report.candidates.len(),
        report.questions.len()
    );

    if args.json {
        print_json_report(&report)?;
    } else {
        print_text_report(&report);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn analyze(pool: &[Dish], config: &MinerConfig) -> InspectReport {
    let mut candidates = mine_candidates(pool, config);
    candidates.sort_by(|a, b| {
        a.kind.cmp(&b.kind).then_with(|| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.value.cmp(&b.value))
        })
    });

    let questions = group_candidates(&candidates, config)
        .into_iter()
        .map(|group| QuestionSummary {
            options: group.option_values().map(str::to_string).collect(),
            id: group.id,
            kind: group.kind,
            weight: group.weight,
        })
        .collect();

    InspectReport {
        pool_size: pool.len(),
        candidates,
        questions,
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_json_report(report: &InspectReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_text_report(report: &InspectReport) {
    println!("\n=== Catalog Axes ===");
    println!("Dishes:     {}", report.pool_size);
    println!("Candidates: {}", report.candidates.len());

    println!("\n{:<20} {:<24} {:>8} {:>7} {:>7}", "KIND", "VALUE", "SUPPORT", "RATIO", "WEIGHT");
    for candidate in &report.candidates {
        println!(
            "{:<20} {:<24} {:>8.1} {:>6.1}% {:>7.3}",
            candidate.kind.to_string(),
            truncate(&candidate.value, 24),
            candidate.support,
            candidate.ratio * 100.0,
            candidate.weight
        );
    }

    println!("\nPossible first questions:");
    if report.questions.is_empty() {
        println!("  (none, the pool would go straight to the tournament)");
    }
    for question in &report.questions {
        println!("  {:>6.3}  {}", question.weight, question.id);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}~", kept)
    }
}

// ============================================================================
// TESTS
// ============================================================================
