//! Play command - one interactive session in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_session() - read, dispatch, render loop
//! - Level 3: render(), resolve_pick()
//! - Level 4: input parsing and formatting

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;

use platepick_core::{Dish, DishSource};
use platepick_engine::{AnswerOutcome, EngineView, GameEngine, Phase};
use platepick_tournament::MatchKind;

use crate::CatalogArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// One line of user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Zero-based index into the listed choices
    Pick(usize),
    Restart,
    Quit,
    Unknown,
}

/// What a pick resolves to, detached from the engine borrow
enum Pick {
    Answer(String),
    Match(MatchKind, String),
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let source = args.catalog.load(seed)?;
    let config = args.catalog.engine_config(seed);
    let mut engine = GameEngine::new(source, config);

    if let Err(e) = engine.start() {
        tracing::warn!("Session did not start: {}", e);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_session(&mut engine, stdin.lock(), stdout.lock())? {
        Some(winner) => tracing::info!("Session finished with {}", winner.id),
        None => tracing::info!("Session ended without a winner"),
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Drive `engine` from `input` until the user quits or input runs out.
///
/// Returns the winner shown last, if any.
pub fn run_session<S, R, B, W>(engine: &mut GameEngine<S, R>, input: B, mut out: W) -> Result<Option<Dish>>
where
    S: DishSource,
    R: Rng,
    B: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        let choices = render(&engine.state(), &mut out)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        match parse_command(&line, choices) {
            Command::Quit => break,
            Command::Restart => {
                if let Err(e) = engine.restart() {
                    writeln!(out, "{}", e)?;
                }
            }
            Command::Unknown => {
                writeln!(out, "Type a number from the list, r to restart or q to quit")?;
            }
            Command::Pick(index) => {
                if let Some(message) = resolve_pick(engine, index) {
                    writeln!(out, "{}", message)?;
                }
            }
        }
    }

    writeln!(out)?;
    Ok(engine.winner().cloned())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Forward the picked choice to the engine; returns a message for the user, if any
fn resolve_pick<S: DishSource, R: Rng>(engine: &mut GameEngine<S, R>, index: usize) -> Option<String> {
    let pick = {
        let view = engine.state();
        if let Some(question) = view.question {
            question.options.get(index).cloned().map(Pick::Answer)
        } else if let Some(matchup) = view.matchup {
            matchup
                .contenders
                .get(index)
                .map(|dish| Pick::Match(matchup.kind, dish.id.clone()))
        } else {
            None
        }
    }?;

    let result = match pick {
        Pick::Answer(answer) => engine.submit_answer(&answer).map(|outcome| match outcome {
            AnswerOutcome::Discarded => Some("No dish matches that answer. Type r to start over.".to_string()),
            AnswerOutcome::Narrowed { .. } => None,
        }),
        Pick::Match(MatchKind::Duel, id) => engine.submit_duel_choice(&id).map(|_| None),
        Pick::Match(MatchKind::Quad, id) => engine.submit_quad_choice(&id).map(|_| None),
    };

    result.unwrap_or_else(|e| Some(e.to_string()))
}

/// Print the current state; returns how many numbered choices were listed
fn render<W: Write>(view: &EngineView<'_>, out: &mut W) -> io::Result<usize> {
    match view.phase {
        Phase::Loading => {
            if let Some(error) = view.error {
                writeln!(out, "\nCould not load dishes: {}", error)?;
            }
            writeln!(out, "Type r to retry or q to quit")?;
            Ok(0)
        }
        Phase::Narrowing => match view.question {
            Some(question) => {
                writeln!(out, "\n{} ({} dishes left)", question.prompt, view.pool.len())?;
                for (i, (label, hint)) in question.labels.iter().zip(&question.hints).enumerate() {
                    writeln!(out, "  {}. {:<24} {}", i + 1, label, hint)?;
                }
                Ok(question.options.len())
            }
            None => {
                writeln!(out, "\nNothing left to ask about these {} dishes.", view.pool.len())?;
                writeln!(out, "Type r to start over or q to quit")?;
                Ok(0)
            }
        },
        Phase::Duel => match &view.matchup {
            Some(matchup) => {
                let heading = match matchup.kind {
                    MatchKind::Duel => "Which one?",
                    MatchKind::Quad => "Pick your favourite of four",
                };
                writeln!(out, "\n{} ({} dishes still in)", heading, view.pool.len())?;
                for (i, dish) in matchup.contenders.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, describe(dish))?;
                }
                Ok(matchup.contenders.len())
            }
            None => Ok(0),
        },
        Phase::Result => {
            if let Some(winner) = view.winner {
                writeln!(out, "\nYour dish: {}", describe(winner))?;
                if !winner.image.is_empty() {
                    writeln!(out, "  {}", winner.image)?;
                }
            }
            writeln!(out, "Type r to play again or q to quit")?;
            Ok(0)
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str, choices: usize) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => Command::Quit,
        "r" | "restart" => Command::Restart,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => Command::Pick(n - 1),
            _ => Command::Unknown,
        },
    }
}

/// `Name (cuisine, cuisine)`
fn describe(dish: &Dish) -> String {
    if dish.cuisines.is_empty() {
        dish.name.clone()
    } else {
        format!("{} ({})", dish.name, dish.cuisines.join(", "))
    }
}

// ============================================================================
// TESTS
// ============================================================================
