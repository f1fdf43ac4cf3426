//! Game engine - the event-driven state machine for one play-through
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: dispatch (orchestration)
//! - Level 2: start, submit_answer, submit_duel_choice, submit_quad_choice (phases)
//! - Level 3: prepare_narrowing, start_tournament (steps)
//! - Level 4: accessors and snapshot

use platepick_core::{Dish, DishSource};
use platepick_questions::{Question, QuestionMemory};
use platepick_tournament::{Bracket, MatchKind, Matchup, Progress};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::narrowing::{apply_answer, next_step, Filtered, HandOffReason, NarrowingStep};

/// Where the play-through stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for dishes (or stuck on a fetch error)
    Loading,
    /// A question is being asked
    Narrowing,
    /// The bracket is running
    Duel,
    /// A winner has been chosen
    Result,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Loading => "loading",
            Phase::Narrowing => "narrowing",
            Phase::Duel => "dueling",
            Phase::Result => "showing the result",
        };
        f.write_str(name)
    }
}

/// External inputs the engine reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Restart,
    Answer(String),
    DuelChoice(String),
    QuadChoice(String),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Restart => "restart",
            Event::Answer(_) => "answer a question",
            Event::DuelChoice(_) => "resolve a duel",
            Event::QuadChoice(_) => "resolve a quad",
        }
    }
}

/// What happened to an answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Pool shrank to `remaining` dishes
    Narrowed { remaining: usize },
    /// Answer matched nothing; question dropped, pool untouched
    Discarded,
}

/// Read-only snapshot for renderers
#[derive(Clone, Debug)]
pub struct EngineView<'a> {
    pub phase: Phase,
    pub pool: &'a [Dish],
    pub question: Option<&'a Question>,
    pub matchup: Option<Matchup<'a>>,
    pub winner: Option<&'a Dish>,
    pub error: Option<&'a str>,
    pub questions_asked: usize,
}

/// Single-owner engine: all session state lives here and changes only through events
pub struct GameEngine<S, R = ChaCha8Rng> {
    source: S,
    rng: R,
    config: EngineConfig,
    phase: Phase,
    pool: Vec<Dish>,
    question: Option<Question>,
    bracket: Option<Bracket>,
    winner: Option<Dish>,
    error: Option<String>,
    memory: QuestionMemory,
}

impl<S: DishSource> GameEngine<S, ChaCha8Rng> {
    /// Create an engine seeded from `config.seed` (entropy when unset)
    pub fn new(source: S, config: EngineConfig) -> Self {
        let rng = create_rng(config.seed);
        Self::with_rng(source, config, rng)
    }
}

impl<S: DishSource, R: Rng> GameEngine<S, R> {
    /// Create an engine drawing randomness from `rng`
    pub fn with_rng(source: S, config: EngineConfig, rng: R) -> Self {
        Self {
            source,
            rng,
            config,
            phase: Phase::Loading,
            pool: Vec::new(),
            question: None,
            bracket: None,
            winner: None,
            error: None,
            memory: QuestionMemory::new(),
        }
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Apply one event to completion and report the resulting phase
    pub fn dispatch(&mut self, event: Event) -> Result<Phase> {
        match event {
            Event::Start => self.start()?,
            Event::Restart => self.restart()?,
            Event::Answer(answer) => {
                self.submit_answer(&answer)?;
            }
            Event::DuelChoice(id) => self.submit_duel_choice(&id)?,
            Event::QuadChoice(id) => self.submit_quad_choice(&id)?,
        }
        Ok(self.phase)
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Reset all session state and fetch a fresh pool
    pub fn start(&mut self) -> Result<()> {
        self.reset();

        let dishes = match self.source.fetch_dishes() {
            Ok(dishes) if !dishes.is_empty() => dishes,
            Ok(_) => return Err(self.fail_loading("No dishes found".to_string())),
            Err(e) => return Err(self.fail_loading(e.to_string())),
        };

        tracing::info!("Loaded {} dishes", dishes.len());
        self.prepare_narrowing(dishes)
    }

    /// Discard everything in flight and start over
    pub fn restart(&mut self) -> Result<()> {
        tracing::info!("Restarting session");
        self.start()
    }

    /// Answer the active question
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome> {
        let question = match (&self.phase, &self.question) {
            (Phase::Narrowing, Some(question)) => question,
            _ => return Err(self.invalid(&Event::Answer(answer.to_string()))),
        };

        match apply_answer(&self.pool, question, answer) {
            Filtered::Empty => {
                tracing::warn!(
                    "Answer {:?} to {} left no dishes, ignoring question",
                    answer,
                    question.id
                );
                self.question = None;
                Ok(AnswerOutcome::Discarded)
            }
            Filtered::Narrowed(kept) => {
                let remaining = kept.len();
                tracing::debug!("Answer {:?} narrowed pool {} -> {}", answer, self.pool.len(), remaining);
                self.prepare_narrowing(kept)?;
                Ok(AnswerOutcome::Narrowed { remaining })
            }
        }
    }

    /// Pick the winner of the active duel
    pub fn submit_duel_choice(&mut self, dish_id: &str) -> Result<()> {
        self.resolve_match(MatchKind::Duel, dish_id)
    }

    /// Pick the winner of the active four-way match
    pub fn submit_quad_choice(&mut self, dish_id: &str) -> Result<()> {
        self.resolve_match(MatchKind::Quad, dish_id)
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Ask another question about `pool` or hand it to the tournament
    fn prepare_narrowing(&mut self, pool: Vec<Dish>) -> Result<()> {
        self.pool = pool;

        match next_step(&self.pool, &self.memory, &self.config, &mut self.rng) {
            NarrowingStep::Ask(question) => {
                tracing::debug!(
                    "Asking {} ({} options) on pool of {}",
                    question.id,
                    question.options.len(),
                    self.pool.len()
                );
                self.memory.record(&question);
                self.question = Some(question);
                self.phase = Phase::Narrowing;
                Ok(())
            }
            NarrowingStep::HandOff(reason) => {
                match reason {
                    HandOffReason::SmallPool => {
                        tracing::info!("Pool of {} is small enough for duels", self.pool.len())
                    }
                    HandOffReason::NoQuestion => {
                        tracing::info!("No question left for pool of {}, starting duels", self.pool.len())
                    }
                }
                self.start_tournament()
            }
        }
    }

    fn start_tournament(&mut self) -> Result<()> {
        self.question = None;

        let contenders = std::mem::take(&mut self.pool);
        let bracket = match Bracket::start(contenders, &self.config.bracket, &mut self.rng) {
            Ok(bracket) => bracket,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        match bracket.champion() {
            Some(champion) => self.crown(champion.clone()),
            None => {
                self.pool = bracket.current_round().to_vec();
                self.phase = Phase::Duel;
            }
        }
        self.bracket = Some(bracket);
        Ok(())
    }

    fn resolve_match(&mut self, kind: MatchKind, dish_id: &str) -> Result<()> {
        let active = self.current_match().map(|m| m.kind);
        let bracket = match self.bracket.as_mut() {
            Some(bracket) if active == Some(kind) => bracket,
            _ => {
                let event = match kind {
                    MatchKind::Duel => Event::DuelChoice(dish_id.to_string()),
                    MatchKind::Quad => Event::QuadChoice(dish_id.to_string()),
                };
                return Err(self.invalid(&event));
            }
        };

        match bracket.resolve(kind, dish_id)? {
            Progress::Continue => {
                self.pool = bracket.remaining().into_iter().cloned().collect();
            }
            Progress::Champion(champion) => self.crown(champion),
        }
        Ok(())
    }

    fn crown(&mut self, champion: Dish) {
        tracing::info!("Winner: {} ({})", champion.name, champion.id);
        self.pool = vec![champion.clone()];
        self.winner = Some(champion);
        self.phase = Phase::Result;
    }

    fn reset(&mut self) {
        self.phase = Phase::Loading;
        self.pool.clear();
        self.question = None;
        self.bracket = None;
        self.winner = None;
        self.error = None;
        self.memory.clear();
    }

    fn fail_loading(&mut self, reason: String) -> EngineError {
        tracing::warn!("Failed to load dishes: {}", reason);
        self.error = Some(reason.clone());
        EngineError::DataUnavailable { reason }
    }

    fn invalid(&self, event: &Event) -> EngineError {
        EngineError::InvalidEvent {
            event: event.name(),
            phase: self.phase,
        }
    }

    // ========================================================================
    // Level 4 - Accessors
    // ========================================================================

    /// Snapshot of everything a renderer needs
    pub fn state(&self) -> EngineView<'_> {
        EngineView {
            phase: self.phase,
            pool: &self.pool,
            question: self.question(),
            matchup: self.current_match(),
            winner: self.winner(),
            error: self.error(),
            questions_asked: self.memory.asked_count(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Currently alive dishes
    pub fn pool(&self) -> &[Dish] {
        &self.pool
    }

    pub fn question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Narrowing => self.question.as_ref(),
            _ => None,
        }
    }

    pub fn current_match(&self) -> Option<Matchup<'_>> {
        match self.phase {
            Phase::Duel => self.bracket.as_ref().and_then(|b| b.current_match()),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Dish> {
        self.winner.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Bracket of the current session, once the tournament has started
    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    pub fn memory(&self) -> &QuestionMemory {
        &self.memory
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
