//! Single-elimination bracket driven by user picks
//!
//! Level 1 - Orchestration and Level 2 - Phases

use platepick_core::Dish;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{BracketConfig, DUEL_SIZE, QUAD_SIZE};

/// Errors raised by the bracket
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TournamentError {
    #[error("No dishes available for duels")]
    NoContenders,

    #[error("Tournament already has a winner")]
    Finished,

    #[error("A {active} match is active, not a {requested}")]
    WrongMatchKind {
        requested: MatchKind,
        active: MatchKind,
    },
}

/// Shape of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Pairwise choice
    Duel,
    /// Four-way choice
    Quad,
}

impl MatchKind {
    /// Number of contenders consumed by the match
    pub fn size(self) -> usize {
        match self {
            MatchKind::Duel => DUEL_SIZE,
            MatchKind::Quad => QUAD_SIZE,
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Duel => f.write_str("duel"),
            MatchKind::Quad => f.write_str("quad"),
        }
    }
}

/// The match waiting for a pick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matchup<'a> {
    pub kind: MatchKind,
    pub contenders: &'a [Dish],
}

/// A resolved match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    /// 1-based round number
    pub round: u32,
    pub kind: MatchKind,
    /// Contender ids in presentation order
    pub contenders: Vec<String>,
    pub winner: String,
    /// Submitted id was not a participant and fell back to the first contender
    pub coerced: bool,
}

/// What a resolution led to
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    /// Another match is waiting
    Continue,
    /// The bracket is decided
    Champion(Dish),
}

/// Bracket state: the current round's queue and the winners advancing from it
#[derive(Clone, Debug)]
pub struct Bracket {
    current: Vec<Dish>,
    next: Vec<Dish>,
    round: u32,
    quad_threshold: usize,
    champion: Option<Dish>,
    history: Vec<MatchRecord>,
}

impl Bracket {
    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Seed a bracket from the handed-off pool.
    ///
    /// Pools above the entry cap are sampled down uniformly. A single
    /// contender wins immediately.
    pub fn start<R: Rng + ?Sized>(
        contenders: Vec<Dish>,
        config: &BracketConfig,
        rng: &mut R,
    ) -> Result<Self, TournamentError> {
        let seeded = seed_contenders(contenders, config.entry_cap, rng);

        let mut bracket = Self {
            current: Vec::new(),
            next: Vec::new(),
            round: 1,
            quad_threshold: config.quad_threshold(),
            champion: None,
            history: Vec::new(),
        };

        match seeded.len() {
            0 => return Err(TournamentError::NoContenders),
            1 => {
                bracket.champion = seeded.into_iter().next();
                tracing::info!("Single contender, no matches needed");
            }
            n => {
                tracing::info!("Bracket seeded with {} contenders", n);
                bracket.current = seeded;
            }
        }

        Ok(bracket)
    }

    /// Resolve the active match with the picked dish id.
    ///
    /// An id that is not among the contenders resolves to the first contender.
    pub fn resolve(&mut self, requested: MatchKind, winner_id: &str) -> Result<Progress, TournamentError> {
        let active = self.current_match().ok_or(TournamentError::Finished)?.kind;
        if active != requested {
            return Err(TournamentError::WrongMatchKind { requested, active });
        }

        let contenders: Vec<Dish> = self.current.drain(..active.size()).collect();
        let (winner, coerced) = pick_winner(&contenders, winner_id);
        if coerced {
            tracing::debug!(
                "Pick {:?} is not in the {}, defaulting to {}",
                winner_id,
                active,
                winner.id
            );
        }

        self.history.push(MatchRecord {
            round: self.round,
            kind: active,
            contenders: contenders.iter().map(|d| d.id.clone()).collect(),
            winner: winner.id.clone(),
            coerced,
        });
        self.next.push(winner);

        Ok(self.close_round_if_done())
    }

    pub fn resolve_duel(&mut self, winner_id: &str) -> Result<Progress, TournamentError> {
        self.resolve(MatchKind::Duel, winner_id)
    }

    pub fn resolve_quad(&mut self, winner_id: &str) -> Result<Progress, TournamentError> {
        self.resolve(MatchKind::Quad, winner_id)
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// End-of-round bookkeeping: bye for a lone leftover, crown or start the next round
    fn close_round_if_done(&mut self) -> Progress {
        if self.current.len() > 1 {
            return Progress::Continue;
        }

        if let Some(bye) = self.current.pop() {
            tracing::debug!("{} gets a bye in round {}", bye.name, self.round);
            self.next.push(bye);
        }

        if self.next.len() == 1 {
            let champion = self.next.remove(0);
            tracing::info!("Champion after {} rounds: {}", self.round, champion.name);
            self.current.clear();
            self.champion = Some(champion.clone());
            return Progress::Champion(champion);
        }

        self.current = std::mem::take(&mut self.next);
        self.round += 1;
        tracing::debug!(
            "Round {} begins with {} contenders",
            self.round,
            self.current.len()
        );
        Progress::Continue
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The match waiting for a pick, if any
    pub fn current_match(&self) -> Option<Matchup<'_>> {
        if self.champion.is_some() {
            return None;
        }
        let kind = if self.current.len() >= self.quad_threshold {
            MatchKind::Quad
        } else if self.current.len() >= DUEL_SIZE {
            MatchKind::Duel
        } else {
            return None;
        };
        Some(Matchup {
            kind,
            contenders: &self.current[..kind.size()],
        })
    }

    pub fn champion(&self) -> Option<&Dish> {
        self.champion.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.champion.is_some()
    }

    /// 1-based number of the round in progress (or the last round played)
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Dishes awaiting a match this round
    pub fn current_round(&self) -> &[Dish] {
        &self.current
    }

    /// Dishes already through to the next round
    pub fn next_round(&self) -> &[Dish] {
        &self.next
    }

    /// Every dish still alive
    pub fn remaining(&self) -> Vec<&Dish> {
        match &self.champion {
            Some(champion) => vec![champion],
            None => self.current.iter().chain(self.next.iter()).collect(),
        }
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Cap the field with a uniform sample (Fisher-Yates shuffle, then truncate)
pub fn seed_contenders<R: Rng + ?Sized>(mut contenders: Vec<Dish>, cap: usize, rng: &mut R) -> Vec<Dish> {
    if contenders.len() > cap {
        contenders.shuffle(rng);
        contenders.truncate(cap);
    }
    contenders
}

/// Winner among `contenders`, falling back to the first one
fn pick_winner(contenders: &[Dish], winner_id: &str) -> (Dish, bool) {
    match contenders.iter().find(|d| d.id == winner_id) {
        Some(dish) => (dish.clone(), false),
        None => (contenders[0].clone(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn field(n: usize) -> Vec<Dish> {
        (0..n).map(|i| Dish::new(format!("d{}", i), format!("Dish {}", i))).collect()
    }

    fn ids(dishes: &[Dish]) -> Vec<&str> {
        dishes.iter().map(|d| d.id.as_str()).collect()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Always pick the last contender of whatever match is active
    fn play_out(bracket: &mut Bracket) -> Dish {
        let mut steps = 0;
        loop {
            let matchup = bracket.current_match().expect("match should be active");
            let kind = matchup.kind;
            let pick = matchup.contenders.last().unwrap().id.clone();
            match bracket.resolve(kind, &pick).unwrap() {
                Progress::Champion(dish) => return dish,
                Progress::Continue => {}
            }
            steps += 1;
            assert!(steps < 100, "bracket did not terminate");
        }
    }

    #[test]
    fn test_empty_field_is_an_error() {
        let result = Bracket::start(Vec::new(), &BracketConfig::default(), &mut rng());
        assert_eq!(result.err(), Some(TournamentError::NoContenders));
    }

    #[test]
    fn test_single_contender_wins_immediately() {
        let bracket = Bracket::start(field(1), &BracketConfig::default(), &mut rng()).unwrap();
        assert!(bracket.is_finished());
        assert_eq!(bracket.champion().unwrap().id, "d0");
        assert!(bracket.current_match().is_none());
        assert!(bracket.history().is_empty());
    }

    #[test]
    fn test_three_contenders_duel_then_bye() {
        let mut bracket = Bracket::start(field(3), &BracketConfig::default(), &mut rng()).unwrap();

        let matchup = bracket.current_match().unwrap();
        assert_eq!(matchup.kind, MatchKind::Duel);
        assert_eq!(ids(matchup.contenders), vec!["d0", "d1"]);

        assert_eq!(bracket.resolve_duel("d1").unwrap(), Progress::Continue);
        assert_eq!(bracket.round(), 2);
        assert_eq!(ids(bracket.current_round()), vec!["d1", "d2"]);

        let progress = bracket.resolve_duel("d2").unwrap();
        assert_eq!(progress, Progress::Champion(field(3)[2].clone()));
        assert_eq!(bracket.champion().unwrap().id, "d2");
        assert!(bracket.current_round().is_empty());
        assert!(bracket.next_round().is_empty());
    }

    #[test]
    fn test_quad_offered_from_four() {
        let mut bracket = Bracket::start(field(5), &BracketConfig::default(), &mut rng()).unwrap();
        let matchup = bracket.current_match().unwrap();
        assert_eq!(matchup.kind, MatchKind::Quad);
        assert_eq!(ids(matchup.contenders), vec!["d0", "d1", "d2", "d3"]);

        // Quad winner plus d4 on a bye
        assert_eq!(bracket.resolve_quad("d2").unwrap(), Progress::Continue);
        assert_eq!(ids(bracket.current_round()), vec!["d2", "d4"]);
        assert_eq!(bracket.current_match().unwrap().kind, MatchKind::Duel);
    }

    #[test]
    fn test_wrong_match_kind_is_rejected() {
        let mut bracket = Bracket::start(field(4), &BracketConfig::default(), &mut rng()).unwrap();
        let err = bracket.resolve_duel("d0").unwrap_err();
        assert_eq!(
            err,
            TournamentError::WrongMatchKind {
                requested: MatchKind::Duel,
                active: MatchKind::Quad
            }
        );
        // Nothing consumed
        assert_eq!(bracket.current_round().len(), 4);
        assert!(bracket.history().is_empty());
    }

    #[test]
    fn test_unknown_pick_defaults_to_first() {
        let mut bracket = Bracket::start(field(2), &BracketConfig::default(), &mut rng()).unwrap();
        let progress = bracket.resolve_duel("not-a-dish").unwrap();
        assert_eq!(progress, Progress::Champion(field(2)[0].clone()));
        assert!(bracket.history()[0].coerced);

        let mut bracket = Bracket::start(field(6), &BracketConfig::default(), &mut rng()).unwrap();
        assert_eq!(bracket.resolve_quad("d5").unwrap(), Progress::Continue);
        assert_eq!(bracket.history()[0].winner, "d0");
        assert!(bracket.history()[0].coerced);
    }

    #[test]
    fn test_resolving_after_champion_fails() {
        let mut bracket = Bracket::start(field(2), &BracketConfig::default(), &mut rng()).unwrap();
        bracket.resolve_duel("d0").unwrap();
        assert_eq!(bracket.resolve_duel("d0").unwrap_err(), TournamentError::Finished);
    }

    #[test]
    fn test_all_sizes_terminate_with_member_winner() {
        for n in 2..=40 {
            let original = field(n);
            let mut bracket = Bracket::start(original.clone(), &BracketConfig::default(), &mut rng()).unwrap();
            let winner = play_out(&mut bracket);
            assert!(original.contains(&winner), "winner not from field of {}", n);
            assert_eq!(bracket.remaining(), vec![&winner]);
            // log2(34) rounds of halving, at most
            assert!(bracket.round() <= 6, "{} contenders took {} rounds", n, bracket.round());
        }
    }

    #[test]
    fn test_pairwise_only_never_offers_quads() {
        let mut bracket = Bracket::start(field(9), &BracketConfig::pairwise_only(), &mut rng()).unwrap();
        play_out(&mut bracket);
        assert!(bracket.history().iter().all(|m| m.kind == MatchKind::Duel));
        assert_eq!(bracket.history().len(), 8);
    }

    #[test]
    fn test_entry_cap_samples_distinct_members() {
        let original = field(100);
        let mut rng = rng();
        let seeded = seed_contenders(original.clone(), 34, &mut rng);
        assert_eq!(seeded.len(), 34);

        let unique: HashSet<&str> = seeded.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(unique.len(), 34);
        assert!(seeded.iter().all(|d| original.contains(d)));

        let bracket = Bracket::start(original, &BracketConfig::default(), &mut rng).unwrap();
        assert_eq!(bracket.current_round().len(), 34);
    }

    #[test]
    fn test_small_field_keeps_order() {
        let seeded = seed_contenders(field(8), 34, &mut rng());
        assert_eq!(ids(&seeded), vec!["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7"]);
    }

    #[test]
    fn test_history_records_rounds() {
        let mut bracket = Bracket::start(field(4), &BracketConfig::default(), &mut rng()).unwrap();
        let progress = bracket.resolve_quad("d3").unwrap();
        assert_eq!(progress, Progress::Champion(field(4)[3].clone()));
        let record = &bracket.history()[0];
        assert_eq!(record.round, 1);
        assert_eq!(record.kind, MatchKind::Quad);
        assert_eq!(record.contenders, vec!["d0", "d1", "d2", "d3"]);
        assert_eq!(record.winner, "d3");
        assert!(!record.coerced);
    }
}
