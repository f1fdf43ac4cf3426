//! Integration tests for Platepick
//!
//! Tests the full stack: catalog loading, question generation, the bracket,
//! and the engine driving them together

use std::collections::HashSet;
use std::io::Write;

use platepick_core::{CatalogError, CatalogSource, Dish, DishSource, ProteinType};
use platepick_engine::{AnswerOutcome, EngineConfig, EngineError, Event, GameEngine, Phase};
use platepick_tournament::{BracketConfig, MatchKind};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const PROTEINS: [&str; 4] = ["meat", "seafood", "vegetarian", "vegan"];
const FLAVORS: [&str; 6] = ["sweet", "savory", "umami", "sour", "smoky", "tangy"];
const TEXTURES: [&str; 4] = ["crispy", "creamy", "chewy", "brothy"];
const CUISINES: [&str; 5] = ["Thai", "Italian", "Mexican", "Indian", "Japanese"];

/// A well-formed catalog record
fn record(i: usize) -> Value {
    json!({
        "id": format!("http://www.wikidata.org/entity/Q{}", 1000 + i),
        "name": format!("Dish {}", i),
        "image": format!("https://img.example/{}.jpg", i),
        "cuisines": [CUISINES[i % CUISINES.len()]],
        "ingredients": [],
        "categories": [],
        "ai": {
            "proteinType": PROTEINS[i % PROTEINS.len()],
            "flavorProfile": [FLAVORS[i % FLAVORS.len()], FLAVORS[(i / 2) % FLAVORS.len()]],
            "textureProfile": [TEXTURES[(i / 3) % TEXTURES.len()]],
            "servingTemperature": if i % 2 == 0 { "hot" } else { "cold" },
            "spiceLevel": (i % 6) as f64,
            "aiConfidence": 0.8,
        }
    })
}

/// Catalog of `n` good records plus records the loader must drop
fn catalog_json(n: usize) -> String {
    let mut records: Vec<Value> = (0..n).map(record).collect();
    records.push(json!({
        "id": "http://www.wikidata.org/entity/Q77",
        "name": "Q77",
        "image": "https://img.example/q77.jpg"
    }));
    records.push(json!({
        "id": "no-image",
        "name": "Mystery Stew",
        "image": "  "
    }));
    Value::Array(records).to_string()
}

fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn load_catalog(n: usize, seed: u64) -> CatalogSource {
    let file = write_catalog(&catalog_json(n));
    CatalogSource::load(file.path()).unwrap().with_seed(seed)
}

/// Answer and pick at random until a winner is chosen; returns the winner and event count
fn play_out<S: DishSource>(engine: &mut GameEngine<S>, rng: &mut ChaCha8Rng) -> (Dish, usize) {
    for events in 0..1000 {
        match engine.phase() {
            Phase::Narrowing => {
                let question = engine.question().expect("narrowing without a question");
                let answer = question.options.choose(rng).unwrap().clone();
                let outcome = engine.submit_answer(&answer).unwrap();
                assert!(matches!(outcome, AnswerOutcome::Narrowed { .. }));
            }
            Phase::Duel => {
                let matchup = engine.current_match().expect("duel phase without a match");
                let pick = matchup.contenders.choose(rng).unwrap().id.clone();
                let event = match matchup.kind {
                    MatchKind::Duel => Event::DuelChoice(pick),
                    MatchKind::Quad => Event::QuadChoice(pick),
                };
                engine.dispatch(event).unwrap();
            }
            Phase::Result => return (engine.winner().unwrap().clone(), events),
            Phase::Loading => panic!("engine stuck loading"),
        }
    }
    panic!("session did not finish");
}

// ============================================================================
// CATALOG TESTS
// ============================================================================

#[test]
fn test_catalog_drops_incomplete_and_placeholder_records() {
    let catalog = load_catalog(20, 1);
    assert_eq!(catalog.len(), 20);
    assert!(catalog.dishes().iter().all(|d| d.name.starts_with("Dish ")));
}

#[test]
fn test_catalog_normalizes_attributes() {
    let catalog = load_catalog(12, 1);
    let dish = &catalog.dishes()[1];

    assert_eq!(dish.cuisines, vec!["italian"]);
    let ai = dish.ai.as_ref().unwrap();
    assert_eq!(ai.protein_type, ProteinType::Seafood);
    assert_eq!(ai.spice_level, 1);
    assert!((ai.ai_confidence - 0.8).abs() < 1e-6);
    assert_eq!(ai.adventure_level, 3);
}

#[test]
fn test_catalog_sanitizes_messy_enrichment() {
    let content = json!([{
        "id": "d1",
        "name": "Street Tacos",
        "image": "tacos.jpg",
        "cuisines": [" Mexican "],
        "ai": {
            "flavorProfile": ["Smoky", "smoky", "out-of-vocab", "Tangy"],
            "spiceLevel": 7.6,
            "proteinType": "dragon",
            "courseType": ["Street Food"],
            "aiConfidence": "high"
        }
    }, {
        "id": "d2",
        "name": "Plain Rice",
        "image": "rice.jpg"
    }])
    .to_string();
    let file = write_catalog(&content);
    let catalog = CatalogSource::load(file.path()).unwrap();

    let tacos = &catalog.dishes()[0];
    assert_eq!(tacos.cuisines, vec!["mexican"]);
    let ai = tacos.ai.as_ref().unwrap();
    assert_eq!(ai.flavor_profile, vec!["smoky", "tangy"]);
    assert_eq!(ai.course_type, vec!["street_food"]);
    assert_eq!(ai.spice_level, 5);
    assert_eq!(ai.protein_type, ProteinType::Unknown);
    assert_eq!(ai.ai_confidence, 0.0);

    // Missing enrichment still gets a fully defaulted block
    assert!(catalog.dishes()[1].ai.is_some());
}

#[test]
fn test_catalog_errors() {
    let missing = CatalogSource::load(std::path::Path::new("/nonexistent/catalog.json"));
    assert!(matches!(missing, Err(CatalogError::Io { .. })));

    let malformed = write_catalog("{ not json");
    assert!(matches!(CatalogSource::load(malformed.path()), Err(CatalogError::Parse(_))));

    let only_bad = write_catalog(r#"[{"id": "x", "name": "Q5", "image": "a.jpg"}]"#);
    assert!(matches!(CatalogSource::load(only_bad.path()), Err(CatalogError::Empty)));
}

#[test]
fn test_catalog_fetch_reshuffles() {
    let mut catalog = load_catalog(30, 5);
    let first: Vec<String> = catalog.fetch_dishes().unwrap().into_iter().map(|d| d.id).collect();
    let second: Vec<String> = catalog.fetch_dishes().unwrap().into_iter().map(|d| d.id).collect();

    assert_eq!(first.len(), 30);
    assert_ne!(first, second);
    let a: HashSet<&String> = first.iter().collect();
    let b: HashSet<&String> = second.iter().collect();
    assert_eq!(a, b);
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_full_session_from_catalog() {
    let catalog = load_catalog(60, 7);
    let all_ids: HashSet<String> = catalog.dishes().iter().map(|d| d.id.clone()).collect();

    let mut engine = GameEngine::new(catalog, EngineConfig::default().with_seed(7));
    assert_eq!(engine.dispatch(Event::Start).unwrap(), Phase::Narrowing);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (winner, _) = play_out(&mut engine, &mut rng);

    assert!(all_ids.contains(&winner.id));
    assert_eq!(engine.pool(), std::slice::from_ref(&winner));
    assert!(engine.memory().asked_count() >= 1);
}

#[test]
fn test_many_sessions_terminate() {
    for seed in 0..25 {
        let catalog = load_catalog(80, seed);
        let mut engine = GameEngine::new(catalog, EngineConfig::default().with_seed(seed));
        engine.start().unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (_, events) = play_out(&mut engine, &mut rng);

        let bracket = engine.bracket().expect("every session ends in a bracket");
        let seeded: usize = bracket
            .history()
            .iter()
            .filter(|m| m.round == 1)
            .map(|m| m.contenders.len())
            .sum();
        assert!(seeded <= 34);
        assert!(events <= engine.memory().asked_count() + bracket.history().len());
    }
}

#[test]
fn test_entry_cap_limits_bracket() {
    let catalog = load_catalog(60, 3);
    let config = EngineConfig::default().with_narrowing_threshold(1000).with_seed(3);
    let mut engine = GameEngine::new(catalog, config);
    engine.start().unwrap();

    assert_eq!(engine.phase(), Phase::Duel);
    assert_eq!(engine.pool().len(), 34);
    assert_eq!(engine.current_match().unwrap().kind, MatchKind::Quad);
    assert_eq!(engine.memory().asked_count(), 0);
}

#[test]
fn test_pairwise_only_bracket() {
    let catalog = load_catalog(40, 4);
    let mut config = EngineConfig::default().with_narrowing_threshold(1000).with_seed(4);
    config.bracket = BracketConfig::pairwise_only();
    let mut engine = GameEngine::new(catalog, config);
    engine.start().unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    play_out(&mut engine, &mut rng);

    let history = engine.bracket().unwrap().history();
    assert!(history.iter().all(|m| m.kind == MatchKind::Duel));
    assert_eq!(history.len(), 33);
}

#[test]
fn test_questions_never_repeat_across_session() {
    for seed in 0..10 {
        let catalog = load_catalog(120, seed);
        let mut engine = GameEngine::new(catalog, EngineConfig::default().with_seed(seed));
        engine.start().unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(100 + seed);
        let mut seen = HashSet::new();
        while let Some(question) = engine.question() {
            assert!(seen.insert(question.id.clone()), "repeated {}", question.id);
            assert!((3..=4).contains(&question.options.len()));
            let answer = question.options.choose(&mut rng).unwrap().clone();
            engine.submit_answer(&answer).unwrap();
        }
        assert_eq!(seen.len(), engine.memory().asked_count());
    }
}

#[test]
fn test_restart_begins_a_fresh_session() {
    let catalog = load_catalog(60, 11);
    let mut engine = GameEngine::new(catalog, EngineConfig::default().with_seed(11));
    engine.start().unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    play_out(&mut engine, &mut rng);
    assert_eq!(engine.phase(), Phase::Result);

    assert_eq!(engine.dispatch(Event::Restart).unwrap(), Phase::Narrowing);
    let view = engine.state();
    assert!(view.winner.is_none());
    assert!(view.matchup.is_none());
    assert_eq!(view.questions_asked, 1);
    assert_eq!(view.pool.len(), 60);
}

#[test]
fn test_same_seed_same_winner() {
    let winners: Vec<String> = (0..2)
        .map(|_| {
            let mut engine = GameEngine::new(load_catalog(50, 21), EngineConfig::default().with_seed(21));
            engine.start().unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(21);
            play_out(&mut engine, &mut rng).0.id
        })
        .collect();
    assert_eq!(winners[0], winners[1]);
}

#[test]
fn test_invalid_events_leave_state_untouched() {
    let mut engine = GameEngine::new(load_catalog(60, 13), EngineConfig::default().with_seed(13));
    engine.start().unwrap();

    let question_id = engine.question().unwrap().id.clone();
    let err = engine.dispatch(Event::QuadChoice("d1".to_string())).unwrap_err();

    assert!(matches!(err, EngineError::InvalidEvent { phase: Phase::Narrowing, .. }));
    assert_eq!(engine.question().unwrap().id, question_id);
    assert_eq!(engine.pool().len(), 60);
}
