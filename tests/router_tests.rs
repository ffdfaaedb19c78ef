//! Tests for objective routing.

mod common;

use common::{builtin_profiles, profile};
use nexusllm::routing::strategies::{
    AllBackendsStrategy,
    CheapestHalfStrategy,
    FastestStrategy,
    HighestQualityStrategy,
    SelectionStrategy,
};
use nexusllm::{select_backends, LlmError, ModelRegistry, Objective, QualityClass, SpeedClass};

fn names(profiles: &[nexusllm::BackendProfile]) -> Vec<&str> {
    profiles.iter().map(|p| p.name.as_str()).collect()
}

fn builtin() -> ModelRegistry {
    ModelRegistry::new(builtin_profiles()).unwrap()
}

// ============================================================================
// Objective Parsing Tests
// ============================================================================

#[test]
fn test_objective_from_display_labels() {
    assert_eq!("General".parse::<Objective>().unwrap(), Objective::General);
    assert_eq!("Coding".parse::<Objective>().unwrap(), Objective::Coding);
    assert_eq!("Fast Response".parse::<Objective>().unwrap(), Objective::FastResponse);
    assert_eq!("Cost Saving".parse::<Objective>().unwrap(), Objective::CostSaving);
}

#[test]
fn test_objective_from_snake_case() {
    assert_eq!("fast_response".parse::<Objective>().unwrap(), Objective::FastResponse);
    assert_eq!("COST_SAVING".parse::<Objective>().unwrap(), Objective::CostSaving);
}

#[test]
fn test_objective_unknown() {
    let err = "Cheapest".parse::<Objective>().unwrap_err();
    assert!(matches!(err, LlmError::InvalidParameter(_)));
}

#[test]
fn test_objective_display_round_trip() {
    for objective in Objective::ALL {
        assert_eq!(objective.to_string().parse::<Objective>().unwrap(), objective);
    }
}

// ============================================================================
// Policy Tests
// ============================================================================

#[test]
fn test_general_selects_all_in_registry_order() {
    let selected = select_backends(Objective::General, &builtin()).unwrap();
    assert_eq!(names(&selected), vec!["ChatGPT", "Gemini", "LLaMa"]);
}

#[test]
fn test_coding_selects_high_quality() {
    let selected = select_backends(Objective::Coding, &builtin()).unwrap();
    assert_eq!(names(&selected), vec!["ChatGPT"]);
}

#[test]
fn test_coding_breaks_ties_by_cost() {
    let registry = ModelRegistry::new(vec![
        profile("Expensive", 0.03, SpeedClass::Slow, QualityClass::High),
        profile("Cheap", 0.01, SpeedClass::Slow, QualityClass::High),
        profile("Weak", 0.0, SpeedClass::Fast, QualityClass::Low),
    ])
    .unwrap();

    let selected = select_backends(Objective::Coding, &registry).unwrap();
    assert_eq!(names(&selected), vec!["Cheap", "Expensive"]);
}

#[test]
fn test_coding_without_high_quality_uses_best_tier() {
    let registry = ModelRegistry::new(vec![
        profile("A", 0.02, SpeedClass::Fast, QualityClass::Low),
        profile("B", 0.01, SpeedClass::Fast, QualityClass::Medium),
    ])
    .unwrap();

    let selected = select_backends(Objective::Coding, &registry).unwrap();
    assert_eq!(names(&selected), vec!["B"]);
}

#[test]
fn test_fast_response_prefers_fast() {
    let selected = select_backends(Objective::FastResponse, &builtin()).unwrap();
    assert_eq!(names(&selected), vec!["Gemini"]);
}

#[test]
fn test_fast_response_falls_back_to_medium() {
    let registry = ModelRegistry::new(vec![
        profile("Slow", 0.0, SpeedClass::Slow, QualityClass::High),
        profile("Mid", 0.0, SpeedClass::Medium, QualityClass::Low),
    ])
    .unwrap();

    let selected = select_backends(Objective::FastResponse, &registry).unwrap();
    assert_eq!(names(&selected), vec!["Mid"]);
}

#[test]
fn test_fast_response_last_resort_is_all() {
    let registry = ModelRegistry::new(vec![
        profile("S1", 0.0, SpeedClass::Slow, QualityClass::High),
        profile("S2", 0.0, SpeedClass::Slow, QualityClass::Low),
    ])
    .unwrap();

    let selected = select_backends(Objective::FastResponse, &registry).unwrap();
    assert_eq!(names(&selected), vec!["S1", "S2"]);
}

#[test]
fn test_cost_saving_two_backends_picks_cheapest() {
    let registry = ModelRegistry::new(vec![
        profile("A", 0.002, SpeedClass::Medium, QualityClass::High),
        profile("B", 0.0005, SpeedClass::Fast, QualityClass::Medium),
    ])
    .unwrap();

    let selected = select_backends(Objective::CostSaving, &registry).unwrap();
    assert_eq!(names(&selected), vec!["B"]);
}

#[test]
fn test_cost_saving_rounds_half_up() {
    let selected = select_backends(Objective::CostSaving, &builtin()).unwrap();
    assert_eq!(names(&selected), vec!["LLaMa", "Gemini"]);
}

#[test]
fn test_cost_saving_single_backend() {
    let registry = ModelRegistry::new(vec![
        profile("Only", 1.0, SpeedClass::Slow, QualityClass::Low),
    ])
    .unwrap();

    let selected = select_backends(Objective::CostSaving, &registry).unwrap();
    assert_eq!(names(&selected), vec!["Only"]);
}

#[test]
fn test_cost_saving_is_sorted_subset_within_cap() {
    let costs = [0.5, 0.1, 0.9, 0.0, 0.3, 0.7, 0.2];
    let profiles: Vec<_> = costs
        .iter()
        .enumerate()
        .map(|(i, &c)| profile(&format!("m{}", i), c, SpeedClass::Medium, QualityClass::Medium))
        .collect();

    for n in 1..=profiles.len() {
        let registry = ModelRegistry::new(profiles[..n].to_vec()).unwrap();
        let selected = select_backends(Objective::CostSaving, &registry).unwrap();

        assert!(!selected.is_empty());
        assert!(selected.len() <= n.div_ceil(2));
        assert!(selected.windows(2).all(|w| w[0].unit_cost <= w[1].unit_cost));
        assert!(selected.iter().all(|p| registry.contains(&p.name)));
    }
}

#[test]
fn test_every_objective_non_empty_for_non_empty_registry() {
    let registries = vec![
        builtin(),
        ModelRegistry::new(vec![profile("Solo", 0.0, SpeedClass::Slow, QualityClass::Low)]).unwrap(),
    ];

    for registry in &registries {
        for objective in Objective::ALL {
            let selected = select_backends(objective, registry).unwrap();
            assert!(!selected.is_empty(), "{} selected nothing", objective);
        }
    }
}

#[test]
fn test_empty_registry_has_no_eligible_backends() {
    let registry = ModelRegistry::new(Vec::new()).unwrap();
    for objective in Objective::ALL {
        let result = select_backends(objective, &registry);
        assert!(matches!(result, Err(LlmError::NoEligibleBackends(_))));
    }
}

#[test]
fn test_routing_is_deterministic() {
    let registry = builtin();
    for objective in Objective::ALL {
        let first = select_backends(objective, &registry).unwrap();
        let second = select_backends(objective, &registry).unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Strategy Tests
// ============================================================================

#[test]
fn test_strategies_on_empty_input() {
    let empty: [nexusllm::BackendProfile; 0] = [];
    assert!(AllBackendsStrategy::new().select(&empty).is_empty());
    assert!(HighestQualityStrategy::new().select(&empty).is_empty());
    assert!(FastestStrategy::new().select(&empty).is_empty());
    assert!(CheapestHalfStrategy::new().select(&empty).is_empty());
}
