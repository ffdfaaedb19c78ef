//! Objective-driven backend selection.

pub mod objective;
pub mod strategies;

pub use objective::Objective;

use log::info;

use crate::errors::{LlmError, LlmResult};
use crate::registry::{BackendProfile, ModelRegistry};
use strategies::{
    AllBackendsStrategy,
    CheapestHalfStrategy,
    FastestStrategy,
    HighestQualityStrategy,
    SelectionStrategy,
};

impl Objective {
    /// The selection strategy this objective routes with.
    pub fn strategy(&self) -> Box<dyn SelectionStrategy + Send + Sync> {
        match self {
            Objective::General => Box::new(AllBackendsStrategy::new()),
            Objective::Coding => Box::new(HighestQualityStrategy::new()),
            Objective::FastResponse => Box::new(FastestStrategy::new()),
            Objective::CostSaving => Box::new(CheapestHalfStrategy::new()),
        }
    }
}

/// Selects the ordered set of backends that should answer a query.
///
/// Deterministic for a given objective and registry content.
///
/// # Errors
/// Returns `NoEligibleBackends` when the selection is empty, which only
/// happens for an empty registry.
pub fn select_backends(objective: Objective, registry: &ModelRegistry) -> LlmResult<Vec<BackendProfile>> {
    let selected: Vec<BackendProfile> = objective
        .strategy()
        .select(registry.list_backends())
        .into_iter()
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(LlmError::NoEligibleBackends(objective.to_string()));
    }

    info!(
        "Routing '{}' to [{}]",
        objective,
        selected.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    Ok(selected)
}
