use log::debug;

use crate::registry::{BackendProfile, SpeedClass};

/// Trait defining the interface for backend selection strategies
///
/// Implementations of this trait decide which registered backends answer
/// a query and in which order. Every strategy is a pure function of the
/// profiles it is given.
pub trait SelectionStrategy {
    /// Select backends from the registered candidates
    ///
    /// # Parameters
    /// * `profiles` - Registered backends in registration order
    ///
    /// # Returns
    /// * Selected backends, in the order they should be reported.
    ///   Empty only when `profiles` is empty.
    fn select<'a>(&self, profiles: &'a [BackendProfile]) -> Vec<&'a BackendProfile>;
}

/// Strategy that fans out to every registered backend.
#[derive(Debug, Default)]
pub struct AllBackendsStrategy;

impl AllBackendsStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl SelectionStrategy for AllBackendsStrategy {
    fn select<'a>(&self, profiles: &'a [BackendProfile]) -> Vec<&'a BackendProfile> {
        debug!("AllBackendsStrategy: Selected all {} backends", profiles.len());
        profiles.iter().collect()
    }
}

/// Strategy that keeps only the best quality tier, cheapest first.
///
/// Backends of `High` quality are preferred. When none is registered the
/// best tier present is used instead, so the selection is never empty for
/// a non-empty registry.
#[derive(Debug, Default)]
pub struct HighestQualityStrategy;

impl HighestQualityStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl SelectionStrategy for HighestQualityStrategy {
    /// Select the backends sharing the highest quality class
    ///
    /// # Parameters
    /// * `profiles` - Registered backends
    ///
    /// # Returns
    /// * Backends of the best tier sorted by ascending unit cost,
    ///   ties kept in registration order
    fn select<'a>(&self, profiles: &'a [BackendProfile]) -> Vec<&'a BackendProfile> {
        let best = match profiles.iter().map(|p| p.quality_class).max() {
            Some(best) => best,
            None => return Vec::new(),
        };

        let mut selected: Vec<&BackendProfile> = profiles
            .iter()
            .filter(|p| p.quality_class == best)
            .collect();
        selected.sort_by(|a, b| a.unit_cost.total_cmp(&b.unit_cost));

        debug!(
            "HighestQualityStrategy: Selected {} of {} backends with quality '{}'",
            selected.len(), profiles.len(), best
        );

        selected
    }
}

/// Strategy that keeps only the fastest speed class available.
///
/// Tries `Fast`, then `Medium`, and falls back to every backend.
#[derive(Debug, Default)]
pub struct FastestStrategy;

impl FastestStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl SelectionStrategy for FastestStrategy {
    fn select<'a>(&self, profiles: &'a [BackendProfile]) -> Vec<&'a BackendProfile> {
        for speed in [SpeedClass::Fast, SpeedClass::Medium] {
            let selected: Vec<&BackendProfile> = profiles
                .iter()
                .filter(|p| p.speed_class == speed)
                .collect();
            if !selected.is_empty() {
                debug!(
                    "FastestStrategy: Selected {} of {} backends with speed '{}'",
                    selected.len(), profiles.len(), speed
                );
                return selected;
            }
        }

        debug!("FastestStrategy: No fast or medium backend, falling back to all {}", profiles.len());
        profiles.iter().collect()
    }
}

/// Strategy that keeps the cheapest half of the registry.
#[derive(Debug, Default)]
pub struct CheapestHalfStrategy;

impl CheapestHalfStrategy {
    pub fn new() -> Self {
        Self {}
    }
}

impl SelectionStrategy for CheapestHalfStrategy {
    /// Select the cheapest backends
    ///
    /// # Parameters
    /// * `profiles` - Registered backends
    ///
    /// # Returns
    /// * Backends sorted by ascending unit cost, capped at half the
    ///   registry size rounded up (at least one)
    fn select<'a>(&self, profiles: &'a [BackendProfile]) -> Vec<&'a BackendProfile> {
        let mut sorted: Vec<&BackendProfile> = profiles.iter().collect();
        sorted.sort_by(|a, b| a.unit_cost.total_cmp(&b.unit_cost));

        let cap = profiles.len().div_ceil(2).max(1);
        sorted.truncate(cap);

        debug!(
            "CheapestHalfStrategy: Selected {} of {} backends, cheapest unit cost {:?}",
            sorted.len(), profiles.len(), sorted.first().map(|p| p.unit_cost)
        );

        sorted
    }
}
