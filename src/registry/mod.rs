//! Catalogue of known backends and their cost, speed and quality attributes.
//!
//! The registry is filled once at startup and is read-only afterwards.
//! Every lookup made while serving a query goes through a shared reference.

mod profile;

pub use profile::{BackendProfile, SpeedClass, QualityClass};

use std::collections::HashMap;
use log::debug;

use crate::errors::{LlmError, LlmResult};

/// Read-only set of [`BackendProfile`]s keyed by unique name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    profiles: Vec<BackendProfile>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Builds a registry, rejecting duplicate names and invalid costs.
    ///
    /// # Parameters
    /// * `profiles` - Backends in the order they should be listed
    ///
    /// # Returns
    /// * The registry, or a `ConfigError` naming the offending backend
    pub fn new(profiles: Vec<BackendProfile>) -> LlmResult<Self> {
        let mut index = HashMap::with_capacity(profiles.len());

        for (position, profile) in profiles.iter().enumerate() {
            if !profile.unit_cost.is_finite() || profile.unit_cost < 0.0 {
                return Err(LlmError::ConfigError(format!(
                    "Backend '{}' has invalid unit cost {}\n  → Costs must be finite and non-negative",
                    profile.name, profile.unit_cost
                )));
            }
            if index.insert(profile.name.clone(), position).is_some() {
                return Err(LlmError::ConfigError(format!(
                    "Backend '{}' is registered more than once\n  → Backend names must be unique",
                    profile.name
                )));
            }
        }

        debug!("Model registry loaded with {} backends", profiles.len());
        Ok(Self { profiles, index })
    }

    /// The catalogue shipped with the dashboard: ChatGPT, Gemini and a local LLaMa.
    pub fn builtin() -> Self {
        let profiles = vec![
            BackendProfile::new("ChatGPT", 0.002, SpeedClass::Medium, QualityClass::High),
            BackendProfile::new("Gemini", 0.0005, SpeedClass::Fast, QualityClass::Medium),
            BackendProfile::new("LLaMa", 0.0, SpeedClass::Slow, QualityClass::Medium),
        ];
        let index = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self { profiles, index }
    }

    /// All backends in registration order.
    pub fn list_backends(&self) -> &[BackendProfile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> LlmResult<&BackendProfile> {
        self.index
            .get(name)
            .map(|&i| &self.profiles[i])
            .ok_or_else(|| LlmError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
