use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LlmError;

/// How quickly a backend usually answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Fast,
    Medium,
    Slow,
}

/// Rough answer quality of a backend.
///
/// Variants are declared from worst to best so that `Ord` ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Low,
    Medium,
    High,
}

impl fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedClass::Fast => write!(f, "fast"),
            SpeedClass::Medium => write!(f, "medium"),
            SpeedClass::Slow => write!(f, "slow"),
        }
    }
}

impl fmt::Display for QualityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityClass::Low => write!(f, "low"),
            QualityClass::Medium => write!(f, "medium"),
            QualityClass::High => write!(f, "high"),
        }
    }
}

impl FromStr for SpeedClass {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(SpeedClass::Fast),
            "medium" => Ok(SpeedClass::Medium),
            "slow" => Ok(SpeedClass::Slow),
            _ => Err(LlmError::ConfigError(format!(
                "Unknown speed class '{}'\n  → Valid values: fast, medium, slow", s
            ))),
        }
    }
}

impl FromStr for QualityClass {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityClass::Low),
            "medium" => Ok(QualityClass::Medium),
            "high" => Ok(QualityClass::High),
            _ => Err(LlmError::ConfigError(format!(
                "Unknown quality class '{}'\n  → Valid values: low, medium, high", s
            ))),
        }
    }
}

/// Static description of one backend as known to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendProfile {
    pub name: String,
    /// Cost per output token.
    pub unit_cost: f64,
    pub speed_class: SpeedClass,
    pub quality_class: QualityClass,
}

impl BackendProfile {
    pub fn new(
        name: impl Into<String>,
        unit_cost: f64,
        speed_class: SpeedClass,
        quality_class: QualityClass,
    ) -> Self {
        BackendProfile {
            name: name.into(),
            unit_cost,
            speed_class,
            quality_class,
        }
    }
}
