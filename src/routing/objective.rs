use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LlmError;

/// Caller-selected optimization target guiding backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    General,
    Coding,
    FastResponse,
    CostSaving,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::General,
        Objective::Coding,
        Objective::FastResponse,
        Objective::CostSaving,
    ];

    /// Label used for metric records and log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            Objective::General => "general",
            Objective::Coding => "coding",
            Objective::FastResponse => "fast_response",
            Objective::CostSaving => "cost_saving",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::General => write!(f, "General"),
            Objective::Coding => write!(f, "Coding"),
            Objective::FastResponse => write!(f, "Fast Response"),
            Objective::CostSaving => write!(f, "Cost Saving"),
        }
    }
}

/// Accepts both the display labels ("Fast Response") and snake_case ("fast_response").
impl FromStr for Objective {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match normalized.as_str() {
            "general" => Ok(Objective::General),
            "coding" => Ok(Objective::Coding),
            "fastresponse" => Ok(Objective::FastResponse),
            "costsaving" => Ok(Objective::CostSaving),
            _ => Err(LlmError::InvalidParameter(format!(
                "Unknown objective '{}'\n  → Valid objectives: General, Coding, Fast Response, Cost Saving",
                s
            ))),
        }
    }
}
