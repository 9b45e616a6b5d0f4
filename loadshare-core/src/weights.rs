//! Weighting parameters supplied with every aggregation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, non_negative};
use crate::task::Assignee;

/// How load ratings become minutes, and how shared tasks are attributed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    /// Minutes per cognitive-load point.
    pub weight_cognitive: f64,
    /// Minutes per emotional-load point.
    pub weight_emotional: f64,
    /// Percentage (0-100) of a shared task attributed to person A.
    pub shared_split_percent: f64,
    /// When false, shared tasks count toward overall totals but toward neither person.
    pub include_shared: bool,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            weight_cognitive: 10.0,
            weight_emotional: 10.0,
            shared_split_percent: 50.0,
            include_shared: true,
        }
    }
}

impl Weights {
    pub fn validate(&self) -> Result<(), EngineError> {
        non_negative(self.weight_cognitive)
            .map_err(|reason| EngineError::invalid_config("weightCognitive", reason))?;
        non_negative(self.weight_emotional)
            .map_err(|reason| EngineError::invalid_config("weightEmotional", reason))?;
        non_negative(self.shared_split_percent)
            .map_err(|reason| EngineError::invalid_config("sharedSplitPercent", reason))?;
        if self.shared_split_percent > 100.0 {
            return Err(EngineError::invalid_config(
                "sharedSplitPercent",
                format!("must be <= 100, got {}", self.shared_split_percent),
            ));
        }
        Ok(())
    }

    /// Fraction of a task's minutes attributed to (A, B).
    pub fn shares(&self, assignee: Assignee) -> (f64, f64) {
        match assignee {
            Assignee::A => (1.0, 0.0),
            Assignee::B => (0.0, 1.0),
            Assignee::Shared if self.include_shared => {
                let split = self.shared_split_percent / 100.0;
                (split, 1.0 - split)
            }
            Assignee::Shared => (0.0, 0.0),
        }
    }
}
