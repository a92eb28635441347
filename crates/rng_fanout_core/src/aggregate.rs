use serde::Serialize;

use crate::contract::InvocationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    Collecting,
    Complete,
}

/// Final accounting for one batch. `attempted` always equals
/// `succeeded + failed_reasons.len()`, and `succeeded` equals `values.len()`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub values: Vec<serde_json::Number>,
    pub failed_reasons: Vec<String>,
}

impl AggregateSummary {
    pub fn empty() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            values: Vec::new(),
            failed_reasons: Vec::new(),
        }
    }
}

/// Completion counter for a batch of independent invocations.
///
/// Outcomes arrive in any order; the summary is produced exactly once, when
/// the number of recorded outcomes reaches the expected count. Records after
/// completion are ignored.
#[derive(Debug)]
pub struct BatchAggregator {
    expected: usize,
    state: AggregatorState,
    values: Vec<serde_json::Number>,
    failed_reasons: Vec<String>,
}

impl BatchAggregator {
    pub fn new(expected: usize) -> Self {
        let state = if expected == 0 {
            AggregatorState::Complete
        } else {
            AggregatorState::Collecting
        };
        Self {
            expected,
            state,
            values: Vec::new(),
            failed_reasons: Vec::new(),
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    pub fn record(&mut self, outcome: InvocationOutcome) -> Option<AggregateSummary> {
        if self.state == AggregatorState::Complete {
            return None;
        }

        match outcome {
            InvocationOutcome::Success(value) => self.values.push(value),
            InvocationOutcome::Failure(reason) => self.failed_reasons.push(reason),
        }

        if self.values.len() + self.failed_reasons.len() < self.expected {
            return None;
        }

        self.state = AggregatorState::Complete;
        let values = std::mem::take(&mut self.values);
        let failed_reasons = std::mem::take(&mut self.failed_reasons);
        Some(AggregateSummary {
            attempted: self.expected,
            succeeded: values.len(),
            values,
            failed_reasons,
        })
    }
}
