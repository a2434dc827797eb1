//! Plan type definition

use serde::{Deserialize, Serialize};

use super::Step;

/// Ordered sequence of tool-invocation steps derived from a user command.
///
/// Plans are request-scoped and never persisted. An empty plan is valid and
/// executes as a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl FromIterator<Step> for Plan {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}
