//! Registry storage
//!
//! One map from `(predicate, kind)` to a bucket holding the constraints, the
//! lock flag and both cached solutions, so the four never drift apart.

use crate::features::constraints::{AnalysisContext, Constraint};
use crate::features::solver::{PartialSolution, Polarity};
use crate::shared::models::{KindId, PredicateId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub predicate: PredicateId,
    pub kind: KindId,
}

impl BucketKey {
    pub fn new(predicate: PredicateId, kind: KindId) -> Self {
        Self { predicate, kind }
    }
}

#[derive(Debug, Default)]
pub struct ConstraintBucket {
    pub constraints: Vec<Constraint>,
    /// Set on first solve; insertions are refused afterwards
    pub locked: bool,
    pub least: Option<PartialSolution>,
    pub greatest: Option<PartialSolution>,
    /// Constraints freed after both polarities were solved
    pub released: bool,
}

impl ConstraintBucket {
    pub fn solution(&self, polarity: Polarity) -> Option<&PartialSolution> {
        match polarity {
            Polarity::Least => self.least.as_ref(),
            Polarity::Greatest => self.greatest.as_ref(),
        }
    }

    /// Cache a solution; constraints are dropped once both polarities exist
    pub fn store(&mut self, polarity: Polarity, solution: PartialSolution) {
        match polarity {
            Polarity::Least => self.least = Some(solution),
            Polarity::Greatest => self.greatest = Some(solution),
        }
        if self.least.is_some() && self.greatest.is_some() && !self.released {
            trace!("Releasing {} solved constraints", self.constraints.len());
            self.constraints = Vec::new();
            self.released = true;
        }
    }

    /// Drop the cached least solution and unlock; `false` if the constraints are gone
    ///
    /// A cached greatest solution survives.
    pub fn unlock(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.least = None;
        self.locked = false;
        true
    }

    /// Lock, build the solution if missing, return the cached one
    pub fn solve(&mut self, ctx: &AnalysisContext, polarity: Polarity) -> &PartialSolution {
        self.locked = true;
        if self.solution(polarity).is_none() {
            let solution = PartialSolution::new(ctx.clone(), &self.constraints, polarity);
            self.store(polarity, solution);
        }
        match self.solution(polarity) {
            Some(solution) => solution,
            None => unreachable!("solution cached above"),
        }
    }
}

/// Kind name interner
#[derive(Debug, Clone, Default)]
pub struct KindTable {
    names: Vec<String>,
    index: FxHashMap<String, KindId>,
}

impl KindTable {
    pub fn intern(&mut self, name: &str) -> KindId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = KindId::from_index(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<KindId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: KindId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Registry counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KitStats {
    /// Stored explicit-flow constraints
    pub explicit_constraints: usize,
    /// Stored implicit-flow constraints
    pub implicit_constraints: usize,
    /// Solution requests served
    pub solve_calls: usize,
    /// Wall time spent in solution requests
    pub solve_time_ms: f64,
}

impl KitStats {
    pub(crate) fn record_added(&mut self, implicit: bool, count: usize) {
        if implicit {
            self.implicit_constraints += count;
        } else {
            self.explicit_constraints += count;
        }
    }

    pub(crate) fn record_removed(&mut self, implicit: bool, count: usize) {
        if implicit {
            self.implicit_constraints = self.implicit_constraints.saturating_sub(count);
        } else {
            self.explicit_constraints = self.explicit_constraints.saturating_sub(count);
        }
    }
}
