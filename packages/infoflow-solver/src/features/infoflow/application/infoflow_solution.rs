/*
 * Taint Queries over a Solution
 *
 * Collaborators bind their program entities to constraint elements:
 *   value    → element
 *   location → field offset → element
 *   function → element of its varargs
 *
 * Query semantics:
 *   element / value / location  : tainted iff subst ≠ bot
 *   varargs / pointer targets   : tainted iff subst = top
 *   unbound value or varargs    : default_tainted
 *   unbound location            : untainted
 *   unbound pointer target      : default_tainted
 *
 * Least solutions default to untainted, greatest ones to tainted.
 */

use crate::features::constraints::ConsElem;
use crate::features::infoflow::domain::with_flow_kinds;
use crate::features::infoflow::ports::PointsTo;
use crate::features::kit::ConstraintKit;
use crate::features::solver::{PartialSolution, Solution};
use crate::shared::models::PredicateId;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Entity → element tables shared by every solution of one analysis
#[derive(Debug, Clone)]
pub struct FlowBindings<V, L, F> {
    values: FxHashMap<V, ConsElem>,
    locations: FxHashMap<L, BTreeMap<u32, ConsElem>>,
    vargs: FxHashMap<F, ConsElem>,
}

impl<V, L, F> Default for FlowBindings<V, L, F> {
    fn default() -> Self {
        Self {
            values: FxHashMap::default(),
            locations: FxHashMap::default(),
            vargs: FxHashMap::default(),
        }
    }
}

impl<V: Eq + Hash, L: Eq + Hash, F: Eq + Hash> FlowBindings<V, L, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_value(&mut self, value: V, elem: impl Into<ConsElem>) -> Option<ConsElem> {
        self.values.insert(value, elem.into())
    }

    pub fn bind_field(&mut self, location: L, offset: u32, elem: impl Into<ConsElem>) -> Option<ConsElem> {
        self.locations.entry(location).or_default().insert(offset, elem.into())
    }

    pub fn bind_varg(&mut self, function: F, elem: impl Into<ConsElem>) -> Option<ConsElem> {
        self.vargs.insert(function, elem.into())
    }

    pub fn value(&self, value: &V) -> Option<ConsElem> {
        self.values.get(value).copied()
    }

    pub fn fields(&self, location: &L) -> Option<&BTreeMap<u32, ConsElem>> {
        self.locations.get(location)
    }

    pub fn varg(&self, function: &F) -> Option<ConsElem> {
        self.vargs.get(function).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = (&V, ConsElem)> {
        self.values.iter().map(|(v, e)| (v, *e))
    }
}

pub struct InfoflowSolution<S, V, L, F> {
    solution: S,
    bindings: Arc<FlowBindings<V, L, F>>,
    default_tainted: bool,
}

impl<S: Solution, V: Eq + Hash, L: Eq + Hash, F: Eq + Hash> InfoflowSolution<S, V, L, F> {
    pub fn new(solution: S, bindings: Arc<FlowBindings<V, L, F>>, default_tainted: bool) -> Self {
        Self {
            solution,
            bindings,
            default_tainted,
        }
    }

    pub fn solution(&self) -> &S {
        &self.solution
    }

    pub fn default_tainted(&self) -> bool {
        self.default_tainted
    }

    pub fn is_tainted(&self, elem: ConsElem) -> bool {
        self.solution.is_tainted(elem)
    }

    pub fn is_value_tainted(&self, value: &V) -> bool {
        match self.bindings.value(value) {
            Some(elem) => self.solution.is_tainted(elem),
            None => self.default_tainted,
        }
    }

    /// Any field of the location is tainted
    pub fn is_location_tainted(&self, location: &L) -> bool {
        self.bindings
            .fields(location)
            .map_or(false, |fields| fields.values().any(|e| self.solution.is_tainted(*e)))
    }

    /// Tainted fields of the location, by offset
    pub fn tainted_fields(&self, location: &L) -> Vec<(u32, ConsElem)> {
        self.bindings
            .fields(location)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, e)| self.solution.is_tainted(**e))
                    .map(|(offset, e)| (*offset, *e))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_varg_tainted(&self, function: &F) -> bool {
        match self.bindings.varg(function) {
            Some(elem) => self.solution.is_fully_tainted(elem),
            None => self.default_tainted,
        }
    }

    /// Some location the value points to has a fully tainted field
    pub fn is_direct_ptr_tainted(&self, value: &V, points_to: &impl PointsTo<V, L>) -> bool {
        self.any_location_fully_tainted(points_to.direct_locations(value))
    }

    /// Some location reachable from the value has a fully tainted field
    pub fn is_reach_ptr_tainted(&self, value: &V, points_to: &impl PointsTo<V, L>) -> bool {
        self.any_location_fully_tainted(points_to.reachable_locations(value))
    }

    fn any_location_fully_tainted(&self, locations: Vec<L>) -> bool {
        for location in &locations {
            let Some(fields) = self.bindings.fields(location) else {
                debug!("Pointer target without bound fields");
                return self.default_tainted;
            };
            if fields.values().any(|e| self.solution.is_fully_tainted(*e)) {
                return true;
            }
        }
        false
    }

    /// Every bound value whose element is tainted, in no particular order
    pub fn tainted_values(&self) -> Vec<&V> {
        self.bindings
            .values()
            .filter(|(_, elem)| self.solution.is_tainted(*elem))
            .map(|(v, _)| v)
            .collect()
    }
}

impl<V: Eq + Hash, L: Eq + Hash, F: Eq + Hash> InfoflowSolution<PartialSolution, V, L, F> {
    /// Least solution over `kinds` plus the flow kinds; unbound entities are untainted
    pub fn least_from(
        kit: &mut ConstraintKit,
        kinds: &[&str],
        implicit: bool,
        sinks: bool,
        predicate: PredicateId,
        bindings: Arc<FlowBindings<V, L, F>>,
    ) -> Self {
        let all = with_flow_kinds(kinds, implicit, sinks);
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        Self::new(kit.least_solution(&refs, predicate), bindings, false)
    }

    /// Greatest solution over `kinds` plus the flow kinds; unbound entities are tainted
    ///
    /// Sink kinds are always included.
    pub fn greatest_from(
        kit: &mut ConstraintKit,
        kinds: &[&str],
        implicit: bool,
        predicate: PredicateId,
        bindings: Arc<FlowBindings<V, L, F>>,
    ) -> Self {
        let all = with_flow_kinds(kinds, implicit, true);
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        Self::new(kit.greatest_solution(&refs, predicate), bindings, true)
    }
}
