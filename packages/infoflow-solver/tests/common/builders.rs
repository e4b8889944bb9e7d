//! Constraint-system builders

use infoflow_solver::{ConsElem, ConstraintKit, PredicateId, VarId};

/// Small random-shaped system over `vars` variables
///
/// `edges` are `v_i ⊑ v_j`, `seeds` are `top ⊑ v_i`, `caps` are `v_i ⊑ bot`.
/// Indices are taken modulo `vars`.
#[derive(Debug, Clone, Default)]
pub struct SystemSpec {
    pub vars: usize,
    pub edges: Vec<(usize, usize)>,
    pub seeds: Vec<usize>,
    pub caps: Vec<usize>,
}

pub fn build_system(kit: &mut ConstraintKit, kind: &str, spec: &SystemSpec) -> Vec<VarId> {
    let vars: Vec<VarId> = (0..spec.vars).map(|i| kit.new_var(format!("v{}", i), "")).collect();
    let (top, bot) = (kit.top(), kit.bot());
    for &(from, to) in &spec.edges {
        kit.add_constraint(kind, vars[from % spec.vars], vars[to % spec.vars], PredicateId::TRUE, "edge");
    }
    for &seed in &spec.seeds {
        kit.add_constraint(kind, top, vars[seed % spec.vars], PredicateId::TRUE, "seed");
    }
    for &cap in &spec.caps {
        kit.add_constraint(kind, vars[cap % spec.vars], bot, PredicateId::TRUE, "cap");
    }
    vars
}

/// `top ⊑ v0 ⊑ v1 ⊑ … ⊑ v(len-1)`
pub fn chain(kit: &mut ConstraintKit, kind: &str, len: usize) -> Vec<VarId> {
    let vars: Vec<VarId> = (0..len).map(|i| kit.new_var(format!("c{}", i), "")).collect();
    let top = kit.top();
    if let Some(first) = vars.first() {
        kit.add_constraint(kind, top, *first, PredicateId::TRUE, "seed");
    }
    for pair in vars.windows(2) {
        kit.add_constraint(kind, pair[0], pair[1], PredicateId::TRUE, "step");
    }
    vars
}

/// `⊔ sources ⊑ sink` with the last source seeded
pub fn fan_in(kit: &mut ConstraintKit, kind: &str, width: usize) -> (Vec<VarId>, VarId) {
    let sources: Vec<VarId> = (0..width).map(|i| kit.new_var(format!("s{}", i), "")).collect();
    let sink = kit.new_var("sink", "");
    let top = kit.top();
    if let Some(last) = sources.last() {
        kit.add_constraint(kind, top, *last, PredicateId::TRUE, "seed");
    }
    if let Some(lub) = kit.upper_bound_set(sources.iter().map(|v| ConsElem::Variable(*v))) {
        kit.add_constraint(kind, lub, sink, PredicateId::TRUE, "fan-in");
    }
    (sources, sink)
}
