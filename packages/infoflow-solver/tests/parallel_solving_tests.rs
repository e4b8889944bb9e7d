//! Parallel solving against sequential references

mod common;

use common::*;
use infoflow_solver::config::SolverConfig;
use infoflow_solver::{ConsElem, ConstraintKit, PredicateId, Solution, VarId};

fn kit_with_workers(workers: usize) -> ConstraintKit {
    ConstraintKit::with_config(two_point_lattice(), SolverConfig::default().merge_workers(workers))
        .unwrap()
}

/// Baseline chain plus one seeding kind per variable
fn seeded_kinds(kit: &mut ConstraintKit, len: usize) -> (Vec<VarId>, Vec<String>) {
    let vars: Vec<VarId> = (0..len).map(|i| kit.new_var(format!("v{}", i), "")).collect();
    for pair in vars.windows(2) {
        kit.add_constraint("default", pair[0], pair[1], PredicateId::TRUE, "");
    }
    let top = kit.top();
    let kinds: Vec<String> = (0..len).map(|i| format!("seed-{}", i)).collect();
    for (kind, var) in kinds.iter().zip(&vars) {
        kit.add_constraint(kind, top, *var, PredicateId::TRUE, "");
    }
    (vars, kinds)
}

#[test]
fn test_solve_least_many_matches_sequential() {
    init_tracing();
    let len = 12;

    let mut parallel = kit_with_workers(4);
    let (vars, kinds) = seeded_kinds(&mut parallel, len);
    let refs: Vec<&str> = kinds.iter().map(String::as_str).collect();
    let merged = parallel.solve_least_many(&refs, false, PredicateId::TRUE).unwrap();

    let mut sequential = kit_with_workers(1);
    let (seq_vars, _) = seeded_kinds(&mut sequential, len);

    assert_eq!(merged.len(), len);
    for (i, solution) in merged.iter().enumerate() {
        let reference = sequential.least_solution(&["default", refs[i]], PredicateId::TRUE);
        for (v, sv) in vars.iter().zip(&seq_vars) {
            assert_eq!(
                solution.subst(ConsElem::Variable(*v)),
                reference.subst(ConsElem::Variable(*sv)),
                "kind {} at {}",
                refs[i],
                v
            );
        }
        // seeding v_i taints v_i and every later link
        let tainted = vars.iter().filter(|v| solution.is_tainted((**v).into())).count();
        assert_eq!(tainted, len - i);
    }
}

#[test]
fn test_solve_least_many_with_default_sinks() {
    let mut kit = kit_with_workers(2);
    let (vars, kinds) = seeded_kinds(&mut kit, 3);
    let sink = kit.new_var("sink", "");
    kit.add_constraint("default-sinks", vars[0], sink, PredicateId::TRUE, "");

    let refs: Vec<&str> = kinds.iter().map(String::as_str).collect();
    let with_sinks = kit.solve_least_many(&refs, true, PredicateId::TRUE).unwrap();

    assert!(with_sinks[0].is_tainted(sink.into()));
    assert!(!with_sinks[1].is_tainted(sink.into()));
    assert!(kit.is_locked("default-sinks", PredicateId::TRUE));
}

#[test]
fn test_solve_both_matches_separate_requests() {
    let mut both = kit_with_workers(2);
    let (vars, _) = seeded_kinds(&mut both, 5);
    let cap = vars[2];
    let bot = both.bot();
    both.add_constraint("default", cap, bot, PredicateId::TRUE, "");
    let (least, greatest) = both.solve_both("default", PredicateId::TRUE);

    let mut separate = kit_with_workers(2);
    let (seq_vars, _) = seeded_kinds(&mut separate, 5);
    let bot = separate.bot();
    separate.add_constraint("default", seq_vars[2], bot, PredicateId::TRUE, "");
    let ref_least = separate.least_solution(&["default"], PredicateId::TRUE);
    let ref_greatest = separate.greatest_solution(&["default"], PredicateId::TRUE);

    for (v, sv) in vars.iter().zip(&seq_vars) {
        assert_eq!(least.subst((*v).into()), ref_least.subst((*sv).into()));
        assert_eq!(greatest.subst((*v).into()), ref_greatest.subst((*sv).into()));
    }
    // v0 ⊑ v1 ⊑ v2 ⊑ bot forces the prefix down
    assert!(!greatest.is_tainted(vars[0].into()));
    assert!(greatest.is_tainted(vars[4].into()));
    assert!(both.constraints("default", PredicateId::TRUE).is_empty());
}
