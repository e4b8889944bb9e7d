/*
 * Two-Point Worklist Fixpoint Solver
 *
 * Every variable takes one of two values: the polarity's default extreme
 * (bottom for least, top for greatest) or, once moved, the other extreme.
 *
 * Invalidation index (built once):
 *   least:    var ∈ vars(lhs)  →  constraint may break when var rises
 *   greatest: var ∈ vars(rhs)  →  constraint may break when var drops
 *
 * Algorithm:
 * 1. Enqueue every constraint (FIFO + membership set)
 * 2. Pop c = (lhs ⊑ rhs); skip if subst(lhs) ⊑ subst(rhs)
 * 3. least:    raise each v ∈ vars(rhs) with ¬(subst(lhs) ⊑ subst(v))
 *    greatest: lower each v ∈ vars(lhs) with subst(rhs) ⊑ subst(v);
 *              incomparable (a meet would be needed) is unsupported
 * 4. Re-enqueue the constraints indexed under every moved variable
 *
 * Termination: each variable moves at most once, so at most |vars| moves
 * happen and the worklist drains.
 *
 * Join values fold member values with lattice join seeded at bottom.
 *
 * References:
 * - Rehof & Mogensen (1999): "Tractable Constraints in Finite Semilattices"
 * - Kildall (1973): worklist iteration
 */

use crate::features::constraints::{AnalysisContext, ConsElem, Constraint};
use crate::features::solver::domain::{Polarity, SolveState};
use crate::features::solver::ports::Solution;
use crate::shared::models::{ConstId, VarId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug)]
pub struct FixpointSolver {
    ctx: AnalysisContext,
    polarity: Polarity,
    state: SolveState,
    constraints: Vec<Constraint>,
    invalidation: FxHashMap<VarId, Vec<usize>>,
    changed: FxHashSet<VarId>,
    iterations: usize,
}

impl FixpointSolver {
    pub fn new(ctx: AnalysisContext, polarity: Polarity, constraints: Vec<Constraint>) -> Self {
        let mut invalidation: FxHashMap<VarId, Vec<usize>> = FxHashMap::default();
        for (idx, c) in constraints.iter().enumerate() {
            let watched = match polarity {
                Polarity::Least => c.lhs,
                Polarity::Greatest => c.rhs,
            };
            for var in ctx.vars_of(watched) {
                invalidation.entry(var).or_default().push(idx);
            }
        }

        Self {
            ctx,
            polarity,
            state: SolveState::Unsolved,
            constraints,
            invalidation,
            changed: FxHashSet::default(),
            iterations: 0,
        }
    }

    pub fn least(ctx: AnalysisContext, constraints: Vec<Constraint>) -> Self {
        Self::new(ctx, Polarity::Least, constraints)
    }

    pub fn greatest(ctx: AnalysisContext, constraints: Vec<Constraint>) -> Self {
        Self::new(ctx, Polarity::Greatest, constraints)
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[inline]
    pub fn state(&self) -> SolveState {
        self.state
    }

    /// Constraints popped from the worklist during the solve
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Variables moved to the other extreme
    pub fn changed(&self) -> impl Iterator<Item = VarId> + '_ {
        self.changed.iter().copied()
    }

    /// Run to the fixed point; no-op once solved
    pub fn solve(&mut self) {
        match self.state {
            SolveState::Solved => return,
            SolveState::Solving => panic!("re-entrant solve of a {} solution", self.polarity),
            SolveState::Unsolved => self.state = SolveState::Solving,
        }

        debug!(
            "Solving {} constraints for {} solution",
            self.constraints.len(),
            self.polarity
        );

        let mut worklist: VecDeque<usize> = (0..self.constraints.len()).collect();
        let mut queued: FxHashSet<usize> = worklist.iter().copied().collect();

        while let Some(idx) = worklist.pop_front() {
            queued.remove(&idx);
            self.iterations += 1;

            let (lhs, rhs) = (self.constraints[idx].lhs, self.constraints[idx].rhs);
            let left = self.value_of(lhs);
            let right = self.value_of(rhs);
            if self.ctx.lattice().leq(left, right) {
                continue;
            }

            for var in self.satisfy(lhs, rhs, left, right) {
                if let Some(dependents) = self.invalidation.get(&var) {
                    for &dep in dependents {
                        if queued.insert(dep) {
                            worklist.push_back(dep);
                        }
                    }
                }
            }
        }

        debug!(
            "Solved after {} iterations, {} variables moved",
            self.iterations,
            self.changed.len()
        );

        self.constraints = Vec::new();
        self.invalidation = FxHashMap::default();
        self.state = SolveState::Solved;
    }

    /// Move the variables that make `lhs ⊑ rhs` fail; returns the moved set
    fn satisfy(&mut self, lhs: ConsElem, rhs: ConsElem, left: ConstId, right: ConstId) -> Vec<VarId> {
        let lattice = self.ctx.lattice();
        let mut moved = Vec::new();

        match self.polarity {
            Polarity::Least => {
                for var in self.ctx.vars_of(rhs) {
                    let current = self.value_of(ConsElem::Variable(var));
                    if !lattice.leq(left, current) {
                        self.changed.insert(var);
                        moved.push(var);
                    }
                }
            }
            Polarity::Greatest => {
                for var in self.ctx.vars_of(lhs) {
                    let current = self.value_of(ConsElem::Variable(var));
                    if lattice.leq(current, right) {
                        continue;
                    }
                    if lattice.leq(right, current) {
                        self.changed.insert(var);
                        moved.push(var);
                    } else {
                        panic!(
                            "greatest solution needs a meet for {} against {}",
                            var, rhs
                        );
                    }
                }
            }
        }

        moved
    }

    fn value_of(&self, elem: ConsElem) -> ConstId {
        let lattice = self.ctx.lattice();
        match elem {
            ConsElem::Constant(c) => c,
            ConsElem::Variable(v) => {
                if self.changed.contains(&v) {
                    self.polarity.other_extreme(lattice)
                } else {
                    self.polarity.default_value(lattice)
                }
            }
            ConsElem::Join(j) => self
                .ctx
                .elements()
                .join_members(j)
                .iter()
                .fold(lattice.bottom(), |acc, member| {
                    lattice.join(acc, self.value_of(*member))
                }),
        }
    }
}

impl Solution for FixpointSolver {
    fn subst(&self, elem: ConsElem) -> ConstId {
        assert!(
            self.state == SolveState::Solved,
            "subst on an unsolved {} solution",
            self.polarity
        );
        self.value_of(elem)
    }

    fn context(&self) -> &AnalysisContext {
        &self.ctx
    }
}
