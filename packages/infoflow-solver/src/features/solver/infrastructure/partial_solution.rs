/*
 * Multi-Level Partial Solution
 *
 * A solution is a stack of layers. Each layer holds:
 * - bounds:      var → accumulated bound (join for least, meet for greatest)
 * - propagation: var → vars whose bound must absorb it
 *                least:    vars(lhs) → vars(rhs)
 *                greatest: vars(rhs) → vars(lhs)
 *
 * subst(var) folds the var's bound over every layer, starting from the
 * polarity default. Propagation runs a worklist over every bounded var and
 * every layer's propagation map, writing into the local layer only.
 *
 * Layers are `Arc`-shared: `fork()` chains a fresh empty layer on top of an
 * already-solved one, `merge_in()` chains another solution's layers and
 * re-propagates. Writes go through `Arc::make_mut`, so a layer shared with
 * other solutions is copied before it changes.
 */

use crate::features::constraints::{AnalysisContext, ConsElem, Constraint};
use crate::features::solver::domain::Polarity;
use crate::features::solver::ports::Solution;
use crate::shared::models::{ConstId, VarId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct SolutionLayer {
    bounds: FxHashMap<VarId, ConstId>,
    propagation: FxHashMap<VarId, Vec<VarId>>,
}

impl SolutionLayer {
    pub fn bound_count(&self) -> usize {
        self.bounds.len()
    }
}

#[derive(Debug, Clone)]
pub struct PartialSolution {
    polarity: Polarity,
    ctx: AnalysisContext,
    local: Arc<SolutionLayer>,
    chained: Vec<Arc<SolutionLayer>>,
}

impl PartialSolution {
    /// Build from a constraint list and propagate to the fixed point
    pub fn new(ctx: AnalysisContext, constraints: &[Constraint], polarity: Polarity) -> Self {
        let mut solution = Self {
            polarity,
            ctx,
            local: Arc::new(SolutionLayer::default()),
            chained: Vec::new(),
        };
        solution.initialize(constraints);
        solution.propagate();
        solution
    }

    pub fn least(ctx: AnalysisContext, constraints: &[Constraint]) -> Self {
        Self::new(ctx, constraints, Polarity::Least)
    }

    pub fn greatest(ctx: AnalysisContext, constraints: &[Constraint]) -> Self {
        Self::new(ctx, constraints, Polarity::Greatest)
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Number of layers visible to `subst`
    pub fn depth(&self) -> usize {
        1 + self.chained.len()
    }

    /// Empty layer on top of this solution
    pub fn fork(&self) -> Self {
        let mut chained = Vec::with_capacity(self.depth());
        chained.push(Arc::clone(&self.local));
        chained.extend(self.chained.iter().cloned());
        Self {
            polarity: self.polarity,
            ctx: self.ctx.clone(),
            local: Arc::new(SolutionLayer::default()),
            chained,
        }
    }

    /// Chain `other`'s layers under this one and re-propagate
    pub fn merge_in(&mut self, other: &PartialSolution) {
        assert_eq!(
            self.polarity, other.polarity,
            "merging solutions of different polarity"
        );
        for layer in std::iter::once(&other.local).chain(&other.chained) {
            let known = Arc::ptr_eq(layer, &self.local)
                || self.chained.iter().any(|l| Arc::ptr_eq(l, layer));
            if !known {
                self.chained.push(Arc::clone(layer));
            }
        }
        self.propagate();
    }

    fn layers(&self) -> impl Iterator<Item = &Arc<SolutionLayer>> {
        std::iter::once(&self.local).chain(self.chained.iter())
    }

    fn initialize(&mut self, constraints: &[Constraint]) {
        let lattice = self.ctx.lattice();
        let default = self.polarity.default_value(lattice);

        for c in constraints {
            let (from, to) = match self.polarity {
                Polarity::Least => (c.lhs, c.rhs),
                Polarity::Greatest => (c.rhs, c.lhs),
            };
            let targets = self.ctx.vars_of(to);
            if targets.is_empty() {
                continue;
            }

            let sources = self.ctx.vars_of(from);
            let value = self.subst(from);
            let layer = Arc::make_mut(&mut self.local);
            for var in sources {
                layer
                    .propagation
                    .entry(var)
                    .or_default()
                    .extend(targets.iter().copied());
            }
            if value != default {
                for target in targets {
                    let bound = layer.bounds.entry(target).or_insert(default);
                    *bound = self.polarity.combine(lattice, *bound, value);
                }
            }
        }
    }

    fn propagate(&mut self) {
        let lattice = self.ctx.lattice();
        let default = self.polarity.default_value(lattice);

        let mut seen: FxHashSet<VarId> = FxHashSet::default();
        let mut worklist: VecDeque<VarId> = VecDeque::new();
        for layer in self.layers() {
            for var in layer.bounds.keys() {
                if seen.insert(*var) {
                    worklist.push_back(*var);
                }
            }
        }

        while let Some(var) = worklist.pop_front() {
            let targets: Vec<VarId> = self
                .layers()
                .filter_map(|layer| layer.propagation.get(&var))
                .flatten()
                .copied()
                .collect();
            if targets.is_empty() {
                continue;
            }

            let value = self.bound(var);
            for target in targets {
                if self.polarity.absorbs(lattice, value, self.bound(target)) {
                    continue;
                }
                trace!("{} bound of {} absorbs {}", self.polarity, target, var);
                let layer = Arc::make_mut(&mut self.local);
                let bound = layer.bounds.entry(target).or_insert(default);
                *bound = self.polarity.combine(lattice, *bound, value);
                worklist.push_back(target);
            }
        }
    }

    fn bound(&self, var: VarId) -> ConstId {
        let lattice = self.ctx.lattice();
        self.layers()
            .filter_map(|layer| layer.bounds.get(&var))
            .fold(self.polarity.default_value(lattice), |acc, b| {
                self.polarity.combine(lattice, acc, *b)
            })
    }
}

impl Solution for PartialSolution {
    fn subst(&self, elem: ConsElem) -> ConstId {
        let lattice = self.ctx.lattice();
        match elem {
            ConsElem::Constant(c) => c,
            ConsElem::Variable(v) => self.bound(v),
            ConsElem::Join(j) => self
                .ctx
                .elements()
                .join_members(j)
                .iter()
                .fold(lattice.bottom(), |acc, member| lattice.join(acc, self.subst(*member))),
        }
    }

    fn context(&self) -> &AnalysisContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lattice::LatticeBuilder;
    use crate::shared::models::PredicateId;

    fn ctx() -> AnalysisContext {
        AnalysisContext::new(
            LatticeBuilder::new()
                .level_axis("lvl", ["low", "mid", "high"])
                .unwrap()
                .lock(),
        )
    }

    fn leq(lhs: impl Into<ConsElem>, rhs: impl Into<ConsElem>) -> Constraint {
        Constraint::new(lhs.into(), rhs.into(), PredicateId::TRUE, false, false, "")
    }

    #[test]
    fn test_least_keeps_intermediate_levels() {
        let ctx = ctx();
        let mid = ctx.lattice().named_constant(&[("lvl", "mid")], &[]).unwrap();
        let x = ctx.elements().new_var("x", "");
        let y = ctx.elements().new_var("y", "");
        let z = ctx.elements().new_var("z", "");

        let solution = PartialSolution::least(ctx.clone(), &[leq(mid, x), leq(x, y), leq(z, y)]);

        assert_eq!(solution.subst(x.into()), mid);
        assert_eq!(solution.subst(y.into()), mid);
        assert_eq!(solution.subst(z.into()), ctx.lattice().bottom());
    }

    #[test]
    fn test_greatest_lowers_through_chain() {
        let ctx = ctx();
        let mid = ctx.lattice().named_constant(&[("lvl", "mid")], &[]).unwrap();
        let x = ctx.elements().new_var("x", "");
        let y = ctx.elements().new_var("y", "");
        let free = ctx.elements().new_var("free", "");

        // x ⊑ y ⊑ mid
        let solution = PartialSolution::greatest(ctx.clone(), &[leq(y, mid), leq(x, y)]);

        assert_eq!(solution.subst(y.into()), mid);
        assert_eq!(solution.subst(x.into()), mid);
        assert_eq!(solution.subst(free.into()), ctx.lattice().top());
    }

    #[test]
    fn test_fork_then_merge_in() {
        let ctx = ctx();
        let top = ctx.lattice().top();
        let x = ctx.elements().new_var("x", "");
        let y = ctx.elements().new_var("y", "");

        // baseline only knows x → y; the other kind taints x
        let baseline = PartialSolution::least(ctx.clone(), &[leq(x, y)]);
        let tainting = PartialSolution::least(ctx.clone(), &[leq(top, x)]);

        let mut merged = tainting.fork();
        assert_eq!(merged.depth(), 2);
        merged.merge_in(&baseline);

        assert_eq!(merged.subst(y.into()), top);
        // operands unchanged
        assert_eq!(baseline.subst(y.into()), ctx.lattice().bottom());
        assert_eq!(tainting.subst(y.into()), ctx.lattice().bottom());
    }

    #[test]
    fn test_merge_in_deduplicates_layers() {
        let ctx = ctx();
        let x = ctx.elements().new_var("x", "");
        let base = PartialSolution::least(ctx.clone(), &[leq(ctx.lattice().top(), x)]);
        let mut a = base.fork();
        a.merge_in(&base);
        a.merge_in(&base);
        assert_eq!(a.depth(), 2);
    }

    #[test]
    fn test_join_substitution() {
        let ctx = ctx();
        let mid = ctx.lattice().named_constant(&[("lvl", "mid")], &[]).unwrap();
        let a = ctx.elements().new_var("a", "");
        let b = ctx.elements().new_var("b", "");
        let ab = ctx.elements().upper_bound(a.into(), b.into());

        let solution = PartialSolution::least(ctx.clone(), &[leq(mid, b)]);
        assert_eq!(solution.subst(ab), mid);
    }

    #[test]
    #[should_panic(expected = "different polarity")]
    fn test_merge_polarity_mismatch_panics() {
        let ctx = ctx();
        let mut least = PartialSolution::least(ctx.clone(), &[]);
        let greatest = PartialSolution::greatest(ctx, &[]);
        least.merge_in(&greatest);
    }
}
