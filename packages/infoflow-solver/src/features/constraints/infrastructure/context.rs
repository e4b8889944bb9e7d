//! Analysis context: the locked lattice plus the element store, shared by
//! every registry and solution of one analysis run.

use super::element_store::ElementStore;
use crate::features::constraints::domain::ConsElem;
use crate::features::lattice::Lattice;
use crate::shared::models::VarId;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnalysisContext {
    lattice: Arc<Lattice>,
    elements: Arc<ElementStore>,
}

impl AnalysisContext {
    pub fn new(lattice: Lattice) -> Self {
        Self::with_lattice(Arc::new(lattice))
    }

    pub fn with_lattice(lattice: Arc<Lattice>) -> Self {
        Self {
            lattice,
            elements: Arc::new(ElementStore::new()),
        }
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[inline]
    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }

    /// Structural order on elements
    ///
    /// - Constant ⊑ x: only when x is a dominating constant
    /// - Variable ⊑ x: never known before solving
    /// - Join ⊑ x:     every member ⊑ x
    pub fn leq(&self, lhs: ConsElem, rhs: ConsElem) -> bool {
        match lhs {
            ConsElem::Constant(a) => match rhs {
                ConsElem::Constant(b) => self.lattice.leq(a, b),
                _ => false,
            },
            ConsElem::Variable(_) => false,
            ConsElem::Join(j) => self
                .elements
                .join_members(j)
                .iter()
                .all(|member| self.leq(*member, rhs)),
        }
    }

    /// Collect the variables an element mentions
    pub fn variables(&self, elem: ConsElem, out: &mut BTreeSet<VarId>) {
        match elem {
            ConsElem::Constant(_) => {}
            ConsElem::Variable(v) => {
                out.insert(v);
            }
            ConsElem::Join(j) => {
                for member in self.elements.join_members(j).iter() {
                    self.variables(*member, out);
                }
            }
        }
    }

    pub fn vars_of(&self, elem: ConsElem) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        self.variables(elem, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lattice::LatticeBuilder;

    fn ctx() -> AnalysisContext {
        let lattice = LatticeBuilder::new()
            .level_axis("lvl", ["low", "high"])
            .unwrap()
            .lock();
        AnalysisContext::new(lattice)
    }

    #[test]
    fn test_join_of_constants_leq() {
        let ctx = ctx();
        let low = ConsElem::Constant(ctx.lattice().bottom());
        let high = ConsElem::Constant(ctx.lattice().top());
        let join = ctx.elements().upper_bound(low, high);
        assert!(ctx.leq(join, high));
        assert!(!ctx.leq(join, low));
    }

    #[test]
    fn test_variable_never_leq() {
        let ctx = ctx();
        let v = ConsElem::Variable(ctx.elements().new_var("v", ""));
        assert!(!ctx.leq(v, v));
        assert!(!ctx.leq(ConsElem::Constant(ctx.lattice().bottom()), v));
    }

    #[test]
    fn test_variables_of_join() {
        let ctx = ctx();
        let a = ctx.elements().new_var("a", "");
        let b = ctx.elements().new_var("b", "");
        let top = ConsElem::Constant(ctx.lattice().top());
        let j = ctx
            .elements()
            .upper_bound_set([a.into(), b.into(), top])
            .unwrap();
        let vars = ctx.vars_of(j);
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec![a, b]);
        assert!(ctx.vars_of(top).is_empty());
    }
}
