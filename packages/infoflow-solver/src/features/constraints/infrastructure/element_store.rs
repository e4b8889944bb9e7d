/*
 * Element Store
 *
 * Owns every variable and interned join created for one analysis.
 *
 * Join interning:
 * - Members are flattened (a join member contributes its own members),
 *   sorted and deduplicated
 * - The member slice is the interning key: equal member sets ⇒ same JoinId
 * - A set that flattens to a single element is that element, not a join
 *
 * Tables sit behind RwLocks so solver threads can read them while the
 * store is shared through `Arc`.
 */

use crate::features::constraints::domain::{ConsElem, VarInfo};
use crate::shared::models::{JoinId, VarId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct JoinTable {
    members: Vec<Arc<[ConsElem]>>,
    index: FxHashMap<Arc<[ConsElem]>, JoinId>,
}

/// Arena of variables and interned joins
#[derive(Debug, Default)]
pub struct ElementStore {
    vars: RwLock<Vec<VarInfo>>,
    joins: RwLock<JoinTable>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh variable (never deduplicated)
    pub fn new_var(&self, desc: impl Into<String>, meta: impl Into<String>) -> VarId {
        let mut vars = self.vars.write();
        let id = VarId::from_index(vars.len());
        vars.push(VarInfo::new(id, desc, meta));
        id
    }

    pub fn var_info(&self, id: VarId) -> VarInfo {
        self.vars.read()[id.index()].clone()
    }

    pub fn var_count(&self) -> usize {
        self.vars.read().len()
    }

    /// Every variable, in creation order
    pub fn variables(&self) -> Vec<VarId> {
        (0..self.var_count()).map(VarId::from_index).collect()
    }

    pub fn join_count(&self) -> usize {
        self.joins.read().members.len()
    }

    /// Every interned join
    pub fn joins(&self) -> Vec<JoinId> {
        (0..self.join_count()).map(JoinId::from_index).collect()
    }

    /// Flat, sorted member set of a join
    pub fn join_members(&self, id: JoinId) -> Arc<[ConsElem]> {
        Arc::clone(&self.joins.read().members[id.index()])
    }

    /// e1 ⊔ e2
    pub fn upper_bound(&self, e1: ConsElem, e2: ConsElem) -> ConsElem {
        match self.upper_bound_set([e1, e2]) {
            Some(elem) => elem,
            None => unreachable!("two operands never flatten to nothing"),
        }
    }

    /// Upper bound where either side may be absent
    pub fn upper_bound_opt(&self, e1: Option<ConsElem>, e2: Option<ConsElem>) -> Option<ConsElem> {
        match (e1, e2) {
            (Some(a), Some(b)) => Some(self.upper_bound(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// ⊔ of an arbitrary element set
    ///
    /// `None` for an empty set, the element itself for a singleton.
    pub fn upper_bound_set(&self, elems: impl IntoIterator<Item = ConsElem>) -> Option<ConsElem> {
        let mut flat: Vec<ConsElem> = Vec::new();
        {
            let joins = self.joins.read();
            for elem in elems {
                match elem {
                    ConsElem::Join(j) => flat.extend(joins.members[j.index()].iter().copied()),
                    other => flat.push(other),
                }
            }
        }
        flat.sort_unstable();
        flat.dedup();

        match flat.len() {
            0 => None,
            1 => Some(flat[0]),
            _ => Some(ConsElem::Join(self.intern_join(flat))),
        }
    }

    fn intern_join(&self, members: Vec<ConsElem>) -> JoinId {
        if let Some(id) = self.joins.read().index.get(members.as_slice()) {
            return *id;
        }
        let mut joins = self.joins.write();
        if let Some(id) = joins.index.get(members.as_slice()) {
            return *id;
        }
        let id = JoinId::from_index(joins.members.len());
        let key: Arc<[ConsElem]> = members.into();
        joins.members.push(Arc::clone(&key));
        joins.index.insert(key, id);
        id
    }
}
