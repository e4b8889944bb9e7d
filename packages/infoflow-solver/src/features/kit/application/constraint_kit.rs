/*
 * Constraint Registry
 *
 * Stores constraints per (predicate, kind) and serves solutions over them.
 *
 * Lifecycle of one bucket:
 *   open     → constraints may be added, removed, replaced
 *   locked   → a solution was requested; insertions are logic errors
 *   released → both polarities cached; the raw constraints are freed
 *
 * Solutions over several kinds are built per kind, cached, then combined:
 * the first kind's cached solution is forked and the others merged in, so
 * the cache itself is never mutated by a combination.
 *
 * Predicates are registered in a per-kit table; `PredicateId::TRUE` is
 * always the first entry.
 */

use crate::config::{SolverConfig, Validatable};
use crate::errors::{Result, SolverError};
use crate::features::constraints::{kind_flags, AnalysisContext, ConsElem, Constraint, ElementStore};
use crate::features::kit::domain::{BucketKey, ConstraintBucket, KindTable, KitStats};
use crate::features::lattice::Lattice;
use crate::features::predicate::Predicate;
use crate::features::solver::{FixpointSolver, PartialSolution, Polarity};
use crate::shared::models::{ConstId, KindId, PredicateId, VarId};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, trace};

#[derive(Debug)]
pub struct ConstraintKit {
    pub(super) ctx: AnalysisContext,
    pub(super) config: SolverConfig,
    pub(super) predicates: Vec<Predicate>,
    pub(super) predicate_index: FxHashMap<Predicate, PredicateId>,
    pub(super) kinds: KindTable,
    pub(super) buckets: FxHashMap<BucketKey, ConstraintBucket>,
    pub(super) stats: KitStats,
}

impl ConstraintKit {
    pub fn new(lattice: Lattice) -> Self {
        Self::from_parts(AnalysisContext::new(lattice), SolverConfig::default())
    }

    /// Registry with validated solver tuning
    pub fn with_config(lattice: Lattice, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(AnalysisContext::new(lattice), config))
    }

    /// Registry over an existing context (shared lattice and elements)
    pub fn with_context(ctx: AnalysisContext, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(ctx, config))
    }

    fn from_parts(ctx: AnalysisContext, config: SolverConfig) -> Self {
        let truth = Predicate::new();
        let mut predicate_index = FxHashMap::default();
        predicate_index.insert(truth.clone(), PredicateId::TRUE);
        Self {
            ctx,
            config,
            predicates: vec![truth],
            predicate_index,
            kinds: KindTable::default(),
            buckets: FxHashMap::default(),
            stats: KitStats::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    pub fn lattice(&self) -> &Lattice {
        self.ctx.lattice()
    }

    pub fn elements(&self) -> &ElementStore {
        self.ctx.elements()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> &KitStats {
        &self.stats
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Elements
    // ═══════════════════════════════════════════════════════════════════════

    /// Fresh variable owned by this registry
    pub fn new_var(&self, desc: impl Into<String>, meta: impl Into<String>) -> VarId {
        self.ctx.elements().new_var(desc, meta)
    }

    pub fn bot(&self) -> ConstId {
        self.lattice().bottom()
    }

    pub fn top(&self) -> ConstId {
        self.lattice().top()
    }

    pub fn upper_bound(&self, e1: impl Into<ConsElem>, e2: impl Into<ConsElem>) -> ConsElem {
        self.ctx.elements().upper_bound(e1.into(), e2.into())
    }

    pub fn upper_bound_opt(&self, e1: Option<ConsElem>, e2: Option<ConsElem>) -> Option<ConsElem> {
        self.ctx.elements().upper_bound_opt(e1, e2)
    }

    pub fn upper_bound_set(&self, elems: impl IntoIterator<Item = ConsElem>) -> Option<ConsElem> {
        self.ctx.elements().upper_bound_set(elems)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicates and kinds
    // ═══════════════════════════════════════════════════════════════════════

    /// Register a predicate; structurally equal predicates share an id
    pub fn register_predicate(&mut self, predicate: Predicate) -> PredicateId {
        if let Some(id) = self.predicate_index.get(&predicate) {
            return *id;
        }
        let id = PredicateId::from_index(self.predicates.len());
        self.predicates.push(predicate.clone());
        self.predicate_index.insert(predicate, id);
        id
    }

    /// Register a partition piece under a new id, even if an equal predicate exists
    ///
    /// Pieces start without constraints of their own; reusing a caller's id
    /// would mix that predicate's constraints into the refinement.
    pub(super) fn register_piece(&mut self, predicate: Predicate) -> PredicateId {
        let id = PredicateId::from_index(self.predicates.len());
        self.predicates.push(predicate.clone());
        self.predicate_index.entry(predicate).or_insert(id);
        id
    }

    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates[id.index()]
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn kind_id(&mut self, kind: &str) -> KindId {
        self.kinds.intern(kind)
    }

    pub fn kind_name(&self, id: KindId) -> &str {
        self.kinds.name(id)
    }

    pub(super) fn key(&mut self, kind: &str, predicate: PredicateId) -> BucketKey {
        assert!(
            predicate.index() < self.predicates.len(),
            "unregistered predicate {}",
            predicate
        );
        BucketKey::new(predicate, self.kinds.intern(kind))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Constraint storage
    // ═══════════════════════════════════════════════════════════════════════

    /// Store `lhs ⊑ rhs` under `(predicate, kind)`
    ///
    /// A join on the left is expanded into one constraint per member. Returns
    /// the constraints actually stored.
    ///
    /// # Panics
    /// If the kind is locked under `predicate`, or `rhs` is a join.
    pub fn add_constraint(
        &mut self,
        kind: &str,
        lhs: impl Into<ConsElem>,
        rhs: impl Into<ConsElem>,
        predicate: PredicateId,
        info: &str,
    ) -> Vec<Constraint> {
        match self.try_add_constraint(kind, lhs, rhs, predicate, info) {
            Ok(added) => added,
            Err(err) => panic!("{}", err),
        }
    }

    /// [`add_constraint`](Self::add_constraint) reporting a locked kind as an error
    pub fn try_add_constraint(
        &mut self,
        kind: &str,
        lhs: impl Into<ConsElem>,
        rhs: impl Into<ConsElem>,
        predicate: PredicateId,
        info: &str,
    ) -> Result<Vec<Constraint>> {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        let key = self.key(kind, predicate);
        if self.buckets.get(&key).map_or(false, |b| b.locked) {
            return Err(SolverError::KindLocked {
                kind: kind.to_string(),
                predicate: predicate.0,
            });
        }

        let (implicit, sink) = kind_flags(kind);
        let added: Vec<Constraint> = match lhs {
            ConsElem::Join(j) => self
                .ctx
                .elements()
                .join_members(j)
                .iter()
                .map(|member| Constraint::new(*member, rhs, predicate, implicit, sink, info))
                .collect(),
            _ => vec![Constraint::new(lhs, rhs, predicate, implicit, sink, info)],
        };

        for c in &added {
            trace!("Adding constraint {} under {}", c, kind);
        }
        self.stats.record_added(implicit, added.len());
        self.buckets
            .entry(key)
            .or_default()
            .constraints
            .extend(added.iter().cloned());
        Ok(added)
    }

    /// Remove every constraint of the bucket whose rhs is exactly `rhs`
    ///
    /// # Panics
    /// If the kind is locked under `predicate`.
    pub fn remove_constraint_rhs(
        &mut self,
        kind: &str,
        rhs: impl Into<ConsElem>,
        predicate: PredicateId,
    ) -> usize {
        let rhs = rhs.into();
        let key = self.key(kind, predicate);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return 0;
        };
        assert!(
            !bucket.locked,
            "removing constraints from locked kind {} under {}",
            kind, predicate
        );

        let mut removed = 0;
        let stats = &mut self.stats;
        bucket.constraints.retain(|c| {
            if c.rhs == rhs {
                trace!("Removing constraint {} under {}", c, kind);
                stats.record_removed(c.implicit, 1);
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Constraints currently held for `(predicate, kind)`
    pub fn constraints(&self, kind: &str, predicate: PredicateId) -> &[Constraint] {
        self.kinds
            .lookup(kind)
            .and_then(|k| self.buckets.get(&BucketKey::new(predicate, k)))
            .map(|b| b.constraints.as_slice())
            .unwrap_or(&[])
    }

    /// Replace a bucket with an ordered, deduplicated constraint set
    ///
    /// # Panics
    /// If the kind is locked under `predicate`.
    pub fn set_constraints(&mut self, set: BTreeSet<Constraint>, kind: &str, predicate: PredicateId) {
        let key = self.key(kind, predicate);
        let bucket = self.buckets.entry(key).or_default();
        assert!(
            !bucket.locked,
            "replacing constraints of locked kind {} under {}",
            kind, predicate
        );

        for c in &bucket.constraints {
            self.stats.record_removed(c.implicit, 1);
        }
        for c in &set {
            self.stats.record_added(c.implicit, 1);
        }
        bucket.constraints = set.into_iter().collect();
    }

    /// Copy every kind's constraints from `src` to `dest`, rewriting the predicate
    ///
    /// # Panics
    /// If a destination bucket is locked or a source bucket was released.
    pub fn copy_constraints(&mut self, src: PredicateId, dest: PredicateId) {
        if src == dest {
            return;
        }
        let mut sources: Vec<BucketKey> = self
            .buckets
            .keys()
            .filter(|k| k.predicate == src)
            .copied()
            .collect();
        sources.sort_unstable();

        for key in sources {
            let copied: Vec<Constraint> = {
                let bucket = &self.buckets[&key];
                assert!(
                    !bucket.released,
                    "copying released constraints of {}",
                    self.kinds.name(key.kind)
                );
                bucket.constraints.iter().map(|c| c.with_predicate(dest)).collect()
            };
            if copied.is_empty() {
                continue;
            }

            let target = self.buckets.entry(BucketKey::new(dest, key.kind)).or_default();
            assert!(
                !target.locked,
                "copying constraints into locked kind {} under {}",
                self.kinds.name(key.kind),
                dest
            );
            for c in &copied {
                self.stats.record_added(c.implicit, 1);
            }
            debug!("Copied {} constraints {} -> {}", copied.len(), src, dest);
            target.constraints.extend(copied);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Solving
    // ═══════════════════════════════════════════════════════════════════════

    /// Least solution over the union of `kinds` under `predicate`
    pub fn least_solution(&mut self, kinds: &[&str], predicate: PredicateId) -> PartialSolution {
        self.solution(kinds, predicate, Polarity::Least)
    }

    /// Greatest solution over the union of `kinds` under `predicate`
    pub fn greatest_solution(&mut self, kinds: &[&str], predicate: PredicateId) -> PartialSolution {
        self.solution(kinds, predicate, Polarity::Greatest)
    }

    fn solution(&mut self, kinds: &[&str], predicate: PredicateId, polarity: Polarity) -> PartialSolution {
        let start = Instant::now();

        let mut combined: Option<PartialSolution> = None;
        for kind in kinds {
            let key = self.key(kind, predicate);
            let solved = self.buckets.entry(key).or_default().solve(&self.ctx, polarity);
            match combined.as_mut() {
                None => combined = Some(solved.fork()),
                Some(acc) => acc.merge_in(solved),
            }
        }
        let solution =
            combined.unwrap_or_else(|| PartialSolution::new(self.ctx.clone(), &[], polarity));

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stats.solve_calls += 1;
        self.stats.solve_time_ms += elapsed_ms;
        if self.config.log_solve_timings {
            info!(
                "{} solution for {:?} under {} in {:.2}ms",
                polarity, kinds, predicate, elapsed_ms
            );
        }
        solution
    }

    /// Two-point solution over the concatenated constraints of `kinds`, already solved
    ///
    /// Locks every requested kind.
    pub fn fixpoint_solution(
        &mut self,
        kinds: &[&str],
        predicate: PredicateId,
        polarity: Polarity,
    ) -> FixpointSolver {
        let mut constraints = Vec::new();
        for kind in kinds {
            let key = self.key(kind, predicate);
            let bucket = self.buckets.entry(key).or_default();
            assert!(!bucket.released, "constraints of kind {} were released", kind);
            bucket.locked = true;
            constraints.extend(bucket.constraints.iter().cloned());
        }

        let mut solver = FixpointSolver::new(self.ctx.clone(), polarity, constraints);
        solver.solve();
        solver
    }

    pub fn is_locked(&self, kind: &str, predicate: PredicateId) -> bool {
        self.kinds
            .lookup(kind)
            .and_then(|k| self.buckets.get(&BucketKey::new(predicate, k)))
            .map_or(false, |b| b.locked)
    }

    /// Drop cached solutions under `predicate` and unlock their kinds
    ///
    /// Kinds whose constraints were already released stay locked with their
    /// caches intact. Returns the number of kinds unlocked.
    pub fn clear_solutions(&mut self, predicate: PredicateId) -> usize {
        let mut unlocked = 0;
        for (key, bucket) in self.buckets.iter_mut().filter(|(k, _)| k.predicate == predicate) {
            if !bucket.locked {
                continue;
            }
            if bucket.unlock() {
                unlocked += 1;
            } else {
                debug!(
                    "Kind {} under {} keeps its solutions: constraints released",
                    self.kinds.name(key.kind),
                    predicate
                );
            }
        }
        unlocked
    }
}
