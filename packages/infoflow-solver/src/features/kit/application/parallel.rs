/*
 * Parallel Solving
 *
 * Two patterns, neither sharing mutable state:
 *
 * 1. solve_both: least and greatest solutions of ONE bucket built together
 *    (rayon::join). Both tasks only read the bucket's constraint list.
 *
 * 2. solve_least_many: per-kind least solutions are built and cached on the
 *    calling thread, then forked. The forks are dealt round-robin to a
 *    bounded pool (SolverConfig::merge_workers); each worker merges the
 *    read-only baseline ("default", optionally "default-sinks") into the
 *    forks it owns. Merging is a join of joins, so the dealing order never
 *    changes the result.
 *
 * Without the `parallel` feature both run sequentially.
 */

use super::constraint_kit::ConstraintKit;
use crate::errors::Result;
use crate::features::solver::{PartialSolution, Polarity};
use crate::shared::models::PredicateId;
use std::time::Instant;
use tracing::{debug, info};

/// Baseline kind merged into every per-kind solution
pub const DEFAULT_KIND: &str = "default";
/// Optional second baseline holding sink constraints
pub const DEFAULT_SINKS_KIND: &str = "default-sinks";

impl ConstraintKit {
    /// Least and greatest solutions of one kind, built concurrently and cached
    ///
    /// # Panics
    /// If the kind is already locked under `predicate`.
    pub fn solve_both(&mut self, kind: &str, predicate: PredicateId) -> (PartialSolution, PartialSolution) {
        let start = Instant::now();
        let key = self.key(kind, predicate);
        let bucket = self.buckets.entry(key).or_default();
        assert!(!bucket.locked, "kind {} already solved under {}", kind, predicate);
        bucket.locked = true;

        let ctx = &self.ctx;
        let constraints = &bucket.constraints;
        let build = |polarity| PartialSolution::new(ctx.clone(), constraints, polarity);

        #[cfg(feature = "parallel")]
        let (least, greatest) = rayon::join(|| build(Polarity::Least), || build(Polarity::Greatest));
        #[cfg(not(feature = "parallel"))]
        let (least, greatest) = (build(Polarity::Least), build(Polarity::Greatest));

        bucket.store(Polarity::Least, least.clone());
        bucket.store(Polarity::Greatest, greatest.clone());

        if self.config.log_solve_timings {
            info!(
                "Solved {} under {} for both polarities in {:.2}ms",
                kind,
                predicate,
                start.elapsed().as_secs_f64() * 1000.0
            );
        }
        (least, greatest)
    }

    /// Per-kind least solutions, each merged with the baseline kinds
    ///
    /// Results are returned in the order of `kinds`. Builds (and locks) the
    /// baseline kinds if they were not solved yet.
    ///
    /// # Panics
    /// If any of `kinds` is already locked under `predicate`.
    pub fn solve_least_many(
        &mut self,
        kinds: &[&str],
        use_default_sinks: bool,
        predicate: PredicateId,
    ) -> Result<Vec<PartialSolution>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }
        for kind in kinds {
            assert!(
                !self.is_locked(kind, predicate),
                "kind {} already solved under {}",
                kind,
                predicate
            );
        }
        let start = Instant::now();

        let baseline = self.cached_least(DEFAULT_KIND, predicate);
        let sinks_baseline = if use_default_sinks {
            Some(self.cached_least(DEFAULT_SINKS_KIND, predicate))
        } else {
            None
        };

        let forks: Vec<PartialSolution> = kinds
            .iter()
            .map(|kind| self.cached_least(kind, predicate).fork())
            .collect();

        let merged = self.merge_with_baseline(forks, &baseline, sinks_baseline.as_ref())?;

        if self.config.log_solve_timings {
            info!(
                "Solved {} kinds against the baseline under {} in {:.2}ms",
                kinds.len(),
                predicate,
                start.elapsed().as_secs_f64() * 1000.0
            );
        }
        Ok(merged)
    }

    fn cached_least(&mut self, kind: &str, predicate: PredicateId) -> PartialSolution {
        let key = self.key(kind, predicate);
        self.buckets
            .entry(key)
            .or_default()
            .solve(&self.ctx, Polarity::Least)
            .clone()
    }

    #[cfg(feature = "parallel")]
    fn merge_with_baseline(
        &self,
        forks: Vec<PartialSolution>,
        baseline: &PartialSolution,
        sinks_baseline: Option<&PartialSolution>,
    ) -> Result<Vec<PartialSolution>> {
        let workers = self.config.merge_workers.clamp(1, forks.len());

        let mut assignments: Vec<Vec<(usize, PartialSolution)>> = vec![Vec::new(); workers];
        for (idx, fork) in forks.into_iter().enumerate() {
            assignments[idx % workers].push((idx, fork));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("merge-worker-{}", i))
            .build()?;

        debug!("Merging baseline into {} solutions on {} workers", assignments.iter().map(Vec::len).sum::<usize>(), workers);

        pool.scope(|s| {
            for assigned in assignments.iter_mut() {
                s.spawn(move |_| {
                    for (_, solution) in assigned.iter_mut() {
                        solution.merge_in(baseline);
                        if let Some(sinks) = sinks_baseline {
                            solution.merge_in(sinks);
                        }
                    }
                });
            }
        });

        let mut merged: Vec<(usize, PartialSolution)> = assignments.into_iter().flatten().collect();
        merged.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(merged.into_iter().map(|(_, solution)| solution).collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn merge_with_baseline(
        &self,
        mut forks: Vec<PartialSolution>,
        baseline: &PartialSolution,
        sinks_baseline: Option<&PartialSolution>,
    ) -> Result<Vec<PartialSolution>> {
        debug!("Merging baseline into {} solutions sequentially", forks.len());
        for solution in forks.iter_mut() {
            solution.merge_in(baseline);
            if let Some(sinks) = sinks_baseline {
                solution.merge_in(sinks);
            }
        }
        Ok(forks)
    }
}
