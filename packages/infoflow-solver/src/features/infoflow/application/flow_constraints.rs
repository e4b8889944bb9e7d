//! Flow record → constraints
//!
//! For each record the sources are joined once (`upper_bound_set`) and every
//! sink is constrained to dominate that join. The kit expands the join on
//! insertion, so a record with n sources and m sinks stores n·m constraints.

use crate::features::constraints::{ConsElem, Constraint};
use crate::features::infoflow::domain::{is_flow_kind, FlowRecord};
use crate::features::kit::ConstraintKit;
use crate::shared::models::{ConstId, PredicateId};
use tracing::{debug, warn};

pub struct FlowConstraintGenerator<'k> {
    kit: &'k mut ConstraintKit,
    predicate: PredicateId,
    records: usize,
    generated: usize,
}

impl<'k> FlowConstraintGenerator<'k> {
    pub fn new(kit: &'k mut ConstraintKit) -> Self {
        Self {
            kit,
            predicate: PredicateId::TRUE,
            records: 0,
            generated: 0,
        }
    }

    /// Guard every generated constraint with `predicate`
    pub fn under(mut self, predicate: PredicateId) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn predicate(&self) -> PredicateId {
        self.predicate
    }

    pub fn kit(&mut self) -> &mut ConstraintKit {
        &mut *self.kit
    }

    /// (records processed, constraints stored)
    pub fn counts(&self) -> (usize, usize) {
        (self.records, self.generated)
    }

    /// Store the constraints of one record; returns them
    pub fn generate(&mut self, record: &FlowRecord) -> Vec<Constraint> {
        self.records += 1;
        if !record.has_sources() {
            warn!("Flow record with {} sinks has no sources", record.sinks.len());
            return Vec::new();
        }

        let mut added = Vec::new();
        if let Some(lub) = self.kit.upper_bound_set(record.sources.iter().copied()) {
            added.extend(self.constrain_sinks(record.kind(), lub, &record.sinks));
        }
        if let Some(lub) = self.kit.upper_bound_set(record.sink_sources.iter().copied()) {
            added.extend(self.constrain_sinks(record.sinks_kind(), lub, &record.sinks));
        }
        self.generated += added.len();
        added
    }

    pub fn generate_all<'r>(&mut self, records: impl IntoIterator<Item = &'r FlowRecord>) -> Vec<Constraint> {
        let mut added = Vec::new();
        for record in records {
            added.extend(self.generate(record));
        }
        debug!("Generated {} constraints from {} flow records", self.generated, self.records);
        added
    }

    fn constrain_sinks<'s>(
        &mut self,
        kind: &str,
        lub: ConsElem,
        sinks: impl IntoIterator<Item = &'s ConsElem>,
    ) -> Vec<Constraint> {
        let mut added = Vec::new();
        for sink in sinks {
            added.extend(self.kit.add_constraint(kind, lub, *sink, self.predicate, "flow"));
        }
        added
    }

    // ========================================================================
    // User labels
    // ========================================================================

    /// `label ⊑ elem` with `at_least`, otherwise `elem ⊑ label`
    ///
    /// # Panics
    /// On the flow-owned kinds `default` and `implicit`.
    pub fn set_label(&mut self, kind: &str, elem: impl Into<ConsElem>, label: ConstId, at_least: bool) -> Vec<Constraint> {
        assert!(!is_flow_kind(kind), "cannot add labels to the {} kind", kind);
        let elem = elem.into();
        let added = if at_least {
            self.kit.add_constraint(kind, label, elem, self.predicate, "label")
        } else {
            self.kit.add_constraint(kind, elem, label, self.predicate, "label")
        };
        self.generated += added.len();
        added
    }

    /// `top ⊑ elem`
    pub fn set_tainted(&mut self, kind: &str, elem: impl Into<ConsElem>) -> Vec<Constraint> {
        let top = self.kit.top();
        self.set_label(kind, elem, top, true)
    }

    /// `elem ⊑ bot`
    pub fn set_untainted(&mut self, kind: &str, elem: impl Into<ConsElem>) -> Vec<Constraint> {
        let bot = self.kit.bot();
        self.set_label(kind, elem, bot, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lattice::LatticeBuilder;
    use crate::features::solver::Solution;

    fn kit() -> ConstraintKit {
        ConstraintKit::new(
            LatticeBuilder::new()
                .level_axis("lvl", ["low", "high"])
                .unwrap()
                .lock(),
        )
    }

    #[test]
    fn test_record_constrains_each_sink() {
        let mut kit = kit();
        let (a, b) = (kit.new_var("a", ""), kit.new_var("b", ""));
        let (s1, s2) = (kit.new_var("s1", ""), kit.new_var("s2", ""));

        let mut flows = FlowConstraintGenerator::new(&mut kit);
        let added = flows.generate(&FlowRecord::explicit().source(a).source(b).sink(s1).sink(s2));

        assert_eq!(added.len(), 4);
        assert_eq!(flows.counts(), (1, 4));
        assert_eq!(kit.constraints("default", PredicateId::TRUE).len(), 4);
    }

    #[test]
    fn test_implicit_and_sink_sources_kinds() {
        let mut kit = kit();
        let (a, b, s) = (kit.new_var("a", ""), kit.new_var("b", ""), kit.new_var("s", ""));

        let mut flows = FlowConstraintGenerator::new(&mut kit);
        flows.generate(&FlowRecord::implicit().source(a).sink_source(b).sink(s));

        assert_eq!(kit.constraints("implicit", PredicateId::TRUE).len(), 1);
        let sinks = kit.constraints("implicit-sinks", PredicateId::TRUE);
        assert_eq!(sinks.len(), 1);
        assert!(sinks[0].implicit && sinks[0].sink);
    }

    #[test]
    fn test_record_without_sources_skipped() {
        let mut kit = kit();
        let s = kit.new_var("s", "");
        let mut flows = FlowConstraintGenerator::new(&mut kit);
        assert!(flows.generate(&FlowRecord::explicit().sink(s)).is_empty());
        assert_eq!(flows.counts(), (1, 0));
    }

    #[test]
    fn test_tainted_label_flows() {
        let mut kit = kit();
        let (a, s) = (kit.new_var("a", ""), kit.new_var("s", ""));

        let mut flows = FlowConstraintGenerator::new(&mut kit);
        flows.generate(&FlowRecord::explicit().source(a).sink(s));
        flows.set_tainted("taint", a);

        let solution = kit.least_solution(&["default", "taint"], PredicateId::TRUE);
        assert!(solution.is_tainted(s.into()));
    }

    #[test]
    #[should_panic(expected = "cannot add labels")]
    fn test_labels_rejected_on_flow_kinds() {
        let mut kit = kit();
        let a = kit.new_var("a", "");
        FlowConstraintGenerator::new(&mut kit).set_tainted("default", a);
    }
}
