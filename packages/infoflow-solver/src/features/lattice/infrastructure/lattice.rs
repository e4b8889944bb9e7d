/*
 * Configured Lattice + Constant Interning
 *
 * Two phases:
 * - LatticeBuilder: axis tables are mutable, no constant can exist
 * - Lattice:        axis tables are frozen (locked), constants are interned
 *
 * Locking is the `LatticeBuilder::lock` move, so "constant before lock" and
 * "axis after lock" cannot be expressed.
 *
 * Interning:
 * - Arena of `Arc<Label>` + structural index: equal labels ⇒ equal ConstId
 * - Join/meet of constants memoized per unordered pair (DashMap, shared
 *   with solver threads)
 *
 * Performance:
 * - constant(): read-locked lookup, write lock only on first sight
 * - join()/meet(): O(1) after first computation of a pair
 */

use crate::config::LatticeConfig;
use crate::errors::{Result, SolverError};
use crate::features::lattice::domain::{CompartmentAxis, Label, LevelAxis};
use crate::shared::models::ConstId;
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Builder (unlocked lattice)
// ============================================================================

/// Axis tables under construction
#[derive(Debug, Clone, Default)]
pub struct LatticeBuilder {
    levels: Vec<LevelAxis>,
    compartments: Vec<CompartmentAxis>,
    names: FxHashSet<String>,
}

impl LatticeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and lock a lattice from configuration
    pub fn from_config(config: &LatticeConfig) -> Result<Lattice> {
        let mut builder = Self::new();
        for axis in &config.levels {
            builder = builder.level_axis(&axis.name, axis.level.iter().cloned())?;
        }
        for axis in &config.compartments {
            builder = builder.compartment_axis(&axis.name, axis.set.iter().cloned())?;
        }
        Ok(builder.lock())
    }

    /// Add a totally-ordered axis, lowest level first
    pub fn level_axis<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        levels: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        self.claim_name(&name)?;

        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            return Err(SolverError::EmptyLevelAxis(name));
        }
        let mut seen = FxHashSet::default();
        for level in &levels {
            if !seen.insert(level.as_str()) {
                return Err(SolverError::DuplicateLevel {
                    axis: name,
                    level: level.clone(),
                });
            }
        }

        self.levels.push(LevelAxis::new(name, levels));
        Ok(self)
    }

    /// Add a subset-ordered axis over a finite universe
    pub fn compartment_axis<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        self.claim_name(&name)?;

        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        let mut seen = FxHashSet::default();
        for member in &members {
            if !seen.insert(member.as_str()) {
                return Err(SolverError::DuplicateMember {
                    axis: name,
                    member: member.clone(),
                });
            }
        }

        self.compartments.push(CompartmentAxis::new(name, members));
        Ok(self)
    }

    /// A builder is never locked; locking consumes it.
    pub fn is_locked(&self) -> bool {
        false
    }

    /// Freeze the axis tables
    pub fn lock(mut self) -> Lattice {
        self.levels.sort_by(|a, b| a.name.cmp(&b.name));
        self.compartments.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Lattice locked: {} level axes, {} compartment axes",
            self.levels.len(),
            self.compartments.len()
        );
        Lattice::new(self.levels, self.compartments)
    }

    fn claim_name(&mut self, name: &str) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(SolverError::DuplicateAxis(name.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Locked lattice
// ============================================================================

#[derive(Debug, Default)]
struct ConstantTable {
    labels: Vec<Arc<Label>>,
    index: FxHashMap<Arc<Label>, ConstId>,
}

impl ConstantTable {
    fn lookup(&self, label: &Label) -> Option<ConstId> {
        self.index.get(label).copied()
    }

    fn intern(&mut self, label: Label) -> ConstId {
        if let Some(id) = self.lookup(&label) {
            return id;
        }
        let id = ConstId::from_index(self.labels.len());
        let label = Arc::new(label);
        self.labels.push(Arc::clone(&label));
        self.index.insert(label, id);
        id
    }
}

/// Locked product lattice owning the constant table
#[derive(Debug)]
pub struct Lattice {
    level_axes: Vec<LevelAxis>,
    compartment_axes: Vec<CompartmentAxis>,
    constants: RwLock<ConstantTable>,
    join_memo: DashMap<(ConstId, ConstId), ConstId>,
    meet_memo: DashMap<(ConstId, ConstId), ConstId>,
    bottom: ConstId,
    top: ConstId,
}

impl Lattice {
    fn new(level_axes: Vec<LevelAxis>, compartment_axes: Vec<CompartmentAxis>) -> Self {
        let mut table = ConstantTable::default();

        let bottom_label = Label::new(
            vec![0; level_axes.len()],
            vec![BTreeSet::new(); compartment_axes.len()],
        );
        let top_label = Label::new(
            level_axes.iter().map(LevelAxis::top_index).collect(),
            compartment_axes
                .iter()
                .map(|axis| (0..axis.universe_size() as u32).collect())
                .collect(),
        );
        let bottom = table.intern(bottom_label);
        let top = table.intern(top_label);

        Self {
            level_axes,
            compartment_axes,
            constants: RwLock::new(table),
            join_memo: DashMap::new(),
            meet_memo: DashMap::new(),
            bottom,
            top,
        }
    }

    /// A `Lattice` value only exists once its axes are locked.
    pub fn is_locked(&self) -> bool {
        true
    }

    #[inline]
    pub fn bottom(&self) -> ConstId {
        self.bottom
    }

    #[inline]
    pub fn top(&self) -> ConstId {
        self.top
    }

    pub fn level_axes(&self) -> &[LevelAxis] {
        &self.level_axes
    }

    pub fn compartment_axes(&self) -> &[CompartmentAxis] {
        &self.compartment_axes
    }

    pub(crate) fn level_axis_position(&self, name: &str) -> Option<usize> {
        self.level_axes
            .binary_search_by(|axis| axis.name.as_str().cmp(name))
            .ok()
    }

    pub(crate) fn compartment_axis_position(&self, name: &str) -> Option<usize> {
        self.compartment_axes
            .binary_search_by(|axis| axis.name.as_str().cmp(name))
            .ok()
    }

    /// Number of interned constants (bottom and top included)
    pub fn constant_count(&self) -> usize {
        self.constants.read().labels.len()
    }

    // ------------------------------------------------------------------------
    // Constants
    // ------------------------------------------------------------------------

    /// Intern a label
    ///
    /// Panics if the label was not shaped by this lattice.
    pub fn constant(&self, label: Label) -> ConstId {
        self.assert_in_lattice(&label);
        if let Some(id) = self.constants.read().lookup(&label) {
            return id;
        }
        self.constants.write().intern(label)
    }

    /// Label behind a constant
    pub fn label(&self, id: ConstId) -> Arc<Label> {
        Arc::clone(&self.constants.read().labels[id.index()])
    }

    /// Build a label by axis/level names; omitted axes are at bottom
    pub fn make_label(&self, levels: &[(&str, &str)], compartments: &[(&str, &[&str])]) -> Result<Label> {
        let mut label = Label::new(
            vec![0; self.level_axes.len()],
            vec![BTreeSet::new(); self.compartment_axes.len()],
        );

        for &(axis_name, level) in levels {
            let pos = self
                .level_axis_position(axis_name)
                .ok_or_else(|| SolverError::UnknownAxis(axis_name.to_string()))?;
            let axis = &self.level_axes[pos];
            label.levels[pos] = axis.index_of(level).ok_or_else(|| SolverError::UnknownLevel {
                axis: axis_name.to_string(),
                level: level.to_string(),
            })?;
        }

        for &(axis_name, members) in compartments {
            let pos = self
                .compartment_axis_position(axis_name)
                .ok_or_else(|| SolverError::UnknownAxis(axis_name.to_string()))?;
            let axis = &self.compartment_axes[pos];
            for member in members {
                let idx = axis.index_of(member).ok_or_else(|| SolverError::UnknownMember {
                    axis: axis_name.to_string(),
                    member: member.to_string(),
                })?;
                label.compartments[pos].insert(idx);
            }
        }

        Ok(label)
    }

    /// Intern a label built by names
    pub fn named_constant(&self, levels: &[(&str, &str)], compartments: &[(&str, &[&str])]) -> Result<ConstId> {
        Ok(self.constant(self.make_label(levels, compartments)?))
    }

    // ------------------------------------------------------------------------
    // Order + operations on interned constants
    // ------------------------------------------------------------------------

    /// a ⊑ b (structural comparison of the underlying labels)
    pub fn leq(&self, a: ConstId, b: ConstId) -> bool {
        if a == b || a == self.bottom || b == self.top {
            return true;
        }
        let table = self.constants.read();
        table.labels[a.index()].leq(&table.labels[b.index()])
    }

    /// a ⊔ b
    pub fn join(&self, a: ConstId, b: ConstId) -> ConstId {
        if a == b || b == self.bottom {
            return a;
        }
        if a == self.bottom {
            return b;
        }
        let key = (a.min(b), a.max(b));
        if let Some(hit) = self.join_memo.get(&key) {
            return *hit;
        }
        let joined = {
            let table = self.constants.read();
            table.labels[a.index()].join(&table.labels[b.index()])
        };
        let id = self.constant(joined);
        self.join_memo.insert(key, id);
        id
    }

    /// a ⊓ b
    pub fn meet(&self, a: ConstId, b: ConstId) -> ConstId {
        if a == b || b == self.top {
            return a;
        }
        if a == self.top {
            return b;
        }
        let key = (a.min(b), a.max(b));
        if let Some(hit) = self.meet_memo.get(&key) {
            return *hit;
        }
        let met = {
            let table = self.constants.read();
            table.labels[a.index()].meet(&table.labels[b.index()])
        };
        let id = self.constant(met);
        self.meet_memo.insert(key, id);
        id
    }

    fn assert_in_lattice(&self, label: &Label) {
        assert!(
            label.levels.len() == self.level_axes.len()
                && label.compartments.len() == self.compartment_axes.len(),
            "label shape does not match the configured lattice"
        );
        for (rank, axis) in label.levels.iter().zip(&self.level_axes) {
            assert!(
                *rank <= axis.top_index(),
                "level rank {} out of range on axis '{}'",
                rank,
                axis.name
            );
        }
        for (set, axis) in label.compartments.iter().zip(&self.compartment_axes) {
            if let Some(&max) = set.iter().next_back() {
                assert!(
                    (max as usize) < axis.universe_size(),
                    "member index {} outside compartment '{}'",
                    max,
                    axis.name
                );
            }
        }
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Levels: [")?;
        for axis in &self.level_axes {
            write!(f, " {}: {{ {} }}", axis.name, axis.levels.join(" -> "))?;
        }
        write!(f, " ] Compartments: [")?;
        for axis in &self.compartment_axes {
            write!(f, " {}: {{ {} }}", axis.name, axis.members.join(", "))?;
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lattice {
        LatticeBuilder::new()
            .level_axis("conf", ["low", "medium", "high"])
            .unwrap()
            .compartment_axis("owners", ["bob", "alice"])
            .unwrap()
            .lock()
    }

    #[test]
    fn test_bottom_top_interned() {
        let lattice = sample();
        assert_eq!(lattice.constant_count(), 2);
        assert!(lattice.leq(lattice.bottom(), lattice.top()));
        assert!(!lattice.leq(lattice.top(), lattice.bottom()));
        assert!(lattice.is_locked());
    }

    #[test]
    fn test_constant_interning() {
        let lattice = sample();
        let a = lattice.named_constant(&[("conf", "medium")], &[]).unwrap();
        let b = lattice.named_constant(&[("conf", "medium")], &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(lattice.constant_count(), 3);
    }

    #[test]
    fn test_make_label_defaults_to_bottom() {
        let lattice = sample();
        let label = lattice.make_label(&[], &[("owners", &["alice"])]).unwrap();
        assert_eq!(label.levels, vec![0]);
        assert_eq!(label.compartments[0].len(), 1);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let lattice = sample();
        assert!(matches!(
            lattice.make_label(&[("integrity", "low")], &[]),
            Err(SolverError::UnknownAxis(_))
        ));
        assert!(matches!(
            lattice.make_label(&[("conf", "secret")], &[]),
            Err(SolverError::UnknownLevel { .. })
        ));
        assert!(matches!(
            lattice.make_label(&[], &[("owners", &["eve"])]),
            Err(SolverError::UnknownMember { .. })
        ));
    }

    #[test]
    fn test_join_meet_memoized() {
        let lattice = sample();
        let a = lattice
            .named_constant(&[("conf", "high")], &[("owners", &["alice"])])
            .unwrap();
        let b = lattice
            .named_constant(&[("conf", "low")], &[("owners", &["bob"])])
            .unwrap();
        let j1 = lattice.join(a, b);
        let j2 = lattice.join(b, a);
        assert_eq!(j1, j2);
        assert_eq!(j1, lattice.top());
        assert_eq!(lattice.meet(a, b), lattice.bottom());
        assert!(lattice.leq(a, j1) && lattice.leq(b, j1));
    }

    #[test]
    fn test_duplicate_axis_rejected() {
        let err = LatticeBuilder::new()
            .level_axis("x", ["a"])
            .unwrap()
            .compartment_axis("x", ["m"])
            .unwrap_err();
        assert!(matches!(err, SolverError::DuplicateAxis(_)));
    }

    #[test]
    fn test_empty_and_duplicate_levels_rejected() {
        assert!(matches!(
            LatticeBuilder::new().level_axis("x", Vec::<String>::new()),
            Err(SolverError::EmptyLevelAxis(_))
        ));
        assert!(matches!(
            LatticeBuilder::new().level_axis("x", ["a", "a"]),
            Err(SolverError::DuplicateLevel { .. })
        ));
        assert!(matches!(
            LatticeBuilder::new().compartment_axis("c", ["m", "m"]),
            Err(SolverError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = LatticeConfig::two_point("taint").with_compartment("src", ["net", "file"]);
        let lattice = LatticeBuilder::from_config(&config).unwrap();
        assert_eq!(lattice.level_axes().len(), 1);
        assert_eq!(lattice.compartment_axes()[0].members, vec!["file", "net"]);
    }

    #[test]
    fn test_display() {
        let lattice = sample();
        assert_eq!(
            lattice.to_string(),
            "Levels: [ conf: { low -> medium -> high } ] Compartments: [ owners: { alice, bob } ]"
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_foreign_label_panics() {
        let lattice = sample();
        lattice.constant(Label::new(vec![7], vec![BTreeSet::new()]));
    }
}
