/*
 * Security Label (product lattice point)
 *
 * Label = levels × compartments, compared axis-wise:
 * - Level axis:       index order       (max = join, min = meet)
 * - Compartment axis: set inclusion     (∪ = join,   ∩ = meet)
 *
 * L1 ⊑ L2  iff  ∀ level axis a:  L1[a] ≤ L2[a]
 *          and  ∀ compartment c: L1[c] ⊆ L2[c]
 *
 * Axes are positional: index i of `levels` is the i-th level axis of the
 * lattice that produced the label. Labels from different lattices must not
 * be mixed; a shape mismatch is a contract violation and panics.
 *
 * References:
 * - Denning (1976): "A Lattice Model of Secure Information Flow"
 * - Bell & LaPadula (1973): categories as a subset lattice
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A point in the configured product lattice
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    /// Rank per level axis
    pub levels: Vec<u32>,

    /// Member indices per compartment axis
    pub compartments: Vec<BTreeSet<u32>>,
}

impl Label {
    pub fn new(levels: Vec<u32>, compartments: Vec<BTreeSet<u32>>) -> Self {
        Self {
            levels,
            compartments,
        }
    }

    /// Check if self ⊑ other (flows-to relation)
    pub fn leq(&self, other: &Label) -> bool {
        self.assert_same_shape(other);
        self.levels.iter().zip(&other.levels).all(|(a, b)| a <= b)
            && self
                .compartments
                .iter()
                .zip(&other.compartments)
                .all(|(a, b)| a.is_subset(b))
    }

    /// Join (least upper bound): ⊔
    pub fn join(&self, other: &Label) -> Label {
        self.assert_same_shape(other);
        Label {
            levels: self
                .levels
                .iter()
                .zip(&other.levels)
                .map(|(a, b)| *a.max(b))
                .collect(),
            compartments: self
                .compartments
                .iter()
                .zip(&other.compartments)
                .map(|(a, b)| a.union(b).copied().collect())
                .collect(),
        }
    }

    /// Meet (greatest lower bound): ⊓
    pub fn meet(&self, other: &Label) -> Label {
        self.assert_same_shape(other);
        Label {
            levels: self
                .levels
                .iter()
                .zip(&other.levels)
                .map(|(a, b)| *a.min(b))
                .collect(),
            compartments: self
                .compartments
                .iter()
                .zip(&other.compartments)
                .map(|(a, b)| a.intersection(b).copied().collect())
                .collect(),
        }
    }

    fn assert_same_shape(&self, other: &Label) {
        assert!(
            self.levels.len() == other.levels.len()
                && self.compartments.len() == other.compartments.len(),
            "labels from different lattices: {} level / {} compartment axes vs {} / {}",
            self.levels.len(),
            self.compartments.len(),
            other.levels.len(),
            other.compartments.len()
        );
    }
}
