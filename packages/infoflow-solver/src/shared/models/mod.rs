//! Arena handles
//!
//! Every interned or registered object (constants, variables, joins,
//! predicates, kinds) is addressed by a dense `u32` handle into the arena
//! that owns it. Handle equality is identity.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Arena index
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                assert!(index <= u32::MAX as usize, concat!(stringify!($name), " arena overflow"));
                Self(index as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

arena_id!(
    /// Interned lattice constant
    ConstId,
    "C"
);
arena_id!(
    /// Constraint variable
    VarId,
    "V"
);
arena_id!(
    /// Interned join of elements
    JoinId,
    "J"
);
arena_id!(
    /// Registered path predicate
    PredicateId,
    "P"
);
arena_id!(
    /// Interned constraint kind name
    KindId,
    "K"
);

impl PredicateId {
    /// The always-true predicate, registered first in every kit
    pub const TRUE: PredicateId = PredicateId(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(VarId(3).to_string(), "V3");
        assert_eq!(PredicateId::TRUE.to_string(), "P0");
    }

    #[test]
    fn test_id_ordering_is_index_ordering() {
        assert!(JoinId(1) < JoinId(2));
        assert_eq!(ConstId::from_index(7).index(), 7);
    }
}
