//! Points-to port
//!
//! Pointer analysis lives with the collaborator; taint queries on pointers
//! only need the abstract locations a value may address.

pub trait PointsTo<V, L> {
    /// Locations the value points to directly
    fn direct_locations(&self, value: &V) -> Vec<L>;

    /// Locations reachable from the value through any number of dereferences
    fn reachable_locations(&self, value: &V) -> Vec<L>;
}
