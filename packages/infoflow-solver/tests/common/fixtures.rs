//! Lattice and registry fixtures

use infoflow_solver::config::LatticeConfig;
use infoflow_solver::{ConstraintKit, Lattice, LatticeBuilder};

/// `lvl = [low, high]`
pub fn two_point_lattice() -> Lattice {
    LatticeBuilder::new()
        .level_axis("lvl", ["low", "high"])
        .expect("two-point axis")
        .lock()
}

/// `conf = [low, medium, high]`, `owners = {alice, bob, carol}`
pub fn product_lattice() -> Lattice {
    let config = LatticeConfig::default()
        .with_levels("conf", ["low", "medium", "high"])
        .with_compartment("owners", ["alice", "bob", "carol"]);
    LatticeBuilder::from_config(&config).expect("product lattice")
}

pub fn two_point_kit() -> ConstraintKit {
    ConstraintKit::new(two_point_lattice())
}

pub fn product_kit() -> ConstraintKit {
    ConstraintKit::new(product_lattice())
}

/// Install a subscriber once so `RUST_LOG` works in tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
