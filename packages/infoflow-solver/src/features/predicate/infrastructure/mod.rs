pub mod partition;

pub use partition::PartitionResult;
