pub mod bucket;

pub use bucket::{BucketKey, ConstraintBucket, KindTable, KitStats};
