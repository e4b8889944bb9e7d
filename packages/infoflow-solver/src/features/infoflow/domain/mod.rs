pub mod flow_record;

pub use flow_record::{flow_kind, is_flow_kind, with_flow_kinds, FlowRecord};
