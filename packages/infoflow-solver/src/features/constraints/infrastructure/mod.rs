pub mod context;
pub mod element_store;

pub use context::AnalysisContext;
pub use element_store::ElementStore;
