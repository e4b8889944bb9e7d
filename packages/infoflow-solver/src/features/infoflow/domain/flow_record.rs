//! Flow records handed over by the program-traversal collaborator

use crate::features::constraints::ConsElem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT: &str = "default";
pub const DEFAULT_SINKS: &str = "default-sinks";
pub const IMPLICIT: &str = "implicit";
pub const IMPLICIT_SINKS: &str = "implicit-sinks";

/// Built-in kind for a flow: `default` / `implicit`, with a `-sinks` variant
pub fn flow_kind(implicit: bool, sink: bool) -> &'static str {
    match (implicit, sink) {
        (false, false) => DEFAULT,
        (false, true) => DEFAULT_SINKS,
        (true, false) => IMPLICIT,
        (true, true) => IMPLICIT_SINKS,
    }
}

/// Kinds owned by flow generation; user labels go elsewhere
pub fn is_flow_kind(kind: &str) -> bool {
    kind == DEFAULT || kind == IMPLICIT
}

/// User kinds plus the flow kinds a query should see
///
/// `default` is always included, `default-sinks` with `sinks`, the implicit
/// kinds with `implicit`.
pub fn with_flow_kinds(kinds: &[&str], implicit: bool, sinks: bool) -> Vec<String> {
    let mut all: BTreeSet<String> = kinds.iter().map(|k| k.to_string()).collect();
    all.insert(DEFAULT.to_string());
    if sinks {
        all.insert(DEFAULT_SINKS.to_string());
    }
    if implicit {
        all.insert(IMPLICIT.to_string());
    }
    if implicit && sinks {
        all.insert(IMPLICIT_SINKS.to_string());
    }
    all.into_iter().collect()
}

/// `⊔ sources ⊑ each sink`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub sources: BTreeSet<ConsElem>,
    /// Sources whose flow is recorded in the `-sinks` kind instead
    pub sink_sources: BTreeSet<ConsElem>,
    /// Never joins
    pub sinks: BTreeSet<ConsElem>,
    pub implicit: bool,
    /// Overrides the built-in kind for `sources`
    pub kind: Option<String>,
}

impl FlowRecord {
    pub fn explicit() -> Self {
        Self::default()
    }

    pub fn implicit() -> Self {
        Self {
            implicit: true,
            ..Self::default()
        }
    }

    pub fn source(mut self, elem: impl Into<ConsElem>) -> Self {
        self.sources.insert(elem.into());
        self
    }

    pub fn sink_source(mut self, elem: impl Into<ConsElem>) -> Self {
        self.sink_sources.insert(elem.into());
        self
    }

    pub fn sink(mut self, elem: impl Into<ConsElem>) -> Self {
        self.sinks.insert(elem.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Kind receiving `sources ⊑ sinks`
    pub fn kind(&self) -> &str {
        self.kind
            .as_deref()
            .unwrap_or_else(|| flow_kind(self.implicit, false))
    }

    /// Kind receiving `sink_sources ⊑ sinks`
    pub fn sinks_kind(&self) -> &'static str {
        flow_kind(self.implicit, true)
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty() || !self.sink_sources.is_empty()
    }
}
