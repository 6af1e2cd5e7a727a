// ABOUTME: Per-call registry of body elements keyed by structural fingerprint.
// ABOUTME: Drives the index -> measure -> aggregate phases and enforces their order.

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::{Html, Node};

use crate::density::{compute_density, DensityStats};
use crate::dom::element_name;
use crate::dom::fingerprint::{fingerprint, Fingerprint};
use crate::score::cumulative_score;

/// One registered element.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub fingerprint: Fingerprint,
    /// Fingerprint of the parent element, `None` when the parent was not registered.
    pub parent: Option<Fingerprint>,
    /// Last element registered under this fingerprint.
    pub node: NodeId,
    /// Set by [`Registry::measure`].
    pub density: Option<DensityStats>,
    /// Set by [`Registry::aggregate`].
    pub cumulative_score: Option<i64>,
}

impl TreeEntry {
    /// Text density of this entry, zero before measuring.
    pub fn text_density(&self) -> i64 {
        self.density
            .as_ref()
            .map(DensityStats::text_density)
            .unwrap_or(0)
    }

    /// Cumulative score of this entry, zero before aggregation.
    pub fn score(&self) -> i64 {
        self.cumulative_score.unwrap_or(0)
    }
}

/// Which stages have run over a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Indexed,
    Measured,
    Aggregated,
}

/// Fingerprint-keyed index of every element at or below `<body>`.
///
/// Entries keep the order in which their fingerprint was first registered,
/// which makes every later ordering deterministic for a given document.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<TreeEntry>,
    by_fingerprint: HashMap<Fingerprint, usize>,
    phase: Phase,
}

impl Registry {
    /// Walk the document in pre-order and register every element from `<body>` onward.
    ///
    /// Registration starts at the first `<body>` element and never stops. A
    /// fingerprint seen twice keeps its entry but points at the newer node.
    pub fn index(doc: &Html) -> Self {
        let mut registry = Registry {
            entries: Vec::new(),
            by_fingerprint: HashMap::new(),
            phase: Phase::Indexed,
        };

        let mut in_body = false;
        for node in doc.tree.root().descendants() {
            let Some(name) = element_name(node.value()) else {
                continue;
            };
            if !in_body && name.eq_ignore_ascii_case("body") {
                in_body = true;
            }
            if !in_body {
                continue;
            }

            let key = fingerprint(node.value());
            let parent = node
                .parent()
                .filter(|p| matches!(p.value(), Node::Element(_)))
                .map(|p| fingerprint(p.value()))
                .filter(|p| registry.contains(p.as_str()));
            registry.insert(key, parent, node.id());
        }

        tracing::debug!(entries = registry.len(), "indexed document");
        registry
    }

    fn insert(&mut self, key: Fingerprint, parent: Option<Fingerprint>, node: NodeId) {
        match self.by_fingerprint.get(&key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.parent = parent;
                entry.node = node;
            }
            None => {
                self.by_fingerprint.insert(key.clone(), self.entries.len());
                self.entries.push(TreeEntry {
                    fingerprint: key,
                    parent,
                    node,
                    density: None,
                    cumulative_score: None,
                });
            }
        }
    }

    /// Compute density statistics for every entry, exactly once.
    pub fn measure(&mut self, doc: &Html) {
        if self.phase >= Phase::Measured {
            return;
        }
        for entry in &mut self.entries {
            let stats = doc
                .tree
                .get(entry.node)
                .map(compute_density)
                .unwrap_or_default();
            entry.density = Some(stats);
        }
        self.phase = Phase::Measured;
    }

    /// Compute the cumulative score of every entry from finalized densities.
    ///
    /// Measures first if that has not happened yet.
    pub fn aggregate(&mut self, doc: &Html) {
        if self.phase >= Phase::Aggregated {
            return;
        }
        self.measure(doc);

        let scores: Vec<i64> = self
            .entries
            .iter()
            .map(|entry| cumulative_score(self, doc, entry))
            .collect();
        for (entry, score) in self.entries.iter_mut().zip(scores) {
            entry.cumulative_score = Some(score);
        }
        self.phase = Phase::Aggregated;
    }

    /// Index, measure, and aggregate in one go.
    pub fn build(doc: &Html) -> Self {
        let mut registry = Registry::index(doc);
        registry.aggregate(doc);
        registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn get(&self, key: &str) -> Option<&TreeEntry> {
        self.by_fingerprint.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_fingerprint.contains_key(key)
    }

    /// Entries in first-registration order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
