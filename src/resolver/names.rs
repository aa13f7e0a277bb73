//! Generated node names

use indexmap::IndexMap;

use crate::node::NodeKind;

/// Hands out `object_1`, `component_1`, ... with one counter per kind.
///
/// One generator lives for one resolution pass; counters only move forward.
#[derive(Debug, Default, Clone)]
pub struct NameGenerator {
    counters: IndexMap<NodeKind, u64>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next name in the given category
    pub fn next(&mut self, kind: NodeKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}_{}", kind.prefix(), counter)
    }

    /// How many names have been generated for a category
    pub fn count(&self, kind: NodeKind) -> u64 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_kind() {
        let mut names = NameGenerator::new();
        assert_eq!(names.next(NodeKind::Object), "object_1");
        assert_eq!(names.next(NodeKind::Component), "component_1");
        assert_eq!(names.next(NodeKind::Object), "object_2");
        assert_eq!(names.next(NodeKind::Reference), "reference_1");
        assert_eq!(names.next(NodeKind::Layout), "layout_1");

        assert_eq!(names.count(NodeKind::Object), 2);
        assert_eq!(names.count(NodeKind::Layout), 1);
    }

    #[test]
    fn test_unused_kind_counts_zero() {
        let mut names = NameGenerator::new();
        names.next(NodeKind::Object);
        for kind in NodeKind::ALL {
            let expected = u64::from(kind == NodeKind::Object);
            assert_eq!(names.count(kind), expected);
        }
    }

    #[test]
    fn test_independent_generators() {
        let mut first = NameGenerator::new();
        let mut second = NameGenerator::new();
        first.next(NodeKind::Object);
        assert_eq!(second.next(NodeKind::Object), "object_1");
    }
}
