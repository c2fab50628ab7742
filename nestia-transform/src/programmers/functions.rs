//! Helper function registry.
//!
//! Named types are never expanded inline. Each one gets a numbered helper
//! per concern (`$io0` checks, `$so0` serializes, `$vo0` validates) and
//! every use site calls the helper. Numbers follow first-visit order, and
//! a helper body is produced once, even for recursive types.

use std::collections::{BTreeSet, HashMap, VecDeque};

/// Concern a helper function implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HelperKind {
    /// `$io<N>(input)`: structural check
    Is,
    /// `$so<N>(input)`: JSON serialization
    Stringify,
    /// `$vo<N>(input, path)`: check that reports every error
    Validate,
}

impl HelperKind {
    /// Name prefix of helpers of this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            HelperKind::Is => "$io",
            HelperKind::Stringify => "$so",
            HelperKind::Validate => "$vo",
        }
    }

    /// Helper name for the type numbered `index`.
    pub fn function_name(&self, index: usize) -> String {
        format!("{}{}", self.prefix(), index)
    }
}

/// A helper whose body still has to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHelper {
    /// Concern
    pub kind: HelperKind,
    /// Type number
    pub index: usize,
    /// Type name
    pub type_name: String,
}

/// Assigns helper numbers and tracks which helpers still need a body.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    names: Vec<String>,
    indices: HashMap<String, usize>,
    requested: BTreeSet<(HelperKind, usize)>,
    queue: VecDeque<(HelperKind, usize)>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the `kind` helper for `type_name`, queueing its body on
    /// first request.
    pub fn request(&mut self, kind: HelperKind, type_name: &str) -> String {
        let index = match self.indices.get(type_name) {
            Some(index) => *index,
            None => {
                let index = self.names.len();
                self.names.push(type_name.to_string());
                self.indices.insert(type_name.to_string(), index);
                index
            }
        };
        if self.requested.insert((kind, index)) {
            self.queue.push_back((kind, index));
        }
        kind.function_name(index)
    }

    /// Next helper whose body has not been generated yet.
    pub fn next_pending(&mut self) -> Option<PendingHelper> {
        let (kind, index) = self.queue.pop_front()?;
        Some(PendingHelper {
            kind,
            index,
            type_name: self.names[index].clone(),
        })
    }

    /// Number of distinct named types seen.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no helper was requested.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_first_visit() {
        let mut registry = FunctionRegistry::new();
        assert_eq!(registry.request(HelperKind::Is, "IArticle"), "$io0");
        assert_eq!(registry.request(HelperKind::Is, "IMember"), "$io1");
        assert_eq!(registry.request(HelperKind::Stringify, "IMember"), "$so1");
        assert_eq!(registry.request(HelperKind::Is, "IArticle"), "$io0");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_each_helper_is_pending_once() {
        let mut registry = FunctionRegistry::new();
        registry.request(HelperKind::Is, "INode");
        registry.request(HelperKind::Is, "INode");
        registry.request(HelperKind::Validate, "INode");

        let first = registry.next_pending().unwrap();
        assert_eq!((first.kind, first.index), (HelperKind::Is, 0));
        assert_eq!(first.type_name, "INode");

        // a recursive body asks for itself again
        registry.request(HelperKind::Is, "INode");

        let second = registry.next_pending().unwrap();
        assert_eq!(second.kind, HelperKind::Validate);
        assert!(registry.next_pending().is_none());
    }
}
