//! Tree shape checks over (node, parent) edges
//!
//! Pure functions, no I/O. Used for the location type hierarchy, where each
//! edge is `(type code, parent type)`.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::value_objects::TreeRef;

/// Why a set of edges is not a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Nodes whose parent is neither the root nor another node
    #[error("nodes refer to a parent which doesn't exist: {}", join(.affected))]
    DanglingParent { affected: BTreeSet<String> },

    /// Nodes whose walk to the root loops
    #[error("parentage loops through: {}", join(.affected))]
    Cycle { affected: BTreeSet<String> },
}

impl TreeError {
    pub fn affected(&self) -> &BTreeSet<String> {
        match self {
            TreeError::DanglingParent { affected } | TreeError::Cycle { affected } => affected,
        }
    }
}

fn join(nodes: &BTreeSet<String>) -> String {
    nodes.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Check that `edges` form a forest hanging off the root.
///
/// Dangling parents are reported first; cycle detection never runs on a
/// set with dangling parents. A cycle error carries every node whose walk
/// upward loops, including nodes that merely lead into the loop.
pub fn assert_acyclic(edges: &[(String, TreeRef)]) -> Result<(), TreeError> {
    let parents: BTreeMap<&str, &TreeRef> =
        edges.iter().map(|(node, parent)| (node.as_str(), parent)).collect();

    let dangling: BTreeSet<String> = edges
        .iter()
        .filter(|(_, parent)| match parent.code() {
            Some(code) => !parents.contains_key(code),
            None => false,
        })
        .map(|(node, _)| node.clone())
        .collect();
    if !dangling.is_empty() {
        return Err(TreeError::DanglingParent { affected: dangling });
    }

    let mut rooted: BTreeSet<&str> = BTreeSet::new();
    let mut looping: BTreeSet<String> = BTreeSet::new();

    for (node, _) in edges {
        let mut walk: Vec<&str> = Vec::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut current = node.as_str();

        loop {
            if rooted.contains(current) {
                rooted.extend(walk);
                break;
            }
            if !seen.insert(current) {
                looping.extend(walk.iter().map(|n| n.to_string()));
                break;
            }
            walk.push(current);
            match parents.get(current).and_then(|p| p.code()) {
                Some(parent) => current = parent,
                None => {
                    rooted.extend(walk);
                    break;
                }
            }
        }
    }

    if looping.is_empty() {
        Ok(())
    } else {
        Err(TreeError::Cycle { affected: looping })
    }
}

/// Which nodes may be named as the ancestor to expand from, or the
/// descendant to sync to, for any given node.
///
/// Only meaningful for edges that passed [`assert_acyclic`].
#[derive(Debug, Clone, Default)]
pub struct ExpansionBounds {
    parents: BTreeMap<String, TreeRef>,
    children: BTreeMap<String, Vec<String>>,
}

/// Build the ancestor/descendant lookups for `edges`
pub fn compute_expansion_bounds(edges: &[(String, TreeRef)]) -> ExpansionBounds {
    let mut bounds = ExpansionBounds::default();
    for (node, parent) in edges {
        bounds.parents.insert(node.clone(), parent.clone());
        if let Some(parent) = parent.code() {
            bounds
                .children
                .entry(parent.to_string())
                .or_default()
                .push(node.clone());
        }
    }
    bounds
}

impl ExpansionBounds {
    /// `node`, each of its ancestors, and the root
    pub fn valid_ancestors_of(&self, node: &str) -> BTreeSet<TreeRef> {
        let mut valid = BTreeSet::new();
        valid.insert(TreeRef::Root);
        if !self.parents.contains_key(node) {
            return valid;
        }

        let mut current = node.to_string();
        // The step bound keeps malformed input from spinning forever
        for _ in 0..=self.parents.len() {
            if !valid.insert(TreeRef::code_of(current.as_str())) {
                break;
            }
            match self.parents.get(&current).and_then(|p| p.code()) {
                Some(parent) => current = parent.to_string(),
                None => break,
            }
        }
        valid
    }

    /// `node` and every node of its subtree
    pub fn valid_descendants_of(&self, node: &str) -> BTreeSet<String> {
        let mut valid = BTreeSet::new();
        let mut pending = vec![node.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(children) = self.children.get(&current) {
                pending.extend(children.iter().filter(|c| !valid.contains(*c)).cloned());
            }
            valid.insert(current);
        }
        valid
    }
}
