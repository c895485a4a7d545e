use crate::error::AbortReason;
use crate::model::ModuleNode;
use std::collections::{HashMap, HashSet, VecDeque};

/// Finds the single module with no parent at level 1.
pub fn resolve_root(nodes: &[ModuleNode]) -> Result<&ModuleNode, AbortReason> {
    let mut root = None;
    for node in nodes.iter().filter(|n| n.is_root_candidate()) {
        if root.is_some() {
            return Err(AbortReason::MultipleRoots);
        }
        root = Some(node);
    }
    root.ok_or(AbortReason::NoRoot)
}

/// Checks that `nodes` is a tree hanging from `root`.
///
/// Every module must be defined once, point at an existing parent, be
/// reachable from the root, and own a phone key that is unique among its
/// siblings, since the extension name is derived from (parent, key).
pub fn validate_tree(root: &ModuleNode, nodes: &[ModuleNode]) -> Result<(), AbortReason> {
    let mut ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !ids.insert(node.id) {
            return Err(AbortReason::DuplicateModule(node.id));
        }
    }

    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut keys: HashMap<(i64, &str), i64> = HashMap::new();
    for node in nodes {
        let Some(parent) = node.parent_id else {
            continue;
        };
        if !ids.contains(&parent) {
            return Err(AbortReason::DanglingParent {
                module: node.id,
                parent,
            });
        }
        if let Some(first) = keys.insert((parent, node.phone_key.as_str()), node.id) {
            return Err(AbortReason::DuplicatePhoneKey {
                parent,
                phone_key: node.phone_key.clone(),
                first,
                second: node.id,
            });
        }
        children.entry(parent).or_default().push(node.id);
    }

    let mut visited = HashSet::with_capacity(nodes.len());
    let mut queue = VecDeque::from([root.id]);
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(ids) = children.get(&id) {
            queue.extend(ids.iter().copied());
        }
    }

    match nodes.iter().find(|n| !visited.contains(&n.id)) {
        Some(node) => Err(AbortReason::Unreachable(node.id)),
        None => Ok(()),
    }
}
