//! Post-Order Tree Evaluation
//!
//! Generic bottom-up evaluator shared by the penalty and balance
//! aggregators. The walk is iterative: each node is pushed once to schedule
//! its descendants and a second time to trigger evaluation, so tree height
//! never becomes call-stack depth.

use std::collections::HashMap;

use crate::engine::VouchTreeNode;

/// Applies `f` to every node after all of its descendants and returns each
/// node's value keyed by its tree-local id. Leaves see an empty result set
/// for their (absent) children; the caller reads the root's entry for the
/// final aggregate.
pub fn walk_post_order<T, F>(root: &VouchTreeNode, mut f: F) -> HashMap<usize, T>
where
    F: FnMut(&VouchTreeNode, &HashMap<usize, T>) -> T,
{
    let mut results: HashMap<usize, T> = HashMap::new();
    let mut stack: Vec<(&VouchTreeNode, bool)> = vec![(root, false)];

    while let Some((node, visited)) = stack.pop() {
        if visited {
            let value = f(node, &results);
            results.insert(node.id, value);
            continue;
        }

        stack.push((node, true));
        for edge in &node.peers {
            stack.push((&edge.peer, false));
        }
    }

    results
}
