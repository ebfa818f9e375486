//! Vouch-Tree Expansion
//!
//! The vouch relation is a directed graph and may contain cycles. Queries
//! never aggregate over the graph directly; instead it is unfolded into a
//! per-query tree rooted at the queried user. Cycle avoidance is per-path:
//! a user already on the current root-to-leaf path is skipped, but the same
//! user may still appear in sibling subtrees. Each branch therefore carries
//! its own snapshot of the ancestor set.

use std::collections::{HashMap, HashSet};

use crate::engine::service::IdentityService;
use crate::engine::VouchEvent;

/// Which way edges are followed during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow `from -> to`: the users the root vouches for, transitively.
    Outgoing,
    /// Follow `to <- from`: the users vouching for the root, transitively.
    Incoming,
}

/// An edge of an expanded tree. The peer node is exclusively owned by the
/// edge; trees never share nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchTreeEdge {
    /// The vouch that produced this edge
    pub event: VouchEvent,

    /// The neighbor the edge leads to
    pub peer: VouchTreeNode,
}

/// A node of an expanded vouch tree, valid for a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchTreeNode {
    /// Identity of the node within its tree; assigned during expansion
    pub id: usize,

    /// User this node stands for
    pub user: String,

    /// Distance from the root (root = 0)
    pub depth: u32,

    /// Edges to the peers reached from this node
    pub peers: Vec<VouchTreeEdge>,
}

impl VouchTreeNode {
    /// All distinct user identifiers mentioned anywhere in this tree.
    pub fn users(&self) -> HashSet<&str> {
        let mut users = HashSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            users.insert(node.user.as_str());
            for edge in &node.peers {
                stack.push(&edge.peer);
            }
        }
        users
    }
}

/// Flat node collected during expansion; assembled into the owned tree once
/// all edges are known.
struct FlatNode {
    user: String,
    depth: u32,
    children: Vec<(usize, VouchEvent)>,
}

impl IdentityService {
    /// Expands the vouch graph around `root` into a tree.
    ///
    /// `depth` bounds the distance from root to any leaf; 0 yields a single
    /// node and a negative depth removes the bound (the per-path cycle rule
    /// still guarantees termination). The root node is created even when no
    /// vouches touch the user. Edge order follows the store's return order.
    pub async fn expand_tree(&self, root: &str, depth: i32, direction: Direction) -> VouchTreeNode {
        let mut flat = vec![FlatNode {
            user: root.to_string(),
            depth: 0,
            children: Vec::new(),
        }];

        let mut root_path = HashSet::new();
        root_path.insert(root.to_string());
        let mut stack: Vec<(usize, HashSet<String>)> = vec![(0, root_path)];

        while let Some((idx, path)) = stack.pop() {
            let node_depth = flat[idx].depth;
            if depth >= 0 && node_depth >= depth as u32 {
                continue;
            }

            let user = flat[idx].user.clone();
            let edges = match direction {
                Direction::Outgoing => self.vouches_from(&user).await,
                Direction::Incoming => self.vouches_to(&user).await,
            };

            for event in edges {
                let peer = match direction {
                    Direction::Outgoing => event.to.clone(),
                    Direction::Incoming => event.from.clone(),
                };
                if path.contains(&peer) {
                    continue;
                }

                let child_idx = flat.len();
                flat.push(FlatNode {
                    user: peer.clone(),
                    depth: node_depth + 1,
                    children: Vec::new(),
                });
                flat[idx].children.push((child_idx, event));

                let mut child_path = path.clone();
                child_path.insert(peer);
                stack.push((child_idx, child_path));
            }
        }

        assemble(flat, root)
    }

    /// Tree of users the root vouches for (penalty inheritance).
    pub async fn outgoing_tree(&self, user: &str, depth: i32) -> VouchTreeNode {
        self.expand_tree(user, depth, Direction::Outgoing).await
    }

    /// Tree of users vouching for the root (balance inheritance).
    pub async fn incoming_tree(&self, user: &str, depth: i32) -> VouchTreeNode {
        self.expand_tree(user, depth, Direction::Incoming).await
    }
}

/// Builds the owned tree bottom-up. Children are always created after their
/// parent, so a reverse sweep over the flat arena sees every child finished
/// before its parent is assembled.
fn assemble(flat: Vec<FlatNode>, root: &str) -> VouchTreeNode {
    let mut slots: Vec<Option<FlatNode>> = flat.into_iter().map(Some).collect();
    let mut built: HashMap<usize, VouchTreeNode> = HashMap::with_capacity(slots.len());

    for idx in (0..slots.len()).rev() {
        let Some(node) = slots[idx].take() else { continue };
        let peers = node
            .children
            .into_iter()
            .filter_map(|(child, event)| {
                built.remove(&child).map(|peer| VouchTreeEdge { event, peer })
            })
            .collect();
        built.insert(
            idx,
            VouchTreeNode {
                id: idx,
                user: node.user,
                depth: node.depth,
                peers,
            },
        );
    }

    built.remove(&0).unwrap_or_else(|| VouchTreeNode {
        id: 0,
        user: root.to_string(),
        depth: 0,
        peers: Vec::new(),
    })
}
