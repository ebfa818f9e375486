//! Penalty Aggregation
//!
//! A user carries their own decayed penalties plus a tenth of the aggregate
//! penalty of every user they vouch for, transitively down the outgoing
//! tree. Every child contributes; there is no top-K cut on this side.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::engine::service::IdentityService;
use crate::engine::walker::walk_post_order;
use crate::engine::{decayed_amount, VouchTreeNode, DEFAULT_TREE_DEPTH};

/// Share of a child's aggregated penalty inherited per layer (10%).
const PENALTY_WEIGHT_NUM: u128 = 1;
const PENALTY_WEIGHT_DEN: u128 = 10;

impl IdentityService {
    /// Computes the aggregated penalty for `user`.
    ///
    /// When no tree is supplied, the outgoing tree at the default depth is
    /// expanded. When no evaluation time is supplied, the service clock is
    /// read once for the whole query.
    pub async fn penalty(
        &self,
        user: &str,
        tree: Option<&VouchTreeNode>,
        eval_time: Option<DateTime<Utc>>,
    ) -> u64 {
        let eval = eval_time.unwrap_or_else(|| self.now());
        let owned;
        let tree = match tree {
            Some(tree) => tree,
            None => {
                owned = self.outgoing_tree(user, DEFAULT_TREE_DEPTH).await;
                &owned
            }
        };

        let mut base = HashMap::new();
        self.base_penalties(tree, eval, &mut base).await;
        aggregate_penalty(tree, &base)
    }

    /// Fetches and decays the direct penalties of every distinct user in
    /// `tree`, one store read per user no matter how many nodes mention
    /// them. Entries already present in `base` are reused, so one query can
    /// share the memo across several trees.
    pub(crate) async fn base_penalties(
        &self,
        tree: &VouchTreeNode,
        eval: DateTime<Utc>,
        base: &mut HashMap<String, u64>,
    ) {
        for user in tree.users() {
            if base.contains_key(user) {
                continue;
            }
            let mut sum: u64 = 0;
            for penalty in self.penalties_of(user).await {
                sum = sum.saturating_add(decayed_amount(penalty.amount, penalty.timestamp, eval));
            }
            base.insert(user.to_string(), sum);
        }
    }
}

/// Pure post-order combine over an already-expanded outgoing tree.
pub(crate) fn aggregate_penalty(tree: &VouchTreeNode, base: &HashMap<String, u64>) -> u64 {
    let results = walk_post_order(tree, |node, results| {
        let mut total = base.get(node.user.as_str()).copied().unwrap_or(0);
        for edge in &node.peers {
            if let Some(&child) = results.get(&edge.peer.id) {
                let share = (child as u128 * PENALTY_WEIGHT_NUM / PENALTY_WEIGHT_DEN) as u64;
                total = total.saturating_add(share);
            }
        }
        total
    });

    results.get(&tree.id).copied().unwrap_or(0)
}
