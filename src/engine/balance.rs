//! Balance Aggregation
//!
//! A user's effective balance starts from their decayed proof minus their
//! own aggregated penalty, then inherits a tenth of the balances of the
//! strongest vouchers in the incoming tree. Only the top five positive
//! voucher aggregates count at each node, which caps what a swarm of
//! manufactured endorsers can contribute.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};

use crate::engine::penalty::aggregate_penalty;
use crate::engine::service::IdentityService;
use crate::engine::walker::walk_post_order;
use crate::engine::{decayed_amount, VouchTreeNode, DEFAULT_TREE_DEPTH, MAX_BALANCE_VOUCHERS};

/// Share of a voucher's aggregated balance inherited per layer (10%).
const BALANCE_WEIGHT_NUM: i64 = 1;
const BALANCE_WEIGHT_DEN: i64 = 10;

impl IdentityService {
    /// Computes the effective balance for `user`.
    ///
    /// When no tree is supplied, the incoming tree at the default depth is
    /// expanded. When no evaluation time is supplied, the service clock is
    /// read once for the whole query.
    pub async fn balance(
        &self,
        user: &str,
        tree: Option<&VouchTreeNode>,
        eval_time: Option<DateTime<Utc>>,
    ) -> i64 {
        let eval = eval_time.unwrap_or_else(|| self.now());
        let owned;
        let tree = match tree {
            Some(tree) => tree,
            None => {
                owned = self.incoming_tree(user, DEFAULT_TREE_DEPTH).await;
                &owned
            }
        };

        // Per-query memo state: each distinct user gets one proof read and
        // one outgoing-penalty aggregation, with base penalty sums shared
        // across those aggregations.
        let mut base_penalties: HashMap<String, u64> = HashMap::new();
        let mut base_balances: HashMap<String, i64> = HashMap::new();

        for user in tree.users() {
            if base_balances.contains_key(user) {
                continue;
            }

            let proof_base = match self.proof_of(user).await {
                Some(proof) => decayed_amount(proof.balance, proof.timestamp, eval),
                None => 0,
            };

            let outgoing = self.outgoing_tree(user, DEFAULT_TREE_DEPTH).await;
            self.base_penalties(&outgoing, eval, &mut base_penalties).await;
            let penalty = aggregate_penalty(&outgoing, &base_penalties);

            let base = clamp_to_i64(proof_base).saturating_sub(clamp_to_i64(penalty));
            base_balances.insert(user.to_string(), base);
        }

        aggregate_balance(tree, &base_balances)
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Pure post-order combine over an already-expanded incoming tree.
pub(crate) fn aggregate_balance(tree: &VouchTreeNode, base: &HashMap<String, i64>) -> i64 {
    let results = walk_post_order(tree, |node, results| {
        // Bounded min-heap: push every positive child aggregate, evict the
        // smallest once the heap exceeds the voucher cap.
        let mut top: BinaryHeap<Reverse<i64>> =
            BinaryHeap::with_capacity(MAX_BALANCE_VOUCHERS + 1);
        for edge in &node.peers {
            if let Some(&child) = results.get(&edge.peer.id) {
                if child <= 0 {
                    continue;
                }
                top.push(Reverse(child));
                if top.len() > MAX_BALANCE_VOUCHERS {
                    top.pop();
                }
            }
        }

        let mut total = base.get(node.user.as_str()).copied().unwrap_or(0);
        for Reverse(value) in top {
            total = total.saturating_add(value * BALANCE_WEIGHT_NUM / BALANCE_WEIGHT_DEN);
        }
        total
    });

    results.get(&tree.id).copied().unwrap_or(0)
}
