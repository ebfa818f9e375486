//! Reputation Computation Engine
//!
//! Derives a user's effective balance and penalty from three event kinds:
//! moderator-issued proofs, moderator-issued penalties, and a directed graph
//! of vouches between users.
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │ Event store  │────►│ Tree expander   │────►│ Post-order walk  │
//! │ (snapshots)  │     │ (per-query,     │     │ (balance /       │
//! │              │     │  cycle-free)    │     │  penalty combine)│
//! └──────────────┘     └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Aggregation Model
//!
//! - Balance flows **down** the incoming tree: a user is boosted by a tenth
//!   of the aggregated balance of their strongest vouchers (top five
//!   positive values per node).
//! - Penalty flows **up** the outgoing tree: a user is tainted by a tenth of
//!   the aggregated penalty of every user they vouch for.
//! - Both proofs and penalties decay by 1% of their original amount per full
//!   day, reaching zero after 100 days.
//!
//! Every query recomputes from the event store over snapshot reads; the only
//! cross-node state is per-query memoization.

mod balance;
mod decay;
mod events;
mod penalty;
mod service;
mod tree;
mod walker;

pub use decay::decayed_amount;
pub use events::{IdtInfo, PenaltyEvent, ProofEvent, VouchEvent};
pub use service::{Clock, IdentityService};
pub use tree::{Direction, VouchTreeEdge, VouchTreeNode};
pub use walker::walk_post_order;

/// Maximum distance from the query root when no explicit depth is given.
/// At 10% weight per layer, contributions from the eighth layer are below
/// any observable precision.
pub const DEFAULT_TREE_DEPTH: i32 = 8;

/// How many positive voucher aggregates may contribute to a balance node.
pub const MAX_BALANCE_VOUCHERS: usize = 5;

/// Percentage of the original amount an event loses per full day.
pub const DECAY_PER_DAY_PERCENT: u64 = 1;
