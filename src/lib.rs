//! Vouchnet Identity Service
//!
//! Reputation service deriving a user's effective balance and penalty from
//! moderator-issued proofs, moderator-issued penalties, and a directed graph
//! of vouches between users. Balance flows from a user's vouchers; penalty
//! flows from the users they vouch for; both decay linearly with time.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs       - Crate root with re-exports
//! ├── main.rs      - Server entrypoint
//! ├── config.rs    - Configuration management
//! ├── engine/      - Reputation computation engine
//! │   ├── events.rs  - Vouch, proof, and penalty event records
//! │   ├── decay.rs   - Linear time decay
//! │   ├── tree.rs    - Cycle-free vouch-tree expansion
//! │   ├── walker.rs  - Iterative post-order tree evaluation
//! │   ├── penalty.rs - Penalty aggregation over the outgoing tree
//! │   ├── balance.rs - Balance aggregation with top-K vouchers
//! │   └── service.rs - Query orchestration over a storage backend
//! ├── storage/     - Event store backends
//! │   ├── memory.rs  - In-memory store
//! │   └── sqlite.rs  - SQLite-backed store
//! └── api/         - HTTP endpoints
//!     └── identity.rs - vouch / prove / punish / idt handlers
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod storage;

// Re-export main types for convenience
pub use api::{create_identity_router, ApiState};
pub use config::IdentityConfig;
pub use engine::{
    decayed_amount, walk_post_order, Clock, Direction, IdentityService, IdtInfo, PenaltyEvent,
    ProofEvent, VouchEvent, VouchTreeEdge, VouchTreeNode, DEFAULT_TREE_DEPTH,
    MAX_BALANCE_VOUCHERS,
};
pub use storage::{MemoryStorage, SqliteStorage, Storage, StorageError};
