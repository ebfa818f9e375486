//! HTTP API
//!
//! The write surface accepts vouch, proof, and penalty events; the read
//! surface answers identity queries. All responses are JSON.

mod identity;

pub use identity::{AnyResponse, IdtResponse, ProveRequest, PunishRequest, VouchRequest};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::engine::IdentityService;

/// Shared state for the identity endpoints.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<IdentityService>,
}

/// Create the identity API router.
pub fn create_identity_router(state: ApiState) -> Router {
    Router::new()
        .route("/vouch", post(identity::vouch))
        .route("/prove", post(identity::prove))
        .route("/punish", post(identity::punish))
        .route("/idt/{user}", get(identity::idt))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}
