//! Identity Endpoints
//!
//! Writes validate their body shape only: malformed JSON and missing or
//! empty required fields are client errors, everything else is accepted.
//! Events for unknown users create them implicitly.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiState;

#[derive(Debug, Deserialize)]
pub struct VouchRequest {
    pub from: Option<String>,
    pub signature: Option<String>,
    pub nonce: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProveRequest {
    pub user: Option<String>,
    pub balance: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PunishRequest {
    pub user: Option<String>,
    pub amount: Option<u64>,
}

/// Envelope for the write endpoints.
#[derive(Debug, Serialize)]
pub struct AnyResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct IdtResponse {
    pub user: String,
    pub balance: i64,
    pub penalty: u64,
}

fn accepted(message: &str) -> (StatusCode, Json<AnyResponse>) {
    (
        StatusCode::OK,
        Json(AnyResponse {
            success: true,
            message: message.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<AnyResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(AnyResponse {
            success: false,
            message: message.to_string(),
        }),
    )
}

fn required(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// POST /vouch - record a directed endorsement
pub async fn vouch(
    State(state): State<ApiState>,
    payload: Result<Json<VouchRequest>, JsonRejection>,
) -> (StatusCode, Json<AnyResponse>) {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };
    let (Some(from), Some(signature), Some(nonce), Some(to)) = (
        required(&req.from),
        required(&req.signature),
        required(&req.nonce),
        required(&req.to),
    ) else {
        return bad_request("Missing required fields");
    };

    state.service.record_vouch(from, signature, nonce, to).await;
    accepted("Vouch accepted")
}

/// POST /prove - set a user's moderated balance
pub async fn prove(
    State(state): State<ApiState>,
    payload: Result<Json<ProveRequest>, JsonRejection>,
) -> (StatusCode, Json<AnyResponse>) {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };
    let (Some(user), Some(balance)) = (required(&req.user), req.balance) else {
        return bad_request("Missing required fields");
    };

    state.service.record_proof(user, balance).await;
    accepted("Proof accepted")
}

/// POST /punish - record a penalty against a user
pub async fn punish(
    State(state): State<ApiState>,
    payload: Result<Json<PunishRequest>, JsonRejection>,
) -> (StatusCode, Json<AnyResponse>) {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };
    let (Some(user), Some(amount)) = (required(&req.user), req.amount) else {
        return bad_request("Missing required fields");
    };

    state.service.record_penalty(user, amount).await;
    accepted("Punish accepted")
}

/// GET /idt/{user} - aggregated balance and penalty for a user
pub async fn idt(State(state): State<ApiState>, Path(user): Path<String>) -> Json<IdtResponse> {
    let info = state.service.identity(&user, None).await;
    Json(IdtResponse {
        user: info.user,
        balance: info.balance,
        penalty: info.penalty,
    })
}
