//! Request handlers and their response bodies.
//!
//! Store calls block (LMDB takes its writer lock synchronously), so every
//! engine call runs on the blocking pool via [`run`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use ballot_election::{
    CandidateDraft, CandidateView, Election, ElectionError, RaceResult, TallyAudit,
};
use ballot_store::{Candidate, LedgerEntry, Voter};
use ballot_types::{CandidateId, Role, Timestamp, VoterId};
use serde::Serialize;

use crate::auth::{Admin, Caller};
use crate::pagination::{next_cursor, PaginationParams};
use crate::server::{AppState, StoreBackend};
use crate::RpcError;

async fn run<S, T, F>(election: &Election<S>, f: F) -> Result<T, RpcError>
where
    S: StoreBackend,
    T: Send + 'static,
    F: FnOnce(&Election<S>) -> Result<T, ElectionError> + Send + 'static,
{
    let election = election.clone();
    tokio::task::spawn_blocking(move || f(&election))
        .await
        .map_err(|e| RpcError::Internal(format!("worker failed: {e}")))?
        .map_err(RpcError::from)
}

fn parse_candidate_id(raw: &str) -> Result<CandidateId, RpcError> {
    raw.parse()
        .map_err(|_| RpcError::BadRequest(format!("invalid candidate id: {raw}")))
}

// ── Health & metrics ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime: String,
}

pub async fn health<S: StoreBackend>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime: ballot_utils::format_duration(state.started_at.elapsed().as_secs()),
    })
}

pub async fn metrics<S: StoreBackend>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, RpcError> {
    let body = state.metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

// ── Candidates ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<CandidateView>,
    /// Cursor for the next page, absent on the last one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

pub async fn list_candidates<S: StoreBackend>(
    State(state): State<AppState<S>>,
    _caller: Caller,
    Query(page): Query<PaginationParams>,
) -> Result<Json<CandidateListResponse>, RpcError> {
    let offset = page.offset()?;
    let count = page.effective_count();
    let candidates = run(&state.election, move |e| {
        e.list_candidates_paged(offset, count as usize)
    })
    .await?;
    let cursor = next_cursor(offset, candidates.len(), count);
    Ok(Json(CandidateListResponse { candidates, cursor }))
}

pub async fn create_candidate<S: StoreBackend>(
    State(state): State<AppState<S>>,
    Admin(admin): Admin,
    payload: Result<Json<CandidateDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CandidateView>), RpcError> {
    let Json(draft) = payload?;
    let creator = admin.id;
    let candidate = run(&state.election, move |e| {
        let created = e.create_candidate(Some(&creator), &draft, Timestamp::now())?;
        e.view(created)
    })
    .await?;
    state.metrics.candidates_created.inc();
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn get_candidate<S: StoreBackend>(
    State(state): State<AppState<S>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<CandidateView>, RpcError> {
    let id = parse_candidate_id(&id)?;
    let view = run(&state.election, move |e| e.get_candidate(&id)).await?;
    Ok(Json(view))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: &'static str,
    pub ledger_entries_removed: u64,
}

pub async fn delete_candidate<S: StoreBackend>(
    State(state): State<AppState<S>>,
    Admin(admin): Admin,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, RpcError> {
    let id = parse_candidate_id(&id)?;
    let report = run(&state.election, move |e| e.delete_candidate(&id)).await?;
    tracing::info!(admin = %admin.id, candidate = %id, "candidate deleted via api");
    state.metrics.candidates_deleted.inc();
    state
        .metrics
        .ledger_entries_removed
        .inc_by(report.ledger_entries_removed);
    Ok(Json(DeleteResponse {
        message: "Candidate deleted successfully",
        ledger_entries_removed: report.ledger_entries_removed,
    }))
}

// ── Voting ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VoteResponse {
    pub candidate: Candidate,
    pub message: &'static str,
}

pub async fn cast_vote<S: StoreBackend>(
    State(state): State<AppState<S>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<VoteResponse>, RpcError> {
    let candidate_id = parse_candidate_id(&id)?;
    let voter = caller.id;
    let result = run(&state.election, move |e| {
        e.cast_vote(&voter, &candidate_id, Timestamp::now())
    })
    .await;
    match result {
        Ok(candidate) => {
            state.metrics.votes_cast.inc();
            Ok(Json(VoteResponse {
                candidate,
                message: "Vote cast successfully",
            }))
        }
        Err(e) => {
            if matches!(e, RpcError::Conflict(_)) {
                state.metrics.votes_rejected.inc();
            }
            Err(e)
        }
    }
}

/// The caller's voter record. The credential never leaves the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: VoterId,
    pub username: String,
    pub role: Role,
    pub voted_categories: Vec<LedgerEntry>,
    pub created_at: Timestamp,
}

impl From<Voter> for MeResponse {
    fn from(v: Voter) -> Self {
        Self {
            id: v.id,
            username: v.username,
            role: v.role,
            voted_categories: v.voted_categories,
            created_at: v.created_at,
        }
    }
}

pub async fn me<S: StoreBackend>(
    State(state): State<AppState<S>>,
    caller: Caller,
) -> Result<Json<MeResponse>, RpcError> {
    let id = caller.id;
    let voter = run(&state.election, move |e| e.voter(&id)).await?;
    Ok(Json(voter.into()))
}

// ── Results & audit ──────────────────────────────────────────────────────

pub async fn results<S: StoreBackend>(
    State(state): State<AppState<S>>,
    _caller: Caller,
) -> Result<Json<Vec<RaceResult>>, RpcError> {
    let races = run(&state.election, |e| e.results()).await?;
    Ok(Json(races))
}

pub async fn audit<S: StoreBackend>(
    State(state): State<AppState<S>>,
    _admin: Admin,
) -> Result<Json<TallyAudit>, RpcError> {
    let audit = run(&state.election, |e| e.audit()).await?;
    state.metrics.audit_drifts.set(audit.drifts.len() as i64);
    Ok(Json(audit))
}
