use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::application::{AppError, Dashboard, LedgerService, NewRecord, DEFAULT_FEED_LIMIT};
use crate::domain::{cents_from_decimal, cents_to_decimal, Record, RecordKind, TransactionView};

/// Shared application state
#[derive(Clone)]
struct AppState {
    service: Arc<LedgerService>,
}

/// Request body for creating a record. A client-supplied `icon` field is
/// not part of this shape and is therefore dropped on deserialization;
/// expense icons are always derived server-side from the category.
#[derive(Debug, Deserialize)]
struct CreateRecordRequest {
    title: String,
    amount: f64,
    category: String,
    #[serde(default)]
    description: Option<String>,
    date: NaiveDate,
}

/// A single record as returned by the list and create endpoints.
#[derive(Debug, Serialize)]
struct RecordResponse {
    id: Uuid,
    title: String,
    amount: f64,
    category: String,
    description: String,
    date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'static str>,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        let icon = match record.kind {
            RecordKind::Income => None,
            RecordKind::Expense => Some(record.icon()),
        };
        Self {
            id: record.id,
            title: record.title,
            amount: cents_to_decimal(record.amount_cents),
            category: record.category,
            description: record.description.unwrap_or_default(),
            date: record.date,
            icon,
        }
    }
}

/// One entry of the merged transaction feed.
#[derive(Debug, Serialize)]
struct TransactionResponse {
    #[serde(rename = "type")]
    kind: RecordKind,
    title: String,
    amount: f64,
    category: String,
    date: NaiveDate,
    icon: &'static str,
}

impl From<TransactionView> for TransactionResponse {
    fn from(view: TransactionView) -> Self {
        Self {
            kind: view.kind,
            title: view.title,
            amount: cents_to_decimal(view.amount_cents),
            category: view.category,
            date: view.date,
            icon: view.icon,
        }
    }
}

/// Dashboard summary response
#[derive(Debug, Serialize)]
struct DashboardResponse {
    total_income: f64,
    total_expense: f64,
    balance: f64,
    recent_transactions: Vec<TransactionResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            total_income: cents_to_decimal(dashboard.summary.total_income_cents),
            total_expense: cents_to_decimal(dashboard.summary.total_expense_cents),
            balance: cents_to_decimal(dashboard.summary.balance_cents),
            recent_transactions: dashboard
                .recent_transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            match self {
                AppError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/ - Service banner
async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Moneta ledger API" }))
}

/// GET /api/income - List all income records
async fn list_income(State(state): State<AppState>) -> Result<Response, AppError> {
    let records = state.service.list_income().await?;
    Ok(Json(to_responses(records)).into_response())
}

/// POST /api/income - Create an income record
async fn create_income(
    State(state): State<AppState>,
    Json(body): Json<CreateRecordRequest>,
) -> Result<Response, AppError> {
    let record = state.service.add_income(to_new_record(body)?).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))).into_response())
}

/// DELETE /api/income/{id} - Delete an income record
async fn delete_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.remove_income(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/expense - List all expense records
async fn list_expense(State(state): State<AppState>) -> Result<Response, AppError> {
    let records = state.service.list_expense().await?;
    Ok(Json(to_responses(records)).into_response())
}

/// POST /api/expense - Create an expense record; the icon is computed
/// server-side from the category
async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<CreateRecordRequest>,
) -> Result<Response, AppError> {
    let record = state.service.add_expense(to_new_record(body)?).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))).into_response())
}

/// DELETE /api/expense/{id} - Delete an expense record
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.remove_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard - Totals and the merged recent-transaction feed
async fn dashboard(State(state): State<AppState>) -> Result<Response, AppError> {
    let dashboard = state.service.dashboard(DEFAULT_FEED_LIMIT).await?;
    Ok(Json(DashboardResponse::from(dashboard)).into_response())
}

fn to_responses(records: Vec<Record>) -> Vec<RecordResponse> {
    records.into_iter().map(RecordResponse::from).collect()
}

fn to_new_record(body: CreateRecordRequest) -> Result<NewRecord, AppError> {
    let amount_cents = cents_from_decimal(body.amount)
        .map_err(|e| AppError::InvalidAmount(e.to_string()))?;

    Ok(NewRecord {
        title: body.title,
        amount_cents,
        category: body.category,
        description: body.description,
        date: body.date,
    })
}

// ============================================================================
// Router and server
// ============================================================================

/// Build the API router for the given service.
pub fn router(service: LedgerService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    let api = Router::new()
        .route("/", get(root))
        .route("/income", get(list_income).post(create_income))
        .route("/income/:id", delete(delete_income))
        .route("/expense", get(list_expense).post(create_expense))
        .route("/expense/:id", delete(delete_expense))
        .route("/dashboard", get(dashboard))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}

/// Serve the API on the given address until the process is stopped.
pub async fn serve(service: LedgerService, addr: SocketAddr) -> Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    println!("Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
