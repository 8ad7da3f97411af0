//! Top-up endpoints.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::backend::CreateTopupRequest;
use crate::http::error::ApiError;
use crate::http::params::{self, ValidateBody};
use crate::http::request::UserClaim;
use crate::http::response::{
    MethodAmountsResponse, MonthlyAmountsResponse, PagedResponse, TopupResponse, TrashedResponse,
    YearlyAmountsResponse,
};
use crate::http::server::AppState;
use crate::pipeline::dispatch;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(find_all).post(create))
        .route("/stats/monthly", get(monthly_amounts))
        .route("/stats/methods", get(method_amounts))
        .route("/stats/yearly", get(yearly_amounts))
        .route("/{id}", get(find_by_id).delete(trash))
}

async fn find_all(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PagedResponse<TopupResponse>>, ApiError> {
    dispatch("FindAllTopups", async move {
        let page = params::pagination(&query);
        let topups = state.topups.find_all(page).await?;
        Ok(Json(PagedResponse::from(topups)))
    })
    .await
}

async fn find_by_id(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TopupResponse>, ApiError> {
    dispatch("FindTopupById", async move {
        let id = params::required_id(&raw)?;
        let topup = state.topups.find_by_id(id).await?;
        Ok(Json(TopupResponse::from(topup)))
    })
    .await
}

async fn monthly_amounts(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyAmountsResponse>, ApiError> {
    dispatch("FindMonthlyTopups", async move {
        let year = params::required_year(&query)?;
        let rows = state.topups.monthly_amounts(year).await?;
        Ok(Json(MonthlyAmountsResponse::new(year, rows)))
    })
    .await
}

async fn method_amounts(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MethodAmountsResponse>, ApiError> {
    dispatch("FindMonthlyTopupMethods", async move {
        // First failing field wins: year, then month.
        let year = params::required_year(&query)?;
        let month = params::required_month(&query)?;
        let methods = state.topups.method_amounts(year, month).await?;
        Ok(Json(MethodAmountsResponse { year, month, methods }))
    })
    .await
}

async fn yearly_amounts(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<YearlyAmountsResponse>, ApiError> {
    dispatch("FindYearlyTopups", async move {
        let year = params::required_year(&query)?;
        let rows = state.topups.yearly_amounts(year).await?;
        Ok(Json(YearlyAmountsResponse::from(rows)))
    })
    .await
}

/// Create-top-up request body.
#[derive(Debug, Deserialize)]
pub struct CreateTopupBody {
    pub card_number: String,
    pub topup_amount: i64,
    pub topup_method: String,
}

impl ValidateBody for CreateTopupBody {
    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.card_number.is_empty() {
            violations.push("card_number must not be empty".to_string());
        }
        if self.topup_amount <= 0 {
            violations.push("topup_amount must be positive".to_string());
        }
        if self.topup_method.is_empty() {
            violations.push("topup_method must not be empty".to_string());
        }
        violations
    }
}

async fn create(
    State(state): State<AppState>,
    claim: UserClaim,
    body: Result<Json<CreateTopupBody>, JsonRejection>,
) -> Result<Json<TopupResponse>, ApiError> {
    dispatch("CreateTopup", async move {
        let body = params::validated_body(body)?;
        let topup = state
            .topups
            .create(CreateTopupRequest {
                user_id: claim.0,
                card_number: body.card_number,
                topup_amount: body.topup_amount,
                topup_method: body.topup_method,
            })
            .await?;
        Ok(Json(TopupResponse::from(topup)))
    })
    .await
}

async fn trash(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TrashedResponse>, ApiError> {
    dispatch("TrashTopup", async move {
        let id = params::required_id(&raw)?;
        state.topups.trash(id).await?;
        Ok(Json(TrashedResponse { id }))
    })
    .await
}
