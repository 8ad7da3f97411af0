//! Withdraw endpoints.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::backend::CreateWithdrawRequest;
use crate::http::error::ApiError;
use crate::http::params::{self, ValidateBody};
use crate::http::request::UserClaim;
use crate::http::response::{
    MonthlyAmountsResponse, PagedResponse, TrashedResponse, WithdrawResponse,
    YearlyAmountsResponse,
};
use crate::http::server::AppState;
use crate::pipeline::dispatch;

/// Platform rule: withdraws below this amount (minor units) are rejected
/// before they reach the backend.
const MIN_WITHDRAW_AMOUNT: i64 = 50_000;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(find_all).post(create))
        .route("/stats/monthly", get(monthly_amounts))
        .route("/stats/yearly", get(yearly_amounts))
        .route("/stats/monthly-by-card", get(monthly_amounts_by_card))
        .route("/{id}", get(find_by_id).delete(trash))
}

async fn find_all(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PagedResponse<WithdrawResponse>>, ApiError> {
    dispatch("FindAllWithdraws", async move {
        let page = params::pagination(&query);
        let withdraws = state.withdraws.find_all(page).await?;
        Ok(Json(PagedResponse::from(withdraws)))
    })
    .await
}

async fn find_by_id(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    dispatch("FindWithdrawById", async move {
        let id = params::required_id(&raw)?;
        let withdraw = state.withdraws.find_by_id(id).await?;
        Ok(Json(WithdrawResponse::from(withdraw)))
    })
    .await
}

async fn monthly_amounts(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyAmountsResponse>, ApiError> {
    dispatch("FindMonthlyWithdraws", async move {
        let year = params::required_year(&query)?;
        let rows = state.withdraws.monthly_amounts(year).await?;
        Ok(Json(MonthlyAmountsResponse::new(year, rows)))
    })
    .await
}

async fn yearly_amounts(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<YearlyAmountsResponse>, ApiError> {
    dispatch("FindYearlyWithdraws", async move {
        let year = params::required_year(&query)?;
        let rows = state.withdraws.yearly_amounts(year).await?;
        Ok(Json(YearlyAmountsResponse::from(rows)))
    })
    .await
}

async fn monthly_amounts_by_card(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyAmountsResponse>, ApiError> {
    dispatch("FindMonthlyWithdrawsByCard", async move {
        // First failing field wins: card_number, then year.
        let card_number = params::required_card_number(&query)?;
        let year = params::required_year(&query)?;
        let rows = state
            .withdraws
            .monthly_amounts_by_card(&card_number, year)
            .await?;
        Ok(Json(MonthlyAmountsResponse::new(year, rows)))
    })
    .await
}

/// Create-withdraw request body.
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawBody {
    pub card_number: String,
    pub withdraw_amount: i64,
}

impl ValidateBody for CreateWithdrawBody {
    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.card_number.is_empty() {
            violations.push("card_number must not be empty".to_string());
        }
        if self.withdraw_amount <= 0 {
            violations.push("withdraw_amount must be positive".to_string());
        } else if self.withdraw_amount < MIN_WITHDRAW_AMOUNT {
            violations.push(format!(
                "withdraw_amount must be at least {MIN_WITHDRAW_AMOUNT}"
            ));
        }
        violations
    }
}

async fn create(
    State(state): State<AppState>,
    claim: UserClaim,
    body: Result<Json<CreateWithdrawBody>, JsonRejection>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    dispatch("CreateWithdraw", async move {
        let body = params::validated_body(body)?;
        let withdraw = state
            .withdraws
            .create(CreateWithdrawRequest {
                user_id: claim.0,
                card_number: body.card_number,
                withdraw_amount: body.withdraw_amount,
            })
            .await?;
        Ok(Json(WithdrawResponse::from(withdraw)))
    })
    .await
}

async fn trash(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TrashedResponse>, ApiError> {
    dispatch("TrashWithdraw", async move {
        let id = params::required_id(&raw)?;
        state.withdraws.trash(id).await?;
        Ok(Json(TrashedResponse { id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdraw_below_minimum_is_a_violation() {
        let body = CreateWithdrawBody {
            card_number: "4111".to_string(),
            withdraw_amount: 10_000,
        };
        let violations = body.validate();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("at least"));
    }

    #[test]
    fn nonpositive_withdraw_reports_only_positivity() {
        let body = CreateWithdrawBody {
            card_number: "4111".to_string(),
            withdraw_amount: -5,
        };
        let violations = body.validate();
        assert_eq!(violations, vec!["withdraw_amount must be positive".to_string()]);
    }

    #[test]
    fn valid_withdraw_has_no_violations() {
        let body = CreateWithdrawBody {
            card_number: "4111".to_string(),
            withdraw_amount: 75_000,
        };
        assert!(body.validate().is_empty());
    }
}
