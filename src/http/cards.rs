//! Card endpoints.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::backend::CreateCardRequest;
use crate::http::error::ApiError;
use crate::http::params::{self, ValidateBody};
use crate::http::request::UserClaim;
use crate::http::response::{
    CardResponse, MonthlyAmountsResponse, PagedResponse, TrashedResponse, YearlyAmountsResponse,
};
use crate::http::server::AppState;
use crate::pipeline::dispatch;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(find_all).post(create))
        .route("/stats/monthly-balance", get(monthly_balance))
        .route("/stats/yearly-balance", get(yearly_balance))
        .route("/{card_number}", get(find_by_number).delete(trash))
}

async fn find_all(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PagedResponse<CardResponse>>, ApiError> {
    dispatch("FindAllCards", async move {
        let page = params::pagination(&query);
        let cards = state.cards.find_all(page).await?;
        Ok(Json(PagedResponse::from(cards)))
    })
    .await
}

async fn find_by_number(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<CardResponse>, ApiError> {
    dispatch("FindCardByNumber", async move {
        let card_number = params::card_number_path(&raw)?;
        let card = state.cards.find_by_number(&card_number).await?;
        Ok(Json(CardResponse::from(card)))
    })
    .await
}

async fn monthly_balance(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyAmountsResponse>, ApiError> {
    dispatch("FindMonthlyBalance", async move {
        let year = params::required_year(&query)?;
        let rows = state.cards.monthly_balance(year).await?;
        Ok(Json(MonthlyAmountsResponse::new(year, rows)))
    })
    .await
}

async fn yearly_balance(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<YearlyAmountsResponse>, ApiError> {
    dispatch("FindYearlyBalance", async move {
        let year = params::required_year(&query)?;
        let rows = state.cards.yearly_balance(year).await?;
        Ok(Json(YearlyAmountsResponse::from(rows)))
    })
    .await
}

/// Create-card request body.
#[derive(Debug, Deserialize)]
pub struct CreateCardBody {
    pub card_number: String,
    pub card_type: String,
    pub expire_date: String,
    pub cvv: String,
    #[serde(default)]
    pub card_provider: String,
}

impl ValidateBody for CreateCardBody {
    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.card_number.is_empty() {
            violations.push("card_number must not be empty".to_string());
        }
        if self.card_type != "debit" && self.card_type != "credit" {
            violations.push("card_type must be debit or credit".to_string());
        }
        if self.expire_date.is_empty() {
            violations.push("expire_date must not be empty".to_string());
        }
        if self.cvv.len() != 3 || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            violations.push("cvv must be exactly 3 digits".to_string());
        }
        violations
    }
}

async fn create(
    State(state): State<AppState>,
    claim: UserClaim,
    body: Result<Json<CreateCardBody>, JsonRejection>,
) -> Result<Json<CardResponse>, ApiError> {
    dispatch("CreateCard", async move {
        let body = params::validated_body(body)?;
        let card = state
            .cards
            .create(CreateCardRequest {
                user_id: claim.0,
                card_number: body.card_number,
                card_type: body.card_type,
                expire_date: body.expire_date,
                cvv: body.cvv,
                card_provider: body.card_provider,
            })
            .await?;
        Ok(Json(CardResponse::from(card)))
    })
    .await
}

async fn trash(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<TrashedResponse>, ApiError> {
    dispatch("TrashCard", async move {
        let id = params::required_id(&raw)?;
        state.cards.trash(id).await?;
        Ok(Json(TrashedResponse { id }))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_body() -> CreateCardBody {
        CreateCardBody {
            card_number: "4111111111111111".to_string(),
            card_type: "debit".to_string(),
            expire_date: "2027-04".to_string(),
            cvv: "123".to_string(),
            card_provider: "visa".to_string(),
        }
    }

    #[test]
    fn valid_card_body_has_no_violations() {
        assert!(valid_body().validate().is_empty());
    }

    #[test]
    fn card_body_violations_are_collected() {
        let body = CreateCardBody {
            card_number: String::new(),
            card_type: "prepaid".to_string(),
            cvv: "12a".to_string(),
            ..valid_body()
        };
        let violations = body.validate();
        assert_eq!(violations.len(), 3);
    }
}
