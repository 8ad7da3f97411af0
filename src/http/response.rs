//! Typed HTTP payloads and their mapping from backend results.
//!
//! # Responsibilities
//! - One backend result → exactly one HTTP payload, deterministically
//! - Normalize monthly stats into a fixed 12-slot amounts array
//!
//! # Design Decisions
//! - Mapping is total over valid backend results and has no failure mode
//! - Months the backend omits appear as zero amounts, so the array shape is
//!   stable for callers regardless of data sparsity

use serde::Serialize;

use crate::backend::types::{
    Card, MethodAmount, MonthlyAmount, Paged, Topup, Withdraw, YearlyAmount,
};

/// One page of mapped results.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<B, T: From<B>> From<Paged<B>> for PagedResponse<T> {
    fn from(paged: Paged<B>) -> Self {
        Self {
            data: paged.data.into_iter().map(T::from).collect(),
            page: paged.page,
            page_size: paged.page_size,
            total: paged.total,
        }
    }
}

/// Card payload exposed to callers.
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: u64,
    pub card_number: String,
    pub card_type: String,
    pub expire_date: String,
    pub card_provider: String,
    pub balance: i64,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            card_number: card.card_number,
            card_type: card.card_type,
            expire_date: card.expire_date,
            card_provider: card.card_provider,
            balance: card.balance,
        }
    }
}

/// Withdraw payload exposed to callers.
#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub id: u64,
    pub card_number: String,
    pub withdraw_amount: i64,
    pub withdraw_time: String,
}

impl From<Withdraw> for WithdrawResponse {
    fn from(withdraw: Withdraw) -> Self {
        Self {
            id: withdraw.id,
            card_number: withdraw.card_number,
            withdraw_amount: withdraw.withdraw_amount,
            withdraw_time: withdraw.withdraw_time,
        }
    }
}

/// Top-up payload exposed to callers.
#[derive(Debug, Serialize)]
pub struct TopupResponse {
    pub id: u64,
    pub card_number: String,
    pub topup_no: String,
    pub topup_amount: i64,
    pub topup_method: String,
    pub topup_time: String,
}

impl From<Topup> for TopupResponse {
    fn from(topup: Topup) -> Self {
        Self {
            id: topup.id,
            card_number: topup.card_number,
            topup_no: topup.topup_no,
            topup_amount: topup.topup_amount,
            topup_method: topup.topup_method,
            topup_time: topup.topup_time,
        }
    }
}

/// Twelve monthly totals for one year, index 0 = January.
#[derive(Debug, Serialize)]
pub struct MonthlyAmountsResponse {
    pub year: u16,
    pub amounts: Vec<i64>,
}

impl MonthlyAmountsResponse {
    /// Spread sparse backend rows into a dense 12-slot array. Out-of-range
    /// month numbers are dropped; duplicate months accumulate.
    pub fn new(year: u16, rows: Vec<MonthlyAmount>) -> Self {
        let mut amounts = vec![0_i64; 12];
        for row in rows {
            if (1..=12).contains(&row.month) {
                amounts[usize::from(row.month) - 1] += row.total_amount;
            }
        }
        Self { year, amounts }
    }
}

/// Yearly totals as reported by the backend.
#[derive(Debug, Serialize)]
pub struct YearlyAmountsResponse {
    pub data: Vec<YearlyAmount>,
}

impl From<Vec<YearlyAmount>> for YearlyAmountsResponse {
    fn from(data: Vec<YearlyAmount>) -> Self {
        Self { data }
    }
}

/// Per-method totals for one month.
#[derive(Debug, Serialize)]
pub struct MethodAmountsResponse {
    pub year: u16,
    pub month: u8,
    pub methods: Vec<MethodAmount>,
}

/// Acknowledgement for a delete operation.
#[derive(Debug, Serialize)]
pub struct TrashedResponse {
    pub id: u64,
}
