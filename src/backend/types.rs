//! Typed messages exchanged with the backend services.
//!
//! Amounts are integer minor units (cents); the gateway never does float
//! arithmetic on money.

use serde::{Deserialize, Serialize};

/// Pagination window forwarded to list calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
    /// Raw search text; empty means unfiltered.
    pub search: String,
}

/// One page of backend results plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// A card as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub user_id: u64,
    pub card_number: String,
    pub card_type: String,
    pub expire_date: String,
    pub card_provider: String,
    pub balance: i64,
}

/// A withdraw record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdraw {
    pub id: u64,
    pub card_number: String,
    pub withdraw_amount: i64,
    pub withdraw_time: String,
}

/// A top-up record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topup {
    pub id: u64,
    pub card_number: String,
    pub topup_no: String,
    pub topup_amount: i64,
    pub topup_method: String,
    pub topup_time: String,
}

/// Total amount for one month of one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAmount {
    /// 1-based month number.
    pub month: u8,
    pub total_amount: i64,
}

/// Total amount for one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyAmount {
    pub year: u16,
    pub total_amount: i64,
}

/// Total amount for one top-up method within a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodAmount {
    pub method: String,
    pub total_amount: i64,
}

/// Create-card call forwarded to the cards service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub user_id: Option<String>,
    pub card_number: String,
    pub card_type: String,
    pub expire_date: String,
    pub cvv: String,
    pub card_provider: String,
}

/// Create-withdraw call forwarded to the withdraws service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWithdrawRequest {
    pub user_id: Option<String>,
    pub card_number: String,
    pub withdraw_amount: i64,
}

/// Create-top-up call forwarded to the top-ups service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopupRequest {
    pub user_id: Option<String>,
    pub card_number: String,
    pub topup_amount: i64,
    pub topup_method: String,
}
