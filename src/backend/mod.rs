//! Backend RPC subsystem.
//!
//! # Data Flow
//! ```text
//! handler (typed request)
//!     → service trait (CardsService / WithdrawsService / TopupsService)
//!     → client.rs (JSON over HTTP, per-call deadline)
//!     → typed response | BackendError
//! ```
//!
//! # Design Decisions
//! - One object-safe trait per backend resource so tests can substitute
//!   in-memory fakes for the wire client
//! - The client never retries; retry policy belongs to the transport
//! - Exactly one of {response, error} per call, enforced by Result

pub mod client;
pub mod types;

pub use client::{BackendError, RpcClient};
pub use types::{
    Card, CreateCardRequest, CreateTopupRequest, CreateWithdrawRequest, MethodAmount,
    MonthlyAmount, Page, Paged, Topup, Withdraw, YearlyAmount,
};

use async_trait::async_trait;

/// Typed calls owned by the cards backend service.
#[async_trait]
pub trait CardsService: Send + Sync {
    async fn find_all(&self, page: Page) -> Result<Paged<Card>, BackendError>;
    async fn find_by_number(&self, card_number: &str) -> Result<Card, BackendError>;
    async fn monthly_balance(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError>;
    async fn yearly_balance(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError>;
    async fn create(&self, request: CreateCardRequest) -> Result<Card, BackendError>;
    async fn trash(&self, id: u64) -> Result<(), BackendError>;
}

/// Typed calls owned by the withdraws backend service.
#[async_trait]
pub trait WithdrawsService: Send + Sync {
    async fn find_all(&self, page: Page) -> Result<Paged<Withdraw>, BackendError>;
    async fn find_by_id(&self, id: u64) -> Result<Withdraw, BackendError>;
    async fn monthly_amounts(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError>;
    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError>;
    async fn monthly_amounts_by_card(
        &self,
        card_number: &str,
        year: u16,
    ) -> Result<Vec<MonthlyAmount>, BackendError>;
    async fn create(&self, request: CreateWithdrawRequest) -> Result<Withdraw, BackendError>;
    async fn trash(&self, id: u64) -> Result<(), BackendError>;
}

/// Typed calls owned by the top-ups backend service.
#[async_trait]
pub trait TopupsService: Send + Sync {
    async fn find_all(&self, page: Page) -> Result<Paged<Topup>, BackendError>;
    async fn find_by_id(&self, id: u64) -> Result<Topup, BackendError>;
    async fn monthly_amounts(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError>;
    async fn method_amounts(&self, year: u16, month: u8) -> Result<Vec<MethodAmount>, BackendError>;
    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError>;
    async fn create(&self, request: CreateTopupRequest) -> Result<Topup, BackendError>;
    async fn trash(&self, id: u64) -> Result<(), BackendError>;
}
