//! JSON-over-HTTP client for the backend services.
//!
//! # Responsibilities
//! - Issue one typed call per operation against the backend base URL
//! - Enforce the per-call deadline from configuration
//! - Map transport and remote failures into [`BackendError`]
//!
//! # Design Decisions
//! - Deadlines use the client's request timeout; dropping the call future
//!   (client disconnect) abandons the in-flight request
//! - No retries here; resubmission policy is the transport's concern
//! - A non-2xx backend status is decoded into the remote error shape when
//!   possible, otherwise reported with the raw status

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::types::{
    Card, CreateCardRequest, CreateTopupRequest, CreateWithdrawRequest, MethodAmount,
    MonthlyAmount, Page, Paged, Topup, Withdraw, YearlyAmount,
};
use crate::backend::{CardsService, TopupsService, WithdrawsService};
use crate::config::BackendConfig;

use async_trait::async_trait;

/// Failure of one backend call. Exactly one of these or a typed response
/// comes back from every invocation; never both, never neither.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Could not reach the backend (connect refused, DNS, broken transport).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The per-call deadline elapsed before the backend answered.
    #[error("backend call timed out")]
    Timeout,

    /// The backend answered with a failure of its own.
    #[error("backend error {code}: {message}")]
    Remote { code: String, message: String },

    /// The backend answered 2xx but the payload did not decode.
    #[error("undecodable backend response: {0}")]
    Decode(String),
}

impl BackendError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

/// Error body the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    code: String,
    message: String,
}

/// Concrete client speaking JSON over HTTP to all three backend services.
///
/// Cheap to clone; safe for concurrent use across simultaneous invocations.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RpcClient {
    /// Build a client from the backend section of the gateway config.
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        // Relative joins drop the last path segment unless the base ends in '/'.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::Unavailable(format!("invalid backend url: {err}")))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(BackendError::from_transport);
        }

        // Prefer the backend's own error shape; fall back to the raw status.
        match response.json::<RemoteErrorBody>().await {
            Ok(body) => Err(BackendError::Remote {
                code: body.code,
                message: body.message,
            }),
            Err(_) => Err(BackendError::Remote {
                code: format!("http_{}", status.as_u16()),
                message: status.to_string(),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(BackendError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match response.json::<RemoteErrorBody>().await {
            Ok(body) => Err(BackendError::Remote {
                code: body.code,
                message: body.message,
            }),
            Err(_) => Err(BackendError::Remote {
                code: format!("http_{}", status.as_u16()),
                message: status.to_string(),
            }),
        }
    }

    fn page_query(page: &Page) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.page.to_string()),
            ("page_size", page.page_size.to_string()),
        ];
        if !page.search.is_empty() {
            query.push(("search", page.search.clone()));
        }
        query
    }
}

#[async_trait]
impl CardsService for RpcClient {
    async fn find_all(&self, page: Page) -> Result<Paged<Card>, BackendError> {
        self.get_json("cards", &Self::page_query(&page)).await
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Card, BackendError> {
        self.get_json(&format!("cards/{card_number}"), &[]).await
    }

    async fn monthly_balance(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.get_json("cards/stats/monthly-balance", &[("year", year.to_string())])
            .await
    }

    async fn yearly_balance(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.get_json("cards/stats/yearly-balance", &[("year", year.to_string())])
            .await
    }

    async fn create(&self, request: CreateCardRequest) -> Result<Card, BackendError> {
        self.post_json("cards", &request).await
    }

    async fn trash(&self, id: u64) -> Result<(), BackendError> {
        self.delete(&format!("cards/{id}")).await
    }
}

#[async_trait]
impl WithdrawsService for RpcClient {
    async fn find_all(&self, page: Page) -> Result<Paged<Withdraw>, BackendError> {
        self.get_json("withdraws", &Self::page_query(&page)).await
    }

    async fn find_by_id(&self, id: u64) -> Result<Withdraw, BackendError> {
        self.get_json(&format!("withdraws/{id}"), &[]).await
    }

    async fn monthly_amounts(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.get_json("withdraws/stats/monthly", &[("year", year.to_string())])
            .await
    }

    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.get_json("withdraws/stats/yearly", &[("year", year.to_string())])
            .await
    }

    async fn monthly_amounts_by_card(
        &self,
        card_number: &str,
        year: u16,
    ) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.get_json(
            "withdraws/stats/monthly-by-card",
            &[
                ("card_number", card_number.to_string()),
                ("year", year.to_string()),
            ],
        )
        .await
    }

    async fn create(&self, request: CreateWithdrawRequest) -> Result<Withdraw, BackendError> {
        self.post_json("withdraws", &request).await
    }

    async fn trash(&self, id: u64) -> Result<(), BackendError> {
        self.delete(&format!("withdraws/{id}")).await
    }
}

#[async_trait]
impl TopupsService for RpcClient {
    async fn find_all(&self, page: Page) -> Result<Paged<Topup>, BackendError> {
        self.get_json("topups", &Self::page_query(&page)).await
    }

    async fn find_by_id(&self, id: u64) -> Result<Topup, BackendError> {
        self.get_json(&format!("topups/{id}"), &[]).await
    }

    async fn monthly_amounts(&self, year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.get_json("topups/stats/monthly", &[("year", year.to_string())])
            .await
    }

    async fn method_amounts(&self, year: u16, month: u8) -> Result<Vec<MethodAmount>, BackendError> {
        self.get_json(
            "topups/stats/methods",
            &[("year", year.to_string()), ("month", month.to_string())],
        )
        .await
    }

    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.get_json("topups/stats/yearly", &[("year", year.to_string())])
            .await
    }

    async fn create(&self, request: CreateTopupRequest) -> Result<Topup, BackendError> {
        self.post_json("topups", &request).await
    }

    async fn trash(&self, id: u64) -> Result<(), BackendError> {
        self.delete(&format!("topups/{id}")).await
    }
}
