//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use payment_gateway::backend::{
    BackendError, Card, CardsService, CreateCardRequest, CreateTopupRequest,
    CreateWithdrawRequest, MethodAmount, MonthlyAmount, Page, Paged, Topup, TopupsService,
    Withdraw, WithdrawsService, YearlyAmount,
};

// ---------------------------------------------------------------------------
// Metrics capture
// ---------------------------------------------------------------------------

/// Shared store of counter values keyed by metric name + labels.
#[derive(Clone, Default)]
pub struct MetricSink {
    counters: Arc<Mutex<HashMap<String, u64>>>,
    histograms: Arc<Mutex<HashMap<String, u64>>>,
}

impl MetricSink {
    fn series_key(key: &Key) -> String {
        let mut labels: Vec<String> = key
            .labels()
            .map(|label| format!("{}={}", label.key(), label.value()))
            .collect();
        labels.sort();
        format!("{}{{{}}}", key.name(), labels.join(","))
    }

    fn key_for(name: &str, operation: &str, outcome: &str) -> String {
        format!("{name}{{operation={operation},outcome={outcome}}}")
    }

    /// Current value of `gateway_requests_total` for one series.
    pub fn requests_total(&self, operation: &str, outcome: &str) -> u64 {
        let key = Self::key_for("gateway_requests_total", operation, outcome);
        *self.counters.lock().unwrap().get(&key).unwrap_or(&0)
    }

    /// Number of latency observations for one series.
    pub fn duration_observations(&self, operation: &str, outcome: &str) -> u64 {
        let key = Self::key_for("gateway_request_duration_seconds", operation, outcome);
        *self.histograms.lock().unwrap().get(&key).unwrap_or(&0)
    }
}

struct SinkCounter {
    key: String,
    store: Arc<Mutex<HashMap<String, u64>>>,
}

impl metrics::CounterFn for SinkCounter {
    fn increment(&self, value: u64) {
        *self.store.lock().unwrap().entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.store.lock().unwrap().insert(self.key.clone(), value);
    }
}

struct SinkHistogram {
    key: String,
    store: Arc<Mutex<HashMap<String, u64>>>,
}

impl metrics::HistogramFn for SinkHistogram {
    fn record(&self, _value: f64) {
        *self.store.lock().unwrap().entry(self.key.clone()).or_insert(0) += 1;
    }
}

struct CountingRecorder {
    sink: MetricSink,
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(SinkCounter {
            key: MetricSink::series_key(key),
            store: self.sink.counters.clone(),
        }))
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(SinkHistogram {
            key: MetricSink::series_key(key),
            store: self.sink.histograms.clone(),
        }))
    }
}

/// Install the capturing recorder as the process-global recorder, once per
/// test binary, and return its sink.
pub fn install_test_recorder() -> MetricSink {
    static SINK: OnceLock<MetricSink> = OnceLock::new();
    SINK.get_or_init(|| {
        let sink = MetricSink::default();
        metrics::set_global_recorder(CountingRecorder { sink: sink.clone() })
            .expect("recorder installed twice");
        sink
    })
    .clone()
}

// ---------------------------------------------------------------------------
// Mock backend services
// ---------------------------------------------------------------------------

/// Failure a mock call should produce.
#[derive(Clone, Copy)]
pub enum MockFailure {
    Unavailable,
    Timeout,
    Remote(&'static str),
}

impl MockFailure {
    fn to_error(self) -> BackendError {
        match self {
            Self::Unavailable => BackendError::Unavailable("connection refused".to_string()),
            Self::Timeout => BackendError::Timeout,
            Self::Remote(code) => BackendError::Remote {
                code: code.to_string(),
                message: format!("backend rejected the call: {code}"),
            },
        }
    }
}

/// Programmable in-memory stand-in for all three backend services.
#[derive(Default)]
pub struct MockBackend {
    /// Count of calls that reached the backend.
    pub calls: AtomicUsize,
    /// Pagination window the last list call carried.
    pub last_page: Mutex<Option<Page>>,
    /// Monthly rows returned by stats calls.
    pub monthly: Mutex<Vec<MonthlyAmount>>,
    /// When set, every call fails with this.
    pub failure: Mutex<Option<MockFailure>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_monthly(rows: Vec<MonthlyAmount>) -> Arc<Self> {
        let mock = Self::default();
        *mock.monthly.lock().unwrap() = rows;
        Arc::new(mock)
    }

    pub fn failing(failure: MockFailure) -> Arc<Self> {
        let mock = Self::default();
        *mock.failure.lock().unwrap() = Some(failure);
        Arc::new(mock)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn observe(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.failure.lock().unwrap() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn observe_page(&self, page: &Page) -> Result<(), BackendError> {
        *self.last_page.lock().unwrap() = Some(page.clone());
        self.observe()
    }

    fn monthly_rows(&self) -> Vec<MonthlyAmount> {
        self.monthly.lock().unwrap().clone()
    }
}

pub fn sample_card() -> Card {
    Card {
        id: 1,
        user_id: 7,
        card_number: "4111111111111111".to_string(),
        card_type: "debit".to_string(),
        expire_date: "2027-04".to_string(),
        card_provider: "visa".to_string(),
        balance: 125_000,
    }
}

pub fn sample_withdraw() -> Withdraw {
    Withdraw {
        id: 3,
        card_number: "4111111111111111".to_string(),
        withdraw_amount: 75_000,
        withdraw_time: "2024-05-01T10:00:00Z".to_string(),
    }
}

pub fn sample_topup() -> Topup {
    Topup {
        id: 5,
        card_number: "4111111111111111".to_string(),
        topup_no: "TP-0005".to_string(),
        topup_amount: 50_000,
        topup_method: "bank_transfer".to_string(),
        topup_time: "2024-05-02T09:30:00Z".to_string(),
    }
}

fn paged<T>(data: Vec<T>, page: &Page) -> Paged<T> {
    let total = data.len() as u64;
    Paged {
        data,
        page: page.page,
        page_size: page.page_size,
        total,
    }
}

#[async_trait]
impl CardsService for MockBackend {
    async fn find_all(&self, page: Page) -> Result<Paged<Card>, BackendError> {
        self.observe_page(&page)?;
        Ok(paged(vec![sample_card()], &page))
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Card, BackendError> {
        self.observe()?;
        let mut card = sample_card();
        card.card_number = card_number.to_string();
        Ok(card)
    }

    async fn monthly_balance(&self, _year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.observe()?;
        Ok(self.monthly_rows())
    }

    async fn yearly_balance(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.observe()?;
        Ok(vec![YearlyAmount { year, total_amount: 1_000_000 }])
    }

    async fn create(&self, request: CreateCardRequest) -> Result<Card, BackendError> {
        self.observe()?;
        let mut card = sample_card();
        card.card_number = request.card_number;
        card.card_type = request.card_type;
        Ok(card)
    }

    async fn trash(&self, _id: u64) -> Result<(), BackendError> {
        self.observe()
    }
}

#[async_trait]
impl WithdrawsService for MockBackend {
    async fn find_all(&self, page: Page) -> Result<Paged<Withdraw>, BackendError> {
        self.observe_page(&page)?;
        Ok(paged(vec![sample_withdraw()], &page))
    }

    async fn find_by_id(&self, id: u64) -> Result<Withdraw, BackendError> {
        self.observe()?;
        let mut withdraw = sample_withdraw();
        withdraw.id = id;
        Ok(withdraw)
    }

    async fn monthly_amounts(&self, _year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.observe()?;
        Ok(self.monthly_rows())
    }

    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.observe()?;
        Ok(vec![YearlyAmount { year, total_amount: 900_000 }])
    }

    async fn monthly_amounts_by_card(
        &self,
        _card_number: &str,
        _year: u16,
    ) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.observe()?;
        Ok(self.monthly_rows())
    }

    async fn create(&self, request: CreateWithdrawRequest) -> Result<Withdraw, BackendError> {
        self.observe()?;
        let mut withdraw = sample_withdraw();
        withdraw.card_number = request.card_number;
        withdraw.withdraw_amount = request.withdraw_amount;
        Ok(withdraw)
    }

    async fn trash(&self, _id: u64) -> Result<(), BackendError> {
        self.observe()
    }
}

#[async_trait]
impl TopupsService for MockBackend {
    async fn find_all(&self, page: Page) -> Result<Paged<Topup>, BackendError> {
        self.observe_page(&page)?;
        Ok(paged(vec![sample_topup()], &page))
    }

    async fn find_by_id(&self, id: u64) -> Result<Topup, BackendError> {
        self.observe()?;
        let mut topup = sample_topup();
        topup.id = id;
        Ok(topup)
    }

    async fn monthly_amounts(&self, _year: u16) -> Result<Vec<MonthlyAmount>, BackendError> {
        self.observe()?;
        Ok(self.monthly_rows())
    }

    async fn method_amounts(
        &self,
        _year: u16,
        _month: u8,
    ) -> Result<Vec<MethodAmount>, BackendError> {
        self.observe()?;
        Ok(vec![MethodAmount {
            method: "bank_transfer".to_string(),
            total_amount: 200_000,
        }])
    }

    async fn yearly_amounts(&self, year: u16) -> Result<Vec<YearlyAmount>, BackendError> {
        self.observe()?;
        Ok(vec![YearlyAmount { year, total_amount: 800_000 }])
    }

    async fn create(&self, request: CreateTopupRequest) -> Result<Topup, BackendError> {
        self.observe()?;
        let mut topup = sample_topup();
        topup.card_number = request.card_number;
        topup.topup_amount = request.topup_amount;
        topup.topup_method = request.topup_method;
        Ok(topup)
    }

    async fn trash(&self, _id: u64) -> Result<(), BackendError> {
        self.observe()
    }
}

// ---------------------------------------------------------------------------
// Raw TCP mock backend (for wire-client tests)
// ---------------------------------------------------------------------------

/// Start a mock backend that returns a fixed HTTP response to every request.
#[allow(dead_code)]
pub async fn start_mock_backend(status_line: &'static str, body: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let body = body.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0_u8; 4096];
                        use tokio::io::AsyncReadExt;
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => held.push(socket),
                Err(_) => break,
            }
        }
    });

    addr
}
