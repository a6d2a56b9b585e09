//! Request/response contracts with the scorecard server.
//!
//! Every call is blocking; the app runs each one on a worker thread and receives the
//! result as an event, so the UI loop never waits on the network.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::error_display::user_message_from_io;
use crate::model::{
    Bet, BetsQuery, DetailSet, EntityId, Page, PageRecord, ParentId, Row, RowRecord,
};

/// Longest server message kept for a notice.
const MAX_MESSAGE_LEN: usize = 200;

/// The server operations the grid depends on.
pub trait GridApi: Send + Sync {
    /// `GET /pages?offset&limit`
    fn fetch_page(&self, offset: usize, limit: usize) -> GridResult<Page>;
    /// `GET /detail/{parent_id}`
    fn fetch_detail(&self, parent_id: &ParentId) -> GridResult<DetailSet>;
    /// `POST /active/{id}/enable`
    fn enable(&self, id: &EntityId) -> GridResult<()>;
    /// `POST /active/{id}/disable`
    fn disable(&self, id: &EntityId) -> GridResult<()>;
    /// `GET /active`
    fn fetch_active(&self) -> GridResult<Vec<EntityId>>;
    /// `GET /entities`: every entity that can be toggled.
    fn fetch_entities(&self) -> GridResult<Vec<EntityId>>;
    /// `GET /scorecards/{parent_id}/bets[/{market_id}]` or `GET /strategies/{id}/bets`
    fn fetch_bets(&self, query: &BetsQuery) -> GridResult<Vec<Bet>>;
}

/// HTTP implementation backed by a `ureq` agent.
pub struct HttpApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, request: ureq::Request) -> GridResult<T> {
        let body = read_body(request.call())?;
        serde_json::from_str(&body).map_err(|e| GridError::Decode(e.to_string()))
    }

    fn post_ack(&self, url: &str) -> GridResult<()> {
        debug!(target: "api", url = %url, "POST");
        let response = self.agent.post(url).call();
        let status = match &response {
            Ok(r) => r.status(),
            Err(_) => 0,
        };
        let body = read_body(response)?;
        check_ack(status, &body)
    }
}

impl GridApi for HttpApi {
    fn fetch_page(&self, offset: usize, limit: usize) -> GridResult<Page> {
        let url = self.url(&["pages"]);
        debug!(target: "api", url = %url, offset, limit, "GET");
        let request = self
            .agent
            .get(&url)
            .query("offset", &offset.to_string())
            .query("limit", &limit.to_string());
        let record: PageRecord = self.get_json(request)?;
        Ok(record.into())
    }

    fn fetch_detail(&self, parent_id: &ParentId) -> GridResult<DetailSet> {
        let url = self.url(&["detail", parent_id.as_str()]);
        debug!(target: "api", url = %url, "GET");
        self.get_json(self.agent.get(&url))
    }

    fn enable(&self, id: &EntityId) -> GridResult<()> {
        self.post_ack(&self.url(&["active", id.as_str(), "enable"]))
    }

    fn disable(&self, id: &EntityId) -> GridResult<()> {
        self.post_ack(&self.url(&["active", id.as_str(), "disable"]))
    }

    fn fetch_active(&self) -> GridResult<Vec<EntityId>> {
        let url = self.url(&["active"]);
        debug!(target: "api", url = %url, "GET");
        self.get_json(self.agent.get(&url))
    }

    fn fetch_entities(&self) -> GridResult<Vec<EntityId>> {
        let url = self.url(&["entities"]);
        debug!(target: "api", url = %url, "GET");
        match self.get_json(self.agent.get(&url)) {
            Err(GridError::ServerError { status: 404, .. }) => Ok(Vec::new()),
            other => other,
        }
    }

    fn fetch_bets(&self, query: &BetsQuery) -> GridResult<Vec<Bet>> {
        let url = match query {
            BetsQuery::Scorecard {
                parent_id,
                market_id: None,
            } => self.url(&["scorecards", parent_id.as_str(), "bets"]),
            BetsQuery::Scorecard {
                parent_id,
                market_id: Some(market),
            } => self.url(&["scorecards", parent_id.as_str(), "bets", market]),
            BetsQuery::Strategy(id) => self.url(&["strategies", id.as_str(), "bets"]),
        };
        debug!(target: "api", url = %url, "GET");
        self.get_json(self.agent.get(&url))
    }
}

fn read_body(response: Result<ureq::Response, ureq::Error>) -> GridResult<String> {
    match response {
        Ok(r) => r
            .into_string()
            .map_err(|e| GridError::NetworkFailure(user_message_from_io(&e))),
        Err(ureq::Error::Status(status, r)) => {
            let body = r.into_string().unwrap_or_default();
            Err(GridError::server(status, server_message(&body)))
        }
        Err(ureq::Error::Transport(t)) => Err(GridError::NetworkFailure(t.to_string())),
    }
}

/// An acknowledgment succeeds unless its body says `"success": false`.
fn check_ack(status: u16, body: &str) -> GridResult<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if map.get("success") == Some(&Value::Bool(false)) => {
            let msg = map
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("request refused");
            Err(GridError::server(status, truncate(msg)))
        }
        _ => Ok(()),
    }
}

fn server_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = map.get("msg").or_else(|| map.get("error")).and_then(Value::as_str) {
            return truncate(msg);
        }
    }
    truncate(body.lines().next().unwrap_or("").trim())
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_MESSAGE_LEN).collect()
}

/// Fixture file shape for `InMemoryApi::from_fixture` and the local page source.
#[derive(Debug, Deserialize, Default)]
pub struct Fixture {
    pub rows: Vec<RowRecord>,
    #[serde(default)]
    pub details: HashMap<String, DetailSet>,
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    /// Bets keyed by scorecard parent id.
    #[serde(default)]
    pub scorecard_bets: HashMap<String, Vec<Bet>>,
    /// Paper bets keyed by strategy id.
    #[serde(default)]
    pub strategy_bets: HashMap<String, Vec<Bet>>,
}

impl Fixture {
    pub fn from_file(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to read {}: {}", path.display(), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to parse {}: {}", path.display(), e)
        })
    }

    pub fn rows(&self) -> Vec<Row> {
        self.rows.iter().cloned().map(Row::from).collect()
    }
}

/// Server stand-in holding everything in memory. Used for offline runs against a fixture
/// file and as the server in tests; failures can be injected per operation.
#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
    page_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    active_calls: AtomicUsize,
    bets_calls: AtomicUsize,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<Row>,
    details: HashMap<ParentId, DetailSet>,
    active: BTreeSet<EntityId>,
    entities: BTreeSet<EntityId>,
    scorecard_bets: HashMap<ParentId, Vec<Bet>>,
    strategy_bets: HashMap<EntityId, Vec<Bet>>,
    fail_pages: bool,
    fail_details: bool,
    fail_mutations: bool,
    fail_active: bool,
    fail_bets: bool,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: &Fixture) -> Self {
        let api = Self::new().with_rows(fixture.rows());
        {
            let mut state = api.lock();
            for (parent, detail) in &fixture.details {
                state.details.insert(ParentId::new(parent.as_str()), detail.clone());
            }
            state.active = fixture.active.iter().map(EntityId::new).collect();
            state.entities = fixture.entities.iter().map(EntityId::new).collect();
            for (parent, bets) in &fixture.scorecard_bets {
                state
                    .scorecard_bets
                    .insert(ParentId::new(parent.as_str()), bets.clone());
            }
            for (id, bets) in &fixture.strategy_bets {
                state.strategy_bets.insert(EntityId::new(id.as_str()), bets.clone());
            }
        }
        api
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.lock().rows = rows;
        self
    }

    pub fn with_detail(self, parent_id: ParentId, detail: DetailSet) -> Self {
        self.lock().details.insert(parent_id, detail);
        self
    }

    pub fn with_entities(self, ids: &[&str]) -> Self {
        self.lock().entities = ids.iter().map(|id| EntityId::new(*id)).collect();
        self
    }

    pub fn with_active(self, ids: &[&str]) -> Self {
        self.lock().active = ids.iter().map(|id| EntityId::new(*id)).collect();
        self
    }

    pub fn with_scorecard_bets(self, parent_id: ParentId, bets: Vec<Bet>) -> Self {
        self.lock().scorecard_bets.insert(parent_id, bets);
        self
    }

    pub fn with_strategy_bets(self, id: &str, bets: Vec<Bet>) -> Self {
        self.lock().strategy_bets.insert(EntityId::new(id), bets);
        self
    }

    pub fn fail_pages(&self, fail: bool) {
        self.lock().fail_pages = fail;
    }

    pub fn fail_details(&self, fail: bool) {
        self.lock().fail_details = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.lock().fail_mutations = fail;
    }

    pub fn fail_active(&self, fail: bool) {
        self.lock().fail_active = fail;
    }

    pub fn fail_bets(&self, fail: bool) {
        self.lock().fail_bets = fail;
    }

    /// Change the active set behind the grid's back, as another client would.
    pub fn set_active_externally(&self, id: &str, active: bool) {
        let mut state = self.lock();
        if active {
            state.active.insert(EntityId::new(id));
        } else {
            state.active.remove(&EntityId::new(id));
        }
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn active_calls(&self) -> usize {
        self.active_calls.load(Ordering::SeqCst)
    }

    pub fn bets_calls(&self) -> usize {
        self.bets_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panicking test thread must not wedge the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mutate(&self, id: &EntityId, active: bool) -> GridResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if state.fail_mutations {
            return Err(GridError::NetworkFailure("connection refused".to_string()));
        }
        if active {
            state.active.insert(id.clone());
        } else {
            state.active.remove(id);
        }
        Ok(())
    }
}

impl GridApi for InMemoryApi {
    fn fetch_page(&self, offset: usize, limit: usize) -> GridResult<Page> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_pages {
            return Err(GridError::server(503, "page service unavailable"));
        }
        Ok(slice_page(&state.rows, offset, limit))
    }

    fn fetch_detail(&self, parent_id: &ParentId) -> GridResult<DetailSet> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_details {
            return Err(GridError::server(500, "detail unavailable"));
        }
        state
            .details
            .get(parent_id)
            .cloned()
            .ok_or_else(|| GridError::server(404, format!("no detail for {}", parent_id)))
    }

    fn enable(&self, id: &EntityId) -> GridResult<()> {
        self.mutate(id, true)
    }

    fn disable(&self, id: &EntityId) -> GridResult<()> {
        self.mutate(id, false)
    }

    fn fetch_active(&self) -> GridResult<Vec<EntityId>> {
        self.active_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_active {
            return Err(GridError::NetworkFailure("connection reset".to_string()));
        }
        Ok(state.active.iter().cloned().collect())
    }

    fn fetch_entities(&self) -> GridResult<Vec<EntityId>> {
        let state = self.lock();
        Ok(state.entities.union(&state.active).cloned().collect())
    }

    fn fetch_bets(&self, query: &BetsQuery) -> GridResult<Vec<Bet>> {
        self.bets_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_bets {
            return Err(GridError::server(500, "bets unavailable"));
        }
        let bets = match query {
            BetsQuery::Scorecard {
                parent_id,
                market_id,
            } => state
                .scorecard_bets
                .get(parent_id)
                .into_iter()
                .flatten()
                .filter(|bet| market_id.as_ref().map_or(true, |m| &bet.market_id == m))
                .cloned()
                .collect(),
            BetsQuery::Strategy(id) => state.strategy_bets.get(id).cloned().unwrap_or_default(),
        };
        Ok(bets)
    }
}

/// Cut one page out of an in-memory row array.
pub fn slice_page(rows: &[Row], offset: usize, limit: usize) -> Page {
    let start = offset.min(rows.len());
    let end = (offset + limit).min(rows.len());
    Page {
        rows: rows[start..end].to_vec(),
        total_count: rows.len(),
    }
}
