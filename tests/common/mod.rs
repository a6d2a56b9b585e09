#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scoregrid::config::{AppConfig, Theme};
use scoregrid::model::{Bet, DetailEntry, DetailSet, ParentId, Row, RowKey};
use scoregrid::{App, AppEvent, InMemoryApi, PageSource};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// Long enough for a worker thread against the in-memory server; failing tests wait this long.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
/// How long to wait before concluding that no further event is coming.
pub const QUIET_PERIOD: Duration = Duration::from_millis(150);

pub fn row(i: usize) -> Row {
    Row::new(
        RowKey::new(format!("row-{i}")),
        ParentId::new(format!("card-{i}")),
        vec![
            ("model".to_string(), format!("m{i}")),
            ("llik".to_string(), format!("{:.2}", -(i as f64) / 10.0)),
        ],
    )
}

pub fn rows(n: usize) -> Vec<Row> {
    (0..n).map(row).collect()
}

pub fn detail(n: usize) -> DetailSet {
    (0..n)
        .map(|i| DetailEntry::new(format!("1.{:02}", i), -(i as f64), -(i as f64) * 0.9))
        .collect()
}

/// Bet `i` on market `market`; even bets are backs, odd ones lays.
pub fn bet(i: usize, market: &str) -> Bet {
    let stake = 2.0 + i as f64;
    let mut bet = Bet::new(market, if i % 2 == 0 { -stake } else { stake }, 3.5);
    bet.timestamp = format!("2013-05-01T14:{:02}:00", i % 60);
    bet.event = "Ascot 2m Hcap".to_string();
    bet.selection = format!("runner-{i}");
    bet
}

/// `per_market` bets on each of the markets `detail(n)` labels.
pub fn market_bets(markets: usize, per_market: usize) -> Vec<Bet> {
    (0..markets)
        .flat_map(|m| (0..per_market).map(move |i| bet(i, &format!("1.{:02}", m))))
        .collect()
}

/// In-memory server with `n` rows, each with a two-entry detail.
pub fn server(n: usize) -> InMemoryApi {
    (0..n).fold(InMemoryApi::new().with_rows(rows(n)), |api, i| {
        api.with_detail(ParentId::new(format!("card-{i}")), detail(2))
    })
}

pub fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// App wired to `api` plus the receiving end of its event channel.
pub struct Harness {
    pub app: App,
    pub rx: Receiver<AppEvent>,
    pub api: Arc<InMemoryApi>,
}

impl Harness {
    pub fn new(api: InMemoryApi) -> Self {
        Self::with_config(api, PageSource::Remote, AppConfig::default())
    }

    pub fn with_config(api: InMemoryApi, source: PageSource, config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let api = Arc::new(api);
        let theme = Theme::from_config(&config.theme).unwrap();
        let app = App::new_with_config(tx, api.clone(), source, theme, &config);
        Self { app, rx, api }
    }

    /// Feed an event to the app, following any events it returns directly.
    pub fn send(&mut self, event: AppEvent) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            next = self.app.event(&event);
        }
    }

    /// Wait for one worker completion and apply it.
    pub fn pump_one(&mut self) -> bool {
        match self.rx.recv_timeout(EVENT_TIMEOUT) {
            Ok(event) => {
                self.send(event);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Apply completions until the channel stays quiet.
    pub fn settle(&mut self) {
        while let Ok(event) = self.rx.recv_timeout(QUIET_PERIOD) {
            self.send(event);
        }
    }

    /// Initial refresh followed by all of its completions.
    pub fn start(mut self) -> Self {
        self.send(AppEvent::Refresh);
        self.settle();
        self
    }
}
