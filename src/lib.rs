use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Paragraph, StatefulWidget, TableState};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use std::sync::{mpsc::Sender, Arc};
use std::thread;
use tracing::{debug, info};

pub mod active;
pub mod api;
pub mod bets;
pub mod chart_data;
pub mod config;
pub mod error;
pub mod error_display;
pub mod expansion;
pub mod format;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod widgets;

pub use active::{ActiveSetSynchronizer, ToggleEffect};
pub use api::{Fixture, GridApi, HttpApi, InMemoryApi};
pub use bets::{BetsBrowser, BetsView};
pub use config::{rgb_to_256_color, AppConfig, ColorParser, ConfigManager, Theme};
pub use error::{GridError, GridResult};
pub use expansion::{ExpansionEffect, ExpansionState, RowExpansionController};
pub use pagination::{compute_window, PaginationWindow, Paginator};
pub use scoregrid_cli::Args;

use active::{MutationId, RefreshSeq};
use bets::BetsRequestId;
use chart_data::comparison_chart;
use error_display::user_message;
use expansion::RequestId;
use model::{Bet, BetsQuery, DetailSet, EntityId, Page, Row, RowKey};
use widgets::bets::BetsTable;
use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::detail::DetailChart;
use widgets::grid::Grid;
use widgets::pagination::PaginationBar;
use widgets::strategies::{AffordanceColors, StrategyPanel};

/// Application name used for config directory and other app-specific paths
pub const APP_NAME: &str = "scoregrid";

const STRATEGY_PANEL_WIDTH: u16 = 34;
const CHART_HEIGHT: u16 = 14;
const ROW_JUMP: usize = 10;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Reload the current page, the active set and the entity list.
    Refresh,
    LoadPage,
    PageLoaded {
        generation: u64,
        offset: usize,
        result: GridResult<Page>,
    },
    DetailLoaded {
        row: RowKey,
        request: RequestId,
        result: GridResult<DetailSet>,
    },
    Acknowledged {
        id: EntityId,
        request: MutationId,
        result: GridResult<()>,
    },
    ActiveRefreshed {
        seq: RefreshSeq,
        result: GridResult<Vec<EntityId>>,
    },
    EntitiesLoaded(GridResult<Vec<EntityId>>),
    BetsLoaded {
        request: BetsRequestId,
        result: GridResult<Vec<Bet>>,
    },
    Exit,
    Resize(u16, u16), // resized (width, height)
}

/// Where page rows come from.
#[derive(Debug, Clone, Default)]
pub enum PageSource {
    /// `GET /pages` for every navigation.
    #[default]
    Remote,
    /// A fixed row array sliced locally; only detail and toggles reach the server.
    Local(Vec<Row>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Grid,
    Strategies,
}

impl Focus {
    fn toggled(self) -> Self {
        match self {
            Focus::Grid => Focus::Strategies,
            Focus::Strategies => Focus::Grid,
        }
    }
}

/// One-line, non-blocking message under the grid.
#[derive(Default)]
pub struct Notice {
    pub active: bool,
    pub message: String,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: String) {
        self.active = true;
        self.message = message;
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.message.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading {
        offset: usize,
    },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }
}

pub struct App {
    events: Sender<AppEvent>,
    api: Arc<dyn GridApi>,
    source: PageSource,
    paginator: Paginator,
    rows: Vec<Row>,
    /// Offset of the rows currently on screen, restored when a page fetch fails.
    shown_start: usize,
    page_generation: u64,
    loading_state: LoadingState,
    expansion: RowExpansionController,
    active: ActiveSetSynchronizer,
    focus: Focus,
    selected_row: usize,
    /// Detail entry under the cursor when the selected row is expanded.
    detail_cursor: Option<usize>,
    selected_strategy: usize,
    bets: BetsBrowser,
    grid_state: TableState,
    notice: Notice,
    debug: DebugState,
    theme: Theme,
}

impl App {
    pub fn detail_cursor(&self) -> Option<usize> {
        self.detail_cursor
    }

    pub fn bets(&self) -> &BetsBrowser {
        &self.bets
    }

    pub fn send_event(&mut self, event: AppEvent) -> color_eyre::Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn new(events: Sender<AppEvent>, api: Arc<dyn GridApi>) -> App {
        Self::new_with_config(
            events,
            api,
            PageSource::Remote,
            Theme::default(),
            &AppConfig::default(),
        )
    }

    pub fn new_with_config(
        events: Sender<AppEvent>,
        api: Arc<dyn GridApi>,
        source: PageSource,
        theme: Theme,
        app_config: &AppConfig,
    ) -> App {
        let debug = DebugState {
            enabled: app_config.debug.enabled,
            ..DebugState::default()
        };
        App {
            events,
            api,
            source,
            paginator: Paginator::new(
                app_config.display.page_size,
                app_config.display.window_size,
            ),
            rows: Vec::new(),
            shown_start: 0,
            page_generation: 0,
            loading_state: LoadingState::Idle,
            expansion: RowExpansionController::new(),
            active: ActiveSetSynchronizer::new(),
            focus: Focus::Grid,
            selected_row: 0,
            detail_cursor: None,
            selected_strategy: 0,
            bets: BetsBrowser::new(
                app_config.display.page_size,
                app_config.display.window_size,
            ),
            grid_state: TableState::default(),
            notice: Notice::new(),
            debug,
            theme,
        }
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    /// Get a color from the theme by name
    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn expansion(&self) -> &RowExpansionController {
        &self.expansion
    }

    pub fn active(&self) -> &ActiveSetSynchronizer {
        &self.active
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn is_loading(&self) -> bool {
        self.loading_state.is_loading()
    }

    /// Message of the visible notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.active.then_some(self.notice.message.as_str())
    }

    /// Run one blocking API call on a worker thread and post its completion back.
    fn spawn_request<F>(&self, request: F)
    where
        F: FnOnce(&dyn GridApi) -> AppEvent + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        thread::spawn(move || {
            let event = request(api.as_ref());
            // Receiver is gone once the app has exited
            let _ = events.send(event);
        });
    }

    fn show_error(&mut self, err: &GridError, action: &str) {
        if err.is_visible() {
            self.notice.show(user_message(err, action));
        }
    }

    fn request_page(&mut self) -> Option<AppEvent> {
        self.page_generation += 1;
        let generation = self.page_generation;
        let offset = self.paginator.display_start;
        let limit = self.paginator.page_size;
        self.loading_state = LoadingState::Loading { offset };
        debug!(target: "pagination", generation, offset, limit, "page requested");

        match &self.source {
            PageSource::Local(rows) => Some(AppEvent::PageLoaded {
                generation,
                offset,
                result: Ok(api::slice_page(rows, offset, limit)),
            }),
            PageSource::Remote => {
                self.spawn_request(move |api| AppEvent::PageLoaded {
                    generation,
                    offset,
                    result: api.fetch_page(offset, limit),
                });
                None
            }
        }
    }

    fn page_loaded(
        &mut self,
        generation: u64,
        offset: usize,
        result: &GridResult<Page>,
    ) -> Option<AppEvent> {
        if generation != self.page_generation {
            debug!(target: "pagination", generation, current = self.page_generation, "stale page discarded");
            return None;
        }
        self.loading_state = LoadingState::Idle;

        match result {
            Ok(page) => {
                self.paginator.set_total_rows(page.total_count);
                if self.paginator.display_start != offset {
                    // The result set shrank below this offset; fetch the clamped page instead
                    return Some(AppEvent::LoadPage);
                }
                self.rows = page.rows.clone();
                self.shown_start = offset;
                // A redraw collapses everything; in-flight detail for old rows becomes stale
                self.expansion.reset();
                self.selected_row = 0;
                self.detail_cursor = None;
                self.grid_state = TableState::default();
                info!(
                    target: "pagination",
                    offset,
                    rows = self.rows.len(),
                    total = page.total_count,
                    "page shown"
                );
                None
            }
            Err(e) => {
                self.paginator.display_start = self.shown_start;
                self.show_error(e, "Loading page");
                None
            }
        }
    }

    fn navigate(&mut self, action: &str, step: impl FnOnce(&mut Paginator) -> bool) -> Option<AppEvent> {
        self.debug.last_action = action.to_string();
        if step(&mut self.paginator) {
            Some(AppEvent::LoadPage)
        } else {
            None
        }
    }

    pub fn next_page(&mut self) -> Option<AppEvent> {
        self.navigate("next_page", Paginator::next)
    }

    pub fn previous_page(&mut self) -> Option<AppEvent> {
        self.navigate("previous_page", Paginator::previous)
    }

    pub fn first_page(&mut self) -> Option<AppEvent> {
        self.navigate("first_page", Paginator::first)
    }

    pub fn last_page(&mut self) -> Option<AppEvent> {
        self.navigate("last_page", Paginator::last)
    }

    /// Click the `slot`-th numbered page control (0-based).
    pub fn select_page_control(&mut self, slot: usize) -> Option<AppEvent> {
        self.navigate("page_control", |p| p.select_control(slot))
    }

    pub fn select_row(&mut self, index: usize) {
        if !self.rows.is_empty() {
            self.selected_row = index.min(self.rows.len() - 1);
            self.detail_cursor = None;
        }
    }

    fn selected_entry_count(&self) -> usize {
        self.rows
            .get(self.selected_row)
            .and_then(|row| self.expansion.detail(&row.key))
            .map_or(0, |detail| detail.len())
    }

    /// Step down through the selected row's detail entries, then on to the next row.
    fn cursor_down(&mut self) {
        let entries = self.selected_entry_count();
        let next = self.detail_cursor.map_or(0, |e| e + 1);
        if next < entries {
            self.detail_cursor = Some(next);
        } else {
            self.select_row(self.selected_row + 1);
        }
    }

    fn cursor_up(&mut self) {
        match self.detail_cursor {
            Some(0) => self.detail_cursor = None,
            Some(e) => self.detail_cursor = Some(e - 1),
            None => self.select_row(self.selected_row.saturating_sub(1)),
        }
    }

    /// Expand or collapse the row at `index` on the current page.
    pub fn toggle_row(&mut self, index: usize) -> Option<AppEvent> {
        self.debug.last_action = "toggle_row".to_string();
        let row = self.rows.get(index)?;
        if index == self.selected_row {
            self.detail_cursor = None;
        }
        if let ExpansionEffect::Fetch {
            row,
            parent_id,
            request,
        } = self.expansion.toggle(row)
        {
            self.spawn_request(move |api| {
                let result = api.fetch_detail(&parent_id);
                AppEvent::DetailLoaded {
                    row,
                    request,
                    result,
                }
            });
        }
        None
    }

    fn detail_loaded(&mut self, row: &RowKey, request: RequestId, result: &GridResult<DetailSet>) {
        if let Err(e) = self.expansion.complete(row, request, result.clone()) {
            self.show_error(&e, "Loading detail");
        }
    }

    /// Open the bets list for `query` and fetch it.
    pub fn open_bets(&mut self, query: BetsQuery) -> Option<AppEvent> {
        self.debug.last_action = "open_bets".to_string();
        let request = self.bets.open(query.clone());
        self.spawn_request(move |api| AppEvent::BetsLoaded {
            request,
            result: api.fetch_bets(&query),
        });
        None
    }

    pub fn close_bets(&mut self) {
        self.debug.last_action = "close_bets".to_string();
        self.bets.close();
    }

    /// Bets of the selected scorecard, narrowed to the market under the detail cursor.
    fn open_selected_scorecard_bets(&mut self) -> Option<AppEvent> {
        let row = self.rows.get(self.selected_row)?;
        let market_id = self.detail_cursor.and_then(|entry| {
            self.expansion
                .detail(&row.key)
                .and_then(|detail| detail.get(entry))
                .map(|e| e.market_id())
        });
        let query = BetsQuery::Scorecard {
            parent_id: row.parent_id.clone(),
            market_id,
        };
        self.open_bets(query)
    }

    fn bets_loaded(&mut self, request: BetsRequestId, result: &GridResult<Vec<Bet>>) {
        if let Err(e) = self.bets.complete(request, result.clone()) {
            self.show_error(&e, "Loading bets");
        }
    }

    /// Every strategy the panel lists, in display order.
    pub fn strategies(&self) -> Vec<EntityId> {
        self.active.entities()
    }

    /// Ask the server to make `id` active or inactive.
    pub fn set_active(&mut self, id: &EntityId, desired: bool) -> Option<AppEvent> {
        let effect = self.active.set_active(id, desired);
        self.issue_mutation(effect);
        None
    }

    /// Flip `id` relative to its last confirmed state.
    pub fn toggle_strategy(&mut self, id: &EntityId) -> Option<AppEvent> {
        self.debug.last_action = "toggle_strategy".to_string();
        let effect = self.active.toggle(id);
        self.issue_mutation(effect);
        None
    }

    fn issue_mutation(&mut self, effect: ToggleEffect) {
        match effect {
            ToggleEffect::Enable { id, request } => self.spawn_request(move |api| {
                let result = api.enable(&id);
                AppEvent::Acknowledged {
                    id,
                    request,
                    result,
                }
            }),
            ToggleEffect::Disable { id, request } => self.spawn_request(move |api| {
                let result = api.disable(&id);
                AppEvent::Acknowledged {
                    id,
                    request,
                    result,
                }
            }),
            ToggleEffect::Ignored => {}
        }
    }

    fn acknowledged(&mut self, id: &EntityId, request: MutationId, result: &GridResult<()>) {
        match self.active.acknowledge(id, request, result.clone()) {
            Ok(seq) => self.spawn_active_refresh(seq),
            Err(e) => self.show_error(&e, &format!("Updating {}", id)),
        }
    }

    fn spawn_active_refresh(&self, seq: RefreshSeq) {
        debug!(target: "active", seq, "refresh issued");
        self.spawn_request(move |api| AppEvent::ActiveRefreshed {
            seq,
            result: api.fetch_active(),
        });
    }

    fn active_refreshed(&mut self, seq: RefreshSeq, result: &GridResult<Vec<EntityId>>) {
        if let Err(e) = self.active.apply_refresh(seq, result.clone()) {
            self.show_error(&e, "Refreshing strategies");
        }
        self.clamp_strategy_selection();
    }

    fn clamp_strategy_selection(&mut self) {
        let count = self.active.entities().len();
        self.selected_strategy = self.selected_strategy.min(count.saturating_sub(1));
    }

    fn refresh(&mut self) -> Option<AppEvent> {
        self.debug.last_action = "refresh".to_string();
        self.spawn_request(|api| AppEvent::EntitiesLoaded(api.fetch_entities()));
        let seq = self.active.begin_refresh();
        self.spawn_active_refresh(seq);
        Some(AppEvent::LoadPage)
    }

    fn grid_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor_down();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_up();
                None
            }
            KeyCode::PageDown => {
                self.select_row(self.selected_row + ROW_JUMP);
                None
            }
            KeyCode::PageUp => {
                self.select_row(self.selected_row.saturating_sub(ROW_JUMP));
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_row(self.selected_row),
            KeyCode::Char('b') => self.open_selected_scorecard_bets(),
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
            KeyCode::Home | KeyCode::Char('g') => self.first_page(),
            KeyCode::End | KeyCode::Char('G') => self.last_page(),
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c as usize - '1' as usize;
                self.select_page_control(slot)
            }
            _ => None,
        }
    }

    fn strategies_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        let strategies = self.strategies();
        match event.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_strategy + 1 < strategies.len() {
                    self.selected_strategy += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_strategy = self.selected_strategy.saturating_sub(1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t') => {
                let id = strategies.get(self.selected_strategy)?.clone();
                self.toggle_strategy(&id)
            }
            KeyCode::Char('b') => {
                let id = strategies.get(self.selected_strategy)?.clone();
                self.open_bets(BetsQuery::Strategy(id))
            }
            _ => None,
        }
    }

    fn bets_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        let moved = match event.code {
            KeyCode::Esc | KeyCode::Char('b') => {
                self.close_bets();
                false
            }
            KeyCode::Right | KeyCode::Char('l') => self.bets.navigate(Paginator::next),
            KeyCode::Left | KeyCode::Char('h') => self.bets.navigate(Paginator::previous),
            KeyCode::Home | KeyCode::Char('g') => self.bets.navigate(Paginator::first),
            KeyCode::End | KeyCode::Char('G') => self.bets.navigate(Paginator::last),
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c as usize - '1' as usize;
                self.bets.navigate(|p| p.select_control(slot))
            }
            _ => false,
        };
        if moved {
            self.debug.last_action = "bets_page".to_string();
        }
        None
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);
        if event.kind == KeyEventKind::Release {
            return None;
        }

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(AppEvent::Exit)
            }
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            _ if self.bets.is_open() => return self.bets_key(event),
            KeyCode::Esc => {
                self.notice.hide();
                return None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggled();
                return None;
            }
            KeyCode::Char('r') => return Some(AppEvent::Refresh),
            _ => {}
        }

        match self.focus {
            Focus::Grid => self.grid_key(event),
            Focus::Strategies => self.strategies_key(event),
        }
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Refresh => self.refresh(),
            AppEvent::LoadPage => self.request_page(),
            AppEvent::PageLoaded {
                generation,
                offset,
                result,
            } => self.page_loaded(*generation, *offset, result),
            AppEvent::DetailLoaded {
                row,
                request,
                result,
            } => {
                self.detail_loaded(row, *request, result);
                None
            }
            AppEvent::Acknowledged {
                id,
                request,
                result,
            } => {
                self.acknowledged(id, *request, result);
                None
            }
            AppEvent::ActiveRefreshed { seq, result } => {
                self.active_refreshed(*seq, result);
                None
            }
            AppEvent::EntitiesLoaded(result) => {
                match result {
                    Ok(ids) => {
                        self.active.set_known_entities(ids.iter().cloned());
                        self.clamp_strategy_selection();
                    }
                    Err(e) => self.show_error(e, "Loading strategies"),
                }
                None
            }
            AppEvent::BetsLoaded { request, result } => {
                self.bets_loaded(*request, result);
                None
            }
            AppEvent::Resize(_, _) => None,
            AppEvent::Exit => None,
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;
        self.debug.in_flight_details = self.expansion.in_flight_count();
        self.debug.expanded_rows = self.expansion.expanded_count();
        self.debug.page_generation = self.page_generation;

        let mut constraints = vec![Constraint::Fill(1), Constraint::Length(1)];
        if self.notice.active {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        // Extract colors before mutable borrow to avoid borrow checker issues
        let primary_color = self.color("primary");
        let dimmed_color = self.color("dimmed");
        let table_header_color = self.color("table_header");
        let table_selected_color = self.color("table_selected");
        let text_color = self.color("text_primary");
        let detail_border_color = self.color("detail_border");
        let controls_bg_color = self.color("controls_bg");
        let error_color = self.color("error");
        let affordance_colors = AffordanceColors {
            active: self.color("success"),
            inactive: dimmed_color,
            danger: error_color,
            primary: primary_color,
            busy: self.color("warning"),
        };

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(STRATEGY_PANEL_WIDTH)])
            .split(layout[0]);

        let selected_detail = self
            .rows
            .get(self.selected_row)
            .and_then(|row| self.expansion.detail(&row.key).map(|d| (row, d)));
        let mut grid_area = main[0];
        if let Some(view) = self.bets.view() {
            BetsTable::new(view)
                .with_colors(
                    table_header_color,
                    primary_color,
                    self.color("secondary"),
                    dimmed_color,
                    primary_color,
                )
                .render(main[0], buf);
        } else if let Some((row, detail)) = selected_detail {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Fill(1), Constraint::Length(CHART_HEIGHT)])
                .split(main[0]);
            grid_area = chunks[0];
            let chart = comparison_chart(detail);
            DetailChart::new(&chart, row.parent_id.to_string())
                .with_colors(
                    self.color("chart_observed"),
                    self.color("chart_model"),
                    detail_border_color,
                    text_color,
                )
                .render(chunks[1], buf);
        }

        if !self.bets.is_open() {
            Grid::new(&self.rows, &self.expansion, self.selected_row)
                .with_selected_entry(self.detail_cursor)
                .with_focus(self.focus == Focus::Grid)
                .with_colors(
                    table_header_color,
                    table_selected_color,
                    text_color,
                    dimmed_color,
                    primary_color,
                )
                .render(grid_area, buf, &mut self.grid_state);
        }

        let strategies = self.active.entities();
        let hovered = (self.focus == Focus::Strategies).then_some(self.selected_strategy);
        StrategyPanel::new(&strategies, &self.active)
            .with_hovered(hovered)
            .with_colors(
                affordance_colors,
                if self.focus == Focus::Strategies {
                    primary_color
                } else {
                    dimmed_color
                },
            )
            .render(main[1], buf);

        let (window, summary, loading) = match self.bets.view() {
            Some(view) => (
                view.paginator.window(),
                view.paginator.summary(),
                view.is_loading(),
            ),
            None => (
                self.paginator.window(),
                self.paginator.summary(),
                self.loading_state.is_loading(),
            ),
        };
        (&PaginationBar::new(&window, summary)
            .with_loading(loading)
            .with_colors(primary_color, dimmed_color, Color::Reset))
            .render(layout[1], buf);

        let mut next = 2;
        if self.notice.active {
            Paragraph::new(format!("{}  (Esc to dismiss)", self.notice.message))
                .style(Style::default().fg(error_color))
                .render(layout[next], buf);
            next += 1;
        }

        (&Controls::new(self.focus == Focus::Strategies)
            .with_bets_open(self.bets.is_open())
            .with_background(controls_bg_color))
            .render(layout[next], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[next + 1], buf);
        }
    }
}
