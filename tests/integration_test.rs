use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use scoregrid::active::AffordanceStyle;
use scoregrid::config::AppConfig;
use scoregrid::model::{BetSide, BetsQuery, EntityId, ParentId, RowKey};
use scoregrid::{AppEvent, Focus, InMemoryApi, PageSource};

mod common;
use common::{bet, detail, key, market_bets, rows, server, Harness};

fn id(s: &str) -> EntityId {
    EntityId::new(s)
}

#[test]
fn test_short_result_is_one_page_with_navigation_disabled() {
    let mut h = Harness::new(server(47)).start();

    assert_eq!(h.app.rows().len(), 47);
    let window = h.app.paginator().window();
    assert_eq!(window.pages, vec![1]);
    assert!(window.previous_disabled);
    assert!(window.next_disabled);
    assert_eq!(h.app.paginator().summary(), "Showing 1 to 47 of 47 entries");

    assert!(h.app.next_page().is_none());
    assert!(h.app.previous_page().is_none());
    assert_eq!(h.api.page_calls(), 1);
}

#[test]
fn test_navigation_fetches_pages() {
    let mut h = Harness::new(server(120)).start();
    assert_eq!(h.app.paginator().window().pages, vec![1, 2, 3]);

    h.send(key(KeyCode::Right));
    assert!(h.pump_one());
    assert_eq!(h.app.rows()[0].key, RowKey::new("row-50"));
    assert_eq!(h.app.paginator().summary(), "Showing 51 to 100 of 120 entries");

    h.send(key(KeyCode::End));
    assert!(h.pump_one());
    assert_eq!(h.app.rows().len(), 20);
    assert!(h.app.paginator().window().next_disabled);

    h.send(key(KeyCode::Char('1')));
    assert!(h.pump_one());
    assert_eq!(h.app.rows()[0].key, RowKey::new("row-0"));
    assert_eq!(h.api.page_calls(), 4);
}

#[test]
fn test_superseded_page_response_is_dropped() {
    let mut h = Harness::new(server(200)).start();

    // Two navigations before either response is applied
    h.send(key(KeyCode::Right));
    h.send(key(KeyCode::Right));
    h.settle();

    assert_eq!(h.app.rows()[0].key, RowKey::new("row-100"));
    assert_eq!(h.app.paginator().display_start, 100);
    assert!(!h.app.is_loading());
}

#[test]
fn test_page_failure_keeps_rows_and_offset() {
    let mut h = Harness::new(server(120)).start();
    h.api.fail_pages(true);

    h.send(key(KeyCode::Right));
    h.settle();

    assert_eq!(h.app.rows()[0].key, RowKey::new("row-0"));
    assert_eq!(h.app.paginator().display_start, 0);
    assert!(h.app.notice().unwrap().contains("Loading page failed"));
}

#[test]
fn test_local_source_paginates_without_server() {
    let mut config = AppConfig::default();
    config.display.page_size = 10;
    let mut h = Harness::with_config(InMemoryApi::new(), PageSource::Local(rows(25)), config).start();

    assert_eq!(h.app.rows().len(), 10);
    h.send(key(KeyCode::End));
    assert_eq!(h.app.rows().len(), 5);
    assert_eq!(h.app.rows()[0].key, RowKey::new("row-20"));
    assert_eq!(h.api.page_calls(), 0);
}

#[test]
fn test_expand_fetches_detail_by_parent_id() {
    let mut h = Harness::new(server(5)).start();

    h.send(key(KeyCode::Down));
    h.send(key(KeyCode::Enter));
    assert!(h.app.expansion().state(&RowKey::new("row-1")).is_loading());
    assert!(h.pump_one());

    assert_eq!(
        h.app.expansion().detail(&RowKey::new("row-1")),
        Some(&detail(2))
    );
    assert_eq!(h.api.detail_calls(), 1);

    // Collapse discards, re-expanding fetches again
    h.send(key(KeyCode::Enter));
    assert!(h.app.expansion().state(&RowKey::new("row-1")).is_collapsed());
    h.send(key(KeyCode::Enter));
    h.settle();
    assert_eq!(h.api.detail_calls(), 2);
}

#[test]
fn test_double_toggle_while_loading_issues_one_fetch() {
    let mut h = Harness::new(server(5)).start();

    h.send(key(KeyCode::Enter));
    h.send(key(KeyCode::Enter));
    h.settle();

    assert_eq!(h.api.detail_calls(), 1);
    assert!(h.app.expansion().state(&RowKey::new("row-0")).is_collapsed());
    assert!(h.app.notice().is_none());
}

#[test]
fn test_reexpand_before_resolve_reuses_fetch() {
    let mut h = Harness::new(server(5)).start();

    for _ in 0..3 {
        h.send(key(KeyCode::Enter));
    }
    h.settle();

    assert_eq!(h.api.detail_calls(), 1);
    assert!(h.app.expansion().state(&RowKey::new("row-0")).is_expanded());
}

#[test]
fn test_detail_failure_collapses_with_notice() {
    let mut h = Harness::new(server(5)).start();
    h.api.fail_details(true);

    h.send(key(KeyCode::Enter));
    h.settle();

    assert!(h.app.expansion().state(&RowKey::new("row-0")).is_collapsed());
    let notice = h.app.notice().unwrap();
    assert!(notice.contains("Loading detail failed"));

    h.send(key(KeyCode::Esc));
    assert!(h.app.notice().is_none());
}

#[test]
fn test_page_change_collapses_expanded_rows() {
    let mut h = Harness::new(server(120)).start();
    h.send(key(KeyCode::Enter));
    h.settle();
    assert_eq!(h.app.expansion().expanded_count(), 1);

    h.send(key(KeyCode::Right));
    h.settle();
    assert_eq!(h.app.expansion().expanded_count(), 0);
}

#[test]
fn test_set_active_success_refetches_set() {
    let mut h = Harness::new(server(1).with_entities(&["alpha", "beta"])).start();
    assert!(h.app.active().is_loaded());
    assert!(!h.app.active().is_active(&id("alpha")));
    let refreshes = h.api.active_calls();

    h.app.set_active(&id("alpha"), true);
    assert_eq!(
        h.app.active().affordance(&id("alpha"), false).style,
        AffordanceStyle::Busy
    );
    h.settle();

    assert!(h.app.active().is_active(&id("alpha")));
    assert_eq!(h.api.mutation_calls(), 1);
    assert_eq!(h.api.active_calls(), refreshes + 1);
    assert_eq!(h.app.active().affordance(&id("alpha"), false).label, "Trading");
}

#[test]
fn test_set_active_failure_restores_button() {
    let mut h = Harness::new(server(1).with_entities(&["alpha"]).with_active(&["beta"])).start();
    let before = h.app.active().affordance(&id("alpha"), false);
    let set_before = h.app.active().active_set().clone();
    h.api.fail_mutations(true);

    h.app.set_active(&id("alpha"), true);
    h.settle();

    assert_eq!(h.app.active().active_set(), &set_before);
    assert_eq!(h.app.active().affordance(&id("alpha"), false), before);
    assert!(h.app.notice().unwrap().contains("Updating alpha failed"));
}

#[test]
fn test_refresh_picks_up_changes_from_other_clients() {
    let mut h = Harness::new(server(1).with_entities(&["alpha", "beta"])).start();
    h.api.set_active_externally("beta", true);

    h.app.set_active(&id("alpha"), true);
    h.settle();

    assert!(h.app.active().is_active(&id("alpha")));
    assert!(h.app.active().is_active(&id("beta")));
}

#[test]
fn test_strategy_panel_keys_toggle_selected() {
    let mut h = Harness::new(server(1).with_entities(&["alpha", "beta"])).start();

    h.send(key(KeyCode::Tab));
    assert_eq!(h.app.focus(), Focus::Strategies);
    h.send(key(KeyCode::Down));
    h.send(key(KeyCode::Enter));
    // Second press while pending is ignored
    h.send(key(KeyCode::Enter));
    h.settle();

    assert_eq!(h.api.mutation_calls(), 1);
    assert!(h.app.active().is_active(&id("beta")));
    assert!(!h.app.active().is_active(&id("alpha")));
}

#[test]
fn test_quit_key_exits() {
    let mut h = Harness::new(server(1));
    assert!(matches!(
        h.app.event(&key(KeyCode::Char('q'))),
        Some(AppEvent::Exit)
    ));
}

#[test]
fn test_full_screen_render() {
    let mut h = Harness::new(server(47).with_entities(&["alpha"])).start();
    h.send(key(KeyCode::Enter));
    h.settle();

    let mut terminal = Terminal::new(TestBackend::new(140, 50)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(&mut h.app, frame.area()))
        .unwrap();
    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();

    assert!(text.contains("Scorecards"));
    assert!(text.contains("Strategies"));
    assert!(text.contains("Showing 1 to 47 of 47 entries"));
    assert!(text.contains("Idle"));
    assert!(text.contains("card-0"));
}

#[test]
fn test_bets_for_detail_entry_are_filtered_to_its_market() {
    let api = server(3).with_scorecard_bets(ParentId::new("card-1"), market_bets(2, 3));
    let mut h = Harness::new(api).start();

    h.send(key(KeyCode::Down));
    h.send(key(KeyCode::Enter));
    assert!(h.pump_one());
    // Cursor walks into the detail entries before leaving the row
    h.send(key(KeyCode::Down));
    h.send(key(KeyCode::Down));
    assert_eq!(h.app.selected_row(), 1);
    assert_eq!(h.app.detail_cursor(), Some(1));

    h.send(key(KeyCode::Char('b')));
    assert!(h.app.bets().view().unwrap().is_loading());
    assert!(h.pump_one());

    let view = h.app.bets().view().unwrap();
    assert_eq!(
        view.query,
        BetsQuery::Scorecard {
            parent_id: ParentId::new("card-1"),
            market_id: Some("1.01".to_string()),
        }
    );
    assert_eq!(view.bets.len(), 3);
    assert!(view.bets.iter().all(|b| b.market_id == "1.01"));

    h.send(key(KeyCode::Esc));
    assert!(!h.app.bets().is_open());
    assert_eq!(h.app.detail_cursor(), Some(1));
}

#[test]
fn test_bets_for_whole_scorecard_from_row() {
    let api = server(3).with_scorecard_bets(ParentId::new("card-0"), market_bets(2, 3));
    let mut h = Harness::new(api).start();

    h.send(key(KeyCode::Char('b')));
    assert!(h.pump_one());

    let view = h.app.bets().view().unwrap();
    assert_eq!(view.title(), "Bets card-0");
    assert_eq!(view.bets.len(), 6);
}

#[test]
fn test_bets_for_selected_strategy() {
    let api = server(1)
        .with_entities(&["alpha", "beta"])
        .with_strategy_bets("beta", vec![bet(0, "1.50"), bet(1, "1.51")]);
    let mut h = Harness::new(api).start();

    h.send(key(KeyCode::Tab));
    h.send(key(KeyCode::Down));
    h.send(key(KeyCode::Char('b')));
    assert!(h.pump_one());

    let view = h.app.bets().view().unwrap();
    assert_eq!(view.query, BetsQuery::Strategy(id("beta")));
    assert_eq!(view.bets[0].side(), BetSide::Back);
    assert_eq!(view.bets[1].side(), BetSide::Lay);
    // Opening bets does not toggle the strategy
    assert_eq!(h.api.mutation_calls(), 0);
}

#[test]
fn test_bets_list_pages_locally() {
    let api = server(1).with_scorecard_bets(ParentId::new("card-0"), market_bets(1, 120));
    let mut h = Harness::new(api).start();

    h.send(key(KeyCode::Char('b')));
    assert!(h.pump_one());
    assert_eq!(
        h.app.bets().view().unwrap().paginator.summary(),
        "Showing 1 to 50 of 120 entries"
    );

    h.send(key(KeyCode::Right));
    h.send(key(KeyCode::End));
    let view = h.app.bets().view().unwrap();
    assert_eq!(view.paginator.summary(), "Showing 101 to 120 of 120 entries");
    assert_eq!(view.page()[0].selection, "runner-100");

    // Paging the bets list leaves the grid where it was
    assert_eq!(h.api.bets_calls(), 1);
    assert_eq!(h.api.page_calls(), 1);
    assert_eq!(h.app.paginator().summary(), "Showing 1 to 1 of 1 entries");
}

#[test]
fn test_closed_bets_list_ignores_late_response() {
    let api = server(2).with_scorecard_bets(ParentId::new("card-0"), market_bets(1, 2));
    let mut h = Harness::new(api).start();

    h.send(key(KeyCode::Char('b')));
    h.send(key(KeyCode::Char('b')));
    assert!(!h.app.bets().is_open());
    h.settle();

    assert!(!h.app.bets().is_open());
    assert!(h.app.notice().is_none());
    assert_eq!(h.api.bets_calls(), 1);
}

#[test]
fn test_bets_failure_closes_list_with_notice() {
    let mut h = Harness::new(server(2)).start();
    h.api.fail_bets(true);

    h.send(key(KeyCode::Char('b')));
    h.settle();

    assert!(!h.app.bets().is_open());
    assert!(h.app.notice().unwrap().contains("Loading bets failed"));
}

#[test]
fn test_bets_render_uses_secondary_color_for_lays() {
    let mut config = AppConfig::default();
    config.theme.colors.secondary = "indexed(201)".to_string();
    let api = server(1).with_scorecard_bets(ParentId::new("card-0"), vec![bet(1, "1.00")]);
    let mut h = Harness::with_config(api, PageSource::Remote, config).start();

    h.send(key(KeyCode::Char('b')));
    assert!(h.pump_one());

    let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
    terminal
        .draw(|frame| frame.render_widget(&mut h.app, frame.area()))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
    assert!(text.contains("Bets card-0"));
    assert!(text.contains("runner-1"));
    assert!(text.contains("Close"));
    assert!(!text.contains("Scorecards"));

    if std::env::var("NO_COLOR").is_err() {
        assert!(buffer
            .content()
            .iter()
            .any(|c| c.symbol() == "L" && c.fg == ratatui::style::Color::Indexed(201)));
    }
}
