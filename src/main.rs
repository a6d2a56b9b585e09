use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use scoregrid::api::{Fixture, GridApi, HttpApi, InMemoryApi};
use scoregrid::config::{AppConfig, ConfigManager, Theme};
use scoregrid::{logging, App, AppEvent, Args, PageSource, APP_NAME};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

/// Apply command-line overrides on top of the file configuration.
fn apply_args(config: &mut AppConfig, args: &Args) {
    if let Some(url) = &args.url {
        config.server.base_url = Some(url.clone());
    }
    if let Some(timeout) = args.timeout {
        config.server.timeout_secs = timeout;
    }
    if let Some(source) = &args.source {
        config.display.source = Some(source.clone());
    }
    if let Some(page_size) = args.page_size {
        config.display.page_size = page_size;
    }
    if let Some(window_size) = args.window_size {
        config.display.window_size = window_size;
    }
    if args.debug {
        config.debug.enabled = true;
    }
    if let Some(log_file) = &args.log_file {
        config.debug.log_file = Some(log_file.clone());
    }
}

/// Pick the server and page source. A URL means a live server; a source file alone means
/// the whole session is served from that file.
fn build_api(config: &AppConfig) -> Result<(Arc<dyn GridApi>, PageSource)> {
    let fixture = config
        .display
        .source
        .as_deref()
        .map(Fixture::from_file)
        .transpose()?;

    match (&config.server.base_url, fixture) {
        (Some(url), fixture) => {
            let api = HttpApi::new(url, Duration::from_secs(config.server.timeout_secs));
            tracing::info!(url = %api.base_url(), local_rows = fixture.is_some(), "using server");
            let source = match fixture {
                Some(fixture) => PageSource::Local(fixture.rows()),
                None => PageSource::Remote,
            };
            Ok((Arc::new(api), source))
        }
        (None, Some(fixture)) => {
            tracing::info!(rows = fixture.rows.len(), "serving from source file");
            Ok((Arc::new(InMemoryApi::from_fixture(&fixture)), PageSource::Remote))
        }
        (None, None) => Err(eyre!(
            "No server configured. Pass --url, set [server] base_url in the config file, or give a --source file."
        )),
    }
}

fn run(mut terminal: DefaultTerminal, config: &AppConfig) -> Result<()> {
    let (api, source) = build_api(config)?;
    let theme = Theme::from_config(&config.theme)?;

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), api, source, theme, config);
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Refresh)?;

    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let mut updated = false;
        loop {
            match rx.recv_timeout(Duration::from_millis(0)) {
                Ok(AppEvent::Exit) => return Ok(()),
                Ok(event) => {
                    if let Some(event) = app.event(&event) {
                        tx.send(event)?;
                    }
                    updated = true;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        let manager = ConfigManager::new(APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(Some(()));
    }
    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let mut config = AppConfig::load(APP_NAME)?;
    apply_args(&mut config, &args);
    config.validate()?;
    logging::init(
        config.debug.log_file.as_deref(),
        config.debug.log_filter.as_deref(),
    )?;

    let terminal = ratatui::init();
    let result = run(terminal, &config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", scoregrid::error_display::user_message_from_report(&e));
        std::process::exit(1);
    }
    Ok(())
}
