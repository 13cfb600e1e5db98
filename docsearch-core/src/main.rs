//! src/main.rs
//! Terminal front-end for the documentation search controller

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event as TerminalEvent, EventStream, KeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use docsearch_core::{
    Logger,
    analytics::{AnalyticsSink, HttpAnalytics, NoopAnalytics, TracingAnalytics},
    config::Config,
    controller::{
        actions::Action,
        event_loop::{ControllerParts, SearchController},
        navigation::BrowserNavigator,
    },
    model::{input_line::InputLine, search_state::Focus},
    tasks::search_task::{HttpSearchBackend, SearchContext},
    util::{
        debounce::DebounceConfig,
        location::{Location, PageLocation},
    },
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Search a documentation site from the terminal.
#[derive(Debug, Parser)]
#[command(name = "docsearch", version, about)]
struct Args {
    /// Page location the search box lives on, e.g. `/docs/intro?query=install`
    #[arg(long, default_value = "/")]
    url: String,

    /// Documentation language (overrides config)
    #[arg(long)]
    language: Option<String>,

    /// Documentation version (overrides config)
    #[arg(long = "doc-version")]
    doc_version: Option<String>,

    /// Search endpoint URL (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Render inline instead of as an overlay
    #[arg(long)]
    inline: bool,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args).await?;

    let _log_guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    setup_panic_handler();
    theme::init_theme();

    let app = App::new(&config, &args).context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().await.unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        }),
    };

    if let Some(language) = &args.language {
        config.search.language.clone_from(language);
    }
    if let Some(version) = &args.doc_version {
        config.search.version.clone_from(version);
    }
    if let Some(endpoint) = &args.endpoint {
        config.search.endpoint.clone_from(endpoint);
    }
    if args.inline {
        config.ui.overlay = false;
    }

    config
        .validate()
        .map_err(|e| e.with_context("after command line overrides"))?;
    Ok(config)
}

fn analytics_sink(config: &Config) -> Arc<dyn AnalyticsSink> {
    match (config.analytics.enabled, &config.analytics.endpoint) {
        (false, _) => Arc::new(NoopAnalytics),
        (true, Some(endpoint)) => Arc::new(HttpAnalytics::new(reqwest::Client::new(), endpoint)),
        (true, None) => Arc::new(TracingAnalytics),
    }
}

struct App {
    terminal: AppTerminal,
    controller: SearchController,
    input: InputLine,
    ui_renderer: UIRenderer,
    shutdown: CancellationToken,
}

impl App {
    fn new(config: &Config, args: &Args) -> Result<Self> {
        info!(
            "Starting docsearch: endpoint={} language={} version={}",
            config.search.endpoint, config.search.language, config.search.version
        );

        let backend =
            HttpSearchBackend::new(config.search.endpoint.clone(), config.search.request_timeout)
                .context("Failed to build search client")?;

        let location = config
            .search
            .url_sync
            .then(|| Box::new(PageLocation::parse(&args.url)) as Box<dyn Location>);

        let mut controller = SearchController::new(ControllerParts {
            backend: Arc::new(backend),
            analytics: analytics_sink(config),
            navigator: Arc::new(BrowserNavigator::new(config.site.base_url.clone())),
            location,
            context: SearchContext {
                language: config.search.language.as_str().into(),
                version: config.search.version.as_str().into(),
            },
            debounce: DebounceConfig::with_delay(config.search.debounce),
            max_query_len: config.search.max_query_len,
            is_overlay: config.ui.overlay,
        });

        controller.mount();
        controller.set_focus(Focus::SearchField);
        let mut input = InputLine::new();
        input.set(controller.snapshot().query);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            controller,
            input,
            ui_renderer: UIRenderer::new(),
            shutdown: CancellationToken::new(),
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        let mut event_stream = EventStream::new();

        loop {
            self.render()?;

            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(terminal_event)) => {
                        if !self.process_terminal_event(terminal_event) {
                            break;
                        }
                    }
                    Some(Err(e)) => warn!("terminal event error: {}", e),
                    None => break,
                },

                event = self.controller.next_event() => {
                    if let Some(event) = event {
                        self.controller.handle(event);
                    }
                }
            }
        }

        let stats = self.ui_renderer.stats();
        info!(
            "Rendered {} frames ({:.1} fps while drawing, {} slow)",
            stats.frames,
            stats.fps(),
            stats.slow
        );
        if let Some(href) = self.controller.snapshot().href {
            info!("Final location: {}", href);
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let snap = self.controller.snapshot();
        let input = &self.input;
        let renderer = &mut self.ui_renderer;

        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, &snap, input))
            .context("Failed to draw terminal")?;
        Ok(())
    }

    /// Returns false when the app should exit.
    fn process_terminal_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                self.process_key(key_event)
            }
            TerminalEvent::Mouse(mouse_event) => {
                self.process_mouse(mouse_event);
                true
            }
            _ => true,
        }
    }

    fn process_key(&mut self, key_event: KeyEvent) -> bool {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            info!("Quit requested");
            return false;
        }

        let was_empty = self.input.as_str().is_empty();
        let outcome = self.controller.on_key(key_event);
        if outcome.action == Some(Action::Close) {
            self.input.clear();
            if was_empty {
                self.controller.set_focus(Focus::Elsewhere);
            }
            return true;
        }
        if outcome.prevent_default || outcome.action.is_some() {
            return true;
        }

        match self.controller.snapshot().focus {
            Focus::SearchField => self.edit_input(key_event),
            Focus::Elsewhere => match key_event.code {
                KeyCode::Char('q') => return false,
                KeyCode::Tab => self.controller.set_focus(Focus::SearchField),
                _ => {}
            },
        }
        true
    }

    fn edit_input(&mut self, key_event: KeyEvent) {
        let changed = match key_event.code {
            KeyCode::Char(ch)
                if !key_event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.insert_char(ch);
                true
            }
            KeyCode::Backspace => self.input.delete_char_before(),
            KeyCode::Delete => self.input.delete_char_after(),
            KeyCode::Left => {
                self.input.move_left();
                false
            }
            KeyCode::Right => {
                self.input.move_right();
                false
            }
            KeyCode::Home => {
                self.input.move_home();
                false
            }
            KeyCode::End => {
                self.input.move_end();
                false
            }
            KeyCode::Tab => {
                self.controller.set_focus(Focus::Elsewhere);
                false
            }
            _ => false,
        };

        if changed {
            self.controller.on_input(self.input.as_str());
        }
    }

    fn process_mouse(&mut self, mouse_event: MouseEvent) {
        let Some(index) = self.ui_renderer.hit_at(mouse_event.column, mouse_event.row) else {
            return;
        };
        match mouse_event.kind {
            MouseEventKind::Moved => self.controller.on_hover(index),
            MouseEventKind::Down(MouseButton::Left) => {
                debug!("click on hit {}", index);
                self.controller.on_click(index);
            }
            _ => {}
        }
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {}", e);
                        return;
                    }
                };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.cancel();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
