//! Application core: event loop, background tasks and action dispatch.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use flagdex_api::CountryClient;
use flagdex_config::Config;
use flagdex_core::http_source;

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::{self, ProbeRequest};
use crate::event::{Event, EventReader};
use crate::screens::DirectoryScreen;
use crate::theme;
use crate::tui::Tui;

/// Per-request bound for flag checks when no `timeout_secs` is configured.
/// Probes run one at a time, so a stalled host would otherwise hold up
/// every later card.
const FLAG_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

fn probe_timeout(config: &Config) -> Duration {
    config.timeout().unwrap_or(FLAG_PROBE_TIMEOUT)
}

/// Top-level application state and event loop.
pub struct App {
    screen: DirectoryScreen,
    running: bool,
    help_visible: bool,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    client: CountryClient,
    /// Taken when the probe task is spawned; `None` when probing is off.
    probe: Option<(CountryClient, mpsc::UnboundedReceiver<ProbeRequest>)>,
    /// Cancels the loader and the probe on teardown.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let client = http_source(&config.endpoint, config.timeout())?;

        let (probe_tx, probe) = if config.probe_flags {
            let probe_client = http_source(&config.endpoint, Some(probe_timeout(&config)))?;
            let (tx, rx) = mpsc::unbounded_channel();
            (Some(tx), Some((probe_client, rx)))
        } else {
            (None, None)
        };

        let screen = DirectoryScreen::new(config.filter_mode, config.placeholder_url, probe_tx);

        Ok(Self {
            screen,
            running: true,
            help_visible: false,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            client,
            probe,
            data_cancel: CancellationToken::new(),
        })
    }

    /// Spawn the directory loader and, if enabled, the flag probe.
    fn spawn_bridges(&mut self) {
        let activation = self.screen.activation();
        info!(%activation, endpoint = %self.client.endpoint(), "activating directory");

        tokio::spawn(data_bridge::run_loader(
            self.client.clone(),
            activation,
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        if let Some((probe_client, probe_rx)) = self.probe.take() {
            tokio::spawn(data_bridge::run_flag_probe(
                probe_client,
                probe_rx,
                self.action_tx.clone(),
                self.data_cancel.clone(),
            ));
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        let (w, h) = self.terminal_size;
        self.action_tx.send(Action::Resize(w, h))?;

        self.spawn_bridges();

        let mut events = EventReader::new(
            Duration::from_millis(100), // throbber frame
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain everything queued, in order
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Late results from the loader are never applied after this point
        self.data_cancel.cancel();
        events.stop();
        info!("event loop ended");
        Ok(())
    }

    /// Global keys first, everything else goes to the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::F(1) => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        if key.code == KeyCode::F(1) {
            return Ok(Some(Action::ToggleHelp));
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render => {}
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
                self.forward(action)?;
            }
            // The throbber is the only animation; it stops with the load
            Action::Tick => {
                if self.screen.is_loading() {
                    self.forward(action)?;
                }
            }
            Action::QueryChanged(_)
            | Action::DirectoryLoaded { .. }
            | Action::FlagFailed { .. }
            | Action::MoveSelection(_) => self.forward(action)?,
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            debug!(component = self.screen.id(), ?follow_up, "follow-up action");
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        self.screen.render(frame, content);
        self.render_status_bar(frame, status);

        if self.help_visible {
            Self::render_help_overlay(frame, frame.area());
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.screen.status_text(), Style::default().fg(theme::NEON_CYAN)),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled("F1", theme::key_hint_key()),
            Span::styled(" help  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" clear  ", theme::key_hint()),
            Span::styled("Ctrl+C", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 48u16.min(area.width.saturating_sub(4));
        let help_height = 13u16.min(area.height.saturating_sub(2));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            row("a-z 0-9 …", "Type to filter"),
            row("Backspace", "Delete last character"),
            row("Esc", "Clear search"),
            row("←/→ ↑/↓", "Move selection"),
            row("PgUp/PgDn", "Page up / down"),
            row("Home/End", "First / last card"),
            row("F1", "This help"),
            row("Ctrl+C", "Quit"),
            Line::from(""),
            Line::from(Span::styled("  Esc or F1 to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
