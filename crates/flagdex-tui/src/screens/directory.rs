//! Directory screen: search field over a grid of country cards.

use std::collections::HashSet;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use flagdex_core::{
    ActivationId, Card, DirectoryState, DirectoryView, FilterMode, FlagImages, LoadOutcome, Status,
    Substitution, grid_columns, grid_rows,
};

use crate::action::{Action, Movement};
use crate::component::Component;
use crate::data_bridge::ProbeRequest;
use crate::theme;
use crate::widgets::flag_card::{CARD_HEIGHT, CARD_WIDTH, FlagCard};

/// Rows taken by the search field.
const SEARCH_HEIGHT: u16 = 3;
/// Rows outside this screen (the app's status bar).
const CHROME_HEIGHT: u16 = 1;

pub struct DirectoryScreen {
    state: DirectoryState,
    images: FlagImages,
    selected: usize,
    /// Last known terminal size, for keyboard paging.
    viewport: (u16, u16),
    throbber_state: ThrobberState,
    probe_tx: Option<UnboundedSender<ProbeRequest>>,
    /// Cards whose original flag was already queued for probing.
    probed: HashSet<String>,
}

impl DirectoryScreen {
    pub fn new(
        filter_mode: FilterMode,
        placeholder_url: impl Into<String>,
        probe_tx: Option<UnboundedSender<ProbeRequest>>,
    ) -> Self {
        Self {
            state: DirectoryState::activate(filter_mode),
            images: FlagImages::new(placeholder_url),
            selected: 0,
            viewport: (0, 0),
            throbber_state: ThrobberState::default(),
            probe_tx,
            probed: HashSet::new(),
        }
    }

    pub fn activation(&self) -> ActivationId {
        self.state.activation()
    }

    pub fn is_loading(&self) -> bool {
        self.state.status() == Status::Loading
    }

    /// One-line summary for the status bar.
    pub fn status_text(&self) -> String {
        match self.state.status() {
            Status::Loading => "loading".into(),
            Status::Failed => "load failed".into(),
            Status::Ready => {
                let mut text = format!(
                    "{} of {} countries",
                    self.state.visible_set().len(),
                    self.state.full_set().len()
                );
                let degraded = self.images.degraded_count();
                match degraded {
                    0 => {}
                    1 => text.push_str(" · 1 flag replaced"),
                    n => text.push_str(&format!(" · {n} flags replaced")),
                }
                text
            }
        }
    }

    /// Card columns and visible rows for the current viewport.
    fn grid_shape(&self) -> (usize, usize) {
        let (width, height) = self.viewport;
        let body = height.saturating_sub(SEARCH_HEIGHT + CHROME_HEIGHT);
        let columns = usize::from(grid_columns(width, CARD_WIDTH));
        let rows = usize::from((body / CARD_HEIGHT).max(1));
        (columns, rows)
    }

    fn move_selection(&mut self, movement: Movement) {
        let len = self.state.visible_set().len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        let (columns, rows) = self.grid_shape();
        let page = columns * rows;
        let s = self.selected;

        self.selected = match movement {
            Movement::Left => s.saturating_sub(1),
            Movement::Right => (s + 1).min(last),
            Movement::Up => s.checked_sub(columns).unwrap_or(s),
            Movement::Down if s + columns <= last => s + columns,
            Movement::Down => s,
            Movement::PageUp => s.saturating_sub(page),
            Movement::PageDown => (s + page).min(last),
            Movement::First => 0,
            Movement::Last => last,
        };
    }

    /// Queue probes for visible cards not yet checked.
    fn queue_probes(&mut self) {
        let Some(tx) = &self.probe_tx else {
            return;
        };
        for country in self.state.visible_set() {
            if self.probed.insert(country.key().to_owned()) {
                let _ = tx.send(ProbeRequest {
                    key: country.key().to_owned(),
                    url: country.flag_url.clone(),
                });
            }
        }
    }

    fn on_flag_failed(&mut self, key: &str, url: &str) {
        let Some(country) = self.state.full_set().iter().find(|c| c.key() == key) else {
            return;
        };
        match self.images.report_failure(key, &country.flag_url, url) {
            Substitution::Substituted(placeholder) => {
                debug!(key, failed = url, "flag replaced by placeholder");
                if let Some(tx) = &self.probe_tx {
                    let _ = tx.send(ProbeRequest {
                        key: key.to_owned(),
                        url: placeholder,
                    });
                }
            }
            Substitution::Exhausted => debug!(key, "placeholder failed too"),
            Substitution::Ignored => {}
        }
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let mode = match self.state.filter_mode() {
            FilterMode::Literal => " literal ",
            FilterMode::Pattern => " pattern ",
        };
        let block = Block::default()
            .title(Span::styled(" Search ", theme::title_style()))
            .title(Line::from(Span::styled(mode, theme::muted())).right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let line = if self.state.query().is_empty() {
            Line::from(vec![
                Span::styled("█", theme::search_text()),
                Span::styled(" type to filter countries", theme::muted()),
            ])
        } else {
            Line::from(vec![
                Span::styled(self.state.query(), theme::search_text()),
                Span::styled("█", theme::search_text()),
            ])
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_message(frame: &mut Frame, area: Rect, text: &str, style: ratatui::style::Style) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(Span::styled(text, style))
                .centered()
                .wrap(Wrap { trim: true }),
            row,
        );
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect, label: &str) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, cell, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(u16::try_from(label.chars().count() + 2).unwrap_or(u16::MAX)),
            Constraint::Fill(1),
        ])
        .areas(row);

        let throbber = Throbber::default()
            .label(label)
            .style(theme::message())
            .throbber_style(ratatui::style::Style::default().fg(theme::ELECTRIC_PURPLE));

        frame.render_stateful_widget(throbber, cell, &mut self.throbber_state.clone());
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, cards: &[Card]) {
        let columns = grid_columns(area.width, CARD_WIDTH);
        let rows = (area.height / CARD_HEIGHT).max(1);
        let per_row = usize::from(columns);

        // Scroll just far enough to keep the selection on screen.
        let visible_rows = usize::from(rows);
        let selected_row = self.selected / per_row;
        let first_row = selected_row
            .saturating_sub(visible_rows - 1)
            .min(grid_rows(cards.len(), columns).saturating_sub(visible_rows));

        for r in 0..rows {
            for c in 0..columns {
                let index = (first_row + usize::from(r)) * per_row + usize::from(c);
                let Some(card) = cards.get(index) else {
                    return;
                };
                let cell = Rect::new(
                    area.x + c * CARD_WIDTH,
                    area.y + r * CARD_HEIGHT,
                    CARD_WIDTH,
                    CARD_HEIGHT,
                )
                .intersection(area);
                frame.render_widget(
                    FlagCard::new(card).selected(index == self.selected),
                    cell,
                );
            }
        }
    }
}

impl Component for DirectoryScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Ok(None);
        }

        let movement = match key.code {
            KeyCode::Left => Some(Movement::Left),
            KeyCode::Right => Some(Movement::Right),
            KeyCode::Up => Some(Movement::Up),
            KeyCode::Down => Some(Movement::Down),
            KeyCode::PageUp => Some(Movement::PageUp),
            KeyCode::PageDown => Some(Movement::PageDown),
            KeyCode::Home => Some(Movement::First),
            KeyCode::End => Some(Movement::Last),
            _ => None,
        };
        if let Some(movement) = movement {
            return Ok(Some(Action::MoveSelection(movement)));
        }

        // The search field only accepts input once the directory is ready.
        if self.state.status() != Status::Ready {
            return Ok(None);
        }

        let mut query = self.state.query().to_owned();
        match key.code {
            KeyCode::Char(c) => query.push(c),
            KeyCode::Backspace if !query.is_empty() => {
                query.pop();
            }
            KeyCode::Esc if !query.is_empty() => query.clear(),
            _ => return Ok(None),
        }
        Ok(Some(Action::QueryChanged(query)))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DirectoryLoaded { activation, result } => {
                match self.state.complete_load(*activation, result.clone()) {
                    LoadOutcome::Ready { count } => {
                        info!(count, "directory ready");
                        self.images.clear();
                        self.probed.clear();
                        self.selected = 0;
                        self.queue_probes();
                    }
                    LoadOutcome::Failed => info!("directory failed to load"),
                    LoadOutcome::Discarded => {}
                }
            }
            Action::QueryChanged(query) => {
                if self.state.set_query(query) {
                    debug!(
                        query = %query,
                        visible = self.state.visible_set().len(),
                        "filter applied"
                    );
                    self.selected = 0;
                    self.queue_probes();
                }
            }
            Action::FlagFailed { key, url } => self.on_flag_failed(key, url),
            Action::MoveSelection(movement) => self.move_selection(*movement),
            Action::Resize(w, h) => self.viewport = (*w, *h),
            Action::Tick => self.throbber_state.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [search_area, body] =
            Layout::vertical([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)]).areas(area);

        self.render_search(frame, search_area);

        match DirectoryView::project(&self.state, &self.images) {
            DirectoryView::Loading(text) => self.render_loading(frame, body, text),
            DirectoryView::Failed(text) => {
                Self::render_message(frame, body, text, theme::error_message());
            }
            DirectoryView::Empty(text) => {
                Self::render_message(frame, body, text, theme::message());
            }
            DirectoryView::Grid(cards) => self.render_grid(frame, body, &cards),
        }
    }

    fn id(&self) -> &str {
        "directory"
    }
}
