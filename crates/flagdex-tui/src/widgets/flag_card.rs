//! One country card: name in the border, flag status and image source inside.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use url::Url;

use flagdex_core::{Card, ImageState};

use crate::theme;

/// Cells per card, borders included.
pub const CARD_WIDTH: u16 = 26;
pub const CARD_HEIGHT: u16 = 4;

pub struct FlagCard<'a> {
    card: &'a Card,
    selected: bool,
}

impl<'a> FlagCard<'a> {
    pub fn new(card: &'a Card) -> Self {
        Self {
            card,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for FlagCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border, title) = if self.selected {
            (theme::border_focused(), theme::card_selected())
        } else {
            (theme::border_default(), theme::card_title())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(format!(" {} ", self.card.display_name), title));

        let lines = vec![
            Line::from(image_badge(self.card.image, &self.card.image_url)),
            Line::from(Span::styled(short_url(&self.card.image_url), theme::muted())),
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Status marker for the image a card is bound to.
pub fn image_badge(state: ImageState, url: &str) -> Span<'static> {
    let (text, color) = match state {
        ImageState::Original if url.is_empty() => ("· no flag", theme::BORDER_GRAY),
        ImageState::Original => ("▣ flag", theme::SUCCESS_GREEN),
        ImageState::Placeholder => ("▢ placeholder", theme::ELECTRIC_YELLOW),
        ImageState::Broken => ("✗ no image", theme::ERROR_RED),
    };
    Span::styled(text, Style::default().fg(color))
}

/// `host/file` for absolute URLs, the input unchanged otherwise.
pub fn short_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_owned();
    };
    let host = url.host_str().unwrap_or_default();
    match url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
    {
        Some(file) => format!("{host}/{file}"),
        None => host.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_url_keeps_host_and_file() {
        assert_eq!(
            short_url("https://flagcdn.com/w320/fr.png"),
            "flagcdn.com/fr.png"
        );
        assert_eq!(
            short_url("https://placehold.co/400x160/cccccc/000000?text=No+Flag"),
            "placehold.co/000000"
        );
        assert_eq!(short_url("https://example.com/"), "example.com");
        assert_eq!(short_url("fr.png"), "fr.png");
        assert_eq!(short_url(""), "");
    }

    #[test]
    fn badge_reflects_fallback_state() {
        assert_eq!(image_badge(ImageState::Original, "x.png").content, "▣ flag");
        assert_eq!(image_badge(ImageState::Original, "").content, "· no flag");
        assert_eq!(
            image_badge(ImageState::Placeholder, "p.png").content,
            "▢ placeholder"
        );
        assert_eq!(image_badge(ImageState::Broken, "p.png").content, "✗ no image");
    }
}
