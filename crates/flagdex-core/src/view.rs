// ── Directory view projection ──
//
// Pure mapping from `DirectoryState` (plus the per-card image fallbacks)
// to what the rendering surface draws: a loading message, the error
// message, the empty-result message, or the card grid.

use crate::fallback::{FlagImages, ImageState};
use crate::state::{DirectoryState, Status};

pub const LOADING_MESSAGE: &str = "Loading countries...";
pub const EMPTY_MESSAGE: &str = "No countries found matching your search.";

/// One card of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Rendering identity (the display name).
    pub key: String,
    pub display_name: String,
    /// URL the card shows, after fallback.
    pub image_url: String,
    /// The flag URL as loaded, before fallback.
    pub original_url: String,
    pub image: ImageState,
}

/// Renderable output for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryView {
    Loading(&'static str),
    Failed(&'static str),
    Empty(&'static str),
    Grid(Vec<Card>),
}

impl DirectoryView {
    pub fn project(state: &DirectoryState, images: &FlagImages) -> Self {
        match state.status() {
            Status::Loading => Self::Loading(LOADING_MESSAGE),
            Status::Failed => Self::Failed(
                state
                    .error_message()
                    .unwrap_or(crate::error::LOAD_FAILED_MESSAGE),
            ),
            Status::Ready if state.visible_set().is_empty() => Self::Empty(EMPTY_MESSAGE),
            Status::Ready => Self::Grid(
                state
                    .visible_set()
                    .iter()
                    .map(|country| {
                        let (url, image) = images.resolve(country.key(), &country.flag_url);
                        Card {
                            key: country.key().to_owned(),
                            display_name: country.display_name.clone(),
                            image_url: url.to_owned(),
                            original_url: country.flag_url.clone(),
                            image,
                        }
                    })
                    .collect(),
            ),
        }
    }
}

/// Number of card columns that fit in `width` cells (at least one).
pub fn grid_columns(width: u16, card_width: u16) -> u16 {
    (width / card_width.max(1)).max(1)
}

/// Rows needed to lay out `cards` cards over `columns` columns.
pub fn grid_rows(cards: usize, columns: u16) -> usize {
    cards.div_ceil(usize::from(columns.max(1)))
}
