//! All possible UI actions. Actions are the sole mechanism for state mutation.

use flagdex_core::{ActivationId, CoreError, RawCountry};

/// Selection movement inside the card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Directory ──
    /// The search field now holds this text.
    QueryChanged(String),
    /// The fetch for `activation` finished.
    DirectoryLoaded {
        activation: ActivationId,
        result: Result<Vec<RawCountry>, CoreError>,
    },
    /// `url` did not load for the card `key`.
    FlagFailed { key: String, url: String },
    MoveSelection(Movement),

    // ── Overlays ──
    ToggleHelp,
}
