// ── Flag image fallback policy ──
//
// Each card starts on its original flag URL. The first load failure of
// that URL swaps in the placeholder; a failure of the placeholder marks
// the card broken and nothing is swapped again. Bindings are keyed by the
// card's display name.

use std::collections::HashMap;

/// Placeholder shown when a flag image does not load.
pub const PLACEHOLDER_FLAG_URL: &str = "https://placehold.co/400x160/cccccc/000000?text=No+Flag";

/// Which image a card is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Original,
    Placeholder,
    /// The placeholder failed too. Terminal.
    Broken,
}

/// Result of reporting a load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// The card now points at this URL.
    Substituted(String),
    /// The placeholder itself failed; the card stays as it is.
    Exhausted,
    /// The failure was for a URL the card no longer shows.
    Ignored,
}

/// Fallback state of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagBinding {
    original: String,
    state: ImageState,
}

impl FlagBinding {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            state: ImageState::Original,
        }
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    /// The URL the card should display.
    pub fn current_url<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.state {
            ImageState::Original => &self.original,
            ImageState::Placeholder | ImageState::Broken => placeholder,
        }
    }

    /// Record that `failed_url` did not load.
    pub fn on_load_error(&mut self, failed_url: &str, placeholder: &str) -> Substitution {
        match self.state {
            ImageState::Original if failed_url != self.original => Substitution::Ignored,
            // Swapping to an identical URL would only fail again.
            ImageState::Original if self.original == placeholder => {
                self.state = ImageState::Broken;
                Substitution::Exhausted
            }
            ImageState::Original => {
                self.state = ImageState::Placeholder;
                Substitution::Substituted(placeholder.to_owned())
            }
            ImageState::Placeholder if failed_url == placeholder => {
                self.state = ImageState::Broken;
                Substitution::Exhausted
            }
            ImageState::Placeholder | ImageState::Broken => Substitution::Ignored,
        }
    }
}

/// Fallback bindings for every card of one load cycle.
#[derive(Debug, Clone)]
pub struct FlagImages {
    placeholder: String,
    bindings: HashMap<String, FlagBinding>,
}

impl Default for FlagImages {
    fn default() -> Self {
        Self::new(PLACEHOLDER_FLAG_URL)
    }
}

impl FlagImages {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            bindings: HashMap::new(),
        }
    }

    /// URL and image state for the card `key` whose original is `original`.
    pub fn resolve<'a>(&'a self, key: &str, original: &'a str) -> (&'a str, ImageState) {
        match self.bindings.get(key) {
            Some(binding) => (binding.current_url(&self.placeholder), binding.state()),
            None => (original, ImageState::Original),
        }
    }

    /// Report that `failed_url` did not load for card `key`.
    pub fn report_failure(&mut self, key: &str, original: &str, failed_url: &str) -> Substitution {
        let placeholder = self.placeholder.as_str();
        self.bindings
            .entry(key.to_owned())
            .or_insert_with(|| FlagBinding::new(original))
            .on_load_error(failed_url, placeholder)
    }

    /// Number of cards currently off their original image.
    pub fn degraded_count(&self) -> usize {
        self.bindings
            .values()
            .filter(|b| b.state() != ImageState::Original)
            .count()
    }

    /// Forget all bindings (new load cycle).
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_failure_substitutes_once() {
        let mut images = FlagImages::default();

        let first = images.report_failure("France", "fr.png", "fr.png");
        assert_eq!(first, Substitution::Substituted(PLACEHOLDER_FLAG_URL.to_owned()));
        assert_eq!(
            images.resolve("France", "fr.png"),
            (PLACEHOLDER_FLAG_URL, ImageState::Placeholder)
        );

        // A duplicate failure event for the original does not swap again.
        assert_eq!(images.report_failure("France", "fr.png", "fr.png"), Substitution::Ignored);
        assert_eq!(images.degraded_count(), 1);
    }

    #[test]
    fn placeholder_failure_does_not_loop() {
        let mut images = FlagImages::default();
        images.report_failure("France", "fr.png", "fr.png");

        let second = images.report_failure("France", "fr.png", PLACEHOLDER_FLAG_URL);
        assert_eq!(second, Substitution::Exhausted);
        assert_eq!(
            images.resolve("France", "fr.png"),
            (PLACEHOLDER_FLAG_URL, ImageState::Broken)
        );

        for _ in 0..5 {
            assert_eq!(
                images.report_failure("France", "fr.png", PLACEHOLDER_FLAG_URL),
                Substitution::Ignored
            );
        }
    }

    #[test]
    fn untouched_cards_resolve_to_their_original() {
        let images = FlagImages::default();
        assert_eq!(images.resolve("Germany", "de.png"), ("de.png", ImageState::Original));
    }

    #[test]
    fn original_equal_to_placeholder_goes_straight_to_broken() {
        let mut images = FlagImages::new("p.png");
        assert_eq!(images.report_failure("X", "p.png", "p.png"), Substitution::Exhausted);
        assert_eq!(images.resolve("X", "p.png"), ("p.png", ImageState::Broken));
    }

    #[test]
    fn failures_for_unrelated_urls_are_ignored() {
        let mut binding = FlagBinding::new("fr.png");
        assert_eq!(binding.on_load_error("de.png", "p.png"), Substitution::Ignored);
        assert_eq!(binding.state(), ImageState::Original);
    }

    #[test]
    fn clear_resets_every_card() {
        let mut images = FlagImages::default();
        images.report_failure("France", "fr.png", "fr.png");
        images.clear();
        assert_eq!(images.degraded_count(), 0);
        assert_eq!(images.resolve("France", "fr.png"), ("fr.png", ImageState::Original));
    }
}
