use serde::{Deserialize, Serialize};

/// Normalized country as displayed in the directory grid.
///
/// `display_name` doubles as the card's rendering key and as the filter
/// target. It is expected to be unique within one loaded set; duplicates
/// are kept but share display identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryView {
    pub display_name: String,
    pub flag_url: String,
}

impl CountryView {
    pub fn new(display_name: impl Into<String>, flag_url: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            flag_url: flag_url.into(),
        }
    }

    /// Rendering identity of the card bound to this country.
    pub fn key(&self) -> &str {
        &self.display_name
    }
}

impl AsRef<CountryView> for CountryView {
    fn as_ref(&self) -> &CountryView {
        self
    }
}
