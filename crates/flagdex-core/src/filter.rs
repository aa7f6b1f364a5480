// ── Directory filtering ──
//
// Case-insensitive matching of a typed query against country names.
// Filtering never touches the network and never fails: an unusable
// pattern yields an empty result.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::model::CountryView;

/// Upper bound on the compiled size of a user-supplied pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// How a query is interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FilterMode {
    /// The query is plain text. `(`, `*`, `[` and friends match themselves.
    #[default]
    Literal,
    /// The query is a regular expression matched anywhere in the name.
    /// A pattern that does not compile matches nothing.
    Pattern,
}

/// A query compiled for repeated matching.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Empty query.
    All,
    /// Lowercased literal needle.
    Literal(String),
    Pattern(Regex),
    /// Malformed pattern.
    Nothing,
}

impl Matcher {
    pub fn compile(mode: FilterMode, query: &str) -> Self {
        if query.is_empty() {
            return Self::All;
        }
        match mode {
            FilterMode::Literal => Self::Literal(query.to_lowercase()),
            FilterMode::Pattern => match RegexBuilder::new(query)
                .case_insensitive(true)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
            {
                Ok(re) => Self::Pattern(re),
                Err(e) => {
                    debug!(query, error = %e, "unusable filter pattern, matching nothing");
                    Self::Nothing
                }
            },
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Literal(needle) => name.to_lowercase().contains(needle.as_str()),
            Self::Pattern(re) => re.is_match(name),
            Self::Nothing => false,
        }
    }
}

/// Return the items whose display name matches `query`, in input order.
///
/// An empty query returns every item.
pub fn filter<T>(mode: FilterMode, query: &str, items: &[T]) -> Vec<T>
where
    T: AsRef<CountryView> + Clone,
{
    let matcher = Matcher::compile(mode, query);
    if let Matcher::All = matcher {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matcher.is_match(&item.as_ref().display_name))
        .cloned()
        .collect()
}
