//! Directory pipeline between `flagdex-api` and the terminal UI.
//!
//! - **[`DirectoryState`]**: the single owner of the loaded directory, with
//!   its `Loading -> Ready | Failed` transitions, the current query and the
//!   visible subset. Late results for a superseded activation are discarded.
//!
//! - **[`normalize`]**: total, order-preserving mapping of raw records into
//!   [`CountryView`], adapting the upstream field-naming variants.
//!
//! - **[`filter`](filter::filter)**: case-insensitive matching of the query
//!   against display names, literal by default, with an opt-in pattern mode
//!   that fails closed.
//!
//! - **[`DirectoryView`]** and **[`FlagImages`]**: pure projection of the
//!   state into renderable output, with a one-shot placeholder fallback per
//!   card.

pub mod convert;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use convert::normalize;
pub use error::{CoreError, LOAD_FAILED_MESSAGE};
pub use fallback::{FlagBinding, FlagImages, ImageState, PLACEHOLDER_FLAG_URL, Substitution};
pub use filter::{FilterMode, Matcher};
pub use model::CountryView;
pub use source::{DirectorySource, http_source, load_directory};
pub use state::{ActivationId, DirectoryState, LoadOutcome, Status};
pub use view::{Card, DirectoryView, EMPTY_MESSAGE, LOADING_MESSAGE, grid_columns, grid_rows};

pub use flagdex_api::{DEFAULT_ENDPOINT, FetchFailureKind, RawCountry};
