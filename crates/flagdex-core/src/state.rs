// ── Directory state machine ──
//
// The single owner of the loaded directory. All mutation goes through
// `complete_load` and `set_query`:
//
//   Loading --fetch ok----> Ready   (full <- normalize(records), visible <- full, query <- "")
//   Loading --fetch err---> Failed  (error message set)
//   Ready   --query q-----> Ready   (visible <- filter(q, full))
//
// `Failed` is terminal for an activation. Results addressed to another
// activation, or arriving after the state left `Loading`, are discarded.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use strum::Display;
use tracing::debug;

use flagdex_api::RawCountry;

use crate::convert::normalize;
use crate::error::CoreError;
use crate::filter::{FilterMode, filter};
use crate::model::CountryView;

static NEXT_ACTIVATION: AtomicU64 = AtomicU64::new(1);

/// Identifies one activation of the directory screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivationId(u64);

impl ActivationId {
    fn next() -> Self {
        Self(NEXT_ACTIVATION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Load status of the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Loading,
    Ready,
    Failed,
}

/// What `complete_load` did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready { count: usize },
    Failed,
    /// The result belonged to another activation or arrived too late.
    Discarded,
}

/// Full set, query, visible subset and status for one activation.
#[derive(Debug, Clone)]
pub struct DirectoryState {
    activation: ActivationId,
    filter_mode: FilterMode,
    status: Status,
    full: Arc<Vec<Arc<CountryView>>>,
    query: String,
    visible: Vec<Arc<CountryView>>,
    failure: Option<CoreError>,
}

impl DirectoryState {
    /// Start a new activation in `Loading`.
    pub fn activate(filter_mode: FilterMode) -> Self {
        let activation = ActivationId::next();
        debug!(%activation, %filter_mode, "directory activated");
        Self {
            activation,
            filter_mode,
            status: Status::Loading,
            full: Arc::new(Vec::new()),
            query: String::new(),
            visible: Vec::new(),
            failure: None,
        }
    }

    pub fn activation(&self) -> ActivationId {
        self.activation
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every loaded country, in response order.
    pub fn full_set(&self) -> &[Arc<CountryView>] {
        &self.full
    }

    /// The countries matching the current query, in response order.
    pub fn visible_set(&self) -> &[Arc<CountryView>] {
        &self.visible
    }

    /// User-facing message, present only in `Failed`.
    pub fn error_message(&self) -> Option<&'static str> {
        self.failure.as_ref().map(CoreError::user_message)
    }

    /// The underlying failure, for diagnostics.
    pub fn failure(&self) -> Option<&CoreError> {
        self.failure.as_ref()
    }

    /// Apply the fetch result for `activation`.
    pub fn complete_load(
        &mut self,
        activation: ActivationId,
        result: Result<Vec<RawCountry>, CoreError>,
    ) -> LoadOutcome {
        if activation != self.activation || self.status != Status::Loading {
            debug!(
                %activation,
                current = %self.activation,
                status = %self.status,
                "discarding stale directory result"
            );
            return LoadOutcome::Discarded;
        }

        let outcome = match result {
            Ok(records) => {
                let full: Vec<Arc<CountryView>> =
                    normalize(&records).into_iter().map(Arc::new).collect();
                let count = full.len();
                self.full = Arc::new(full);
                self.visible = self.full.to_vec();
                self.query.clear();
                self.status = Status::Ready;
                LoadOutcome::Ready { count }
            }
            Err(e) => {
                self.failure = Some(e);
                self.status = Status::Failed;
                LoadOutcome::Failed
            }
        };

        debug_assert!(self.invariants_hold());
        debug!(activation = %self.activation, status = %self.status, "directory load completed");
        outcome
    }

    /// Replace the query and recompute the visible set.
    ///
    /// Only `Ready` accepts queries; in any other status the call is a
    /// no-op and returns `false`.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.status != Status::Ready {
            return false;
        }
        query.clone_into(&mut self.query);
        self.visible = filter(self.filter_mode, &self.query, self.full.as_slice());
        debug_assert!(self.invariants_hold());
        true
    }

    /// Check the structural invariants of the current status.
    pub fn invariants_hold(&self) -> bool {
        match self.status {
            Status::Loading => {
                self.full.is_empty() && self.visible.is_empty() && self.failure.is_none()
            }
            Status::Failed => {
                self.full.is_empty() && self.visible.is_empty() && self.failure.is_some()
            }
            Status::Ready => {
                self.failure.is_none()
                    && self.visible == filter(self.filter_mode, &self.query, self.full.as_slice())
            }
        }
    }
}
