// Country directory response types
//
// The endpoint returns a bare JSON array. Its element schema is controlled
// upstream and has shipped with at least two field-naming variants, so
// records are kept as raw JSON and interpreted by `flagdex-core`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unvalidated element of the directory response.
///
/// Any JSON value is accepted here. Non-object elements still count as
/// records so that the normalized list has the same length as the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCountry(pub Value);

impl RawCountry {
    /// Walk a path of object keys and return the string found at its end.
    ///
    /// `str_at(&["name", "common"])` reads `{"name": {"common": "France"}}`.
    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        let mut current = &self.0;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        current.as_str()
    }
}

impl From<Value> for RawCountry {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
