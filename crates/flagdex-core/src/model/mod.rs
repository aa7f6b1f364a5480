// ── Domain model ──
//
// Canonical types the rest of the workspace renders and filters,
// independent of upstream field names.

pub mod country;

pub use country::CountryView;
