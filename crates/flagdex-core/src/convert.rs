// ── Raw record normalization ──
//
// Bridges `flagdex_api::RawCountry` into `CountryView`. Upstream has used
// `common`/`png`, already-renamed `name`/`flag`, and the nested
// `name.common`/`flags.png` shape; every variant lands in the same model.
// Normalization is total: a record with missing fields still produces a
// view, with empty strings in place of the missing values.

use flagdex_api::RawCountry;

use crate::model::CountryView;

/// Field paths tried, in order, for the display name.
const NAME_PATHS: &[&[&str]] = &[&["common"], &["name"], &["name", "common"]];

/// Field paths tried, in order, for the flag image URL.
const FLAG_PATHS: &[&[&str]] = &[&["png"], &["flag"], &["flags", "png"]];

fn first_str<'a>(raw: &'a RawCountry, paths: &[&[&str]]) -> Option<&'a str> {
    paths.iter().find_map(|path| raw.str_at(path))
}

impl From<&RawCountry> for CountryView {
    fn from(raw: &RawCountry) -> Self {
        Self {
            display_name: first_str(raw, NAME_PATHS).unwrap_or_default().to_owned(),
            flag_url: first_str(raw, FLAG_PATHS).unwrap_or_default().to_owned(),
        }
    }
}

/// Map every raw record to a `CountryView`, preserving order and length.
pub fn normalize(raw: &[RawCountry]) -> Vec<CountryView> {
    raw.iter().map(CountryView::from).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn raw(value: serde_json::Value) -> RawCountry {
        RawCountry(value)
    }

    #[test]
    fn common_png_variant() {
        let view = CountryView::from(&raw(json!({ "common": "France", "png": "fr.png" })));
        assert_eq!(view, CountryView::new("France", "fr.png"));
    }

    #[test]
    fn name_flag_variant() {
        let view = CountryView::from(&raw(json!({ "name": "Germany", "flag": "de.png" })));
        assert_eq!(view, CountryView::new("Germany", "de.png"));
    }

    #[test]
    fn nested_variant() {
        let view = CountryView::from(&raw(json!({
            "name": { "common": "Japan", "official": "Japan" },
            "flags": { "png": "jp.png", "svg": "jp.svg" }
        })));
        assert_eq!(view, CountryView::new("Japan", "jp.png"));
    }

    #[test]
    fn missing_and_mistyped_fields_become_empty() {
        let records = vec![
            raw(json!({ "common": "Chad" })),
            raw(json!({ "png": "xx.png" })),
            raw(json!({ "common": 7, "png": null })),
            raw(json!(null)),
            raw(json!("Peru")),
        ];

        let views = normalize(&records);

        assert_eq!(
            views,
            vec![
                CountryView::new("Chad", ""),
                CountryView::new("", "xx.png"),
                CountryView::new("", ""),
                CountryView::new("", ""),
                CountryView::new("", ""),
            ]
        );
    }

    #[test]
    fn normalize_is_total_and_order_preserving() {
        let records: Vec<RawCountry> = (0..50)
            .map(|i| {
                if i % 3 == 0 {
                    raw(json!({ "bogus": i }))
                } else {
                    raw(json!({ "common": format!("Country {i}"), "png": format!("{i}.png") }))
                }
            })
            .collect();

        let views = normalize(&records);

        assert_eq!(views.len(), records.len());
        for (i, view) in views.iter().enumerate() {
            if i % 3 == 0 {
                assert!(view.display_name.is_empty());
            } else {
                assert_eq!(view.display_name, format!("Country {i}"));
            }
        }
        assert!(normalize(&[]).is_empty());
    }
}
