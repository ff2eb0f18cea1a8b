//! Filter and sort engine.
//!
//! Narrows the enriched list by store, search text, type, and pairing (in
//! that order, all combined with AND), then applies a stable sort. Input
//! records are never modified; the result is a fresh vector.

use std::cmp::Ordering;

use common::EnrichedWine;

/// Filter value meaning "no restriction".
pub const ALL: &str = "all";

/// Supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Vivino score, highest first.
    Score,
    /// Price, cheapest first.
    PriceLow,
    /// Price, most expensive first.
    PriceHigh,
    /// Personal rating, highest first.
    PersonalScore,
}

impl SortKey {
    /// Parse a sort key; unknown keys yield `None`, which sorts nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "score" => Some(SortKey::Score),
            "price-low" => Some(SortKey::PriceLow),
            "price-high" => Some(SortKey::PriceHigh),
            "personal-score" => Some(SortKey::PersonalScore),
            _ => None,
        }
    }
}

/// Everything the user has selected for the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Free-text search; empty means no search.
    pub search: String,
    /// Wine type, or `"all"`.
    pub wine_type: String,
    /// Pairing tag, or `None` for no pairing filter.
    pub pairing: Option<String>,
    /// Store name, or `"all"`.
    pub store: String,
    /// `None` keeps payload order.
    pub sort: Option<SortKey>,
    /// 1-based page number.
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            wine_type: ALL.into(),
            pairing: None,
            store: ALL.into(),
            sort: Some(SortKey::Score),
            page: 1,
        }
    }
}

/// Apply the view's filters and sort order to `wines`.
pub fn process(wines: &[EnrichedWine], view: &ViewState) -> Vec<EnrichedWine> {
    let search = view.search.to_lowercase();

    let mut out: Vec<EnrichedWine> = wines
        .iter()
        .filter(|w| {
            view.store == ALL || w.record.store.to_lowercase() == view.store.to_lowercase()
        })
        .filter(|w| search.is_empty() || matches_search(w, &search))
        .filter(|w| {
            view.wine_type == ALL
                || w.record.wine_type.to_lowercase() == view.wine_type.to_lowercase()
        })
        .filter(|w| view.pairing.as_deref().map_or(true, |tag| w.has_pairing(tag)))
        .cloned()
        .collect();

    if let Some(key) = view.sort {
        sort_wines(&mut out, key);
    }
    out
}

fn matches_search(wine: &EnrichedWine, needle: &str) -> bool {
    let r = &wine.record;
    r.name.to_lowercase().contains(needle)
        || r.wine_type.to_lowercase().contains(needle)
        || r.store.to_lowercase().contains(needle)
}

fn sort_wines(wines: &mut [EnrichedWine], key: SortKey) {
    match key {
        SortKey::Score => wines.sort_by(|a, b| desc(vivino_score(a), vivino_score(b))),
        SortKey::PriceLow => wines.sort_by(|a, b| asc(price(a), price(b))),
        SortKey::PriceHigh => wines.sort_by(|a, b| desc(price(a), price(b))),
        SortKey::PersonalScore => wines.sort_by(|a, b| b.personal_score.cmp(&a.personal_score)),
    }
}

fn asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn desc(a: f64, b: f64) -> Ordering {
    asc(b, a)
}

fn price(wine: &EnrichedWine) -> f64 {
    parse_leading_float(&wine.record.price)
}

fn vivino_score(wine: &EnrichedWine) -> f64 {
    wine.record
        .vivino_score
        .as_deref()
        .map_or(0.0, parse_leading_float)
}

/// Parse the longest numeric prefix of `raw`, treating anything
/// unparsable as 0.
///
/// Leading whitespace is skipped, so `" 7.5 EUR"` is 7.5, `".5"` is 0.5,
/// and `"N/A"` or `""` is 0.
pub fn parse_leading_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::WineRecord;

    fn wine(name: &str, wine_type: &str, store: &str, pairings: &[&str]) -> EnrichedWine {
        EnrichedWine {
            record: WineRecord {
                name: name.into(),
                wine_type: wine_type.into(),
                store: store.into(),
                pairings: Some(pairings.iter().map(|p| p.to_string()).collect()),
                ..Default::default()
            },
            personal_score: 0,
        }
    }

    fn priced(name: &str, price: &str) -> EnrichedWine {
        let mut w = wine(name, "Red", "Carrefour", &[]);
        w.record.price = price.into();
        w
    }

    fn scored(name: &str, vivino: Option<&str>) -> EnrichedWine {
        let mut w = wine(name, "Red", "Carrefour", &[]);
        w.record.vivino_score = vivino.map(String::from);
        w
    }

    fn names(wines: &[EnrichedWine]) -> Vec<&str> {
        wines.iter().map(|w| w.name()).collect()
    }

    fn unsorted() -> ViewState {
        ViewState {
            sort: None,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_type_and_pairing_filters_compose() {
        let wines = vec![
            wine("A", "Red", "X", &["Fish"]),
            wine("B", "White", "Y", &[]),
        ];
        let view = ViewState {
            wine_type: "Red".into(),
            pairing: Some("Fish".into()),
            ..unsorted()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["A"]);
    }

    #[test]
    fn test_store_filter_is_case_insensitive() {
        let wines = vec![
            wine("A", "Red", "Albert Heijn", &[]),
            wine("B", "Red", "Carrefour", &[]),
            wine("C", "Red", "", &[]),
        ];
        let view = ViewState {
            store: "albert heijn".into(),
            ..unsorted()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["A"]);
        assert_eq!(process(&wines, &unsorted()).len(), 3);
    }

    #[test]
    fn test_search_matches_name_type_or_store() {
        let wines = vec![
            wine("Rioja Reserva", "Red", "Carrefour", &[]),
            wine("Sancerre", "White", "Albert Heijn", &[]),
            wine("Cava Brut", "Sparkling", "Carrefour", &[]),
        ];

        let by_name = ViewState {
            search: "RIOJA".into(),
            ..unsorted()
        };
        assert_eq!(names(&process(&wines, &by_name)), vec!["Rioja Reserva"]);

        let by_type = ViewState {
            search: "whit".into(),
            ..unsorted()
        };
        assert_eq!(names(&process(&wines, &by_type)), vec!["Sancerre"]);

        let by_store = ViewState {
            search: "carre".into(),
            ..unsorted()
        };
        assert_eq!(
            names(&process(&wines, &by_store)),
            vec!["Rioja Reserva", "Cava Brut"]
        );
    }

    #[test]
    fn test_type_filter_is_case_insensitive_equality() {
        let wines = vec![
            wine("A", "Rosé", "X", &[]),
            wine("B", "red", "X", &[]),
            wine("C", "Red Blend", "X", &[]),
        ];
        let view = ViewState {
            wine_type: "RED".into(),
            ..unsorted()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["B"]);
    }

    #[test]
    fn test_pairing_filter_is_exact_and_skips_missing() {
        let mut no_pairings = wine("C", "Red", "X", &[]);
        no_pairings.record.pairings = None;
        let wines = vec![
            wine("A", "Red", "X", &["Fish", "Seafood"]),
            wine("B", "Red", "X", &["fish"]),
            no_pairings,
        ];
        let view = ViewState {
            pairing: Some("Fish".into()),
            ..unsorted()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["A"]);
    }

    #[test]
    fn test_price_low_treats_non_numeric_as_zero() {
        let wines = vec![priced("ten", "10"), priced("abc", "abc"), priced("five", "5")];
        let view = ViewState {
            sort: Some(SortKey::PriceLow),
            ..ViewState::default()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["abc", "five", "ten"]);
    }

    #[test]
    fn test_price_high_descending() {
        let wines = vec![priced("a", "4.99"), priced("b", "12.50"), priced("c", "")];
        let view = ViewState {
            sort: Some(SortKey::PriceHigh),
            ..ViewState::default()
        };

        assert_eq!(names(&process(&wines, &view)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_score_sort_missing_is_zero_and_stable() {
        let wines = vec![
            scored("none", None),
            scored("na", Some("N/A")),
            scored("high", Some("4.2")),
            scored("zero", Some("0")),
            scored("mid", Some("3.9")),
        ];

        let out = process(&wines, &ViewState::default());
        assert_eq!(names(&out), vec!["high", "mid", "none", "na", "zero"]);
    }

    #[test]
    fn test_personal_score_sort_descending() {
        let mut a = wine("A", "Red", "X", &[]);
        a.personal_score = 2;
        let b = wine("B", "Red", "X", &[]);
        let mut c = wine("C", "Red", "X", &[]);
        c.personal_score = 5;
        let view = ViewState {
            sort: Some(SortKey::PersonalScore),
            ..ViewState::default()
        };

        assert_eq!(names(&process(&[a, b, c], &view)), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_unknown_sort_key_keeps_input_order() {
        let wines = vec![priced("b", "3"), priced("a", "1"), priced("c", "2")];
        let view = ViewState {
            sort: SortKey::parse("alphabetical"),
            ..ViewState::default()
        };

        assert_eq!(view.sort, None);
        assert_eq!(names(&process(&wines, &view)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_process_is_idempotent_and_pure() {
        let wines = vec![
            wine("A", "Red", "X", &["Fish"]),
            wine("B", "Red", "Y", &["Fish"]),
            wine("C", "White", "X", &[]),
        ];
        let snapshot = wines.clone();
        let view = ViewState {
            search: "x".into(),
            sort: Some(SortKey::PriceLow),
            ..ViewState::default()
        };

        let first = process(&wines, &view);
        let second = process(&wines, &view);

        assert_eq!(first, second);
        assert_eq!(wines, snapshot);
    }

    #[test]
    fn test_sort_key_names() {
        assert_eq!(SortKey::parse("score"), Some(SortKey::Score));
        assert_eq!(SortKey::parse("price-low"), Some(SortKey::PriceLow));
        assert_eq!(SortKey::parse("price-high"), Some(SortKey::PriceHigh));
        assert_eq!(SortKey::parse("personal-score"), Some(SortKey::PersonalScore));
        assert_eq!(SortKey::parse("Score"), None);
        assert_eq!(SortKey::parse("newest"), None);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("10"), 10.0);
        assert_eq!(parse_leading_float("  7.5 EUR"), 7.5);
        assert_eq!(parse_leading_float(".5"), 0.5);
        assert_eq!(parse_leading_float("12.5abc"), 12.5);
        assert_eq!(parse_leading_float("-3"), -3.0);
        assert_eq!(parse_leading_float("1e2x"), 100.0);
        assert_eq!(parse_leading_float("3.8e"), 3.8);
        assert_eq!(parse_leading_float("abc"), 0.0);
        assert_eq!(parse_leading_float("N/A"), 0.0);
        assert_eq!(parse_leading_float(""), 0.0);
        assert_eq!(parse_leading_float("."), 0.0);
        assert_eq!(parse_leading_float("€5"), 0.0);
    }
}
