//! Formatting of filter results and parsed predicates.

use owo_colors::OwoColorize;
use rowfilter_rs::filter::FilterStats;
use rowfilter_rs::{PredicateSet, Row};
use serde::Serialize;

#[derive(Serialize)]
struct FilterOutput<'a> {
    rows: &'a [&'a Row],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<FilterStats>,
}

/// Formats matching rows as JSON.
///
/// Without stats this is a plain array of field arrays. With stats the
/// rows move under a `rows` key next to a `stats` object.
pub fn format_rows_json(rows: &[&Row], stats: Option<FilterStats>) -> serde_json::Result<String> {
    match stats {
        None => serde_json::to_string_pretty(rows),
        Some(stats) => serde_json::to_string_pretty(&FilterOutput {
            rows,
            stats: Some(stats),
        }),
    }
}

/// Formats the one-line stats summary.
pub fn format_stats(stats: &FilterStats, use_colors: bool) -> String {
    let mut line = format!("{} of {} rows matched", stats.matched, stats.scanned);
    if stats.evaluation_errors > 0 {
        let errors = format!("{} rows could not be evaluated", stats.evaluation_errors);
        if use_colors {
            line = format!("{line}, {}", errors.yellow());
        } else {
            line = format!("{line}, {errors}");
        }
    }
    line
}

/// Formats a parsed predicate set, one canonical entry per line.
pub fn format_predicates_text(set: &PredicateSet) -> String {
    set.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a parsed predicate set as a JSON array of trees.
pub fn format_predicates_json(set: &PredicateSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfilter_rs::filter::FilterParser;
    use serde_json::Value;

    #[test]
    fn test_format_rows_json_plain_array() {
        let rows = [Row::from(vec!["a", "1"]), Row::from(vec!["b", ""])];
        let refs: Vec<&Row> = rows.iter().collect();
        let value: Value = serde_json::from_str(&format_rows_json(&refs, None).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([["a", "1"], ["b", ""]]));
    }

    #[test]
    fn test_format_rows_json_with_stats() {
        let rows = [Row::from(vec!["a"])];
        let refs: Vec<&Row> = rows.iter().collect();
        let stats = FilterStats {
            scanned: 3,
            matched: 1,
            evaluation_errors: 1,
        };
        let value: Value =
            serde_json::from_str(&format_rows_json(&refs, Some(stats)).unwrap()).unwrap();
        assert_eq!(value["rows"], serde_json::json!([["a"]]));
        assert_eq!(value["stats"]["scanned"], 3);
        assert_eq!(value["stats"]["evaluation_errors"], 1);
    }

    #[test]
    fn test_format_stats() {
        let stats = FilterStats {
            scanned: 5,
            matched: 2,
            evaluation_errors: 0,
        };
        assert_eq!(format_stats(&stats, false), "2 of 5 rows matched");

        let stats = FilterStats {
            evaluation_errors: 1,
            ..stats
        };
        assert_eq!(
            format_stats(&stats, false),
            "2 of 5 rows matched, 1 rows could not be evaluated"
        );
    }

    #[test]
    fn test_format_predicates_text() {
        let set = FilterParser::parse("(0 = a) ((1 < 2) OR (2 = b))").unwrap();
        assert_eq!(
            format_predicates_text(&set),
            "(0 = \"a\")\n((1 < \"2\") or (2 = \"b\"))"
        );
    }

    #[test]
    fn test_format_predicates_json() {
        let set = FilterParser::parse("(0 = a)").unwrap();
        let value: Value = serde_json::from_str(&format_predicates_json(&set).unwrap()).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["kind"], "clause");
        assert_eq!(value[0]["column"], 0);
        assert_eq!(value[0]["literal"], "a");
    }
}
