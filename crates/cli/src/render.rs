//! Text and JSON output for annotated series.

use crossover_core::{column_label, legend_label, AnnotatedSeries};

fn cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

/// Joins lines, each terminated by a newline.
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn table_line(cells: [&str; 6]) -> String {
    let [date, close, first, second, buy, sell] = cells;
    format!(
        "{:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>12}",
        date, close, first, second, buy, sell
    )
}

/// Header line naming the visible date range.
pub fn range_label(annotated: &AnnotatedSeries) -> String {
    annotated
        .date_span()
        .map_or_else(|| "(no data in range)".to_string(), |span| span.to_string())
}

/// Aligned table: date, close, both averages in the order supplied, markers.
pub fn render_table(annotated: &AnnotatedSeries, precision: usize) -> String {
    let windows = annotated.windows();
    // `average` only returns None for windows the series was not computed with.
    let first = annotated.average(windows.first()).unwrap_or_default();
    let second = annotated.average(windows.second()).unwrap_or_default();
    let first_label = column_label(windows.first());
    let second_label = column_label(windows.second());

    let mut lines = Vec::with_capacity(annotated.len() + 3);
    lines.push(range_label(annotated));
    lines.push(format!(
        "{}: {}, {}: {}",
        first_label,
        legend_label(windows.first()),
        second_label,
        legend_label(windows.second()),
    ));
    lines.push(table_line([
        "Date",
        "Close",
        &first_label,
        &second_label,
        "Cross Buy",
        "Cross Sell",
    ]));

    for (i, row) in annotated.rows().iter().enumerate() {
        lines.push(table_line([
            &row.date().to_string(),
            &cell(Some(row.record.close), precision),
            &cell(first.get(i).copied().flatten(), precision),
            &cell(second.get(i).copied().flatten(), precision),
            &cell(row.buy_marker, precision),
            &cell(row.sell_marker, precision),
        ]));
    }
    join_lines(lines)
}

/// One line per crossover: date, direction, close.
pub fn render_edges(annotated: &AnnotatedSeries, precision: usize) -> String {
    join_lines(
        annotated
            .edges()
            .iter()
            .map(|edge| format!("{}  {:<4}  {:.*}", edge.date, edge.kind, precision, edge.close))
            .collect(),
    )
}

/// Pretty-printed JSON.
pub fn render_json(annotated: &AnnotatedSeries) -> serde_json::Result<String> {
    serde_json::to_string_pretty(annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use crossover_core::{Record, Series};
    use crossover_signals::compute_signals;

    fn example() -> AnnotatedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = [10.0, 11.0, 9.0, 12.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Record::new(start + Duration::days(i as i64), c, 100.0))
            .collect();
        compute_signals(&Series::from_records(records), 2, 1).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&example(), 3);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "2024-01-01 to 2024-01-05");
        assert_eq!(lines[1], "2d: 2 Day Average, 1d: 1 Day Average");
        // Columns follow argument order: 2d before 1d
        let header: Vec<_> = lines[2].split_whitespace().collect();
        assert_eq!(header[..4], ["Date", "Close", "2d", "1d"]);
        assert_eq!(lines.len(), 3 + 5);

        let first_row: Vec<_> = lines[3].split_whitespace().collect();
        assert_eq!(first_row, ["2024-01-01", "10.000", "-", "10.000", "-", "-"]);
        let third_row: Vec<_> = lines[5].split_whitespace().collect();
        assert_eq!(third_row, ["2024-01-03", "9.000", "10.000", "9.000", "-", "9.000"]);
    }

    #[test]
    fn test_edges_lines() {
        let edges = render_edges(&example(), 2);
        let lines: Vec<_> = edges.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2024-01-03  SELL"));
        assert!(lines[1].starts_with("2024-01-04  BUY"));
        assert!(lines[1].ends_with("12.00"));
    }

    #[test]
    fn test_every_line_terminated() {
        let table = render_table(&example(), 3);
        assert!(table.ends_with('\n'));
        assert_eq!(table.matches('\n').count(), 3 + 5);
        assert_eq!(render_edges(&example(), 2).matches('\n').count(), 3);

        let empty = compute_signals(&Series::default(), 1, 2).unwrap();
        assert_eq!(render_edges(&empty, 2), "");
    }

    #[test]
    fn test_empty_label() {
        let annotated = compute_signals(&Series::default(), 1, 2).unwrap();
        assert_eq!(range_label(&annotated), "(no data in range)");
    }

    #[test]
    fn test_json_has_rows() {
        let json = render_json(&example()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 5);
        assert_eq!(value["rows"][3]["buy_marker"], 12.0);
        assert_eq!(value["windows"]["first"], 2);
    }
}
