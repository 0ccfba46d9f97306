//! Pivots several price series into rows for the chart page.
//!
//! Rows are aligned by position, not by timestamp: row `i` holds point `i` of
//! every series and the row count is the length of the shortest series.
//! Series fetched with the same range share CoinGecko's sampling cadence, so
//! this lines up in practice; series with different cadences will not.

use crate::types::SeriesPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    /// Positional index as a string.
    pub row_key: String,
    /// Timestamp of the first series at this index, for axis labels only.
    pub timestamp: f64,
    /// `(series id, value)` in input order.
    pub values: Vec<(String, f64)>,
}

impl ChartRow {
    pub fn value(&self, series_id: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(id, _)| id == series_id)
            .map(|(_, v)| *v)
    }
}

pub fn reshape(series: &[(&str, &[SeriesPoint])]) -> Vec<ChartRow> {
    let len = series.iter().map(|(_, points)| points.len()).min().unwrap_or(0);

    (0..len)
        .map(|i| ChartRow {
            row_key: i.to_string(),
            timestamp: series[0].1[i].timestamp(),
            values: series
                .iter()
                .map(|(id, points)| (id.to_string(), points[i].value()))
                .collect(),
        })
        .collect()
}

/// Rebases every series to percent change from its first row.
pub fn normalize(rows: &[ChartRow]) -> Vec<ChartRow> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| ChartRow {
            row_key: row.row_key.clone(),
            timestamp: row.timestamp,
            values: row
                .values
                .iter()
                .zip(&first.values)
                .map(|((id, v), (_, base))| {
                    let pct = if *base != 0.0 { (v - base) / base * 100.0 } else { 0.0 };
                    (id.clone(), pct)
                })
                .collect(),
        })
        .collect()
}

/// `(min, max)` over every value of every row, `None` for no values.
pub fn bounds(rows: &[ChartRow]) -> Option<(f64, f64)> {
    rows.iter()
        .flat_map(|row| row.values.iter().map(|(_, v)| *v))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[[f64; 2]]) -> Vec<SeriesPoint> {
        raw.iter().map(|[t, v]| SeriesPoint(*t, *v)).collect()
    }

    #[test]
    fn truncates_to_shortest_series() {
        let a = pts(&[[0.0, 1.0], [1.0, 2.0], [2.0, 3.0]]);
        let b = pts(&[[0.0, 5.0], [1.0, 6.0]]);
        let rows = reshape(&[("A", &a[..]), ("B", &b[..])]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_key, "0");
        assert_eq!(rows[0].value("A"), Some(1.0));
        assert_eq!(rows[0].value("B"), Some(5.0));
        assert_eq!(rows[1].row_key, "1");
        assert_eq!(rows[1].value("A"), Some(2.0));
        assert_eq!(rows[1].value("B"), Some(6.0));
    }

    #[test]
    fn no_series_gives_no_rows() {
        assert!(reshape(&[]).is_empty());
    }

    #[test]
    fn one_empty_series_gives_no_rows() {
        let a = pts(&[[0.0, 1.0]]);
        let empty: Vec<SeriesPoint> = Vec::new();
        assert!(reshape(&[("empty", &empty[..])]).is_empty());
        assert!(reshape(&[("A", &a[..]), ("empty", &empty[..])]).is_empty());
    }

    #[test]
    fn pairs_by_index_not_timestamp() {
        let a = pts(&[[100.0, 1.0], [200.0, 2.0]]);
        let b = pts(&[[150.0, 10.0], [999.0, 20.0]]);
        let rows = reshape(&[("a", &a[..]), ("b", &b[..])]);
        assert_eq!(rows[1].timestamp, 200.0);
        assert_eq!(rows[1].values, vec![("a".to_string(), 2.0), ("b".to_string(), 20.0)]);
    }

    #[test]
    fn normalize_rebases_to_first_row() {
        let a = pts(&[[0.0, 50.0], [1.0, 75.0]]);
        let b = pts(&[[0.0, 0.0], [1.0, 3.0]]);
        let rows = normalize(&reshape(&[("a", &a[..]), ("b", &b[..])]));
        assert_eq!(rows[0].value("a"), Some(0.0));
        assert_eq!(rows[1].value("a"), Some(50.0));
        assert_eq!(rows[1].value("b"), Some(0.0));
    }

    #[test]
    fn bounds_span_all_series() {
        let a = pts(&[[0.0, 3.0], [1.0, -1.0]]);
        let b = pts(&[[0.0, 8.0], [1.0, 2.0]]);
        assert_eq!(bounds(&reshape(&[("a", &a[..]), ("b", &b[..])])), Some((-1.0, 8.0)));
        assert_eq!(bounds(&[]), None);
    }
}
