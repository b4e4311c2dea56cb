use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::loader::is_null_token;
use super::model::{ColumnData, Table};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// What normalization did to the date column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Whether the date column was present (and so rows were re-ordered).
    pub date_column_found: bool,
    /// Present values that could not be read as dates and became null.
    pub unparseable_dates: usize,
}

/// Parse one date-like string. `None` when no known format matches.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce `date_column` to timestamps and sort rows ascending by it.
///
/// Unparseable values become null and sort last; ties keep their original
/// order. Numeric values are read as nanoseconds since the Unix epoch.
/// Tables without the column come back unchanged.
pub fn normalize(table: &Table, date_column: &str) -> (Table, NormalizeReport) {
    let Some(column) = table.column(date_column) else {
        return (table.clone(), NormalizeReport::default());
    };

    let mut unparseable = 0;
    let stamps: Vec<Option<NaiveDateTime>> = match &column.data {
        ColumnData::Timestamp(v) => v.clone(),
        ColumnData::Numeric(v) => v
            .iter()
            .map(|cell| {
                let nanos = (*cell)?;
                let ts = epoch_nanos(nanos);
                if ts.is_none() {
                    unparseable += 1;
                }
                ts
            })
            .collect(),
        ColumnData::Text(v) => v
            .iter()
            .map(|cell| {
                let s = cell.as_deref()?;
                if is_null_token(s) {
                    return None;
                }
                let ts = parse_timestamp(s);
                if ts.is_none() {
                    unparseable += 1;
                }
                ts
            })
            .collect(),
    };

    if unparseable > 0 {
        log::warn!("{unparseable} value(s) in '{date_column}' could not be parsed as dates");
    }

    let mut order: Vec<usize> = (0..stamps.len()).collect();
    // Stable: equal keys keep file order. `None` sorts after every date.
    order.sort_by_key(|&i| (stamps[i].is_none(), stamps[i]));

    let mut coerced = table.clone();
    coerced.replace_column(date_column, ColumnData::Timestamp(stamps));
    let sorted = coerced.take_rows(&order);

    (
        sorted,
        NormalizeReport {
            date_column_found: true,
            unparseable_dates: unparseable,
        },
    )
}

fn epoch_nanos(value: f64) -> Option<NaiveDateTime> {
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(value as i64).naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::{CellValue, ColumnKind};
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_common_date_formats() {
        assert_eq!(parse_timestamp("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_timestamp("2024/03/05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_timestamp("03/05/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_timestamp("05.03.2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(
            parse_timestamp("2024-03-05T10:30:00Z"),
            ymd(2024, 3, 5).date().and_hms_opt(10, 30, 0)
        );
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-13-40"), None);
    }

    #[test]
    fn sorts_by_day_with_invalid_dates_last() {
        let csv = b"day,v\n2024-01-03,3\nbogus,9\n2024-01-01,1\n,8\n2024-01-02,2\n";
        let table = parse_csv(csv).unwrap();
        let (sorted, report) = normalize(&table, "day");

        assert!(report.date_column_found);
        assert_eq!(report.unparseable_dates, 1);
        assert_eq!(sorted.column("day").unwrap().kind(), ColumnKind::Timestamp);
        assert_eq!(
            sorted.numeric("v").unwrap(),
            &[Some(1.0), Some(2.0), Some(3.0), Some(9.0), Some(8.0)]
        );
        assert_eq!(sorted.column("day").unwrap().data.cell(3), CellValue::Null);
    }

    #[test]
    fn numeric_day_leaves_numeric_set() {
        let table = parse_csv(b"day,v\n2,1\n1,2\n").unwrap();
        let (sorted, report) = normalize(&table, "day");
        assert_eq!(report.unparseable_dates, 0);
        assert_eq!(sorted.numeric_columns(), vec!["v"]);
        assert_eq!(sorted.numeric("v").unwrap(), &[Some(2.0), Some(1.0)]);
    }

    #[test]
    fn table_without_day_is_untouched() {
        let table = parse_csv(b"b,a\n2,1\n1,2\n").unwrap();
        let (same, report) = normalize(&table, "day");
        assert_eq!(same, table);
        assert_eq!(report, NormalizeReport::default());
    }

    #[test]
    fn only_exact_name_is_coerced() {
        let table = parse_csv(b"Day,v\n2024-01-02,1\n2024-01-01,2\n").unwrap();
        let (same, report) = normalize(&table, "day");
        assert!(!report.date_column_found);
        assert_eq!(same.column("Day").unwrap().kind(), ColumnKind::Text);
    }

    #[test]
    fn epoch_nanos_rejects_values_outside_i64() {
        // i64::MAX rounds up to 2^63 as f64, which does not fit.
        assert_eq!(epoch_nanos(9_223_372_036_854_775_808.0), None);
        assert_eq!(epoch_nanos(1.5), None);
        assert_eq!(
            epoch_nanos(i64::MIN as f64),
            Some(DateTime::from_timestamp_nanos(i64::MIN).naive_utc())
        );
        assert_eq!(epoch_nanos(86_400e9), Some(ymd(1970, 1, 2)));
    }

    proptest! {
        #[test]
        fn valid_days_sort_non_decreasing(
            days in proptest::collection::vec((2000i32..2030, 1u32..=12, 1u32..=28), 1..60)
        ) {
            let mut csv = String::from("day,v\n");
            for (i, (y, m, d)) in days.iter().enumerate() {
                csv.push_str(&format!("{y:04}-{m:02}-{d:02},{i}\n"));
            }
            let table = parse_csv(csv.as_bytes()).unwrap();
            let (sorted, report) = normalize(&table, "day");

            prop_assert_eq!(report.unparseable_dates, 0);
            let ColumnData::Timestamp(stamps) = &sorted.column("day").unwrap().data else {
                panic!("day was not coerced");
            };
            prop_assert!(stamps.iter().all(Option::is_some));
            prop_assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
