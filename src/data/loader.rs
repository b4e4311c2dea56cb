use std::collections::HashMap;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::model::{Column, ColumnData, Table};
use crate::error::{DashboardError, DashboardResult};

/// Cell contents treated as missing values.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Upload – raw bytes of a user-supplied file
// ---------------------------------------------------------------------------

/// An uploaded file, identified by the SHA-256 of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub digest: String,
}

impl Upload {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let digest = format!("{:x}", Sha256::digest(&bytes));
        Self {
            name: name.into(),
            bytes,
            digest,
        }
    }

    pub fn from_path(path: &Path) -> DashboardResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| DashboardError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse CSV bytes into a typed [`Table`].
///
/// The first row holds column names; duplicate names get a `.N` suffix.
/// Each column is numeric when every present cell is a number, text
/// otherwise. Timestamps are only produced later, by normalization.
pub fn parse_csv(bytes: &[u8]) -> DashboardResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = dedupe_headers(reader.headers()?.iter());
    if headers.is_empty() {
        return Err(DashboardError::EmptyInput);
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col).unwrap_or("").to_string());
        }
    }

    let n_rows = raw.first().map_or(0, Vec::len);
    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column::new(name, infer_column(&cells)))
        .collect();

    Ok(Table::new(columns, n_rows))
}

fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.trim().to_string();
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            out.push(name);
        } else {
            out.push(format!("{name}.{count}"));
        }
        *count += 1;
    }
    out
}

pub(crate) fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.contains(&s.trim())
}

/// Decide a column's type from its raw cells.
fn infer_column(cells: &[String]) -> ColumnData {
    let mut numbers = Vec::with_capacity(cells.len());
    for cell in cells {
        if is_null_token(cell) {
            numbers.push(None);
            continue;
        }
        match cell.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => numbers.push(Some(v)),
            // Any spelling of inf or nan, signed or not.
            Ok(_) => numbers.push(None),
            _ => {
                return ColumnData::Text(
                    cells
                        .iter()
                        .map(|c| (!is_null_token(c)).then(|| c.clone()))
                        .collect(),
                );
            }
        }
    }
    ColumnData::Numeric(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn infers_numeric_and_text_columns() {
        let csv = b"day,count,ratio,label,flag\n\
                    2024-01-01,3,0.5,a,true\n\
                    2024-01-02,,1.5,b,false\n";
        let table = parse_csv(csv).unwrap();

        assert_eq!(table.n_rows(), 2);
        let kinds: Vec<ColumnKind> = table.columns().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Text,
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Text,
                ColumnKind::Text,
            ]
        );
        assert_eq!(table.numeric("count").unwrap(), &[Some(3.0), None]);
    }

    #[test]
    fn null_tokens_do_not_break_numeric_inference() {
        let csv = b"x\n1\nNA\nnan\n  \n2.5\n";
        let table = parse_csv(csv).unwrap();
        assert_eq!(
            table.numeric("x").unwrap(),
            &[Some(1.0), None, None, None, Some(2.5)]
        );
    }

    #[test]
    fn infinite_values_count_as_missing() {
        let table = parse_csv(b"x\ninf\n-inf\n4\n").unwrap();
        assert_eq!(table.numeric("x").unwrap(), &[None, None, Some(4.0)]);
    }

    #[test]
    fn nan_spellings_count_as_missing() {
        let table = parse_csv(b"x,y\n1,1\n-nan,2\nNAN,3\n-NaN,4\n+nan,5\n").unwrap();
        assert_eq!(table.numeric_columns(), vec!["x", "y"]);
        assert_eq!(
            table.numeric("x").unwrap(),
            &[Some(1.0), None, None, None, None]
        );
    }

    #[test]
    fn all_missing_column_is_numeric() {
        let table = parse_csv(b"a,b\n1,\n2,\n").unwrap();
        assert_eq!(table.numeric("b").unwrap(), &[None, None]);
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let table = parse_csv(b"a,a,a\n1,2,3\n").unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a.1", "a.2"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_csv(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, DashboardError::Csv(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_csv(b"").unwrap_err(), DashboardError::EmptyInput));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = parse_csv(b"a,b\n").unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.numeric_columns(), vec!["a", "b"]);
    }

    #[test]
    fn upload_digest_is_content_addressed() {
        let a = Upload::from_bytes("a.csv", b"hello world".to_vec());
        let b = Upload::from_bytes("b.csv", b"hello world".to_vec());
        assert_eq!(a.digest, b.digest);
        assert_eq!(
            a.digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn upload_from_path_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a\n1\n").unwrap();

        let upload = Upload::from_path(file.path()).unwrap();
        assert_eq!(upload.bytes, b"a\n1\n");
        assert!(!upload.name.is_empty());
    }

    #[test]
    fn upload_from_missing_path_fails() {
        let err = Upload::from_path(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Read { .. }));
    }
}
