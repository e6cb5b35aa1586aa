//! CSV source adapter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use idef_model::{CellValue, RowInput, TabularData};

use crate::error::{IngestError, Result};

/// Read a CSV file with a header row into [`TabularData`].
///
/// Header names are trimmed and stripped of a leading BOM; blank headers
/// and their cells are dropped, as are rows whose cells are all blank.
/// Cell text is kept verbatim.
pub fn read_csv_table(path: &Path) -> Result<TabularData> {
    let file = File::open(path).map_err(|source| IngestError::read(path, source))?;
    let table = read_csv_from(file, path)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.len(),
        "loaded CSV"
    );
    Ok(table)
}

/// Parse CSV text; `label` names the source in errors.
pub fn parse_csv_str(text: &str, label: &Path) -> Result<TabularData> {
    read_csv_from(text.as_bytes(), label)
}

fn read_csv_from<R: Read>(source: R, path: &Path) -> Result<TabularData> {
    let csv_error = |source: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<(usize, String)> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .enumerate()
        .map(|(idx, header)| (idx, clean_header(header)))
        .filter(|(_, header)| !header.is_empty())
        .collect();

    if headers.is_empty() {
        return Err(IngestError::EmptyHeader {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let row: RowInput = headers
            .iter()
            .filter_map(|(idx, header)| {
                record
                    .get(*idx)
                    .map(|value| (header.clone(), CellValue::Text(value.to_string())))
            })
            .collect();
        if row.values().all(CellValue::is_blank) {
            skipped += 1;
            continue;
        }
        rows.push(row);
    }
    if skipped > 0 {
        tracing::trace!(skipped, "dropped blank CSV rows");
    }

    let columns = headers.into_iter().map(|(_, header)| header).collect();
    Ok(TabularData::new(columns, rows))
}

fn clean_header(header: &str) -> String {
    header.trim_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TabularData {
        parse_csv_str(text, Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn trims_headers_and_strips_bom() {
        let table = parse("\u{feff} Name ,Email\nAlice, a@x.io \n");
        assert_eq!(table.columns, ["Name", "Email"]);
        assert_eq!(table.rows[0]["Name"], CellValue::from("Alice"));
        assert_eq!(table.rows[0]["Email"], CellValue::from(" a@x.io "));
    }

    #[test]
    fn drops_blank_headers_and_blank_rows() {
        let table = parse("Name,,Tel\nAlice,x,03\n,,\n , ,\nBob,,\n");
        assert_eq!(table.columns, ["Name", "Tel"]);
        assert_eq!(table.len(), 2);
        assert!(!table.rows[0].contains_key(""));
        assert_eq!(table.rows[1]["Name"], CellValue::from("Bob"));
    }

    #[test]
    fn short_rows_omit_missing_cells() {
        let table = parse("Name,Tel\nAlice\n");
        assert_eq!(table.rows[0].len(), 1);
        assert!(!table.rows[0].contains_key("Tel"));
    }

    #[test]
    fn blank_header_row_is_rejected() {
        let err = parse_csv_str(" , \nAlice,03\n", Path::new("blank.csv")).unwrap_err();
        assert!(matches!(err, IngestError::EmptyHeader { .. }));
        assert!(parse_csv_str("", Path::new("empty.csv")).is_err());
    }
}
