use std::collections::HashSet;

use crate::error::LoadError;

use super::model::{Table, is_na};

/// Prefix given to header cells that were left blank.
const UNNAMED_PREFIX: &str = "Unnamed:";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded dataset. Dispatch by filename, falling back by content.
///
/// Attempts, first success wins:
/// * name ends in `.csv` – comma-separated with a header row; errors are final
/// * anything else      – comma-separated with a header row, then
///                        whitespace-delimited without a header
///
/// When no header was read, or a header cell was blank, every column is
/// renamed `col_0 … col_{n-1}`.
pub fn load_table(bytes: &[u8], filename: &str) -> Result<Table, LoadError> {
    let is_csv = filename.to_ascii_lowercase().ends_with(".csv");

    let parsed = if is_csv {
        log::debug!("{filename}: parsing as CSV");
        parse_comma(bytes)?
    } else {
        match parse_comma(bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("{filename}: not comma-separated ({e}), trying whitespace-delimited");
                parse_whitespace(bytes)?
            }
        }
    };

    let headerless = parsed.names.is_none();
    let n_columns = parsed.width();
    let names = parsed
        .names
        .unwrap_or_else(|| (0..n_columns).map(|i| i.to_string()).collect());
    let mut table = Table::from_rows(names, parsed.rows);

    if headerless || table.columns().iter().any(|c| c.name.starts_with(UNNAMED_PREFIX)) {
        table.rename_columns(synthetic_names(table.n_columns()));
    }
    Ok(table)
}

/// `col_0, col_1, …` for `n` columns.
pub fn synthetic_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("col_{i}")).collect()
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Rows read by one parser, before typing.
struct Parsed {
    /// Header names, or `None` when the format has no header row.
    names: Option<Vec<String>>,
    rows: Vec<Vec<Option<String>>>,
}

impl Parsed {
    fn width(&self) -> usize {
        match &self.names {
            Some(names) => names.len(),
            None => self.rows.first().map_or(0, Vec::len),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<&str, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|_| LoadError::Encoding)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn to_cell(field: &str) -> Option<String> {
    if is_na(field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Comma-separated with the first record as header.
fn parse_comma(bytes: &[u8]) -> Result<Parsed, LoadError> {
    let text = decode(bytes)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => {
            return Ok(Parsed {
                names: Some(Vec::new()),
                rows: Vec::new(),
            });
        }
    };
    let names = header_names(header.iter());

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if record.len() > names.len() {
            return Err(LoadError::RaggedRow {
                line: record.position().map_or(0, |p| p.line() as usize),
                expected: names.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(to_cell).collect());
    }

    Ok(Parsed {
        names: Some(names),
        rows,
    })
}

/// Whitespace-delimited without a header; the first row fixes the width.
fn parse_whitespace(bytes: &[u8]) -> Result<Parsed, LoadError> {
    let text = decode(bytes)?;
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut width = 0;

    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if rows.is_empty() {
            width = fields.len();
        } else if fields.len() > width {
            return Err(LoadError::RaggedRow {
                line: line_no + 1,
                expected: width,
                found: fields.len(),
            });
        }
        rows.push(fields.into_iter().map(to_cell).collect());
    }

    Ok(Parsed { names: None, rows })
}

/// Name blank header cells `Unnamed: i` and de-duplicate repeats as
/// `name.1`, `name.2`, …
fn header_names<'a>(cells: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (i, cell) in cells.enumerate() {
        let base = if cell.is_empty() {
            format!("{UNNAMED_PREFIX} {i}")
        } else {
            cell.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}
