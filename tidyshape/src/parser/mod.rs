//! Delimited text loader with encoding and delimiter auto-detection.
//!
//! Turns a header row plus data rows into a [`WideTable`] of typed
//! cells. Nothing reshaping-specific happens here.

use std::io::Read;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::{CellValue, WideTable};

/// Delimiters tried by [`detect_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Loaded table (no identifiers designated yet)
    pub table: WideTable,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8. A
/// leading byte order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        // windows-1252 is a superset of latin-1 for every printable byte
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => {
                let (text, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    return Err(LoadError::Encoding(format!(
                        "content is not valid {}",
                        enc.name()
                    )));
                }
                text.into_owned()
            }
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load CSV text with an explicit delimiter.
///
/// # Example
/// ```
/// use tidyshape::parser::csv_to_table;
///
/// let table = csv_to_table("day,A,B\n1,10,20", ',').unwrap();
/// assert_eq!(table.columns(), ["day", "A", "B"]);
/// assert_eq!(table.row_count(), 1);
/// ```
pub fn csv_to_table(csv: &str, delimiter: char) -> LoadResult<WideTable> {
    parse_csv(csv.as_bytes(), delimiter)
}

/// Load CSV from a reader.
pub fn parse_csv<R: Read>(reader: R, delimiter: char) -> LoadResult<WideTable> {
    read_table(reader, delimiter).map(|(table, _)| table)
}

/// Load a CSV file with an explicit delimiter (UTF-8 expected).
pub fn parse_csv_file<P: AsRef<Path>>(path: P, delimiter: char) -> LoadResult<WideTable> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_csv(file, delimiter)
}

/// Load a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Load CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    parse_bytes(bytes, None)
}

/// Load CSV bytes, auto-detecting the encoding and, unless given, the
/// delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> LoadResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let (table, headers) = read_table(content.as_bytes(), delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
        headers,
    })
}

fn read_table<R: Read>(reader: R, delimiter: char) -> LoadResult<(WideTable, Vec<String>)> {
    if !delimiter.is_ascii() {
        return Err(LoadError::malformed(
            1,
            format!("delimiter '{}' is not a single-byte character", delimiter),
        ));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_error(e, 1))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(LoadError::EmptyFile);
    }
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        // +1 for 0-index, +1 for header
        let fallback_line = idx + 2;
        let record = record.map_err(|e| csv_error(e, fallback_line))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(LoadError::malformed(
                line,
                format!("{} fields, header has {}", record.len(), headers.len()),
            ));
        }

        let mut row: Vec<CellValue> = record.iter().map(CellValue::infer).collect();
        row.resize(headers.len(), CellValue::Missing);
        rows.push(row);
    }

    let table = WideTable::new(headers.clone(), rows)?;
    Ok((table, headers))
}

fn csv_error(err: csv::Error, fallback_line: usize) -> LoadError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback_line);
    match err.into_kind() {
        csv::ErrorKind::Io(io) => LoadError::Io(io),
        csv::ErrorKind::Utf8 { err, .. } => LoadError::Encoding(err.to_string()),
        other => LoadError::malformed(line, format!("{:?}", other)),
    }
}
