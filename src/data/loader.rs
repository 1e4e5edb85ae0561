use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Column, Table};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a piece of text is not a valid column file.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no header line found")]
    MissingHeader,

    #[error("file contains no data")]
    NoData,

    #[error("line {line}: expected {expected} values but found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{token}' is not a number")]
    NonNumeric {
        line: usize,
        column: String,
        token: String,
    },

    #[error("column '{column}' has {found} values, expected {expected}")]
    UnevenColumns {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Failure to turn a file on disk into a [`Table`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for the whitespace-delimited reader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Everything after this character on a line is ignored.
    pub comment: Option<char>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { comment: Some('#') }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Outcome of loading several files at once: good tables and per-file errors.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<Table>,
    pub failures: Vec<LoadError>,
}

/// Load every path independently; a bad file never hides the good ones.
pub fn load_files<P: AsRef<Path>>(paths: &[P], options: &LoaderOptions) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        match load_file(path.as_ref(), options) {
            Ok(table) => report.tables.push(table),
            Err(e) => report.failures.push(e),
        }
    }
    report
}

/// Read and parse a single whitespace-delimited file.
pub fn load_file(path: &Path, options: &LoaderOptions) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    let table = parse_table_with(name, &text, options).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "Parsed {} ({} columns x {} rows)",
        path.display(),
        table.n_columns(),
        table.n_rows()
    );

    Ok(table.with_path(path.to_path_buf()))
}

/// Parse column-file text with the default options.
pub fn parse_table(name: &str, text: &str) -> Result<Table, ParseError> {
    parse_table_with(name, text, &LoaderOptions::default())
}

/// Parse column-file text: one header line of names, then numeric rows.
///
/// The table is only built once every row has been validated, so a failure
/// never leaves a partially filled table behind.
pub fn parse_table_with(
    name: &str,
    text: &str,
    options: &LoaderOptions,
) -> Result<Table, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_comment(line, options.comment)))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ParseError::MissingHeader)?;
    let header = dedup_names(header_line.split_whitespace());

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); header.len()];

    for (line_no, line) in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != header.len() {
            return Err(ParseError::RaggedRow {
                line: line_no,
                expected: header.len(),
                found: tokens.len(),
            });
        }
        for (col, token) in tokens.iter().enumerate() {
            let v = token.parse::<f64>().map_err(|_| ParseError::NonNumeric {
                line: line_no,
                column: header[col].clone(),
                token: token.to_string(),
            })?;
            values[col].push(v);
        }
    }

    if values.first().map_or(true, Vec::is_empty) {
        return Err(ParseError::NoData);
    }

    let columns = header
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Table::new(name, columns)
}

// -- helpers --

fn strip_comment(line: &str, comment: Option<char>) -> &str {
    match comment.and_then(|c| line.find(c)) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Repeated names become `name.1`, `name.2`, ... in order of appearance.
fn dedup_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            let next = format!("{candidate}.{count}");
            candidate = next;
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}
