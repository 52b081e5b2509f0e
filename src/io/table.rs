use std::path::Path;

use anyhow::{Context, Result};

use crate::error::SchemaError;

pub const MISSING_TOKEN: &str = "n/a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: char,
    pub strip_quotes: bool,
}

impl TableOptions {
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            strip_quotes: false,
        }
    }

    pub fn csv() -> Self {
        Self {
            delimiter: ',',
            strip_quotes: true,
        }
    }

    pub fn for_path(path: &Path) -> Self {
        if path.extension().and_then(|s| s.to_str()) == Some("csv") {
            Self::csv()
        } else {
            Self::tsv()
        }
    }
}

/// Header plus untyped cells of a delimited text table.
///
/// Cells stay as text until a caller selects the columns it needs, so wide
/// confound files with non-numeric extra columns parse without complaint.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: String,
    pub header: Vec<String>,
    rows: Vec<Vec<String>>,
    line_numbers: Vec<usize>,
}

pub fn read_delimited(path: &Path, opts: TableOptions) -> Result<RawTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_delimited(&content, &path.display().to_string(), opts)
}

pub fn parse_delimited(content: &str, source: &str, opts: TableOptions) -> Result<RawTable> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or_else(|| SchemaError::EmptyTable {
        path: source.to_string(),
    })?;
    let header = split_fields(header_line, opts);

    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();
    for (line_no, line) in lines {
        let fields = split_fields(line, opts);
        if fields.len() != header.len() {
            return Err(SchemaError::RaggedRow {
                path: source.to_string(),
                line: line_no,
                expected: header.len(),
                got: fields.len(),
            }
            .into());
        }
        rows.push(fields);
        line_numbers.push(line_no);
    }

    Ok(RawTable {
        source: source.to_string(),
        header,
        rows,
        line_numbers,
    })
}

fn split_fields(line: &str, opts: TableOptions) -> Vec<String> {
    line.split(opts.delimiter)
        .map(|field| {
            let field = field.trim();
            if opts.strip_quotes {
                unquote(field).to_string()
            } else {
                field.to_string()
            }
        })
        .collect()
}

pub fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

impl RawTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Fails with [`SchemaError::MissingColumns`] listing every absent name.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                path: self.source.clone(),
                missing,
            }
            .into());
        }
        Ok(indices)
    }

    /// Column-major numeric selection; `n/a`, empty and NaN cells become 0.0.
    pub fn select_numeric(&self, names: &[&str]) -> Result<Vec<Vec<f64>>> {
        let indices = self.require_columns(names)?;
        let mut columns = vec![Vec::with_capacity(self.rows.len()); names.len()];
        for (row, &line_no) in self.rows.iter().zip(&self.line_numbers) {
            for (out_col, &src_col) in indices.iter().enumerate() {
                let value = parse_cell(&row[src_col]).ok_or_else(|| SchemaError::InvalidValue {
                    path: self.source.clone(),
                    line: line_no,
                    column: names[out_col].to_string(),
                    value: row[src_col].clone(),
                })?;
                columns[out_col].push(value);
            }
        }
        Ok(columns)
    }

    pub fn column_text(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.require_columns(&[name])?[0];
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell == MISSING_TOKEN {
        return Some(0.0);
    }
    let value: f64 = cell.parse().ok()?;
    if value.is_nan() { Some(0.0) } else { Some(value) }
}
