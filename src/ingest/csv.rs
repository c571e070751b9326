//! # **CSV Module** - *Delimited-Text Ingestion Front End*
//!
//! A small tokenizer honouring the usual CSV contract - configurable
//! delimiter and quote characters, doubled quotes inside a quoted field
//! as literal quotes, newlines inside quoted fields - plus the row
//! transformer that turns records into [`Row`]s: the first record names
//! the columns, every later record maps column name to cell text.
//!
//! `read_csv` chains the whole pipeline: tokenize, transform, ingest.

use crate::enums::error::MinfacetError;
use crate::enums::value::{Value, ValueType};
use crate::ingest::build::{IngestParams, build_from_rows};
use crate::ingest::rows::Row;
use crate::structs::field::FieldDescriptor;
use crate::structs::store::ColumnStore;
use crate::traits::reducer::Reducer;

/// Tokenizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvParams {
    /// Field separator. Default `,`.
    pub delimiter: char,
    /// Field wrapper. Default `"`.
    pub quote: char,
}

impl Default for CsvParams {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

/// # CsvReader
///
/// Tokenizes delimited text into records.
///
/// ## Example
/// ```rust
/// use minfacet::CsvReader;
///
/// let records = CsvReader::new()
///     .records("a,b\n\"x,1\",\"he said \"\"hi\"\"\"\n")
///     .unwrap();
/// assert_eq!(records[1], vec!["x,1".to_string(), "he said \"hi\"".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    params: CsvParams,
}

impl CsvReader {
    /// Reader with default `,` / `"` tokenization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader with custom delimiter and quote characters.
    pub fn with_params(params: CsvParams) -> Self {
        Self { params }
    }

    /// Splits `text` into records of raw field strings.
    ///
    /// Blank lines are skipped. A quote opened and never closed is a
    /// fatal tokenization error.
    pub fn records(&self, text: &str) -> Result<Vec<Vec<String>>, MinfacetError> {
        let CsvParams { delimiter, quote } = self.params;
        let mut records: Vec<Vec<String>> = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut quoted_field = false;
        let mut line = 1usize;

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if in_quotes {
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        // doubled quote: literal
                        field.push(quote);
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            } else if c == quote && field.is_empty() && !quoted_field {
                in_quotes = true;
                quoted_field = true;
            } else if c == delimiter {
                record.push(std::mem::take(&mut field));
                quoted_field = false;
            } else if c == '\n' {
                line += 1;
                if record.is_empty() && field.is_empty() && !quoted_field {
                    continue; // blank line
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                quoted_field = false;
            } else if c == '\r' && chars.peek() == Some(&'\n') {
                // swallowed; the \n closes the record
            } else {
                field.push(c);
            }
        }
        if in_quotes {
            return Err(MinfacetError::Csv {
                line,
                message: "unterminated quoted field".to_string(),
            });
        }
        if !field.is_empty() || !record.is_empty() || quoted_field {
            record.push(field);
            records.push(record);
        }
        Ok(records)
    }

    /// Tokenizes and runs the header-driven row transformer: the first
    /// record names the columns, every later record becomes a [`Row`].
    pub fn rows(&self, text: &str) -> Result<(Vec<String>, Vec<Row>), MinfacetError> {
        let mut transformer = CsvRowReader::new();
        for record in self.records(text)? {
            transformer.push(record);
        }
        Ok(transformer.finish())
    }
}

/// The row transformer: a reducer fed raw records, producing named
/// [`Row`]s. The first record is consumed as the header. Empty cells
/// are treated as absent.
#[derive(Debug, Default)]
pub struct CsvRowReader {
    headers: Option<Vec<String>>,
    rows: Vec<Row>,
}

impl CsvRowReader {
    /// A transformer awaiting its header record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reducer for CsvRowReader {
    type Item = Vec<String>;
    type Output = (Vec<String>, Vec<Row>);

    fn push(&mut self, record: Vec<String>) {
        match &self.headers {
            None => self.headers = Some(record),
            Some(headers) => {
                let mut row = Row::new();
                for (name, cell) in headers.iter().zip(record) {
                    if !cell.is_empty() {
                        row.set(name.clone(), cell);
                    }
                }
                self.rows.push(row);
            }
        }
    }

    fn finish(self) -> (Vec<String>, Vec<Row>) {
        (self.headers.unwrap_or_default(), self.rows)
    }
}

/// Reads delimited text straight into a sealed [`ColumnStore`] with
/// default tokenization. Headers without a declared descriptor in
/// `params` ingest as string fields.
pub fn read_csv(text: &str, params: IngestParams) -> Result<ColumnStore, MinfacetError> {
    read_csv_with(text, CsvParams::default(), params)
}

/// [`read_csv`] with custom delimiter and quote characters.
pub fn read_csv_with(
    text: &str,
    csv: CsvParams,
    mut params: IngestParams,
) -> Result<ColumnStore, MinfacetError> {
    let (headers, rows) = CsvReader::with_params(csv).rows(text)?;
    for name in &headers {
        if !params.fields.iter().any(|fd| &fd.identifier == name) {
            params
                .fields
                .push(FieldDescriptor::new(name.clone(), ValueType::Str));
        }
    }
    build_from_rows(&rows, &params)
}

/// Convenience: `read_csv` plus empty-string null coercion for the
/// listed fields' cells.
pub fn read_csv_nullable(
    text: &str,
    null_values: Vec<Value>,
    mut params: IngestParams,
) -> Result<ColumnStore, MinfacetError> {
    params.null_values = null_values;
    read_csv(text, params)
}
