//! # Row Emitter
//!
//! Formats six-cell tuples into one of two dialects and forwards them
//! to the injected sink. Each row is an independently parseable unit;
//! there is no cross-row buffering or aggregation.

use crate::types::{GraflatError, Row};
use std::io::Write;

/// The six fixed column names, in output order.
pub const COLUMNS: [&str; 6] = ["id", "type", "key_id", "val_id", "key_meta", "val_meta"];

// =============================================================================
// DIALECT
// =============================================================================

/// Cell formatting dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Cells pass through verbatim, delimiter-separated by the sink.
    #[default]
    Plain,
    /// Every cell is wrapped in double quotes, with embedded quotes
    /// doubled.
    Quoted,
}

impl Dialect {
    fn format_cell(self, raw: &str) -> String {
        match self {
            Dialect::Plain => raw.to_string(),
            Dialect::Quoted => format!("\"{}\"", raw.replace('"', "\"\"")),
        }
    }
}

// =============================================================================
// SINK CONTRACT
// =============================================================================

/// The consumed sink contract: accept one row of formatted cells.
pub trait RowSink {
    /// Write one row. Failure halts the traversal immediately.
    fn write_row(&mut self, cells: &[String]) -> Result<(), GraflatError>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, cells: &[String]) -> Result<(), GraflatError> {
        (**self).write_row(cells)
    }
}

/// The standard sink: joins cells with a delimiter and writes one line
/// per row. The caller owns the writer's lifetime; dropping it releases
/// the output resource on every exit path.
#[derive(Debug)]
pub struct DelimitedSink<W: Write> {
    writer: W,
    delimiter: char,
}

impl<W: Write> DelimitedSink<W> {
    /// Wrap a writer with the given cell delimiter.
    pub fn new(writer: W, delimiter: char) -> Self {
        Self { writer, delimiter }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for DelimitedSink<W> {
    fn write_row(&mut self, cells: &[String]) -> Result<(), GraflatError> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            line.push_str(cell);
        }
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }
}

// =============================================================================
// EMITTER
// =============================================================================

/// Formats rows per dialect and forwards them to the sink.
#[derive(Debug)]
pub struct RowEmitter<S: RowSink> {
    sink: S,
    dialect: Dialect,
}

impl<S: RowSink> RowEmitter<S> {
    /// Create an emitter over the given sink.
    pub fn new(sink: S, dialect: Dialect) -> Self {
        Self { sink, dialect }
    }

    /// Write the optional header row of fixed column names.
    pub fn header(&mut self) -> Result<(), GraflatError> {
        let cells: Vec<String> = COLUMNS
            .iter()
            .map(|name| self.dialect.format_cell(name))
            .collect();
        self.sink.write_row(&cells)
    }

    /// Format and write one row.
    pub fn emit(&mut self, row: &Row) -> Result<(), GraflatError> {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .map(|cell| self.dialect.format_cell(cell))
            .collect();
        self.sink.write_row(&cells)
    }
}

// =============================================================================
// TESTS
// =============================================================================
