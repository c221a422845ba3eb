//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::snapshot::{SnapshotDoc, SnapshotProvider};
use graflat_core::{DelimitedSink, Dialect, DumpOptions, DumpStats, GraflatError, Value, dump};
use std::io::Write;
use std::path::Path;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum snapshot file size (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large
/// files; the whole document is parsed in memory before dumping.
const MAX_SNAPSHOT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GraflatError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| GraflatError::InvalidInput(format!("cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(GraflatError::InvalidInput(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Read and parse a snapshot document.
fn load_snapshot(path: &Path) -> Result<SnapshotProvider, GraflatError> {
    validate_file_size(path, MAX_SNAPSHOT_FILE_SIZE)?;
    let text = std::fs::read_to_string(path)?;
    let doc: SnapshotDoc = serde_json::from_str(&text)
        .map_err(|e| GraflatError::InvalidInput(format!("malformed snapshot: {}", e)))?;
    Ok(SnapshotProvider::new(doc))
}

fn parse_dialect(name: &str) -> Result<Dialect, GraflatError> {
    match name {
        "plain" => Ok(Dialect::Plain),
        "quoted" => Ok(Dialect::Quoted),
        other => Err(GraflatError::InvalidInput(format!(
            "unknown dialect '{}' (expected plain or quoted)",
            other
        ))),
    }
}

// =============================================================================
// DUMP COMMAND
// =============================================================================

/// Run the dump into a writer and flush it before returning.
///
/// The explicit flush matters: a buffered writer's `Drop` discards
/// flush errors, which would report a truncated export as success.
/// Close-time failures surface as [`GraflatError::Sink`] like any
/// other sink failure.
pub fn dump_to_writer<W: Write>(
    provider: &SnapshotProvider,
    options: &DumpOptions,
    writer: W,
    delimiter: char,
) -> Result<DumpStats, GraflatError> {
    let roots = provider.roots();
    let root_refs: Vec<(&str, Value)> = roots
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();

    let mut sink = DelimitedSink::new(writer, delimiter);
    let stats = dump(provider, &mut sink, options, &root_refs)?;
    sink.into_inner().flush()?;
    Ok(stats)
}

/// Flatten a snapshot document into a row export.
pub fn cmd_dump(
    file: &Path,
    output: Option<&Path>,
    dialect: &str,
    delimiter: char,
    header: bool,
) -> Result<(), GraflatError> {
    let provider = load_snapshot(file)?;
    let options = DumpOptions {
        dialect: parse_dialect(dialect)?,
        header,
    };

    tracing::info!(snapshot = %file.display(), "starting dump");

    // Scoped acquisition: the writer is dropped (and the file released)
    // on every exit path, including mid-traversal failures.
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let stats = dump_to_writer(&provider, &options, writer, delimiter)?;
    tracing::info!(objects = stats.objects, rows = stats.rows, "dump complete");
    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Parse a snapshot and report object counts per kind plus the roots.
pub fn cmd_inspect(file: &Path, verbose: bool) -> Result<(), GraflatError> {
    let provider = load_snapshot(file)?;

    println!("snapshot: {}", file.display());
    for (kind, count) in provider.kind_counts() {
        println!("  {:<20} {}", kind, count);
    }
    let roots = provider.roots();
    println!("  {:<20} {}", "roots", roots.len());
    if verbose {
        for (name, value) in &roots {
            println!("    {} -> {:?}", name, value);
        }
    }
    Ok(())
}
