//! # Snapshot End-To-End Tests
//!
//! Drives the engine through the JSON snapshot provider and the CLI
//! command plumbing.

use graflat::cli::{cmd_dump, cmd_inspect, dump_to_writer};
use graflat::snapshot::{SnapshotDoc, SnapshotProvider};
use graflat_core::{DelimitedSink, DumpOptions, GraflatError, Value, dump};
use std::io::Write;

const SAMPLE: &str = r#"{
    "objects": {
        "1": {
            "kind": "container",
            "describe": "globals table",
            "entries": [
                ["self", {"ref": 1}],
                ["answer", 42],
                ["f", {"ref": 2}]
            ]
        },
        "2": {
            "kind": "callable",
            "meta": [["name", "f"], ["nparams", 1]],
            "captures": [["env", {"ref": 1}]]
        }
    },
    "roots": [
        {"name": "globals", "value": {"ref": 1}}
    ]
}"#;

fn dump_sample() -> Vec<String> {
    let doc: SnapshotDoc = serde_json::from_str(SAMPLE).expect("parse");
    let provider = SnapshotProvider::new(doc);
    let roots = provider.roots();
    let root_refs: Vec<(&str, Value)> = roots
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();

    let mut sink = DelimitedSink::new(Vec::new(), ',');
    let stats = dump(&provider, &mut sink, &DumpOptions::default(), &root_refs).expect("dump");
    assert_eq!(stats.objects, 2);
    String::from_utf8(sink.into_inner())
        .expect("utf8")
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn snapshot_dump_produces_expected_rows() {
    let lines = dump_sample();
    assert_eq!(lines[0], "0,key-value-pair,,1,\"globals\",");
    assert_eq!(lines[1], "1,container,,,,\"globals table\"");
    assert_eq!(lines[2], "1,key-value-pair,,1,\"self\",");
    assert_eq!(lines[3], "1,key-value-pair,,,\"answer\",42");
    assert_eq!(lines[4], "1,key-value-pair,,2,\"f\",");
    assert_eq!(
        lines[5],
        "2,callable,,,{\"name\":\"f\",\"nparams\":1},\"callable: 0x00000002\""
    );
    assert_eq!(lines[6], "2,captured-variable,,1,[1,\"env\"],");
    assert_eq!(lines.len(), 7);
}

#[test]
fn cmd_dump_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("snap.json");
    let output_path = dir.path().join("out.csv");
    std::fs::File::create(&snapshot_path)
        .expect("create")
        .write_all(SAMPLE.as_bytes())
        .expect("write");

    cmd_dump(&snapshot_path, Some(&output_path), "quoted", ',', true).expect("cmd_dump");

    let content = std::fs::read_to_string(&output_path).expect("read");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "\"id\",\"type\",\"key_id\",\"val_id\",\"key_meta\",\"val_meta\""
    );
    assert_eq!(lines.len(), 8);
}

/// Accepts every write but fails at flush time, like a full device
/// surfacing the error only when buffers drain.
struct FlushFailWriter;

impl Write for FlushFailWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::other("device full"))
    }
}

#[test]
fn close_time_flush_failure_surfaces_as_sink_error() {
    let doc: SnapshotDoc = serde_json::from_str(SAMPLE).expect("parse");
    let provider = SnapshotProvider::new(doc);

    let err = dump_to_writer(&provider, &DumpOptions::default(), FlushFailWriter, ',')
        .expect_err("flush failure must surface");
    assert!(matches!(err, GraflatError::Sink(_)));
}

#[test]
fn cmd_dump_rejects_unknown_dialect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("snap.json");
    std::fs::File::create(&snapshot_path)
        .expect("create")
        .write_all(SAMPLE.as_bytes())
        .expect("write");

    let err = cmd_dump(&snapshot_path, None, "fancy", ',', false).expect_err("must reject");
    assert!(matches!(err, GraflatError::InvalidInput(_)));
}

#[test]
fn cmd_dump_surfaces_malformed_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("snap.json");
    std::fs::File::create(&snapshot_path)
        .expect("create")
        .write_all(b"{not json")
        .expect("write");

    let err = cmd_dump(&snapshot_path, None, "plain", ',', false).expect_err("must reject");
    assert!(matches!(err, GraflatError::InvalidInput(_)));
}

#[test]
fn cmd_inspect_accepts_sample() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("snap.json");
    std::fs::File::create(&snapshot_path)
        .expect("create")
        .write_all(SAMPLE.as_bytes())
        .expect("write");

    cmd_inspect(&snapshot_path, true).expect("cmd_inspect");
}

#[test]
fn unclassifiable_kind_aborts_through_the_cli_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("snap.json");
    std::fs::File::create(&snapshot_path)
        .expect("create")
        .write_all(
            br#"{
                "objects": {"1": {"kind": "mystery"}},
                "roots": [{"name": "x", "value": {"ref": 1}}]
            }"#,
        )
        .expect("write");

    let err = cmd_dump(&snapshot_path, None, "plain", ',', false).expect_err("must abort");
    assert!(matches!(err, GraflatError::ProviderContract(_)));
}
