//! # Graph Walker
//!
//! Drives the breadth-first traversal: dequeues discovered objects,
//! classifies them, queries the reflection provider for children, and
//! emits one vertex row per object plus one edge row per child
//! relation.
//!
//! The walker is strictly read-only toward the graph and strictly
//! sequential. Output is naturally sorted by subject id: every row for
//! object *k* is emitted while *k* is processed, and objects are
//! processed in id (discovery) order. Virtual-root edges, subject id 0,
//! come first.

use crate::emit::{Dialect, RowEmitter, RowSink};
use crate::encode::{encode, encode_str};
use crate::provider::Reflect;
use crate::registry::Registry;
use crate::types::{DumpStats, GraflatError, ObjRef, ObjectId, Relation, Row, Scalar, Value, Variant};

// =============================================================================
// OPTIONS
// =============================================================================

/// Per-dump output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    /// Cell formatting dialect.
    pub dialect: Dialect,
    /// Emit the fixed-column header row before any data.
    pub header: bool,
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Dump the graph reachable from the named roots.
///
/// Each root becomes a `key-value-pair` edge from the virtual root
/// (subject id 0); traversal then drains the frontier until empty.
/// Registry and frontier are local to this call and never reused.
pub fn dump<P: Reflect, S: RowSink>(
    provider: &P,
    sink: S,
    options: &DumpOptions,
    roots: &[(&str, Value)],
) -> Result<DumpStats, GraflatError> {
    dump_with_cancel(provider, sink, options, roots, &|| false)
}

/// [`dump`], with a cooperative cancellation check at the top of the
/// main loop. A positive check aborts with [`GraflatError::Cancelled`];
/// rows already written stay written.
pub fn dump_with_cancel<P: Reflect, S: RowSink>(
    provider: &P,
    sink: S,
    options: &DumpOptions,
    roots: &[(&str, Value)],
    cancel: &dyn Fn() -> bool,
) -> Result<DumpStats, GraflatError> {
    let mut walker = Walker {
        provider,
        emitter: RowEmitter::new(sink, options.dialect),
        registry: Registry::new(),
        rows: 0,
    };

    if options.header {
        walker.emitter.header()?;
    }
    for (name, value) in roots {
        walker.root_edge(name, value)?;
    }
    while let Some(obj) = walker.registry.next() {
        if cancel() {
            return Err(GraflatError::Cancelled);
        }
        walker.visit(obj)?;
    }

    Ok(DumpStats {
        objects: walker.registry.assigned(),
        rows: walker.rows,
    })
}

// =============================================================================
// WALKER
// =============================================================================

struct Walker<'a, P: Reflect, S: RowSink> {
    provider: &'a P,
    emitter: RowEmitter<S>,
    registry: Registry,
    rows: u64,
}

impl<P: Reflect, S: RowSink> Walker<'_, P, S> {
    /// Emit one root as an edge from the virtual root, discovering the
    /// root object in the process.
    fn root_edge(&mut self, name: &str, value: &Value) -> Result<(), GraflatError> {
        let (val_id, val_meta) = self.endpoint(value);
        self.emit(Row {
            id: ObjectId::ROOT,
            tag: Relation::KeyValuePair.tag(),
            key_id: None,
            val_id,
            key_meta: Some(encode_str(name.as_bytes())),
            val_meta,
        })
    }

    /// Process one dequeued object: vertex row, then edge rows.
    fn visit(&mut self, obj: ObjRef) -> Result<(), GraflatError> {
        // Already registered; resolve returns the existing id.
        let id = self.registry.resolve(Some(obj));
        let variant = self
            .provider
            .classify(obj)
            .ok_or(GraflatError::ProviderContract(obj))?;

        self.vertex(id, obj, variant)?;
        match variant {
            Variant::Container => self.container_edges(id, obj),
            Variant::Callable => self.capture_edges(id, obj),
            Variant::ExecutionContext => self.context_edges(id, obj),
            Variant::OpaqueBlob => self.attachment_edge(id, obj),
        }
    }

    fn vertex(&mut self, id: ObjectId, obj: ObjRef, variant: Variant) -> Result<(), GraflatError> {
        let sidecar = if variant.has_behavior_table() {
            // Absent table yields an empty sidecar cell, not an edge.
            self.provider
                .behavior_table(obj)
                .map(|table| self.registry.resolve(Some(table)))
        } else {
            None
        };
        let blob = match variant {
            Variant::Callable | Variant::ExecutionContext => {
                metadata_blob(&self.provider.metadata(obj))
            }
            _ => None,
        };
        self.emit(Row {
            id,
            tag: variant.tag(),
            key_id: sidecar,
            val_id: None,
            key_meta: blob,
            val_meta: Some(encode_str(self.provider.describe(obj).as_bytes())),
        })
    }

    fn container_edges(&mut self, id: ObjectId, obj: ObjRef) -> Result<(), GraflatError> {
        for (key, value) in self.provider.entries(obj) {
            let (key_id, key_meta) = self.endpoint(&key);
            let (val_id, val_meta) = self.endpoint(&value);
            self.emit(Row {
                id,
                tag: Relation::KeyValuePair.tag(),
                key_id,
                val_id,
                key_meta,
                val_meta,
            })?;
        }
        Ok(())
    }

    fn capture_edges(&mut self, id: ObjectId, obj: ObjRef) -> Result<(), GraflatError> {
        // Capture indices are 1-based, in provider yield order.
        for (index, (name, value)) in self.provider.captures(obj).into_iter().enumerate() {
            let (val_id, val_meta) = self.endpoint(&value);
            self.emit(Row {
                id,
                tag: Relation::CapturedVariable.tag(),
                key_id: None,
                val_id,
                key_meta: Some(format!("[{},{}]", index + 1, encode_str(name.as_bytes()))),
                val_meta,
            })?;
        }
        Ok(())
    }

    fn context_edges(&mut self, id: ObjectId, ctx: ObjRef) -> Result<(), GraflatError> {
        if let Some(hook) = self.provider.hook(ctx) {
            let callable = self.registry.resolve(Some(hook.callable));
            self.emit(Row {
                id,
                tag: Relation::DebugHook.tag(),
                key_id: Some(callable),
                val_id: None,
                key_meta: None,
                val_meta: Some(format!(
                    "[{},{}]",
                    encode_str(hook.mask.as_bytes()),
                    hook.count
                )),
            })?;
        }
        // Frames are innermost first; depth 0 is the innermost frame.
        for (depth, frame) in self.provider.frames(ctx).into_iter().enumerate() {
            let callable = self.registry.resolve(Some(frame.callable));
            self.emit(Row {
                id,
                tag: Relation::StackCallable.tag(),
                key_id: Some(callable),
                val_id: None,
                key_meta: None,
                val_meta: Some(depth.to_string()),
            })?;
            for local in frame.locals {
                let (val_id, val_meta) = self.endpoint(&local.value);
                self.emit(Row {
                    id,
                    tag: Relation::StackLocal.tag(),
                    key_id: Some(callable),
                    val_id,
                    key_meta: Some(format!(
                        "[{},{},{}]",
                        depth,
                        local.slot,
                        encode_str(local.name.as_bytes())
                    )),
                    val_meta,
                })?;
            }
        }
        Ok(())
    }

    fn attachment_edge(&mut self, id: ObjectId, obj: ObjRef) -> Result<(), GraflatError> {
        if let Some(value) = self.provider.attachment(obj) {
            let (val_id, val_meta) = self.endpoint(&value);
            self.emit(Row {
                id,
                tag: Relation::AttachedValue.tag(),
                key_id: None,
                val_id,
                key_meta: None,
                val_meta,
            })?;
        }
        Ok(())
    }

    /// Render one edge endpoint under the scalar-or-reference rule:
    /// a scalar fills the text cell, an object reference fills the id
    /// cell (discovering the object as a side effect), absent fills
    /// neither.
    fn endpoint(&mut self, value: &Value) -> (Option<ObjectId>, Option<String>) {
        match value {
            Value::Object(obj) => (Some(self.registry.resolve(Some(*obj))), None),
            Value::Scalar(Scalar::Absent) => (None, None),
            Value::Scalar(scalar) => (None, Some(encode(scalar))),
        }
    }

    fn emit(&mut self, row: Row) -> Result<(), GraflatError> {
        self.emitter.emit(&row)?;
        self.rows = self.rows.saturating_add(1);
        Ok(())
    }
}

/// Render metadata pairs as a `{"key":value,...}` blob, preserving
/// provider yield order. Empty pairs yield an empty cell.
fn metadata_blob(pairs: &[(String, Scalar)]) -> Option<String> {
    if pairs.is_empty() {
        return None;
    }
    let mut blob = String::from("{");
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            blob.push(',');
        }
        blob.push_str(&encode_str(key.as_bytes()));
        blob.push(':');
        blob.push_str(&encode(value));
    }
    blob.push('}');
    Some(blob)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_blob_preserves_pair_order() {
        let pairs = vec![
            ("nparams".to_string(), Scalar::Number(2.0)),
            ("name".to_string(), Scalar::str("f")),
            ("variadic".to_string(), Scalar::Bool(false)),
        ];
        assert_eq!(
            metadata_blob(&pairs).expect("blob"),
            "{\"nparams\":2,\"name\":\"f\",\"variadic\":false}"
        );
    }

    #[test]
    fn empty_metadata_is_empty_cell() {
        assert_eq!(metadata_blob(&[]), None);
    }
}
