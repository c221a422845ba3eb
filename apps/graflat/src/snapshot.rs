//! # Snapshot Provider
//!
//! A reflection provider backed by a JSON snapshot document instead of
//! a live runtime. Each object is keyed by an integer handle; scalars
//! are plain JSON values and object references are `{"ref": N}`.
//!
//! An object whose `kind` falls outside the closed variant vocabulary
//! is kept as-is and reported as unclassifiable, so the engine's
//! contract-violation path fires exactly as it would against a
//! misbehaving live provider.

use graflat_core::{Frame, Hook, Local, ObjRef, Reflect, Scalar, Value, Variant};
use serde::Deserialize;
use std::collections::BTreeMap;

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Top-level snapshot document.
#[derive(Debug, Deserialize)]
pub struct SnapshotDoc {
    /// Objects keyed by handle.
    pub objects: BTreeMap<u64, ObjectDoc>,
    /// Named roots, dumped as virtual-root edges in listed order.
    #[serde(default)]
    pub roots: Vec<RootDoc>,
}

/// One named root.
#[derive(Debug, Deserialize)]
pub struct RootDoc {
    pub name: String,
    pub value: ValueDoc,
}

/// One object in the snapshot.
#[derive(Debug, Deserialize)]
pub struct ObjectDoc {
    /// Variant tag: `container`, `callable`, `execution-context`,
    /// `opaque-blob`. Anything else is a deliberate contract violation.
    pub kind: String,
    #[serde(default)]
    pub describe: Option<String>,
    #[serde(default)]
    pub meta: Vec<(String, ScalarDoc)>,
    #[serde(default)]
    pub behavior_table: Option<u64>,
    #[serde(default)]
    pub entries: Vec<(ValueDoc, ValueDoc)>,
    #[serde(default)]
    pub captures: Vec<(String, ValueDoc)>,
    #[serde(default)]
    pub hook: Option<HookDoc>,
    #[serde(default)]
    pub frames: Vec<FrameDoc>,
    #[serde(default)]
    pub attachment: Option<ValueDoc>,
}

/// Debug hook description.
#[derive(Debug, Deserialize)]
pub struct HookDoc {
    pub callable: u64,
    pub mask: String,
    pub count: i64,
}

/// One stack frame, innermost first in document order.
#[derive(Debug, Deserialize)]
pub struct FrameDoc {
    pub callable: u64,
    #[serde(default)]
    pub locals: Vec<LocalDoc>,
}

/// One visible local.
#[derive(Debug, Deserialize)]
pub struct LocalDoc {
    pub slot: u32,
    pub name: String,
    pub value: ValueDoc,
}

/// A scalar-only document value (used in metadata pairs).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarDoc {
    Absent,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl ScalarDoc {
    fn to_scalar(&self) -> Scalar {
        match self {
            ScalarDoc::Absent => Scalar::Absent,
            ScalarDoc::Bool(b) => Scalar::Bool(*b),
            ScalarDoc::Number(n) => Scalar::Number(*n),
            ScalarDoc::Str(s) => Scalar::str(s.clone()),
        }
    }
}

/// A document value: scalar, or `{"ref": N}` object reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValueDoc {
    Absent,
    Bool(bool),
    Number(f64),
    Str(String),
    Ref {
        #[serde(rename = "ref")]
        handle: u64,
    },
}

impl ValueDoc {
    fn to_value(&self) -> Value {
        match self {
            ValueDoc::Absent => Value::Scalar(Scalar::Absent),
            ValueDoc::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
            ValueDoc::Number(n) => Value::Scalar(Scalar::Number(*n)),
            ValueDoc::Str(s) => Value::str(s.clone()),
            ValueDoc::Ref { handle } => Value::Object(ObjRef(*handle)),
        }
    }
}

fn variant_from_kind(kind: &str) -> Option<Variant> {
    match kind {
        "container" => Some(Variant::Container),
        "callable" => Some(Variant::Callable),
        "execution-context" => Some(Variant::ExecutionContext),
        "opaque-blob" => Some(Variant::OpaqueBlob),
        _ => None,
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// [`Reflect`] implementation over a parsed snapshot document.
#[derive(Debug)]
pub struct SnapshotProvider {
    doc: SnapshotDoc,
}

impl SnapshotProvider {
    /// Wrap a parsed document.
    #[must_use]
    pub fn new(doc: SnapshotDoc) -> Self {
        Self { doc }
    }

    /// The document's named roots as engine values, in listed order.
    #[must_use]
    pub fn roots(&self) -> Vec<(String, Value)> {
        self.doc
            .roots
            .iter()
            .map(|root| (root.name.clone(), root.value.to_value()))
            .collect()
    }

    /// Object count per declared kind, for inspection output.
    #[must_use]
    pub fn kind_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for object in self.doc.objects.values() {
            *counts.entry(object.kind.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn get(&self, obj: ObjRef) -> Option<&ObjectDoc> {
        self.doc.objects.get(&obj.0)
    }
}

impl Reflect for SnapshotProvider {
    fn classify(&self, obj: ObjRef) -> Option<Variant> {
        self.get(obj).and_then(|o| variant_from_kind(&o.kind))
    }

    fn describe(&self, obj: ObjRef) -> String {
        match self.get(obj) {
            Some(object) => object
                .describe
                .clone()
                .unwrap_or_else(|| format!("{}: 0x{:08x}", object.kind, obj.0)),
            None => format!("object: 0x{:08x}", obj.0),
        }
    }

    fn metadata(&self, obj: ObjRef) -> Vec<(String, Scalar)> {
        self.get(obj)
            .map(|o| {
                o.meta
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_scalar()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn behavior_table(&self, obj: ObjRef) -> Option<ObjRef> {
        self.get(obj).and_then(|o| o.behavior_table).map(ObjRef)
    }

    fn entries(&self, obj: ObjRef) -> Vec<(Value, Value)> {
        self.get(obj)
            .map(|o| {
                o.entries
                    .iter()
                    .map(|(key, value)| (key.to_value(), value.to_value()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn captures(&self, obj: ObjRef) -> Vec<(String, Value)> {
        self.get(obj)
            .map(|o| {
                o.captures
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_value()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn hook(&self, ctx: ObjRef) -> Option<Hook> {
        self.get(ctx).and_then(|o| o.hook.as_ref()).map(|hook| Hook {
            callable: ObjRef(hook.callable),
            mask: hook.mask.clone(),
            count: hook.count,
        })
    }

    fn frames(&self, ctx: ObjRef) -> Vec<Frame> {
        self.get(ctx)
            .map(|o| {
                o.frames
                    .iter()
                    .map(|frame| Frame {
                        callable: ObjRef(frame.callable),
                        locals: frame
                            .locals
                            .iter()
                            .map(|local| Local {
                                slot: local.slot,
                                name: local.name.clone(),
                                value: local.value.to_value(),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn attachment(&self, obj: ObjRef) -> Option<Value> {
        self.get(obj)
            .and_then(|o| o.attachment.as_ref())
            .map(|value| value.to_value())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_doc_variants_parse() {
        let doc: Vec<ValueDoc> =
            serde_json::from_str(r#"[null, true, 2.5, "s", {"ref": 9}]"#).expect("parse");
        assert!(matches!(doc[0].to_value(), Value::Scalar(Scalar::Absent)));
        assert!(matches!(doc[1].to_value(), Value::Scalar(Scalar::Bool(true))));
        assert!(matches!(doc[2].to_value(), Value::Scalar(Scalar::Number(_))));
        assert!(matches!(doc[3].to_value(), Value::Scalar(Scalar::Str(_))));
        assert!(matches!(doc[4].to_value(), Value::Object(ObjRef(9))));
    }

    #[test]
    fn unknown_kind_is_unclassifiable() {
        let doc: SnapshotDoc = serde_json::from_str(
            r#"{"objects": {"1": {"kind": "mystery"}}, "roots": []}"#,
        )
        .expect("parse");
        let provider = SnapshotProvider::new(doc);
        assert_eq!(provider.classify(ObjRef(1)), None);
    }

    #[test]
    fn describe_falls_back_to_kind_and_handle() {
        let doc: SnapshotDoc = serde_json::from_str(
            r#"{"objects": {"7": {"kind": "container"}}, "roots": []}"#,
        )
        .expect("parse");
        let provider = SnapshotProvider::new(doc);
        assert_eq!(provider.describe(ObjRef(7)), "container: 0x00000007");
    }
}
