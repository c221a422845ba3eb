//! # Core Type Definitions
//!
//! This module contains all core types for the Graflat engine:
//! - Identity types (`ObjectId`, `ObjRef`)
//! - Value representation (`Scalar`, `Value`)
//! - The closed variant and relation vocabularies (`Variant`, `Relation`)
//! - Output structures (`Row`, `DumpStats`)
//! - Error types (`GraflatError`)
//!
//! ## Determinism Guarantees
//!
//! All identity types implement `Ord` for deterministic ordering in
//! `BTreeMap`/`BTreeSet`. Object handles are compared only for equality
//! and ordering; the engine never dereferences them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTITY TYPES
// =============================================================================

/// Engine-assigned integer identity for a discovered object.
///
/// Assigned once, at first discovery, and never reused within a dump.
/// Id 0 is reserved: it stands for absent values and for the virtual
/// root, and never labels a real object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// The reserved id for absent values and the virtual root.
    pub const ROOT: ObjectId = ObjectId(0);

    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Provider-supplied opaque handle for an object in the walked graph.
///
/// Used only for equality and ordering (reference identity, never
/// structural equality). The engine never inspects the graph through
/// a handle directly; all inspection goes through the injected
/// reflection provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjRef(pub u64);

// =============================================================================
// VARIANT VOCABULARY (closed set)
// =============================================================================

/// The closed set of composite-object variants the engine understands.
///
/// A provider reporting anything outside this set violates its contract
/// and aborts the dump; skipping such an object would leave dangling
/// references in the edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Key/value collection. May carry a default-behavior table.
    Container,
    /// Function-like object with captured variables.
    Callable,
    /// Live execution context: call stack, locals, optional debug hook.
    ExecutionContext,
    /// Opaque payload. May carry a default-behavior table and one
    /// attached value.
    OpaqueBlob,
}

impl Variant {
    /// The vertex-row `type` tag for this variant.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Variant::Container => "container",
            Variant::Callable => "callable",
            Variant::ExecutionContext => "execution-context",
            Variant::OpaqueBlob => "opaque-blob",
        }
    }

    /// Whether this variant may carry a default-behavior table sidecar.
    #[must_use]
    pub const fn has_behavior_table(self) -> bool {
        matches!(self, Variant::Container | Variant::OpaqueBlob)
    }
}

/// The closed set of edge relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// Container entry: key endpoint and value endpoint.
    KeyValuePair,
    /// Callable captured variable: inline `[index,"name"]` key.
    CapturedVariable,
    /// Execution-context debug hook: callable ref plus `["mask",count]`.
    DebugHook,
    /// One active frame: callable ref plus inline depth.
    StackCallable,
    /// One visible local: callable ref, `[depth,slot,"name"]` locator,
    /// and the local's value.
    StackLocal,
    /// Opaque-blob attached value.
    AttachedValue,
}

impl Relation {
    /// The edge-row `type` tag for this relation.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Relation::KeyValuePair => "key-value-pair",
            Relation::CapturedVariable => "captured-variable",
            Relation::DebugHook => "debug-hook",
            Relation::StackCallable => "stack-callable",
            Relation::StackLocal => "stack-local",
            Relation::AttachedValue => "attached-value",
        }
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// A primitive value. Scalars are always encoded inline in a row cell;
/// they never receive an id and never enter the traversal frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// No value. Renders as an empty cell, never as an id-0 reference.
    Absent,
    /// Boolean.
    Bool(bool),
    /// Numeric value. Non-finite values encode as the sentinel tokens
    /// `inf`, `-inf`, `-nan`.
    Number(f64),
    /// Byte string. Bytes, not `String`, because providers may hand
    /// over text that is invalid in the declared encoding; the engine
    /// still emits it, escaped byte-by-byte.
    Str(Vec<u8>),
}

impl Scalar {
    /// Build a string scalar from UTF-8 text.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Scalar::Str(s.into().into_bytes())
    }
}

/// One edge endpoint: a scalar encoded inline, or a reference to a
/// composite object resolved to its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Inline scalar endpoint.
    Scalar(Scalar),
    /// Reference endpoint; resolved through the identity registry.
    Object(ObjRef),
}

impl Value {
    /// Build an inline string endpoint.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::str(s))
    }

    /// Build a numeric endpoint.
    #[must_use]
    pub fn number(n: f64) -> Self {
        Value::Scalar(Scalar::Number(n))
    }
}

// =============================================================================
// OUTPUT ROW
// =============================================================================

/// One six-cell output row, vertex or edge.
///
/// Vertex rows: `key_id` = sidecar behavior-table id, `val_id` unused,
/// `key_meta` = metadata blob, `val_meta` = rendered description.
/// Edge rows: `key_id`/`key_meta` and `val_id`/`val_meta` are the two
/// endpoints, each pair scalar-or-reference exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Subject id. 0 only for virtual-root edges.
    pub id: ObjectId,
    /// Entry from the closed `type` vocabulary.
    pub tag: &'static str,
    /// Key-side id cell.
    pub key_id: Option<ObjectId>,
    /// Value-side id cell.
    pub val_id: Option<ObjectId>,
    /// Key-side text cell.
    pub key_meta: Option<String>,
    /// Value-side text cell.
    pub val_meta: Option<String>,
}

impl Row {
    /// Render the row as its six cells; absent cells render empty.
    #[must_use]
    pub fn cells(&self) -> [String; 6] {
        [
            self.id.0.to_string(),
            self.tag.to_string(),
            self.key_id.map(|i| i.0.to_string()).unwrap_or_default(),
            self.val_id.map(|i| i.0.to_string()).unwrap_or_default(),
            self.key_meta.clone().unwrap_or_default(),
            self.val_meta.clone().unwrap_or_default(),
        ]
    }
}

/// Summary counters returned by a completed dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpStats {
    /// Distinct objects discovered and emitted as vertex rows.
    pub objects: u64,
    /// Total rows written, header excluded.
    pub rows: u64,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during a dump.
///
/// - No silent failures and no retries: the traversal is a single
///   deterministic pass, and callers re-invoke the whole dump on failure.
/// - Encoding edge cases (non-finite numbers, invalid text bytes) are
///   not errors; they degrade to documented sentinel/escape forms.
#[derive(Debug, Error)]
pub enum GraflatError {
    /// The sink failed to accept a row. Surfaced immediately with the
    /// underlying cause; traversal halts.
    #[error("sink I/O error: {0}")]
    Sink(#[from] std::io::Error),

    /// The provider reported an object outside the closed variant set.
    /// Fatal: skipping the object would corrupt referential integrity.
    #[error("provider contract violation: object {0:?} has no classifiable variant")]
    ProviderContract(ObjRef),

    /// The cancellation check fired at the top of the main loop.
    /// Rows already written stay written; the result is partial.
    #[error("dump cancelled")]
    Cancelled,

    /// Caller-supplied input could not be used (malformed snapshot
    /// document, oversized input file).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// =============================================================================
// TESTS
// =============================================================================
