//! # Reflection Provider Seam
//!
//! The engine never inspects the walked graph directly. All ambient
//! runtime introspection (reading another execution context's stack,
//! closures, hooks) sits behind this passive, read-only trait, injected
//! into the walker. This keeps the engine portable and testable against
//! a fabricated graph.
//!
//! The trait exposes one capability query per variant instead of an ad
//! hoc `children()` bag: the walker dispatches on the closed `Variant`
//! set and calls only the queries that variant supports.

use crate::types::{ObjRef, Scalar, Value, Variant};

// =============================================================================
// PROVIDER-REPORTED STRUCTURES
// =============================================================================

/// An execution context's debug hook, when installed.
#[derive(Debug, Clone, PartialEq)]
pub struct Hook {
    /// The hook callable.
    pub callable: ObjRef,
    /// Event mask, in the provider's textual form.
    pub mask: String,
    /// Instruction count threshold.
    pub count: i64,
}

/// One active call-stack frame. Providers yield frames innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The callable executing in this frame.
    pub callable: ObjRef,
    /// Visible locals of the frame, in provider slot order.
    pub locals: Vec<Local>,
}

/// One visible local variable inside a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    /// Provider-reported slot index.
    pub slot: u32,
    /// Variable name as the provider renders it.
    pub name: String,
    /// Current value.
    pub value: Value,
}

// =============================================================================
// REFLECT TRAIT
// =============================================================================

/// Read-only reflection over the walked object graph.
///
/// Implementations must never mutate the graph and must report children
/// by reference identity (the same object yields the same `ObjRef` for
/// the duration of a dump). Enumeration order is the provider's native
/// order; the engine preserves it and never resorts.
pub trait Reflect {
    /// Classify an object into the closed variant set. `None` is a
    /// contract violation and aborts the dump.
    fn classify(&self, obj: ObjRef) -> Option<Variant>;

    /// Human-readable rendering of an object. Used only in descriptive
    /// cells, never as identity.
    fn describe(&self, obj: ObjRef) -> String;

    /// Variant-specific facts (defining-source data for callables, run
    /// status for execution contexts), as key/value pairs in whatever
    /// order the provider yields. Unordered at the source; the engine
    /// documents the non-determinism rather than imposing an order.
    fn metadata(&self, obj: ObjRef) -> Vec<(String, Scalar)>;

    /// The object's default-behavior table, for variants that support
    /// one (container, opaque-blob). Absent yields an empty sidecar
    /// cell, not an edge.
    fn behavior_table(&self, obj: ObjRef) -> Option<ObjRef>;

    /// Container entries as (key, value) pairs in native order.
    fn entries(&self, obj: ObjRef) -> Vec<(Value, Value)>;

    /// A callable's captured variables as (name, value) pairs. The
    /// engine numbers them 1-based in yield order.
    fn captures(&self, obj: ObjRef) -> Vec<(String, Value)>;

    /// An execution context's debug hook, if one is installed.
    fn hook(&self, ctx: ObjRef) -> Option<Hook>;

    /// An execution context's active frames, innermost first. Zero
    /// frames is normal, not an error.
    fn frames(&self, ctx: ObjRef) -> Vec<Frame>;

    /// An opaque blob's attached value, if any.
    fn attachment(&self, obj: ObjRef) -> Option<Value>;
}
