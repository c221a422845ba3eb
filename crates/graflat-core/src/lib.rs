//! # graflat-core
//!
//! The deterministic graph-to-table engine for Graflat - THE LOGIC.
//!
//! This crate walks an entire live, heterogeneous, cyclic object graph
//! reachable from a fixed root set and converts it into a flat,
//! row-oriented export: every composite object gets a stable integer
//! identity assigned at first discovery, and every relationship becomes
//! a pair of identity references a consumer can replay to reconstruct
//! an isomorphic structure.
//!
//! ## Architecture
//!
//! - The engine is read-only toward the graph it walks; all inspection
//!   goes through an injected [`Reflect`] provider.
//! - Cycles and aliasing are defeated by a single mechanism: the
//!   registry's atomic resolve-or-create-and-enqueue operation.
//! - Rows leave through an injected [`RowSink`]; the engine does no
//!   file I/O of its own.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - `BTreeMap` only, no `HashMap`: deterministic iteration
//! - Single-threaded, strictly sequential; registry and frontier are
//!   scoped to one dump and never shared across concurrent dumps

// =============================================================================
// MODULES
// =============================================================================

pub mod emit;
pub mod encode;
pub mod provider;
pub mod registry;
pub mod types;
pub mod walker;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DumpStats, GraflatError, ObjRef, ObjectId, Relation, Row, Scalar, Value, Variant,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use emit::{COLUMNS, DelimitedSink, Dialect, RowEmitter, RowSink};
pub use encode::{encode, encode_number, encode_str};
pub use provider::{Frame, Hook, Local, Reflect};
pub use registry::Registry;
pub use walker::{DumpOptions, dump, dump_with_cancel};
