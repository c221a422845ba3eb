//! # graflat (app library)
//!
//! CLI plumbing and the JSON snapshot provider for the graflat binary.
//! The deterministic engine itself lives in `graflat-core`; this crate
//! only wires files, arguments, and logging around it.

pub mod cli;
pub mod snapshot;
