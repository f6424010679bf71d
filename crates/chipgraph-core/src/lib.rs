//! # chipgraph-core
//!
//! The chip circuit engine for Chipgraph - THE LOGIC.
//!
//! A circuit is a set of typed chips wired together by identity. Asking for a
//! chip's value recursively evaluates everything it depends on, using the
//! inputs as they are at that moment.
//!
//! ## Layout
//!
//! - `types`: identities, kinds, slots, chips, diagnostics, errors
//! - `graph`: the chip arena and wiring rules
//! - `evaluator`: recursive, non-memoized evaluation
//! - `script`: parser for the circuit script format
//! - `session`: replays script commands against a graph
//! - `report`: read-only wiring listing
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Has NO async, NO I/O, NO logging
//! - Returns non-fatal conditions as `Diagnostic` values instead of printing
//! - Never panics on caller input; every failure is a `ChipError`
//! - Assumes the wiring is acyclic, bounding recursion depth regardless

// =============================================================================
// MODULES
// =============================================================================

pub mod evaluator;
pub mod graph;
pub mod primitives;
pub mod report;
pub mod script;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Chip, ChipError, ChipId, ChipIndex, ChipKind, Diagnostic, Slot};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use evaluator::{Evaluation, Evaluator};
pub use graph::ChipGraph;
pub use report::{ConnectionLine, ConnectionReport};
pub use script::{Command, Script};
pub use session::{Outcome, Session};
