//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Chipgraph CORE.
//!
//! These primitives are compiled into the binary and are immutable at runtime.
//! The CLI may lower `MAX_EVAL_DEPTH` through its configuration file or flags,
//! but never raise it, and never touches the parsing limits.

/// Default maximum recursion depth for a single evaluation.
///
/// - Evaluation recurses once per dependency hop.
/// - A chain longer than this fails with `ChipError::DepthLimitExceeded`
///   instead of exhausting the thread stack.
///
/// Acyclicity is still a precondition; this bound only caps stack usage.
pub const MAX_EVAL_DEPTH: usize = 512;

/// Value every chip's cached result and input value start from.
pub const INITIAL_VALUE: f64 = 0.0;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of chips a script may declare.
///
/// Scripts declaring more are rejected by the parser before any allocation.
pub const MAX_CHIPS: usize = 10_000;

/// Maximum number of commands a script may declare.
pub const MAX_COMMANDS: usize = 100_000;

/// Maximum length of a chip identity in bytes.
pub const MAX_IDENTITY_LENGTH: usize = 64;
