//! # Core Type Definitions
//!
//! This module contains all core types for the Chipgraph circuit engine:
//! - Identifiers (`ChipId`, `ChipIndex`)
//! - Chip classification (`ChipKind`)
//! - Wiring slots and the chip record (`Slot`, `Chip`)
//! - Non-fatal evaluation output (`Diagnostic`)
//! - Error types (`ChipError`)
//!
//! ## Ownership
//!
//! Chips never reference each other directly. Every dependency and consumer
//! link is a `ChipIndex` into the arena owned by `ChipGraph`, so the wiring
//! can be arbitrary without any ownership cycles.

use crate::primitives::INITIAL_VALUE;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// External identity of a chip, such as `"A1"` or `"O50"`.
///
/// The first character encodes the chip's kind (see [`ChipKind::from_prefix`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChipId(pub String);

impl ChipId {
    /// Create a new chip identity from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading character that encodes the kind, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChipId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Position of a chip inside the graph arena.
///
/// Indices are assigned in creation order and stay valid for the lifetime of
/// the graph (chips are never removed). Only a `ChipGraph` hands them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChipIndex(pub(crate) usize);

impl ChipIndex {
    /// Position in creation order.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

// =============================================================================
// CHIP KIND
// =============================================================================

/// The fixed operation a chip performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChipKind {
    /// Source of an externally supplied value. Accepts no dependencies.
    Input,
    /// Pass-through sink. Accepts one dependency.
    Output,
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, with 0.0 substituted when `b == 0`.
    Divide,
    /// `-a`
    Negate,
}

impl ChipKind {
    /// Every kind, in prefix-table order.
    pub const ALL: [Self; 7] = [
        Self::Input,
        Self::Output,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Negate,
    ];

    /// Map an identity's leading character to a kind.
    #[must_use]
    pub const fn from_prefix(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Input),
            'O' => Some(Self::Output),
            'A' => Some(Self::Add),
            'S' => Some(Self::Subtract),
            'M' => Some(Self::Multiply),
            'D' => Some(Self::Divide),
            'N' => Some(Self::Negate),
            _ => None,
        }
    }

    /// Derive the kind from a full identity string.
    ///
    /// Returns `ChipError::EmptyIdentity` for `""` and
    /// `ChipError::UnknownKind` when the leading character is not in the table.
    pub fn from_identity(identity: &str) -> Result<Self, ChipError> {
        let prefix = identity.chars().next().ok_or(ChipError::EmptyIdentity)?;
        Self::from_prefix(prefix).ok_or(ChipError::UnknownKind(prefix))
    }

    /// The identity prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Input => 'I',
            Self::Output => 'O',
            Self::Add => 'A',
            Self::Subtract => 'S',
            Self::Multiply => 'M',
            Self::Divide => 'D',
            Self::Negate => 'N',
        }
    }

    /// Number of dependencies the kind requires before it can be evaluated.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Input => 0,
            Self::Output | Self::Negate => 1,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => 2,
        }
    }

    /// Whether the kind fills two slots in connection order.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        self.arity() == 2
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Negate => "Negate",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SLOT
// =============================================================================

/// One dependency slot of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Nothing connected yet.
    #[default]
    Empty,
    /// Wired to the chip at this index.
    Filled(ChipIndex),
}

impl Slot {
    /// The wired chip, if any.
    #[must_use]
    pub const fn index(self) -> Option<ChipIndex> {
        match self {
            Self::Empty => None,
            Self::Filled(index) => Some(index),
        }
    }

    /// Check if nothing is connected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

// =============================================================================
// CHIP
// =============================================================================

/// A single node of the circuit.
///
/// Identity and kind are fixed at creation. Wiring is changed only by
/// `ChipGraph::connect`, the input value only by `ChipGraph::set_input_value`,
/// and the cached result only by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    id: ChipId,
    kind: ChipKind,
    dependency1: Slot,
    dependency2: Slot,
    consumer: Option<ChipIndex>,
    input_value: f64,
    cached_result: f64,
}

impl Chip {
    /// Create an unwired chip with zeroed value and result.
    #[must_use]
    pub fn new(kind: ChipKind, id: ChipId) -> Self {
        Self {
            id,
            kind,
            dependency1: Slot::Empty,
            dependency2: Slot::Empty,
            consumer: None,
            input_value: INITIAL_VALUE,
            cached_result: INITIAL_VALUE,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ChipId {
        &self.id
    }

    #[must_use]
    pub const fn kind(&self) -> ChipKind {
        self.kind
    }

    #[must_use]
    pub const fn dependency1(&self) -> Slot {
        self.dependency1
    }

    /// Second slot. Always `Slot::Empty` for non-binary kinds.
    #[must_use]
    pub const fn dependency2(&self) -> Slot {
        self.dependency2
    }

    /// The chip that most recently took this one as a dependency.
    #[must_use]
    pub const fn consumer(&self) -> Option<ChipIndex> {
        self.consumer
    }

    #[must_use]
    pub const fn input_value(&self) -> f64 {
        self.input_value
    }

    /// Result of the most recent evaluation that passed through this chip.
    #[must_use]
    pub const fn cached_result(&self) -> f64 {
        self.cached_result
    }

    /// Check if every slot the kind requires is filled.
    #[must_use]
    pub const fn is_fully_wired(&self) -> bool {
        match self.kind.arity() {
            0 => true,
            1 => !self.dependency1.is_empty(),
            _ => !self.dependency1.is_empty() && !self.dependency2.is_empty(),
        }
    }

    pub(crate) fn set_dependency1(&mut self, source: ChipIndex) {
        self.dependency1 = Slot::Filled(source);
    }

    pub(crate) fn set_dependency2(&mut self, source: ChipIndex) {
        self.dependency2 = Slot::Filled(source);
    }

    pub(crate) fn set_consumer(&mut self, target: ChipIndex) {
        self.consumer = Some(target);
    }

    pub(crate) fn set_input_value(&mut self, value: f64) {
        self.input_value = value;
    }

    pub(crate) fn set_cached_result(&mut self, value: f64) {
        self.cached_result = value;
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// A non-fatal condition raised while evaluating.
///
/// Diagnostics never abort an evaluation; they are collected and returned
/// alongside the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A Divide chip saw a zero divisor and produced 0.0.
    DivisionByZero { chip: ChipId },
}

impl Diagnostic {
    /// The chip that raised the diagnostic.
    #[must_use]
    pub fn chip(&self) -> &ChipId {
        match self {
            Self::DivisionByZero { chip } => chip,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero { chip } => write!(f, "Division by zero in chip {}", chip),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Chipgraph system.
///
/// - No silent failures
/// - Use `Result<T, ChipError>` for fallible operations
/// - The CORE never panics; every variant is recoverable by the caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChipError {
    /// A chip with this identity is already registered.
    #[error("Duplicate chip identity: {0}")]
    DuplicateIdentity(ChipId),

    /// No chip with this identity is registered.
    #[error("Unknown chip identity: {0}")]
    UnknownIdentity(ChipId),

    /// The operation does not apply to the chip's kind.
    #[error("Invalid wiring: cannot {operation} {kind} chip {chip}")]
    InvalidWiring {
        chip: ChipId,
        kind: ChipKind,
        operation: &'static str,
    },

    /// Both slots of a binary chip are already connected.
    #[error("All input slots of chip {0} are already connected")]
    SlotsFull(ChipId),

    /// Evaluation reached a chip whose required slots are not all connected.
    #[error("Chip {0} is missing a required connection")]
    MissingWiring(ChipId),

    /// An identity string was empty.
    #[error("Chip identity is empty")]
    EmptyIdentity,

    /// An identity's leading character does not name a chip kind.
    #[error("Unknown chip kind prefix: {0:?}")]
    UnknownKind(char),

    /// Evaluation recursed deeper than the configured limit.
    #[error("Evaluation depth limit {limit} exceeded at chip {chip}")]
    DepthLimitExceeded { chip: ChipId, limit: usize },

    /// A circuit script could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configuration file was invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================
