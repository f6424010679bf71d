//! # Evaluator
//!
//! Demand-driven recursive evaluation of a single chip.
//!
//! Every call recomputes the whole dependency tree below the requested chip:
//! input values may change between calls, so nothing is cached across
//! evaluations, and a chip feeding two consumers is recomputed once per path.
//! Each visited chip's `cached_result` is overwritten with its fresh value.
//!
//! The dependency graph must be acyclic. Recursion is bounded by a depth
//! limit so that a too-deep (or cyclic) circuit fails with
//! `ChipError::DepthLimitExceeded` rather than overflowing the stack.

use crate::graph::ChipGraph;
use crate::primitives::MAX_EVAL_DEPTH;
use crate::{ChipError, ChipId, ChipIndex, ChipKind, Diagnostic, Slot};
use serde::{Deserialize, Serialize};

/// The outcome of evaluating one chip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The chip that was requested.
    pub chip: ChipId,
    /// Its freshly computed value.
    pub value: f64,
    /// Non-fatal conditions raised along the way, in evaluation order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Evaluation {
    /// Check if the evaluation completed without any diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Recursive evaluator over a mutable borrow of the graph.
///
/// The exclusive borrow guarantees no wiring or input change can interleave
/// with an evaluation in progress.
#[derive(Debug)]
pub struct Evaluator<'g> {
    graph: &'g mut ChipGraph,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'g> Evaluator<'g> {
    /// Create an evaluator with the default depth limit.
    pub fn new(graph: &'g mut ChipGraph) -> Self {
        Self {
            graph,
            max_depth: MAX_EVAL_DEPTH,
            diagnostics: Vec::new(),
        }
    }

    /// Override the maximum number of dependency hops below the requested chip.
    ///
    /// Values above `MAX_EVAL_DEPTH` put the thread stack at the caller's risk.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluate the chip named `id`.
    ///
    /// Fails with `UnknownIdentity`, `MissingWiring` or `DepthLimitExceeded`.
    /// A zero divisor is not an error: it is reported in
    /// `Evaluation::diagnostics` and the Divide chip yields 0.0.
    pub fn evaluate(mut self, id: &ChipId) -> Result<Evaluation, ChipError> {
        let root = self.graph.lookup(id)?;
        let value = self.compute(root, 0)?;

        Ok(Evaluation {
            chip: id.clone(),
            value,
            diagnostics: self.diagnostics,
        })
    }

    fn compute(&mut self, chip_index: ChipIndex, depth: usize) -> Result<f64, ChipError> {
        if depth > self.max_depth {
            return Err(ChipError::DepthLimitExceeded {
                chip: self.graph.id_of(chip_index).clone(),
                limit: self.max_depth,
            });
        }

        let chip = self.graph.chip_at(chip_index);
        if !chip.is_fully_wired() {
            return Err(ChipError::MissingWiring(chip.id().clone()));
        }

        let kind = chip.kind();
        let (dependency1, dependency2) = (chip.dependency1(), chip.dependency2());
        let input_value = chip.input_value();

        let result = match kind {
            ChipKind::Input => input_value,
            ChipKind::Output => self.compute_slot(chip_index, dependency1, depth)?,
            // Subtracting from +0.0 keeps a zero input from turning into -0.0.
            ChipKind::Negate => 0.0 - self.compute_slot(chip_index, dependency1, depth)?,
            ChipKind::Add => {
                let (a, b) = self.compute_operands(chip_index, dependency1, dependency2, depth)?;
                a + b
            }
            ChipKind::Subtract => {
                let (a, b) = self.compute_operands(chip_index, dependency1, dependency2, depth)?;
                a - b
            }
            ChipKind::Multiply => {
                let (a, b) = self.compute_operands(chip_index, dependency1, dependency2, depth)?;
                a * b
            }
            ChipKind::Divide => {
                let (a, b) = self.compute_operands(chip_index, dependency1, dependency2, depth)?;
                if b == 0.0 {
                    self.diagnostics.push(Diagnostic::DivisionByZero {
                        chip: self.graph.id_of(chip_index).clone(),
                    });
                    0.0
                } else {
                    a / b
                }
            }
        };

        self.graph.chip_mut(chip_index).set_cached_result(result);
        Ok(result)
    }

    fn compute_slot(
        &mut self,
        owner: ChipIndex,
        slot: Slot,
        depth: usize,
    ) -> Result<f64, ChipError> {
        match slot {
            Slot::Filled(dependency) => self.compute(dependency, depth.saturating_add(1)),
            Slot::Empty => Err(ChipError::MissingWiring(self.graph.id_of(owner).clone())),
        }
    }

    /// Both operands of a binary chip, first slot first.
    fn compute_operands(
        &mut self,
        owner: ChipIndex,
        dependency1: Slot,
        dependency2: Slot,
        depth: usize,
    ) -> Result<(f64, f64), ChipError> {
        let a = self.compute_slot(owner, dependency1, depth)?;
        let b = self.compute_slot(owner, dependency2, depth)?;
        Ok((a, b))
    }
}

impl ChipGraph {
    /// Evaluate `id` with the default depth limit.
    pub fn evaluate(&mut self, id: &ChipId) -> Result<Evaluation, ChipError> {
        Evaluator::new(self).evaluate(id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
