//! # Session Module
//!
//! A Session owns one `ChipGraph` and replays script commands against it.
//!
//! The session is the single entry point the binary uses: it registers the
//! chip roster, executes `Command`s one at a time, and exposes the read-only
//! connection report once the commands are done.

use crate::evaluator::{Evaluation, Evaluator};
use crate::graph::ChipGraph;
use crate::primitives::MAX_EVAL_DEPTH;
use crate::report::ConnectionReport;
use crate::script::{Command, Script};
use crate::{ChipError, ChipId};
use serde::Serialize;

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Outcome {
    /// `source` now feeds `target`.
    Connected { source: ChipId, target: ChipId },
    /// An Input chip received a new value.
    InputSet { chip: ChipId, value: f64 },
    /// A chip was evaluated.
    Evaluated(Evaluation),
}

impl Outcome {
    /// The evaluation, if this outcome came from an `Evaluate` command.
    #[must_use]
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            Self::Evaluated(evaluation) => Some(evaluation),
            Self::Connected { .. } | Self::InputSet { .. } => None,
        }
    }
}

/// A circuit under construction and evaluation.
#[derive(Debug, Clone)]
pub struct Session {
    graph: ChipGraph,
    max_depth: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_graph(ChipGraph::new())
    }
}

impl Session {
    /// Create a new empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session around an existing graph.
    #[must_use]
    pub fn with_graph(graph: ChipGraph) -> Self {
        Self {
            graph,
            max_depth: MAX_EVAL_DEPTH,
        }
    }

    /// Override the evaluation depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register every chip of a roster, deriving kinds from identity prefixes.
    pub fn from_roster(roster: &[ChipId]) -> Result<Self, ChipError> {
        let mut graph = ChipGraph::new();
        for id in roster {
            graph.register(id.clone())?;
        }
        Ok(Self::with_graph(graph))
    }

    /// Register the script's roster. Commands are not executed.
    pub fn from_script(script: &Script) -> Result<Self, ChipError> {
        Self::from_roster(&script.chips)
    }

    #[must_use]
    pub fn graph(&self) -> &ChipGraph {
        &self.graph
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    pub fn connect(&mut self, source: &ChipId, target: &ChipId) -> Result<(), ChipError> {
        self.graph.connect(source, target)
    }

    pub fn set_input_value(&mut self, id: &ChipId, value: f64) -> Result<(), ChipError> {
        self.graph.set_input_value(id, value)
    }

    /// Evaluate a chip using the session's depth limit.
    pub fn evaluate(&mut self, id: &ChipId) -> Result<Evaluation, ChipError> {
        Evaluator::new(&mut self.graph)
            .with_max_depth(self.max_depth)
            .evaluate(id)
    }

    /// Execute a single command.
    pub fn execute(&mut self, command: &Command) -> Result<Outcome, ChipError> {
        match command {
            Command::Connect { source, target } => {
                self.connect(source, target)?;
                Ok(Outcome::Connected {
                    source: source.clone(),
                    target: target.clone(),
                })
            }
            Command::SetInput { chip, value } => {
                self.set_input_value(chip, *value)?;
                Ok(Outcome::InputSet {
                    chip: chip.clone(),
                    value: *value,
                })
            }
            Command::Evaluate { chip } => self.evaluate(chip).map(Outcome::Evaluated),
        }
    }

    /// Execute commands in order, stopping at the first fatal error.
    pub fn run(&mut self, commands: &[Command]) -> Result<Vec<Outcome>, ChipError> {
        commands.iter().map(|c| self.execute(c)).collect()
    }

    // =========================================================================
    // REPORTING
    // =========================================================================

    /// Snapshot the current wiring.
    #[must_use]
    pub fn report(&self) -> ConnectionReport {
        ConnectionReport::from_graph(&self.graph)
    }

    /// Number of chips in the circuit.
    #[must_use]
    pub fn chip_count(&self) -> usize {
        self.graph.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
