//! # Connection Report
//!
//! Read-only listing of how every chip is wired.
//!
//! Non-output chips come first in creation order, followed by the Output
//! chips in creation order. Each chip appears exactly once. Building a report
//! never mutates the graph.

use crate::graph::ChipGraph;
use crate::{Chip, ChipId, ChipIndex, ChipKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wiring of a single chip, with references resolved to identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLine {
    pub chip: ChipId,
    pub kind: ChipKind,
    pub input1: Option<ChipId>,
    /// Always `None` for non-binary kinds.
    pub input2: Option<ChipId>,
    /// The consumer of this chip.
    pub output: Option<ChipId>,
}

impl ConnectionLine {
    fn from_chip(graph: &ChipGraph, chip: &Chip) -> Self {
        let resolve = |index: Option<ChipIndex>| index.map(|i| graph.id_of(i).clone());
        Self {
            chip: chip.id().clone(),
            kind: chip.kind(),
            input1: resolve(chip.dependency1().index()),
            input2: resolve(chip.dependency2().index()),
            output: resolve(chip.consumer()),
        }
    }
}

/// `Some(id)` renders as the id, `None` as the word "None".
struct OrNone<'a>(&'a Option<ChipId>);

impl fmt::Display for OrNone<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for ConnectionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ChipKind::Input => write!(f, "{}, Output = {}", self.chip, OrNone(&self.output)),
            ChipKind::Output => write!(f, "{}, Input 1 = {}", self.chip, OrNone(&self.input1)),
            // Negate shares the binary layout; its second input is always None.
            ChipKind::Negate
            | ChipKind::Add
            | ChipKind::Subtract
            | ChipKind::Multiply
            | ChipKind::Divide => write!(
                f,
                "{}, Input 1 = {}, Input 2 = {}, Output = {}",
                self.chip,
                OrNone(&self.input1),
                OrNone(&self.input2),
                OrNone(&self.output)
            ),
        }
    }
}

/// Wiring of the whole circuit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub lines: Vec<ConnectionLine>,
}

impl ConnectionReport {
    /// Snapshot the graph's wiring.
    #[must_use]
    pub fn from_graph(graph: &ChipGraph) -> Self {
        let (outputs, others): (Vec<&Chip>, Vec<&Chip>) = graph
            .chips()
            .partition(|chip| chip.kind() == ChipKind::Output);

        let lines = others
            .into_iter()
            .chain(outputs)
            .map(|chip| ConnectionLine::from_chip(graph, chip))
            .collect();

        Self { lines }
    }

    /// Find the line for a chip.
    #[must_use]
    pub fn line(&self, chip: &ChipId) -> Option<&ConnectionLine> {
        self.lines.iter().find(|line| &line.chip == chip)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ConnectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
