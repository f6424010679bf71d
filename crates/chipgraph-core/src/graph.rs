//! # Chip Graph
//!
//! Registry and storage for the Chipgraph CORE.
//!
//! Chips live in an arena (`Vec<Chip>`) addressed by `ChipIndex`. Identities
//! resolve through a `BTreeMap` so every listing is deterministic. Wiring
//! rules are applied here and nowhere else.

use crate::{Chip, ChipError, ChipId, ChipIndex, ChipKind, Slot};
use std::collections::BTreeMap;

/// The circuit: every chip plus the identity index.
#[derive(Debug, Clone, Default)]
pub struct ChipGraph {
    /// Chip storage in creation order.
    chips: Vec<Chip>,

    /// Identity lookup: ChipId -> ChipIndex
    index: BTreeMap<ChipId, ChipIndex>,
}

impl ChipGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chip of the given kind.
    ///
    /// Fails with `ChipError::DuplicateIdentity` if the identity is taken.
    /// The kind is taken as given; use [`ChipGraph::register`] to derive it
    /// from the identity prefix.
    pub fn create(&mut self, kind: ChipKind, id: ChipId) -> Result<ChipIndex, ChipError> {
        if self.index.contains_key(&id) {
            return Err(ChipError::DuplicateIdentity(id));
        }

        let chip_index = ChipIndex(self.chips.len());
        self.index.insert(id.clone(), chip_index);
        self.chips.push(Chip::new(kind, id));

        Ok(chip_index)
    }

    /// Create a chip whose kind is derived from the identity's first character.
    pub fn register(&mut self, id: ChipId) -> Result<ChipIndex, ChipError> {
        let kind = ChipKind::from_identity(id.as_str())?;
        self.create(kind, id)
    }

    /// Resolve an identity to its arena index.
    pub fn lookup(&self, id: &ChipId) -> Result<ChipIndex, ChipError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ChipError::UnknownIdentity(id.clone()))
    }

    /// Resolve an identity to the chip itself.
    pub fn get(&self, id: &ChipId) -> Result<&Chip, ChipError> {
        let chip_index = self.lookup(id)?;
        Ok(self.chip_at(chip_index))
    }

    /// Get the chip at `chip_index`.
    ///
    /// `None` if the index was handed out by a different, larger graph.
    #[must_use]
    pub fn chip(&self, chip_index: ChipIndex) -> Option<&Chip> {
        self.chips.get(chip_index.0)
    }

    /// Indices reaching here come from this graph's own index or slots.
    pub(crate) fn chip_at(&self, chip_index: ChipIndex) -> &Chip {
        &self.chips[chip_index.0]
    }

    pub(crate) fn chip_mut(&mut self, chip_index: ChipIndex) -> &mut Chip {
        &mut self.chips[chip_index.0]
    }

    /// Wire `source` into `target`.
    ///
    /// - Output/Negate: `dependency1` is (re)placed by `source`.
    /// - Add/Subtract/Multiply/Divide: the first empty slot is filled;
    ///   `ChipError::SlotsFull` if both are taken.
    /// - Input: `ChipError::InvalidWiring`.
    ///
    /// On success the source's consumer becomes `target`. Failed connects leave
    /// the graph untouched.
    pub fn connect(&mut self, source: &ChipId, target: &ChipId) -> Result<(), ChipError> {
        let source_index = self.lookup(source)?;
        let target_index = self.lookup(target)?;

        let target_chip = self.chip_mut(target_index);
        match target_chip.kind() {
            ChipKind::Output | ChipKind::Negate => target_chip.set_dependency1(source_index),
            ChipKind::Add | ChipKind::Subtract | ChipKind::Multiply | ChipKind::Divide => {
                match (target_chip.dependency1(), target_chip.dependency2()) {
                    (Slot::Empty, _) => target_chip.set_dependency1(source_index),
                    (Slot::Filled(_), Slot::Empty) => target_chip.set_dependency2(source_index),
                    (Slot::Filled(_), Slot::Filled(_)) => {
                        return Err(ChipError::SlotsFull(target.clone()));
                    }
                }
            }
            ChipKind::Input => {
                return Err(ChipError::InvalidWiring {
                    chip: target.clone(),
                    kind: ChipKind::Input,
                    operation: "connect into",
                });
            }
        }

        self.chip_mut(source_index).set_consumer(target_index);
        Ok(())
    }

    /// Set the externally supplied value of an Input chip.
    pub fn set_input_value(&mut self, id: &ChipId, value: f64) -> Result<(), ChipError> {
        let chip_index = self.lookup(id)?;
        let chip = self.chip_mut(chip_index);

        if chip.kind() != ChipKind::Input {
            return Err(ChipError::InvalidWiring {
                chip: id.clone(),
                kind: chip.kind(),
                operation: "set the input value of",
            });
        }

        chip.set_input_value(value);
        Ok(())
    }

    /// Get all chips in creation order.
    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter()
    }

    pub(crate) fn id_of(&self, chip_index: ChipIndex) -> &ChipId {
        self.chip_at(chip_index).id()
    }

    /// Check if an identity is registered.
    #[must_use]
    pub fn contains(&self, id: &ChipId) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of chips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Check if the graph has no chips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
