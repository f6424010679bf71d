//! # Script Module
//!
//! Parser for the whitespace-separated circuit script format.
//!
//! ```text
//! 5                 chip count
//! I1 I2 A1 N1 O1    chip identities
//! 6                 command count
//! A I1 A1           connect I1 into A1
//! A I2 A1
//! A A1 O1
//! I I1 3            set input I1 to 3
//! I I2 4
//! O O1              evaluate O1
//! ```
//!
//! Line breaks carry no meaning; only token order does. Tokens after the
//! declared number of commands are ignored. The parser only checks shape and
//! limits: kind prefixes and wiring are validated when the script runs.

use crate::primitives::{MAX_CHIPS, MAX_COMMANDS, MAX_IDENTITY_LENGTH};
use crate::{ChipError, ChipId};
use std::str::{FromStr, SplitWhitespace};

/// One operation from the command stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `A <source> <target>`
    Connect { source: ChipId, target: ChipId },
    /// `I <chip> <value>`
    SetInput { chip: ChipId, value: f64 },
    /// `O <chip>`
    Evaluate { chip: ChipId },
}

impl Command {
    /// The single-letter keyword of this command.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "A",
            Self::SetInput { .. } => "I",
            Self::Evaluate { .. } => "O",
        }
    }
}

/// A parsed circuit: the chip roster plus the commands to run against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    /// Chip identities in declaration order.
    pub chips: Vec<ChipId>,
    /// Commands in execution order.
    pub commands: Vec<Command>,
}

impl Script {
    /// Parse a script from text.
    pub fn parse(text: &str) -> Result<Self, ChipError> {
        let mut tokens = Tokens::new(text);

        let chip_count = tokens.count("chip count", MAX_CHIPS)?;
        let mut chips = Vec::with_capacity(chip_count);
        for _ in 0..chip_count {
            chips.push(tokens.identity("chip identity")?);
        }

        let command_count = tokens.count("command count", MAX_COMMANDS)?;
        let mut commands = Vec::with_capacity(command_count);
        for _ in 0..command_count {
            commands.push(tokens.command()?);
        }

        Ok(Self { chips, commands })
    }

    /// Number of `Evaluate` commands in the script.
    #[must_use]
    pub fn evaluation_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Evaluate { .. }))
            .count()
    }
}

impl FromStr for Script {
    type Err = ChipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Whitespace tokenizer that tracks the 1-based token position for errors.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next(&mut self, expected: &str) -> Result<&'a str, ChipError> {
        self.position = self.position.saturating_add(1);
        self.inner.next().ok_or_else(|| {
            ChipError::Parse(format!(
                "Unexpected end of input at token {}: expected {}",
                self.position, expected
            ))
        })
    }

    fn count(&mut self, expected: &str, max: usize) -> Result<usize, ChipError> {
        let token = self.next(expected)?;
        let count: usize = token.parse().map_err(|_| {
            ChipError::Parse(format!(
                "Token {}: expected {}, found {:?}",
                self.position, expected, token
            ))
        })?;

        if count > max {
            return Err(ChipError::Parse(format!(
                "Token {}: {} {} exceeds maximum {}",
                self.position, expected, count, max
            )));
        }
        Ok(count)
    }

    fn identity(&mut self, expected: &str) -> Result<ChipId, ChipError> {
        let token = self.next(expected)?;
        if token.len() > MAX_IDENTITY_LENGTH {
            return Err(ChipError::Parse(format!(
                "Token {}: identity of {} bytes exceeds maximum {}",
                self.position,
                token.len(),
                MAX_IDENTITY_LENGTH
            )));
        }
        Ok(ChipId::new(token))
    }

    fn value(&mut self) -> Result<f64, ChipError> {
        let token = self.next("input value")?;
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ChipError::Parse(format!(
                "Token {}: expected a finite number, found {:?}",
                self.position, token
            ))),
        }
    }

    fn command(&mut self) -> Result<Command, ChipError> {
        let keyword = self.next("command")?;
        match keyword {
            "A" => Ok(Command::Connect {
                source: self.identity("source chip")?,
                target: self.identity("target chip")?,
            }),
            "I" => Ok(Command::SetInput {
                chip: self.identity("input chip")?,
                value: self.value()?,
            }),
            "O" => Ok(Command::Evaluate {
                chip: self.identity("chip to evaluate")?,
            }),
            other => Err(ChipError::Parse(format!(
                "Token {}: unknown command {:?}",
                self.position, other
            ))),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
