//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Results go to the caller-supplied writer; logs go through `tracing`.

use crate::config::Config;
use chipgraph_core::primitives::MAX_EVAL_DEPTH;
use chipgraph_core::{
    ChipError, ChipId, Command, ConnectionReport, Diagnostic, Evaluation, Outcome, Script, Session,
};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum script size (16 MB), for files and stdin alike.
///
/// This prevents memory exhaustion from malicious or accidental large input.
const MAX_SCRIPT_SIZE: u64 = 16 * 1024 * 1024;

/// Header printed before the connection report.
pub const REPORT_HEADER: &str = "***** Showing the connections that were established";

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ChipError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ChipError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ChipError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve symlinks and "..", and require a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ChipError> {
    let canonical = path.canonicalize().map_err(|e| {
        ChipError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ChipError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn write_error(e: std::io::Error) -> ChipError {
    ChipError::Io(format!("Write output: {}", e))
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Effective settings after layering config file and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub json: bool,
    pub report: bool,
    pub max_depth: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RunSettings {
    /// Settings straight from a configuration, without CLI overrides.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            json: config.output.json,
            report: config.output.report,
            max_depth: config.evaluation.max_depth,
        }
    }

    /// Apply CLI overrides on top of a configuration.
    pub fn resolve(
        config: &Config,
        json_flag: bool,
        max_depth: Option<usize>,
    ) -> Result<Self, ChipError> {
        let base = Self::from_config(config);
        let settings = Self {
            json: base.json || json_flag,
            max_depth: max_depth.unwrap_or(base.max_depth),
            ..base
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject a depth limit outside `1..=MAX_EVAL_DEPTH`.
    ///
    /// The limit may only lower the built-in bound: deeper recursion can
    /// exhaust the thread stack.
    pub fn validate(&self) -> Result<(), ChipError> {
        if !(1..=MAX_EVAL_DEPTH).contains(&self.max_depth) {
            return Err(ChipError::Config(format!(
                "max depth must be between 1 and {}, got {}",
                MAX_EVAL_DEPTH, self.max_depth
            )));
        }
        Ok(())
    }
}

// =============================================================================
// SCRIPT LOADING
// =============================================================================

/// Read and parse a script from `file`, or from stdin when `None`.
pub fn load_script(file: Option<&Path>) -> Result<Script, ChipError> {
    let text = match file {
        Some(path) => {
            let validated_path = validate_file_path(path)?;
            validate_file_size(&validated_path, MAX_SCRIPT_SIZE)?;
            tracing::info!("Loading script from {}", validated_path.display());

            std::fs::read_to_string(&validated_path)
                .map_err(|e| ChipError::Io(format!("Read file: {}", e)))?
        }
        None => {
            tracing::info!("Reading script from stdin");
            let mut text = String::new();
            std::io::stdin()
                .lock()
                .take(MAX_SCRIPT_SIZE.saturating_add(1))
                .read_to_string(&mut text)
                .map_err(|e| ChipError::Io(format!("Read stdin: {}", e)))?;

            if text.len() as u64 > MAX_SCRIPT_SIZE {
                return Err(ChipError::Io(format!(
                    "Input exceeds maximum allowed {} bytes",
                    MAX_SCRIPT_SIZE
                )));
            }
            text
        }
    };

    Script::parse(&text)
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn log_diagnostic(diagnostic: &Diagnostic) {
    tracing::warn!(chip = %diagnostic.chip(), "{}", diagnostic);
}

fn log_diagnostics(outcomes: &[Outcome]) {
    outcomes
        .iter()
        .filter_map(Outcome::evaluation)
        .flat_map(|evaluation| &evaluation.diagnostics)
        .for_each(log_diagnostic);
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), ChipError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ChipError::Serialization(e.to_string()))?;
    writeln!(out, "{}", text).map_err(write_error)
}

/// Print one evaluation the way the circuit listing expects it.
fn write_evaluation<W: Write>(out: &mut W, evaluation: &Evaluation) -> Result<(), ChipError> {
    writeln!(out, "Computation Starts").map_err(write_error)?;
    for diagnostic in &evaluation.diagnostics {
        log_diagnostic(diagnostic);
        writeln!(out, "Error: {}", diagnostic).map_err(write_error)?;
    }
    writeln!(
        out,
        "The output value from this circuit is {}",
        evaluation.value
    )
    .map_err(write_error)
}

fn write_report<W: Write>(out: &mut W, report: &ConnectionReport) -> Result<(), ChipError> {
    writeln!(out, "{}", REPORT_HEADER).map_err(write_error)?;
    write!(out, "{}", report).map_err(write_error)
}

// =============================================================================
// RUN COMMAND
// =============================================================================

#[derive(Serialize)]
struct RunOutput<'a> {
    chips: usize,
    outcomes: &'a [Outcome],
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ConnectionReport>,
}

/// Execute a script, printing every evaluation and then the report.
///
/// In text mode, output for commands before a fatal error is still written.
pub fn cmd_run<W: Write>(
    file: Option<&Path>,
    settings: &RunSettings,
    out: &mut W,
) -> Result<(), ChipError> {
    settings.validate()?;
    let script = load_script(file)?;
    let mut session = Session::from_script(&script)?.with_max_depth(settings.max_depth);

    tracing::info!(
        "Running {} commands against {} chips",
        script.commands.len(),
        session.chip_count()
    );

    if settings.json {
        let outcomes = session.run(&script.commands)?;
        log_diagnostics(&outcomes);
        let output = RunOutput {
            chips: session.chip_count(),
            outcomes: &outcomes,
            report: settings.report.then(|| session.report()),
        };
        return write_json(out, &output);
    }

    for command in &script.commands {
        tracing::debug!("Executing {} command", command.keyword());
        if let Outcome::Evaluated(evaluation) = session.execute(command)? {
            write_evaluation(out, &evaluation)?;
        }
    }

    if settings.report {
        write_report(out, &session.report())?;
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

#[derive(Serialize)]
struct CheckOutput<'a> {
    chips: usize,
    commands: usize,
    evaluations: usize,
    unwired: Vec<&'a ChipId>,
}

/// Parse and wire a script; `Evaluate` commands only check the chip exists.
pub fn cmd_check<W: Write>(
    file: Option<&Path>,
    settings: &RunSettings,
    out: &mut W,
) -> Result<(), ChipError> {
    let script = load_script(file)?;
    let mut session = Session::from_script(&script)?;

    for command in &script.commands {
        match command {
            Command::Evaluate { chip } => {
                session.graph().lookup(chip)?;
            }
            Command::Connect { .. } | Command::SetInput { .. } => {
                session.execute(command)?;
            }
        }
    }

    let unwired: Vec<&ChipId> = session
        .graph()
        .chips()
        .filter(|chip| !chip.is_fully_wired())
        .map(|chip| chip.id())
        .collect();
    if !unwired.is_empty() {
        tracing::warn!("{} chips are not fully wired", unwired.len());
    }

    let output = CheckOutput {
        chips: session.chip_count(),
        commands: script.commands.len(),
        evaluations: script.evaluation_count(),
        unwired,
    };

    if settings.json {
        return write_json(out, &output);
    }

    writeln!(
        out,
        "Circuit OK: {} chips, {} commands ({} evaluations)",
        output.chips, output.commands, output.evaluations
    )
    .map_err(write_error)?;

    if !output.unwired.is_empty() {
        let names: Vec<&str> = output.unwired.iter().map(|id| id.as_str()).collect();
        writeln!(out, "Not fully wired: {}", names.join(", ")).map_err(write_error)?;
    }

    Ok(())
}

// =============================================================================
// REPORT COMMAND
// =============================================================================

/// Execute a script silently and print only the connection report.
pub fn cmd_report<W: Write>(
    file: Option<&Path>,
    settings: &RunSettings,
    out: &mut W,
) -> Result<(), ChipError> {
    settings.validate()?;
    let script = load_script(file)?;
    let mut session = Session::from_script(&script)?.with_max_depth(settings.max_depth);

    let outcomes = session.run(&script.commands)?;
    log_diagnostics(&outcomes);

    let report = session.report();
    if settings.json {
        return write_json(out, &report);
    }
    write!(out, "{}", report).map_err(write_error)
}
