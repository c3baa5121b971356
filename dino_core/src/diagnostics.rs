use std::fmt;
use std::io;
use std::path::PathBuf;

use dino_script::CommandParseError;
use thiserror::Error;

use crate::terrain::Terrain;

/// Script file and 1-based line a diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub source: String,
    pub line: usize,
}

impl Location {
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}", self.source, self.line)
    }
}

/// How a command that did not fail finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank or comment line; nothing ran.
    Skipped,
    Success,
    /// The command ran but could not do what it asked for.
    Warning(Warning),
}

/// Non-fatal refusals. The command is still recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    Blocked { terrain: Terrain },
    JumpOverMound,
    JumpBlocked { terrain: Terrain },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Blocked { terrain } => write!(f, "cannot step on obstacle ({terrain})"),
            Warning::JumpOverMound => f.write_str("cannot jump over mound"),
            Warning::JumpBlocked { terrain } => {
                write!(f, "cannot jump over obstacle ({terrain})")
            }
        }
    }
}

/// Terrain preconditions and include failures that abort a run.
#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("stepped on pit")]
    SteppedOnPit,
    #[error("jump landed on pit")]
    LandedInPit,
    #[error("cannot grow tree on {found} cell")]
    CannotGrow { found: Terrain },
    #[error("no tree to cut (found {found})")]
    NoTreeToCut { found: Terrain },
    #[error("cannot make stone on {found} cell")]
    CannotMake { found: Terrain },
    #[error("no stone to push (found {found})")]
    NoStoneToPush { found: Terrain },
    #[error("cannot push stone into obstacle ({found})")]
    PushBlocked { found: Terrain },
    #[error("nesting too deep (limit {limit})")]
    NestingTooDeep { limit: u32 },
    #[error("cannot open exec file {path:?}: {source}")]
    OpenScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read exec file {path:?}: {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal failure of a line, tagged with where it happened.
///
/// Errors raised inside `EXEC` files or `IF CELL` branches keep the location
/// of the innermost failing line.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{error} ({location})")]
    Syntax {
        location: Location,
        #[source]
        error: CommandParseError,
    },
    #[error("{error} ({location})")]
    Semantic {
        location: Location,
        #[source]
        error: SemanticError,
    },
}

impl ExecError {
    pub(crate) fn syntax(location: &Location) -> impl Fn(CommandParseError) -> ExecError + '_ {
        move |error| ExecError::Syntax {
            location: location.clone(),
            error,
        }
    }

    pub(crate) fn semantic(location: &Location) -> impl Fn(SemanticError) -> ExecError + '_ {
        move |error| ExecError::Semantic {
            location: location.clone(),
            error,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            ExecError::Syntax { location, .. } | ExecError::Semantic { location, .. } => location,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ExecError::Syntax { .. })
    }
}
