//! Top-level script runs: header handling followed by command execution.
//!
//! A top-level script starts with `SIZE w h` and then either `START x y` or
//! `LOAD file`. Only after both lines have been seen does an [`Interpreter`]
//! exist; every later line is a command.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use dino_script::{is_blank_or_comment, parse_header_line, CommandParseError, HeaderDirective};
use thiserror::Error;
use tracing::info;

use crate::config::InterpreterConfig;
use crate::diagnostics::{ExecError, Location};
use crate::frontend::Frontend;
use crate::interpreter::Interpreter;
use crate::map_file::{load_map, MapLoadError};
use crate::world::{World, WorldError};

#[derive(Debug, Error)]
pub enum HeaderParseError {
    #[error("first non-comment must be SIZE")]
    ExpectedSize,
    #[error("LOAD/START expected")]
    ExpectedStartOrLoad,
    #[error(transparent)]
    Syntax(#[from] CommandParseError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Map(#[from] MapLoadError),
    #[error("repeated SIZE/START ({0})")]
    Repeated(&'static str),
    #[error("LOAD must be first")]
    LoadNotFirst,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot open script {path:?}: {source}")]
    OpenScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read script ({location}): {source}")]
    ReadScript {
        location: Location,
        #[source]
        source: io::Error,
    },
    #[error("{error} ({location})")]
    Header {
        location: Location,
        #[source]
        error: HeaderParseError,
    },
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("script {0} ends before SIZE")]
    MissingSize(String),
    #[error("script {0} ends before START or LOAD")]
    MissingStart(String),
}

impl SessionError {
    /// Location of the offending line, when there is one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            SessionError::ReadScript { location, .. } | SessionError::Header { location, .. } => {
                Some(location)
            }
            SessionError::Exec(err) => Some(err.location()),
            SessionError::OpenScript { .. }
            | SessionError::MissingSize(_)
            | SessionError::MissingStart(_) => None,
        }
    }
}

enum Stage<F: Frontend> {
    AwaitingSize(F),
    AwaitingStart(World, F),
    Running(Interpreter<F>),
}

/// Keyword of a header directive appearing in the command section.
fn late_header_keyword(line: &str) -> Option<&'static str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    match line.split_whitespace().next()? {
        "SIZE" => Some("SIZE"),
        "START" => Some("START"),
        "LOAD" => Some("LOAD"),
        _ => None,
    }
}

struct Session<'a> {
    source: &'a str,
    config: &'a InterpreterConfig,
}

impl Session<'_> {
    fn header_error(&self, location: &Location, error: impl Into<HeaderParseError>) -> SessionError {
        SessionError::Header {
            location: location.clone(),
            error: error.into(),
        }
    }

    fn feed<F: Frontend>(
        &self,
        stage: Stage<F>,
        line: &str,
        location: &Location,
    ) -> Result<Stage<F>, SessionError> {
        if is_blank_or_comment(line) && !matches!(stage, Stage::Running(_)) {
            return Ok(stage);
        }
        match stage {
            Stage::Running(mut interp) => {
                match late_header_keyword(line) {
                    Some("LOAD") => {
                        return Err(self.header_error(location, HeaderParseError::LoadNotFirst))
                    }
                    Some(keyword) => {
                        return Err(
                            self.header_error(location, HeaderParseError::Repeated(keyword))
                        )
                    }
                    None => {}
                }
                interp.execute_line(line, location, 0)?;
                Ok(Stage::Running(interp))
            }
            Stage::AwaitingSize(frontend) => {
                let directive = parse_header_line(line)
                    .map_err(|err| self.header_error(location, err))?;
                match directive {
                    Some(HeaderDirective::Size { width, height }) => {
                        let world = World::new(width, height)
                            .map_err(|err| self.header_error(location, err))?;
                        info!(
                            target: "dino::session",
                            source = self.source,
                            width,
                            height,
                            "header.size"
                        );
                        Ok(Stage::AwaitingStart(world, frontend))
                    }
                    _ => Err(self.header_error(location, HeaderParseError::ExpectedSize)),
                }
            }
            Stage::AwaitingStart(mut world, frontend) => {
                let directive = parse_header_line(line)
                    .map_err(|err| self.header_error(location, err))?;
                match directive {
                    Some(HeaderDirective::Start { x, y }) => {
                        let start = world
                            .position(x, y)
                            .map_err(|err| self.header_error(location, err))?;
                        world.move_agent(start);
                        info!(target: "dino::session", %start, "header.start");
                    }
                    Some(HeaderDirective::Load { path }) => {
                        load_map(Path::new(&path), &mut world)
                            .map_err(|err| self.header_error(location, err))?;
                        info!(
                            target: "dino::session",
                            path = path.as_str(),
                            agent = %world.agent(),
                            "header.load"
                        );
                    }
                    Some(directive @ HeaderDirective::Size { .. }) => {
                        return Err(self.header_error(
                            location,
                            HeaderParseError::Repeated(directive.keyword()),
                        ))
                    }
                    None => {
                        return Err(
                            self.header_error(location, HeaderParseError::ExpectedStartOrLoad)
                        )
                    }
                }
                let mut interp = Interpreter::new(world, self.config.clone(), frontend);
                if self.config.display {
                    interp.draw();
                }
                Ok(Stage::Running(interp))
            }
        }
    }
}

/// Run a whole top-level script read from `reader` and return the final
/// world. `source` names the script in diagnostics.
pub fn run_script<R: BufRead, F: Frontend>(
    reader: R,
    source: &str,
    config: &InterpreterConfig,
    frontend: F,
) -> Result<World, SessionError> {
    let session = Session { source, config };
    let mut stage = Stage::AwaitingSize(frontend);

    for (index, line) in reader.lines().enumerate() {
        let location = Location::new(source, index + 1);
        let line = line.map_err(|err| SessionError::ReadScript {
            location: location.clone(),
            source: err,
        })?;
        stage = session.feed(stage, &line, &location)?;
    }

    match stage {
        Stage::Running(interp) => {
            info!(
                target: "dino::session",
                source,
                snapshots = interp.history().len(),
                "script.finished"
            );
            Ok(interp.into_world())
        }
        Stage::AwaitingSize(_) => Err(SessionError::MissingSize(source.to_string())),
        Stage::AwaitingStart(..) => Err(SessionError::MissingStart(source.to_string())),
    }
}

/// [`run_script`] on a file; its path is used as the diagnostic source name.
pub fn run_script_file<F: Frontend>(
    path: &Path,
    config: &InterpreterConfig,
    frontend: F,
) -> Result<World, SessionError> {
    let file = File::open(path).map_err(|source| SessionError::OpenScript {
        path: path.to_path_buf(),
        source,
    })?;
    let source = path.display().to_string();
    run_script(BufReader::new(file), &source, config, frontend)
}
