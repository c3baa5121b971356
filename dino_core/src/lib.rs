//! Interpreter for the dino grid-world scripting language.
//!
//! A script sizes a toroidal grid, places the dino, then runs commands that
//! move it and reshape terrain. Every applied command is recorded in a
//! [`SnapshotHistory`] so `UNDO` can step back. [`run_script_file`] drives a
//! full run; [`Interpreter`] executes individual lines against an existing
//! [`World`].

pub mod config;
mod diagnostics;
pub mod frontend;
mod interpreter;
mod map_file;
mod script;
mod session;
mod snapshot;
mod terrain;
mod world;

pub use config::{load_interpreter_config, ConfigError, InterpreterConfig};
pub use diagnostics::{ExecError, Location, Outcome, SemanticError, Warning};
pub use frontend::{Frontend, HeadlessFrontend, TerminalFrontend};
pub use interpreter::Interpreter;
pub use map_file::{load_map, parse_map, save_map, MapLoadError};
pub use session::{run_script, run_script_file, HeaderParseError, SessionError};
pub use snapshot::SnapshotHistory;
pub use terrain::{Cell, Terrain, AGENT_SYMBOL};
pub use world::{Position, Snapshot, World, WorldError, MAX_DIMENSION, MIN_DIMENSION};

pub use dino_script::{Command, Direction};
