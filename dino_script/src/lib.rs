//! Command language for the dino grid world.
//!
//! This crate only knows about text: it turns script lines into typed
//! [`Command`]s and header directives without touching any world state, so
//! the interpreter in `dino_core` and the tests can share one grammar.

mod command_text;
mod commands;

pub use command_text::{
    is_blank_or_comment, parse_command_line, parse_header_line, CommandParseError,
    COMMENT_PREFIX,
};
pub use commands::{Command, Direction, HeaderDirective};
