use std::num::ParseIntError;

use thiserror::Error;

use crate::{Command, Direction, HeaderDirective};

/// Lines starting with this marker are ignored.
pub const COMMENT_PREFIX: &str = "//";

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("leading spaces")]
    LeadingWhitespace,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing {argument} in {keyword} command")]
    MissingArgument {
        keyword: &'static str,
        argument: &'static str,
    },
    #[error("invalid direction '{value}' in {keyword} command")]
    InvalidDirection {
        keyword: &'static str,
        value: String,
    },
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("negative jump distance {0}")]
    NegativeDistance(i64),
    #[error("invalid paint character '{0}' (must be a-z)")]
    InvalidPaint(String),
    #[error("invalid cell symbol '{0}' (must be a single character)")]
    InvalidSymbol(String),
    #[error("expected '{expected}' in IF CELL command, found '{found}'")]
    ExpectedKeyword {
        expected: &'static str,
        found: String,
    },
    #[error("extra characters after {keyword} command: '{extra}'")]
    TrailingInput {
        keyword: &'static str,
        extra: String,
    },
}

/// True for lines that carry nothing to execute.
pub fn is_blank_or_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_PREFIX)
}

/// Parse one script line into a command.
///
/// Blank lines and comments yield `Ok(None)`. The line must already be
/// stripped of its line terminator; any other leading or trailing text is
/// significant.
pub fn parse_command_line(input: &str) -> Result<Option<Command>, CommandParseError> {
    if is_blank_or_comment(input) {
        return Ok(None);
    }
    reject_leading_whitespace(input)?;

    let (keyword, rest) = split_keyword(input);
    let mut args = rest.split_whitespace();

    let command = match keyword {
        "MOVE" => Command::Move(directional("MOVE", &mut args)?),
        "DIG" => Command::Dig(directional("DIG", &mut args)?),
        "MOUND" => Command::Mound(directional("MOUND", &mut args)?),
        "GROW" => Command::Grow(directional("GROW", &mut args)?),
        "CUT" => Command::Cut(directional("CUT", &mut args)?),
        "MAKE" => Command::Make(directional("MAKE", &mut args)?),
        "PUSH" => Command::Push(directional("PUSH", &mut args)?),
        "JUMP" => {
            let direction = expect_direction("JUMP", &mut args)?;
            let distance_str = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "JUMP",
                argument: "distance",
            })?;
            let value = parse_i64(distance_str, "jump distance")?;
            let distance =
                u64::try_from(value).map_err(|_| CommandParseError::NegativeDistance(value))?;
            expect_end("JUMP", &mut args)?;
            Command::Jump {
                direction,
                distance,
            }
        }
        "PAINT" => {
            let token = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "PAINT",
                argument: "character",
            })?;
            let letter = single_char(token)
                .filter(char::is_ascii_lowercase)
                .ok_or_else(|| CommandParseError::InvalidPaint(token.to_string()))?;
            expect_end("PAINT", &mut args)?;
            Command::Paint(letter)
        }
        "EXEC" => {
            let path = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "EXEC",
                argument: "file name",
            })?;
            expect_end("EXEC", &mut args)?;
            Command::Exec {
                path: path.to_string(),
            }
        }
        "UNDO" => {
            expect_end("UNDO", &mut args)?;
            Command::Undo
        }
        "IF" => parse_if_cell(input, rest)?,
        _ => return Err(CommandParseError::UnknownCommand(input.to_string())),
    };

    Ok(Some(command))
}

/// Parse a `SIZE`, `START` or `LOAD` header line.
///
/// Returns `Ok(None)` when the line is not a header directive at all, which
/// lets the caller decide whether that is an error at its position.
pub fn parse_header_line(input: &str) -> Result<Option<HeaderDirective>, CommandParseError> {
    reject_leading_whitespace(input)?;

    let (keyword, rest) = split_keyword(input);
    let mut args = rest.split_whitespace();

    let directive = match keyword {
        "SIZE" => {
            let width_str = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "SIZE",
                argument: "width",
            })?;
            let height_str = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "SIZE",
                argument: "height",
            })?;
            let width = parse_i64(width_str, "map width")?;
            let height = parse_i64(height_str, "map height")?;
            expect_end("SIZE", &mut args)?;
            HeaderDirective::Size { width, height }
        }
        "START" => {
            let x_str = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "START",
                argument: "x",
            })?;
            let y_str = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "START",
                argument: "y",
            })?;
            let x = parse_i64(x_str, "start x")?;
            let y = parse_i64(y_str, "start y")?;
            expect_end("START", &mut args)?;
            HeaderDirective::Start { x, y }
        }
        "LOAD" => {
            let path = args.next().ok_or(CommandParseError::MissingArgument {
                keyword: "LOAD",
                argument: "file name",
            })?;
            expect_end("LOAD", &mut args)?;
            HeaderDirective::Load {
                path: path.to_string(),
            }
        }
        _ => return Ok(None),
    };

    Ok(Some(directive))
}

fn parse_if_cell(line: &str, rest: &str) -> Result<Command, CommandParseError> {
    let rest = match next_token(rest) {
        Some(("CELL", rest)) => rest,
        _ => return Err(CommandParseError::UnknownCommand(line.to_string())),
    };

    let (x_str, rest) = next_token(rest).ok_or(CommandParseError::MissingArgument {
        keyword: "IF CELL",
        argument: "cell x",
    })?;
    let x = parse_i64(x_str, "cell x")?;
    let (y_str, rest) = next_token(rest).ok_or(CommandParseError::MissingArgument {
        keyword: "IF CELL",
        argument: "cell y",
    })?;
    let y = parse_i64(y_str, "cell y")?;

    let rest = expect_literal("IS", rest)?;
    let (symbol_str, rest) = next_token(rest).ok_or(CommandParseError::MissingArgument {
        keyword: "IF CELL",
        argument: "symbol",
    })?;
    let symbol = single_char(symbol_str)
        .ok_or_else(|| CommandParseError::InvalidSymbol(symbol_str.to_string()))?;

    let rest = expect_literal("THEN", rest)?;
    let then = rest.trim();
    if then.is_empty() {
        return Err(CommandParseError::MissingArgument {
            keyword: "IF CELL",
            argument: "command after THEN",
        });
    }

    Ok(Command::IfCell {
        x,
        y,
        symbol,
        then: then.to_string(),
    })
}

fn reject_leading_whitespace(input: &str) -> Result<(), CommandParseError> {
    if input.starts_with(char::is_whitespace) {
        return Err(CommandParseError::LeadingWhitespace);
    }
    Ok(())
}

fn split_keyword(input: &str) -> (&str, &str) {
    input.split_once(char::is_whitespace).unwrap_or((input, ""))
}

fn next_token(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find(char::is_whitespace) {
        Some(end) => Some((&trimmed[..end], &trimmed[end..])),
        None => Some((trimmed, "")),
    }
}

fn expect_literal<'a>(expected: &'static str, input: &'a str) -> Result<&'a str, CommandParseError> {
    let (token, rest) = next_token(input).ok_or(CommandParseError::MissingArgument {
        keyword: "IF CELL",
        argument: expected,
    })?;
    if token != expected {
        return Err(CommandParseError::ExpectedKeyword {
            expected,
            found: token.to_string(),
        });
    }
    Ok(rest)
}

fn directional<'a>(
    keyword: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<Direction, CommandParseError> {
    let direction = expect_direction(keyword, args)?;
    expect_end(keyword, args)?;
    Ok(direction)
}

fn expect_direction<'a>(
    keyword: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<Direction, CommandParseError> {
    let token = args.next().ok_or(CommandParseError::MissingArgument {
        keyword,
        argument: "direction",
    })?;
    Direction::from_token(token).ok_or_else(|| CommandParseError::InvalidDirection {
        keyword,
        value: token.to_string(),
    })
}

fn expect_end<'a>(
    keyword: &'static str,
    args: &mut impl Iterator<Item = &'a str>,
) -> Result<(), CommandParseError> {
    match args.next() {
        Some(extra) => Err(CommandParseError::TrailingInput {
            keyword,
            extra: extra.to_string(),
        }),
        None => Ok(()),
    }
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_i64(value: &str, context: &'static str) -> Result<i64, CommandParseError> {
    value
        .parse::<i64>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}
