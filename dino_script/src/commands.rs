use std::fmt;

/// One of the four compass steps understood by directional commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column/row offset of a single step. Rows grow downwards.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "UP" => Some(Direction::Up),
            "DOWN" => Some(Direction::Down),
            "LEFT" => Some(Direction::Left),
            "RIGHT" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Paint(char),
    Dig(Direction),
    Mound(Direction),
    Jump {
        direction: Direction,
        distance: u64,
    },
    Grow(Direction),
    Cut(Direction),
    Make(Direction),
    Push(Direction),
    Exec {
        path: String,
    },
    /// `IF CELL x y IS sym THEN ...`; `then` is the untouched command text.
    IfCell {
        x: i64,
        y: i64,
        symbol: char,
        then: String,
    },
    Undo,
}

impl Command {
    /// Lowercase name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Move(_) => "move",
            Command::Paint(_) => "paint",
            Command::Dig(_) => "dig",
            Command::Mound(_) => "mound",
            Command::Jump { .. } => "jump",
            Command::Grow(_) => "grow",
            Command::Cut(_) => "cut",
            Command::Make(_) => "make",
            Command::Push(_) => "push",
            Command::Exec { .. } => "exec",
            Command::IfCell { .. } => "if_cell",
            Command::Undo => "undo",
        }
    }
}

/// Directives accepted only in the header of a top-level script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderDirective {
    Size { width: i64, height: i64 },
    Start { x: i64, y: i64 },
    Load { path: String },
}

impl HeaderDirective {
    pub fn keyword(&self) -> &'static str {
        match self {
            HeaderDirective::Size { .. } => "SIZE",
            HeaderDirective::Start { .. } => "START",
            HeaderDirective::Load { .. } => "LOAD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn direction_tokens_are_case_sensitive() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_token(direction.as_str()), Some(direction));
        }
        assert_eq!(Direction::from_token("up"), None);
        assert_eq!(Direction::from_token("Up"), None);
    }
}
