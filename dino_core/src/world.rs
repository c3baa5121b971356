//! Toroidal grid holding terrain, paint and the dino's position.

use std::fmt;

use dino_script::Direction;
use thiserror::Error;

use crate::terrain::{Cell, Terrain, AGENT_SYMBOL};

/// Smallest accepted width or height.
pub const MIN_DIMENSION: u32 = 10;
/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("invalid size {width}x{height} (each side must be 10-100)")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
}

/// The complete mutable state a script operates on.
///
/// Shape is fixed at construction. Every coordinate computation wraps around
/// both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    agent: Position,
}

/// Frozen copy of the cells and agent position of a [`World`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    cells: Vec<Cell>,
    agent: Position,
}

impl Snapshot {
    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl World {
    /// Create an all-empty, unpainted world with the agent at the origin.
    pub fn new(width: i64, height: i64) -> Result<Self, WorldError> {
        let valid = |side: i64| (MIN_DIMENSION as i64..=MAX_DIMENSION as i64).contains(&side);
        if !valid(width) || !valid(height) {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let (width, height) = (width as u32, height as u32);
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
            agent: Position::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    #[inline]
    fn index(&self, position: Position) -> usize {
        debug_assert!(position.x < self.width && position.y < self.height);
        (position.y * self.width + position.x) as usize
    }

    pub fn cell(&self, position: Position) -> Cell {
        self.cells[self.index(position)]
    }

    pub fn terrain(&self, position: Position) -> Terrain {
        self.cell(position).terrain
    }

    /// Checked conversion used for coordinates that must not wrap, such as
    /// the `START` header.
    pub fn position(&self, x: i64, y: i64) -> Result<Position, WorldError> {
        if (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y) {
            Ok(Position::new(x as u32, y as u32))
        } else {
            Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Reduce arbitrary coordinates onto the torus.
    pub fn wrap(&self, x: i64, y: i64) -> Position {
        Position::new(
            x.rem_euclid(self.width as i64) as u32,
            y.rem_euclid(self.height as i64) as u32,
        )
    }

    /// Cell reached by walking `steps` cells from `from`. Pure.
    pub fn advance(&self, from: Position, direction: Direction, steps: u64) -> Position {
        let (dx, dy) = direction.delta();
        let sx = (steps % self.width as u64) as i64;
        let sy = (steps % self.height as u64) as i64;
        self.wrap(from.x as i64 + dx * sx, from.y as i64 + dy * sy)
    }

    pub fn step_from(&self, from: Position, direction: Direction) -> Position {
        self.advance(from, direction, 1)
    }

    /// Neighbour of the agent in `direction`.
    pub fn step(&self, direction: Direction) -> Position {
        self.step_from(self.agent, direction)
    }

    /// Symbol seen by renderers and by `IF CELL` comparisons.
    pub fn effective_symbol(&self, position: Position) -> char {
        if position == self.agent {
            AGENT_SYMBOL
        } else {
            self.cell(position).symbol()
        }
    }

    pub fn set_terrain(&mut self, position: Position, terrain: Terrain) {
        let index = self.index(position);
        let cell = &mut self.cells[index];
        cell.terrain = terrain;
        if terrain != Terrain::Empty {
            cell.paint = None;
        }
    }

    pub fn set_paint(&mut self, position: Position, letter: char) {
        let index = self.index(position);
        self.cells[index].paint = Some(letter);
    }

    pub(crate) fn set_cell(&mut self, position: Position, cell: Cell) {
        let index = self.index(position);
        self.cells[index] = cell;
    }

    pub fn move_agent(&mut self, position: Position) {
        debug_assert!(position.x < self.width && position.y < self.height);
        self.agent = position;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.cells.clone(),
            agent: self.agent,
        }
    }

    /// Copy a snapshot taken from this world back into it.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        debug_assert_eq!(snapshot.cells.len(), self.cells.len());
        self.cells.clone_from(&snapshot.cells);
        self.agent = snapshot.agent;
    }

    /// One string of effective symbols per row, without separators.
    pub fn symbol_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.effective_symbol(Position::new(x, y)))
                    .collect()
            })
            .collect()
    }
}

/// Grid text format shared by frames and dumps: every symbol followed by a
/// space, one row per line, then an empty line.
impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{} ", self.effective_symbol(Position::new(x, y)))?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}
