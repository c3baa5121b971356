//! Command executor.
//!
//! [`Interpreter::execute_line`] is the single re-entrant entry point: `EXEC`
//! and `IF CELL ... THEN` call back into it with `depth + 1`. Every command
//! that does not fail leaves exactly one new snapshot behind, except `UNDO`
//! and a zero-length `JUMP`.

use dino_script::{parse_command_line, Command, Direction};
use tracing::{debug, warn};

use crate::config::InterpreterConfig;
use crate::diagnostics::{ExecError, Location, Outcome, SemanticError, Warning};
use crate::frontend::Frontend;
use crate::snapshot::SnapshotHistory;
use crate::terrain::Terrain;
use crate::world::World;

pub struct Interpreter<F: Frontend> {
    world: World,
    history: SnapshotHistory,
    config: InterpreterConfig,
    frontend: F,
}

impl<F: Frontend> Interpreter<F> {
    /// Take ownership of an initialised world and record it as the first
    /// snapshot.
    pub fn new(world: World, config: InterpreterConfig, frontend: F) -> Self {
        let mut history = SnapshotHistory::with_capacity(64);
        history.push(&world);
        Self {
            world,
            history,
            config,
            frontend,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Drop the history and hand back the final world.
    pub fn into_world(mut self) -> World {
        self.history.clear();
        self.world
    }

    /// Draw the current world once, without pausing.
    pub fn draw(&mut self) {
        if let Err(err) = self.frontend.draw(&self.world) {
            warn!(target: "dino::interp", error = %err, "frame.draw_failed");
        }
    }

    /// Parse and run one script line at nesting `depth` (0 for the top-level
    /// script).
    pub fn execute_line(
        &mut self,
        line: &str,
        location: &Location,
        depth: u32,
    ) -> Result<Outcome, ExecError> {
        match parse_command_line(line).map_err(ExecError::syntax(location))? {
            Some(command) => self.execute(command, location, depth),
            None => Ok(Outcome::Skipped),
        }
    }

    /// Run an already parsed command.
    pub fn execute(
        &mut self,
        command: Command,
        location: &Location,
        depth: u32,
    ) -> Result<Outcome, ExecError> {
        let name = command.name();
        let outcome = match command {
            Command::Undo => {
                let restored = self.history.undo(&mut self.world);
                debug!(target: "dino::interp", %location, restored, "command.applied=undo");
                self.refresh();
                return Ok(Outcome::Success);
            }
            Command::Jump { distance: 0, .. } => return Ok(Outcome::Success),
            Command::IfCell { x, y, symbol, then } => {
                let cell = self.world.wrap(x, y);
                let found = self.world.effective_symbol(cell);
                if found == symbol {
                    let limit = self.config.max_nesting_depth;
                    if depth >= limit {
                        return Err(ExecError::semantic(location)(
                            SemanticError::NestingTooDeep { limit },
                        ));
                    }
                    debug!(target: "dino::interp", %location, %cell, "if_cell.matched");
                    return self.execute_line(&then, location, depth + 1);
                }
                debug!(target: "dino::interp", %location, %cell, %found, "if_cell.skipped");
                Outcome::Success
            }
            Command::Exec { path } => {
                self.run_include(&path, location, depth)?;
                Outcome::Success
            }
            Command::Move(direction) => self
                .apply_move(direction)
                .map_err(ExecError::semantic(location))?,
            Command::Paint(letter) => {
                let here = self.world.agent();
                self.world.set_paint(here, letter);
                Outcome::Success
            }
            Command::Dig(direction) => {
                let target = self.world.step(direction);
                let next = match self.world.terrain(target) {
                    Terrain::Mound => Terrain::Empty,
                    Terrain::Empty | Terrain::Pit | Terrain::Tree | Terrain::Stone => Terrain::Pit,
                };
                self.world.set_terrain(target, next);
                Outcome::Success
            }
            Command::Mound(direction) => {
                let target = self.world.step(direction);
                let next = match self.world.terrain(target) {
                    Terrain::Pit => Terrain::Empty,
                    Terrain::Empty | Terrain::Mound | Terrain::Tree | Terrain::Stone => {
                        Terrain::Mound
                    }
                };
                self.world.set_terrain(target, next);
                Outcome::Success
            }
            Command::Grow(direction) => self
                .replace_target(direction, Terrain::Empty, Terrain::Tree, |found| {
                    SemanticError::CannotGrow { found }
                })
                .map_err(ExecError::semantic(location))?,
            Command::Cut(direction) => self
                .replace_target(direction, Terrain::Tree, Terrain::Empty, |found| {
                    SemanticError::NoTreeToCut { found }
                })
                .map_err(ExecError::semantic(location))?,
            Command::Make(direction) => self
                .replace_target(direction, Terrain::Empty, Terrain::Stone, |found| {
                    SemanticError::CannotMake { found }
                })
                .map_err(ExecError::semantic(location))?,
            Command::Push(direction) => self
                .apply_push(direction)
                .map_err(ExecError::semantic(location))?,
            Command::Jump {
                direction,
                distance,
            } => self
                .apply_jump(direction, distance)
                .map_err(ExecError::semantic(location))?,
        };

        self.history.push(&self.world);

        match outcome {
            Outcome::Warning(warning) => {
                warn!(
                    target: "dino::interp",
                    %location,
                    command = name,
                    %warning,
                    "command.warning"
                );
                self.frontend.warning(location, &warning);
            }
            Outcome::Success => {
                debug!(
                    target: "dino::interp",
                    %location,
                    command = name,
                    agent = %self.world.agent(),
                    history = self.history.len(),
                    "command.applied"
                );
                self.refresh();
            }
            Outcome::Skipped => {}
        }

        Ok(outcome)
    }

    fn refresh(&mut self) {
        if !self.config.paces_commands() {
            return;
        }
        self.draw();
        self.frontend.pause(self.config.refresh_interval());
    }

    fn apply_move(&mut self, direction: Direction) -> Result<Outcome, SemanticError> {
        let target = self.world.step(direction);
        match self.world.terrain(target) {
            Terrain::Pit => Err(SemanticError::SteppedOnPit),
            terrain @ (Terrain::Mound | Terrain::Tree | Terrain::Stone) => {
                Ok(Outcome::Warning(Warning::Blocked { terrain }))
            }
            Terrain::Empty => {
                self.world.move_agent(target);
                Ok(Outcome::Success)
            }
        }
    }

    /// Turn the neighbouring `expected` terrain into `replacement`, failing on
    /// anything else.
    fn replace_target(
        &mut self,
        direction: Direction,
        expected: Terrain,
        replacement: Terrain,
        mismatch: impl FnOnce(Terrain) -> SemanticError,
    ) -> Result<Outcome, SemanticError> {
        let target = self.world.step(direction);
        let found = self.world.terrain(target);
        if found != expected {
            return Err(mismatch(found));
        }
        self.world.set_terrain(target, replacement);
        Ok(Outcome::Success)
    }

    fn apply_push(&mut self, direction: Direction) -> Result<Outcome, SemanticError> {
        let target = self.world.step(direction);
        match self.world.terrain(target) {
            Terrain::Stone => {}
            found @ (Terrain::Empty | Terrain::Pit | Terrain::Mound | Terrain::Tree) => {
                return Err(SemanticError::NoStoneToPush { found });
            }
        }

        let beyond = self.world.step_from(target, direction);
        match self.world.terrain(beyond) {
            found @ (Terrain::Mound | Terrain::Tree | Terrain::Stone) => {
                return Err(SemanticError::PushBlocked { found });
            }
            // The stone drops into the pit and is gone; the pit stays.
            Terrain::Pit => self.world.set_terrain(target, Terrain::Empty),
            Terrain::Empty => {
                self.world.set_terrain(target, Terrain::Empty);
                self.world.set_terrain(beyond, Terrain::Stone);
            }
        }
        self.world.move_agent(target);
        Ok(Outcome::Success)
    }

    fn apply_jump(&mut self, direction: Direction, distance: u64) -> Result<Outcome, SemanticError> {
        // Past one full lap the path only revisits cells already scanned.
        let lap = u64::from(match direction {
            Direction::Left | Direction::Right => self.world.width(),
            Direction::Up | Direction::Down => self.world.height(),
        });

        let start = self.world.agent();
        let mut cursor = start;
        for _ in 0..distance.min(lap) {
            cursor = self.world.step_from(cursor, direction);
            match self.world.terrain(cursor) {
                Terrain::Mound => return Ok(Outcome::Warning(Warning::JumpOverMound)),
                terrain @ (Terrain::Tree | Terrain::Stone) => {
                    return Ok(Outcome::Warning(Warning::JumpBlocked { terrain }));
                }
                Terrain::Empty | Terrain::Pit => {}
            }
        }

        let landing = self.world.advance(start, direction, distance);
        if self.world.terrain(landing) == Terrain::Pit {
            return Err(SemanticError::LandedInPit);
        }
        self.world.move_agent(landing);
        Ok(Outcome::Success)
    }
}
