//! Running command files line by line, including nested `EXEC` files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::diagnostics::{ExecError, Location, SemanticError};
use crate::frontend::Frontend;
use crate::interpreter::Interpreter;

impl<F: Frontend> Interpreter<F> {
    /// Run every line of `reader` as commands at nesting `depth`.
    ///
    /// Stops at the first fatal error. `source` is the name used in
    /// diagnostics for lines of this reader.
    pub fn run_lines<R: BufRead>(
        &mut self,
        reader: R,
        source: &str,
        depth: u32,
    ) -> Result<(), ExecError> {
        for (index, line) in reader.lines().enumerate() {
            let location = Location::new(source, index + 1);
            let line = line.map_err(|err| {
                ExecError::semantic(&location)(SemanticError::ReadScript {
                    path: PathBuf::from(source),
                    source: err,
                })
            })?;
            self.execute_line(&line, &location, depth)?;
        }
        Ok(())
    }

    /// Body of `EXEC path` issued at `depth`: run the file one level deeper,
    /// then record one more snapshot for the `EXEC` line itself.
    pub(crate) fn run_include(
        &mut self,
        path: &str,
        location: &Location,
        depth: u32,
    ) -> Result<(), ExecError> {
        let limit = self.config().max_nesting_depth;
        if depth >= limit {
            return Err(ExecError::semantic(location)(SemanticError::NestingTooDeep { limit }));
        }

        let file = File::open(Path::new(path)).map_err(|source| {
            ExecError::semantic(location)(SemanticError::OpenScript {
                path: PathBuf::from(path),
                source,
            })
        })?;

        info!(target: "dino::interp", %location, path, depth = depth + 1, "exec.enter");
        self.run_lines(BufReader::new(file), path, depth + 1)?;
        debug!(target: "dino::interp", path, "exec.leave");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::InterpreterConfig;
    use crate::frontend::HeadlessFrontend;
    use crate::terrain::Terrain;
    use crate::world::{Position, World};

    fn interpreter() -> Interpreter<HeadlessFrontend> {
        let mut world = World::new(10, 10).unwrap();
        world.move_agent(Position::new(5, 5));
        Interpreter::new(world, InterpreterConfig::headless(), HeadlessFrontend)
    }

    #[test]
    fn lines_run_in_order_and_skip_comments() {
        let mut interp = interpreter();
        let script = "MOVE UP\n// DIG LEFT\n\nGROW LEFT\n";
        interp.run_lines(Cursor::new(script), "inline", 0).unwrap();
        assert_eq!(interp.world().agent(), Position::new(5, 4));
        assert_eq!(interp.world().terrain(Position::new(4, 4)), Terrain::Tree);
        assert_eq!(interp.world().terrain(Position::new(4, 5)), Terrain::Empty);
        assert_eq!(interp.history().len(), 3);
    }

    #[test]
    fn first_error_stops_the_run_with_its_line_number() {
        let mut interp = interpreter();
        let script = "MOVE UP\nCUT UP\nMOVE UP\n";
        let err = interp
            .run_lines(Cursor::new(script), "main.txt", 0)
            .unwrap_err();
        assert_eq!(err.location(), &Location::new("main.txt", 2));
        assert_eq!(interp.world().agent(), Position::new(5, 4));
    }

    #[test]
    fn missing_exec_file_is_reported_at_the_exec_line() {
        let mut interp = interpreter();
        let err = interp
            .execute_line("EXEC no/such/file.txt", &Location::new("main.txt", 3), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::Semantic {
                error: SemanticError::OpenScript { .. },
                ..
            }
        ));
        assert_eq!(err.location().line, 3);
        assert_eq!(interp.history().len(), 1);
    }

    #[test]
    fn exec_at_the_depth_limit_fails_before_opening() {
        let mut interp = interpreter();
        let limit = interp.config().max_nesting_depth;
        let err = interp
            .execute_line("EXEC no/such/file.txt", &Location::new("deep.txt", 1), limit)
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::Semantic {
                error: SemanticError::NestingTooDeep { limit: 10 },
                ..
            }
        ));
    }

    #[test]
    fn exec_records_each_included_line_and_itself() {
        let dir = tempfile::tempdir().unwrap();
        let include = dir.path().join("two.txt");
        std::fs::write(&include, "MOVE UP\nGROW LEFT\n").unwrap();

        let mut interp = interpreter();
        let line = format!("EXEC {}", include.display());
        interp
            .execute_line(&line, &Location::new("main.txt", 1), 0)
            .unwrap();
        assert_eq!(interp.history().len(), 1 + 2 + 1);
        let after_exec = interp.world().clone();

        interp
            .execute_line("UNDO", &Location::new("main.txt", 2), 0)
            .unwrap();
        assert_eq!(interp.history().len(), 3);
        assert_eq!(interp.world(), &after_exec);

        interp
            .execute_line("UNDO", &Location::new("main.txt", 3), 0)
            .unwrap();
        assert_eq!(interp.world().terrain(Position::new(4, 4)), Terrain::Empty);
        assert_eq!(interp.world().agent(), Position::new(5, 4));
    }
}
