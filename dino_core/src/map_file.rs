//! Grid text files: reading `LOAD` maps and writing the final dump.
//!
//! Both directions use the [`World`] display format, so a dump can be loaded
//! back unchanged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::terrain::{Cell, Terrain, AGENT_SYMBOL};
use crate::world::{Position, World};

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("incomplete LOAD: expected {expected} rows, found {found}")]
    Incomplete { expected: u32, found: u32 },
    #[error("invalid LOAD format at row {row}, column {column}")]
    InvalidFormat { row: u32, column: u32 },
    #[error("invalid LOAD format: unknown symbol '{symbol}' at row {row}, column {column}")]
    InvalidSymbol { row: u32, column: u32, symbol: char },
    #[error("no # in LOAD")]
    MissingAgent,
    #[error("cannot open LOAD file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Decode one map symbol. `None` for the agent marker and unknown symbols.
fn cell_for_symbol(symbol: char) -> Option<Cell> {
    if symbol.is_ascii_lowercase() {
        return Some(Cell::painted(symbol));
    }
    Terrain::from_symbol(symbol).map(Cell::new)
}

/// Overwrite every cell of `world` and the agent position from map text.
///
/// `world` is only modified when the whole map is valid.
pub fn parse_map(text: &str, world: &mut World) -> Result<(), MapLoadError> {
    let (width, height) = (world.width(), world.height());
    let rows: Vec<&str> = text
        .lines()
        .take(height as usize)
        .map(|row| row.trim_end_matches('\r'))
        .collect();
    if rows.len() < height as usize {
        return Err(MapLoadError::Incomplete {
            expected: height,
            found: rows.len() as u32,
        });
    }

    let mut cells = Vec::with_capacity((width * height) as usize);
    let mut agent = None;
    for (y, row) in (0u32..).zip(&rows) {
        let mut chars = row.chars();
        for x in 0..width {
            let symbol = chars
                .next()
                .ok_or(MapLoadError::InvalidFormat { row: y, column: x })?;
            if chars.next() != Some(' ') {
                return Err(MapLoadError::InvalidFormat { row: y, column: x });
            }
            let cell = if symbol == AGENT_SYMBOL {
                agent = Some(Position::new(x, y));
                Cell::default()
            } else {
                cell_for_symbol(symbol).ok_or(MapLoadError::InvalidSymbol {
                    row: y,
                    column: x,
                    symbol,
                })?
            };
            cells.push((Position::new(x, y), cell));
        }
    }

    let agent = agent.ok_or(MapLoadError::MissingAgent)?;
    for (position, cell) in cells {
        world.set_cell(position, cell);
    }
    world.move_agent(agent);
    Ok(())
}

/// Read `path` and apply it to `world` with [`parse_map`].
pub fn load_map(path: &Path, world: &mut World) -> Result<(), MapLoadError> {
    let text = fs::read_to_string(path).map_err(|source| MapLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text, world)
}

/// Write the dump of `world` to `path`, replacing any existing file.
pub fn save_map(path: &Path, world: &World) -> io::Result<()> {
    fs::write(path, world.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_map(width: usize, height: usize) -> Vec<String> {
        vec!["_ ".repeat(width); height]
    }

    fn set_symbol(rows: &mut [String], x: usize, y: usize, symbol: char) {
        let mut chars: Vec<char> = rows[y].chars().collect();
        chars[x * 2] = symbol;
        rows[y] = chars.into_iter().collect();
    }

    #[test]
    fn map_sets_terrain_paint_and_agent() {
        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 0, 0, '@');
        set_symbol(&mut rows, 1, 0, 'k');
        set_symbol(&mut rows, 9, 9, '%');
        set_symbol(&mut rows, 4, 2, '#');
        let mut world = World::new(10, 10).unwrap();
        parse_map(&rows.join("\n"), &mut world).unwrap();

        assert_eq!(world.terrain(Position::new(0, 0)), Terrain::Stone);
        assert_eq!(world.cell(Position::new(1, 0)), Cell::painted('k'));
        assert_eq!(world.terrain(Position::new(9, 9)), Terrain::Pit);
        assert_eq!(world.agent(), Position::new(4, 2));
        assert_eq!(world.cell(Position::new(4, 2)), Cell::default());
    }

    #[test]
    fn last_agent_marker_wins() {
        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 1, 1, '#');
        set_symbol(&mut rows, 7, 8, '#');
        let mut world = World::new(10, 10).unwrap();
        parse_map(&rows.join("\n"), &mut world).unwrap();
        assert_eq!(world.agent(), Position::new(7, 8));
        assert_eq!(world.effective_symbol(Position::new(1, 1)), '_');
    }

    #[test]
    fn extra_rows_and_columns_are_ignored() {
        let mut rows = blank_map(12, 11);
        set_symbol(&mut rows, 0, 0, '#');
        rows[10] = "garbage".to_string();
        let mut world = World::new(10, 10).unwrap();
        parse_map(&rows.join("\n"), &mut world).unwrap();
    }

    #[test]
    fn malformed_maps_are_rejected_without_changes() {
        let mut world = World::new(10, 10).unwrap();
        let untouched = world.clone();

        let short = blank_map(10, 9).join("\n");
        assert!(matches!(
            parse_map(&short, &mut world),
            Err(MapLoadError::Incomplete {
                expected: 10,
                found: 9
            })
        ));

        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 0, 0, '#');
        rows[3] = "_ _ _".to_string();
        assert!(matches!(
            parse_map(&rows.join("\n"), &mut world),
            Err(MapLoadError::InvalidFormat { row: 3, column: 2 })
        ));

        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 0, 0, '#');
        rows[5] = rows[5].replacen("_ _", "__ ", 1);
        assert!(matches!(
            parse_map(&rows.join("\n"), &mut world),
            Err(MapLoadError::InvalidFormat { row: 5, column: 0 })
        ));

        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 0, 0, '#');
        set_symbol(&mut rows, 2, 6, 'X');
        assert!(matches!(
            parse_map(&rows.join("\n"), &mut world),
            Err(MapLoadError::InvalidSymbol {
                row: 6,
                column: 2,
                symbol: 'X'
            })
        ));

        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 3, 3, '@');
        let err = parse_map(&rows.join("\n"), &mut world).unwrap_err();
        assert!(matches!(err, MapLoadError::MissingAgent));
        assert_eq!(err.to_string(), "no # in LOAD");

        assert_eq!(world, untouched);
    }

    #[test]
    fn dump_text_loads_back_to_the_same_world() {
        let mut world = World::new(11, 10).unwrap();
        world.set_terrain(Position::new(3, 4), Terrain::Mound);
        world.set_terrain(Position::new(10, 9), Terrain::Tree);
        world.set_paint(Position::new(0, 9), 'z');
        world.move_agent(Position::new(6, 6));

        let mut loaded = World::new(11, 10).unwrap();
        parse_map(&world.to_string(), &mut loaded).unwrap();
        assert_eq!(loaded, world);
    }

    #[test]
    fn crlf_rows_are_accepted() {
        let mut rows = blank_map(10, 10);
        set_symbol(&mut rows, 2, 2, '#');
        let mut world = World::new(10, 10).unwrap();
        parse_map(&rows.join("\r\n"), &mut world).unwrap();
        assert_eq!(world.agent(), Position::new(2, 2));
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.map");
        let mut world = World::new(10, 12).unwrap();
        world.set_terrain(Position::new(2, 11), Terrain::Stone);
        world.set_paint(Position::new(9, 0), 'a');
        world.move_agent(Position::new(8, 8));
        save_map(&path, &world).unwrap();

        let mut loaded = World::new(10, 12).unwrap();
        load_map(&path, &mut loaded).unwrap();
        assert_eq!(loaded, world);
    }

    #[test]
    fn missing_file_names_the_path() {
        let mut world = World::new(10, 10).unwrap();
        let err = load_map(Path::new("no/such.map"), &mut world).unwrap_err();
        assert!(matches!(err, MapLoadError::Read { .. }));
        assert!(err.to_string().contains("no/such.map"));
    }
}
