use std::fmt;

/// Marker drawn on the cell occupied by the dino.
pub const AGENT_SYMBOL: char = '#';

/// Base layer of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Terrain {
    #[default]
    Empty,
    Pit,
    Mound,
    Tree,
    Stone,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Empty,
        Terrain::Pit,
        Terrain::Mound,
        Terrain::Tree,
        Terrain::Stone,
    ];

    /// Character used in scripts, map files and frames.
    pub fn symbol(self) -> char {
        match self {
            Terrain::Empty => '_',
            Terrain::Pit => '%',
            Terrain::Mound => '^',
            Terrain::Tree => '&',
            Terrain::Stone => '@',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '_' => Some(Terrain::Empty),
            '%' => Some(Terrain::Pit),
            '^' => Some(Terrain::Mound),
            '&' => Some(Terrain::Tree),
            '@' => Some(Terrain::Stone),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Terrain::Empty => "empty",
            Terrain::Pit => "pit",
            Terrain::Mound => "mound",
            Terrain::Tree => "tree",
            Terrain::Stone => "stone",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terrain plus the optional paint letter of one grid position.
///
/// Paint only means something on empty terrain; [`crate::World::set_terrain`]
/// drops it as soon as the cell stops being empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub terrain: Terrain,
    pub paint: Option<char>,
}

impl Cell {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            paint: None,
        }
    }

    pub fn painted(letter: char) -> Self {
        Self {
            terrain: Terrain::Empty,
            paint: Some(letter),
        }
    }

    /// Symbol of the cell ignoring the agent.
    pub fn symbol(&self) -> char {
        match (self.terrain, self.paint) {
            (Terrain::Empty, Some(letter)) => letter,
            (terrain, _) => terrain.symbol(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_and_stay_distinct() {
        let mut seen = std::collections::HashSet::new();
        for terrain in Terrain::ALL {
            assert_eq!(Terrain::from_symbol(terrain.symbol()), Some(terrain));
            assert!(seen.insert(terrain.symbol()), "duplicate symbol {terrain}");
            assert_ne!(terrain.symbol(), AGENT_SYMBOL);
        }
        assert_eq!(Terrain::from_symbol('a'), None);
        assert_eq!(Terrain::from_symbol(AGENT_SYMBOL), None);
    }

    #[test]
    fn paint_shows_only_on_empty_terrain() {
        assert_eq!(Cell::painted('q').symbol(), 'q');
        let stale = Cell {
            terrain: Terrain::Pit,
            paint: Some('q'),
        };
        assert_eq!(stale.symbol(), '%');
        assert_eq!(Cell::default().symbol(), '_');
    }
}
