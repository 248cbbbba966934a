use std::{fmt::Display, str::FromStr};

use enum_iterator::{Sequence, all};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Default, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan_distance(&self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    pub fn step(&self, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.offset();
        Some(Cell {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// Neighbors inside `bounds`, always in `Direction` order.
    pub fn manhattan_neighbors(&self, bounds: Bounds) -> impl Iterator<Item = Cell> + use<'_> {
        let origin = *self;
        all::<Direction>()
            .filter_map(move |d| origin.step(d))
            .filter(move |c| bounds.contains(*c))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let mut parts = trimmed.split(',').map(|p| p.trim());
        let row = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Error in {s}: No row given"))?
            .parse()?;
        let col = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Error in {s}: No column given"))?
            .parse()?;
        if parts.next().is_some() {
            anyhow::bail!("Error in {s}: Too many coordinates");
        }
        Ok(Self { row, col })
    }
}

/// Movement directions on the 4-connected grid. Declaration order is the
/// order in which the pathfinder expands neighbors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Sequence)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Serialize)]
pub struct Bounds {
    pub rows: usize,
    pub cols: usize,
}

impl Bounds {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell { row, col }))
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Bounds, Cell};

    #[test]
    fn test_neighbor() {
        let bounds = Bounds::new(10, 15);
        test_neighbor_help(Cell::new(3, 2), bounds, &[(2, 2), (4, 2), (3, 1), (3, 3)]);
        test_neighbor_help(Cell::new(0, 0), bounds, &[(1, 0), (0, 1)]);
        test_neighbor_help(Cell::new(9, 14), bounds, &[(8, 14), (9, 13)]);
    }

    fn test_neighbor_help(c: Cell, bounds: Bounds, expected: &[(usize, usize)]) {
        let neighbors = c.manhattan_neighbors(bounds).collect::<HashSet<_>>();
        for (row, col) in expected.iter() {
            assert!(neighbors.contains(&Cell::new(*row, *col)));
        }
        assert_eq!(neighbors.len(), expected.len());
    }

    #[test]
    fn test_neighbor_order() {
        let order = Cell::new(1, 1)
            .manhattan_neighbors(Bounds::new(3, 3))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![Cell::new(0, 1), Cell::new(2, 1), Cell::new(1, 0), Cell::new(1, 2)]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("(3,4)".parse::<Cell>().unwrap(), Cell::new(3, 4));
        assert_eq!(" 0, 12 ".parse::<Cell>().unwrap(), Cell::new(0, 12));
        assert!("3".parse::<Cell>().is_err());
        assert!("1,2,3".parse::<Cell>().is_err());
        assert!("a,b".parse::<Cell>().is_err());
        assert_eq!(format!("{}", Cell::new(9, 5)), "(9,5)");
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Cell::new(0, 0).manhattan_distance(Cell::new(9, 5)), 14);
        assert_eq!(Cell::new(4, 7).manhattan_distance(Cell::new(1, 2)), 8);
        assert!(Cell::new(2, 2).is_adjacent(Cell::new(2, 3)));
        assert!(!Cell::new(2, 2).is_adjacent(Cell::new(3, 3)));
    }
}
