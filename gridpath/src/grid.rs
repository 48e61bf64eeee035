use crate::find::{MapStorage, MapTrait, NodeReference};
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single grid cell, written as `1` (passable) or `0` (obstacle)
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Obstacle,
    Passable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell value must be 0 or 1, got {0}")]
pub struct InvalidCell(pub u8);

impl TryFrom<u8> for Cell {
    type Error = InvalidCell;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Obstacle),
            1 => Ok(Cell::Passable),
            other => Err(InvalidCell(other)),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Obstacle => 0,
            Cell::Passable => 1,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Obstacle => "X",
                Cell::Passable => " ",
            }
        )
    }
}

/// A `(row, col)` reference to a grid cell. May lie outside any given grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A MapTrait implementation that uses a grid of cells, one `Vec` per row.
///
/// Rows are not required to have the same length. `columns` is the length of
/// the widest row. The grid cannot be changed once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct GridMap {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl From<Vec<Vec<Cell>>> for GridMap {
    fn from(cells: Vec<Vec<Cell>>) -> Self {
        Self {
            rows: cells.len(),
            columns: cells.iter().map(Vec::len).max().unwrap_or(0),
            cells,
        }
    }
}

impl From<GridMap> for Vec<Vec<Cell>> {
    fn from(map: GridMap) -> Self {
        map.cells
    }
}

impl GridMap {
    pub fn new(rows: usize, columns: usize, cell: Cell) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![cell; columns]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// The cell at `point`, or `None` when it lies outside the grid
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.cells
            .get(point.row)
            .and_then(|row| row.get(point.col))
            .copied()
    }

    /// True when every row has the same length
    pub fn is_rectangular(&self) -> bool {
        self.cells.iter().all(|row| row.len() == self.columns)
    }

    /// Returns a copy scaled by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid.
    pub fn scaled_up(&self, factor: usize) -> Self {
        let cells = self
            .cells
            .iter()
            .flat_map(|row| {
                let wide: Vec<Cell> = row
                    .iter()
                    .flat_map(|cell| std::iter::repeat(*cell).take(factor))
                    .collect();
                std::iter::repeat(wide).take(factor)
            })
            .collect::<Vec<_>>();

        Self::from(cells)
    }

    /// The grid written back in its bracketed text form, e.g. `[[1,0],[0,1]]`
    pub fn to_text(&self) -> String {
        let rows: Vec<String> = self
            .cells
            .iter()
            .map(|row| {
                let values: Vec<&str> = row
                    .iter()
                    .map(|cell| match cell {
                        Cell::Obstacle => "0",
                        Cell::Passable => "1",
                    })
                    .collect();
                format!("[{}]", values.join(","))
            })
            .collect();
        format!("[{}]", rows.join(","))
    }

    /// Draw the grid with every cell on `path` marked by `*`
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut out = String::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if path.contains(&Point { row, col }) {
                    out.push('*');
                } else {
                    out.push_str(&cell.to_string());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// A MapStorage shaped like the grid it was created from (a vec in a vec)
#[derive(Debug)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.0[node.row][node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.0[node.row][node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        self.get(node) == Some(Cell::Passable)
    }

    /// Neighbors are always produced in the order up, left, down, right
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(4);

        if node.row > 0 {
            points.push(Point {
                row: node.row - 1,
                col: node.col,
            });
        }
        if node.col > 0 {
            points.push(Point {
                col: node.col - 1,
                row: node.row,
            });
        }
        points.push(Point {
            row: node.row + 1,
            col: node.col,
        });
        points.push(Point {
            col: node.col + 1,
            row: node.row,
        });

        // filter to only keep cells inside the grid that can be entered
        points.retain(|p| self.is_valid(*p));

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage(
            self.cells
                .iter()
                .map(|row| vec![Default::default(); row.len()])
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::find::{find_path, PathFinder, PathFinderState, PathResult};
    use crate::error::NoPathReason;

    fn create_basic_map() -> GridMap {
        use Cell::*;
        GridMap::from(vec![
            vec![
                Obstacle, Obstacle, Obstacle, Obstacle, Obstacle, Obstacle, Obstacle,
            ],
            vec![Obstacle, Passable, Obstacle, Obstacle, Obstacle, Passable, Obstacle],
            vec![Obstacle, Passable, Obstacle, Obstacle, Obstacle, Passable, Obstacle],
            vec![Obstacle, Passable, Obstacle, Passable, Passable, Passable, Obstacle],
            vec![Obstacle, Passable, Obstacle, Passable, Obstacle, Obstacle, Obstacle],
            vec![Obstacle, Passable, Passable, Passable, Passable, Passable, Passable],
            vec![
                Obstacle, Obstacle, Obstacle, Obstacle, Obstacle, Obstacle, Obstacle,
            ],
        ])
    }

    fn grid(rows: &[&[u8]]) -> GridMap {
        GridMap::from(
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::try_from(*v).unwrap()).collect())
                .collect::<Vec<Vec<Cell>>>(),
        )
    }

    fn is_adjacent(a: Point, b: Point) -> bool {
        a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
    }

    #[test]
    fn test_basic_route() {
        let map = create_basic_map();

        let finder = PathFinder::new(&map, Point { row: 1, col: 1 }, Point { row: 1, col: 5 });

        // test the basic case
        let (result, _) = finder.finish(&map);
        let result = result.unwrap();
        assert_eq!(result.steps, 12);
        assert_eq!(result.path.len(), 13);
        assert_eq!(result.path.first(), Some(&Point { row: 1, col: 5 }));
        assert_eq!(result.path.last(), Some(&Point { row: 1, col: 1 }));
        assert!(result.path.windows(2).all(|w| is_adjacent(w[0], w[1])));
        assert!(result.path.iter().all(|p| map.is_valid(*p)));
    }

    #[test]
    fn test_basic_no_route() {
        let map = create_basic_map();

        let finder = PathFinder::new(&map, Point { row: 1, col: 1 }, Point { row: 0, col: 5 });
        // the goal is inside a wall
        assert!(matches!(
            finder.state(),
            PathFinderState::NoPathFound(no_path) if no_path.reason == NoPathReason::DestinationInvalid
        ));
    }

    #[test]
    fn test_walled_off_goal() {
        let map = grid(&[&[1, 0, 1], &[1, 0, 1], &[1, 0, 1]]);

        let err = find_path(&map, Point::new(0, 0), Point::new(2, 2)).unwrap_err();
        assert_eq!(err.reason, NoPathReason::Unreachable);
    }

    #[test]
    fn test_diagonal_blocked() {
        let map = grid(&[&[1, 0], &[0, 1]]);

        assert!(find_path(&map, Point::new(0, 0), Point::new(1, 1)).is_err());
    }

    #[test]
    fn test_simple_path_is_reversed() {
        let map = grid(&[&[1, 1], &[0, 1]]);

        let result = find_path(&map, Point::new(0, 0), Point::new(1, 1)).unwrap();
        assert_eq!(
            result.path,
            vec![Point::new(1, 1), Point::new(0, 1), Point::new(0, 0)]
        );
        assert_eq!(
            result.source_to_destination(),
            vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)]
        );
        assert_eq!(result.steps, 2);
    }

    #[test]
    fn test_trivial_path() {
        let map = grid(&[&[1, 1], &[0, 1]]);

        let result = find_path(&map, Point::new(0, 1), Point::new(0, 1)).unwrap();
        assert_eq!(
            result,
            PathResult {
                path: vec![Point::new(0, 1)],
                start: Point::new(0, 1),
                goal: Point::new(0, 1),
                steps: 0,
            }
        );
    }

    #[test]
    fn test_trivial_path_on_obstacle() {
        let map = grid(&[&[1, 0]]);

        let err = find_path(&map, Point::new(0, 1), Point::new(0, 1)).unwrap_err();
        assert_eq!(err.reason, NoPathReason::SourceInvalid);
    }

    #[test]
    fn test_out_of_bounds() {
        let map = grid(&[&[1, 1], &[1, 1]]);

        let err = find_path(&map, Point::new(99, 99), Point::new(0, 0)).unwrap_err();
        assert_eq!(err.reason, NoPathReason::SourceInvalid);

        let err = find_path(&map, Point::new(0, 0), Point::new(0, 2)).unwrap_err();
        assert_eq!(err.reason, NoPathReason::DestinationInvalid);
    }

    #[test]
    fn test_tie_break_is_fixed() {
        // both (0,1) and (1,0) lead to (1,1); down is expanded before right
        let map = grid(&[&[1, 1], &[1, 1]]);

        let first = find_path(&map, Point::new(0, 0), Point::new(1, 1)).unwrap();
        assert_eq!(
            first.path,
            vec![Point::new(1, 1), Point::new(1, 0), Point::new(0, 0)]
        );

        for _ in 0..10 {
            assert_eq!(
                find_path(&map, Point::new(0, 0), Point::new(1, 1)).unwrap(),
                first
            );
        }
    }

    #[test]
    fn test_shortest_around_wall() {
        let map = grid(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 0, 1],
            &[0, 0, 1, 1, 1],
        ]);

        let result = find_path(&map, Point::new(2, 0), Point::new(2, 4)).unwrap();
        // via (2,2),(3,2),(3,3),(3,4) is shorter than over the top
        assert_eq!(result.steps, 6);
        assert!(result.path.windows(2).all(|w| is_adjacent(w[0], w[1])));
    }

    #[test]
    fn test_ragged_rows() {
        let map = grid(&[&[1, 1, 1], &[1], &[1, 1]]);

        assert!(!map.is_rectangular());
        assert_eq!(map.rows(), 3);
        assert_eq!(map.columns(), 3);
        assert_eq!(map.get(Point::new(1, 1)), None);
        assert!(!map.is_valid(Point::new(1, 2)));

        let result = find_path(&map, Point::new(0, 2), Point::new(2, 1)).unwrap();
        assert_eq!(result.steps, 5);
    }

    #[test]
    fn test_grid_is_not_mutated() {
        let map = create_basic_map();
        let before = map.clone();

        find_path(&map, Point { row: 1, col: 1 }, Point { row: 1, col: 5 }).unwrap();
        assert_eq!(map, before);
    }

    #[test]
    fn test_neighbor_order() {
        let map = grid(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]);

        let neighbors: Vec<Point> = map.neighbors_of(Point::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Point::new(0, 1),
                Point::new(1, 0),
                Point::new(2, 1),
                Point::new(1, 2)
            ]
        );
    }

    #[test]
    fn test_new_open_grid() {
        let map = GridMap::new(2, 3, Cell::Passable);

        assert!(map.is_rectangular());
        assert_eq!(map.to_text(), "[[1,1,1],[1,1,1]]");
        assert_eq!(
            find_path(&map, Point::new(0, 0), Point::new(1, 2)).unwrap().steps,
            3
        );
    }

    #[test]
    fn test_scaled_up() {
        let map = grid(&[&[1, 0]]).scaled_up(2);

        assert_eq!(map, grid(&[&[1, 1, 0, 0], &[1, 1, 0, 0]]));
    }

    #[test]
    fn test_to_text_and_render() {
        let map = grid(&[&[1, 1], &[0, 1]]);

        assert_eq!(map.to_text(), "[[1,1],[0,1]]");
        assert_eq!(map.to_string(), "  \nX \n");
        assert_eq!(
            map.render_path(&[Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)]),
            "**\nX*\n"
        );
        assert_eq!(Point::new(3, 4).to_string(), "(3,4)");
    }

    #[test]
    fn test_serde_matches_text_form() {
        let map = grid(&[&[0, 1], &[1, 0]]);

        assert_eq!(serde_json::to_string(&map).unwrap(), map.to_text());
        let back: GridMap = serde_json::from_str("[[0,1],[1,0]]").unwrap();
        assert_eq!(back, map);
        assert!(serde_json::from_str::<GridMap>("[[0,2]]").is_err());
    }
}
