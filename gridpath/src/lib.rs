//! Shortest walks on binary occupancy grids.
//!
//! Grids and coordinates arrive as text, are checked by the strict parsers in
//! [`parse`], and are then searched breadth-first by [`find::PathFinder`]:
//!
//! ```
//! use gridpath::{find_path, parse_coordinate, validate_grid, Point};
//!
//! let grid = validate_grid("[[1,1],[0,1]]").unwrap();
//! let source = parse_coordinate("(0,0)").unwrap();
//! let dest = parse_coordinate("(1,1)").unwrap();
//!
//! let result = find_path(&grid, source, dest).unwrap();
//! assert_eq!(result.path, vec![Point::new(1, 1), Point::new(0, 1), Point::new(0, 0)]);
//! ```

pub mod error;
pub mod find;
pub mod grid;
pub mod parse;
pub mod presets;
pub mod util;

pub use error::{CoordinateError, GridError, NoPath, NoPathReason, Rejected};
pub use find::{
    find_path, MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult,
    Visited, VisitedItem,
};
pub use grid::{Cell, CellStorage, GridMap, Point};
pub use parse::{is_well_formed, parse_coordinate, validate_grid};
pub use presets::{Preset, PresetError, PresetTable};
